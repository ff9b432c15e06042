pub mod availability;
pub mod booking;
pub mod service_item;
pub mod shift;
pub mod slot;
