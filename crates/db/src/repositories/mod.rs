pub mod booking;
pub mod clinic;
pub mod reservation;
pub mod service;
pub mod shift;
pub mod slot;
pub mod staff;
