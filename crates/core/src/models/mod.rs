pub mod assignment;
pub mod booking;
pub mod shift;
pub mod specialty;
pub mod staff;
