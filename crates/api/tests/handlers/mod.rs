mod availability_test;
mod booking_test;
mod config_test;
mod health_test;
mod middleware_test;
mod shift_test;
mod slot_test;
