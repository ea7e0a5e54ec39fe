mod trip_controller;

pub use trip_controller::configure;
