mod maintenance_controller;

pub use maintenance_controller::configure;
