// Trips module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Trip, TripType};
pub use repositories::TripRepository;
pub use services::TripService;
