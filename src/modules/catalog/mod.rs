// Option lists and Spanish labels shared with clients

pub mod controllers;
pub mod models;

pub use models::Catalog;
