// Expenses module: operating costs, optionally attached to a trip

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Expense, ExpenseType};
pub use repositories::ExpenseRepository;
pub use services::ExpenseService;
