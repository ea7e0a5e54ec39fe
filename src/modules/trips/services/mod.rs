pub mod financial_calculator;
pub mod trip_service;

pub use financial_calculator::{
    compute_deduction, compute_gross_profit, compute_net_profit, compute_paid_value,
    DerivedFinancials,
};
pub use trip_service::{refresh_net_profit, TripService};
