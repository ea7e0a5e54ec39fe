//! Trip financial derivation.
//!
//! Pure functions turning a trip's declared total value and classification
//! into the figures stored on the trip record. Callers validate that
//! `total_value > 0` before getting here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::currency::round_for_storage;
use crate::modules::trips::models::TripType;

/// National withholding applied to every trip: 1.6%
pub const DEDUCTION_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 3);

/// Gross margin for urban trips: 50%
pub const URBAN_PROFIT_RATE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Gross margin for national trips: 60%
pub const NATIONAL_PROFIT_RATE: Decimal = Decimal::from_parts(60, 0, 0, false, 2);

pub use crate::core::currency::STORAGE_SCALE;

pub fn compute_deduction(total_value: Decimal) -> Decimal {
    total_value * DEDUCTION_RATE
}

pub fn compute_paid_value(total_value: Decimal) -> Decimal {
    total_value - compute_deduction(total_value)
}

pub fn compute_gross_profit(total_value: Decimal, trip_type: TripType) -> Decimal {
    total_value * trip_type.profit_rate()
}

/// Negative results are losses and are returned as-is
pub fn compute_net_profit(gross_profit: Decimal, total_expenses: Decimal) -> Decimal {
    gross_profit - total_expenses
}

/// Figures written back onto a trip record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFinancials {
    pub deduction: Decimal,
    pub paid_value: Decimal,
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
    /// Whole-number percentage (50 or 60)
    pub profit_percentage: Decimal,
}

impl DerivedFinancials {
    /// Derive the financials of a freshly created trip: no expenses yet, so net equals gross
    pub fn derive(total_value: Decimal, trip_type: TripType) -> Self {
        let gross_profit = compute_gross_profit(total_value, trip_type);

        Self {
            deduction: compute_deduction(total_value),
            paid_value: compute_paid_value(total_value),
            gross_profit,
            net_profit: compute_net_profit(gross_profit, Decimal::ZERO),
            profit_percentage: trip_type.profit_percentage(),
        }
    }

    /// Same figures with known expenses
    pub fn with_expenses(mut self, total_expenses: Decimal) -> Self {
        self.net_profit = compute_net_profit(self.gross_profit, total_expenses);
        self
    }

    /// Round to the storage scale.
    ///
    /// Paid value is recomputed from the rounded deduction so that
    /// `deduction + paid_value == total_value` still holds in the database.
    pub fn rounded_for_storage(self, total_value: Decimal) -> Self {
        let deduction = round_for_storage(self.deduction);
        let expenses = self.gross_profit - self.net_profit;
        let gross_profit = round_for_storage(self.gross_profit);

        Self {
            deduction,
            paid_value: total_value - deduction,
            gross_profit,
            net_profit: compute_net_profit(gross_profit, round_for_storage(expenses)),
            profit_percentage: self.profit_percentage,
        }
    }
}
