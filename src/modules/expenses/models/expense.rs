use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::currency::validate_amount;
use crate::core::dates::serde_date;
use crate::core::nullable;
use crate::core::{AppError, ReportingPeriod, Result};

const MAX_DESCRIPTION_LENGTH: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExpenseType {
    Fuel,
    Toll,
    Maintenance,
    Salary,
    Insurance,
    Documentation,
    Other,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 7] = [
        ExpenseType::Fuel,
        ExpenseType::Toll,
        ExpenseType::Maintenance,
        ExpenseType::Salary,
        ExpenseType::Insurance,
        ExpenseType::Documentation,
        ExpenseType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseType::Fuel => "Combustible",
            ExpenseType::Toll => "Peajes",
            ExpenseType::Maintenance => "Mantenimiento",
            ExpenseType::Salary => "Salario",
            ExpenseType::Insurance => "Seguros",
            ExpenseType::Documentation => "Documentación",
            ExpenseType::Other => "Otros",
        }
    }
}

impl std::fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ExpenseType::Fuel => "FUEL",
            ExpenseType::Toll => "TOLL",
            ExpenseType::Maintenance => "MAINTENANCE",
            ExpenseType::Salary => "SALARY",
            ExpenseType::Insurance => "INSURANCE",
            ExpenseType::Documentation => "DOCUMENTATION",
            ExpenseType::Other => "OTHER",
        };
        write!(f, "{}", code)
    }
}

impl std::str::FromStr for ExpenseType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ExpenseType::ALL
            .into_iter()
            .find(|t| t.to_string() == s)
            .ok_or_else(|| format!("Invalid expense type: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub trip_id: Option<String>,
    pub description: String,
    pub amount: Decimal,
    pub expense_type: ExpenseType,
    #[serde(with = "serde_date")]
    pub expense_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(user_id: &str, request: CreateExpenseRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            trip_id: request.trip_id.map(|id| id.trim().to_string()),
            description: request.description.trim().to_string(),
            amount: request.amount,
            expense_type: request.expense_type,
            expense_date: request.expense_date,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

fn validate_description(description: &str) -> Result<()> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("description is required"));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(AppError::validation(format!(
            "description must be at most {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    #[serde(default)]
    pub trip_id: Option<String>,
    pub description: String,
    pub amount: Decimal,
    pub expense_type: ExpenseType,
    #[serde(with = "serde_date")]
    pub expense_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateExpenseRequest {
    pub fn validate(&self) -> Result<()> {
        validate_description(&self.description)?;
        validate_amount("amount", self.amount)
    }
}

/// Partial update. `trip_id: ""` detaches the expense from its trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    #[serde(default)]
    pub trip_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub expense_type: Option<ExpenseType>,
    #[serde(default, with = "serde_date::option")]
    pub expense_date: Option<NaiveDate>,
    /// `null` clears the stored notes
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

impl UpdateExpenseRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(amount) = self.amount {
            validate_amount("amount", amount)?;
        }
        Ok(())
    }

    /// The trip the expense will belong to after the update
    pub fn target_trip_id(&self, current: Option<&str>) -> Option<String> {
        match &self.trip_id {
            Some(id) if id.trim().is_empty() => None,
            Some(id) => Some(id.trim().to_string()),
            None => current.map(str::to_string),
        }
    }

    pub fn apply_to(self, expense: &mut Expense, now: DateTime<Utc>) {
        expense.trip_id = self.target_trip_id(expense.trip_id.as_deref());
        if let Some(description) = self.description {
            expense.description = description.trim().to_string();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(expense_type) = self.expense_type {
            expense.expense_type = expense_type;
        }
        if let Some(expense_date) = self.expense_date {
            expense.expense_date = expense_date;
        }
        if let Some(notes) = self.notes {
            expense.notes = notes;
        }
        expense.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseListQuery {
    #[serde(default)]
    pub trip_id: Option<String>,
    #[serde(default)]
    pub expense_type: Option<ExpenseType>,
    #[serde(default)]
    pub period: Option<ReportingPeriod>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub trip_id: Option<String>,
    pub expense_type: Option<ExpenseType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        self.trip_id
            .as_ref()
            .map_or(true, |id| expense.trip_id.as_ref() == Some(id))
            && self.expense_type.map_or(true, |t| expense.expense_type == t)
            && self.start_date.map_or(true, |d| expense.expense_date >= d)
            && self.end_date.map_or(true, |d| expense.expense_date <= d)
    }
}

/// Sum of expenses of one type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseTypeTotal {
    pub expense_type: ExpenseType,
    pub label: &'static str,
    pub total: Decimal,
}
