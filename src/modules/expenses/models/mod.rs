mod expense;

pub use expense::{
    CreateExpenseRequest, Expense, ExpenseFilter, ExpenseListQuery, ExpenseType,
    ExpenseTypeTotal, UpdateExpenseRequest,
};
