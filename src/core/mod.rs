pub mod currency;
pub mod dates;
pub mod error;
pub mod nullable;
pub mod period;

pub use currency::{format_currency, format_currency_str};
pub use dates::{format_date, format_short_date};
pub use error::{AppError, Result};
pub use period::{resolve_range, DateRange, ReportingPeriod};
