use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};

use crate::core::{AppError, Result};

/// Colombia has no daylight saving time: America/Bogota is always UTC-5
pub const COLOMBIA_UTC_OFFSET_SECONDS: i32 = -5 * 3600;

const MONTHS_LONG: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

pub fn colombia_offset() -> FixedOffset {
    FixedOffset::east_opt(COLOMBIA_UTC_OFFSET_SECONDS).expect("Valid offset")
}

/// Convert a UTC timestamp to Colombia local time
pub fn utc_to_colombia(utc_time: DateTime<Utc>) -> DateTime<FixedOffset> {
    utc_time.with_timezone(&colombia_offset())
}

/// Calendar date in Colombia for the given instant.
///
/// Handlers pass `Utc::now()` here; the reporting code never reads the clock itself.
pub fn colombia_date(utc_time: DateTime<Utc>) -> NaiveDate {
    utc_to_colombia(utc_time).date_naive()
}

/// Parse a date sent by clients: either `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Plain dates are taken as calendar dates; timestamps are converted to Colombia local time first.
pub fn parse_date_input(value: &str) -> Result<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| colombia_date(dt.with_timezone(&Utc)))
        .map_err(|_| {
            AppError::validation(format!(
                "Invalid date '{}'. Expected YYYY-MM-DD or RFC 3339",
                value
            ))
        })
}

/// Long es-CO date, e.g. `15 de junio de 2024`
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS_LONG[date.month0() as usize],
        date.year()
    )
}

/// Short es-CO date, e.g. `15/06/2024`
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_date_str(value: &str) -> Result<String> {
    parse_date_input(value).map(format_date)
}

pub fn format_short_date_str(value: &str) -> Result<String> {
    parse_date_input(value).map(format_short_date)
}

/// Capitalised Spanish month name for a zero-based month index (0 = Enero)
pub fn month_name(month0: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month0 as usize).copied()
}

/// Serde helpers for request dates that accept both `YYYY-MM-DD` and RFC 3339
pub mod serde_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date_input(&raw).map_err(D::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => super::super::parse_date_input(&raw)
                    .map(Some)
                    .map_err(D::Error::custom),
                _ => Ok(None),
            }
        }
    }
}
