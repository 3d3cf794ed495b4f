//! Five-field pass payload

use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Reserved delimiter between payload fields
pub const FIELD_DELIMITER: char = '|';

const FIELD_COUNT: usize = 5;

/// Field name reported when the expiry date does not parse
pub(crate) const EXPIRY_FIELD: &str = "expiry_date";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors building or parsing a payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("subject id is required")]
    MissingSubject,

    #[error("field {field} contains the reserved delimiter '|'")]
    ReservedDelimiter { field: &'static str },

    #[error("expected 5 fields, found {0}")]
    FieldCount(usize),

    #[error("field {field} is not a YYYY-MM-DD date: {value}")]
    InvalidDate { field: &'static str, value: String },
}

/// Entitlement carried inside a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassPayload {
    pub subject_id: String,
    pub display_name: String,
    pub route_id: String,
    pub expiry_date: NaiveDate,
    pub issued_date: NaiveDate,
}

impl PassPayload {
    /// Build a payload, trimming text fields
    ///
    /// Fields containing the delimiter are rejected rather than escaped, so
    /// every payload this returns parses back to itself.
    pub fn new(
        subject_id: &str,
        display_name: &str,
        route_id: &str,
        expiry_date: NaiveDate,
        issued_date: NaiveDate,
    ) -> Result<Self, PayloadError> {
        let subject_id = subject_id.trim();
        if subject_id.is_empty() {
            return Err(PayloadError::MissingSubject);
        }

        for (field, value) in [
            ("subject_id", subject_id),
            ("display_name", display_name),
            ("route_id", route_id),
        ] {
            if value.contains(FIELD_DELIMITER) {
                return Err(PayloadError::ReservedDelimiter { field });
            }
        }

        Ok(Self {
            subject_id: subject_id.to_string(),
            display_name: display_name.trim().to_string(),
            route_id: route_id.trim().to_string(),
            expiry_date,
            issued_date,
        })
    }

    /// Wire form: fields joined by `|`, dates as `YYYY-MM-DD`
    pub fn to_wire(&self) -> String {
        self.to_string()
    }

    /// Parse the wire form, requiring exactly five fields
    pub fn parse(wire: &str) -> Result<Self, PayloadError> {
        let fields: Vec<&str> = wire.split(FIELD_DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(PayloadError::FieldCount(fields.len()));
        }

        Ok(Self {
            subject_id: fields[0].to_string(),
            display_name: fields[1].to_string(),
            route_id: fields[2].to_string(),
            expiry_date: parse_date(EXPIRY_FIELD, fields[3])?,
            issued_date: parse_date("issued_date", fields[4])?,
        })
    }
}

impl fmt::Display for PassPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = FIELD_DELIMITER;
        write!(
            f,
            "{}{d}{}{d}{}{d}{}{d}{}",
            self.subject_id,
            self.display_name,
            self.route_id,
            self.expiry_date.format(DATE_FORMAT),
            self.issued_date.format(DATE_FORMAT),
        )
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, PayloadError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| PayloadError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
