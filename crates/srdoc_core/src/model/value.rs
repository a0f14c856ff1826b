//! Typed payloads carried by content items.
//!
//! # Responsibility
//! - Model each value kind as one variant of a closed sum type.
//! - Reject malformed non-empty values (bad UID, number, date or time syntax).
//!
//! # Invariants
//! - `ContentValue::value_type()` is the single source of an item's value kind.
//! - Empty payloads are allowed during construction and reported by
//!   `is_complete()`, never rejected.

use crate::model::coded::{CodedEntry, CodedEntryError};
use crate::model::kinds::ValueType;
use crate::model::uid::is_valid_uid;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}(0[1-9]|1[0-2])(0[1-9]|[12][0-9]|3[01])$").expect("valid date regex")
});
static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3])([0-5][0-9]([0-5][0-9](\.[0-9]{1,6})?)?)?$")
        .expect("valid time regex")
});
static DATE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9]{4}((0[1-9]|1[0-2])((0[1-9]|[12][0-9]|3[01])(([01][0-9]|2[0-3])([0-5][0-9]([0-5][0-9](\.[0-9]{1,6})?)?)?)?)?)?([+-][0-9]{4})?$",
    )
    .expect("valid datetime regex")
});

/// Numeric value with its measurement unit.
///
/// The number is kept as its decimal string so an encoder writes it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericMeasurement {
    pub value: String,
    pub unit: CodedEntry,
}

impl NumericMeasurement {
    pub fn new(value: impl Into<String>, unit: CodedEntry) -> Self {
        Self {
            value: value.into(),
            unit,
        }
    }
}

/// Reference to a composite object by class and instance UID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeReference {
    pub sop_class_uid: String,
    pub sop_instance_uid: String,
}

impl CompositeReference {
    pub fn new(sop_class_uid: impl Into<String>, sop_instance_uid: impl Into<String>) -> Self {
        Self {
            sop_class_uid: sop_class_uid.into(),
            sop_instance_uid: sop_instance_uid.into(),
        }
    }
}

/// Whether children of a container read as one continuous text or separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuityOfContent {
    #[default]
    Separate,
    Continuous,
}

/// Payload of one content item, one variant per value kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "value_type", rename_all = "snake_case")]
pub enum ContentValue {
    Text {
        text: String,
    },
    Code {
        code: Option<CodedEntry>,
    },
    Num {
        measurement: Option<NumericMeasurement>,
    },
    Date {
        date: String,
    },
    Time {
        time: String,
    },
    DateTime {
        date_time: String,
    },
    PName {
        name: String,
    },
    UidRef {
        uid: String,
    },
    Composite {
        reference: Option<CompositeReference>,
    },
    Container {
        continuity: ContinuityOfContent,
    },
}

impl ContentValue {
    /// Builds the empty payload for a value kind.
    pub fn empty(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Text => Self::Text {
                text: String::new(),
            },
            ValueType::Code => Self::Code { code: None },
            ValueType::Num => Self::Num { measurement: None },
            ValueType::Date => Self::Date {
                date: String::new(),
            },
            ValueType::Time => Self::Time {
                time: String::new(),
            },
            ValueType::DateTime => Self::DateTime {
                date_time: String::new(),
            },
            ValueType::PName => Self::PName {
                name: String::new(),
            },
            ValueType::UidRef => Self::UidRef { uid: String::new() },
            ValueType::Composite => Self::Composite { reference: None },
            ValueType::Container => Self::Container {
                continuity: ContinuityOfContent::default(),
            },
        }
    }

    /// Builds a string-valued payload of the given kind.
    ///
    /// Returns `None` for kinds whose payload is not a single string.
    pub fn from_string(value_type: ValueType, value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        match value_type {
            ValueType::Text => Some(Self::Text { text: value }),
            ValueType::Date => Some(Self::Date { date: value }),
            ValueType::Time => Some(Self::Time { time: value }),
            ValueType::DateTime => Some(Self::DateTime { date_time: value }),
            ValueType::PName => Some(Self::PName { name: value }),
            ValueType::UidRef => Some(Self::UidRef { uid: value }),
            ValueType::Code | ValueType::Num | ValueType::Composite | ValueType::Container => None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text { text: value.into() }
    }

    pub fn code(entry: CodedEntry) -> Self {
        Self::Code { code: Some(entry) }
    }

    pub fn num(value: impl Into<String>, unit: CodedEntry) -> Self {
        Self::Num {
            measurement: Some(NumericMeasurement::new(value, unit)),
        }
    }

    pub fn container(continuity: ContinuityOfContent) -> Self {
        Self::Container { continuity }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Text { .. } => ValueType::Text,
            Self::Code { .. } => ValueType::Code,
            Self::Num { .. } => ValueType::Num,
            Self::Date { .. } => ValueType::Date,
            Self::Time { .. } => ValueType::Time,
            Self::DateTime { .. } => ValueType::DateTime,
            Self::PName { .. } => ValueType::PName,
            Self::UidRef { .. } => ValueType::UidRef,
            Self::Composite { .. } => ValueType::Composite,
            Self::Container { .. } => ValueType::Container,
        }
    }

    /// Returns the string payload for string-valued kinds.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Date { date } => Some(date),
            Self::Time { time } => Some(time),
            Self::DateTime { date_time } => Some(date_time),
            Self::PName { name } => Some(name),
            Self::UidRef { uid } => Some(uid),
            Self::Code { .. } | Self::Num { .. } | Self::Composite { .. } | Self::Container { .. } => {
                None
            }
        }
    }

    /// Whether the payload carries a complete value. Containers always do.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Code { code } => code.is_some(),
            Self::Num { measurement } => measurement.is_some(),
            Self::Composite { reference } => reference.is_some(),
            Self::Container { .. } => true,
            other => other
                .as_string()
                .is_some_and(|value| !value.trim().is_empty()),
        }
    }

    /// Checks syntax of every non-empty part of the payload.
    pub fn validate(&self) -> Result<(), ValueError> {
        match self {
            Self::Text { .. } | Self::PName { .. } | Self::Container { .. } => Ok(()),
            Self::Code { code } => match code {
                Some(entry) => entry.validate().map_err(ValueError::InvalidCode),
                None => Ok(()),
            },
            Self::Num { measurement } => match measurement {
                Some(measurement) => validate_measurement(measurement),
                None => Ok(()),
            },
            Self::Date { date } => check_pattern(date, &DATE_RE, ValueError::InvalidDate),
            Self::Time { time } => check_pattern(time, &TIME_RE, ValueError::InvalidTime),
            Self::DateTime { date_time } => {
                check_pattern(date_time, &DATE_TIME_RE, ValueError::InvalidDateTime)
            }
            Self::UidRef { uid } => {
                if uid.is_empty() || is_valid_uid(uid) {
                    Ok(())
                } else {
                    Err(ValueError::InvalidUid(uid.clone()))
                }
            }
            Self::Composite { reference } => match reference {
                Some(reference) => validate_composite(reference),
                None => Ok(()),
            },
        }
    }
}

/// Checks a date-time string as used for observation date-time.
pub fn validate_date_time(value: &str) -> Result<(), ValueError> {
    check_pattern(value, &DATE_TIME_RE, ValueError::InvalidDateTime)
}

fn check_pattern(
    value: &str,
    pattern: &Regex,
    error: fn(String) -> ValueError,
) -> Result<(), ValueError> {
    if value.is_empty() || pattern.is_match(value) {
        Ok(())
    } else {
        Err(error(value.to_string()))
    }
}

fn validate_measurement(measurement: &NumericMeasurement) -> Result<(), ValueError> {
    let trimmed = measurement.value.trim();
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => {}
        _ => return Err(ValueError::InvalidNumber(measurement.value.clone())),
    }
    measurement.unit.validate().map_err(ValueError::InvalidCode)
}

fn validate_composite(reference: &CompositeReference) -> Result<(), ValueError> {
    for uid in [&reference.sop_class_uid, &reference.sop_instance_uid] {
        if !is_valid_uid(uid) {
            return Err(ValueError::InvalidUid(uid.clone()));
        }
    }
    Ok(())
}

/// Payload syntax errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    InvalidCode(CodedEntryError),
    InvalidNumber(String),
    InvalidDate(String),
    InvalidTime(String),
    InvalidDateTime(String),
    InvalidUid(String),
    InvalidTemplateIdentifier,
    /// A string was supplied for an item whose payload is not a string.
    NotStringValued(ValueType),
}

impl Display for ValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCode(err) => write!(f, "invalid coded entry: {err}"),
            Self::InvalidNumber(value) => write!(f, "invalid numeric value: `{value}`"),
            Self::InvalidDate(value) => write!(f, "invalid date (expected YYYYMMDD): `{value}`"),
            Self::InvalidTime(value) => write!(f, "invalid time (expected HHMMSS): `{value}`"),
            Self::InvalidDateTime(value) => write!(f, "invalid date-time: `{value}`"),
            Self::InvalidUid(value) => write!(f, "invalid uid: `{value}`"),
            Self::InvalidTemplateIdentifier => {
                write!(f, "template id and mapping resource must not be blank")
            }
            Self::NotStringValued(value_type) => {
                write!(f, "{value_type} values cannot be set from a string")
            }
        }
    }
}

impl Error for ValueError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCode(err) => Some(err),
            _ => None,
        }
    }
}
