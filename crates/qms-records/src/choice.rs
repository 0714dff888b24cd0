//! Fixed-option fields
//!
//! Select-box fields of the intake forms. Each enum's first option is its
//! default, matching a form that was submitted without touching the select.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::RecordError;

/// Field with a closed set of options
pub trait Choice: Copy + Default + Display + FromStr<Err = RecordError> + 'static {
    /// Field label as shown on the form
    const FIELD: &'static str;

    /// All options, in display order
    const OPTIONS: &'static [Self];

    /// Option text as stored in the table
    fn as_str(&self) -> &'static str;

    /// Option texts, in display order
    fn option_labels() -> Vec<&'static str> {
        Self::OPTIONS.iter().map(Self::as_str).collect()
    }
}

fn parse_choice<T: Choice>(value: &str) -> Result<T, RecordError> {
    let value = value.trim();
    T::OPTIONS
        .iter()
        .copied()
        .find(|opt| opt.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| RecordError::InvalidChoice {
            field: T::FIELD,
            value: value.to_string(),
            options: T::option_labels().join(", "),
        })
}

/// Complaint severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Severity {
    /// High
    #[default]
    High,
    /// Medium
    Medium,
    /// Low
    Low,
}

impl Choice for Severity {
    const FIELD: &'static str = "Severity Level";
    const OPTIONS: &'static [Self] = &[Self::High, Self::Medium, Self::Low];

    fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Deviation classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviationType {
    /// Minor
    #[default]
    Minor,
    /// Major
    Major,
    /// Critical
    Critical,
}

impl Choice for DeviationType {
    const FIELD: &'static str = "Deviation Type";
    const OPTIONS: &'static [Self] = &[Self::Minor, Self::Major, Self::Critical];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "Minor",
            Self::Major => "Major",
            Self::Critical => "Critical",
        }
    }
}

/// Subject of a change control request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChangeType {
    /// Equipment
    #[default]
    Equipment,
    /// Process
    Process,
    /// Document
    Document,
    /// Other
    Other,
}

impl Choice for ChangeType {
    const FIELD: &'static str = "Change Type";
    const OPTIONS: &'static [Self] = &[Self::Equipment, Self::Process, Self::Document, Self::Other];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Equipment => "Equipment",
            Self::Process => "Process",
            Self::Document => "Document",
            Self::Other => "Other",
        }
    }
}

macro_rules! choice_traits {
    ($($ty:ty),+) => {
        $(
            impl Display for $ty {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = RecordError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    parse_choice(s)
                }
            }
        )+
    };
}

choice_traits!(Severity, DeviationType, ChangeType);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_first_option() {
        assert_eq!(Severity::default(), Severity::OPTIONS[0]);
        assert_eq!(DeviationType::default(), DeviationType::OPTIONS[0]);
        assert_eq!(ChangeType::default(), ChangeType::OPTIONS[0]);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("medium".parse::<Severity>().unwrap(), Severity::Medium);
        assert_eq!(" Critical ".parse::<DeviationType>().unwrap(), DeviationType::Critical);
    }

    #[test]
    fn unknown_option_lists_valid_ones() {
        let err = "Urgent".parse::<Severity>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "'Urgent' is not a valid Severity Level (expected one of: High, Medium, Low)"
        );
    }

    #[test]
    fn option_labels_in_order() {
        assert_eq!(
            ChangeType::option_labels(),
            vec!["Equipment", "Process", "Document", "Other"]
        );
    }
}
