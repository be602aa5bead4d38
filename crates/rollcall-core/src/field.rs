// crates/rollcall-core/src/field.rs - Validated field types for roster values
//
// Every scalar value a command can carry (a name, a phone number, a class
// label, ...) is a validated wrapper over a string. Validation always checks
// length before shape, so an input that violates both reports the length
// error. Construction trims surrounding whitespace.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while validating a field value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{field} is too long (maximum {max} characters)")]
    ExceedsLength { field: &'static str, max: usize },

    #[error("{field} {requirement}")]
    InvalidShape {
        field: &'static str,
        requirement: &'static str,
    },
}

/// Result type for field validation
pub type FieldResult<T> = Result<T, FieldError>;

/// Length check. Runs before the shape check for every field type.
fn validate_length(value: &str, field: &'static str, max: usize) -> FieldResult<()> {
    if value.chars().count() > max {
        return Err(FieldError::ExceedsLength { field, max });
    }
    Ok(())
}

/// Shape check. No field type accepts an empty value or one that starts
/// with whitespace, on top of its own character-set rule.
fn validate_shape(
    value: &str,
    field: &'static str,
    requirement: &'static str,
    accepts: fn(&str) -> bool,
) -> FieldResult<()> {
    if value.is_empty() || value.starts_with(char::is_whitespace) || !accepts(value) {
        return Err(FieldError::InvalidShape { field, requirement });
    }
    Ok(())
}

fn alphanumeric_spaces(value: &str) -> bool {
    value.chars().all(|c| c.is_alphanumeric() || c == ' ')
}

fn alphanumeric_spaces_dashes(value: &str) -> bool {
    value.chars().all(|c| c.is_alphanumeric() || c == ' ' || c == '-')
}

fn alphanumeric_only(value: &str) -> bool {
    value.chars().all(char::is_alphanumeric)
}

fn digits_at_least_three(value: &str) -> bool {
    value.len() >= 3 && value.chars().all(|c| c.is_ascii_digit())
}

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+_.\-]+@[A-Za-z0-9][A-Za-z0-9.\-]*$").unwrap());

fn email_shape(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

/// Define a validated string wrapper: `parse` (length first, then shape,
/// trimming surrounding whitespace), accessors, display, and serde
/// round-tripping through the validated constructor.
macro_rules! text_value {
    ($(#[$doc:meta])* $name:ident, $field:literal, $max:expr, $requirement:literal, $accepts:path) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub const MAX_LENGTH: usize = $max;

            /// Validate `raw` and construct the value. Surrounding
            /// whitespace is trimmed before validation.
            pub fn parse(raw: &str) -> FieldResult<Self> {
                let value = raw.trim();
                validate_length(value, $field, $max)?;
                validate_shape(value, $field, $requirement, $accepts)?;
                Ok(Self(value.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = FieldError;

            fn from_str(s: &str) -> FieldResult<Self> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = FieldError;

            fn try_from(value: String) -> FieldResult<Self> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

/// Name-like types compare case-insensitively: "john doe" and "John Doe"
/// are the same identity.
macro_rules! case_insensitive_eq {
    ($name:ident) => {
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0.to_lowercase() == other.0.to_lowercase()
            }
        }

        impl Eq for $name {}
    };
}

macro_rules! exact_eq {
    ($name:ident) => {
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        impl Eq for $name {}
    };
}

text_value!(
    /// A student's name. Roster identity is this value, compared
    /// case-insensitively.
    PersonName,
    "Name",
    100,
    "must contain only alphanumeric characters and spaces",
    alphanumeric_spaces
);
case_insensitive_eq!(PersonName);

text_value!(
    /// A phone number: digits only, at least 3 of them.
    Phone,
    "Phone",
    20,
    "must contain only digits, at least 3 of them",
    digits_at_least_three
);
exact_eq!(Phone);

text_value!(
    /// An email address of the form local@domain.
    Email,
    "Email",
    100,
    "must be of the form local@domain",
    email_shape
);
exact_eq!(Email);

text_value!(
    /// A tuition class label, e.g. "4A" or "Sec 3 - Physics".
    TuitionClass,
    "Class",
    30,
    "must contain only alphanumeric characters, spaces and dashes",
    alphanumeric_spaces_dashes
);
case_insensitive_eq!(TuitionClass);

text_value!(
    /// A short tag attached to a student. No spaces allowed.
    Tag,
    "Tag",
    25,
    "must contain only alphanumeric characters",
    alphanumeric_only
);
case_insensitive_eq!(Tag);

text_value!(
    /// The name of an assignment. Assignment identity is this value.
    AssignmentName,
    "Assignment name",
    50,
    "must contain only alphanumeric characters and spaces",
    alphanumeric_spaces
);
case_insensitive_eq!(AssignmentName);

text_value!(
    /// A free-text label; a student carries at most one.
    Label,
    "Label",
    30,
    "must contain only alphanumeric characters and spaces",
    alphanumeric_spaces
);
exact_eq!(Label);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn valid_values_construct_and_trim() {
        let name = PersonName::parse("  John Doe  ").unwrap();
        assert_eq!(name.as_str(), "John Doe");

        let class = TuitionClass::parse("Sec 3 - Physics").unwrap();
        assert_eq!(class.as_str(), "Sec 3 - Physics");

        let phone = Phone::parse("98765432").unwrap();
        assert_eq!(phone.as_str(), "98765432");

        let email = Email::parse("jane.doe@example.com").unwrap();
        assert_eq!(email.as_str(), "jane.doe@example.com");
    }

    #[test]
    fn shape_violations_are_rejected() {
        assert!(matches!(
            PersonName::parse("John&Doe"),
            Err(FieldError::InvalidShape { field: "Name", .. })
        ));
        assert!(matches!(
            PersonName::parse(""),
            Err(FieldError::InvalidShape { .. })
        ));
        assert!(matches!(
            Phone::parse("12"),
            Err(FieldError::InvalidShape { .. })
        ));
        assert!(matches!(
            Phone::parse("1234x"),
            Err(FieldError::InvalidShape { .. })
        ));
        assert!(matches!(
            Email::parse("no-at-sign"),
            Err(FieldError::InvalidShape { .. })
        ));
        assert!(matches!(
            Tag::parse("two words"),
            Err(FieldError::InvalidShape { .. })
        ));
    }

    #[test]
    fn length_violations_are_rejected() {
        let long = "a".repeat(101);
        assert_eq!(
            PersonName::parse(&long),
            Err(FieldError::ExceedsLength {
                field: "Name",
                max: 100
            })
        );
        assert!(Tag::parse(&"x".repeat(26)).is_err());
        assert!(Label::parse(&"x".repeat(31)).is_err());
    }

    #[test]
    fn length_error_takes_priority_over_shape() {
        // Both too long and malformed: the length error must win.
        let long_and_bad = format!("{}&&&", "a".repeat(100));
        assert!(matches!(
            PersonName::parse(&long_and_bad),
            Err(FieldError::ExceedsLength { .. })
        ));
    }

    #[test]
    fn name_like_types_compare_case_insensitively() {
        assert_eq!(
            PersonName::parse("John Doe").unwrap(),
            PersonName::parse("JOHN DOE").unwrap()
        );
        assert_eq!(
            TuitionClass::parse("4a").unwrap(),
            TuitionClass::parse("4A").unwrap()
        );
        assert_eq!(
            AssignmentName::parse("Homework 1").unwrap(),
            AssignmentName::parse("homework 1").unwrap()
        );
        // Labels are free text, not names: compared exactly.
        assert_ne!(
            Label::parse("Needs help").unwrap(),
            Label::parse("needs help").unwrap()
        );
    }

    proptest! {
        // Constructing a value and re-validating its string form yields an
        // equal value (idempotent validation).
        #[test]
        fn revalidating_a_constructed_name_is_identity(raw in "[A-Za-z0-9][A-Za-z0-9 ]{0,98}") {
            if let Ok(name) = PersonName::parse(&raw) {
                let again = PersonName::parse(name.as_str()).unwrap();
                prop_assert_eq!(name, again);
            }
        }

        #[test]
        fn revalidating_a_constructed_assignment_is_identity(raw in "[A-Za-z0-9][A-Za-z0-9 ]{0,48}") {
            if let Ok(assignment) = AssignmentName::parse(&raw) {
                let again = AssignmentName::parse(assignment.as_str()).unwrap();
                prop_assert_eq!(assignment, again);
            }
        }
    }
}
