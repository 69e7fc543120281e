//! Patient record: the ten attributes collected by the form.
//!
//! Categorical fields are closed enums whose string forms match the values
//! the model was trained on (`"never smoked"`, `"Govt_job"`, ...). Numeric
//! fields carry the same bounds as the form widgets and are checked by
//! [`PatientRecord::validate`].

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const AGE_RANGE: RangeInclusive<u8> = 1..=120;
pub const GLUCOSE_RANGE: RangeInclusive<f64> = 0.0..=300.0;
pub const BMI_RANGE: RangeInclusive<f64> = 0.0..=50.0;

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("unknown {field} value {value:?}; expected one of: {expected}")]
    UnknownOption {
        field: &'static str,
        value: String,
        expected: String,
    },
}

/// Declares a closed set of string-valued options.
///
/// Each variant maps to exactly one wire string; `ALL` lists them in form
/// order so the first entry is the widget default.
macro_rules! options {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = RecordError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|opt| opt.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| RecordError::UnknownOption {
                        field: $field,
                        value: s.to_string(),
                        expected: Self::ALL
                            .iter()
                            .map(|o| o.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

options! {
    /// Encoded as a binary flag: `Male` = 1, `Female` = 0.
    Gender, "gender" {
        Male => "Male",
        Female => "Female",
    }
}

options! {
    SmokingStatus, "smoking_status" {
        NeverSmoked => "never smoked",
        FormerlySmoked => "formerly smoked",
        Smokes => "smokes",
        Unknown => "Unknown",
    }
}

options! {
    ResidenceType, "Residence_type" {
        Urban => "Urban",
        Rural => "Rural",
    }
}

options! {
    WorkType, "work_type" {
        Private => "Private",
        SelfEmployed => "Self-employed",
        GovtJob => "Govt_job",
        Children => "Children",
        NeverWorked => "Never_worked",
    }
}

impl Gender {
    pub fn flag(&self) -> i64 {
        match self {
            Self::Male => 1,
            Self::Female => 0,
        }
    }
}

/// One patient's attributes, assembled fresh for every prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: u8,
    pub gender: Gender,
    pub hypertension: bool,
    pub heart_disease: bool,
    pub avg_glucose_level: f64,
    pub bmi: f64,
    pub smoking_status: SmokingStatus,
    #[serde(rename = "Residence_type")]
    pub residence_type: ResidenceType,
    pub work_type: WorkType,
    pub ever_married: bool,
}

impl Default for PatientRecord {
    /// The form's initial state: every widget at its lowest value or first option.
    fn default() -> Self {
        Self {
            age: *AGE_RANGE.start(),
            gender: Gender::default(),
            hypertension: false,
            heart_disease: false,
            avg_glucose_level: *GLUCOSE_RANGE.start(),
            bmi: *BMI_RANGE.start(),
            smoking_status: SmokingStatus::default(),
            residence_type: ResidenceType::default(),
            work_type: WorkType::default(),
            ever_married: false,
        }
    }
}

impl PatientRecord {
    /// Check numeric fields against the form's widget bounds.
    pub fn validate(&self) -> Result<(), RecordError> {
        check_range(
            "age",
            f64::from(self.age),
            f64::from(*AGE_RANGE.start())..=f64::from(*AGE_RANGE.end()),
        )?;
        check_range("avg_glucose_level", self.avg_glucose_level, GLUCOSE_RANGE)?;
        check_range("bmi", self.bmi, BMI_RANGE)?;
        Ok(())
    }
}

/// Render a yes/no flag the way the form and the training data spell it.
pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Parse a yes/no answer (`yes`, `no`, `1`, `0`, `true`, `false`).
pub fn parse_yes_no(s: &str) -> Result<bool, RecordError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "1" | "true" => Ok(true),
        "no" | "n" | "0" | "false" => Ok(false),
        other => Err(RecordError::UnknownOption {
            field: "flag",
            value: other.to_string(),
            expected: "Yes, No".to_string(),
        }),
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Result<(), RecordError> {
    // NaN fails `contains`, so it is rejected here too.
    if range.contains(&value) {
        Ok(())
    } else {
        Err(RecordError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
