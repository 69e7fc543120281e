//! Interactive patient form.
//!
//! Each prompt starts from the previous answer, so a second prediction only
//! needs the fields that changed.

use std::fmt::Display;
use std::ops::RangeInclusive;

use inquire::validator::Validation;
use inquire::{CustomType, InquireError, Select};
use stroke_core::record::{AGE_RANGE, BMI_RANGE, GLUCOSE_RANGE};
use stroke_core::{Gender, PatientRecord, ResidenceType, SmokingStatus, WorkType};

const YES_NO: [&str; 2] = ["No", "Yes"];

/// Ask for all ten fields, defaulting each to its value in `previous`.
pub fn prompt_record(previous: &PatientRecord) -> Result<PatientRecord, InquireError> {
    println!("Patient details");

    let age = CustomType::<u8>::new("🧓 Age (in years)")
        .with_default(previous.age)
        .with_error_message("Enter a whole number of years")
        .with_validator(range_validator(AGE_RANGE))
        .prompt()?;
    let gender = choose("⚥ Gender", Gender::ALL, previous.gender)?;
    let hypertension = yes_no("💊 Hypertension", previous.hypertension)?;
    let heart_disease = yes_no("❤️ Heart Disease", previous.heart_disease)?;
    let avg_glucose_level = measurement(
        "🩸 Average Glucose Level (mg/dL)",
        previous.avg_glucose_level,
        GLUCOSE_RANGE,
    )?;
    let bmi = measurement("⚖️ BMI (Body Mass Index)", previous.bmi, BMI_RANGE)?;
    let smoking_status = choose(
        "🚬 Smoking Status",
        SmokingStatus::ALL,
        previous.smoking_status,
    )?;
    let residence_type = choose(
        "🏡 Residence Type",
        ResidenceType::ALL,
        previous.residence_type,
    )?;
    let work_type = choose("💼 Work Type", WorkType::ALL, previous.work_type)?;
    let ever_married = yes_no("💍 Ever Married", previous.ever_married)?;

    Ok(PatientRecord {
        age,
        gender,
        hypertension,
        heart_disease,
        avg_glucose_level,
        bmi,
        smoking_status,
        residence_type,
        work_type,
        ever_married,
    })
}

fn choose<T>(message: &str, options: &[T], current: T) -> Result<T, InquireError>
where
    T: Copy + PartialEq + Display,
{
    let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
    Select::new(message, options.to_vec())
        .with_starting_cursor(cursor)
        .prompt()
}

fn yes_no(message: &str, current: bool) -> Result<bool, InquireError> {
    let answer = Select::new(message, YES_NO.to_vec())
        .with_starting_cursor(usize::from(current))
        .prompt()?;
    Ok(answer == "Yes")
}

fn measurement(
    message: &str,
    current: f64,
    range: RangeInclusive<f64>,
) -> Result<f64, InquireError> {
    let help = format!("{} to {}", range.start(), range.end());
    CustomType::<f64>::new(message)
        .with_default(current)
        .with_help_message(&help)
        .with_error_message("Enter a number")
        .with_validator(range_validator(range))
        .prompt()
}

fn range_validator<T>(
    range: RangeInclusive<T>,
) -> impl Fn(&T) -> Result<Validation, inquire::CustomUserError> + Clone
where
    T: PartialOrd + Display + Clone,
{
    move |value: &T| {
        if range.contains(value) {
            Ok(Validation::Valid)
        } else {
            Ok(Validation::Invalid(
                format!("Must be between {} and {}", range.start(), range.end()).into(),
            ))
        }
    }
}
