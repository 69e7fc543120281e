//! Terminal rendering for the form session.
//!
//! Message text is built by plain functions so it can be tested; the
//! `print_*` wrappers add colour.

use std::path::Path;

use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use console::Style;
use stroke_ai::{Label, LoadError, ModelInfo, Prediction, SessionError};
use stroke_core::{PatientRecord, yes_no};

// ── Public API ──

pub fn print_banner() {
    let title = Style::new().green().bold();
    println!("{}", title.apply_to("🧠 Stroke Prediction"));
    println!("Predict the likelihood of stroke based on patient details.");
    println!();
}

pub fn print_record(record: &PatientRecord) {
    println!();
    for line in record_card(record) {
        println!("{line}");
    }
    println!();
}

pub fn print_table(batch: &RecordBatch) -> anyhow::Result<()> {
    println!("{}", pretty_format_batches(std::slice::from_ref(batch))?);
    Ok(())
}

pub fn print_prediction(prediction: &Prediction) {
    let style = match prediction.label {
        Label::NoStroke => Style::new().green().bold(),
        Label::Stroke => Style::new().red().bold(),
    };
    println!(
        "The predicted result is: {}",
        style.apply_to(label_text(prediction.label))
    );
    if let Some(p) = prediction.probability {
        println!("Estimated stroke probability: {}", percent(p));
    }
}

pub fn print_inference_error(err: &SessionError) {
    eprintln!("{}", Style::new().red().apply_to(inference_error_message(err)));
}

pub fn print_load_error(err: &LoadError) {
    eprintln!("{}", Style::new().red().apply_to(load_error_message(err)));
}

pub fn print_model_info(info: &ModelInfo, path: &Path) {
    println!("{:<12} {}", "Model", info.name);
    println!("{:<12} {}", "Artifact", path.display());
    println!("{:<12} {}", "Estimator", info.estimator);
    println!("{:<12} {}", "Features", info.features.len());
    for (i, feature) in info.features.iter().enumerate() {
        println!("  {:>3}  {feature}", i + 1);
    }
}

pub fn print_disclaimer() {
    println!();
    println!(
        "{}",
        Style::new().dim().apply_to(
            "⚠️ This is a predictive tool and not a substitute for medical advice. \
             Consult a healthcare provider for accurate diagnosis and treatment."
        )
    );
}

// ── Message text ──

fn label_text(label: Label) -> String {
    match label {
        Label::NoStroke => format!("🟢 {label}"),
        Label::Stroke => format!("🔴 {label}"),
    }
}

fn percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

fn load_error_message(err: &LoadError) -> String {
    match err {
        LoadError::NotFound(path) => {
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            format!(
                "❌ Model file not found! Ensure `{file}` is in the same directory as the \
                 `stroke` executable, or pass --model. (looked for {})",
                path.display()
            )
        }
        LoadError::CapabilityUnavailable { capability, .. } => format!(
            "❌ The model needs `{capability}` support, which is not part of this build. \
             Rebuild with `--features {capability}`."
        ),
        other => format!("❌ Error loading model: {other}"),
    }
}

fn inference_error_message(err: &SessionError) -> String {
    format!("❌ An error occurred during prediction: {err}")
}

// ── Record card ──

fn record_card(record: &PatientRecord) -> Vec<String> {
    let mut lines = Vec::new();
    section(
        &mut lines,
        "Demographics",
        &[
            ("Age", record.age.to_string()),
            ("Gender", record.gender.to_string()),
            ("Ever married", yes_no(record.ever_married).to_string()),
            ("Residence type", record.residence_type.to_string()),
            ("Work type", record.work_type.to_string()),
        ],
    );
    section(
        &mut lines,
        "Health history",
        &[
            ("Hypertension", yes_no(record.hypertension).to_string()),
            ("Heart disease", yes_no(record.heart_disease).to_string()),
            (
                "Avg glucose level",
                format!("{:.1} mg/dL", record.avg_glucose_level),
            ),
            ("BMI", format!("{:.1}", record.bmi)),
        ],
    );
    section(
        &mut lines,
        "Lifestyle",
        &[("Smoking status", record.smoking_status.to_string())],
    );
    lines
}

fn section(lines: &mut Vec<String>, header: &str, rows: &[(&str, String)]) {
    lines.push(header.to_string());
    for (name, value) in rows {
        lines.push(format!("  {:<20} {}", name, value));
    }
}
