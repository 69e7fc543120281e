mod display;
mod form;

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use inquire::{Confirm, InquireError};
use stroke_ai::{ModelLoader, Session, default_model_path};
use stroke_core::{Gender, PatientRecord, ResidenceType, SmokingStatus, WorkType, parse_yes_no};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "stroke",
    version,
    about = "Predict the likelihood of stroke from patient details"
)]
struct Cli {
    /// Model artifact [default: stroke_model.json beside the executable]
    #[arg(long, env = "STROKE_MODEL", global = true)]
    model: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fill in the patient form interactively (default)
    Form,
    /// Predict once from command-line values
    Predict(PredictArgs),
    /// Describe the loaded model
    Info,
}

#[derive(Args)]
struct PredictArgs {
    /// Age in years (1-120)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=120))]
    age: u8,

    #[arg(long, default_value = "Male", value_parser = Gender::from_str)]
    gender: Gender,

    #[arg(long, default_value = "No", action = ArgAction::Set, value_parser = parse_yes_no)]
    hypertension: bool,

    #[arg(long, default_value = "No", action = ArgAction::Set, value_parser = parse_yes_no)]
    heart_disease: bool,

    /// Average glucose level in mg/dL (0-300)
    #[arg(long, default_value_t = 0.0)]
    avg_glucose_level: f64,

    /// Body mass index (0-50)
    #[arg(long, default_value_t = 0.0)]
    bmi: f64,

    #[arg(long, default_value = "never smoked", value_parser = SmokingStatus::from_str)]
    smoking_status: SmokingStatus,

    #[arg(long, default_value = "Urban", value_parser = ResidenceType::from_str)]
    residence_type: ResidenceType,

    #[arg(long, default_value = "Private", value_parser = WorkType::from_str)]
    work_type: WorkType,

    #[arg(long, default_value = "No", action = ArgAction::Set, value_parser = parse_yes_no)]
    ever_married: bool,

    /// Print the table passed to the model
    #[arg(long)]
    show_table: bool,
}

impl PredictArgs {
    fn record(&self) -> PatientRecord {
        PatientRecord {
            age: self.age,
            gender: self.gender,
            hypertension: self.hypertension,
            heart_disease: self.heart_disease,
            avg_glucose_level: self.avg_glucose_level,
            bmi: self.bmi,
            smoking_status: self.smoking_status,
            residence_type: self.residence_type,
            work_type: self.work_type,
            ever_married: self.ever_married,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::info!("stroke v{}", env!("CARGO_PKG_VERSION"));

    let model_path = match cli.model {
        Some(path) => path,
        None => default_model_path().context("resolving the default model path")?,
    };
    let loader = ModelLoader::new(model_path);

    match cli.command.unwrap_or(Command::Form) {
        Command::Form => run_form(&loader),
        Command::Predict(args) => run_predict(&loader, &args),
        Command::Info => run_info(&loader),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Interactive loop: form → prediction → "again?" until the user cancels.
fn run_form(loader: &ModelLoader) -> anyhow::Result<ExitCode> {
    display::print_banner();

    let session = Session::start(loader);
    if let Some(err) = session.load_error() {
        display::print_load_error(err);
        return Ok(ExitCode::FAILURE);
    }

    let mut record = PatientRecord::default();
    loop {
        record = match form::prompt_record(&record) {
            Ok(r) => r,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("reading patient details"),
        };

        display::print_record(&record);
        match session.predict(&record) {
            Ok(prediction) => display::print_prediction(&prediction),
            Err(e) => display::print_inference_error(&e),
        }

        match Confirm::new("Predict again?").with_default(true).prompt() {
            Ok(true) => continue,
            Ok(false) | Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                break;
            }
            Err(e) => return Err(e).context("reading confirmation"),
        }
    }

    display::print_disclaimer();
    Ok(ExitCode::SUCCESS)
}

fn run_predict(loader: &ModelLoader, args: &PredictArgs) -> anyhow::Result<ExitCode> {
    let record = args.record();
    record.validate().context("invalid patient details")?;

    let session = Session::start(loader);
    if let Some(err) = session.load_error() {
        display::print_load_error(err);
        return Ok(ExitCode::FAILURE);
    }

    if args.show_table {
        let table = record
            .to_record_batch()
            .context("building patient table")?;
        display::print_table(&table)?;
    }

    match session.predict(&record) {
        Ok(prediction) => {
            display::print_prediction(&prediction);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            display::print_inference_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_info(loader: &ModelLoader) -> anyhow::Result<ExitCode> {
    match loader.load() {
        Ok(model) => {
            display::print_model_info(&model.info(), loader.path());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            display::print_load_error(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}
