//! Churn CLI - headless front end of the churn predictor
//!
//! Scores a single customer from flags, scores a CSV file of customers, or
//! prints what the loaded artifacts contain.
//!
//! # Usage
//! ```sh
//! cargo run --bin churn-cli -- predict --age 52 --country Germany --active-member 0
//! cargo run --bin churn-cli -- batch --input customers.csv --output scores.csv
//! cargo run --bin churn-cli -- --model-dir /srv/churn/model inspect
//! ```
//!
//! # Environment Variables
//! - `CHURN_CONFIG` - Optional TOML config file (overridden by `--config`)
//! - `CHURN_MODEL_DIR` - Directory holding the artifacts (default: model)
//! - `LOG_FORMAT` / `LOG_LEVEL` - Logging output (default: pretty / info)

use anyhow::{Context, Result};
use churn_predictor::application::ml::batch::summarize;
use churn_predictor::application::ml::{InferenceContext, score_batch};
use churn_predictor::config::Config;
use churn_predictor::domain::customer::CustomerProfile;
use churn_predictor::domain::ml::feature_registry::FEATURE_NAMES;
use churn_predictor::domain::ports::{CategoryEncoder, ChurnClassifier, FeatureScaler};
use churn_predictor::infrastructure::batch_csv::{read_profiles, write_outcomes};
use churn_predictor::infrastructure::load_artifacts;
use churn_predictor::infrastructure::observability::init_tracing;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bank customer churn predictor", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the classifier, scaler and gender encoder
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Predict churn for a single customer
    Predict {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score every row of a CSV file
    Batch {
        /// Input CSV with one customer per row
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the feature registry and the loaded artifacts
    Inspect,
}

/// Customer attributes; anything omitted keeps the form default
#[derive(Args, Debug, Default)]
struct ProfileArgs {
    /// Credit score (300-850)
    #[arg(long)]
    credit_score: Option<i64>,

    /// Gender (Male, Female)
    #[arg(long)]
    gender: Option<String>,

    /// Age in years (18-100)
    #[arg(long)]
    age: Option<i64>,

    /// Years with the bank (0-10)
    #[arg(long)]
    tenure: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    balance: Option<f64>,

    /// Number of products held (1-4)
    #[arg(long)]
    products_number: Option<i64>,

    /// Has a credit card (0 or 1)
    #[arg(long)]
    credit_card: Option<i64>,

    /// Is an active member (0 or 1)
    #[arg(long)]
    active_member: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    estimated_salary: Option<f64>,

    /// Country (France, Germany, Spain)
    #[arg(long)]
    country: Option<String>,
}

impl ProfileArgs {
    fn into_profile(self) -> CustomerProfile {
        let defaults = CustomerProfile::default();
        CustomerProfile {
            credit_score: self.credit_score.unwrap_or(defaults.credit_score),
            gender: self.gender.unwrap_or(defaults.gender),
            age: self.age.unwrap_or(defaults.age),
            tenure: self.tenure.unwrap_or(defaults.tenure),
            balance: self.balance.unwrap_or(defaults.balance),
            products_number: self.products_number.unwrap_or(defaults.products_number),
            credit_card: self.credit_card.unwrap_or(defaults.credit_card),
            active_member: self.active_member.unwrap_or(defaults.active_member),
            estimated_salary: self.estimated_salary.unwrap_or(defaults.estimated_salary),
            country: self.country.unwrap_or(defaults.country),
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_tracing(&config.logging);

    let paths = config.artifacts.paths();
    let context = load_artifacts(&paths).context("Failed to load model artifacts")?;

    match cli.command {
        Commands::Predict { profile, json } => run_predict(&context, profile.into_profile(), json),
        Commands::Batch { input, output } => run_batch(&context, &input, output.as_deref()),
        Commands::Inspect => {
            run_inspect(&context);
            Ok(())
        }
    }
}

/// `--config` beats `CHURN_CONFIG`; `--model-dir` beats everything else.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let file = cli
        .config
        .clone()
        .or_else(|| std::env::var("CHURN_CONFIG").ok().map(PathBuf::from));
    let mut config = Config::load(file.as_deref(), |key| std::env::var(key).ok())?;

    if let Some(dir) = &cli.model_dir {
        config.artifacts.model_dir = dir.clone();
    }
    Ok(config)
}

fn run_predict(context: &InferenceContext, profile: CustomerProfile, json: bool) -> Result<()> {
    let result = context
        .predict_profile(&profile)
        .context("Prediction rejected")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.headline());
        println!("Churn Probability: {:.2}%", result.probability * 100.0);
    }
    Ok(())
}

fn run_batch(context: &InferenceContext, input: &Path, output: Option<&Path>) -> Result<()> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open input CSV: {}", input.display()))?;
    let rows = read_profiles(file);
    info!("Scoring {} rows from {}", rows.len(), input.display());

    let outcomes = score_batch(context, rows);

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output CSV: {}", path.display()))?;
            write_outcomes(BufWriter::new(file), &outcomes)?;
            info!("Scores written to {}", path.display());
        }
        None => write_outcomes(io::stdout().lock(), &outcomes)?,
    }

    let summary = summarize(&outcomes);
    eprintln!(
        "Scored {} rows: {} likely to churn, {} failed",
        summary.scored, summary.churned, summary.failed
    );
    Ok(())
}

fn run_inspect(context: &InferenceContext) {
    println!("Features ({}):", FEATURE_NAMES.len());
    for (idx, name) in FEATURE_NAMES.iter().enumerate() {
        println!("  f{:<2} {}", idx, name);
    }
    println!(
        "Gender encoder classes: {}",
        context.gender_encoder().classes().join(", ")
    );
    println!("Scaler: {}", context.scaler().kind());
    println!("Classifier: {}", context.classifier().name());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "churn-cli",
            "--model-dir",
            "/tmp/model",
            "predict",
            "--age",
            "52",
            "--country",
            "Germany",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.model_dir, Some(PathBuf::from("/tmp/model")));
        let Commands::Predict { profile, json } = cli.command else {
            panic!("expected predict");
        };
        assert!(json);

        let profile = profile.into_profile();
        assert_eq!(profile.age, 52);
        assert_eq!(profile.country, "Germany");
        assert_eq!(profile.credit_score, 650);
        assert_eq!(profile.gender, "Male");
    }

    #[test]
    fn test_empty_profile_args_are_form_defaults() {
        assert_eq!(
            ProfileArgs::default().into_profile(),
            CustomerProfile::default()
        );
    }

    #[test]
    fn test_batch_requires_input() {
        assert!(Cli::try_parse_from(["churn-cli", "batch"]).is_err());

        let cli = Cli::try_parse_from(["churn-cli", "batch", "-i", "in.csv"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Batch { output: None, .. }
        ));
    }
}
