//! fuzzy-failure CLI
//!
//! Predicts machine failure from operator readings and prints the
//! membership curves of the inference system.

use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fuzzy_failure::machine::{self, FailurePredictor, SensorReadings, DEFAULT_THRESHOLD, SAMPLE_AIR_TEMPERATURE};
use fuzzy_failure::{InferenceSystem, SystemDefinition};

// Reproduces the sample process temperature of 308.7 K
const DEFAULT_TEMP_DIFFERENCE: f64 = 10.5;

#[derive(Debug, Parser)]
#[command(name = "fuzzy-failure", version, about = "Fuzzy-logic machine failure prediction")]
struct Cli {
    /// TOML system definition to use instead of the built-in one
    #[arg(long, global = true, env = "FUZZY_FAILURE_DEFINITION")]
    definition: Option<PathBuf>,

    /// Log evaluation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Predict machine failure from one set of readings
    Predict(PredictArgs),
    /// Print the membership curves of every variable as JSON
    View {
        /// Only this variable
        #[arg(long)]
        variable: Option<String>,
    },
    /// Print the system definition as TOML
    Definition,
}

#[derive(Debug, clap::Args)]
struct PredictArgs {
    /// Rotational speed [rpm]
    #[arg(long)]
    rotational_speed: f64,

    /// Torque [Nm]
    #[arg(long)]
    torque: f64,

    /// Tool wear [min]
    #[arg(long)]
    tool_wear: f64,

    /// Process minus air temperature [K]
    #[arg(long, default_value_t = DEFAULT_TEMP_DIFFERENCE)]
    temp_difference: f64,

    /// Air temperature [K]
    #[arg(long, default_value_t = SAMPLE_AIR_TEMPERATURE)]
    air_temperature: f64,

    /// Process temperature [K]; overrides air temperature + difference
    #[arg(long)]
    process_temperature: Option<f64>,

    /// Score above which failure is predicted
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,
}

impl PredictArgs {
    fn readings(&self) -> SensorReadings {
        let readings = SensorReadings::from_operator(
            self.rotational_speed,
            self.torque,
            self.tool_wear,
            self.air_temperature,
            self.temp_difference,
        );

        match self.process_temperature {
            Some(process) => readings.with(machine::Sensor::ProcessTemperature, process),
            None => readings,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let definition = match &cli.definition {
        Some(path) => SystemDefinition::from_file(path)
            .with_context(|| format!("Failed to load definition from {}", path.display()))?,
        None => machine::definition(),
    };

    match cli.command {
        Command::Predict(args) => predict(build(&definition)?, &args),
        Command::View { variable } => view(&build(&definition)?, variable.as_deref()),
        Command::Definition => {
            print!("{}", definition.to_toml()?);
            Ok(())
        },
    }
}

fn build(definition: &SystemDefinition) -> anyhow::Result<InferenceSystem> {
    definition.build().context("Invalid inference system")
}

fn predict(system: InferenceSystem, args: &PredictArgs) -> anyhow::Result<()> {
    let predictor = FailurePredictor::new(system).with_threshold(args.threshold);
    let prediction = predictor.predict(&args.readings())?;

    match (prediction.score, prediction.verdict) {
        (Some(score), verdict) => {
            println!("Predicted Machine Failure: {score}");
            println!("Verdict: {verdict}");
        },
        (None, _) => {
            println!("Predicted Machine Failure: undetermined (no rule fired)");
        },
    }

    if let Some(derived) = prediction.derived {
        println!("Power: {:.2} W", derived.power);
        println!("Strain: {:.2}", derived.strain);
    }

    Ok(())
}

fn view(system: &InferenceSystem, variable: Option<&str>) -> anyhow::Result<()> {
    let plots = match variable {
        Some(name) => vec![system
            .variable(name)
            .ok_or_else(|| anyhow!("Unknown variable `{name}`"))?
            .view()],
        None => system.variables().map(|v| v.view()).collect(),
    };

    println!("{}", serde_json::to_string_pretty(&plots)?);

    Ok(())
}
