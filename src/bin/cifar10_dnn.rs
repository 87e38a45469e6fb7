use cifar_dnn::dataset::cifar10::load_cifar10;
use cifar_dnn::experiment::{ExperimentConfig, run_variant};
use cifar_dnn::model_builder::ModelVariant;
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Trains deep fully-connected networks on CIFAR-10 and reports their learning curves
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory holding the CIFAR-10 binary batches
    #[arg(long, value_name = "PATH", default_value = "data/cifar-10-batches-bin")]
    data_dir: PathBuf,
    /// JSON experiment configuration; missing fields keep their defaults
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Variant to run (repeatable): plain_deep, partial_batch_norm, self_normalizing, self_normalizing_dropout
    #[arg(long = "variant", value_name = "NAME")]
    variants: Vec<ModelVariant>,
    /// Directory receiving one `<variant>_history.json` per run
    #[arg(long, value_name = "PATH")]
    report_dir: Option<PathBuf>,
    /// Also write the trained weights as `<variant>_model.json` into the report directory
    #[arg(long, requires = "report_dir")]
    save_models: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => ExperimentConfig::from_path(path)?,
        None => ExperimentConfig::default(),
    };
    if !cli.variants.is_empty() {
        config.variants = cli.variants.clone();
    }
    config.validate()?;

    let dataset = load_cifar10(&cli.data_dir)?;

    if let Some(dir) = &cli.report_dir {
        std::fs::create_dir_all(dir)?;
    }

    for &variant in &config.variants {
        let run = run_variant(&dataset, &config, variant)?;
        println!(
            "{}: test loss {:.4}, test accuracy {:.4}\n",
            variant, run.test_loss, run.test_accuracy
        );

        if let Some(dir) = &cli.report_dir {
            run.save_history(dir)?;
            if cli.save_models {
                run.save_model(dir)?;
            }
            info!(%variant, dir = %dir.display(), "report files written");
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();

    run(cli).inspect_err(|e| error!("{}", e))
}
