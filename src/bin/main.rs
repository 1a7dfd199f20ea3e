//! plattsvm Command Line Interface
//!
//! Trains a binary SVM with Platt's SMO on delimited text data and reports
//! the fitted parameters or held-out metrics.

use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use plattsvm::api::{TrainedModel, SVM};
use plattsvm::core::{OptimizerConfig, Result, SmoVariant};
use plattsvm::{DenseDataset, KernelSpec};
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "plattsvm")]
#[command(about = "Binary Support Vector Machine trained with Platt's SMO")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on a dataset and print the fitted model
    Train(TrainArgs),
    /// Train on one file and report metrics on another
    Evaluate(EvaluateArgs),
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file (tab, comma or space separated, label last)
    #[arg(long)]
    data: PathBuf,

    #[command(flatten)]
    options: TrainingOptions,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Training data file
    #[arg(long)]
    train: PathBuf,

    /// Test data file
    #[arg(long)]
    test: PathBuf,

    #[command(flatten)]
    options: TrainingOptions,
}

#[derive(Args)]
struct TrainingOptions {
    /// Regularization parameter C
    #[arg(short = 'C', long, default_value = "1.0")]
    c: f64,

    /// KKT tolerance
    #[arg(short, long, default_value = "0.001")]
    tolerance: f64,

    /// Maximum passes (idle passes for the simplified variant)
    #[arg(short, long, default_value = "40")]
    max_iterations: usize,

    /// Kernel: linear or rbf
    #[arg(short, long, default_value = "linear")]
    kernel: String,

    /// RBF bandwidth
    #[arg(long)]
    bandwidth: Option<f64>,

    /// Seed for the random pair selection
    #[arg(long)]
    seed: Option<u64>,

    /// SMO variant: platt or simplified
    #[arg(long, default_value = "platt")]
    variant: String,
}

impl TrainingOptions {
    fn build(&self) -> Result<SVM<KernelSpec>> {
        let kernel = KernelSpec::from_tag(&self.kernel, self.bandwidth)?;
        let config = OptimizerConfig {
            c: self.c,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            variant: self.variant.parse::<SmoVariant>()?,
            seed: self.seed,
            ..OptimizerConfig::default()
        };
        config.validate()?;

        info!(
            "Parameters: kernel={kernel}, C={}, tol={}, max_iter={}, variant={}",
            config.c, config.tolerance, config.max_iterations, config.variant
        );
        Ok(SVM::with_kernel(kernel).with_config(config))
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    let svm = args.options.build()?;

    info!("Loading training data from: {:?}", args.data);
    let dataset = DenseDataset::from_file(&args.data)?;
    info!(
        "Loaded {} samples with {} dimensions",
        dataset.len(),
        dataset.dim()
    );

    let start = Instant::now();
    let model = svm.train(&dataset)?;
    let elapsed = start.elapsed();

    print_model(&model, &dataset);

    let accuracy = model.evaluate(&dataset)?;
    println!("\nTraining accuracy: {:.2}%", accuracy * 100.0);
    println!("Training time: {}", format_duration(elapsed));

    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    let svm = args.options.build()?;

    info!("Quick evaluation: train on {:?}, test on {:?}", args.train, args.test);
    let train = DenseDataset::from_file(&args.train)?;
    let test = DenseDataset::from_file(&args.test)?;

    let start = Instant::now();
    let model = svm.train(&train)?;
    let elapsed = start.elapsed();

    let info = model.info();
    let training = model.evaluate_detailed(&train)?;
    let metrics = model.evaluate_detailed(&test)?;

    println!("=== Model Evaluation ===");
    println!("Support vectors: {}", info.n_support_vectors);
    println!("Passes: {} (converged: {})", info.iterations, info.converged);
    println!("Training errors: {}/{}", training.errors(), training.total());

    println!("\nTest Results:");
    println!("  Accuracy:        {:.2}%", metrics.accuracy() * 100.0);
    println!("  Errors:          {}/{}", metrics.errors(), metrics.total());
    println!("  True Positives:  {}", metrics.true_positives);
    println!("  True Negatives:  {}", metrics.true_negatives);
    println!("  False Positives: {}", metrics.false_positives);
    println!("  False Negatives: {}", metrics.false_negatives);
    println!("  Precision:       {:.4}", metrics.precision());
    println!("  Recall:          {:.4}", metrics.recall());
    println!("  F1 Score:        {:.4}", metrics.f1_score());
    println!("  Specificity:     {:.4}", metrics.specificity());
    println!("\nTraining time: {}", format_duration(elapsed));

    Ok(())
}

fn print_model(model: &TrainedModel<KernelSpec>, dataset: &DenseDataset) {
    let info = model.info();

    println!("Beta: {:.6}", info.bias);
    println!("Passes: {} (converged: {})", info.iterations, info.converged);
    println!("Dual objective: {:.6}", info.objective_value);

    println!("\nAlphas (greater than zero):");
    for (&idx, alpha) in info.support_vector_indices.iter().zip(&info.alphas) {
        println!("  α{idx}: {alpha:.6}");
    }

    println!("\nSupport vectors ({}):", info.n_support_vectors);
    for &idx in &info.support_vector_indices {
        println!("  {} {:+}", dataset.row(idx), dataset.labels()[idx]);
    }

    if let Some(weights) = &info.weights {
        println!("\nWeights: {weights:?}");
    }
}

fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 1.0 {
        format!("{:.4} milliseconds", secs * 1000.0)
    } else {
        format!("{secs:.4} seconds")
    }
}
