//! Correctness Eval CLI
//!
//! Generates answers for a labeled JSONL dataset and grades them with an
//! LLM judge.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use correctness_eval::{
    config::Config, generator::LlmGenerator, judge::LlmJudge, llm::LlmClient, metric::GEval,
    runner::Pipeline,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Correctness Eval - grade model answers with an LLM judge
#[derive(Parser)]
#[command(name = "correctness-eval")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate answers and judge them (default)
    Run(RunArgs),

    /// Test LLM connection
    Test,
}

#[derive(Args)]
struct RunArgs {
    /// JSONL dataset with one {"input", "ideal"} object per line
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Model that generates answers
    #[arg(long)]
    gen_model: Option<String>,

    /// Model that judges correctness
    #[arg(long)]
    judge_model: Option<String>,

    /// Pass threshold in [0, 1]
    #[arg(long)]
    threshold: Option<f64>,

    /// Binary grading (threshold becomes 1.0)
    #[arg(long)]
    strict: bool,

    /// Save the report to a JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run(args)) => {
            init_tracing(args.verbose);
            cmd_run(args).await
        }
        Some(Commands::Test) => {
            init_tracing(false);
            cmd_test().await
        }
        None => {
            init_tracing(cli.run.verbose);
            cmd_run(cli.run).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn cmd_run(args: RunArgs) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    if let Some(dataset) = args.dataset {
        config.eval.dataset = dataset;
    }
    if let Some(model) = args.gen_model {
        config.generator.model = model;
    }
    if let Some(model) = args.judge_model {
        config.judge.model = model;
    }
    if let Some(threshold) = args.threshold {
        config.eval.threshold = threshold;
    }
    if args.strict {
        config.eval.strict = true;
    }

    config.validate().context("Invalid configuration")?;

    info!(
        dataset = %config.eval.dataset.display(),
        gen_model = %config.generator.model,
        judge_model = %config.judge.model,
        "starting evaluation"
    );

    let metric = GEval::correctness(config.judge.model.clone())
        .with_threshold(config.eval.threshold)
        .strict(config.eval.strict);

    let pipeline = Pipeline::new(
        LlmGenerator::from_config(config.generator.clone()),
        LlmJudge::from_config(config.judge.clone()),
        vec![metric],
    );

    let report = pipeline
        .run_file(&config.eval.dataset)
        .await
        .with_context(|| format!("Evaluation of '{}' failed", config.eval.dataset.display()))?;

    report.print();

    if report.all_passed() {
        info!(cases = report.summary.total, "all test cases passed");
    } else {
        warn!(
            failed = report.summary.failed,
            total = report.summary.total,
            "some test cases failed"
        );
    }

    if let Some(output) = args.output {
        report
            .save_json(&output)
            .context("Failed to save evaluation report")?;
        println!("Results saved to {}", output.display());
    }

    Ok(())
}

async fn cmd_test() -> Result<()> {
    println!("Testing LLM connection...\n");

    let config = Config::load().context("Failed to load configuration")?;

    println!("Configuration:");
    println!("  API Base:     {}", config.generator.api_base);
    println!("  Gen model:    {}", config.generator.model);
    println!("  Judge model:  {}", config.judge.model);
    println!(
        "  API Key:      {}...",
        config.generator.api_key.chars().take(8).collect::<String>()
    );
    println!();

    config.validate().context("Invalid configuration")?;

    let mut failures = 0;
    for (role, llm) in [("generator", &config.generator), ("judge", &config.judge)] {
        let client = LlmClient::new(llm.clone());
        println!("Sending test request to {} ({})...", role, llm.model);
        match client.test_connection().await {
            Ok(()) => println!("  Connection successful!"),
            Err(e) => {
                println!("  Connection failed: {}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of 2 connection checks failed", failures);
    }

    Ok(())
}
