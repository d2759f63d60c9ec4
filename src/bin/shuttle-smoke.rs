use clap::Parser;
use shuttle_pages::scenarios::{Group, Outcome, Scenario};
use shuttle_pages::{Config, Session};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Run the MyShuttle smoke scenarios against a live deployment.
#[derive(Debug, Parser)]
#[command(name = "shuttle-smoke", version, about)]
struct Cli {
    /// Config file to load instead of ./shuttle.toml.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    /// Only run the scenarios for one page.
    #[arg(long, value_enum)]
    only: Option<Group>,
}

fn init_logging(verbose: bool) {
    // RUST_LOG wins over --verbose
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "cannot load configuration");
            return ExitCode::from(2);
        }
    };

    let config = &config;
    let mut failures = 0usize;
    let mut total = 0usize;
    for scenario in Scenario::select(cli.only) {
        total += 1;
        let result = Session::run(config, |c| async move { scenario.run(&c, config).await }).await;
        match result {
            Ok(outcome) => {
                println!("{}", outcome);
                if !outcome.passed {
                    failures += 1;
                }
            }
            Err(e) => {
                tracing::error!(%scenario, error = %e, "scenario aborted");
                let outcome = Outcome {
                    name: scenario.name(),
                    passed: false,
                    detail: e.to_string(),
                };
                println!("{}", outcome);
                failures += 1;
            }
        }
    }

    println!(
        "\n{} scenarios, {} passed, {} failed",
        total,
        total - failures,
        failures
    );
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
