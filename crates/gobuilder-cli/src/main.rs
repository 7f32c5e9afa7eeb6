//! gobuilder CLI - cross-compile a Go program for several platforms at once.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gobuilder_core::{BuildParams, BuildRequest, BuildSummary, BuildTarget};
use gobuilder_runner::{Builder, RunnerConfig};

mod report;

/// gobuilder - parallel cross-platform Go builds
#[derive(Parser)]
#[command(name = "gobuilder", version)]
#[command(about = "Build a Go program for multiple platforms in parallel", long_about = None)]
struct Cli {
    /// Go executable to use
    #[arg(long, global = true, default_value = "go")]
    toolchain: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build for the given targets (Linux x64 and Windows x64 by default)
    Build {
        #[command(flatten)]
        common: CommonArgs,

        /// Target as goos/goarch or goos/goarch=Label (repeatable)
        #[arg(short, long = "target")]
        targets: Vec<BuildTarget>,

        /// Number of parallel build jobs (default 4)
        #[arg(short, long, default_value_t = 0)]
        jobs: i64,
    },

    /// Build Linux x64 and Windows x64 with two parallel jobs
    #[command(name = "quick-build")]
    QuickBuild {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// List supported build targets
    #[command(name = "list-targets")]
    ListTargets,
}

#[derive(Args)]
struct CommonArgs {
    /// Go source file (default ./main.go)
    #[arg(short, long, default_value = "")]
    source: String,

    /// Executable base name (default app)
    #[arg(short, long, default_value = "")]
    app: String,

    /// Output directory (default bin)
    #[arg(short, long, default_value = "")]
    output_dir: String,

    /// Print the build summary as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gobuilder=info,gobuilder_runner=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let config = RunnerConfig {
        toolchain: cli.toolchain,
        ..Default::default()
    };
    let builder = Builder::from_config(&config);

    let (params, json) = match cli.command {
        Commands::Build {
            common,
            targets,
            jobs,
        } => {
            let params = BuildParams {
                source_file: common.source,
                app_name: common.app,
                output_dir: common.output_dir,
                targets,
                jobs,
            };
            (params, common.json)
        }
        Commands::QuickBuild { common } => (
            BuildParams::quick(common.source, common.app, common.output_dir),
            common.json,
        ),
        Commands::ListTargets => {
            print!("{}", report::render_targets());
            return Ok(ExitCode::SUCCESS);
        }
    };

    run_build(&builder, params, json).await
}

async fn run_build(
    builder: &Builder,
    params: BuildParams,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let request = builder.resolve(params.clone());
    let cancel = CancellationToken::new();

    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling builds");
            on_interrupt.cancel();
        }
    });

    info!(targets = %target_list(&request), jobs = request.jobs.get(), "Resolved build request");

    let summary = match builder.build(params, cancel).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("❌ {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    print_summary(&request, &summary, json)?;

    Ok(if summary.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn target_list(request: &BuildRequest) -> String {
    request
        .targets
        .iter()
        .map(|t| format!("{}/{}", t.goos, t.goarch))
        .collect::<Vec<_>>()
        .join(",")
}

fn print_summary(
    request: &BuildRequest,
    summary: &BuildSummary,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{}", report::render_summary(request, summary));
    }
    Ok(())
}
