use clap::Parser;
use process_text::app::{handle_fatal_error, init_logging, AppConfig, Invocation};
use process_text::config::ConfigLoader;
use process_text::subprocess::SubprocessManager;
use process_text::transform::TransformKind;
use std::path::PathBuf;
use tracing::debug;

/// Transform text with a snippet of code and emit Alfred script filter JSON
#[derive(Parser)]
#[command(name = "process-text", version)]
#[command(about = "Transform text with Python, shell, JavaScript or jq", long_about = None)]
struct Cli {
    /// Enable verbose logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Which transform to apply
    transform: TransformKind,

    /// Code to run against the input; a trailing `?` shows help instead
    code: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let app_config = AppConfig::new(cli.verbose).with_config_path(cli.config.clone());
    init_logging(&app_config);

    if let Err(e) = run(&app_config, cli).await {
        handle_fatal_error(e, app_config.verbose);
    }
}

async fn run(app_config: &AppConfig, cli: Cli) -> anyhow::Result<()> {
    let config = ConfigLoader::new(app_config.config_path.clone())
        .load()
        .await?;
    debug!("Using configuration: {:?}", config);

    let invocation = Invocation::new(cli.transform, cli.code);
    let feedback =
        process_text::app::run(&config, SubprocessManager::production(), &invocation).await?;

    println!("{}", feedback.to_json()?);
    Ok(())
}
