use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use feedback_sync::configuration::{Config, Overrides};
use feedback_sync::controller::{Command, Controller};

#[derive(Parser)]
#[command(name = "feedback-sync")]
#[command(version)]
#[command(about = "Feedback collection client with an offline fallback store")]
struct Args {
    /// TOML configuration file; built-in defaults are used without it
    #[arg(long, global = true, env = "FEEDBACK_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let args = Args::parse();

    info!("Importing configuration");
    let config = match Config::load(args.config.as_deref(), &args.overrides) {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to import configuration: {}", e);
            std::process::exit(1);
        }
    };

    let controller = match Controller::from_config(config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Unable to create a controller instance: {}, exiting...", e);
            std::process::exit(1);
        }
    };

    match controller.run(args.command).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
