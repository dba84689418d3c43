use clap::Parser;
use fleet_replay::app::broadcast::{Broadcaster, JsonLinesBroadcaster};
use fleet_replay::app::config::{OutputConfig, ReplayAppConfig};
use fleet_replay::app::session::{ReplayContext, ReplaySession, SessionError};
use fleet_replay_core::config::ReplayConfigurationError;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// replays the dataout log of a running ridesharing simulation as a stream of
/// JSON notifications
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// replay configuration TOML file
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,
    /// dataout log to follow, overriding the configuration file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
    /// process what is already in the log, then exit
    #[arg(long)]
    once: bool,
}

fn main() {
    env_logger::init();
    let args = CliArgs::parse();
    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<(), SessionError> {
    let mut config = ReplayAppConfig::from_path(&args.config)?;
    if let Some(log_file) = args.log_file {
        config.log_file = log_file;
    }
    let context = ReplayContext::from_config(&config)?;
    let broadcaster = build_broadcaster(&config.output)?;
    let mut session = ReplaySession::new(context, broadcaster);

    if args.once {
        let lines = session.drain()?;
        session.stop();
        log::info!("replayed {lines} lines, {:?}", session.stats());
        Ok(())
    } else {
        session.run_until_stopped()
    }
}

fn build_broadcaster(output: &OutputConfig) -> Result<Box<dyn Broadcaster>, SessionError> {
    match output {
        OutputConfig::Stdout => Ok(Box::new(JsonLinesBroadcaster::new(std::io::stdout()))),
        OutputConfig::File { path } => {
            let file = File::create(path).map_err(|e| {
                ReplayConfigurationError::UserConfigurationError(format!(
                    "unable to create output file {}: {e}",
                    path.display()
                ))
            })?;
            log::info!("writing notifications to {}", path.display());
            Ok(Box::new(JsonLinesBroadcaster::new(BufWriter::new(file))))
        }
    }
}
