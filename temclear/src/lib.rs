use clap::Parser;
use std::path::PathBuf;
use tem_core::ParticipantId;

mod io;
pub use io::*;

mod commands;
pub use commands::*;

mod config;
pub use config::AppConfig;

mod session;
pub use session::*;

// The top-level arguments: an optional configuration file and the subcommand to execute
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "TEM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    pub fn evaluate(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Curves { io } => {
                let session = Session::load(io.read()?, io.read_remote()?)?;
                let output = io.write()?;
                serde_json::to_writer_pretty(output, &session.report())?;
            }
            Commands::Clear { io, offer } => {
                let session = Session::load(io.read()?, io.read_remote()?)?;
                let response = session.respond(offer)?;
                let output = io.write()?;
                serde_json::to_writer_pretty(output, &response)?;
            }
            Commands::Sweep { io, format } => {
                // only the sweep reads the configuration
                let config = AppConfig::load(self.config.as_deref())?;
                let offers = config.schedule.offers()?;
                let session = Session::load(io.read()?, io.read_remote()?)?;
                let responses = session.sweep(&offers)?;
                let mut output = io.write()?;
                format.write(&session, &responses, &mut output)?;
            }
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("participant {0} is defined both as a building and as a remote curve")]
    DuplicateParticipant(ParticipantId),
}
