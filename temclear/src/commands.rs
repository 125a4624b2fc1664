use super::IOArgs;
use clap::Subcommand;

mod sweep;
pub use sweep::OutputFormat;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report each building's bid table and the composite market curve
    Curves {
        #[command(flatten)]
        io: IOArgs,
    },

    /// Clear a single offer and report how each building responds
    Clear {
        #[command(flatten)]
        io: IOArgs,

        /// The requested load reduction
        #[arg(long, allow_negative_numbers = true)]
        offer: f64,
    },

    /// Clear every offer of the configured schedule
    Sweep {
        #[command(flatten)]
        io: IOArgs,

        /// The report format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },
}
