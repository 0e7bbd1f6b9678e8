mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pkisync_lib::policy::State;

use crate::cmd::DeviceArgs;

/// pkisync - declarative PKI configuration reconciler
#[derive(Parser)]
#[command(name = "pkisync")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Device state file (default: $PKISYNC_DEVICE or the user data directory)
  #[arg(long, global = true)]
  device: Option<PathBuf>,

  /// Root of the PKI resource tree on the device
  #[arg(long, global = true)]
  path_root: Option<String>,

  /// Print machine-readable JSON
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show the requests that would converge the device (nothing is sent)
  Plan {
    /// Desired configuration (YAML or JSON). Omitted means empty
    want: Option<PathBuf>,

    /// Reconciliation mode: merged, replaced, overridden or deleted
    #[arg(short, long, default_value = "merged")]
    state: State,
  },

  /// Converge the device to the desired configuration
  Apply {
    /// Desired configuration (YAML or JSON). Omitted means empty
    want: Option<PathBuf>,

    /// Reconciliation mode: merged, replaced, overridden or deleted
    #[arg(short, long, default_value = "merged")]
    state: State,

    /// Compute and report requests without sending them
    #[arg(long)]
    check: bool,
  },

  /// Print the device's current configuration
  Show,

  /// Show what differs between the desired configuration and the device
  Diff {
    /// Desired configuration (YAML or JSON)
    want: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let device = DeviceArgs {
    device: cli.device,
    path_root: cli.path_root,
  };

  match cli.command {
    Commands::Plan { want, state } => cmd::cmd_plan(&device, want.as_deref(), state, cli.verbose, cli.json),
    Commands::Apply { want, state, check } => {
      cmd::cmd_apply(&device, want.as_deref(), state, check, cli.verbose, cli.json)
    }
    Commands::Show => cmd::cmd_show(&device, cli.verbose, cli.json),
    Commands::Diff { want } => cmd::cmd_diff(&device, &want, cli.verbose, cli.json),
  }
}
