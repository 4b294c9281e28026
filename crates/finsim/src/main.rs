use std::path::PathBuf;

use clap::{Parser, Subcommand};
use finsim::{DataDirectory, commands, init_logging};

#[derive(Parser, Debug)]
#[command(name = "finsim")]
#[command(about = "A day-by-day personal finance ledger simulator")]
struct Args {
    /// Path to the data directory (default: ~/.finsim/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a simulation from a scenario file and run it
    Run {
        scenario: PathBuf,
        /// Number of days to simulate
        #[arg(long)]
        days: u64,
        /// Save the result under this snapshot name
        #[arg(long)]
        save: Option<String>,
    },
    /// Continue a saved simulation
    Resume {
        name: String,
        #[arg(long)]
        days: u64,
        #[arg(long)]
        save: Option<String>,
    },
    /// Print balances of a saved simulation
    Report {
        name: String,
        /// Print one account's statement instead
        #[arg(long)]
        account: Option<String>,
    },
    /// Compare a saved simulation against a fork with extra scenario entries
    WhatIf {
        name: String,
        #[arg(long)]
        scenario: PathBuf,
        #[arg(long)]
        days: u64,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = DataDirectory::new(args.data_dir.unwrap_or_else(DataDirectory::default_path));

    let _guard = init_logging(data_dir.root(), &args.log_level)?;

    let output = match args.command {
        Command::Run {
            scenario,
            days,
            save,
        } => commands::run(&data_dir, &scenario, days, save.as_deref())?,
        Command::Resume { name, days, save } => {
            commands::resume(&data_dir, &name, days, save.as_deref())?
        }
        Command::Report { name, account } => {
            commands::report(&data_dir, &name, account.as_deref())?
        }
        Command::WhatIf {
            name,
            scenario,
            days,
        } => commands::what_if(&data_dir, &name, &scenario, days)?,
    };
    print!("{output}");

    tracing::info!("finsim finished");
    Ok(())
}
