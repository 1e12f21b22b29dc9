mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::{Args, Command};
use error::CliError;
use tracing::info;

fn run(args: Args) -> Result<i32, CliError> {
    match args.command {
        Command::Post {
            archive,
            work_dir,
            bucket_size,
            percent,
            top_count_limit,
        } => {
            let text = commands::post::run(&archive, work_dir, bucket_size, percent, top_count_limit)?;
            print!("{text}");
            Ok(0)
        }
        Command::Trace {
            device,
            duration_secs,
            out_dir,
        } => {
            commands::trace::run(&device, duration_secs, &out_dir)?;
            Ok(0)
        }
        Command::Live {
            device,
            duration_secs,
        } => {
            commands::live::run(&device, duration_secs)?;
            Ok(0)
        }
    }
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    info!("bioprof starting");

    let exit_code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(exit_code);
}
