use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod inspect;
mod io;
mod settings;
mod validate;

/// A CLI tool for decoding and checking BPv6 bundles.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: settings::Args,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a bundle and display its contents.
    Inspect(inspect::Command),

    /// Check one or more bundles for validity.
    Validate(validate::Command),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = cli.settings.load().and_then(|config| match cli.command {
        Commands::Inspect(args) => args.exec(&config),
        Commands::Validate(args) => validate::exec(args, &config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
