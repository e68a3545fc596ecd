use super::*;
use hardy_bpv6::{bundle::ParsedBundle, config::Config};

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct Command {
    /// Report advisory findings as well as errors.
    #[arg(short, long)]
    verbose: bool,

    /// The list of bundle files to validate, '-' to use stdin.
    files: Vec<io::Input>,
}

pub fn exec(args: Command, config: &Config) -> anyhow::Result<()> {
    if args.files.is_empty() {
        return Err(anyhow::anyhow!("No files to validate"));
    }

    let mut count_failed: usize = 0;
    for input in args.files {
        let bundle = input
            .read_all()
            .map_err(|e| anyhow::anyhow!("Failed to read input from {}: {e}", input.filepath()))?;

        match ParsedBundle::parse(&bundle, config) {
            Err(e) => {
                eprintln!("{}: Not a BPv6 bundle: {e}", input.filepath());
                count_failed = count_failed.saturating_add(1);
            }
            Ok(parsed) => {
                for d in &parsed.diagnostics {
                    if args.verbose || d.is_error() {
                        eprintln!("{}: {d}", input.filepath());
                    }
                }
                if let Some(e) = &parsed.error {
                    eprintln!(
                        "{}: Decoding stopped at offset {}: {e}",
                        input.filepath(),
                        parsed.length
                    );
                }
                if !parsed.is_complete() {
                    count_failed = count_failed.saturating_add(1);
                }
            }
        }
    }

    (count_failed == 0)
        .then_some(())
        .ok_or(anyhow::anyhow!("{count_failed} files failed to validate"))
}
