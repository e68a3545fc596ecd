use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Options shared by every subcommand.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Decoder configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    log_level: LevelFilter,
}

impl Args {
    /// Starts logging, then loads the decoder configuration.
    ///
    /// The file named by `--config`, or by `HARDY_BPV6_CONFIG_FILE`, is
    /// overlaid with `HARDY_BPV6_*` environment variables. Nested keys use
    /// `__`, e.g. `HARDY_BPV6_FILE_DELIVERY__SOURCE`.
    pub fn load(&self) -> anyhow::Result<hardy_bpv6::config::Config> {
        init_logger(self.log_level);

        let mut b = config::Config::builder();
        if let Some(source) = &self.config {
            info!(
                "Using configuration file '{}' specified on command line",
                source.display()
            );
            b = b.add_source(config::File::from(source.as_path()));
        } else if let Ok(source) = std::env::var("HARDY_BPV6_CONFIG_FILE") {
            info!(
                "Using configuration file '{source}' specified by HARDY_BPV6_CONFIG_FILE environment variable"
            );
            b = b.add_source(config::File::with_name(&source));
        }

        b = b.add_source(
            config::Environment::with_prefix("HARDY_BPV6")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = b
            .build()
            .and_then(|c| c.try_deserialize::<hardy_bpv6::config::Config>())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

        debug!("Decoder configuration: {config:?}");
        Ok(config)
    }
}

fn init_logger(log_level: LevelFilter) {
    // RUST_LOG overrides the command line level
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(log_level > LevelFilter::INFO)
        .init();
}
