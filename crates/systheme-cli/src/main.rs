//! `systheme-watch`: print the OS dark-mode preference and every change.

mod logging;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use systheme::{
    BridgeConfig, HostApplication, OsPreferenceQuery, Ports, PreferenceQuery,
    ThemePreferenceBridge,
};

use output::{Format, LineSink};

#[derive(Debug, Parser)]
#[command(name = "systheme-watch", version, about)]
struct Cli {
    /// Print the current preference and exit.
    #[arg(long)]
    once: bool,

    /// Watcher poll interval in milliseconds.
    #[arg(long, value_name = "N")]
    poll_ms: Option<u64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// YAML config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log bridge activity to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn bridge_config(&self) -> Result<BridgeConfig> {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => BridgeConfig::default(),
        };
        if let Some(ms) = self.poll_ms {
            config.poll_interval_ms = ms;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.bridge_config()?;
    tracing::debug!(?config, "starting");

    let sink = LineSink::new(config.channel.clone(), cli.format, std::io::stdout());
    let host =
        HostApplication::new().with_ports(Ports::new().register(&config.channel, Arc::new(sink)));
    let query = OsPreferenceQuery::from_config(&config);

    if cli.once {
        if let Some(channel) = host.channel(&config.channel) {
            channel.send(query.matches());
        }
        return Ok(());
    }

    let bridge = ThemePreferenceBridge::from_config(Some(&host), &config);
    if let Some(listener) = bridge.on_ready(&query)? {
        listener.run();
    }
    Ok(())
}
