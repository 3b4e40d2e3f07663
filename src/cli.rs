use std::{
    io,
    path::{Path, PathBuf},
};

use clap::ArgAction;
use flashcards::{Config, Session};
use tracing::instrument;

/// Placeholder file name meaning "no file".
const NO_FILE: &str = "nothing.txt";

/// The most process arguments accepted, including the program name.
const MAX_ARGS: usize = 3;

/// Environment variable overriding the configuration file location.
const CONFIG_ENV: &str = "FLASHCARDS_CONFIG";
const DEFAULT_CONFIG: &str = "flashcards.toml";

/// Aborts on too many process arguments.
pub fn check_arg_count(count: usize) -> anyhow::Result<()> {
    if count > MAX_ARGS {
        anyhow::bail!("Error! Maximum count of arguments <= {MAX_ARGS}.");
    }
    Ok(())
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Card file to import before the session starts
    #[arg(long = "import_from", value_name = "FILE", default_value = NO_FILE)]
    import_from: PathBuf,

    /// Card file to export to before the session starts
    #[arg(long = "export_to", value_name = "FILE", default_value = NO_FILE)]
    export_to: PathBuf,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config()?;
        let import_from = requested(self.import_from, config.import_from);
        let export_to = requested(self.export_to, config.export_to);

        let mut session =
            Session::new(io::stdin().lock(), io::stdout().lock()).with_color(config.color.enabled());

        if let Some(path) = import_from {
            session.import_from(&path)?;
        }
        if let Some(path) = export_to {
            session.export_to(&path)?;
        }

        session.run()?;
        Ok(())
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout belongs to the session
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[instrument]
fn load_config() -> anyhow::Result<Config> {
    let path = std::env::var_os(CONFIG_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    Config::load_or_default(&path).map_err(|e| anyhow::anyhow!("{e}"))
}

/// Resolves a file flag against its configured fallback.
fn requested(flag: PathBuf, fallback: Option<PathBuf>) -> Option<PathBuf> {
    if !is_placeholder(&flag) {
        return Some(flag);
    }
    fallback.filter(|path| !is_placeholder(path))
}

fn is_placeholder(path: &Path) -> bool {
    path == Path::new(NO_FILE)
}
