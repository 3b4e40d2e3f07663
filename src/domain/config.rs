use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// User configuration for the flashcard trainer.
///
/// This struct holds settings that control terminal presentation and the
/// default card files used at startup.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Whether verdict messages are coloured on the terminal.
    ///
    /// The transcript is always plain text regardless of this setting.
    pub color: ColorMode,

    /// Card file imported at startup when `--import_from` is not given.
    pub import_from: Option<PathBuf>,

    /// Card file written at startup when `--export_to` is not given.
    pub export_to: Option<PathBuf>,
}

/// When to colour terminal output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colour when standard output supports it.
    #[default]
    Auto,
    /// Always colour.
    Always,
    /// Never colour.
    Never,
}

impl ColorMode {
    /// Resolves the mode against the capabilities of standard output.
    #[must_use]
    pub fn enabled(self) -> bool {
        match self {
            Self::Auto => crate::terminal::supports_color(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration if the file exists, falling back to defaults
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, String> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        color: ColorMode,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        import_from: Option<PathBuf>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        export_to: Option<PathBuf>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                color,
                import_from,
                export_to,
            } => Self {
                color,
                import_from,
                export_to,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            color: config.color,
            import_from: config.import_from,
            export_to: config.export_to,
        }
    }
}
