//! Application Configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `CHIPS_`-prefixed environment variables, then command line overrides.
//!
//! ```toml
//! snapshot = "registries.json"
//! url = "http://ha.local/dashboard-rooms/kitchen"
//!
//! [scope]
//! additional_label = "network"
//! features = ["optional"]
//!
//! [output]
//! format = "pretty"
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use status_chips::{Feature, ScopeConfig};
use tracing::debug;

use crate::types::Result;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "chips.toml";

/// Environment variable prefix (`CHIPS_SCOPE__AREA=kitchen`)
pub const ENV_PREFIX: &str = "CHIPS_";

/// How presented chip lists are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One compact JSON array per update
    #[default]
    Json,
    /// Indented JSON
    Pretty,
    /// Log lines only
    Log,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Full application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipsConfig {
    /// Registry snapshot document (.json or .toml)
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,
    /// Dashboard URL the card is shown on; its slug is the fallback area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub scope: ScopeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_snapshot() -> PathBuf {
    PathBuf::from("registries.json")
}

impl Default for ChipsConfig {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot(),
            url: None,
            scope: ScopeConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Values given on the command line; unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    pub scope: ScopeConfig,
}

impl ChipsConfig {
    /// Build the layered figment. `file` replaces the default `chips.toml`.
    pub fn figment(file: Option<&Path>, overrides: &Overrides) -> Figment {
        let file = file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let mut figment = Figment::from(Serialized::defaults(ChipsConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(snapshot) = &overrides.snapshot {
            figment = figment.merge(Serialized::default("snapshot", snapshot));
        }
        if let Some(url) = &overrides.url {
            figment = figment.merge(Serialized::default("url", url));
        }
        if let Some(format) = overrides.format {
            figment = figment.merge(Serialized::default("output.format", format));
        }
        figment.merge(Serialized::default("scope", &overrides.scope))
    }

    /// Load configuration from every layer.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let config: ChipsConfig = Self::figment(file, overrides).extract()?;
        debug!(?config, "configuration loaded");
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        self.scope = self.scope.normalized();
        self
    }
}

impl Overrides {
    /// Turn the `--optional` flag into a feature list entry.
    pub fn with_optional(mut self, optional: bool) -> Self {
        if optional {
            self.scope = self.scope.with_feature(Feature::Optional);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = ChipsConfig::load(None, &Overrides::default()).unwrap();
            assert_eq!(config, ChipsConfig::default());
            assert_eq!(config.scope.status_path(), "home");
            Ok(())
        });
    }

    #[test]
    fn test_file_env_and_cli_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "chips.toml",
                r#"
                snapshot = "home.json"
                url = "http://ha.local/dashboard-rooms/kitchen"

                [scope]
                area = "kitchen"
                additional_label = "network"
                features = []

                [output]
                format = "pretty"
                "#,
            )?;
            jail.set_env("CHIPS_SCOPE__AREA", "garage");

            let overrides = Overrides {
                url: Some("http://ha.local/x/hall".into()),
                scope: ScopeConfig::new().with_solo_label("lab"),
                ..Default::default()
            };
            let config = ChipsConfig::load(None, &overrides).unwrap();

            assert_eq!(config.snapshot, PathBuf::from("home.json"));
            assert_eq!(config.url.as_deref(), Some("http://ha.local/x/hall"));
            assert_eq!(config.output.format, OutputFormat::Pretty);
            assert_eq!(config.scope.area(), Some("garage"));
            assert_eq!(config.scope.additional_label(), Some("network"));
            assert_eq!(config.scope.solo_label(), Some("lab"));
            // empty feature list normalizes away
            assert_eq!(config.scope.features, None);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_and_optional_flag() {
        Jail::expect_with(|jail| {
            jail.create_file("card.toml", "[scope]\nstatus_path = \"overview\"\n")?;

            let overrides = Overrides::default().with_optional(true);
            let config = ChipsConfig::load(Some(Path::new("card.toml")), &overrides).unwrap();

            assert_eq!(config.scope.status_path(), "overview");
            assert!(config.scope.has_feature(Feature::Optional));
            Ok(())
        });
    }

    #[test]
    fn test_unknown_feature_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("chips.toml", "[scope]\nfeatures = [\"sparkles\"]\n")?;
            assert!(ChipsConfig::load(None, &Overrides::default()).is_err());
            Ok(())
        });
    }
}
