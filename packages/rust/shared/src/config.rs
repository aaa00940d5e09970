//! Application configuration and the tenant site registry.
//!
//! User config lives at `~/.notipress/notipress.toml` and is loaded once at
//! startup; everything in it is immutable for the process lifetime. The
//! `[[sites]]` array is the ordered tenant sequence, wrapped by
//! [`SiteRegistry`] for host resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NotipressError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "notipress.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".notipress";

// ---------------------------------------------------------------------------
// Config structs (matching notipress.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root directory for per-site assets (custom stylesheets).
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Content store connection settings.
    #[serde(default)]
    pub notion: NotionConfig,

    /// Configured sites, in registry order.
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            notion: NotionConfig::default(),
            sites: Vec::new(),
        }
    }
}

/// `[notion]` section — content store credential and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// API integration token (bearer credential).
    #[serde(default)]
    pub token: String,

    /// API base URL. Overridable for testing against a local mock.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. An expired request fails the whole
    /// digest build.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("user-assets")
}
fn default_base_url() -> String {
    "https://api.notion.com".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[[sites]]` entry — one hosted tenant, keyed by request hostname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Hostname this site serves (unique key within the registry).
    pub host: String,

    /// Marks this site as the fallback for unknown hosts.
    #[serde(default)]
    pub default: bool,

    /// Relative path of a custom stylesheet under `assets_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,

    /// Site display title.
    pub title: String,

    /// Site subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,

    /// Copyright notice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,

    /// The store collection holding this site's posts.
    pub database_id: String,
}

// ---------------------------------------------------------------------------
// SiteRegistry
// ---------------------------------------------------------------------------

/// Ordered, immutable sequence of site configurations with host resolution.
///
/// Resolution never fails once a registry exists: an unknown host falls
/// back to the flagged-default site, or to the first site if none is
/// flagged. Construction rejects an empty site list, so the fallback chain
/// always terminates.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: Vec<SiteConfig>,
}

impl SiteRegistry {
    /// Build a registry from the configured site list. Empty lists are a
    /// fatal configuration error; the process must not serve requests.
    pub fn new(sites: Vec<SiteConfig>) -> Result<Self> {
        if sites.is_empty() {
            return Err(NotipressError::config("no sites configured"));
        }
        Ok(Self { sites })
    }

    /// Resolve a request host to a site configuration.
    ///
    /// Exact host match wins; otherwise the flagged-default site; otherwise
    /// the first site in configured order.
    pub fn resolve(&self, host: &str) -> &SiteConfig {
        self.sites
            .iter()
            .find(|s| s.host == host)
            .unwrap_or_else(|| self.default_site())
    }

    /// The fallback site: the first flagged default, else the first entry.
    pub fn default_site(&self) -> &SiteConfig {
        self.sites
            .iter()
            .find(|s| s.default)
            .unwrap_or(&self.sites[0])
    }

    /// All configured sites, in registry order.
    pub fn sites(&self) -> &[SiteConfig] {
        &self.sites
    }
}

impl TryFrom<&AppConfig> for SiteRegistry {
    type Error = NotipressError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        Self::new(config.sites.clone())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.notipress/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| NotipressError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.notipress/notipress.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from the default location.
///
/// A missing file is a fatal configuration error — without a site list and
/// a store token the process cannot serve anything.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        return Err(NotipressError::config(format!(
            "config file not found at {} (run `notipress config init` first)",
            path.display()
        )));
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| NotipressError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| NotipressError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| NotipressError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| NotipressError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| NotipressError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(host: &str, default: bool, database_id: &str) -> SiteConfig {
        SiteConfig {
            host: host.into(),
            default,
            custom_css: None,
            title: format!("{host} blog"),
            sub_title: None,
            copyright: None,
            database_id: database_id.into(),
        }
    }

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("api.notion.com"));
    }

    #[test]
    fn config_with_sites_parses() {
        let toml_str = r#"
assets_dir = "assets"

[notion]
token = "secret_abc"

[[sites]]
host = "a.example"
default = true
title = "A"
database_id = "db-a"

[[sites]]
host = "b.example"
title = "B"
sub_title = "second tenant"
custom_css = "b.css"
database_id = "db-b"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.notion.token, "secret_abc");
        assert_eq!(config.notion.timeout_secs, 30);
        assert_eq!(config.sites.len(), 2);
        assert!(config.sites[0].default);
        assert!(!config.sites[1].default);
        assert_eq!(config.sites[1].custom_css.as_deref(), Some("b.css"));
    }

    #[test]
    fn resolve_exact_host_match() {
        let registry =
            SiteRegistry::new(vec![site("a.example", true, "C1"), site("b.example", false, "C2")])
                .unwrap();
        assert_eq!(registry.resolve("b.example").database_id, "C2");
    }

    #[test]
    fn resolve_unknown_host_falls_back_to_flagged_default() {
        let registry =
            SiteRegistry::new(vec![site("a.example", false, "C1"), site("b.example", true, "C2")])
                .unwrap();
        assert_eq!(registry.resolve("unknown.example").database_id, "C2");
    }

    #[test]
    fn resolve_without_default_flag_falls_back_to_first() {
        let registry =
            SiteRegistry::new(vec![site("a.example", false, "C1"), site("b.example", false, "C2")])
                .unwrap();
        assert_eq!(registry.resolve("unknown.example").database_id, "C1");
    }

    #[test]
    fn multiple_default_flags_pick_the_first() {
        let registry =
            SiteRegistry::new(vec![site("a.example", true, "C1"), site("b.example", true, "C2")])
                .unwrap();
        assert_eq!(registry.resolve("unknown.example").database_id, "C1");
    }

    #[test]
    fn empty_registry_is_a_config_error() {
        let err = SiteRegistry::new(vec![]).unwrap_err();
        assert!(matches!(err, NotipressError::Config { .. }));
        assert!(err.to_string().contains("no sites configured"));
    }
}
