//! Tool settings and saved credentials.
//!
//! Both live in the settings directory: `$MYXB_CONFIG_DIR` if set, otherwise
//! `<platform config dir>/myxb`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

const SETTINGS_FILE: &str = "config.toml";
const CREDENTIALS_FILE: &str = "credentials.toml";

/// Settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Portal root URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Max subjects fetched concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Grading configuration replacing the built-in one.
    #[serde(default)]
    pub grading_config: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_parallelism() -> usize {
    4
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            parallelism: default_parallelism(),
            timeout_secs: default_timeout(),
            grading_config: None,
        }
    }
}

/// The settings directory, if one can be determined.
pub fn config_dir() -> Option<PathBuf> {
    match std::env::var_os("MYXB_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|d| d.join("myxb")),
    }
}

/// Load settings from an explicit path, or the settings directory.
///
/// A missing default file yields defaults; a missing explicit file is an
/// error. `MYXB_BASE_URL` overrides `base_url` either way.
pub fn load_settings_from(path: Option<&Path>) -> Result<Settings> {
    let settings_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => config_dir()
            .map(|d| d.join(SETTINGS_FILE))
            .filter(|p| p.exists()),
    };

    let settings = match settings_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<Settings>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => Settings::default(),
    };

    let settings = apply_overrides(settings, std::env::var("MYXB_BASE_URL").ok());
    anyhow::ensure!(settings.parallelism >= 1, "parallelism must be at least 1");
    Ok(settings)
}

fn apply_overrides(mut settings: Settings, base_url: Option<String>) -> Settings {
    if let Some(url) = base_url.filter(|u| !u.is_empty()) {
        tracing::debug!(%url, "base URL overridden from environment");
        settings.base_url = url;
    }
    settings
}

/// Saved login. Only the first-stage password hash is stored.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password_hash: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password_hash", &"***")
            .finish()
    }
}

impl Credentials {
    /// Hash a plaintext password into storable credentials.
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password_hash: auth::first_hash(password),
        }
    }

    fn path_in(dir: &Path) -> PathBuf {
        dir.join(CREDENTIALS_FILE)
    }

    fn default_dir() -> Result<PathBuf> {
        config_dir().context("could not determine the settings directory")
    }

    /// Saved credentials from the settings directory, if any.
    pub fn load() -> Result<Option<Self>> {
        Self::load_from(&Self::default_dir()?)
    }

    pub fn save(&self) -> Result<PathBuf> {
        self.save_to(&Self::default_dir()?)
    }

    /// Remove saved credentials. Returns `false` if there were none.
    pub fn delete() -> Result<bool> {
        Self::delete_from(&Self::default_dir()?)
    }

    pub fn load_from(dir: &Path) -> Result<Option<Self>> {
        let path = Self::path_in(dir);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read credentials: {}", path.display()))?;
        let creds = toml::from_str::<Credentials>(&content)
            .with_context(|| format!("failed to parse credentials: {}", path.display()))?;
        Ok(Some(creds))
    }

    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = Self::path_in(dir);
        let content = toml::to_string(self).context("failed to serialize credentials")?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&path)
            .with_context(|| format!("failed to open credentials: {}", path.display()))?;

        // `mode` only applies on creation; tighten a file left by an older save.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("failed to restrict {}", path.display()))?;
        }

        file.write_all(content.as_bytes())
            .with_context(|| format!("failed to write credentials: {}", path.display()))?;
        Ok(path)
    }

    pub fn delete_from(dir: &Path) -> Result<bool> {
        let path = Self::path_in(dir);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
        Ok(true)
    }
}
