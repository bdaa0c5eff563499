//! Settings file parsing
//!
//! A settings file describes the backup root, how to reach devices, who
//! authors revisions, and optionally an inventory of devices:
//!
//! ```toml
//! backup_root = "/var/lib/confvault"
//!
//! [http]
//! verify_tls = false
//! timeout_secs = 60
//!
//! [author]
//! name = "Backup Bot"
//! email = "backup@example.net"
//!
//! [[devices]]
//! address = "10.0.0.5"
//! username = "backup"
//! password_env = "FW_EDGE_PASSWORD"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use confvault_api::{ClientOptions, Credentials, DEFAULT_HTTPS_PORT, DeviceTarget};
use confvault_git::Author;
use serde::Deserialize;

use crate::{Error, Result};

fn default_backup_root() -> PathBuf {
    PathBuf::from("backups")
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_concurrent() -> usize {
    crate::DEFAULT_MAX_CONCURRENT
}

fn default_port() -> u16 {
    DEFAULT_HTTPS_PORT
}

/// HTTP client section
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSection {
    #[serde(default = "default_true")]
    pub verify_tls: bool,

    /// `false` switches to plain HTTP (lab devices only)
    #[serde(default = "default_true")]
    pub use_tls: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            verify_tls: true,
            use_tls: true,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Revision author section
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorSection {
    pub name: String,
    pub email: String,
}

impl Default for AuthorSection {
    fn default() -> Self {
        let author = Author::default();
        Self {
            name: author.name,
            email: author.email,
        }
    }
}

/// One device in the inventory
#[derive(Clone, Deserialize)]
pub struct DeviceEntry {
    pub address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub username: String,

    /// Inline secret. Prefer `password_env`.
    #[serde(default)]
    pub password: Option<String>,

    /// Environment variable holding the secret.
    #[serde(default)]
    pub password_env: Option<String>,
}

impl fmt::Debug for DeviceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceEntry")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("password_env", &self.password_env)
            .finish()
    }
}

impl DeviceEntry {
    /// Build the capture target, reading `password_env` through `lookup`.
    pub fn to_target(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<DeviceTarget> {
        let secret = match (&self.password, &self.password_env) {
            (Some(password), _) => password.clone(),
            (None, Some(var)) => lookup(var).ok_or_else(|| Error::InvalidSettings {
                message: format!(
                    "device '{}': environment variable {var} is not set",
                    self.address
                ),
            })?,
            (None, None) => {
                return Err(Error::InvalidSettings {
                    message: format!(
                        "device '{}': one of password or password_env is required",
                        self.address
                    ),
                });
            }
        };

        Ok(
            DeviceTarget::new(&self.address, Credentials::new(&self.username, secret))
                .with_port(self.port),
        )
    }
}

/// Parsed settings file
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Holds one directory per device. Relative paths resolve against the
    /// working directory.
    #[serde(default = "default_backup_root")]
    pub backup_root: PathBuf,

    /// Devices captured at once by a batch run.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    #[serde(default)]
    pub http: HttpSection,

    #[serde(default)]
    pub author: AuthorSection,

    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backup_root: default_backup_root(),
            max_concurrent: default_max_concurrent(),
            http: HttpSection::default(),
            author: AuthorSection::default(),
            devices: Vec::new(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML content
    ///
    /// # Example
    ///
    /// ```
    /// use confvault_core::Settings;
    ///
    /// let settings = Settings::parse(r#"
    /// backup_root = "/srv/backups"
    ///
    /// [[devices]]
    /// address = "10.0.0.5"
    /// username = "backup"
    /// password_env = "FW_PASSWORD"
    /// "#).unwrap();
    ///
    /// assert_eq!(settings.devices[0].port, 443);
    /// assert!(settings.http.verify_tls);
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.max_concurrent == 0 {
            return Err(Error::InvalidSettings {
                message: "max_concurrent must be greater than zero".into(),
            });
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::InvalidSettings {
                message: "http.timeout_secs must be greater than zero".into(),
            });
        }
        if self.http.connect_timeout_secs == 0 {
            return Err(Error::InvalidSettings {
                message: "http.connect_timeout_secs must be greater than zero".into(),
            });
        }
        for device in &self.devices {
            confvault_fs::validate_device_address(&device.address).map_err(|e| {
                Error::InvalidSettings {
                    message: e.to_string(),
                }
            })?;
        }
        Ok(())
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            verify_tls: self.http.verify_tls,
            use_tls: self.http.use_tls,
            timeout: Duration::from_secs(self.http.timeout_secs),
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
        }
    }

    pub fn author(&self) -> Author {
        Author::new(&self.author.name, &self.author.email)
    }

    /// Capture targets for the inventory, secrets read from the environment.
    pub fn targets(&self) -> Result<Vec<DeviceTarget>> {
        self.targets_with(|var| std::env::var(var).ok())
    }

    /// Capture targets for the inventory, secrets read through `lookup`.
    pub fn targets_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Vec<DeviceTarget>> {
        self.devices
            .iter()
            .map(|device| device.to_target(&lookup))
            .collect()
    }
}
