//! QMS configuration
//!
//! Loaded from a TOML file shaped like the deployment secrets file: the three
//! spreadsheet keys may be given under their `GOOGLE_SHEETS_ID_*` names.
//! Secrets can be overridden from the environment.

use qms_records::RecordType;
use qms_store::{SheetsConfig, TableId, DEFAULT_BASE_URL, DEFAULT_WORKSHEET};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable overriding `admin_password`
pub const ENV_ADMIN_PASSWORD: &str = "QMS_ADMIN_PASSWORD";
/// Environment variable overriding `sheets.token`
pub const ENV_SHEETS_TOKEN: &str = "QMS_SHEETS_TOKEN";
/// Environment variable overriding `bind`
pub const ENV_BIND: &str = "QMS_BIND";

/// Which store implementation backs the tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Google Sheets
    #[default]
    Sheets,
    /// In-process tables, lost on exit
    Memory,
}

/// Table for each record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTables {
    pub complaints: TableId,
    pub deviation: TableId,
    pub change_control: TableId,
}

impl RecordTables {
    /// Tables named after their record types
    #[must_use]
    pub fn named() -> Self {
        Self {
            complaints: TableId::new(RecordType::Complaint.slug()),
            deviation: TableId::new(RecordType::Deviation.slug()),
            change_control: TableId::new(RecordType::ChangeControl.slug()),
        }
    }

    /// Table backing `record_type`
    #[inline]
    #[must_use]
    pub fn get(&self, record_type: RecordType) -> &TableId {
        match record_type {
            RecordType::Complaint => &self.complaints,
            RecordType::Deviation => &self.deviation,
            RecordType::ChangeControl => &self.change_control,
        }
    }

    /// All tables in record type order
    #[must_use]
    pub fn all(&self) -> Vec<TableId> {
        RecordType::ALL.iter().map(|t| self.get(*t).clone()).collect()
    }
}

/// Sheets connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetsSettings {
    /// Bearer token; prefer `QMS_SHEETS_TOKEN`
    pub token: Option<String>,
    pub base_url: String,
    pub worksheet: String,
    pub timeout_secs: u64,
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            worksheet: DEFAULT_WORKSHEET.to_string(),
            timeout_secs: 15,
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8501))
}

/// QMS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct QmsConfig {
    /// HTTP listen address
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    #[serde(default)]
    pub backend: Backend,
    /// Spreadsheet key of the Complaints table
    #[serde(default, alias = "GOOGLE_SHEETS_ID_COMPLAINTS")]
    pub complaints_sheet: Option<String>,
    /// Spreadsheet key of the Deviation table
    #[serde(default, alias = "GOOGLE_SHEETS_ID_DEVIATION")]
    pub deviation_sheet: Option<String>,
    /// Spreadsheet key of the Change Control table
    #[serde(default, alias = "GOOGLE_SHEETS_ID_CHANGE_CONTROL")]
    pub change_control_sheet: Option<String>,
    #[serde(default)]
    pub sheets: SheetsSettings,
    /// Shared secret gating the admin view
    #[serde(default)]
    pub admin_password: Option<String>,
}

impl QmsConfig {
    /// Parse configuration text without touching the environment
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` on malformed TOML
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load file, apply environment overrides, validate
    ///
    /// # Errors
    /// Returns `ConfigError` if the file is unreadable, malformed or
    /// incomplete
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::from_toml_str(&text)?.with_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        tracing::debug!(path = %path.display(), backend = ?config.backend, "loaded configuration");
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` if `QMS_BIND` is not a socket address
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(password) = lookup(ENV_ADMIN_PASSWORD) {
            self.admin_password = Some(password);
        }
        if let Some(token) = lookup(ENV_SHEETS_TOKEN) {
            self.sheets.token = Some(token);
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind = bind.parse().map_err(|e| ConfigError::Invalid {
                field: "bind",
                message: format!("{bind}: {e}"),
            })?;
        }
        Ok(self)
    }

    /// Check that every setting the chosen backend needs is present
    ///
    /// # Errors
    /// Returns the first missing or invalid setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.admin_password.as_deref() {
            None => return Err(ConfigError::Missing("admin_password")),
            Some(p) if p.is_empty() => {
                return Err(ConfigError::Invalid {
                    field: "admin_password",
                    message: "must not be empty".to_string(),
                })
            }
            Some(_) => {}
        }
        if self.backend == Backend::Sheets {
            self.tables()?;
            if self.sheets.token.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::Missing("sheets.token"));
            }
            if self.sheets.timeout_secs == 0 {
                return Err(ConfigError::Invalid {
                    field: "sheets.timeout_secs",
                    message: "must be positive".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Resolve the table of each record type
    ///
    /// The memory backend falls back to tables named after the record types.
    ///
    /// # Errors
    /// Returns `ConfigError::Missing` for an absent spreadsheet key on the
    /// Sheets backend
    pub fn tables(&self) -> Result<RecordTables, ConfigError> {
        let named = RecordTables::named();
        let pick = |value: &Option<String>, fallback: &TableId, key: &'static str| {
            match (value.as_deref(), self.backend) {
                (Some(id), _) if !id.is_empty() => Ok(TableId::new(id)),
                (_, Backend::Memory) => Ok(fallback.clone()),
                _ => Err(ConfigError::Missing(key)),
            }
        };
        Ok(RecordTables {
            complaints: pick(
                &self.complaints_sheet,
                &named.complaints,
                "GOOGLE_SHEETS_ID_COMPLAINTS",
            )?,
            deviation: pick(
                &self.deviation_sheet,
                &named.deviation,
                "GOOGLE_SHEETS_ID_DEVIATION",
            )?,
            change_control: pick(
                &self.change_control_sheet,
                &named.change_control,
                "GOOGLE_SHEETS_ID_CHANGE_CONTROL",
            )?,
        })
    }

    /// Sheets store settings
    ///
    /// # Errors
    /// Returns `ConfigError::Missing` without a token
    pub fn sheets_config(&self) -> Result<SheetsConfig, ConfigError> {
        let token = self
            .sheets
            .token
            .clone()
            .ok_or(ConfigError::Missing("sheets.token"))?;
        Ok(SheetsConfig::new(token)
            .with_base_url(self.sheets.base_url.clone())
            .with_worksheet(self.sheets.worksheet.clone())
            .with_timeout(Duration::from_secs(self.sheets.timeout_secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRETS_STYLE: &str = r#"
        admin_password = "s3cret"
        GOOGLE_SHEETS_ID_COMPLAINTS = "key-c"
        GOOGLE_SHEETS_ID_DEVIATION = "key-d"
        GOOGLE_SHEETS_ID_CHANGE_CONTROL = "key-cc"

        [sheets]
        token = "ya29.token"
    "#;

    #[test]
    fn parses_secrets_style_keys() {
        let config = QmsConfig::from_toml_str(SECRETS_STYLE).unwrap();
        config.validate().unwrap();

        let tables = config.tables().unwrap();
        assert_eq!(tables.get(RecordType::Complaint).as_str(), "key-c");
        assert_eq!(tables.get(RecordType::ChangeControl).as_str(), "key-cc");
        assert_eq!(config.bind, default_bind());
        assert_eq!(config.sheets.worksheet, "Sheet1");
    }

    #[test]
    fn sheets_backend_requires_every_key() {
        let config = QmsConfig::from_toml_str(
            r#"
            admin_password = "s3cret"
            complaints_sheet = "key-c"
            [sheets]
            token = "t"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("GOOGLE_SHEETS_ID_DEVIATION"))
        ));
    }

    #[test]
    fn memory_backend_needs_only_password() {
        let config = QmsConfig::from_toml_str(
            r#"
            backend = "memory"
            admin_password = "s3cret"
            "#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.tables().unwrap(), RecordTables::named());
    }

    #[test]
    fn missing_password_rejected() {
        let config = QmsConfig::from_toml_str("backend = \"memory\"").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("admin_password"))
        ));
    }

    #[test]
    fn env_overrides_win() {
        let config = QmsConfig::from_toml_str(SECRETS_STYLE)
            .unwrap()
            .with_env(|key| match key {
                ENV_ADMIN_PASSWORD => Some("from-env".to_string()),
                ENV_BIND => Some("0.0.0.0:9000".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.admin_password.as_deref(), Some("from-env"));
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.sheets.token.as_deref(), Some("ya29.token"));
    }

    #[test]
    fn bad_bind_is_invalid() {
        let err = QmsConfig::from_toml_str(SECRETS_STYLE)
            .unwrap()
            .with_env(|key| (key == ENV_BIND).then(|| "nowhere".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "bind", .. }));
    }
}
