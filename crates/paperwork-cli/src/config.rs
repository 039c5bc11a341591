//! Run settings
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `PAPERWORK_*` environment variables, then command-line flags. Later layers
//! override earlier ones field by field. The settings file itself is named by
//! `--config` or `PAPERWORK_CONFIG`.

use paperwork_core::{ProfileStore, UserProfile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::cli::output::OutputFormat;
use crate::error::{CliError, Result};
use crate::loader::ProfileFile;

/// Profile used when none is configured
pub const DEFAULT_PROFILE_PATH: &str = "metadata/user_data.json";

/// Settings file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "paperwork.toml";

pub const ENV_CONFIG: &str = "PAPERWORK_CONFIG";
pub const ENV_PROFILE: &str = "PAPERWORK_PROFILE";
pub const ENV_OUTPUT_DIR: &str = "PAPERWORK_OUTPUT_DIR";
pub const ENV_FORMAT: &str = "PAPERWORK_FORMAT";
pub const ENV_GLOSSARY: &str = "PAPERWORK_GLOSSARY";

/// Effective settings for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Explicitly configured profile. `None` means the default location.
    pub profile_path: Option<PathBuf>,
    /// Directory for filled documents. `None` writes beside the source.
    pub output_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub glossary_path: Option<PathBuf>,
}

/// On-disk shape of `paperwork.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub profile: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub glossary: Option<PathBuf>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::FileError(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            CliError::ParseError(format!("Invalid settings file '{}': {}", path.display(), e))
        })
    }
}

impl Settings {
    /// Create a new settings builder
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// The profile path that will be read
    pub fn effective_profile_path(&self) -> &Path {
        self.profile_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_PROFILE_PATH))
    }

    /// Load the user profile.
    ///
    /// An explicitly configured profile must load. The default profile is
    /// optional: when it is missing or unreadable the run continues with an
    /// empty profile.
    pub fn load_profile(&self) -> Result<UserProfile> {
        if let Some(path) = &self.profile_path {
            return ProfileFile::open(path)?.load_profile();
        }

        let default = ProfileFile::open(DEFAULT_PROFILE_PATH)?;
        if !default.exists() {
            warn!(
                path = DEFAULT_PROFILE_PATH,
                "no profile found, continuing with an empty profile"
            );
            return Ok(UserProfile::new());
        }
        match default.load_profile() {
            Ok(profile) => Ok(profile),
            Err(e) => {
                warn!(path = DEFAULT_PROFILE_PATH, error = %e, "could not load profile, continuing with an empty profile");
                Ok(UserProfile::new())
            }
        }
    }
}

/// Builder for [`Settings`]
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a settings file
    pub fn file(mut self, file: SettingsFile) -> Self {
        if let Some(profile) = file.profile {
            self.settings.profile_path = Some(profile);
        }
        if let Some(dir) = file.output_dir {
            self.settings.output_dir = Some(dir);
        }
        if let Some(format) = file.format {
            self.settings.format = format;
        }
        if let Some(glossary) = file.glossary {
            self.settings.glossary_path = Some(glossary);
        }
        self
    }

    /// Merge the settings file at `explicit`, or `paperwork.toml` if one exists.
    ///
    /// An explicitly named file must exist.
    pub fn config_file(self, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let discovered = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !discovered.is_file() {
                    return Ok(self);
                }
                discovered
            }
        };
        debug!(path = %path.display(), "loading settings file");
        Ok(self.file(SettingsFile::load(&path)?))
    }

    /// Merge `PAPERWORK_*` values from a variable lookup. Empty values are ignored.
    pub fn env_with<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(profile) = get(ENV_PROFILE) {
            self.settings.profile_path = Some(PathBuf::from(profile));
        }
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            self.settings.output_dir = Some(PathBuf::from(dir));
        }
        if let Some(format) = get(ENV_FORMAT) {
            self.settings.format = parse_format(&format).map_err(|e| {
                CliError::InvalidInput(format!("{}: {}", ENV_FORMAT, e))
            })?;
        }
        if let Some(glossary) = get(ENV_GLOSSARY) {
            self.settings.glossary_path = Some(PathBuf::from(glossary));
        }
        Ok(self)
    }

    /// Merge `PAPERWORK_*` values from the process environment
    pub fn env(self) -> Result<Self> {
        self.env_with(|name| std::env::var(name).ok())
    }

    pub fn profile_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.settings.profile_path = path;
        }
        self
    }

    pub fn output_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.settings.output_dir = dir;
        }
        self
    }

    pub fn format(mut self, format: Option<OutputFormat>) -> Self {
        if let Some(format) = format {
            self.settings.format = format;
        }
        self
    }

    pub fn glossary_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.settings.glossary_path = path;
        }
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}

fn parse_format(value: &str) -> std::result::Result<OutputFormat, String> {
    use clap::ValueEnum;
    OutputFormat::from_str(value.trim(), true)
        .map_err(|_| format!("unknown output format '{}', expected table, json or yaml", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::builder().build();
        assert_eq!(settings.profile_path, None);
        assert_eq!(settings.format, OutputFormat::Table);
        assert_eq!(
            settings.effective_profile_path(),
            Path::new(DEFAULT_PROFILE_PATH)
        );
    }

    #[test]
    fn test_layering_order() {
        let file = SettingsFile {
            profile: Some(PathBuf::from("file.json")),
            output_dir: Some(PathBuf::from("file-out")),
            format: Some(OutputFormat::Yaml),
            glossary: None,
        };

        let settings = Settings::builder()
            .file(file)
            .env_with(env(&[(ENV_PROFILE, "env.json"), (ENV_GLOSSARY, "terms.yaml")]))
            .unwrap()
            .profile_path(Some(PathBuf::from("flag.json")))
            .format(None)
            .build();

        assert_eq!(settings.profile_path, Some(PathBuf::from("flag.json")));
        assert_eq!(settings.output_dir, Some(PathBuf::from("file-out")));
        assert_eq!(settings.format, OutputFormat::Yaml);
        assert_eq!(settings.glossary_path, Some(PathBuf::from("terms.yaml")));
    }

    #[test]
    fn test_env_format() {
        let settings = Settings::builder()
            .env_with(env(&[(ENV_FORMAT, "JSON"), (ENV_OUTPUT_DIR, "  ")]))
            .unwrap()
            .build();
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.output_dir, None);

        let err = Settings::builder()
            .env_with(env(&[(ENV_FORMAT, "xml")]))
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_settings_file_parse() {
        let file: SettingsFile = toml::from_str(
            r#"
profile = "me.yaml"
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(file.profile, Some(PathBuf::from("me.yaml")));
        assert_eq!(file.format, Some(OutputFormat::Json));

        assert!(toml::from_str::<SettingsFile>("colour = true").is_err());
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let err = Settings::builder()
            .config_file(Some(Path::new("/no/such/paperwork.toml")))
            .unwrap_err();
        assert!(matches!(err, CliError::FileError(_)));
    }

    #[test]
    fn test_missing_explicit_profile_is_error() {
        let settings = Settings::builder()
            .profile_path(Some(PathBuf::from("/no/such/profile.json")))
            .build();
        assert!(matches!(settings.load_profile(), Err(CliError::FileError(_))));
    }
}
