//! Server-wide settings: where the served tree starts and how index files
//! are named.

use crate::error::{IndexError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_INDEX_FILE: &str = "index.ini";
pub const DEFAULT_TEMPLATE_NAME: &str = "index.html";

pub const ROOT_ENV_VAR: &str = "K0SNGIN_ROOT";
pub const INDEX_FILE_ENV_VAR: &str = "K0SNGIN_INDEX_FILE";
pub const ALLOW_LOCAL_TEMPLATES_ENV_VAR: &str = "K0SNGIN_ALLOW_LOCAL_TEMPLATES";

/// Settings loaded from a `config.toml` file or built in code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
	/// Top of the served tree. The cascade never looks above it.
	pub root: PathBuf,

	/// File name of the per-directory metadata file.
	#[serde(default = "default_index_file")]
	pub index_file: String,

	/// File name of a per-directory template override.
	#[serde(default = "default_template_name")]
	pub template_name: String,

	/// Render per-directory templates instead of serving them as static HTML.
	#[serde(default)]
	pub allow_local_templates: bool,
}

fn default_index_file() -> String {
	DEFAULT_INDEX_FILE.to_string()
}

fn default_template_name() -> String {
	DEFAULT_TEMPLATE_NAME.to_string()
}

impl Settings {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			index_file: default_index_file(),
			template_name: default_template_name(),
			allow_local_templates: false,
		}
	}

	/// Load settings from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path).map_err(|source| IndexError::SettingsRead {
			path: path.to_path_buf(),
			source,
		})?;

		Self::from_toml_str(&content, path)
	}

	/// Parse settings from a string (useful for testing).
	pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
		let settings: Settings =
			toml::from_str(content).map_err(|source| IndexError::SettingsParse {
				path: path.to_path_buf(),
				source,
			})?;

		settings.validate()?;

		Ok(settings)
	}

	/// File names must name a file inside the directory, not a path.
	pub fn validate(&self) -> Result<()> {
		validate_file_name("index-file", &self.index_file)?;
		validate_file_name("template-name", &self.template_name)?;
		Ok(())
	}

	/// Apply overrides from the process environment.
	pub fn with_env_overrides(self) -> Self {
		self.with_overrides_from(|name| std::env::var(name).ok())
	}

	/// Apply overrides from an arbitrary variable lookup.
	pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(root) = lookup(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
			self.root = PathBuf::from(root);
		}
		if let Some(index_file) = lookup(INDEX_FILE_ENV_VAR).filter(|v| !v.is_empty()) {
			self.index_file = index_file;
		}
		if let Some(value) = lookup(ALLOW_LOCAL_TEMPLATES_ENV_VAR) {
			self.allow_local_templates = is_truthy(&value);
		}
		self
	}
}

fn validate_file_name(field: &'static str, value: &str) -> Result<()> {
	let path = Path::new(value);
	let is_plain_name = path.file_name().is_some_and(|name| name == path.as_os_str());
	if value.trim().is_empty() || !is_plain_name {
		return Err(IndexError::InvalidSetting {
			field,
			reason: format!("{value:?} is not a plain file name"),
		});
	}
	Ok(())
}

/// Set, non-empty, and not `0`, `false` or `no` (case-insensitive).
pub fn is_truthy(value: &str) -> bool {
	let lower = value.to_lowercase();
	!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
}

/// Get the path to the user's settings file.
pub fn user_settings_path() -> Result<PathBuf> {
	let config_dir = dirs::config_dir().ok_or(IndexError::ConfigDirectoryNotFound)?;
	Ok(config_dir.join("k0sngin").join("config.toml"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	#[test]
	fn test_is_truthy() {
		assert!(!is_truthy(""));
		assert!(!is_truthy("0"));
		assert!(!is_truthy("false"));
		assert!(!is_truthy("FALSE"));
		assert!(!is_truthy("no"));
		assert!(is_truthy("1"));
		assert!(is_truthy("true"));
		assert!(is_truthy("yes"));
	}

	#[test]
	fn test_parse_minimal_settings() {
		let settings =
			Settings::from_toml_str("root = \"/srv/files\"", Path::new("config.toml")).unwrap();

		assert_eq!(settings, Settings::new("/srv/files"));
		assert_eq!(settings.index_file, "index.ini");
		assert_eq!(settings.template_name, "index.html");
		assert!(!settings.allow_local_templates);
	}

	#[test]
	fn test_parse_full_settings() {
		let content = r#"
root = "/srv/files"
index-file = "meta.ini"
template-name = "listing.html"
allow-local-templates = true
"#;
		let settings = Settings::from_toml_str(content, Path::new("config.toml")).unwrap();

		assert_eq!(settings.root, PathBuf::from("/srv/files"));
		assert_eq!(settings.index_file, "meta.ini");
		assert_eq!(settings.template_name, "listing.html");
		assert!(settings.allow_local_templates);
	}

	#[test]
	fn test_missing_root_is_parse_error() {
		let result = Settings::from_toml_str("index-file = \"x.ini\"", Path::new("config.toml"));
		assert!(matches!(result, Err(IndexError::SettingsParse { .. })));
	}

	#[test]
	fn test_index_file_must_be_plain_name() {
		let content = "root = \"/srv\"\nindex-file = \"../index.ini\"";
		match Settings::from_toml_str(content, Path::new("config.toml")) {
			Err(IndexError::InvalidSetting { field, .. }) => assert_eq!(field, "index-file"),
			other => panic!("Expected InvalidSetting error, got {:?}", other),
		}
	}

	#[test]
	fn test_overrides() {
		let vars: HashMap<&str, &str> = HashMap::from([
			(ROOT_ENV_VAR, "/elsewhere"),
			(ALLOW_LOCAL_TEMPLATES_ENV_VAR, "TRUE"),
		]);
		let settings = Settings::new("/srv")
			.with_overrides_from(|name| vars.get(name).map(|v| v.to_string()));

		assert_eq!(settings.root, PathBuf::from("/elsewhere"));
		assert_eq!(settings.index_file, "index.ini");
		assert!(settings.allow_local_templates);
	}

	#[test]
	fn test_empty_overrides_are_ignored() {
		let settings = Settings::new("/srv").with_overrides_from(|name| {
			(name == ROOT_ENV_VAR || name == INDEX_FILE_ENV_VAR).then(String::new)
		});

		assert_eq!(settings, Settings::new("/srv"));
	}

	#[test]
	fn test_user_settings_path() {
		if let Ok(path) = user_settings_path() {
			assert!(path.ends_with("k0sngin/config.toml"));
		}
	}
}
