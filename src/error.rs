use std::path::PathBuf;

/// Library-level structured errors for k0sngin.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
	/// Reading an index file failed, including files that are not valid UTF-8.
	#[error("Failed to read index file: {path}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// A `/` key with nothing (or only whitespace) after the slash. `path` is
	/// set when the document came from an index file.
	#[error(
		"Formatter directive has an empty name: {key:?}{}",
		path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default()
	)]
	MalformedDirective { key: String, path: Option<PathBuf> },

	#[error("Failed to read directory: {path}")]
	DirectoryRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read settings file: {path}")]
	SettingsRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings file: {path}")]
	SettingsParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid setting {field}: {reason}")]
	InvalidSetting { field: &'static str, reason: String },

	#[error("Failed to resolve user configuration directory")]
	ConfigDirectoryNotFound,
}

/// Result type alias using IndexError.
pub type Result<T> = std::result::Result<T, IndexError>;
