//! Presentation state handed to the renderer.

use indexmap::IndexMap;
use serde::Serialize;

/// What kind of filesystem object a listing entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
	File,
	Directory,
	Unknown,
}

/// One row in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
	pub name: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,

	/// Known only for entries that were seen on disk.
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<FileKind>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
}

impl FileEntry {
	/// An entry declared in an index file.
	pub fn from_config(name: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: Some(description.into()),
			kind: None,
			title: None,
			link: None,
		}
	}

	/// An entry found by scanning a directory.
	pub fn from_disk(name: impl Into<String>, kind: FileKind) -> Self {
		Self {
			name: name.into(),
			description: None,
			kind: Some(kind),
			title: None,
			link: None,
		}
	}
}

/// Variables for one directory listing. Built fresh per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariableSet {
	pub files: IndexMap<String, FileEntry>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub css: Option<Vec<String>>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub directory_name: Option<String>,
}

impl VariableSet {
	pub fn with_files(files: IndexMap<String, FileEntry>) -> Self {
		Self {
			files,
			..Default::default()
		}
	}

	/// Overwrite every field the update sets; leave the rest alone.
	pub fn apply_update(&mut self, update: VariableUpdate) {
		if let Some(title) = update.title {
			self.title = Some(title);
		}
		if let Some(description) = update.description {
			self.description = Some(description);
		}
		if let Some(css) = update.css {
			self.css = Some(css);
		}
		if let Some(icon) = update.icon {
			self.icon = Some(icon);
		}
		if let Some(link) = update.link {
			self.link = Some(link);
		}
	}
}

/// Top-level fields a formatter wants to set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableUpdate {
	pub title: Option<String>,
	pub description: Option<String>,
	pub css: Option<Vec<String>>,
	pub icon: Option<String>,
	pub link: Option<String>,
}

/// The parts of the incoming request the core looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
	/// URL path of the request, e.g. `/docs/guides/`.
	pub path: String,
}

impl RequestContext {
	pub fn new(path: impl Into<String>) -> Self {
		Self { path: path.into() }
	}

	/// Display name for the listed directory: `/` for the root, otherwise the
	/// path with exactly one trailing slash.
	pub fn directory_name(&self) -> String {
		if self.path.is_empty() || self.path == "/" {
			return "/".to_string();
		}
		let trimmed = self.path.trim_end_matches('/');
		if trimmed.is_empty() {
			return "/".to_string();
		}
		format!("{trimmed}/")
	}
}
