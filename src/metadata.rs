//! Splitting a parsed index file into formatter directives and file entries.

use crate::config::parser::parse_config_file;
use crate::config::types::{ConfigDocument, OrphanedLine};
use crate::error::{IndexError, Result};
use crate::variables::FileEntry;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Prefix marking a key as a formatter directive.
pub const DIRECTIVE_PREFIX: char = '/';

/// Prefix marking a key as reserved for internal bookkeeping.
pub const RESERVED_PREFIX: char = '_';

/// Directives and file entries declared by one index file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMetadata {
	/// Directive name (without the leading `/`) to its trimmed value.
	pub formatters: IndexMap<String, String>,

	/// File entries keyed by name, in document order.
	pub files: IndexMap<String, FileEntry>,
}

/// Split a document into directives and file entries.
///
/// Keys starting with `_` are dropped. A directive whose name is empty after
/// trimming is an error: there is nothing to address it by.
pub fn extract(document: &ConfigDocument) -> Result<IndexMetadata> {
	let mut metadata = IndexMetadata::default();

	for (key, value) in document.iter() {
		if let Some(name) = key.strip_prefix(DIRECTIVE_PREFIX) {
			let name = name.trim();
			if name.is_empty() {
				return Err(IndexError::MalformedDirective {
					key: key.to_string(),
					path: None,
				});
			}
			metadata
				.formatters
				.insert(name.to_string(), value.trim().to_string());
		} else if !key.starts_with(RESERVED_PREFIX) {
			metadata
				.files
				.insert(key.to_string(), FileEntry::from_config(key, value));
		}
	}

	Ok(metadata)
}

/// Read, parse and extract an index file.
pub fn parse_index_file(path: &Path) -> Result<IndexMetadata> {
	let document = parse_config_file(path)?;
	extract_from(&document, path)
}

/// [`extract`] for a document read from `path`, naming it in errors.
fn extract_from(document: &ConfigDocument, path: &Path) -> Result<IndexMetadata> {
	extract(document).map_err(|e| match e {
		IndexError::MalformedDirective { key, .. } => IndexError::MalformedDirective {
			key,
			path: Some(path.to_path_buf()),
		},
		other => other,
	})
}

/// Outcome of strictly checking one index file.
#[derive(Debug, Clone)]
pub struct ValidationReport {
	pub path: PathBuf,
	pub directives: usize,
	pub entries: usize,
	pub orphaned_lines: Vec<OrphanedLine>,
}

impl ValidationReport {
	pub fn is_clean(&self) -> bool {
		self.orphaned_lines.is_empty()
	}
}

/// Parse and extract an index file, reporting orphaned lines instead of
/// tolerating them silently.
pub fn validate_config_file(path: &Path) -> Result<ValidationReport> {
	let document = parse_config_file(path)?;
	let metadata = extract_from(&document, path)?;

	Ok(ValidationReport {
		path: path.to_path_buf(),
		directives: metadata.formatters.len(),
		entries: metadata.files.len(),
		orphaned_lines: document.orphaned_lines(),
	})
}
