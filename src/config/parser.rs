use crate::config::types::{ConfigDocument, ORPHANED_LINES_KEY};
use crate::error::{IndexError, Result};
use indexmap::IndexMap;
use std::path::Path;

/// Parse an index file from the given path.
///
/// The file must be valid UTF-8; anything else is a read error.
pub fn parse_config_file(path: &Path) -> Result<ConfigDocument> {
	let content = std::fs::read_to_string(path).map_err(|source| IndexError::ConfigRead {
		path: path.to_path_buf(),
		source,
	})?;

	Ok(parse_config_str(&content))
}

/// Parse index file contents.
///
/// Never fails: lines that cannot be placed are collected under
/// [`ORPHANED_LINES_KEY`] as `"Line N: content"` entries joined by `"; "`.
pub fn parse_config_str(content: &str) -> ConfigDocument {
	let mut entries: IndexMap<String, String> = IndexMap::new();
	let mut orphaned: Vec<String> = Vec::new();
	let mut current: Option<(String, Vec<String>)> = None;

	for (index, raw_line) in content.lines().enumerate() {
		let line_number = index + 1;
		let line = raw_line.trim_end();

		// Blank lines never close a continuation
		if line.is_empty() {
			continue;
		}

		if line.starts_with([' ', '\t']) {
			match current.as_mut() {
				Some((_, parts)) => parts.push(line.trim().to_string()),
				None => orphaned.push(format!("Line {line_number}: {line}")),
			}
			continue;
		}

		if let Some((key, parts)) = current.take() {
			entries.insert(key, parts.join(" "));
		}

		match split_key_value(line) {
			Some((key, value)) => {
				let parts = if value.is_empty() {
					Vec::new()
				} else {
					vec![value.to_string()]
				};
				current = Some((key.to_string(), parts));
			}
			None => orphaned.push(format!("Line {line_number}: {line}")),
		}
	}

	if let Some((key, parts)) = current.take() {
		entries.insert(key, parts.join(" "));
	}

	if !orphaned.is_empty() {
		entries.insert(ORPHANED_LINES_KEY.to_string(), orphaned.join("; "));
	}

	ConfigDocument::from_entries(entries)
}

/// Split on the first `=`. Returns `None` when there is no `=` or the key is empty.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
	let (key, value) = line.split_once('=')?;
	let key = key.trim();
	if key.is_empty() {
		return None;
	}
	Some((key, value.trim()))
}
