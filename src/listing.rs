//! Building the variables for one directory listing.

use crate::config::cascade::{merge_directives, resolve_inherited};
use crate::error::{IndexError, Result};
use crate::formatter::{FormatContext, FormatterRegistry};
use crate::metadata::{IndexMetadata, parse_index_file};
use crate::settings::Settings;
use crate::variables::{FileEntry, FileKind, RequestContext, VariableSet};
use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, warn};

/// List a directory's entries, sorted by name.
///
/// Entries that cannot be inspected (unreadable metadata, non-UTF-8 names)
/// are left out. Anything that is neither a file nor a directory, including a
/// dangling symlink, is `FileKind::Unknown`.
pub fn scan_directory(directory: &Path) -> Result<IndexMap<String, FileEntry>> {
	let read_dir = std::fs::read_dir(directory).map_err(|source| IndexError::DirectoryRead {
		path: directory.to_path_buf(),
		source,
	})?;

	let mut entries = Vec::new();
	for item in read_dir {
		let item = match item {
			Ok(item) => item,
			Err(e) => {
				debug!(directory = %directory.display(), error = %e, "Skipping unreadable entry");
				continue;
			}
		};

		let name = match item.file_name().into_string() {
			Ok(name) => name,
			Err(raw) => {
				debug!(name = ?raw, "Skipping entry with non-UTF-8 name");
				continue;
			}
		};

		// Follow symlinks so a link to a directory lists as a directory
		let kind = match item.path().metadata() {
			Ok(metadata) if metadata.is_file() => FileKind::File,
			Ok(metadata) if metadata.is_dir() => FileKind::Directory,
			Ok(_) => FileKind::Unknown,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileKind::Unknown,
			Err(e) => {
				debug!(path = %item.path().display(), error = %e, "Skipping entry");
				continue;
			}
		};

		entries.push(FileEntry::from_disk(name, kind));
	}

	entries.sort_by(|a, b| a.name.cmp(&b.name));

	Ok(entries
		.into_iter()
		.map(|entry| (entry.name.clone(), entry))
		.collect())
}

/// Combine configured entries with what is on disk.
///
/// Configured entries come first and keep their descriptions; a configured
/// entry that also exists on disk picks up its type. Entries only on disk
/// follow in their scanned order.
pub fn merge_entries(
	configured: IndexMap<String, FileEntry>,
	mut on_disk: IndexMap<String, FileEntry>,
) -> IndexMap<String, FileEntry> {
	let mut merged = IndexMap::with_capacity(configured.len() + on_disk.len());

	for (name, mut entry) in configured {
		if let Some(disk_entry) = on_disk.shift_remove(&name) {
			entry.kind = entry.kind.or(disk_entry.kind);
		}
		merged.insert(name, entry);
	}

	merged.extend(on_disk);
	merged
}

/// Read the directory's own index file, if it has one.
///
/// A file that cannot be read falls back to no metadata. A nameless directive
/// is an authoring mistake and is returned as an error.
pub fn load_local_metadata(settings: &Settings, directory: &Path) -> Result<Option<IndexMetadata>> {
	let config_path = directory.join(&settings.index_file);
	if !config_path.is_file() {
		return Ok(None);
	}

	match parse_index_file(&config_path) {
		Ok(metadata) => Ok(Some(metadata)),
		Err(e @ IndexError::MalformedDirective { .. }) => Err(e),
		Err(e) => {
			warn!(path = %config_path.display(), error = %e, "Ignoring unreadable index file");
			Ok(None)
		}
	}
}

/// Build the listing variables for `directory`.
///
/// Scans the directory, merges in its index file, resolves inherited
/// directives up to `settings.root`, applies all directives (local over
/// inherited) and sets `directory_name` from the request path.
pub fn build_listing(
	settings: &Settings,
	directory: &Path,
	request: &RequestContext,
) -> Result<VariableSet> {
	build_listing_with(&FormatterRegistry::builtin(), settings, directory, request)
}

/// [`build_listing`] with a caller-supplied formatter registry.
pub fn build_listing_with(
	registry: &FormatterRegistry,
	settings: &Settings,
	directory: &Path,
	request: &RequestContext,
) -> Result<VariableSet> {
	let on_disk = scan_directory(directory)?;
	let local = load_local_metadata(settings, directory)?.unwrap_or_default();

	let files = merge_entries(local.files, on_disk);
	let inherited = resolve_inherited(directory, &settings.index_file, &settings.root);
	let directives = merge_directives(&inherited, &local.formatters);

	debug!(
		directory = %directory.display(),
		entries = files.len(),
		directives = directives.len(),
		"Building listing"
	);

	let ctx = FormatContext { directory, request };
	let mut variables = registry.apply(&directives, &ctx, VariableSet::with_files(files));
	variables.directory_name = Some(request.directory_name());

	Ok(variables)
}
