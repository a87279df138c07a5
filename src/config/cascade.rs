use crate::metadata::parse_index_file;
use indexmap::IndexMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Resolve `.` and `..` lexically, without touching the filesystem.
///
/// `..` at the filesystem root stays at the root; leading `..` in a relative
/// path is kept.
pub fn normalize_path(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();

	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => match normalized.components().next_back() {
				Some(Component::Normal(_)) => {
					normalized.pop();
				}
				Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
				_ => normalized.push(".."),
			},
			other => normalized.push(other.as_os_str()),
		}
	}

	normalized
}

/// Make `path` absolute against the current directory, then normalize it.
///
/// Fails for an empty path or when the current directory is unavailable.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
	Ok(normalize_path(&std::path::absolute(path)?))
}

/// True when `candidate` is `root` or lies beneath it.
///
/// Both paths are made absolute first, then compared component by
/// component, so `/r/ab` is not inside `/r/a`. A path that cannot be made
/// absolute is never within the root.
pub fn is_within_root(candidate: &Path, root: &Path) -> bool {
	match (absolute_path(candidate), absolute_path(root)) {
		(Ok(candidate), Ok(root)) => candidate.starts_with(root),
		_ => false,
	}
}

/// Directories the cascade visits, nearest first.
///
/// Walks up from `start_dir` and stops at the first directory outside `root`
/// or at the filesystem root. A start outside `root` yields nothing.
/// Relative paths are resolved against the current directory, and the
/// returned directories are absolute.
pub fn cascade_directories(start_dir: &Path, root: &Path) -> Vec<PathBuf> {
	let (root, mut current_dir) = match (absolute_path(root), absolute_path(start_dir)) {
		(Ok(root), Ok(start)) => (root, start),
		(Err(e), _) | (_, Err(e)) => {
			debug!(
				start = %start_dir.display(),
				root = %root.display(),
				error = %e,
				"Cannot resolve cascade paths"
			);
			return Vec::new();
		}
	};
	let mut directories = Vec::new();

	loop {
		if !current_dir.starts_with(&root) {
			debug!(
				directory = %current_dir.display(),
				root = %root.display(),
				"Stopping cascade above root"
			);
			break;
		}

		directories.push(current_dir.clone());

		// Move to parent directory
		match current_dir.parent() {
			Some(parent) if parent != current_dir => current_dir = parent.to_path_buf(),
			_ => break,
		}
	}

	directories
}

/// Collect formatter directives from `start_dir` and its ancestors up to `root`.
///
/// Nearer directories win: a directive set by a descendant is never replaced
/// by one from an ancestor. Index files that fail to read or extract are
/// skipped and the walk continues upward.
pub fn resolve_cascade(
	start_dir: &Path,
	index_file: &str,
	root: &Path,
) -> IndexMap<String, String> {
	let mut directives = IndexMap::new();

	for directory in cascade_directories(start_dir, root) {
		let config_path = directory.join(index_file);
		if !config_path.is_file() {
			continue;
		}

		match parse_index_file(&config_path) {
			Ok(metadata) => {
				for (name, value) in metadata.formatters {
					directives.entry(name).or_insert(value);
				}
			}
			Err(e) => {
				debug!(path = %config_path.display(), error = %e, "Skipping index file in cascade");
			}
		}
	}

	directives
}

/// Directives `directory` inherits from its ancestors, excluding its own
/// index file.
pub fn resolve_inherited(
	directory: &Path,
	index_file: &str,
	root: &Path,
) -> IndexMap<String, String> {
	let parent = absolute_path(directory)
		.ok()
		.and_then(|directory| directory.parent().map(Path::to_path_buf));

	match parent {
		Some(parent) => resolve_cascade(&parent, index_file, root),
		None => IndexMap::new(),
	}
}

/// Merge local directives over inherited ones.
///
/// Inherited names keep their position; names only set locally are appended.
pub fn merge_directives(
	inherited: &IndexMap<String, String>,
	local: &IndexMap<String, String>,
) -> IndexMap<String, String> {
	let mut merged = inherited.clone();
	for (name, value) in local {
		merged.insert(name.clone(), value.clone());
	}
	merged
}
