//! Index file loading and parsing for k0sngin.
//!
//! This module handles:
//! - Parsing the sectionless `key = value` index file format
//! - Directory cascade discovery bounded by the served root
//! - Directive merging

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{
	absolute_path, cascade_directories, is_within_root, merge_directives, normalize_path,
	resolve_cascade, resolve_inherited,
};
pub use parser::{parse_config_file, parse_config_str};
pub use types::{ConfigDocument, ORPHANED_LINES_KEY, OrphanedLine};
