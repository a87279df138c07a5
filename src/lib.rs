//! k0sngin - directory listing metadata from cascading `index.ini` files.
//!
//! This library provides the core of the directory indexer, including:
//! - Parsing the sectionless `key = value` index file format
//! - Splitting index files into formatter directives and file entries
//! - Resolving inherited directives up to the served root
//! - Applying formatters to build the variables a renderer consumes
//!
//! # Example
//!
//! ```no_run
//! use k0sngin::listing::build_listing;
//! use k0sngin::settings::Settings;
//! use k0sngin::variables::RequestContext;
//! use std::path::Path;
//!
//! let settings = Settings::new("/srv/files");
//! let request = RequestContext::new("/docs/");
//! let variables = build_listing(&settings, Path::new("/srv/files/docs"), &request).unwrap();
//!
//! for entry in variables.files.values() {
//!     println!("{}: {:?}", entry.name, entry.title);
//! }
//! ```

pub mod config;
pub mod error;
pub mod formatter;
pub mod listing;
pub mod metadata;
pub mod settings;
pub mod template;
pub mod variables;

pub use error::{IndexError, Result};
