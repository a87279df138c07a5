//! Formatters turn directive values into listing variables.
//!
//! This module handles:
//! - The `Formatter` trait every directive handler implements
//! - The closed registry of built-in formatters
//! - Applying a directive set to a `VariableSet`

pub mod builtin;

pub use builtin::{CssFormatter, DescriptionFormatter, IconFormatter, TitleFormatter};

use crate::variables::{RequestContext, VariableSet, VariableUpdate};
use indexmap::IndexMap;
use std::path::Path;
use tracing::warn;

/// What a formatter gets to look at besides its value.
#[derive(Debug, Clone, Copy)]
pub struct FormatContext<'a> {
	/// The directory being listed.
	pub directory: &'a Path,

	/// The request that asked for the listing.
	pub request: &'a RequestContext,
}

/// A named handler for one kind of directive.
pub trait Formatter: Send + Sync {
	/// Directive name this formatter answers to, without the leading `/`.
	fn key(&self) -> &'static str;

	/// One-line description for listings of available formatters.
	fn summary(&self) -> &'static str;

	/// Consume a directive value.
	///
	/// May rewrite `variables` in place (e.g. per-file fields) and may return
	/// top-level fields to set afterwards.
	fn format(
		&self,
		value: &str,
		ctx: &FormatContext<'_>,
		variables: &mut VariableSet,
	) -> Option<VariableUpdate>;
}

/// Formatters keyed by name, in registration order.
pub struct FormatterRegistry {
	formatters: IndexMap<&'static str, Box<dyn Formatter>>,
}

impl FormatterRegistry {
	/// A registry with no formatters.
	pub fn empty() -> Self {
		Self {
			formatters: IndexMap::new(),
		}
	}

	/// The built-in formatters: `css`, `title`, `icon`, `description`.
	pub fn builtin() -> Self {
		let mut registry = Self::empty();
		registry.register(Box::new(CssFormatter));
		registry.register(Box::new(TitleFormatter::default()));
		registry.register(Box::new(IconFormatter));
		registry.register(Box::new(DescriptionFormatter));
		registry
	}

	/// Add a formatter, replacing any registered under the same key.
	pub fn register(&mut self, formatter: Box<dyn Formatter>) {
		self.formatters.insert(formatter.key(), formatter);
	}

	pub fn get(&self, key: &str) -> Option<&dyn Formatter> {
		self.formatters.get(key).map(|f| f.as_ref())
	}

	/// `(key, summary)` for each registered formatter.
	pub fn catalogue(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
		self.formatters.values().map(|f| (f.key(), f.summary()))
	}

	/// Apply directives in order. Unknown names are logged and skipped.
	pub fn apply(
		&self,
		directives: &IndexMap<String, String>,
		ctx: &FormatContext<'_>,
		mut variables: VariableSet,
	) -> VariableSet {
		for (name, value) in directives {
			let Some(formatter) = self.get(name) else {
				warn!(
					formatter = %name,
					directory = %ctx.directory.display(),
					"Formatter not found"
				);
				continue;
			};

			if let Some(update) = formatter.format(value, ctx, &mut variables) {
				variables.apply_update(update);
			}
		}

		variables
	}
}

impl Default for FormatterRegistry {
	fn default() -> Self {
		Self::builtin()
	}
}

/// Apply directives with the built-in formatters.
pub fn apply_formatters(
	directives: &IndexMap<String, String>,
	directory: &Path,
	request: &RequestContext,
	variables: VariableSet,
) -> VariableSet {
	let ctx = FormatContext { directory, request };
	FormatterRegistry::builtin().apply(directives, &ctx, variables)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::variables::FileEntry;

	fn directives(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	fn base_variables() -> VariableSet {
		let mut files = IndexMap::new();
		files.insert(
			"intro.md".to_string(),
			FileEntry::from_config("intro.md", "Intro: longer text"),
		);
		files.insert("notes".to_string(), FileEntry::from_config("notes", "JustOneThing"));
		VariableSet::with_files(files)
	}

	#[test]
	fn test_catalogue_order() {
		let keys: Vec<_> = FormatterRegistry::builtin().catalogue().map(|(k, _)| k).collect();
		assert_eq!(keys, vec!["css", "title", "icon", "description"]);
	}

	#[test]
	fn test_unknown_formatter_is_skipped() {
		let request = RequestContext::new("/");
		let result = apply_formatters(
			&directives(&[("bogus", "x"), ("icon", "y")]),
			Path::new("/srv"),
			&request,
			VariableSet::default(),
		);

		assert_eq!(result.icon.as_deref(), Some("y"));
		assert!(result.title.is_none());
	}

	#[test]
	fn test_apply_all_builtins() {
		let request = RequestContext::new("/docs/");
		let result = apply_formatters(
			&directives(&[
				("css", "/a.css  /b.css"),
				("title", "My Page: https://example.com/x"),
				("description", "  All the docs  "),
			]),
			Path::new("/srv/docs"),
			&request,
			base_variables(),
		);

		assert_eq!(
			result.css,
			Some(vec!["/a.css".to_string(), "/b.css".to_string()])
		);
		assert_eq!(result.title.as_deref(), Some("My Page"));
		assert_eq!(result.link.as_deref(), Some("https://example.com/x"));
		assert_eq!(result.description.as_deref(), Some("All the docs"));
		assert_eq!(result.files["intro.md"].title.as_deref(), Some("Intro"));
	}

	#[test]
	fn test_apply_is_repeatable() {
		let request = RequestContext::new("/");
		let set = directives(&[("title", "Docs"), ("css", "x.css"), ("icon", "i.png")]);
		let directory = Path::new("/srv");

		let first = apply_formatters(&set, directory, &request, base_variables());
		let second = apply_formatters(&set, directory, &request, base_variables());

		assert_eq!(first, second);
	}

	#[test]
	fn test_empty_directives_leave_variables_untouched() {
		let request = RequestContext::new("/");
		let result = apply_formatters(
			&IndexMap::new(),
			Path::new("/srv"),
			&request,
			base_variables(),
		);
		assert_eq!(result, base_variables());
	}

	struct Shout;

	impl Formatter for Shout {
		fn key(&self) -> &'static str {
			"shout"
		}

		fn summary(&self) -> &'static str {
			"Upper-case page title."
		}

		fn format(
			&self,
			value: &str,
			_ctx: &FormatContext<'_>,
			_variables: &mut VariableSet,
		) -> Option<VariableUpdate> {
			Some(VariableUpdate {
				title: Some(value.to_uppercase()),
				..Default::default()
			})
		}
	}

	#[test]
	fn test_register_custom_formatter() {
		let mut registry = FormatterRegistry::empty();
		registry.register(Box::new(Shout));
		let request = RequestContext::new("/");
		let ctx = FormatContext {
			directory: Path::new("/srv"),
			request: &request,
		};

		let result = registry.apply(
			&directives(&[("shout", "hello"), ("css", "ignored.css")]),
			&ctx,
			VariableSet::default(),
		);

		assert_eq!(result.title.as_deref(), Some("HELLO"));
		assert!(result.css.is_none());
	}
}
