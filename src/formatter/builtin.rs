use crate::formatter::{FormatContext, Formatter};
use crate::variables::{VariableSet, VariableUpdate};

/// Separator between a file's title and its description.
pub const DEFAULT_SEPARATOR: char = ':';

/// `css`: whitespace-separated stylesheet paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssFormatter;

impl Formatter for CssFormatter {
	fn key(&self) -> &'static str {
		"css"
	}

	fn summary(&self) -> &'static str {
		"Space-separated list of CSS paths to include in the directory index."
	}

	fn format(
		&self,
		value: &str,
		_ctx: &FormatContext<'_>,
		_variables: &mut VariableSet,
	) -> Option<VariableUpdate> {
		let stylesheets: Vec<String> = value.split_whitespace().map(str::to_string).collect();
		if stylesheets.is_empty() {
			return None;
		}
		Some(VariableUpdate {
			css: Some(stylesheets),
			..Default::default()
		})
	}
}

/// `icon`: favicon URL, taken as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct IconFormatter;

impl Formatter for IconFormatter {
	fn key(&self) -> &'static str {
		"icon"
	}

	fn summary(&self) -> &'static str {
		"URL for favicon for the directory index."
	}

	fn format(
		&self,
		value: &str,
		_ctx: &FormatContext<'_>,
		_variables: &mut VariableSet,
	) -> Option<VariableUpdate> {
		Some(VariableUpdate {
			icon: Some(value.trim().to_string()),
			..Default::default()
		})
	}
}

/// `title`: page title with an optional link, plus per-file title splitting.
///
/// `Title: https://host/path` sets both `title` and `link`. A colon with no
/// `://` after it is part of the title. Every file description is then split
/// on the separator into `title` and `description`; a description without
/// the separator becomes the title.
#[derive(Debug, Clone, Copy)]
pub struct TitleFormatter {
	pub separator: char,
}

impl Default for TitleFormatter {
	fn default() -> Self {
		Self {
			separator: DEFAULT_SEPARATOR,
		}
	}
}

impl TitleFormatter {
	fn split_file_descriptions(&self, variables: &mut VariableSet) {
		for entry in variables.files.values_mut() {
			let split = entry
				.description
				.as_deref()
				.and_then(|d| d.split_once(self.separator))
				.map(|(title, rest)| (title.trim().to_string(), rest.trim().to_string()));

			match split {
				Some((title, description)) => {
					entry.title = Some(if title.is_empty() {
						entry.name.clone()
					} else {
						title
					});
					entry.description = Some(description);
				}
				None => entry.title = entry.description.take(),
			}
		}
	}
}

impl Formatter for TitleFormatter {
	fn key(&self) -> &'static str {
		"title"
	}

	fn summary(&self) -> &'static str {
		"Page title (optionally `Title: URL`); splits file descriptions into title and description."
	}

	fn format(
		&self,
		value: &str,
		_ctx: &FormatContext<'_>,
		variables: &mut VariableSet,
	) -> Option<VariableUpdate> {
		self.split_file_descriptions(variables);

		let value = value.trim();
		if value.is_empty() {
			return None;
		}

		let update = match value.split_once(':') {
			Some((title, link)) if link.contains("://") => VariableUpdate {
				title: Some(title.trim().to_string()),
				link: Some(link.trim().to_string()),
				..Default::default()
			},
			_ => VariableUpdate {
				title: Some(value.to_string()),
				..Default::default()
			},
		};

		Some(update)
	}
}

/// `description`: page description. Leaves file entries alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionFormatter;

impl Formatter for DescriptionFormatter {
	fn key(&self) -> &'static str {
		"description"
	}

	fn summary(&self) -> &'static str {
		"Description text for the directory index."
	}

	fn format(
		&self,
		value: &str,
		_ctx: &FormatContext<'_>,
		_variables: &mut VariableSet,
	) -> Option<VariableUpdate> {
		Some(VariableUpdate {
			description: Some(value.trim().to_string()),
			..Default::default()
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::variables::{FileEntry, FileKind, RequestContext};
	use indexmap::IndexMap;
	use std::path::Path;

	fn run(
		formatter: &dyn Formatter,
		value: &str,
		variables: &mut VariableSet,
	) -> Option<VariableUpdate> {
		let request = RequestContext::new("/");
		let ctx = FormatContext {
			directory: Path::new("/srv"),
			request: &request,
		};
		formatter.format(value, &ctx, variables)
	}

	fn with_descriptions(entries: &[(&str, Option<&str>)]) -> VariableSet {
		let files: IndexMap<String, FileEntry> = entries
			.iter()
			.map(|(name, description)| {
				let entry = match description {
					Some(d) => FileEntry::from_config(*name, *d),
					None => FileEntry::from_disk(*name, FileKind::File),
				};
				(name.to_string(), entry)
			})
			.collect();
		VariableSet::with_files(files)
	}

	#[test]
	fn test_css_splits_on_whitespace() {
		let mut variables = VariableSet::default();
		let update = run(&CssFormatter, " a.css \t b.css\nc.css ", &mut variables).unwrap();
		assert_eq!(
			update.css,
			Some(vec!["a.css".to_string(), "b.css".to_string(), "c.css".to_string()])
		);
	}

	#[test]
	fn test_css_blank_contributes_nothing() {
		assert!(run(&CssFormatter, "", &mut VariableSet::default()).is_none());
		assert!(run(&CssFormatter, "   ", &mut VariableSet::default()).is_none());
	}

	#[test]
	fn test_icon_is_verbatim() {
		let mut variables = VariableSet::default();
		let update = run(&IconFormatter, "  not a url at all ", &mut variables).unwrap();
		assert_eq!(update.icon.as_deref(), Some("not a url at all"));
	}

	#[test]
	fn test_title_with_link() {
		let update = run(
			&TitleFormatter::default(),
			"My Page: https://example.com/x",
			&mut VariableSet::default(),
		)
		.unwrap();

		assert_eq!(update.title.as_deref(), Some("My Page"));
		assert_eq!(update.link.as_deref(), Some("https://example.com/x"));
	}

	#[test]
	fn test_title_colon_without_url() {
		let mut variables = VariableSet::default();
		let update = run(&TitleFormatter::default(), "Foo: bar", &mut variables).unwrap();

		assert_eq!(update.title.as_deref(), Some("Foo: bar"));
		assert!(update.link.is_none());
	}

	#[test]
	fn test_title_bare_url_is_not_split() {
		let update = run(
			&TitleFormatter::default(),
			"https://example.com",
			&mut VariableSet::default(),
		)
		.unwrap();

		assert_eq!(update.title.as_deref(), Some("https://example.com"));
		assert!(update.link.is_none());
	}

	#[test]
	fn test_title_without_colon() {
		let mut variables = VariableSet::default();
		let update = run(&TitleFormatter::default(), "  Plain Title ", &mut variables).unwrap();
		assert_eq!(update.title.as_deref(), Some("Plain Title"));
	}

	#[test]
	fn test_title_splits_file_descriptions() {
		let mut variables = with_descriptions(&[
			("intro.md", Some("Intro: longer text")),
			("notes", Some("JustOneThing")),
			("odd", Some(": no title here")),
			("disk-only", None),
		]);

		run(&TitleFormatter::default(), "Docs", &mut variables);

		let intro = &variables.files["intro.md"];
		assert_eq!(intro.title.as_deref(), Some("Intro"));
		assert_eq!(intro.description.as_deref(), Some("longer text"));

		let notes = &variables.files["notes"];
		assert_eq!(notes.title.as_deref(), Some("JustOneThing"));
		assert!(notes.description.is_none());

		let odd = &variables.files["odd"];
		assert_eq!(odd.title.as_deref(), Some("odd"));
		assert_eq!(odd.description.as_deref(), Some("no title here"));

		let disk_only = &variables.files["disk-only"];
		assert!(disk_only.title.is_none());
		assert!(disk_only.description.is_none());
	}

	#[test]
	fn test_empty_title_still_splits_files() {
		let mut variables = with_descriptions(&[("intro.md", Some("Intro: longer text"))]);

		let update = run(&TitleFormatter::default(), "  ", &mut variables);

		assert!(update.is_none());
		assert_eq!(variables.files["intro.md"].title.as_deref(), Some("Intro"));
	}

	#[test]
	fn test_custom_separator() {
		let mut variables = with_descriptions(&[("a", Some("Head | tail: more"))]);
		let formatter = TitleFormatter { separator: '|' };

		run(&formatter, "", &mut variables);

		assert_eq!(variables.files["a"].title.as_deref(), Some("Head"));
		assert_eq!(variables.files["a"].description.as_deref(), Some("tail: more"));
	}

	#[test]
	fn test_description_leaves_files_alone() {
		let mut variables = with_descriptions(&[("intro.md", Some("Intro: longer text"))]);
		let before = variables.files.clone();

		let update = run(&DescriptionFormatter, " About this folder ", &mut variables).unwrap();

		assert_eq!(update.description.as_deref(), Some("About this folder"));
		assert_eq!(variables.files, before);
	}
}
