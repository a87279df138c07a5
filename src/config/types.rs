use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Reserved key under which the parser reports lines it could not place.
pub const ORPHANED_LINES_KEY: &str = "_orphaned_lines";

static ORPHAN_MARKER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?:^|; )Line (\d+): ").expect("orphan marker pattern is valid")
});

/// Parsed contents of an index file: keys and values in source order.
///
/// Duplicate keys keep the position of their first occurrence and the value
/// of their last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigDocument {
	entries: IndexMap<String, String>,
}

impl ConfigDocument {
	pub(crate) fn from_entries(entries: IndexMap<String, String>) -> Self {
		Self { entries }
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries.get(key).map(String::as_str)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate over `(key, value)` pairs in document order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Lines the parser recorded under [`ORPHANED_LINES_KEY`], split back apart.
	///
	/// Callers that want strict validation check this; the parser itself never
	/// fails on them.
	pub fn orphaned_lines(&self) -> Vec<OrphanedLine> {
		let Some(joined) = self.get(ORPHANED_LINES_KEY) else {
			return Vec::new();
		};

		let markers: Vec<_> = ORPHAN_MARKER.captures_iter(joined).collect();
		let mut lines = Vec::with_capacity(markers.len());

		for (i, caps) in markers.iter().enumerate() {
			let Some(whole) = caps.get(0) else { continue };
			let end = markers
				.get(i + 1)
				.and_then(|next| next.get(0))
				.map_or(joined.len(), |next| next.start());
			let Ok(line_number) = caps[1].parse::<usize>() else {
				continue;
			};
			lines.push(OrphanedLine {
				line_number,
				content: joined[whole.end()..end].to_string(),
			});
		}

		lines
	}
}

impl FromIterator<(String, String)> for ConfigDocument {
	fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
		Self::from_entries(iter.into_iter().collect())
	}
}

/// A line that was neither `key = value` nor a continuation of an open key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedLine {
	/// 1-based line number in the source text.
	pub line_number: usize,

	/// The line as written, trailing whitespace removed.
	pub content: String,
}

impl fmt::Display for OrphanedLine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Line {}: {}", self.line_number, self.content)
	}
}
