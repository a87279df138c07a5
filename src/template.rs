//! Choosing between the built-in listing template and a per-directory one.

use crate::settings::Settings;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How the host should render a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateChoice {
	/// No template file in the directory; use the built-in one.
	Default,

	/// Render this file as a template. Only returned when local templates are
	/// enabled and the file is valid UTF-8.
	Local(PathBuf),

	/// Serve this file unchanged as HTML.
	Static(PathBuf),
}

/// Decide how `directory` should be rendered.
///
/// A template file is only rendered when `allow_local_templates` is set;
/// otherwise, or when it is not valid UTF-8, it is served as-is.
pub fn select_template(settings: &Settings, directory: &Path) -> TemplateChoice {
	let template_path = directory.join(&settings.template_name);
	if !template_path.is_file() {
		return TemplateChoice::Default;
	}

	if !settings.allow_local_templates {
		return TemplateChoice::Static(template_path);
	}

	match std::fs::read(&template_path) {
		Ok(bytes) if std::str::from_utf8(&bytes).is_ok() => TemplateChoice::Local(template_path),
		Ok(_) => {
			debug!(path = %template_path.display(), "Template is not UTF-8, serving as static");
			TemplateChoice::Static(template_path)
		}
		Err(e) => {
			debug!(
				path = %template_path.display(),
				error = %e,
				"Cannot read template, serving as static"
			);
			TemplateChoice::Static(template_path)
		}
	}
}
