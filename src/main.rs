use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use k0sngin::config::{cascade_directories, parse_config_file, parse_config_str};
use k0sngin::formatter::FormatterRegistry;
use k0sngin::listing::build_listing;
use k0sngin::metadata::validate_config_file;
use k0sngin::settings::{Settings, user_settings_path};
use k0sngin::template::{TemplateChoice, select_template};
use k0sngin::variables::RequestContext;

const DEFAULT_LOG_FILTER: &str = "k0sngin=warn";

#[derive(Parser)]
#[command(name = "k0sngin")]
#[command(
	author,
	version,
	about = "Inspect index.ini directory metadata and the listings built from it"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	/// Log debug output to stderr
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Parse an index file and print it as JSON
	Parse {
		/// Index file to read; stdin when omitted or `-`
		file: Option<PathBuf>,
	},
	/// List the available formatters
	Formatters,
	/// Build the listing variables for a directory and print them as JSON
	Index {
		directory: PathBuf,

		#[command(flatten)]
		settings: SettingsArgs,

		/// Request path used for the directory name
		#[arg(long, default_value = "/")]
		url_path: String,
	},
	/// Check every index file from a directory up to the root
	Validate {
		/// Directory to start from; the current directory when omitted
		directory: Option<PathBuf>,

		#[command(flatten)]
		settings: SettingsArgs,
	},
	/// Show which template a directory listing would use
	Template {
		directory: PathBuf,

		#[command(flatten)]
		settings: SettingsArgs,
	},
}

#[derive(clap::Args)]
struct SettingsArgs {
	/// Top of the served tree; defaults to the directory itself
	#[arg(long, value_name = "DIR")]
	root: Option<PathBuf>,

	/// Settings file (TOML)
	#[arg(long, value_name = "FILE")]
	settings: Option<PathBuf>,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli.command) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("k0sngin=debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(false),
		)
		.init();
}

fn run(command: Commands) -> Result<ExitCode> {
	match command {
		Commands::Parse { file } => handle_parse(file.as_deref()),
		Commands::Formatters => handle_formatters(),
		Commands::Index {
			directory,
			settings,
			url_path,
		} => handle_index(&directory, &settings, &url_path),
		Commands::Validate {
			directory,
			settings,
		} => {
			let directory = match directory {
				Some(directory) => directory,
				None => std::env::current_dir().context("Failed to get current directory")?,
			};
			handle_validate(&directory, &settings)
		}
		Commands::Template {
			directory,
			settings,
		} => handle_template(&directory, &settings),
	}
}

/// Settings file from `--settings`, else the user settings file, else
/// defaults rooted at `--root` or the directory. Environment overrides and
/// `--root` are applied last.
fn resolve_settings(args: &SettingsArgs, directory: &Path) -> Result<Settings> {
	let settings = match &args.settings {
		Some(path) => Settings::load(path)
			.with_context(|| format!("Failed to load settings from {}", path.display()))?,
		None => match user_settings_path() {
			Ok(path) if path.is_file() => Settings::load(&path)
				.with_context(|| format!("Failed to load settings from {}", path.display()))?,
			_ => Settings::new(args.root.as_deref().unwrap_or(directory)),
		},
	};

	let mut settings = settings.with_env_overrides();
	if let Some(root) = &args.root {
		settings.root = root.clone();
	}
	settings.validate().context("Invalid settings")?;

	Ok(settings)
}

fn handle_parse(file: Option<&Path>) -> Result<ExitCode> {
	let document = match file {
		Some(path) if path != Path::new("-") => parse_config_file(path)
			.with_context(|| format!("Failed to parse {}", path.display()))?,
		_ => {
			let content =
				std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?;
			parse_config_str(&content)
		}
	};

	let json = serde_json::to_string_pretty(&document).context("Failed to serialize document")?;
	println!("{}", json);
	Ok(ExitCode::SUCCESS)
}

fn handle_formatters() -> Result<ExitCode> {
	for (key, summary) in FormatterRegistry::builtin().catalogue() {
		println!("{}: {}", key, summary);
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_index(directory: &Path, args: &SettingsArgs, url_path: &str) -> Result<ExitCode> {
	let settings = resolve_settings(args, directory)?;
	let request = RequestContext::new(url_path);

	let variables = build_listing(&settings, directory, &request)
		.with_context(|| format!("Failed to build listing for {}", directory.display()))?;

	let json = serde_json::to_string_pretty(&variables).context("Failed to serialize listing")?;
	println!("{}", json);
	Ok(ExitCode::SUCCESS)
}

fn handle_validate(directory: &Path, args: &SettingsArgs) -> Result<ExitCode> {
	let settings = resolve_settings(args, directory)?;
	let mut found = 0;
	let mut failed = false;

	for dir in cascade_directories(directory, &settings.root) {
		let config_path = dir.join(&settings.index_file);
		if !config_path.is_file() {
			continue;
		}
		found += 1;

		match validate_config_file(&config_path) {
			Ok(report) if report.is_clean() => {
				println!(
					"ok: {} ({} directives, {} entries)",
					config_path.display(),
					report.directives,
					report.entries
				);
			}
			Ok(report) => {
				failed = true;
				println!("invalid: {}", config_path.display());
				for line in &report.orphaned_lines {
					println!("  orphaned {}", line);
				}
			}
			Err(e) => {
				failed = true;
				println!("invalid: {}", config_path.display());
				println!("  {:#}", anyhow::Error::from(e));
			}
		}
	}

	if found == 0 {
		println!("No index files found.");
	}

	Ok(if failed {
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	})
}

fn handle_template(directory: &Path, args: &SettingsArgs) -> Result<ExitCode> {
	let settings = resolve_settings(args, directory)?;

	match select_template(&settings, directory) {
		TemplateChoice::Default => println!("default"),
		TemplateChoice::Local(path) => println!("local: {}", path.display()),
		TemplateChoice::Static(path) => println!("static: {}", path.display()),
	}
	Ok(ExitCode::SUCCESS)
}
