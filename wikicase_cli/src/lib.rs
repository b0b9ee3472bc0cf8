use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Turn PascalCase, camelCase and snake_case words in your notes into wiki links.",
	long_about = "wikicase finds identifier-like words in markdown notes and wraps them in \
	              `[[wiki links]]`, with a readable alias when smart aliasing is on.\n\nCode \
	              fences, inline code and frontmatter are never touched, and words that are \
	              already linked stay as they are.\n\nQuick start:\n  wikicase init    Create \
	              a wikicase.toml\n  wikicase update  Link every markdown file\n  wikicase \
	              check   List files with pending links"
)]
pub struct WikicaseCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a `wikicase.toml` with the default settings.
	///
	/// If a config file already exists in any of the supported locations,
	/// this command leaves it alone and exits successfully.
	Init,
	/// Report files that would change.
	///
	/// Exits with status 1 when at least one file has words that would be
	/// linked, which makes it usable in CI.
	Check {
		/// Show a diff of the pending changes for each file.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format. Use `text` for humans, `json` for tools, or `github`
		/// for GitHub Actions annotations.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,

		/// Only check these files instead of scanning the project.
		files: Vec<PathBuf>,
	},
	/// Link identifiers in every markdown file of the project.
	///
	/// Use `--dry-run` to list the files that would change, or `--watch` to
	/// keep converting as files are saved.
	Update {
		/// List files that would change without writing them.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Keep running and convert files after they change. Requires
		/// `live_mode = true`. Changes are batched for `debounce_ms`.
		#[arg(long, default_value_t = false)]
		watch: bool,

		/// Only convert these files instead of scanning the project.
		files: Vec<PathBuf>,
	},
	/// Convert one line as if it were being typed, leaving the word at the
	/// cursor alone.
	///
	/// Prints the converted line followed by the new cursor column.
	Line {
		/// Cursor column, counted in characters from the start of the line.
		#[arg(long, default_value_t = 0)]
		cursor: usize,

		/// The line to convert.
		text: String,
	},
	/// Show or change settings.
	Config {
		#[command(subcommand)]
		command: ConfigCommand,
	},
}

#[derive(Subcommand)]
pub enum ConfigCommand {
	/// Print the effective settings.
	Show,
	/// Change one setting and save it to the config file.
	///
	/// Numbers must be plain non-negative integers with nothing after them.
	/// Values such as `12abc` are reported and the previous value is kept.
	/// `ignore_list` takes a comma-separated list.
	Set {
		/// Setting name, e.g. `min_length` or `ignore-list`.
		key: String,
		/// New value.
		value: String,
	},
	/// Print the path of the config file that is read and written.
	Path,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
	/// GitHub Actions annotation format. Emits `::warning` annotations that
	/// appear inline on pull request diffs.
	Github,
}
