use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;
use wikicase_cli::Commands;
use wikicase_cli::ConfigCommand;
use wikicase_cli::OutputFormat;
use wikicase_cli::WikicaseCli;
use wikicase_core::AnyResult;
use wikicase_core::ConfigStore;
use wikicase_core::CustomPatternStatus;
use wikicase_core::Engine;
use wikicase_core::FileConfigStore;
use wikicase_core::PatternSet;
use wikicase_core::SettingKey;
use wikicase_core::SettingUpdate;
use wikicase_core::WikicaseConfig;
use wikicase_core::WikicaseError;
use wikicase_core::project::ProjectConversion;
use wikicase_core::project::ScanOptions;
use wikicase_core::project::collect_files;
use wikicase_core::project::compute_conversions;
use wikicase_core::project::write_conversions;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV_VAR: &str = "WIKICASE_LOG";

static USE_COLOR: AtomicBool = AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = WikicaseCli::parse();

	// Respect NO_COLOR, --no-color, and terminals without color support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	USE_COLOR.store(use_color, Ordering::Relaxed);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose);

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Check {
			diff,
			format,
			files,
		}) => run_check(&args, *diff, *format, files),
		Some(Commands::Update {
			dry_run,
			watch,
			files,
		}) => run_update(&args, *dry_run, *watch, files),
		Some(Commands::Line { cursor, text }) => run_line(&args, *cursor, text),
		Some(Commands::Config { command }) => run_config(&args, command),
		None => {
			eprintln!("No subcommand specified. Run `wikicase --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<WikicaseError>() {
			Ok(error) => {
				let report: miette::Report = (*error).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool) {
	let default_directive = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
		.unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn resolve_root(args: &WikicaseCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(root: &Path) -> AnyResult<WikicaseConfig> {
	Ok(FileConfigStore::new(root).load()?)
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("{label:<16} {value}");
}

fn run_init(args: &WikicaseCli) -> AnyResult<()> {
	let root = resolve_root(args);
	let store = FileConfigStore::new(&root);

	if store.exists() {
		println!("Config file already exists: {}", store.path().display());
		return Ok(());
	}

	let config = WikicaseConfig::default();
	let content = format!(
		"# wikicase configuration\n# Run `wikicase config show` to see the effective \
		 settings.\n\n{}",
		config.to_toml()?
	);
	std::fs::write(store.path(), content)?;
	println!("Created {}", make_relative(&store.path(), &root));

	println!();
	println!("Next steps:");
	println!("  1. Run `wikicase check --diff` to preview the links");
	println!("  2. Run `wikicase update` to write them");

	Ok(())
}

/// Files named on the command line, or every file the project scan finds.
fn resolve_targets(root: &Path, config: &WikicaseConfig, files: &[PathBuf]) -> AnyResult<Vec<PathBuf>> {
	if !files.is_empty() {
		return Ok(files.iter().map(|file| root.join(file)).collect());
	}

	let options = ScanOptions::from_config(config)?;
	Ok(collect_files(root, &options)?)
}

fn compute_for(args: &WikicaseCli, files: &[PathBuf]) -> AnyResult<ProjectConversion> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	warn_on_invalid_custom_pattern(&config);
	let targets = resolve_targets(&root, &config, files)?;

	if args.verbose {
		println!("Scanning {} file(s)", targets.len());
	}

	let engine = Engine::new(config);
	Ok(compute_conversions(&engine, &targets)?)
}

fn warn_on_invalid_custom_pattern(config: &WikicaseConfig) {
	if let CustomPatternStatus::Invalid { source, message } =
		PatternSet::from_config(&config.patterns).custom_status()
	{
		eprintln!(
			"{} custom pattern `{source}` is invalid and was skipped: {message}",
			colored!("warning:", yellow)
		);
	}
}

fn run_check(
	args: &WikicaseCli,
	show_diff: bool,
	format: OutputFormat,
	files: &[PathBuf],
) -> AnyResult<()> {
	let root = resolve_root(args);
	let conversions = compute_for(args, files)?;

	if conversions.is_clean() {
		match format {
			OutputFormat::Json => {
				println!("{{\"ok\":true,\"files\":[]}}");
			}
			OutputFormat::Github => {
				println!("No pending links.");
			}
			OutputFormat::Text => {
				println!(
					"Check passed: no pending links in {} file(s).",
					conversions.scanned
				);
			}
		}
		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			let entries: Vec<serde_json::Value> = conversions
				.files
				.iter()
				.map(|file| {
					let links: Vec<String> = file
						.references
						.iter()
						.map(ToString::to_string)
						.collect();
					serde_json::json!({
						"file": make_relative(&file.file, &root),
						"links": links,
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": false,
				"files": entries,
			});
			println!("{output}");
		}
		OutputFormat::Github => {
			for file in &conversions.files {
				println!(
					"::warning file={}::{} word(s) can be linked",
					make_relative(&file.file, &root),
					file.references.len()
				);
			}
			eprintln!("{}", check_summary(&conversions));
		}
		OutputFormat::Text => {
			eprintln!("Check failed.");
			eprintln!();
			eprintln!("Pending files:");
			for file in &conversions.files {
				eprintln!(
					"  {} ({} link(s))",
					make_relative(&file.file, &root),
					file.references.len()
				);

				if args.verbose {
					for reference in &file.references {
						eprintln!("    {reference} ({})", reference.kind);
					}
				}

				if show_diff {
					print_diff(&file.original, &file.converted);
				}
			}

			eprintln!();
			eprintln!("{}", check_summary(&conversions));
		}
	}

	process::exit(1);
}

fn check_summary(conversions: &ProjectConversion) -> String {
	format!(
		"{} link(s) pending in {} file(s). Run `wikicase update` to apply.",
		conversions.reference_count(),
		conversions.files.len()
	)
}

fn run_update(
	args: &WikicaseCli,
	dry_run: bool,
	watch: bool,
	files: &[PathBuf],
) -> AnyResult<()> {
	let root = resolve_root(args);
	if watch && !load_config(&root)?.live_mode {
		return Err("watch mode needs `live_mode = true` in the config file".into());
	}

	run_update_once(args, dry_run, files, true)?;

	if !watch || dry_run {
		return Ok(());
	}

	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let (tx, rx) = mpsc::channel();
	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_) | notify::EventKind::Create(_)
				) {
					let _ = tx.send(event.paths);
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&root, notify::RecursiveMode::Recursive)?;

	loop {
		let paths = rx.recv()?;
		tracing::debug!(?paths, "file change detected");

		// Last edit wins: keep draining until the project is quiet for the
		// debounce delay.
		let delay = Duration::from_millis(load_config(&root)?.debounce_ms);
		while rx.recv_timeout(delay).is_ok() {}

		// Our own writes trigger another round, which finds nothing to do.
		if let Err(e) = run_update_once(args, false, files, false) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn run_update_once(
	args: &WikicaseCli,
	dry_run: bool,
	files: &[PathBuf],
	report_clean: bool,
) -> AnyResult<()> {
	let root = resolve_root(args);
	let conversions = compute_for(args, files)?;

	if conversions.is_clean() {
		if report_clean {
			println!("All files are already linked.");
		}
		return Ok(());
	}

	if dry_run {
		println!(
			"Dry run: would add {} link(s) in {} file(s):",
			conversions.reference_count(),
			conversions.files.len()
		);
		for file in &conversions.files {
			println!("  {}", make_relative(&file.file, &root));
		}
		return Ok(());
	}

	write_conversions(&conversions)?;
	println!(
		"Added {} link(s) in {} file(s).",
		conversions.reference_count(),
		conversions.files.len()
	);

	if args.verbose {
		for file in &conversions.files {
			println!("  {}", make_relative(&file.file, &root));
		}
	}

	Ok(())
}

fn run_line(args: &WikicaseCli, cursor: usize, text: &str) -> AnyResult<()> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	warn_on_invalid_custom_pattern(&config);

	let converted = Engine::new(config).convert_line(text, cursor);
	println!("{}", converted.text);
	println!("cursor: {}", converted.column);

	Ok(())
}

fn run_config(args: &WikicaseCli, command: &ConfigCommand) -> AnyResult<()> {
	let root = resolve_root(args);
	let store = FileConfigStore::new(&root);

	match command {
		ConfigCommand::Show => {
			let config = store.load()?;
			for key in SettingKey::ALL {
				print_field(key.as_str(), config.setting_value(key));
			}
		}
		ConfigCommand::Set { key, value } => {
			let key: SettingKey = key.parse()?;
			let mut config = store.load()?;

			match config.apply_setting(key, value) {
				SettingUpdate::Applied => {
					store.save(&config)?;
					println!(
						"{} {key} = {}",
						colored!("set", green),
						config.setting_value(key)
					);
					warn_on_invalid_custom_pattern(&config);
				}
				SettingUpdate::Rejected { reason } => {
					eprintln!(
						"{} {key} was not changed: {reason}",
						colored!("warning:", yellow)
					);
				}
			}
		}
		ConfigCommand::Path => {
			let path = store.path();
			if store.exists() {
				println!("{}", path.display());
			} else {
				println!("{} (not created yet)", path.display());
			}
		}
	}

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
