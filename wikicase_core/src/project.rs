use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::WikicaseError;
use crate::WikicaseResult;
use crate::config::WikicaseConfig;
use crate::engine::Conversion;
use crate::engine::Engine;
use crate::rewrite::Reference;

/// Options controlling which files a project conversion touches.
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Glob patterns for extra files to convert besides markdown.
	pub include_set: GlobSet,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			exclude_patterns: Vec::new(),
			include_set: GlobSet::empty(),
			disable_gitignore: false,
		}
	}
}

impl ScanOptions {
	pub fn from_config(config: &WikicaseConfig) -> WikicaseResult<Self> {
		Ok(Self {
			exclude_patterns: config.exclude.patterns.clone(),
			include_set: build_glob_set(&config.include.patterns)?,
			disable_gitignore: config.disable_gitignore,
		})
	}
}

/// The conversion of one file.
#[derive(Debug, Clone)]
pub struct FileConversion {
	pub file: PathBuf,
	/// The content currently on disk.
	pub original: String,
	/// The content after conversion.
	pub converted: String,
	pub references: Vec<Reference>,
}

/// Result of converting a set of files. Only files that change are listed.
#[derive(Debug, Default)]
pub struct ProjectConversion {
	pub files: Vec<FileConversion>,
	/// Number of files that were read.
	pub scanned: usize,
}

impl ProjectConversion {
	/// Returns true if no file would change.
	pub fn is_clean(&self) -> bool {
		self.files.is_empty()
	}

	/// Total number of references created across all files.
	pub fn reference_count(&self) -> usize {
		self.files.iter().map(|file| file.references.len()).sum()
	}
}

/// Load the project config (or defaults) and convert every markdown file
/// under `root`.
pub fn convert_project(root: &Path) -> WikicaseResult<ProjectConversion> {
	let config = WikicaseConfig::load(root)?.unwrap_or_default();
	let options = ScanOptions::from_config(&config)?;
	let files = collect_files(root, &options)?;
	let engine = Engine::new(config);
	compute_conversions(&engine, &files)
}

/// Convert the given files without writing anything.
pub fn compute_conversions(engine: &Engine, files: &[PathBuf]) -> WikicaseResult<ProjectConversion> {
	let mut conversions = Vec::new();

	for file in files {
		let original = std::fs::read_to_string(file)?;
		let Some(conversion) = convert_content(engine, &original) else {
			continue;
		};

		tracing::debug!(
			file = %file.display(),
			references = conversion.references.len(),
			"file has pending conversions"
		);
		conversions.push(FileConversion {
			file: file.clone(),
			original,
			converted: conversion.text,
			references: conversion.references,
		});
	}

	Ok(ProjectConversion {
		files: conversions,
		scanned: files.len(),
	})
}

/// Convert file content, keeping its line endings. Returns `None` when
/// nothing changes.
pub fn convert_content(engine: &Engine, content: &str) -> Option<Conversion> {
	let uses_crlf = content.contains("\r\n");
	let normalized = normalize_line_endings(content);
	let mut conversion = engine.convert_document(&normalized);
	if !conversion.is_changed() {
		return None;
	}

	if uses_crlf {
		conversion.text = conversion.text.replace('\n', "\r\n");
	}

	Some(conversion)
}

/// Write every converted file to disk.
pub fn write_conversions(conversions: &ProjectConversion) -> WikicaseResult<()> {
	for file in &conversions.files {
		std::fs::write(&file.file, &file.converted)?;
	}
	Ok(())
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}

fn build_glob_set(patterns: &[String]) -> WikicaseResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			WikicaseError::IncludePattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
		builder.add(glob);
	}
	builder.build().map_err(|e| {
		WikicaseError::IncludePattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from `[exclude]` patterns. These follow
/// `.gitignore` syntax and are applied on top of any `.gitignore` rules.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> WikicaseResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			WikicaseError::ExcludePattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}
	builder.build().map_err(|e| {
		WikicaseError::ExcludePattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

/// Collect every markdown file, plus files matching `[include]` patterns,
/// under `root`.
///
/// Hidden directories, `node_modules` and `target` are skipped. Unless
/// `disable_gitignore` is set, files matched by the root `.gitignore` are
/// skipped too. `[exclude]` patterns always apply.
pub fn collect_files(root: &Path, options: &ScanOptions) -> WikicaseResult<Vec<PathBuf>> {
	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();

	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let custom_exclude = build_exclude_matcher(root, &options.exclude_patterns)?;

	walk_dir(
		root,
		root,
		&mut files,
		&WalkFilters {
			gitignore: &gitignore,
			custom_exclude: &custom_exclude,
			include_set: &options.include_set,
		},
		&mut visited_dirs,
	)?;
	// Sort for deterministic ordering.
	files.sort();
	Ok(files)
}

struct WalkFilters<'a> {
	gitignore: &'a Gitignore,
	custom_exclude: &'a Gitignore,
	include_set: &'a GlobSet,
}

fn walk_dir(
	root: &Path,
	dir: &Path,
	files: &mut Vec<PathBuf>,
	filters: &WalkFilters<'_>,
	visited_dirs: &mut HashSet<PathBuf>,
) -> WikicaseResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	// Detect symlink cycles by tracking canonical paths.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Err(WikicaseError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();

		if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
			if is_ignored_directory_name(name) {
				continue;
			}
		}

		let is_dir = path.is_dir();

		if filters.gitignore.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if filters.custom_exclude.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if is_dir {
			walk_dir(root, &path, files, filters, visited_dirs)?;
		} else if is_markdown_file(&path) || is_included(root, &path, filters.include_set) {
			files.push(path);
		}
	}

	Ok(())
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn is_included(root: &Path, path: &Path, include_set: &GlobSet) -> bool {
	path.strip_prefix(root)
		.is_ok_and(|relative| include_set.is_match(relative))
}

/// Check if a file is a markdown file.
pub fn is_markdown_file(path: &Path) -> bool {
	let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
		return false;
	};

	matches!(ext, "md" | "mdx" | "markdown")
}
