use crate::config::WikicaseConfig;
use crate::patterns::PatternSet;
use crate::protect;
use crate::rewrite::Reference;
use crate::rewrite::Rewriter;

/// Result of converting a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
	/// The converted text. Equal to the input when nothing was linked.
	pub text: String,
	/// Byte offset of the cursor in `text`, when a cursor was supplied.
	pub cursor: Option<usize>,
	/// Every reference that was emitted, in document order per pattern pass.
	pub references: Vec<Reference>,
}

impl Conversion {
	/// Whether the conversion changed anything.
	pub fn is_changed(&self) -> bool {
		!self.references.is_empty()
	}
}

/// Result of converting the line under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineConversion {
	pub text: String,
	/// Character column the cursor should be moved to so it stays on the
	/// same character.
	pub column: usize,
	pub references: Vec<Reference>,
}

impl LineConversion {
	pub fn is_changed(&self) -> bool {
		!self.references.is_empty()
	}
}

/// Batch and live entry points over a fixed configuration.
///
/// The detection patterns are assembled once when the engine is built. Build
/// a new engine (or call [`Engine::set_config`]) after the configuration
/// changes.
#[derive(Debug, Clone)]
pub struct Engine {
	config: WikicaseConfig,
	patterns: PatternSet,
}

impl Default for Engine {
	fn default() -> Self {
		Self::new(WikicaseConfig::default())
	}
}

impl Engine {
	pub fn new(config: WikicaseConfig) -> Self {
		let patterns = PatternSet::from_config(&config.patterns);
		Self { config, patterns }
	}

	pub fn config(&self) -> &WikicaseConfig {
		&self.config
	}

	pub fn patterns(&self) -> &PatternSet {
		&self.patterns
	}

	pub fn set_config(&mut self, config: WikicaseConfig) {
		self.patterns = PatternSet::from_config(&config.patterns);
		self.config = config;
	}

	pub fn rewriter(&self) -> Rewriter<'_> {
		Rewriter::new(&self.config, &self.patterns)
	}

	/// Convert an entire document. No cursor is involved, so every eligible
	/// word outside protected regions is linked.
	pub fn convert_document(&self, text: &str) -> Conversion {
		self.convert(text, None)
	}

	/// Convert a single line while the user is typing on it.
	///
	/// `column` is the cursor position counted in characters. Words touching
	/// the cursor are left alone so the word being typed is never wrapped.
	pub fn convert_line(&self, line: &str, column: usize) -> LineConversion {
		let offset = byte_offset(line, column);
		let conversion = self.convert(line, Some(offset));
		let column = match conversion.cursor {
			Some(cursor) => conversion.text[..cursor].chars().count(),
			// Cursor past the end of the line: keep its distance from the end.
			None => {
				(column + conversion.text.chars().count()).saturating_sub(line.chars().count())
			}
		};

		LineConversion {
			text: conversion.text,
			column,
			references: conversion.references,
		}
	}

	/// Split `text` into segments, rewrite the rewritable ones, and join them
	/// back together.
	///
	/// `cursor` is a byte offset into `text`. Every rewritable segment that
	/// contains it sees it as a segment-local offset.
	pub fn convert(&self, text: &str, cursor: Option<usize>) -> Conversion {
		let rewriter = self.rewriter();
		let mut output = String::with_capacity(text.len());
		let mut mapped: Option<usize> = None;
		let mut references = Vec::new();

		for segment in protect::split(text) {
			let local = cursor
				.filter(|&c| segment.contains_offset(c))
				.map(|c| c - segment.range.start);

			if !segment.is_rewritable() || segment.text.is_empty() {
				if let Some(local) = local {
					mapped.get_or_insert(output.len() + local);
				}
				output.push_str(segment.text);
				continue;
			}

			let rewritten = rewriter.rewrite_segment(segment.text, local);
			if let Some(local) = rewritten.cursor {
				mapped.get_or_insert(output.len() + local);
			}
			output.push_str(&rewritten.text);
			references.extend(rewritten.references);
		}

		Conversion {
			text: output,
			cursor: mapped,
			references,
		}
	}
}

/// Byte offset of the `column`th character. Columns past the end of `line`
/// stay past the end by the same number of positions.
fn byte_offset(line: &str, column: usize) -> usize {
	match line.char_indices().nth(column) {
		Some((offset, _)) => offset,
		None => line.len() + column.saturating_sub(line.chars().count()),
	}
}
