use std::fmt;

use crate::config::WikicaseConfig;
use crate::patterns::DetectionPattern;
use crate::patterns::PatternKind;
use crate::patterns::PatternSet;

const OPEN_MARKER: &str = "[[";
const CLOSE_MARKER: &str = "]]";

/// A wiki-style reference emitted in place of a matched word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
	/// The link target, e.g. `Cyber Security`.
	pub target: String,
	/// Display text shown instead of the target. Set when smart aliasing
	/// produced a target that differs from the matched word.
	pub alias: Option<String>,
	/// The pattern that found the word.
	pub kind: PatternKind,
}

impl Reference {
	/// Build the reference for a matched word.
	///
	/// With smart aliasing the target is the cleaned display name and the raw
	/// word becomes the alias, unless cleaning changed nothing.
	pub fn for_match(raw: &str, kind: PatternKind, smart_aliasing: bool) -> Self {
		if smart_aliasing {
			let clean = clean_display_name(raw);
			if clean != raw {
				return Self {
					target: clean,
					alias: Some(raw.to_string()),
					kind,
				};
			}
		}

		Self {
			target: raw.to_string(),
			alias: None,
			kind,
		}
	}
}

impl fmt::Display for Reference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.alias {
			Some(alias) => write!(f, "{OPEN_MARKER}{}|{alias}{CLOSE_MARKER}", self.target),
			None => write!(f, "{OPEN_MARKER}{}{CLOSE_MARKER}", self.target),
		}
	}
}

/// Turn an identifier into a readable name: underscores become spaces and a
/// space is inserted wherever a lowercase letter is followed by an uppercase
/// one.
///
/// ```
/// use wikicase_core::clean_display_name;
///
/// assert_eq!(clean_display_name("CyberSecurity"), "Cyber Security");
/// assert_eq!(clean_display_name("cyber_security"), "cyber security");
/// assert_eq!(clean_display_name("HTTP"), "HTTP");
/// ```
pub fn clean_display_name(raw: &str) -> String {
	let mut clean = String::with_capacity(raw.len() + 4);
	let mut previous: Option<char> = None;

	for ch in raw.chars().map(|ch| if ch == '_' { ' ' } else { ch }) {
		if ch.is_ascii_uppercase() && previous.is_some_and(|p| p.is_ascii_lowercase()) {
			clean.push(' ');
		}
		clean.push(ch);
		previous = Some(ch);
	}

	clean
}

/// Why a candidate match was left as it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
	/// Shorter than the configured minimum length.
	TooShort,
	/// Exactly equal to an ignore list entry.
	Ignored,
	/// The cursor sits inside or right next to the word.
	TouchesCursor,
	/// The word is already inside an open `[[` reference.
	InsideReference,
}

/// Result of rewriting one rewritable segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentRewrite {
	pub text: String,
	/// Where the cursor lands in `text`, if one was tracked.
	pub cursor: Option<usize>,
	/// References emitted, in the order they were created.
	pub references: Vec<Reference>,
}

/// Applies a [`PatternSet`] to rewritable text.
///
/// Cursor offsets are byte offsets into the segment passed in.
#[derive(Debug, Clone, Copy)]
pub struct Rewriter<'a> {
	config: &'a WikicaseConfig,
	patterns: &'a PatternSet,
}

impl<'a> Rewriter<'a> {
	pub fn new(config: &'a WikicaseConfig, patterns: &'a PatternSet) -> Self {
		Self { config, patterns }
	}

	/// Rewrite `text`, leaving any word that touches `cursor` alone.
	pub fn rewrite(&self, text: &str, cursor: Option<usize>) -> String {
		self.rewrite_segment(text, cursor).text
	}

	/// Rewrite `text` and report the emitted references and the cursor's new
	/// position.
	///
	/// Patterns run as a fold: every pass scans the previous pass's output.
	/// The cursor check always uses the caller's `cursor` against the current
	/// pass's text. The reported cursor follows the character it was on.
	pub fn rewrite_segment(&self, text: &str, cursor: Option<usize>) -> SegmentRewrite {
		let initial = SegmentRewrite {
			text: text.to_string(),
			cursor,
			references: Vec::new(),
		};

		self.patterns
			.iter()
			.fold(initial, |state, pattern| self.run_pass(pattern, state, cursor))
	}

	fn run_pass(
		&self,
		pattern: &DetectionPattern,
		state: SegmentRewrite,
		cursor: Option<usize>,
	) -> SegmentRewrite {
		let SegmentRewrite {
			text: current,
			cursor: tracked,
			mut references,
		} = state;
		let before = references.len();
		let mut output = String::with_capacity(current.len());
		let mut mapped: Option<usize> = None;
		let mut last = 0;

		for found in pattern.regex.find_iter(&current) {
			if let Some(position) = tracked {
				if mapped.is_none() && position <= found.start() {
					mapped = Some(output.len() + position - last);
				}
			}
			output.push_str(&current[last..found.start()]);

			let replaced = match self.check_candidate(&current, found.start(), found.as_str(), cursor)
			{
				Ok(()) => {
					let reference =
						Reference::for_match(found.as_str(), pattern.kind, self.config.smart_aliasing);
					output.push_str(&reference.to_string());
					references.push(reference);
					true
				}
				Err(reason) => {
					tracing::trace!(
						word = found.as_str(),
						offset = found.start(),
						pattern = %pattern.kind,
						?reason,
						"skipped candidate"
					);
					output.push_str(found.as_str());
					false
				}
			};

			if let Some(position) = tracked {
				if mapped.is_none() && position < found.end() {
					mapped = Some(if replaced {
						output.len()
					} else {
						output.len() - (found.end() - position)
					});
				}
			}
			last = found.end();
		}

		if let Some(position) = tracked {
			if mapped.is_none() {
				mapped = Some(output.len() + position - last);
			}
		}
		output.push_str(&current[last..]);

		let created = references.len() - before;
		if created > 0 {
			tracing::debug!(pattern = %pattern.kind, created, "pattern pass rewrote matches");
		}

		SegmentRewrite {
			text: output,
			cursor: mapped,
			references,
		}
	}

	/// Run the filter chain for one candidate. The first failing check wins.
	///
	/// `current` is the full text being scanned in this pass and `start` the
	/// byte offset of `matched` within it.
	pub fn check_candidate(
		&self,
		current: &str,
		start: usize,
		matched: &str,
		cursor: Option<usize>,
	) -> Result<(), SkipReason> {
		if matched.chars().count() < self.config.min_length {
			return Err(SkipReason::TooShort);
		}

		if self.config.is_ignored(matched) {
			return Err(SkipReason::Ignored);
		}

		if let Some(cursor) = cursor {
			if start <= cursor && cursor <= start + matched.len() {
				return Err(SkipReason::TouchesCursor);
			}
		}

		if is_inside_reference(&current[..start]) {
			return Err(SkipReason::InsideReference);
		}

		Ok(())
	}
}

/// Whether text ending at some point leaves a `[[` reference open. A `]]`
/// with nothing open is ignored.
fn is_inside_reference(preceding: &str) -> bool {
	let bytes = preceding.as_bytes();
	let mut depth = 0usize;
	let mut index = 0;

	while index < bytes.len() {
		if bytes[index..].starts_with(OPEN_MARKER.as_bytes()) {
			depth += 1;
			index += OPEN_MARKER.len();
		} else if bytes[index..].starts_with(CLOSE_MARKER.as_bytes()) {
			depth = depth.saturating_sub(1);
			index += CLOSE_MARKER.len();
		} else {
			index += 1;
		}
	}

	depth > 0
}
