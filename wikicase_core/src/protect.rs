//! Splitting text into regions the rewriter may touch and regions it must
//! leave alone.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Fenced code blocks, inline code spans, and a frontmatter block at the very
/// start of the text, tried in that order at each position.
static PROTECTED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?s:```.*?```)|`[^`\n]+`|\A---\n(?s:.*?)\n---").expect("protected region regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
	/// Plain text that detection patterns run over.
	Rewritable,
	/// Code fence, inline code, or frontmatter. Kept verbatim.
	Protected,
}

/// A contiguous run of the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
	pub kind: SegmentKind,
	pub text: &'a str,
	/// Byte range of `text` within the original input.
	pub range: Range<usize>,
}

impl Segment<'_> {
	pub fn is_rewritable(&self) -> bool {
		self.kind == SegmentKind::Rewritable
	}

	/// Whether `offset` lies inside this segment, counting both ends.
	pub fn contains_offset(&self, offset: usize) -> bool {
		self.range.start <= offset && offset <= self.range.end
	}
}

/// Split `text` into alternating rewritable and protected segments.
///
/// The split is a strict partition: concatenating every segment's text in
/// order reproduces `text` exactly. Empty rewritable runs between two adjacent
/// protected regions are kept so that segments always alternate, starting and
/// ending with a rewritable segment.
pub fn split(text: &str) -> Vec<Segment<'_>> {
	let mut segments = Vec::new();
	let mut last = 0;

	for found in PROTECTED_REGEX.find_iter(text) {
		segments.push(Segment {
			kind: SegmentKind::Rewritable,
			text: &text[last..found.start()],
			range: last..found.start(),
		});
		segments.push(Segment {
			kind: SegmentKind::Protected,
			text: found.as_str(),
			range: found.range(),
		});
		last = found.end();
	}

	segments.push(Segment {
		kind: SegmentKind::Rewritable,
		text: &text[last..],
		range: last..text.len(),
	});

	segments
}

