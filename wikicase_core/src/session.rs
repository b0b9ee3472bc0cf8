//! Live conversion while typing.
//!
//! A [`LiveSession`] sits between an editor and the [`Engine`]. The editor
//! reports edits with [`LiveSession::on_edit`] and calls
//! [`LiveSession::poll`] from its event loop. Once edits have paused for the
//! configured debounce delay, the line under the cursor is converted and
//! written back through [`DocumentAccess`].

use std::cell::Cell;
use std::ops::Range;
use std::time::Duration;
use std::time::Instant;

use crate::WikicaseError;
use crate::WikicaseResult;
use crate::config::WikicaseConfig;
use crate::engine::Engine;
use crate::rewrite::Reference;

/// A cursor position. `column` counts characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
	pub line: usize,
	pub column: usize,
}

impl Cursor {
	pub fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}
}

/// The editor buffer a session reads from and writes to.
pub trait DocumentAccess {
	fn full_text(&self) -> String;
	fn line_count(&self) -> usize;
	/// The text of line `index` without its line terminator.
	fn line(&self, index: usize) -> Option<String>;
	fn set_full_text(&mut self, text: &str);
	fn set_line(&mut self, index: usize, text: &str);
	fn cursor(&self) -> Cursor;
	fn set_cursor(&mut self, cursor: Cursor);
}

/// An in-memory [`DocumentAccess`] implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
	text: String,
	cursor: Cursor,
}

impl TextBuffer {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			cursor: Cursor::default(),
		}
	}

	pub fn with_cursor(mut self, cursor: Cursor) -> Self {
		self.cursor = cursor;
		self
	}

	pub fn as_str(&self) -> &str {
		&self.text
	}

	fn line_range(&self, index: usize) -> Option<Range<usize>> {
		let mut start = 0;
		for (current, line) in self.text.split('\n').enumerate() {
			if current == index {
				return Some(start..start + line.len());
			}
			start += line.len() + 1;
		}
		None
	}
}

impl DocumentAccess for TextBuffer {
	fn full_text(&self) -> String {
		self.text.clone()
	}

	fn line_count(&self) -> usize {
		self.text.split('\n').count()
	}

	fn line(&self, index: usize) -> Option<String> {
		self.line_range(index)
			.map(|range| self.text[range].to_string())
	}

	fn set_full_text(&mut self, text: &str) {
		self.text = text.to_string();
	}

	fn set_line(&mut self, index: usize, text: &str) {
		if let Some(range) = self.line_range(index) {
			self.text.replace_range(range, text);
		}
	}

	fn cursor(&self) -> Cursor {
		self.cursor
	}

	fn set_cursor(&mut self, cursor: Cursor) {
		self.cursor = cursor;
	}
}

/// Last-edit-wins delay. Every [`Debouncer::schedule`] call pushes the
/// deadline back; [`Debouncer::fire`] reports the deadline once.
#[derive(Debug)]
pub struct Debouncer {
	delay: Duration,
	deadline: Cell<Option<Instant>>,
}

impl Debouncer {
	pub fn new(delay: Duration) -> Self {
		Self {
			delay,
			deadline: Cell::new(None),
		}
	}

	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Start the timer, replacing any pending deadline.
	pub fn schedule(&self, now: Instant) -> Instant {
		let deadline = now + self.delay;
		self.deadline.set(Some(deadline));
		deadline
	}

	pub fn cancel(&self) {
		self.deadline.set(None);
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline.get()
	}

	pub fn is_pending(&self) -> bool {
		self.deadline.get().is_some()
	}

	/// Returns true exactly once after the deadline has passed.
	pub fn fire(&self, now: Instant) -> bool {
		match self.deadline.get() {
			Some(deadline) if now >= deadline => {
				self.deadline.set(None);
				true
			}
			_ => false,
		}
	}
}

/// How a session reacted to an edit notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditDisposition {
	/// A live conversion is scheduled for `deadline`.
	Scheduled { deadline: Instant },
	/// The edit came from the session's own write-back and was ignored.
	Ignored,
	/// Live mode is turned off.
	Disabled,
}

/// Result of a conversion triggered through a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveOutcome {
	/// Another conversion was already writing to the document.
	Busy,
	/// Nothing to convert.
	Unchanged,
	/// The document was rewritten.
	Converted { references: Vec<Reference> },
}

impl LiveOutcome {
	pub fn is_converted(&self) -> bool {
		matches!(self, Self::Converted { .. })
	}
}

/// Live conversion controller owned by one editor integration.
///
/// The re-entrancy flag is per session: writing the converted line back to
/// the document usually produces another edit notification, which must not
/// start a nested conversion.
#[derive(Debug)]
pub struct LiveSession {
	engine: Engine,
	debouncer: Debouncer,
	converting: Cell<bool>,
}

impl LiveSession {
	pub fn new(config: WikicaseConfig) -> Self {
		let debouncer = Debouncer::new(Duration::from_millis(config.debounce_ms));
		Self {
			engine: Engine::new(config),
			debouncer,
			converting: Cell::new(false),
		}
	}

	pub fn engine(&self) -> &Engine {
		&self.engine
	}

	pub fn debouncer(&self) -> &Debouncer {
		&self.debouncer
	}

	/// Replace the configuration. A pending conversion stays scheduled but
	/// runs with the new settings.
	pub fn set_config(&mut self, config: WikicaseConfig) {
		let pending = self.debouncer.deadline();
		self.debouncer = Debouncer::new(Duration::from_millis(config.debounce_ms));
		self.debouncer.deadline.set(pending);
		self.engine.set_config(config);
	}

	pub fn is_converting(&self) -> bool {
		self.converting.get()
	}

	/// Record an edit. Restarts the debounce timer unless live mode is off or
	/// the edit is the session's own write-back.
	pub fn on_edit(&self, now: Instant) -> EditDisposition {
		if !self.engine.config().live_mode {
			return EditDisposition::Disabled;
		}

		if self.is_converting() {
			tracing::trace!("ignoring edit caused by write-back");
			return EditDisposition::Ignored;
		}

		EditDisposition::Scheduled {
			deadline: self.debouncer.schedule(now),
		}
	}

	/// Run the pending live conversion if the debounce deadline has passed.
	pub fn poll(
		&self,
		document: &mut dyn DocumentAccess,
		now: Instant,
	) -> WikicaseResult<Option<LiveOutcome>> {
		if !self.debouncer.fire(now) {
			return Ok(None);
		}

		self.convert_in_editor(document).map(Some)
	}

	/// Convert the line under the cursor, leaving the word at the cursor
	/// alone, and move the cursor so it stays on the same character.
	pub fn convert_in_editor(&self, document: &mut dyn DocumentAccess) -> WikicaseResult<LiveOutcome> {
		if self.is_converting() {
			return Ok(LiveOutcome::Busy);
		}

		let cursor = document.cursor();
		let Some(line) = document.line(cursor.line) else {
			return Err(WikicaseError::LineOutOfRange {
				line: cursor.line,
				len: document.line_count(),
			});
		};

		let conversion = self.engine.convert_line(&line, cursor.column);
		if !conversion.is_changed() {
			return Ok(LiveOutcome::Unchanged);
		}

		tracing::debug!(
			line = cursor.line,
			references = conversion.references.len(),
			"converted line under cursor"
		);

		let _guard = ConversionGuard::new(&self.converting);
		document.set_line(cursor.line, &conversion.text);
		document.set_cursor(Cursor::new(cursor.line, conversion.column));

		Ok(LiveOutcome::Converted {
			references: conversion.references,
		})
	}

	/// Convert the whole document. Cursor suppression does not apply.
	pub fn convert_current_file(&self, document: &mut dyn DocumentAccess) -> LiveOutcome {
		if self.is_converting() {
			return LiveOutcome::Busy;
		}

		let _guard = ConversionGuard::new(&self.converting);
		let text = document.full_text();
		let conversion = self.engine.convert_document(&text);
		if !conversion.is_changed() {
			return LiveOutcome::Unchanged;
		}

		document.set_full_text(&conversion.text);
		LiveOutcome::Converted {
			references: conversion.references,
		}
	}
}

/// Holds the re-entrancy flag for the duration of a write-back.
struct ConversionGuard<'a> {
	flag: &'a Cell<bool>,
}

impl<'a> ConversionGuard<'a> {
	fn new(flag: &'a Cell<bool>) -> Self {
		flag.set(true);
		Self { flag }
	}
}

impl Drop for ConversionGuard<'_> {
	fn drop(&mut self) {
		self.flag.set(false);
	}
}
