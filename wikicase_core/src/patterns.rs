use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::PatternsConfig;

// Word boundaries are ASCII so identifiers glued to CJK text still match.

/// Two or more capitalised word parts: `CyberSecurity`.
static PASCAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?-u:\b)([A-Z][a-z]+(?:[A-Z][a-z]+)+)(?-u:\b)").expect("pascal case regex")
});

/// A lowercase word followed by capitalised parts: `cyberSecurity`.
static CAMEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?-u:\b)([a-z]+(?:[A-Z][a-z]+)+)(?-u:\b)").expect("camel case regex")
});

/// Alphabetic runs joined by underscores: `cyber_security`.
static SNAKE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?-u:\b)([A-Za-z]+_[A-Za-z_]+)(?-u:\b)").expect("snake case regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
	Pascal,
	Camel,
	Snake,
	Custom,
}

impl PatternKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pascal => "PascalCase",
			Self::Camel => "camelCase",
			Self::Snake => "snake_case",
			Self::Custom => "custom",
		}
	}
}

impl fmt::Display for PatternKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A compiled detection pattern.
#[derive(Debug, Clone)]
pub struct DetectionPattern {
	pub kind: PatternKind,
	pub regex: Regex,
}

/// What happened to the configured custom pattern when a [`PatternSet`] was
/// assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomPatternStatus {
	/// No custom pattern is configured.
	Disabled,
	/// The custom pattern compiled and runs after the built-in ones.
	Active,
	/// The custom pattern failed to compile and was left out. Built-in
	/// patterns are unaffected.
	Invalid { source: String, message: String },
}

/// The ordered list of active detection patterns.
///
/// Order is fixed: PascalCase, camelCase, snake_case, then the custom
/// pattern. Each one scans the output of the previous one.
#[derive(Debug, Clone)]
pub struct PatternSet {
	patterns: Vec<DetectionPattern>,
	custom_status: CustomPatternStatus,
}

impl PatternSet {
	pub fn from_config(config: &PatternsConfig) -> Self {
		let mut patterns = Vec::new();

		if config.pascal {
			patterns.push(DetectionPattern {
				kind: PatternKind::Pascal,
				regex: PASCAL_REGEX.clone(),
			});
		}

		if config.camel {
			patterns.push(DetectionPattern {
				kind: PatternKind::Camel,
				regex: CAMEL_REGEX.clone(),
			});
		}

		if config.snake {
			patterns.push(DetectionPattern {
				kind: PatternKind::Snake,
				regex: SNAKE_REGEX.clone(),
			});
		}

		let custom_status = if config.custom.is_empty() {
			CustomPatternStatus::Disabled
		} else {
			match Regex::new(&config.custom) {
				Ok(regex) => {
					patterns.push(DetectionPattern {
						kind: PatternKind::Custom,
						regex,
					});
					CustomPatternStatus::Active
				}
				Err(e) => {
					tracing::warn!(pattern = %config.custom, error = %e, "skipping invalid custom pattern");
					CustomPatternStatus::Invalid {
						source: config.custom.clone(),
						message: e.to_string(),
					}
				}
			}
		};

		Self {
			patterns,
			custom_status,
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &DetectionPattern> {
		self.patterns.iter()
	}

	pub fn kinds(&self) -> Vec<PatternKind> {
		self.patterns.iter().map(|pattern| pattern.kind).collect()
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	pub fn custom_status(&self) -> &CustomPatternStatus {
		&self.custom_status
	}
}
