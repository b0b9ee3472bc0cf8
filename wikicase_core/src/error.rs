use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum WikicaseError {
	#[error(transparent)]
	#[diagnostic(code(wikicase::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(wikicase::config_parse),
		help("check that wikicase.toml is valid TOML, e.g. `min_length = 4` and a [patterns] table")
	)]
	ConfigParse(String),

	#[error("failed to serialize config: {0}")]
	#[diagnostic(code(wikicase::config_serialize))]
	ConfigSerialize(String),

	#[error("invalid exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(wikicase::exclude_pattern),
		help("exclude patterns follow .gitignore syntax")
	)]
	ExcludePattern { pattern: String, reason: String },

	#[error("invalid include pattern `{pattern}`: {reason}")]
	#[diagnostic(code(wikicase::include_pattern), help("include patterns are glob patterns"))]
	IncludePattern { pattern: String, reason: String },

	#[error("unknown setting: `{0}`")]
	#[diagnostic(
		code(wikicase::unknown_setting),
		help(
			"available settings: live_mode, debounce_ms, min_length, smart_aliasing, ignore_list, \
			 pascal, camel, snake, custom_pattern"
		)
	)]
	UnknownSetting(String),

	#[error("line {line} is out of range (document has {len} line(s))")]
	#[diagnostic(code(wikicase::line_out_of_range))]
	LineOutOfRange { line: usize, len: usize },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(wikicase::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

pub type WikicaseResult<T> = Result<T, WikicaseError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
