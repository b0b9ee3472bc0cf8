use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::WikicaseError;
use crate::WikicaseResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"wikicase.toml",
	".wikicase.toml",
	".config/wikicase.toml",
];

/// Default delay after the last edit before a live conversion runs.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Default minimum number of characters a match needs to be linked.
pub const DEFAULT_MIN_LENGTH: usize = 4;

/// Words that look like identifiers but are almost never meant as links.
pub const DEFAULT_IGNORE_LIST: [&str; 5] = ["HTTP", "JSON", "NASA", "iOS", "macOS"];

/// Configuration loaded from a `wikicase.toml` file.
///
/// Every field is optional in the file. Missing fields take their default
/// value, so an empty file is a valid configuration.
///
/// ```toml
/// live_mode = true
/// debounce_ms = 500
/// min_length = 4
/// smart_aliasing = true
/// ignore_list = ["HTTP", "JSON", "NASA", "iOS", "macOS"]
/// disable_gitignore = false
///
/// [patterns]
/// pascal = true
/// camel = true
/// snake = true
/// custom = '\b[A-Z]{2,}-\d+\b'
///
/// [exclude]
/// patterns = ["archive/"]
///
/// [include]
/// patterns = ["notes/**/*.txt"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikicaseConfig {
	/// Convert the line under the cursor while typing (and allow `--watch`).
	pub live_mode: bool,
	/// Idle time in milliseconds before a live conversion runs.
	pub debounce_ms: u64,
	/// Matches shorter than this many characters are left alone.
	pub min_length: usize,
	/// Emit `[[Clean Name|RawName]]` instead of `[[RawName]]` when the two
	/// differ.
	pub smart_aliasing: bool,
	/// Exact, case-sensitive words that are never linked.
	pub ignore_list: Vec<String>,
	/// When true, `.gitignore` files are not used to filter scanned files.
	pub disable_gitignore: bool,
	/// Which detection patterns are active.
	pub patterns: PatternsConfig,
	/// Gitignore-style patterns for files that should never be converted.
	pub exclude: ExcludeConfig,
	/// Extra glob patterns for non-markdown files that should be converted.
	pub include: IncludeConfig,
}

impl Default for WikicaseConfig {
	fn default() -> Self {
		Self {
			live_mode: true,
			debounce_ms: DEFAULT_DEBOUNCE_MS,
			min_length: DEFAULT_MIN_LENGTH,
			smart_aliasing: true,
			ignore_list: DEFAULT_IGNORE_LIST.iter().map(ToString::to_string).collect(),
			disable_gitignore: false,
			patterns: PatternsConfig::default(),
			exclude: ExcludeConfig::default(),
			include: IncludeConfig::default(),
		}
	}
}

/// Toggles for the built-in detection patterns plus an optional custom one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
	/// `CyberSecurity`
	pub pascal: bool,
	/// `cyberSecurity`
	pub camel: bool,
	/// `cyber_security`
	pub snake: bool,
	/// Regular expression source for an additional pattern. Empty disables
	/// it.
	pub custom: String,
}

impl Default for PatternsConfig {
	fn default() -> Self {
		Self {
			pascal: true,
			camel: true,
			snake: true,
			custom: String::new(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeConfig {
	pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludeConfig {
	pub patterns: Vec<String>,
}

impl WikicaseConfig {
	/// Resolve the config file path for a project root using
	/// [`CONFIG_FILE_CANDIDATES`].
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load `wikicase.toml` from the given root directory. Returns `None` if
	/// no config file exists.
	pub fn load(root: &Path) -> WikicaseResult<Option<WikicaseConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_from_path(&config_path).map(Some)
	}

	/// Parse a specific config file. Fields missing from the file are filled
	/// in from [`WikicaseConfig::default`].
	pub fn load_from_path(config_path: &Path) -> WikicaseResult<WikicaseConfig> {
		let content = std::fs::read_to_string(config_path)?;
		Self::from_toml(&content)
	}

	pub fn from_toml(content: &str) -> WikicaseResult<WikicaseConfig> {
		toml::from_str(content).map_err(|e| WikicaseError::ConfigParse(e.to_string()))
	}

	pub fn to_toml(&self) -> WikicaseResult<String> {
		toml::to_string_pretty(self).map_err(|e| WikicaseError::ConfigSerialize(e.to_string()))
	}

	/// Whether `word` is on the ignore list. The comparison is exact and
	/// case-sensitive.
	pub fn is_ignored(&self, word: &str) -> bool {
		self.ignore_list.iter().any(|entry| entry == word)
	}

	/// Apply a raw string value coming from a settings form or the command
	/// line.
	///
	/// Unparsable input leaves the configuration untouched and is reported as
	/// [`SettingUpdate::Rejected`] instead of an error, so a half-typed value
	/// never interrupts the user.
	pub fn apply_setting(&mut self, key: SettingKey, raw: &str) -> SettingUpdate {
		let value = raw.trim();
		match key {
			SettingKey::LiveMode => apply_bool(&mut self.live_mode, value),
			SettingKey::SmartAliasing => apply_bool(&mut self.smart_aliasing, value),
			SettingKey::Pascal => apply_bool(&mut self.patterns.pascal, value),
			SettingKey::Camel => apply_bool(&mut self.patterns.camel, value),
			SettingKey::Snake => apply_bool(&mut self.patterns.snake, value),
			SettingKey::DebounceMs => apply_number(&mut self.debounce_ms, value),
			SettingKey::MinLength => apply_number(&mut self.min_length, value),
			SettingKey::IgnoreList => {
				self.ignore_list = parse_ignore_list(raw);
				SettingUpdate::Applied
			}
			SettingKey::CustomPattern => {
				self.patterns.custom = raw.to_string();
				SettingUpdate::Applied
			}
		}
	}

	/// Current value of a setting rendered the way [`apply_setting`] accepts
	/// it.
	///
	/// [`apply_setting`]: WikicaseConfig::apply_setting
	pub fn setting_value(&self, key: SettingKey) -> String {
		match key {
			SettingKey::LiveMode => self.live_mode.to_string(),
			SettingKey::DebounceMs => self.debounce_ms.to_string(),
			SettingKey::MinLength => self.min_length.to_string(),
			SettingKey::SmartAliasing => self.smart_aliasing.to_string(),
			SettingKey::IgnoreList => self.ignore_list.join(", "),
			SettingKey::Pascal => self.patterns.pascal.to_string(),
			SettingKey::Camel => self.patterns.camel.to_string(),
			SettingKey::Snake => self.patterns.snake.to_string(),
			SettingKey::CustomPattern => self.patterns.custom.clone(),
		}
	}
}

/// Split a comma-separated ignore list, trimming entries and dropping empty
/// ones.
pub fn parse_ignore_list(raw: &str) -> Vec<String> {
	raw.split(',')
		.map(str::trim)
		.filter(|entry| !entry.is_empty())
		.map(ToString::to_string)
		.collect()
}

fn apply_bool(target: &mut bool, value: &str) -> SettingUpdate {
	match value.to_ascii_lowercase().as_str() {
		"true" | "on" | "yes" | "1" => {
			*target = true;
			SettingUpdate::Applied
		}
		"false" | "off" | "no" | "0" => {
			*target = false;
			SettingUpdate::Applied
		}
		_ => SettingUpdate::Rejected {
			reason: format!("`{value}` is not a boolean"),
		},
	}
}

fn apply_number<T: FromStr>(target: &mut T, value: &str) -> SettingUpdate {
	match value.parse::<T>() {
		Ok(parsed) => {
			*target = parsed;
			SettingUpdate::Applied
		}
		Err(_) => SettingUpdate::Rejected {
			reason: format!("`{value}` is not a non-negative whole number"),
		},
	}
}

/// Outcome of [`WikicaseConfig::apply_setting`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingUpdate {
	/// The value was parsed and stored.
	Applied,
	/// The value could not be parsed. The previous value is kept.
	Rejected { reason: String },
}

impl SettingUpdate {
	pub fn is_applied(&self) -> bool {
		matches!(self, Self::Applied)
	}
}

/// A user-editable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
	LiveMode,
	DebounceMs,
	MinLength,
	SmartAliasing,
	IgnoreList,
	Pascal,
	Camel,
	Snake,
	CustomPattern,
}

impl SettingKey {
	pub const ALL: [SettingKey; 9] = [
		Self::LiveMode,
		Self::DebounceMs,
		Self::MinLength,
		Self::SmartAliasing,
		Self::IgnoreList,
		Self::Pascal,
		Self::Camel,
		Self::Snake,
		Self::CustomPattern,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::LiveMode => "live_mode",
			Self::DebounceMs => "debounce_ms",
			Self::MinLength => "min_length",
			Self::SmartAliasing => "smart_aliasing",
			Self::IgnoreList => "ignore_list",
			Self::Pascal => "pascal",
			Self::Camel => "camel",
			Self::Snake => "snake",
			Self::CustomPattern => "custom_pattern",
		}
	}
}

impl fmt::Display for SettingKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SettingKey {
	type Err = WikicaseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().replace('-', "_").to_ascii_lowercase();
		Self::ALL
			.into_iter()
			.find(|key| key.as_str() == normalized)
			.ok_or_else(|| WikicaseError::UnknownSetting(s.to_string()))
	}
}

/// Persistent storage for [`WikicaseConfig`].
pub trait ConfigStore {
	/// Load the configuration, falling back to defaults for anything that is
	/// not stored.
	fn load(&self) -> WikicaseResult<WikicaseConfig>;
	fn save(&self, config: &WikicaseConfig) -> WikicaseResult<()>;
}

/// A [`ConfigStore`] backed by a `wikicase.toml` file in a project root.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
	root: PathBuf,
}

impl FileConfigStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// The file that is read and written: the first existing candidate, or
	/// `wikicase.toml` in the root when none exists yet.
	pub fn path(&self) -> PathBuf {
		WikicaseConfig::resolve_path(&self.root)
			.unwrap_or_else(|| self.root.join(CONFIG_FILE_CANDIDATES[0]))
	}

	pub fn exists(&self) -> bool {
		WikicaseConfig::resolve_path(&self.root).is_some()
	}
}

impl ConfigStore for FileConfigStore {
	fn load(&self) -> WikicaseResult<WikicaseConfig> {
		Ok(WikicaseConfig::load(&self.root)?.unwrap_or_default())
	}

	fn save(&self, config: &WikicaseConfig) -> WikicaseResult<()> {
		let path = self.path();
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, config.to_toml()?)?;
		Ok(())
	}
}
