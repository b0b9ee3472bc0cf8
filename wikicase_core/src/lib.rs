//! `wikicase_core` turns identifier-like words in plain text and markdown into
//! wiki-style references. `CyberSecurity`, `cyberSecurity` and
//! `Cyber_Security` become `[[Cyber Security|CyberSecurity]]` and friends,
//! while code, frontmatter, existing links and the word being typed are left
//! alone.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Document text (or the line under the cursor)
//!   → Protector (splits off code fences, inline code, frontmatter)
//!   → Rewriter (PascalCase → camelCase → snake_case → custom, one pass each)
//!       filter chain: length → ignore list → cursor → already inside [[ ]]
//!   → Reference (plain `[[Word]]` or aliased `[[Clean Name|Word]]`)
//!   → Segments joined back in order
//! ```
//!
//! ## Modules
//!
//! - [`protect`]: Splits text into rewritable and protected segments.
//! - [`patterns`]: Assembles the ordered detection patterns from config.
//! - [`rewrite`]: The rewriter, its filter chain, and alias generation.
//! - [`session`]: Live conversion with debounce and a re-entrancy guard.
//! - [`config`]: `wikicase.toml` loading, saving, and settings updates.
//! - [`project`]: Markdown file discovery and whole-project conversion.
//!
//! ## Quick Start
//!
//! ```rust
//! use wikicase_core::Engine;
//! use wikicase_core::WikicaseConfig;
//!
//! let engine = Engine::new(WikicaseConfig::default());
//!
//! // Whole document: everything eligible is linked.
//! let converted = engine.convert_document("Read about CyberSecurity in `CodeSpan`.");
//! assert_eq!(
//! 	converted.text,
//! 	"Read about [[Cyber Security|CyberSecurity]] in `CodeSpan`."
//! );
//!
//! // Live typing: the word at the cursor is left alone.
//! let line = engine.convert_line("CamelCaseWord", 5);
//! assert_eq!(line.text, "CamelCaseWord");
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use patterns::*;
pub use rewrite::*;
pub use session::*;

pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod patterns;
pub mod project;
pub mod protect;
pub mod rewrite;
pub mod session;
