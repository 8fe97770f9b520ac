//! Formatted-text rendering engine for chat message display.
//!
//! Converts semi-trusted chat content — a mixture of Markdown syntax and a
//! constrained HTML dialect — into markup restricted to an allow-listed set
//! of tags and attributes. Two coordinated engines share the same input:
//!
//! - [`RichTextFormatter`]: Markdown conversion followed by markup
//!   sanitation, degrading every construct the context's [`TagSet`] cannot
//!   express down to plain text.
//! - [`PlainTextFormatter`]: the non-configurable sibling that strips
//!   everything to unstyled text, for surfaces that render no markup.
//!
//! Malformed input is never an error: unterminated constructs are left
//! as-is, and output only ever carries tags from the supported set with
//! their re-derived attribute subsets.
//!
//! # Example
//!
//! ```
//! use chatkit_richtext::RichTextFormatter;
//!
//! let formatter = RichTextFormatter::new(["b", "size"]);
//! assert_eq!(
//!     formatter.format("# Release notes"),
//!     "<size=+5><b>Release notes</b></size>",
//! );
//! ```

mod color;
mod escape;
mod formatter;
mod markdown;
mod plain;
mod sanitize;
mod tags;
mod util;

pub use color::normalize_color;
pub use escape::escape_html;
pub use formatter::{DEFAULT_CODE_FONT, FormatError, PlainTextFormatter, RichTextFormatter};
pub use tags::{TagSet, normalize_tag};
