//! YAML frontmatter detection and parsing.
//!
//! Only the parts of frontmatter that feed the index are interpreted; other
//! fields are kept as raw YAML values.

pub mod parser;
pub mod types;

pub use parser::{FrontmatterParseError, parse, split};
pub use types::{Frontmatter, FrontmatterBlock, ParsedDocument};
