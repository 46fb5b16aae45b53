//! docx-fill - placeholder substitution for word-processing document parts
//!
//! Pipeline per part:
//! A: Tokenizer + tree builder (parse the part into an element tree)
//! B: Run cursor (flatten each paragraph group into addressable characters)
//! C: Replacer (find `{{path}}` across run boundaries and splice values in)
//! D: Rebuilder + writer (regroup into runs and paragraphs, serialize)
//! E: Parallel parts (fill body, headers and footers at once)
//!
//! ```
//! let part = b"<w:body><w:p><w:r><w:t>Hello {{</w:t></w:r><w:r><w:t>name}}</w:t></w:r></w:p></w:body>";
//! let resolver = |path: &str| (path == "name").then(|| "Ada".to_string());
//! let filled = docx_fill::load_and_replace(part, &resolver).unwrap();
//! assert_eq!(
//!     filled,
//!     b"<w:body><w:p><w:r><w:t>Hello Ada</w:t></w:r></w:p></w:body>"
//! );
//! ```

pub mod core;
pub mod dom;
pub mod error;
pub mod options;
pub mod replace;
pub mod resolve;
pub mod runs;
pub mod settings;
pub mod strategy;

pub use dom::{Document, Element};
pub use error::{Error, Result};
pub use options::{Delimiters, Options, SiblingPolicy, Vocabulary};
pub use replace::{load_and_replace, Processor, Replaced, Report};
pub use resolve::{ModelResolver, Resolve};
pub use strategy::{replace_parts, Part, PartResult};
