//! promptkit - prompt templates with `{{variable}}` placeholders
//!
//! Builds prompt strings (e.g. for language-model input) from a template and a
//! variable mapping. Placeholders inside fenced code blocks are left alone, and
//! every unbound placeholder is reported at once.
//!
//! # Template references
//!
//! ```text
//! [@namespace/]relative/path[.ext]
//! ```
//!
//! `@namespace` is looked up in [`PathAliases`]; the extension defaults to `.md`.
//!
//! # Example
//!
//! ```no_run
//! use promptkit::{Loader, PathAliases, Prompt, Variables};
//!
//! let mut aliases = PathAliases::new();
//! aliases.set("refund", "prompts/refund");
//!
//! let loader = Loader::new(aliases);
//! let text = loader.load("@refund/shopRefund", env!("CARGO_MANIFEST_DIR"))?;
//! let prompt = Prompt::new(text, Variables::new().with("customer", "Alice"))?;
//! println!("{}", prompt.value());
//! # Ok::<(), promptkit::PromptError>(())
//! ```

pub mod cli;
pub mod config;
mod error;
mod loader;
mod prompt;
pub mod scan;
mod variables;

pub use error::{PromptError, Result};
pub use loader::{DEFAULT_EXTENSION, Loader, NAMESPACE_MARKER, PathAliases, TemplateRef};
pub use prompt::Prompt;
pub use variables::{Value, Variables};
