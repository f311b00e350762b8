//! Template Loader
//!
//! Resolves a template reference of the form `[@namespace/]relative/path[.ext]`
//! to a file and reads it.
//!
//! Resolution:
//! 1. `@namespace/rest`: the namespace is looked up in [`PathAliases`] and `rest`
//!    is joined onto the alias directory. Alias directories are workspace
//!    relative and ignore the caller's base path.
//! 2. Anything else is joined onto the caller's base path.
//! 3. A path without an extension gets the default extension (`.md`).

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PromptError, Result};

/// Leading marker of a namespaced reference
pub const NAMESPACE_MARKER: char = '@';

/// Extension appended to references that have none
pub const DEFAULT_EXTENSION: &str = "md";

/// A parsed template reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef<'a> {
    /// Namespace token without the marker, if the reference had one
    pub namespace: Option<&'a str>,
    /// Path after the namespace, or the whole reference
    pub path: &'a str,
}

impl<'a> TemplateRef<'a> {
    pub fn parse(reference: &'a str) -> Self {
        match reference.strip_prefix(NAMESPACE_MARKER) {
            Some(rest) => match rest.find(['/', '\\']) {
                Some(idx) => Self {
                    namespace: Some(&rest[..idx]),
                    path: &rest[idx + 1..],
                },
                None => Self {
                    namespace: Some(rest),
                    path: "",
                },
            },
            None => Self {
                namespace: None,
                path: reference,
            },
        }
    }
}

/// Namespace token to directory prefix mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathAliases {
    aliases: BTreeMap<String, PathBuf>,
}

impl PathAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `namespace` (with or without the `@`) to `dir`, returning the old target
    pub fn set(&mut self, namespace: impl Into<String>, dir: impl Into<PathBuf>) -> Option<PathBuf> {
        let namespace = namespace.into();
        self.aliases.insert(alias_key(&namespace).to_string(), dir.into())
    }

    pub fn remove(&mut self, namespace: &str) -> Option<PathBuf> {
        self.aliases.remove(alias_key(namespace))
    }

    pub fn clear(&mut self) {
        self.aliases.clear();
    }

    pub fn get(&self, namespace: &str) -> Option<&Path> {
        self.aliases.get(alias_key(namespace)).map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PathBuf> {
        self.aliases.iter()
    }
}

/// Namespaces are stored without the leading marker
fn alias_key(namespace: &str) -> &str {
    namespace.strip_prefix(NAMESPACE_MARKER).unwrap_or(namespace)
}

impl<K, V> FromIterator<(K, V)> for PathAliases
where
    K: Into<String>,
    V: Into<PathBuf>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut aliases = Self::new();
        for (k, v) in iter {
            aliases.set(k, v);
        }
        aliases
    }
}

/// Loads raw template text from the filesystem
#[derive(Debug, Clone)]
pub struct Loader {
    aliases: PathAliases,
    extension: String,
    /// Directory alias targets are anchored at; `None` means the process
    /// working directory
    root: Option<PathBuf>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(PathAliases::default())
    }
}

impl Loader {
    pub fn new(aliases: PathAliases) -> Self {
        Self {
            aliases,
            extension: DEFAULT_EXTENSION.to_string(),
            root: None,
        }
    }

    /// Use `extension` (without the dot) for references that have none
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Anchor alias targets at `root` instead of the working directory
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn aliases(&self) -> &PathAliases {
        &self.aliases
    }

    /// Aliases are consulted at resolution time, so changes apply to the next
    /// call
    pub fn aliases_mut(&mut self) -> &mut PathAliases {
        &mut self.aliases
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Compute the file path `reference` points at without reading it
    pub fn resolve_path(&self, reference: &str, base: impl AsRef<Path>) -> Result<PathBuf> {
        let parsed = TemplateRef::parse(reference);

        let mut path = match parsed.namespace {
            Some(namespace) => {
                let dir = self.aliases.get(namespace).ok_or_else(|| PromptError::NamespaceUndefined {
                    namespace: format!("{}{}", NAMESPACE_MARKER, namespace),
                })?;
                debug!(%namespace, dir = %dir.display(), "resolve_path: alias matched");
                match &self.root {
                    Some(root) => root.join(dir).join(parsed.path),
                    None => dir.join(parsed.path),
                }
            }
            None => base.as_ref().join(parsed.path),
        };

        if path.extension().is_none() {
            debug!(path = %path.display(), extension = %self.extension, "resolve_path: adding default extension");
            path.set_extension(&self.extension);
        }

        Ok(path)
    }

    /// Resolve `reference` against `base` and read the template text.
    ///
    /// The text is returned as-is; no interpolation happens here.
    pub fn load(&self, reference: &str, base: impl AsRef<Path>) -> Result<String> {
        let path = self.resolve_path(reference, base)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                info!(%reference, path = %path.display(), bytes = content.len(), "Loaded template");
                Ok(content)
            }
            Err(source) => Err(PromptError::LoadFileRead { path, source }),
        }
    }
}
