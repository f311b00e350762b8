//! Prompt instance
//!
//! Owns a template, its variable mapping, and the interpolated value. The value
//! is recomputed eagerly whenever the mapping changes, and a prompt can only
//! exist while every placeholder outside code fences is bound.

use std::fmt;

use tracing::debug;

use crate::error::{PromptError, Result};
use crate::scan::{self, Placeholder};
use crate::variables::Variables;

/// An interpolated prompt
#[derive(Debug, Clone)]
pub struct Prompt {
    template: String,
    placeholders: Vec<Placeholder>,
    variables: Variables,
    value: String,
}

impl Prompt {
    /// Create a prompt, failing with [`PromptError::MissingVariables`] if any
    /// placeholder outside a code fence has no binding in `variables`
    pub fn new(template: impl Into<String>, variables: Variables) -> Result<Self> {
        let template = template.into();
        let placeholders = scan::scan(&template);
        let value = interpolate(&template, &placeholders, &variables)?;

        Ok(Self {
            template,
            placeholders,
            variables,
            value,
        })
    }

    /// Create a prompt with an empty variable mapping
    pub fn from_template(template: impl Into<String>) -> Result<Self> {
        Self::new(template, Variables::new())
    }

    /// Replace the whole variable mapping and re-interpolate.
    ///
    /// On failure the prompt is left untouched.
    pub fn set_variables(&mut self, variables: Variables) -> Result<()> {
        let value = interpolate(&self.template, &self.placeholders, &variables)?;
        self.variables = variables;
        self.value = value;
        Ok(())
    }

    /// The interpolated text
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// The original, uninterpolated template text
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Identifiers referenced outside code fences, de-duplicated, in
    /// first-occurrence order
    pub fn placeholders(&self) -> Vec<&str> {
        scan::unique_names(&self.placeholders)
    }

    pub fn into_value(self) -> String {
        self.value
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

fn interpolate(template: &str, placeholders: &[Placeholder], variables: &Variables) -> Result<String> {
    let missing: Vec<String> = scan::unique_names(placeholders)
        .into_iter()
        .filter(|name| !variables.contains(name))
        .map(str::to_string)
        .collect();

    if !missing.is_empty() {
        debug!(?missing, "interpolate: unbound placeholders");
        return Err(PromptError::MissingVariables {
            variables: missing,
            template: template.to_string(),
        });
    }

    let mut out = String::with_capacity(template.len());
    let mut cursor = 0;
    for placeholder in placeholders {
        out.push_str(&template[cursor..placeholder.span.start]);
        if let Some(value) = variables.get(&placeholder.name) {
            out.push_str(&value.to_string());
        }
        cursor = placeholder.span.end;
    }
    out.push_str(&template[cursor..]);

    debug!(
        substitutions = placeholders.len(),
        len = out.len(),
        "interpolate: done"
    );
    Ok(out)
}
