//! Page templates
//!
//! Loads every `*.html` file from the template directory once at startup and
//! parses `{{ name }}` placeholders. The resulting [`TemplateSet`] is an
//! immutable value injected into the request handler through shared state,
//! never a mutable global. Parse failures are fatal startup errors.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Template loading and parse errors
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template directory '{dir}'")]
    ReadDir {
        dir: String,
        source: std::io::Error,
    },

    #[error("failed to read template file '{file}'")]
    ReadFile {
        file: String,
        source: std::io::Error,
    },

    #[error("unclosed placeholder in template '{name}' at byte {offset}")]
    UnclosedPlaceholder { name: String, offset: usize },

    #[error("empty placeholder in template '{name}' at byte {offset}")]
    EmptyPlaceholder { name: String, offset: usize },
}

/// A parsed template, split into literal and placeholder segments
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

impl Template {
    /// Parse template source, splitting on `{{ name }}` placeholders
    fn parse(name: &str, source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                return Err(TemplateError::UnclosedPlaceholder {
                    name: name.to_string(),
                    offset: offset + open,
                });
            };
            let var = after_open[..close].trim();
            if var.is_empty() {
                return Err(TemplateError::EmptyPlaceholder {
                    name: name.to_string(),
                    offset: offset + open,
                });
            }
            segments.push(Segment::Placeholder(var.to_string()));
            offset += open + 2 + close + 2;
            rest = &after_open[close + 2..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Render the template with the given variables.
    /// Unknown placeholder names render as empty strings.
    fn render(&self, vars: &HashMap<&str, String>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(var) => {
                    if let Some(value) = vars.get(var.as_str()) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }
}

/// All templates, keyed by file stem (e.g. "index" for index.html)
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: HashMap<String, Template>,
}

impl TemplateSet {
    /// Load and parse every `*.html` file in the given directory
    pub fn load(dir: &str) -> Result<Self, TemplateError> {
        let entries = fs::read_dir(dir).map_err(|source| TemplateError::ReadDir {
            dir: dir.to_string(),
            source,
        })?;

        let mut templates = HashMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| TemplateError::ReadDir {
                dir: dir.to_string(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let source = fs::read_to_string(&path).map_err(|source| TemplateError::ReadFile {
                file: path.display().to_string(),
                source,
            })?;
            let template = Template::parse(stem, &source)?;
            templates.insert(stem.to_string(), template);
        }

        Ok(Self { templates })
    }

    /// Render the named template, or None if the name does not resolve
    pub fn render(&self, name: &str, vars: &HashMap<&str, String>) -> Option<String> {
        self.templates.get(name).map(|t| t.render(vars))
    }

    #[cfg(test)]
    pub fn from_sources(sources: &[(&str, &str)]) -> Result<Self, TemplateError> {
        let mut templates = HashMap::new();
        for (name, source) in sources {
            templates.insert((*name).to_string(), Template::parse(name, source)?);
        }
        Ok(Self { templates })
    }
}
