//! Document renderer: template text + variable set in, normalized
//! configuration document out.
//!
//! Rendering never propagates an error to the caller. Expansion and parse
//! failures are captured in the returned [`RenderReport`] so the orchestrator
//! can record them per template and keep going.

pub mod filters;
pub mod vars;
pub mod yaml;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error};

/// A rendered configuration document: top-level keys name configuration
/// domains, values hold the domain's object specifications.
pub type Document = Map<String, Value>;

/// The variable set a template is expanded against.
pub type VariableSet = Map<String, Value>;

/// Why a render failed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0}")]
    Template(String),
    #[error("{message}")]
    Parse { message: String, line: Option<usize> },
    #[error("rendered document is not a mapping")]
    NotAMapping,
}

impl RenderError {
    pub fn kind(&self) -> &'static str {
        match self {
            RenderError::Template(_) => "TemplateError",
            RenderError::Parse { .. } => "ParseError",
            RenderError::NotAMapping => "ParseError",
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            RenderError::Parse { line, .. } => *line,
            _ => None,
        }
    }
}

/// Outcome of rendering one template.
#[derive(Debug)]
pub struct RenderReport {
    pub name: String,
    pub document: Option<Document>,
    pub error: Option<RenderError>,
    pub log: String,
}

impl RenderReport {
    pub fn success(&self) -> bool {
        self.document.is_some()
    }
}

/// Tera-based template renderer with the custom filter set registered.
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Expand `template` against `variables`, parse the result under the
    /// literal-preserving rules and normalize the `nan` sentinel away.
    pub fn render(&self, name: &str, template: &str, variables: &VariableSet) -> RenderReport {
        match self.render_inner(name, template, variables) {
            Ok(document) => {
                debug!(template = name, keys = document.len(), "template rendered");
                RenderReport {
                    name: name.to_string(),
                    document: Some(document),
                    error: None,
                    log: format!("[renderer]: template {name} was rendered successfully."),
                }
            }
            Err(e) => {
                error!(template = name, kind = e.kind(), "render failed: {e}");
                let log = match e.line() {
                    Some(line) => {
                        format!("[renderer] -> [{}]: {e}. Line: {line}", e.kind())
                    }
                    None => format!("[renderer] -> [{}]: {e}", e.kind()),
                };
                RenderReport {
                    name: name.to_string(),
                    document: None,
                    error: Some(e),
                    log,
                }
            }
        }
    }

    fn render_inner(
        &self,
        name: &str,
        template: &str,
        variables: &VariableSet,
    ) -> Result<Document, RenderError> {
        let mut tera = tera::Tera::default();
        tera.register_filter("bool", filters::bool_filter);
        tera.register_filter("range", filters::range_filter);
        tera.register_filter("nan", filters::nan_filter);
        tera.add_raw_template(name, template)
            .map_err(|e| RenderError::Template(describe(&e)))?;

        let context = tera::Context::from_serialize(Value::Object(variables.clone()))
            .map_err(|e| RenderError::Template(describe(&e)))?;
        let expanded = tera
            .render(name, &context)
            .map_err(|e| RenderError::Template(describe(&e)))?;

        let mut parsed = yaml::load_literal(&expanded).map_err(|e| RenderError::Parse {
            message: e.to_string(),
            line: Some(e.marker().line()),
        })?;
        yaml::replace_nan_strings(&mut parsed);

        match parsed {
            Value::Object(map) => Ok(map),
            _ => Err(RenderError::NotAMapping),
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten a tera error and its source chain into one line; the top-level
/// message alone ("Failed to render 'x'") says nothing useful.
fn describe(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
