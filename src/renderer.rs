//! Template rendering for generated projects and manifest defaults.
//! Both template dialects are plain Jinja, so one MiniJinja environment
//! serves both; only the context differs.
use crate::error::{Error, Result};
use minijinja::value::Value;
use minijinja::{Environment, ErrorKind, State, UndefinedBehavior};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// Python string methods used by cookiecutter manifests, e.g.
/// `{{ cookiecutter.project_name.lower().replace(' ', '_') }}`.
fn string_method(
    _state: &State<'_, '_>,
    value: &Value,
    method: &str,
    args: &[Value],
) -> std::result::Result<Value, minijinja::Error> {
    let Some(s) = value.as_str() else {
        return Err(minijinja::Error::from(ErrorKind::UnknownMethod));
    };
    let arg = |index: usize| {
        args.get(index).and_then(Value::as_str).ok_or_else(|| {
            minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("{method}() expects string argument {}", index + 1),
            )
        })
    };
    let result = match method {
        "lower" => s.to_lowercase(),
        "upper" => s.to_uppercase(),
        "strip" => s.trim().to_string(),
        "replace" => s.replace(arg(0)?, arg(1)?),
        _ => return Err(minijinja::Error::from(ErrorKind::UnknownMethod)),
    };
    Ok(Value::from(result))
}

/// Copier's `to_nice_yaml` filter.
fn to_nice_yaml(value: Value) -> std::result::Result<String, minijinja::Error> {
    serde_yaml::to_string(&value)
        .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer that fails on undefined variables (truthiness
    /// checks excepted) and keeps trailing newlines like cookiecutter does.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::SemiStrict);
        env.set_keep_trailing_newline(true);
        env.set_unknown_method_callback(string_method);
        env.add_filter("to_nice_yaml", to_nice_yaml);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` on syntax errors or undefined variables
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        self.env.render_str(template, context).map_err(Error::MinijinjaError)
    }
}
