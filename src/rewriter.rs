//! Rewrites master-dialect (cookiecutter) template expressions into the
//! derived (copier) dialect.
//!
//! The rewriter is an ordered table of pattern substitutions, not a parser.
//! Composite-variable rules come first because the generic namespace
//! stripping rules would otherwise consume their input. Text without any
//! `cookiecutter.` reference is returned unchanged, which makes the rewrite
//! idempotent.

use std::borrow::Cow;

use log::debug;
use regex::Regex;

use crate::constants::{
    COMPOSITE_BACKENDS, COMPOSITE_COMPARISON, COMPOSITE_FIELDS, COMPOSITE_SENTINEL,
    COMPOSITE_VARIABLE, MASTER_NAMESPACE,
};
use crate::error::{Error, Result};

/// The families of substitution, listed in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RuleKind {
    /// `{{ ns.composite.backend.field }}` -> `{{ backend_field }}`
    CompositeValue,
    /// `{% if ns.composite.backend %}` -> `{% if composite == 'backend' %}`
    CompositeMembership,
    /// `{% if ns.composite.backend.field != 'lit' %}` -> `{% if backend_field != 'lit' %}`
    CompositeComparison,
    /// `{{ ns.var }}` -> `{{ var }}`
    GenericValue,
    /// `{% if ns.var ...` -> `{% if var ...`
    GenericControl,
    /// any remaining `ns.var` -> `var`
    GenericReference,
}

impl RuleKind {
    /// Whether the rule is also applied to file and directory names.
    /// Names only ever hold value expressions.
    pub fn applies_to_names(self) -> bool {
        matches!(self, RuleKind::CompositeValue | RuleKind::GenericValue)
    }
}

/// A single `(pattern, replacement)` entry of the rule table.
#[derive(Debug, Clone)]
struct Rule {
    kind: RuleKind,
    name: String,
    pattern: Regex,
    replacement: String,
}

impl Rule {
    fn new(kind: RuleKind, name: impl Into<String>, pattern: &str, replacement: String) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::TemplateError(format!("invalid rewrite rule '{name}': {e}")))?;
        Ok(Self { kind, name, pattern, replacement })
    }

    /// Applies this rule to every match in `text`.
    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, self.replacement.as_str())
    }
}

/// Ordered rule engine converting the master dialect to the derived one.
#[derive(Debug, Clone)]
pub struct Rewriter {
    rules: Vec<Rule>,
}

impl Rewriter {
    /// Builds the rule table for the `cookiecutter` namespace and the
    /// `dataset_storage` composite variable.
    pub fn new() -> Result<Self> {
        let ns = regex::escape(MASTER_NAMESPACE);
        let composite = regex::escape(COMPOSITE_VARIABLE);
        let backends = COMPOSITE_BACKENDS.map(regex::escape).join("|");
        let mut rules = Vec::new();

        for (backend, field) in COMPOSITE_FIELDS {
            rules.push(Rule::new(
                RuleKind::CompositeValue,
                format!("{COMPOSITE_VARIABLE}.{backend}.{field}"),
                &format!(
                    r"\{{\{{\s*{ns}\.{composite}\.{}\.{}\s*\}}\}}",
                    regex::escape(backend),
                    regex::escape(field)
                ),
                format!("{{{{ {backend}_{field} }}}}"),
            )?);
        }

        // The negated sentinel check must run before the plain membership
        // rule, which would otherwise never see the `not`.
        rules.push(Rule::new(
            RuleKind::CompositeMembership,
            format!("if not {COMPOSITE_VARIABLE}.{COMPOSITE_SENTINEL}"),
            &format!(
                r"\{{%-?\s*if\s+not\s+{ns}\.{composite}\.{}\s*%\}}",
                regex::escape(COMPOSITE_SENTINEL)
            ),
            format!("{{% if {COMPOSITE_VARIABLE} != '{COMPOSITE_SENTINEL}' %}}"),
        )?);
        for keyword in ["if", "elif"] {
            rules.push(Rule::new(
                RuleKind::CompositeMembership,
                format!("{keyword} {COMPOSITE_VARIABLE}.<backend>"),
                &format!(r"\{{%-?\s*{keyword}\s+{ns}\.{composite}\.({backends})\s*%\}}"),
                format!("{{% {keyword} {COMPOSITE_VARIABLE} == '${{1}}' %}}"),
            )?);
        }

        let (backend, field, literal) = COMPOSITE_COMPARISON;
        rules.push(Rule::new(
            RuleKind::CompositeComparison,
            format!("if {COMPOSITE_VARIABLE}.{backend}.{field} != '{literal}'"),
            &format!(
                r#"\{{%-?\s*if\s+{ns}\.{composite}\.{}\.{}\s*!=\s*['"]{}['"]\s*%\}}"#,
                regex::escape(backend),
                regex::escape(field),
                regex::escape(literal)
            ),
            format!("{{% if {backend}_{field} != '{literal}' %}}"),
        )?);

        rules.push(Rule::new(
            RuleKind::GenericValue,
            format!("{{{{ {MASTER_NAMESPACE}.<var> }}}}"),
            &format!(r"\{{\{{\s*{ns}\.(\w+)\s*\}}\}}"),
            "{{ ${1} }}".to_string(),
        )?);
        for keyword in ["if", "elif"] {
            rules.push(Rule::new(
                RuleKind::GenericControl,
                format!("{keyword} {MASTER_NAMESPACE}.<var>"),
                &format!(r"\{{%-?\s*{keyword}\s+{ns}\.(\w+)"),
                format!("{{% {keyword} ${{1}}"),
            )?);
        }
        rules.push(Rule::new(
            RuleKind::GenericReference,
            format!("{MASTER_NAMESPACE}.<var>"),
            &format!(r"{ns}\.(\w+)"),
            "${1}".to_string(),
        )?);

        debug!("Built rewriter with {} rules", rules.len());
        Ok(Self { rules })
    }

    /// Rewrites the content of a text file.
    pub fn rewrite_content(&self, content: &str) -> String {
        self.apply(content, |_| true)
    }

    /// Rewrites a single file or directory name.
    pub fn rewrite_name(&self, name: &str) -> String {
        self.apply(name, |rule| rule.kind.applies_to_names())
    }

    fn apply(&self, text: &str, filter: impl Fn(&Rule) -> bool) -> String {
        let mut current = text.to_string();
        for rule in self.rules.iter().filter(|rule| filter(rule)) {
            let rewritten = match rule.apply(&current) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(rewritten) => rewritten,
            };
            debug!("Applied rewrite rule '{}'", rule.name);
            current = rewritten;
        }
        current
    }
}
