//! Route expression compilation.
//!
//! A route expression mixes literal path text with `<name>` and `<name:rule>`
//! placeholders, e.g. `post/<action:[a-z]+>/<id:\d+>`. [`compile`] turns it into
//! a [`CompiledExpression`]: an anchored regex for matching, a placeholder-only
//! template for reverse generation, and the per-parameter validation rules.
//!
//! Compilation is a pure function of the expression string, so the result can
//! be memoized by expression (see [`ExpressionCache`](super::cache::ExpressionCache)).

use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use waymark_core::{WaymarkError, WaymarkResult};

/// The capture group used for a placeholder without an explicit rule.
pub const DEFAULT_RULE: &str = "[^/]+";

/// Matches `<name>` and `<name:rule>` tokens in a route expression.
fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"<([A-Za-z0-9_]+):?([^>]+)?>").expect("token regex is valid")
    })
}

/// Matches the bare `<name>` placeholders left in a template.
fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"<([A-Za-z0-9_]+)>").expect("placeholder regex is valid"))
}

/// A declared route parameter and its optional validation rule.
#[derive(Debug, Clone)]
pub struct ParameterRule {
    name: String,
    rule: Option<String>,
    validator: Option<Regex>,
}

impl ParameterRule {
    /// Returns the parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rule as written in the expression, if one was given.
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    /// Returns the regex fragment used inside the match pattern.
    pub fn effective_rule(&self) -> &str {
        self.rule.as_deref().unwrap_or(DEFAULT_RULE)
    }

    /// Returns `true` if `value` is acceptable for this parameter.
    ///
    /// Parameters without an explicit rule accept any value.
    pub fn accepts(&self, value: &str) -> bool {
        self.validator.as_ref().map_or(true, |re| re.is_match(value))
    }
}

/// The compiled form of a route expression.
///
/// # Examples
///
/// ```
/// use waymark_http::urls::compiler::compile;
///
/// let compiled = compile(r"post/<action:[a-z]+>/<id:\d+>").unwrap();
/// assert_eq!(compiled.template(), Some("post/<action>/<id>"));
/// assert_eq!(compiled.pattern().as_str(), r"^post/(?P<action>[a-z]+)/(?P<id>\d+)$");
/// assert!(compiled.pattern().is_match("post/view/42"));
/// ```
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    expression: String,
    pattern: Regex,
    template: Option<String>,
    rules: Vec<ParameterRule>,
}

impl CompiledExpression {
    /// Returns the original expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns the anchored match pattern.
    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Returns the reverse-generation template, or `None` for literal expressions.
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Returns the declared parameters in declaration order.
    pub fn rules(&self) -> &[ParameterRule] {
        &self.rules
    }

    /// Returns the declared parameter named `name`.
    pub fn rule(&self, name: &str) -> Option<&ParameterRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Returns `true` if the expression contains no placeholders.
    pub const fn is_literal(&self) -> bool {
        self.template.is_none()
    }
}

/// Compiles a route expression.
///
/// Expressions without `<` are literals and match only themselves. Otherwise
/// every `<name>` becomes `(?P<name>[^/]+)` and every `<name:rule>` becomes
/// `(?P<name>rule)`. Outside the placeholders only `. * $ [ ] ( )` are escaped,
/// and one trailing `/` is trimmed from the pattern.
///
/// # Errors
///
/// Returns [`WaymarkError::DuplicateParameter`] if a parameter name is declared
/// twice, or [`WaymarkError::InvalidPattern`] if the resulting regex (or a
/// rule) is rejected by the regex engine.
pub fn compile(expression: &str) -> WaymarkResult<CompiledExpression> {
    if !expression.contains('<') {
        let pattern = build_regex(expression, &format!("^{}$", regex::escape(expression)))?;
        tracing::trace!(expression, pattern = pattern.as_str(), "compiled literal route");
        return Ok(CompiledExpression {
            expression: expression.to_string(),
            pattern,
            template: None,
            rules: Vec::new(),
        });
    }

    let mut rules: Vec<ParameterRule> = Vec::new();

    for caps in token_regex().captures_iter(expression) {
        let name = &caps[1];
        let rule = caps.get(2).map(|m| m.as_str()).filter(|r| !r.is_empty());

        if rules.iter().any(|r| r.name == name) {
            return Err(WaymarkError::DuplicateParameter {
                name: name.to_string(),
                expression: expression.to_string(),
            });
        }

        let validator = rule
            .map(|r| build_regex(expression, &format!("^(?:{r})$")))
            .transpose()?;

        rules.push(ParameterRule {
            name: name.to_string(),
            rule: rule.map(String::from),
            validator,
        });
    }

    let template = token_regex().replace_all(expression, "<${1}>").into_owned();
    let source = pattern_source(&template, &rules);
    let pattern = build_regex(expression, &source)?;

    tracing::trace!(
        expression,
        pattern = pattern.as_str(),
        parameters = rules.len(),
        "compiled route expression"
    );

    Ok(CompiledExpression {
        expression: expression.to_string(),
        pattern,
        template: Some(template),
        rules,
    })
}

/// Builds the regex source for a template: literal text escaped, placeholders
/// substituted, one trailing separator trimmed, anchored at both ends.
fn pattern_source(template: &str, rules: &[ParameterRule]) -> String {
    let mut body = String::with_capacity(template.len() * 2);
    let mut last = 0;

    for caps in placeholder_regex().captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        escape_literal(&template[last..whole.start()], &mut body);
        push_group(&caps, rules, &mut body);
        last = whole.end();
    }
    escape_literal(&template[last..], &mut body);

    let body = body.strip_suffix('/').unwrap_or(&body);
    format!("^{body}$")
}

fn push_group(caps: &Captures<'_>, rules: &[ParameterRule], out: &mut String) {
    let name = &caps[1];
    match rules.iter().find(|r| r.name == name) {
        Some(rule) => {
            write!(out, "(?P<{name}>{})", rule.effective_rule()).ok();
        }
        None => escape_literal(&caps[0], out),
    }
}

fn escape_literal(text: &str, out: &mut String) {
    for ch in text.chars() {
        if matches!(ch, '.' | '*' | '$' | '[' | ']' | '(' | ')') {
            out.push('\\');
        }
        out.push(ch);
    }
}

fn build_regex(expression: &str, source: &str) -> WaymarkResult<Regex> {
    Regex::new(source).map_err(|e| WaymarkError::InvalidPattern {
        expression: expression.to_string(),
        message: e.to_string(),
    })
}
