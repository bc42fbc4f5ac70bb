//! Placeholder substitution.
//!
//! The only construct recognised is `{{ .Name }}` (whitespace inside the
//! braces is optional). There are no pipelines, conditionals or loops;
//! anything else between `{{` and `}}` is rejected as malformed.

use crate::domain::{
    config::{ConfigurationContext, is_identifier},
    error::{DomainError, DomainResult},
    mixin::MixinSet,
};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Variable lookup for one frozen template.
///
/// Resolution order: the template's own mixin values first, then the
/// context's extra variables.
#[derive(Debug, Clone, Copy)]
pub struct Bindings<'a> {
    mixins: &'a MixinSet,
    context: &'a ConfigurationContext,
}

impl<'a> Bindings<'a> {
    pub fn new(mixins: &'a MixinSet, context: &'a ConfigurationContext) -> Self {
        Self { mixins, context }
    }

    pub fn resolve(&self, name: &str) -> Option<&'a str> {
        self.mixins
            .binding(name)
            .or_else(|| self.context.variable(name))
    }

    /// Substitute every placeholder in `text`.
    ///
    /// `template` only labels errors.
    ///
    /// # Errors
    ///
    /// - `UnresolvedPlaceholder` for the first name with no binding
    /// - `MalformedPlaceholder` for an unterminated or non-`.Name` token
    pub fn render(&self, template: &str, text: &str) -> DomainResult<String> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + OPEN.len()..];

            let Some(end) = after_open.find(CLOSE) else {
                return Err(malformed(template, &rest[start..], "unterminated placeholder"));
            };

            let raw = &rest[start..start + OPEN.len() + end + CLOSE.len()];
            let name = parse_name(after_open[..end].trim())
                .ok_or_else(|| malformed(template, raw, "expected the form {{ .Name }}"))?;

            let value = self
                .resolve(name)
                .ok_or_else(|| DomainError::UnresolvedPlaceholder {
                    template: template.to_string(),
                    token: name.to_string(),
                })?;
            out.push_str(value);

            rest = &after_open[end + CLOSE.len()..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// `.Name` -> `Name`, or `None` if the token is anything else.
fn parse_name(inner: &str) -> Option<&str> {
    inner.strip_prefix('.').filter(|name| is_identifier(name))
}

fn malformed(template: &str, token: &str, reason: &str) -> DomainError {
    // Keep error messages readable when the tail of a large body is unterminated.
    let token: String = token.chars().take(40).collect();
    DomainError::MalformedPlaceholder {
        template: template.to_string(),
        token,
        reason: reason.to_string(),
    }
}
