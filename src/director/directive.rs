// ============================================================================
// spark-bindings - Directives
// Parsing `v-*` attributes and `{{ path }}` text interpolations
// ============================================================================

use crate::core::constants::{DIRECTIVE_PREFIX, MUSTACHE_CLOSE, MUSTACHE_OPEN};
use crate::core::error::{Error, PathError};
use crate::graph::value::Value;
use crate::primitives::path::PropertyPath;

// =============================================================================
// ATTRIBUTE DIRECTIVES
// =============================================================================

/// A binding site declared by an element attribute
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `v-model="path"`: two-way sync with the element's value
    Model(PropertyPath),
    /// `v-html="path"`: one-way into the element's inner HTML
    Html(PropertyPath),
    /// `v-text="path"`: one-way into the element's text
    Text(PropertyPath),
    /// `v-on:event="method"`: call a view model method on the event
    On { event: String, method: String },
}

impl Directive {
    /// Parse one attribute. Returns `Ok(None)` for ordinary attributes.
    ///
    /// # Example
    ///
    /// ```
    /// use spark_bindings::director::Directive;
    ///
    /// assert!(Directive::parse("class", "big").unwrap().is_none());
    /// assert_eq!(
    ///     Directive::parse("v-on:click", "save").unwrap(),
    ///     Some(Directive::On { event: "click".into(), method: "save".into() })
    /// );
    /// assert!(Directive::parse("v-bogus", "x").is_err());
    /// ```
    pub fn parse(name: &str, expression: &str) -> Result<Option<Self>, Error> {
        let Some(directive) = name.strip_prefix(DIRECTIVE_PREFIX) else {
            return Ok(None);
        };
        let (kind, argument) = match directive.split_once(':') {
            Some((kind, argument)) => (kind, Some(argument)),
            None => (directive, None),
        };
        let expression = expression.trim();

        let parsed = match (kind, argument) {
            ("model", None) => Directive::Model(PropertyPath::parse(expression)?),
            ("html", None) => Directive::Html(PropertyPath::parse(expression)?),
            ("text", None) => Directive::Text(PropertyPath::parse(expression)?),
            ("on", Some(event)) if !event.is_empty() && !expression.is_empty() => Directive::On {
                event: event.to_string(),
                method: expression.to_string(),
            },
            _ => {
                return Err(Error::UnknownDirective {
                    name: name.to_string(),
                });
            }
        };
        Ok(Some(parsed))
    }
}

// =============================================================================
// TEXT INTERPOLATION
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
enum Part {
    Literal(String),
    Slot(usize),
}

/// Text with `{{ path }}` placeholders.
///
/// Placeholders match lazily, so `{{a}} {{b}}` is two expressions, and
/// literal text around them is kept. An unclosed `{{` and an empty `{{}}`
/// are literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interpolation {
    parts: Vec<Part>,
    paths: Vec<PropertyPath>,
}

impl Interpolation {
    /// Parse `text`. Returns `Ok(None)` if it has no placeholder.
    pub fn parse(text: &str) -> Result<Option<Self>, PathError> {
        let mut parts = Vec::new();
        let mut paths = Vec::new();
        let mut rest = text;

        while let Some(open) = rest.find(MUSTACHE_OPEN) {
            let after_open = &rest[open + MUSTACHE_OPEN.len()..];
            let Some(close) = after_open.find(MUSTACHE_CLOSE) else {
                break;
            };
            if close == 0 {
                // `{{}}` holds no expression; keep it as text
                let end = open + MUSTACHE_OPEN.len() + MUSTACHE_CLOSE.len();
                parts.push(Part::Literal(rest[..end].to_string()));
                rest = &rest[end..];
                continue;
            }
            if open > 0 {
                parts.push(Part::Literal(rest[..open].to_string()));
            }
            paths.push(PropertyPath::parse(after_open[..close].trim())?);
            parts.push(Part::Slot(paths.len() - 1));
            rest = &after_open[close + MUSTACHE_CLOSE.len()..];
        }

        if paths.is_empty() {
            return Ok(None);
        }
        if !rest.is_empty() {
            parts.push(Part::Literal(rest.to_string()));
        }
        Ok(Some(Self { parts, paths }))
    }

    /// Paths in order of appearance (one per placeholder)
    pub fn paths(&self) -> &[PropertyPath] {
        &self.paths
    }

    /// Render with `values[i]` substituted for the i-th placeholder.
    pub fn render(&self, values: &[Value]) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Literal(text) => text.clone(),
                Part::Slot(index) => values.get(*index).map(Value::to_string).unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> PropertyPath {
        PropertyPath::parse(s).unwrap()
    }

    #[test]
    fn parses_known_directives() {
        assert_eq!(
            Directive::parse("v-model", " user.name ").unwrap(),
            Some(Directive::Model(path("user.name")))
        );
        assert_eq!(
            Directive::parse("v-html", "body").unwrap(),
            Some(Directive::Html(path("body")))
        );
        assert_eq!(
            Directive::parse("v-text", "title").unwrap(),
            Some(Directive::Text(path("title")))
        );
    }

    #[test]
    fn rejects_malformed_directives() {
        assert_eq!(
            Directive::parse("v-on", "save"),
            Err(Error::UnknownDirective { name: "v-on".into() })
        );
        assert!(Directive::parse("v-on:", "save").is_err());
        assert!(Directive::parse("v-model:x", "a").is_err());
        assert!(matches!(
            Directive::parse("v-model", ""),
            Err(Error::Path(PathError::EmptyPath))
        ));
    }

    #[test]
    fn interpolation_is_lazy_and_keeps_literals() {
        let interp = Interpolation::parse("Hi {{ first }} {{last}}!").unwrap().unwrap();
        assert_eq!(interp.paths(), &[path("first"), path("last")]);
        assert_eq!(
            interp.render(&[Value::from("Ann"), Value::from("Lee")]),
            "Hi Ann Lee!"
        );
    }

    #[test]
    fn plain_and_unclosed_text_has_no_interpolation() {
        assert_eq!(Interpolation::parse("plain").unwrap(), None);
        assert_eq!(Interpolation::parse("open {{ only").unwrap(), None);
    }

    #[test]
    fn unclosed_tail_stays_literal() {
        let interp = Interpolation::parse("{{a}} and {{").unwrap().unwrap();
        assert_eq!(interp.render(&[Value::from(1)]), "1 and {{");
    }

    #[test]
    fn blank_placeholder_is_an_error() {
        assert_eq!(Interpolation::parse("{{ }}"), Err(PathError::EmptyPath));
    }

    #[test]
    fn empty_braces_stay_literal() {
        assert_eq!(Interpolation::parse("a {{}} b").unwrap(), None);

        let interp = Interpolation::parse("{{}} {{x}}").unwrap().unwrap();
        assert_eq!(interp.paths(), &[path("x")]);
        assert_eq!(interp.render(&[Value::from(1)]), "{{}} 1");
    }
}
