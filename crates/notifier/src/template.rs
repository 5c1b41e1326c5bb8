//! Placeholder templates for message, sender and attachment text.
//!
//! Templates are plain text with `{{ path | filter: arg }}` placeholders:
//!
//! - `{{Message}}`, `{{Level}}`, `{{Id}}`, `{{Exception}}`, `{{Timestamp}}`,
//!   `{{EventType}}` read event fields (`{{RenderedMessage}}` and
//!   `{{LocalTimestamp}}` are accepted as the event's own field names);
//! - `{{Properties.Name}}` (or just `{{Name}}`) reads a property, and further
//!   segments walk nested objects and arrays (`{{Properties.Items.0.Sku}}`);
//! - filters: `upcase`, `downcase`, `strip`, `default: "text"`, `truncate: 40`.
//!
//! Unknown names render as empty text. Malformed placeholders are errors.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::{Map, Value};

use crate::error::TemplateError;
use crate::event::{Event, EventType};
use crate::level::Level;

/// The values a template can reference.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub id: &'a str,
    pub level: Level,
    pub message: &'a str,
    pub exception: Option<&'a str>,
    pub properties: &'a Map<String, Value>,
    pub timestamp: DateTime<FixedOffset>,
    pub event_type: EventType,
}

impl<'a> RenderContext<'a> {
    /// Build a context that borrows from an event.
    pub fn from_event(event: &'a Event) -> Self {
        Self {
            id: &event.id,
            level: event.level,
            message: &event.rendered_message,
            exception: event.exception.as_deref(),
            properties: &event.properties,
            timestamp: event.local_timestamp,
            event_type: event.event_type,
        }
    }

    /// Resolve a dotted path to its text form. `None` means "nothing there".
    fn lookup(&self, path: &[String]) -> Option<Cow<'a, str>> {
        let (head, tail) = path.split_first()?;
        let field = match head.as_str() {
            "Id" => Some(Cow::Borrowed(self.id)),
            "Level" => Some(Cow::Borrowed(self.level.as_str())),
            "Message" | "RenderedMessage" => Some(Cow::Borrowed(self.message)),
            "Exception" => self.exception.map(Cow::Borrowed),
            "Timestamp" | "LocalTimestamp" => Some(Cow::Owned(
                self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            "EventType" => Some(Cow::Owned(self.event_type.to_string())),
            "Properties" => {
                return match tail {
                    [] => Some(Cow::Owned(Value::Object(self.properties.clone()).to_string())),
                    [name, rest @ ..] => walk(self.properties.get(name)?, rest).and_then(value_text),
                };
            }
            // Bare property shorthand.
            name => {
                return walk(self.properties.get(name)?, tail).and_then(value_text);
            }
        };

        // Scalar fields have no children.
        if tail.is_empty() {
            field
        } else {
            None
        }
    }
}

fn walk<'v>(mut value: &'v Value, path: &[String]) -> Option<&'v Value> {
    for segment in path {
        value = match value {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(value)
}

fn value_text<'a>(value: &'a Value) -> Option<Cow<'a, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// A filter applied to a placeholder value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Filter {
    Upcase,
    Downcase,
    Strip,
    Default(String),
    Truncate(usize),
}

impl Filter {
    fn apply(&self, value: Option<String>) -> Option<String> {
        match self {
            Self::Upcase => value.map(|v| v.to_uppercase()),
            Self::Downcase => value.map(|v| v.to_lowercase()),
            Self::Strip => value.map(|v| v.trim().to_string()),
            Self::Default(fallback) => match value {
                Some(v) if !v.is_empty() => Some(v),
                _ => Some(fallback.clone()),
            },
            Self::Truncate(limit) => value.map(|v| truncate(&v, *limit)),
        }
    }
}

const ELLIPSIS: &str = "...";

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder { path: Vec<String>, filters: Vec<Filter> },
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        while let Some((open, is_tag)) = next_open(source, cursor) {
            if is_tag {
                return Err(TemplateError::syntax(open, "`{%` tags are not supported"));
            }
            if open > cursor {
                segments.push(Segment::Text(source[cursor..open].to_string()));
            }

            let inner_start = open + 2;
            let close = find_close(source, inner_start)
                .ok_or_else(|| TemplateError::syntax(open, "unterminated `{{`"))?;

            segments.push(parse_placeholder(&source[inner_start..close], inner_start)?);
            cursor = close + 2;
        }

        if cursor < source.len() {
            segments.push(Segment::Text(source[cursor..].to_string()));
        }

        Ok(Self { segments })
    }

    /// Render against a context.
    pub fn render(&self, context: &RenderContext<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder { path, filters } => {
                    let value = context.lookup(path).map(Cow::into_owned);
                    let value = filters.iter().fold(value, |value, filter| filter.apply(value));
                    if let Some(value) = value {
                        out.push_str(&value);
                    }
                }
            }
        }
        out
    }
}

/// Find the next `{{` or `{%` at or after `from`. Lone braces are text.
fn next_open(source: &str, from: usize) -> Option<(usize, bool)> {
    let bytes = source.as_bytes();
    let mut from = from;
    while let Some(offset) = source[from..].find('{') {
        let pos = from + offset;
        match bytes.get(pos + 1) {
            Some(b'{') => return Some((pos, false)),
            Some(b'%') => return Some((pos, true)),
            _ => from = pos + 1,
        }
    }
    None
}

/// Find the `}}` closing a placeholder that starts at `from`, skipping
/// quoted filter arguments.
fn find_close(source: &str, from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (offset, c) in source[from..].char_indices() {
        let pos = from + offset;
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if source[pos..].starts_with("}}") => return Some(pos),
            None => {}
        }
    }
    None
}

fn parse_placeholder(inner: &str, offset: usize) -> Result<Segment, TemplateError> {
    let mut parts = split_unquoted(inner, '|').into_iter();
    let path_part = parts.next().unwrap_or_default();
    let path_text = path_part.trim();

    if path_text.is_empty() {
        return Err(TemplateError::syntax(offset, "empty placeholder"));
    }

    let path: Vec<String> = path_text.split('.').map(str::to_string).collect();
    let valid = path
        .iter()
        .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_alphanumeric() || c == '_'));
    if !valid {
        return Err(TemplateError::syntax(
            offset,
            format!("invalid variable name `{}`", path_text),
        ));
    }

    let filters = parts
        .map(|part| parse_filter(part.trim(), offset))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Segment::Placeholder { path, filters })
}

fn parse_filter(text: &str, offset: usize) -> Result<Filter, TemplateError> {
    let (name, arg) = match text.split_once(':') {
        Some((name, arg)) => (name.trim(), Some(arg.trim())),
        None => (text, None),
    };

    if name.is_empty() {
        return Err(TemplateError::syntax(offset, "empty filter"));
    }

    let argument_error = |message: &str| TemplateError::FilterArgument {
        filter: name.to_string(),
        message: message.to_string(),
    };

    match name {
        "upcase" | "downcase" | "strip" => {
            if arg.is_some() {
                return Err(argument_error("takes no argument"));
            }
            Ok(match name {
                "upcase" => Filter::Upcase,
                "downcase" => Filter::Downcase,
                _ => Filter::Strip,
            })
        }
        "default" => {
            let arg = arg.ok_or_else(|| argument_error("missing argument"))?;
            let literal = parse_literal(arg).ok_or_else(|| argument_error("expected a literal"))?;
            Ok(Filter::Default(literal))
        }
        "truncate" => {
            let arg = arg.ok_or_else(|| argument_error("missing argument"))?;
            let limit = arg
                .parse::<usize>()
                .map_err(|_| argument_error("expected a non-negative integer"))?;
            Ok(Filter::Truncate(limit))
        }
        other => Err(TemplateError::UnknownFilter(other.to_string())),
    }
}

fn parse_literal(arg: &str) -> Option<String> {
    for quote in ['"', '\''] {
        if let Some(inner) = arg.strip_prefix(quote).and_then(|a| a.strip_suffix(quote)) {
            return Some(inner.to_string());
        }
    }
    if !arg.is_empty() && arg.parse::<f64>().is_ok() {
        return Some(arg.to_string());
    }
    None
}

/// Split on `sep`, ignoring separators inside single or double quotes.
fn split_unquoted(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == sep => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            None => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Renders template text against an event context.
pub trait TemplateEngine: Send + Sync {
    /// Check that a template is well formed without rendering it.
    fn check(&self, template: &str) -> Result<(), TemplateError>;

    /// Render a template.
    fn render(&self, template: &str, context: &RenderContext<'_>) -> Result<String, TemplateError>;
}

/// The built-in `{{placeholder}}` engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderEngine;

impl TemplateEngine for PlaceholderEngine {
    fn check(&self, template: &str) -> Result<(), TemplateError> {
        Template::parse(template).map(|_| ())
    }

    fn render(&self, template: &str, context: &RenderContext<'_>) -> Result<String, TemplateError> {
        Ok(Template::parse(template)?.render(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event() -> Event {
        Event::new(
            "event-7",
            Level::Warning,
            "Queue orders is backed up",
            DateTime::parse_from_rfc3339("2024-03-01T10:15:00.250+01:00").unwrap(),
            EventType(0xBEEF),
        )
        .with_exception("System.TimeoutException: boom")
        .with_property("Queue", "orders")
        .with_property("Length", 12)
        .with_property("Healthy", false)
        .with_property("Missing", Value::Null)
        .with_property(
            "Host",
            json!({ "Name": "db-01", "Tags": ["eu", "primary"], "Items": [{ "Sku": "A1" }] }),
        )
    }

    fn render(source: &str) -> String {
        let event = event();
        PlaceholderEngine
            .render(source, &RenderContext::from_event(&event))
            .unwrap()
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(render("no placeholders { here }"), "no placeholders { here }");
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_event_fields() {
        assert_eq!(render("{{Level}}: {{Message}}"), "Warning: Queue orders is backed up");
        assert_eq!(render("{{ Id }}"), "event-7");
        assert_eq!(render("{{Exception}}"), "System.TimeoutException: boom");
        assert_eq!(render("{{EventType}}"), "$0000BEEF");
        assert_eq!(render("{{Timestamp}}"), "2024-03-01T10:15:00.250+01:00");
        assert_eq!(render("{{RenderedMessage}}"), "Queue orders is backed up");
        assert_eq!(render("{{LocalTimestamp}}"), "2024-03-01T10:15:00.250+01:00");
    }

    #[test]
    fn test_properties() {
        assert_eq!(render("{{Properties.Queue}}"), "orders");
        assert_eq!(render("{{Queue}} has {{Length}}"), "orders has 12");
        assert_eq!(render("{{Healthy}}"), "false");
        assert_eq!(render("[{{Missing}}]"), "[]");
        assert_eq!(render("{{Properties.Host.Name}}"), "db-01");
        assert_eq!(render("{{Host.Tags.1}}"), "primary");
        assert_eq!(render("{{Host.Items.0.Sku}}"), "A1");
        assert_eq!(render("{{Host.Tags}}"), r#"["eu","primary"]"#);
    }

    #[test]
    fn test_unknown_names_render_empty() {
        assert_eq!(render("[{{Nope}}]"), "[]");
        assert_eq!(render("[{{Host.Nope.Deeper}}]"), "[]");
        assert_eq!(render("[{{Level.Name}}]"), "[]");
        assert_eq!(render("[{{Host.Tags.x}}]"), "[]");
    }

    #[test]
    fn test_filters() {
        assert_eq!(render("{{Level | upcase}}"), "WARNING");
        assert_eq!(render("{{Queue | upcase | downcase}}"), "orders");
        assert_eq!(render("{{Nope | default: \"n/a\"}}"), "n/a");
        assert_eq!(render("{{Nope | default: 'a|b'}}"), "a|b");
        assert_eq!(render("{{Nope | default: 5}}"), "5");
        assert_eq!(render("{{Queue | default: \"n/a\"}}"), "orders");
        assert_eq!(render("{{Message | truncate: 10}}"), "Queue o...");
        assert_eq!(render("{{Queue | truncate: 10}}"), "orders");
    }

    #[test]
    fn test_quoted_braces_in_filter_argument() {
        assert_eq!(render(r#"{{Nope | default: "}}"}}!"#), "}}!");
        assert_eq!(render("[{{Nope | default: '{{x}}'}}]"), "[{{x}}]");
    }

    #[test]
    fn test_unterminated_placeholder() {
        let err = Template::parse("Hello {{Message").unwrap_err();
        assert_eq!(
            err,
            TemplateError::Syntax {
                position: 6,
                message: "unterminated `{{`".to_string()
            }
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(Template::parse("{{ }}"), Err(TemplateError::Syntax { .. })));
        assert!(matches!(Template::parse("{{Properties..X}}"), Err(TemplateError::Syntax { .. })));
        assert!(matches!(Template::parse("{{a b}}"), Err(TemplateError::Syntax { .. })));
        assert!(matches!(
            Template::parse("{% if x %}y{% endif %}"),
            Err(TemplateError::Syntax { position: 0, .. })
        ));
        assert!(matches!(Template::parse("{{x | }}"), Err(TemplateError::Syntax { .. })));
    }

    #[test]
    fn test_filter_errors() {
        assert_eq!(
            Template::parse("{{x | shout}}").unwrap_err(),
            TemplateError::UnknownFilter("shout".to_string())
        );
        assert!(matches!(
            Template::parse("{{x | truncate: many}}"),
            Err(TemplateError::FilterArgument { .. })
        ));
        assert!(matches!(
            Template::parse("{{x | default}}"),
            Err(TemplateError::FilterArgument { .. })
        ));
        assert!(matches!(
            Template::parse("{{x | upcase: 1}}"),
            Err(TemplateError::FilterArgument { .. })
        ));
    }

    #[test]
    fn test_engine_check() {
        assert!(PlaceholderEngine.check("{{Message}}").is_ok());
        assert!(PlaceholderEngine.check("{{Message").is_err());
    }
}
