//! Line-oriented event input: native JSON events or Seq CLEF records.

use chrono::DateTime;
use clap::ValueEnum;
use notifier::{Event, EventError, EventType, Level};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// How each input line is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// CLEF if the line has an `@t` field, native JSON otherwise.
    Auto,
    /// `{"Id", "Level", "RenderedMessage", ...}`
    Json,
    /// Compact Log Event Format (`@t`, `@mt`, `@l`, ...).
    Clef,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str, format: InputFormat) -> Result<Option<Event>, EventError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(line).map_err(|e| EventError::InvalidEvent(e.to_string()))?;

    let event = match format {
        InputFormat::Json => Event::from_value(value)?,
        InputFormat::Clef => from_clef(value)?,
        InputFormat::Auto => {
            if value.get("@t").is_some() {
                from_clef(value)?
            } else {
                Event::from_value(value)?
            }
        }
    };
    Ok(Some(event))
}

/// Convert a CLEF record into an event.
pub fn from_clef(value: Value) -> Result<Event, EventError> {
    let Value::Object(record) = value else {
        return Err(EventError::InvalidEvent("CLEF record must be an object".to_string()));
    };

    let timestamp = record
        .get("@t")
        .and_then(Value::as_str)
        .ok_or_else(|| EventError::InvalidEvent("missing @t".to_string()))?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|e| EventError::InvalidEvent(format!("invalid @t: {}", e)))?;

    let level = match record.get("@l").and_then(Value::as_str) {
        Some(raw) => raw.parse::<Level>()?,
        None => Level::Information,
    };

    let template = record.get("@mt").and_then(Value::as_str);
    let message = record.get("@m").and_then(Value::as_str);
    let exception = record.get("@x").and_then(Value::as_str).map(str::to_string);

    let mut properties = Map::new();
    for (key, value) in &record {
        if let Some(escaped) = key.strip_prefix("@@") {
            properties.insert(format!("@{}", escaped), value.clone());
        } else if !key.starts_with('@') {
            properties.insert(key.clone(), value.clone());
        }
    }

    let rendered_message = match (message, template) {
        (Some(message), _) => message.to_string(),
        (None, Some(template)) => render_message_template(template, &properties),
        (None, None) => String::new(),
    };

    let event_type = match record.get("@i") {
        Some(Value::String(raw)) => EventType::from_hex(raw)
            .ok_or_else(|| EventError::InvalidEvent(format!("invalid @i: {}", raw)))?,
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(EventType)
            .ok_or_else(|| EventError::InvalidEvent(format!("invalid @i: {}", n)))?,
        Some(other) => {
            return Err(EventError::InvalidEvent(format!("invalid @i: {}", other)));
        }
        None => derive_event_type(template.or(message).unwrap_or_default()),
    };

    let mut event = Event::new(
        Uuid::new_v4().to_string(),
        level,
        rendered_message,
        timestamp,
        event_type,
    );
    event.exception = exception;
    event.properties = properties;
    Ok(event)
}

/// Event type for records without `@i`: the first four bytes of the
/// template's SHA-256.
pub fn derive_event_type(template: &str) -> EventType {
    let digest = Sha256::digest(template.as_bytes());
    EventType(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

/// Fill `{Name}` holes of a message template from properties.
///
/// `{{` and `}}` are literal braces; `{@Name}`, `{$Name}` and `{Name:format}`
/// use the bare name; holes without a property are kept as written.
pub fn render_message_template(template: &str, properties: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                out.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                out.push('}');
            }
            '{' => match template[i + 1..].find('}') {
                Some(len) => {
                    let hole = &template[i + 1..i + 1 + len];
                    let name = hole
                        .trim_start_matches(['@', '$'])
                        .split([':', ','])
                        .next()
                        .unwrap_or_default();
                    match properties.get(name) {
                        Some(Value::String(s)) => out.push_str(s),
                        Some(value) => out.push_str(&value.to_string()),
                        None => {
                            out.push('{');
                            out.push_str(hole);
                            out.push('}');
                        }
                    }
                    // Skip past the closing brace.
                    while let Some((j, _)) = chars.next() {
                        if j == i + 1 + len {
                            break;
                        }
                    }
                }
                None => out.push('{'),
            },
            other => out.push(other),
        }
    }

    out
}
