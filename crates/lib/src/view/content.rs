//! Short labels for item contents.

use crate::constants::{GC_LABEL, LABEL_LIMIT};
use crate::item::{ItemContent, TypeRef};

/// Produces a human-readable label for an item's content.
///
/// `parent_sub` is the map key the item lives under, if any. Angle brackets
/// are emitted pre-escaped since `<fN>` is port syntax inside record labels.
/// The result is not escaped for quotes or braces yet; see [`escape`].
pub fn format_content(content: Option<&ItemContent>, parent_sub: Option<&str>) -> String {
    let Some(content) = content else {
        return GC_LABEL.to_string();
    };

    match content {
        ItemContent::String(s) => quote(s),
        ItemContent::Format { key, value: None } => format!(r"{key}\>"),
        ItemContent::Format {
            key,
            value: Some(value),
        } => {
            let value = serde_json::to_string(value).unwrap_or_else(|_| value.to_string());
            format!(r"\<{key} {value}")
        }
        ItemContent::Deleted(len) => len.to_string(),
        ItemContent::Type(TypeRef::XmlText) => r"\<XmlText\>".to_string(),
        ItemContent::Any(values) => {
            let first = values
                .first()
                .map(ToString::to_string)
                .unwrap_or_else(|| "undefined".to_string());
            match parent_sub {
                Some(key) => format!("{key}-{first}"),
                None => first,
            }
        }
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{other:?}")),
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
}

/// Escapes a label for use inside a quoted record label and truncates it.
///
/// Quotes are escaped first, then the `\\"` left behind by an already
/// escaped quote collapses back to `\"`. Braces delimit record fields and are
/// escaped too. Truncation happens last and may cut an escape sequence in half.
pub fn escape(s: &str) -> String {
    s.replace('"', "\\\"")
        .replace("\\\\\"", "\\\"")
        .replace('{', "\\{")
        .replace('}', "\\}")
        .chars()
        .take(LABEL_LIMIT)
        .collect()
}
