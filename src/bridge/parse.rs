//! Validation of AI-generated layouts
//!
//! Models are asked for a JSON array of items but routinely wrap it in a
//! Markdown fence, nest it under an `items` key, omit ids or echo sizes that
//! disagree with the fixed dimensions. Everything recoverable is repaired
//! here; anything else becomes a distinct [`BridgeError`].

use std::collections::HashSet;
use std::str::FromStr;

use serde_json::Value;
use tracing::warn;

use super::types::BridgeError;
use crate::layout::{ItemKind, Layout, LayoutItem};

const DIMENSION_TOLERANCE: f64 = 1e-6;

/// Strip a surrounding ```` ```json ```` fence, if any
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, ...) on the opening line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// An item as the model described it, before ids are settled
struct Draft {
    id: Option<String>,
    kind: ItemKind,
    x: f64,
    y: f64,
}

/// Parse and validate a model response into a [`Layout`].
///
/// Accepts a JSON array of items or an object with an `items` array, with or
/// without a code fence. Missing ids are allocated as `<type>-<n>`.
pub fn parse_layout_response(text: &str) -> Result<Layout, BridgeError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(BridgeError::empty("the response contained no text"));
    }
    let value: Value = serde_json::from_str(body)
        .map_err(|e| BridgeError::malformed(format!("response is not JSON: {}", e)))?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(BridgeError::malformed(
                    "expected a JSON array of items or an object with an \"items\" array",
                ))
            }
        },
        _ => {
            return Err(BridgeError::malformed(
                "expected a JSON array of items or an object with an \"items\" array",
            ))
        }
    };
    if entries.is_empty() {
        return Err(BridgeError::empty("the generated layout has no items"));
    }

    let drafts = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let mut taken = HashSet::new();
    for id in drafts.iter().filter_map(|d| d.id.as_deref()) {
        if !taken.insert(id.to_string()) {
            return Err(BridgeError::DuplicateId { id: id.to_string() });
        }
    }

    let mut layout = Layout::new();
    for (index, draft) in drafts.into_iter().enumerate() {
        let id = match draft.id {
            Some(id) => id,
            None => allocate_id(draft.kind, index + 1, &mut taken),
        };
        layout
            .push(LayoutItem::new(id, draft.kind, draft.x, draft.y))
            .map_err(|e| BridgeError::malformed(e.to_string()))?;
    }
    Ok(layout)
}

fn parse_entry(index: usize, entry: &Value) -> Result<Draft, BridgeError> {
    let object = entry
        .as_object()
        .ok_or_else(|| BridgeError::malformed(format!("item {} is not an object", index)))?;

    let type_name = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| BridgeError::malformed(format!("item {} has no \"type\"", index)))?;
    let kind = ItemKind::from_str(type_name).map_err(|_| BridgeError::UnknownItemType {
        name: type_name.to_string(),
    })?;

    let coordinate = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                BridgeError::malformed(format!("item {} has no numeric \"{}\"", index, key))
            })
    };
    let x = coordinate("x")?;
    let y = coordinate("y")?;

    let id = match object.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => {
            return Err(BridgeError::malformed(format!(
                "item {} has an invalid id {}",
                index, other
            )))
        }
    };

    let (expected_w, expected_h) = kind.dimensions();
    let width = object.get("width").and_then(Value::as_f64);
    let height = object.get("height").and_then(Value::as_f64);
    let disagrees = |given: Option<f64>, expected: f64| {
        given.is_some_and(|v| (v - expected).abs() > DIMENSION_TOLERANCE)
    };
    if disagrees(width, expected_w) || disagrees(height, expected_h) {
        warn!(
            item = index,
            kind = kind.as_str(),
            width,
            height,
            "generated item size disagrees with its type, using {}x{}",
            expected_w,
            expected_h
        );
    }

    Ok(Draft { id, kind, x, y })
}

fn allocate_id(kind: ItemKind, start: usize, taken: &mut HashSet<String>) -> String {
    let mut n = start;
    loop {
        let candidate = format!("{}-{}", kind.as_str(), n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ItemId;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n[1]\n```\n"), "[1]");
        assert_eq!(strip_code_fence("  [1] "), "[1]");
    }

    #[test]
    fn test_plain_array() {
        let layout = parse_layout_response(
            r#"[{"id": "a", "type": "stage", "x": 10, "y": 20, "width": 144, "height": 72}]"#,
        )
        .unwrap();
        let item = layout.get(&ItemId::new("a")).unwrap();
        assert_eq!(item.kind(), ItemKind::Stage);
        assert_eq!((item.x, item.y), (10.0, 20.0));
    }

    #[test]
    fn test_fenced_object_with_items() {
        let text = "```json\n{\"items\": [{\"type\": \"dance-floor\", \"x\": 1, \"y\": 2}]}\n```";
        let layout = parse_layout_response(text).unwrap();
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.items()[0].id().as_str(), "dance-floor-1");
    }

    #[test]
    fn test_missing_ids_avoid_explicit_ones() {
        let layout = parse_layout_response(
            r#"[
                {"type": "round-table", "x": 0, "y": 0},
                {"id": "round-table-1", "type": "round-table", "x": 60, "y": 0}
            ]"#,
        )
        .unwrap();
        let ids: Vec<_> = layout.iter().map(|i| i.id().as_str().to_string()).collect();
        assert_eq!(ids, vec!["round-table-2", "round-table-1"]);
    }

    #[test]
    fn test_wrong_size_is_normalised() {
        let layout = parse_layout_response(
            r#"[{"id": "t", "type": "round-table", "x": 0, "y": 0, "width": 80, "height": 80}]"#,
        )
        .unwrap();
        assert_eq!(layout.items()[0].width(), 48.0);
    }

    #[test]
    fn test_unknown_type() {
        let err = parse_layout_response(r#"[{"type": "bar", "x": 0, "y": 0}]"#).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownItemType { name } if name == "bar"));
    }

    #[test]
    fn test_duplicate_id() {
        let err = parse_layout_response(
            r#"[{"id": "x", "type": "stage", "x": 0, "y": 0}, {"id": "x", "type": "stage", "x": 200, "y": 0}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::DuplicateId { id } if id == "x"));
    }

    #[test]
    fn test_not_json() {
        let err = parse_layout_response("Here is your layout!").unwrap_err();
        assert!(err.to_string().starts_with("malformed response: response is not JSON"));
    }

    #[test]
    fn test_missing_coordinate() {
        let err = parse_layout_response(r#"[{"type": "stage", "x": 0}]"#).unwrap_err();
        assert!(err.to_string().contains("\"y\""));
    }

    #[test]
    fn test_empty_list() {
        let err = parse_layout_response("[]").unwrap_err();
        assert!(matches!(err, BridgeError::Empty(_)));
        assert!(matches!(parse_layout_response("  ").unwrap_err(), BridgeError::Empty(_)));
    }

    #[test]
    fn test_wrong_shape() {
        let err = parse_layout_response(r#"{"layout": []}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Malformed(_)));
    }
}
