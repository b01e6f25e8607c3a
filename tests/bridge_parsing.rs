//! Generated-layout validation, from a raw service response down to a layout

use pretty_assertions::assert_eq;
use venue_designer::bridge::gemini::{parse_image_response, parse_text_response};
use venue_designer::bridge::parse_layout_response;
use venue_designer::{BridgeError, ItemKind};

fn wrap_text(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[test]
fn fenced_layout_from_a_full_response() {
    let body = wrap_text(
        "```json\n[\n  {\"id\": \"stage\", \"type\": \"stage\", \"x\": 328, \"y\": 36, \"width\": 144, \"height\": 72},\n  {\"type\": \"round-table\", \"x\": 36, \"y\": 36},\n  {\"type\": \"round-table\", \"x\": 120, \"y\": 36}\n]\n```",
    );
    let text = parse_text_response(&body).unwrap();
    let layout = parse_layout_response(&text).unwrap();

    let ids: Vec<_> = layout.iter().map(|i| i.id().as_str().to_string()).collect();
    assert_eq!(ids, vec!["stage", "round-table-2", "round-table-3"]);
    assert_eq!(layout.count(ItemKind::RoundTable), 2);
}

#[test]
fn object_with_items_key() {
    let layout = parse_layout_response(
        r#"{"items": [{"id": 7, "type": "dance-floor", "x": 10.5, "y": 20}]}"#,
    )
    .unwrap();
    let floor = layout.get(&"7".into()).unwrap();
    assert_eq!((floor.x, floor.y), (10.5, 20.0));
    assert_eq!((floor.width(), floor.height()), (120.0, 120.0));
}

#[test]
fn wrong_sizes_are_normalised() {
    let layout = parse_layout_response(
        r#"[{"id": "t", "type": "rect-table", "x": 0, "y": 0, "width": 100, "height": 10}]"#,
    )
    .unwrap();
    let table = layout.get(&"t".into()).unwrap();
    assert_eq!((table.width(), table.height()), (24.0, 72.0));
}

#[test]
fn allocated_ids_skip_explicit_ones() {
    let layout = parse_layout_response(
        r#"[{"type": "stage", "x": 0, "y": 0}, {"id": "stage-1", "type": "stage", "x": 200, "y": 0}]"#,
    )
    .unwrap();
    let ids: Vec<_> = layout.iter().map(|i| i.id().as_str().to_string()).collect();
    assert_eq!(ids, vec!["stage-2", "stage-1"]);
}

#[test]
fn failures_are_distinct() {
    let unknown = parse_layout_response(r#"[{"type": "bar", "x": 0, "y": 0}]"#).unwrap_err();
    assert!(matches!(unknown, BridgeError::UnknownItemType { ref name } if name == "bar"));

    let duplicate = parse_layout_response(
        r#"[{"id": "a", "type": "stage", "x": 0, "y": 0}, {"id": "a", "type": "stage", "x": 9, "y": 9}]"#,
    )
    .unwrap_err();
    assert!(matches!(duplicate, BridgeError::DuplicateId { ref id } if id == "a"));

    let prose = parse_layout_response("Here is your layout!").unwrap_err();
    assert!(prose.to_string().starts_with("malformed response: response is not JSON"));

    let missing = parse_layout_response(r#"[{"type": "stage", "x": 0}]"#).unwrap_err();
    assert!(matches!(missing, BridgeError::Malformed(_)));

    assert!(matches!(parse_layout_response("[]"), Err(BridgeError::Empty(_))));
    assert!(matches!(parse_layout_response("  "), Err(BridgeError::Empty(_))));
}

#[test]
fn invalid_layouts_read_well_in_a_toast() {
    let err = parse_layout_response(r#"[{"type": "bar", "x": 0, "y": 0}]"#).unwrap_err();
    assert_eq!(
        err.user_message(),
        "The AI returned an invalid layout: unknown item type 'bar' in generated layout"
    );
}

#[test]
fn blocked_prompt_is_a_safety_rejection() {
    let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
    let err = parse_text_response(body).unwrap_err();
    assert!(matches!(err, BridgeError::SafetyRejected { ref reason } if reason == "SAFETY"));
    assert!(!err.retryable());
}

#[test]
fn image_response_becomes_a_data_url() {
    let body = serde_json::json!({
        "candidates": [{
            "content": { "parts": [
                { "text": "Here you go" },
                { "inlineData": { "mimeType": "image/png", "data": "iVBORw==" } }
            ]}
        }]
    })
    .to_string();
    assert_eq!(
        parse_image_response(&body).unwrap(),
        "data:image/png;base64,iVBORw=="
    );

    let refused = r#"{"candidates": [{"finishReason": "IMAGE_SAFETY"}]}"#;
    assert!(matches!(
        parse_image_response(refused),
        Err(BridgeError::SafetyRejected { .. })
    ));
}
