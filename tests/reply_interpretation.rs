// tests/reply_interpretation.rs

use llm_map_rs::interpreter::{
    interpret_model_reply, parse_strict, InterpretError, DEFAULT_EXPLANATION,
    EXTRACTED_EXPLANATION,
};

#[test]
fn well_formed_envelope_passes_through() {
    let result = interpret_model_reply(r#"{"code":"x","explanation":"y"}"#).expect("valid reply");
    assert_eq!(result.code, "x");
    assert_eq!(result.explanation, "y");
}

#[test]
fn missing_explanation_is_default_filled() {
    let result = interpret_model_reply(r#"{"code":"[]"}"#).expect("valid reply");
    assert_eq!(result.code, "[]");
    assert_eq!(result.explanation, DEFAULT_EXPLANATION);
}

#[test]
fn missing_code_without_fences_is_not_extractable() {
    let raw = r#"{"explanation":"y"}"#;
    let err = interpret_model_reply(raw).expect_err("no code anywhere");
    assert_eq!(
        err,
        InterpretError::NoExtractableCode {
            raw: raw.to_string()
        }
    );
    assert_eq!(err.raw(), raw);
}

#[test]
fn empty_code_field_is_treated_as_missing() {
    let err = parse_strict(r#"{"code":"","explanation":"y"}"#).expect_err("empty code");
    assert!(matches!(err, InterpretError::MissingCodeField { .. }));
}

#[test]
fn non_string_code_field_is_treated_as_missing() {
    let err = parse_strict(r#"{"code":42}"#).expect_err("numeric code");
    assert!(matches!(err, InterpretError::MissingCodeField { .. }));
}

#[test]
fn strict_parse_reports_malformed_json() {
    let err = parse_strict("not json at all").expect_err("malformed");
    assert!(matches!(err, InterpretError::MalformedJson { .. }));
}

#[test]
fn js_fence_is_mined_when_json_parse_fails() {
    let raw = "Here is code:\n```js\nmap.flyTo({center:[0,0]});\n```";
    let result = interpret_model_reply(raw).expect("fence extraction");
    assert_eq!(result.code, "map.flyTo({center:[0,0]});");
    assert_eq!(result.explanation, EXTRACTED_EXPLANATION);
}

#[test]
fn javascript_fence_outranks_unlabeled_fence() {
    let raw = "```\nsecond\n```\n```javascript\nfirst\n```";
    let result = interpret_model_reply(raw).expect("fence extraction");
    assert_eq!(result.code, "first");
}

#[test]
fn json_fence_payload_is_extracted_cleanly() {
    let raw = "Sure!\n```json\n[{\"op\":\"removeLayer\",\"id\":\"a\"}]\n```";
    let result = interpret_model_reply(raw).expect("fence extraction");
    assert_eq!(result.code, r#"[{"op":"removeLayer","id":"a"}]"#);
}

#[test]
fn fences_rescue_an_envelope_without_code() {
    let raw = "{\"explanation\":\"see below\"} ```js\nmap.setZoom(4);\n```";
    let result = interpret_model_reply(raw).expect("fence extraction");
    assert_eq!(result.code, "map.setZoom(4);");
    assert_eq!(result.explanation, EXTRACTED_EXPLANATION);
}

#[test]
fn plain_prose_is_not_extractable() {
    let raw = "not json and no fences";
    let err = interpret_model_reply(raw).expect_err("nothing to extract");
    assert!(matches!(err, InterpretError::NoExtractableCode { .. }));
    assert_eq!(err.raw(), raw);
}

#[test]
fn interpretation_is_deterministic() {
    let raw = "text ```js\na\n``` more ```js\nb\n```";
    let first = interpret_model_reply(raw).expect("extraction");
    let second = interpret_model_reply(raw).expect("extraction");
    assert_eq!(first, second);
    // Strict ordering: the first match wins, not the longest or latest.
    assert_eq!(first.code, "a");
}
