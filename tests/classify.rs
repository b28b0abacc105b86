use sheet_linkcheck::record::StatusOutcome;

#[test]
fn numeric_codes_break_from_400() {
    for code in [100, 200, 204, 301, 302, 399] {
        assert!(!StatusOutcome::Code(code).is_broken(), "{code}");
    }
    for code in [400, 401, 403, 404, 410, 500, 503, 599] {
        assert!(StatusOutcome::Code(code).is_broken(), "{code}");
    }
}

#[test]
fn every_label_is_broken() {
    let labels = [
        StatusOutcome::ConnectionError,
        StatusOutcome::Timeout,
        StatusOutcome::RequestError("builder error".into()),
        StatusOutcome::Failed("invalid URL".into()),
    ];
    for outcome in labels {
        assert!(outcome.is_broken(), "{outcome}");
        assert_eq!(outcome.code(), None);
    }
}

#[test]
fn display_matches_console_labels() {
    assert_eq!(StatusOutcome::Code(404).to_string(), "404");
    assert_eq!(StatusOutcome::ConnectionError.to_string(), "Connection Error");
    assert_eq!(StatusOutcome::Timeout.to_string(), "Timeout");
    assert_eq!(
        StatusOutcome::RequestError("too many redirects".into()).to_string(),
        "Error: too many redirects"
    );
    assert_eq!(StatusOutcome::Failed("bad".into()).to_string(), "Error: bad");
}

#[test]
fn serializes_codes_as_numbers_and_labels_as_text() {
    let json = serde_json::to_value([StatusOutcome::Code(404), StatusOutcome::Timeout]).unwrap();
    assert_eq!(json, serde_json::json!([404, "Timeout"]));
}
