use super::*;

#[derive(Debug, Deserialize, PartialEq)]
struct EndpointSettings {
    url: String,
    secret: String,
    id: String,
}

fn properties(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_decode_is_identity_on_values() {
    let props = properties(&[("url", "a"), ("secret", "b"), ("id", "c")]);
    let settings: EndpointSettings = decode_properties(&props).unwrap();
    assert_eq!(settings.url, "a");
    assert_eq!(settings.secret, "b");
    assert_eq!(settings.id, "c");
}

#[test]
fn test_decode_does_not_trim_values() {
    let props = properties(&[("url", "  https://example.com "), ("secret", ""), ("id", "X")]);
    let settings: EndpointSettings = decode_properties(&props).unwrap();
    assert_eq!(settings.url, "  https://example.com ");
    assert_eq!(settings.secret, "");
    assert_eq!(settings.id, "X");
}

#[test]
fn test_decode_missing_required_key_fails() {
    let props = properties(&[("url", "a"), ("id", "c")]);
    let result: Result<EndpointSettings, _> = decode_properties(&props);
    match result {
        Err(BindingError::Metadata(message)) => assert!(message.contains("secret")),
        other => panic!("expected metadata error, got {other:?}"),
    }
}

#[test]
fn test_decode_ignores_unknown_keys() {
    let props = properties(&[
        ("url", "a"),
        ("secret", "b"),
        ("id", "c"),
        ("extra", "ignored"),
    ]);
    let settings: EndpointSettings = decode_properties(&props).unwrap();
    assert_eq!(settings.url, "a");
}

#[test]
fn test_metadata_builder() {
    let metadata = Metadata::new("dingtalk")
        .with_property("url", "https://example.com")
        .with_property("secret", "s");
    assert_eq!(metadata.name, "dingtalk");
    assert_eq!(metadata.properties.len(), 2);
    assert_eq!(
        metadata.properties.get("url").map(String::as_str),
        Some("https://example.com")
    );
}

#[test]
fn test_metadata_deserialization_defaults_properties() {
    let metadata: Metadata = serde_json::from_str(r#"{"name":"test"}"#).unwrap();
    assert_eq!(metadata.name, "test");
    assert!(metadata.properties.is_empty());
}
