//! Serializer guarantees through the public API.

use base64::Engine as _;
use relevai::types::{ChatRequest, ChatResponse, EmbedResponse, Message};
use relevai::{Codec, Error, Serializer, SerializerKind};
use serde_json::json;

fn compiled_serializers() -> Vec<Serializer> {
    let mut out = vec![Serializer::json()];
    if let Ok(s) = Serializer::compressed(6) {
        out.push(s);
    }
    if let Ok(s) = Serializer::compact() {
        out.push(s);
    }
    out
}

#[test]
fn wire_types_round_trip_in_every_format() {
    let request = ChatRequest::new(
        "llama3.2",
        vec![
            Message::system("Be terse."),
            Message::user("Describe this").with_image_base64("aGVsbG8="),
        ],
    )
    .with_temperature(0.3)
    .json_mode();
    let chat: ChatResponse = serde_json::from_value(json!({
        "model": "llama3.2",
        "message": {"role": "assistant", "content": "{\"ok\":true}"},
        "done": true,
        "eval_count": 3
    }))
    .unwrap();
    let embed = EmbedResponse {
        model: "e".into(),
        embeddings: vec![vec![0.5, -0.5], vec![1.5, 2.5]],
        total_duration: None,
        load_duration: Some(7),
        prompt_eval_count: None,
    };

    for s in compiled_serializers() {
        assert_eq!(s.decode::<ChatRequest>(&s.encode(&request).unwrap()).unwrap(), request);
        assert_eq!(s.decode::<ChatResponse>(&s.encode(&chat).unwrap()).unwrap(), chat);
        assert_eq!(
            s.decode_text::<EmbedResponse>(&s.encode_text(&embed).unwrap()).unwrap(),
            embed,
            "{}",
            s.name()
        );
    }
}

#[test]
fn json_text_form_is_base64_of_the_json_bytes() {
    let value = json!({"key": "value"});
    let text = Serializer::json().encode_text(&value).unwrap();
    let bytes = base64::engine::general_purpose::STANDARD.decode(text).unwrap();
    assert_eq!(bytes, serde_json::to_vec(&value).unwrap());
    assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"key":"value"}"#);
}

#[test]
fn text_and_byte_forms_agree() {
    for s in compiled_serializers() {
        let value = json!({"n": 1, "list": [1, 2, 3]});
        let text = s.encode_text(&value).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD.decode(&text).unwrap();
        let back: serde_json::Value = s.decode(&bytes).unwrap();
        assert_eq!(back, value, "{}", s.name());
    }
}

#[test]
fn backend_selection_fails_fast_or_matches_kind() {
    for kind in [
        SerializerKind::Json,
        SerializerKind::Compressed,
        SerializerKind::Compact,
    ] {
        match Serializer::new(kind) {
            Ok(s) => assert_eq!(s.kind(), kind),
            Err(e) => {
                assert!(matches!(e, Error::Configuration { .. }));
                assert!(e.to_string().contains("unavailable"), "{e}");
            }
        }
    }
}

#[cfg(not(feature = "compressed"))]
#[test]
fn compressed_backend_missing_is_configuration_error() {
    assert!(matches!(
        Serializer::compressed(1),
        Err(Error::Configuration { .. })
    ));
}

#[test]
fn garbage_text_is_rejected() {
    for s in compiled_serializers() {
        let err = s.decode_text::<ChatResponse>("bm90IGEgcGF5bG9hZA==").unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }), "{}", s.name());
    }
}
