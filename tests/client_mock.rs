//! Async AI Lang client against mocked auth and API endpoints.

use mockito::{Matcher, Mock, Server, ServerGuard};
use relevai::types::{ChatRequest, EmbedRequest, Message, MessageRole};
use relevai::{AiLangClient, AuthError, Credential, Error};

const TOKEN_BODY: &str = r#"{"access_token":"tok-1","expires_in":3600,"token_type":"Bearer"}"#;
const CHAT_REPLY: &str = r#"{
    "model": "llama3.2",
    "created_at": "2025-06-01T12:00:00Z",
    "message": {"role": "assistant", "content": "Rayleigh scattering."},
    "done": true,
    "done_reason": "stop",
    "eval_count": 4
}"#;

async fn mock_token(server: &mut ServerGuard, hits: usize) -> Mock {
    server
        .mock("POST", "/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TOKEN_BODY)
        .expect(hits)
        .create_async()
        .await
}

fn client_for(server: &ServerGuard) -> AiLangClient {
    AiLangClient::builder()
        .base_url(server.url())
        .credential(Credential::api_key(
            "rt-123",
            "app",
            format!("{}/token", server.url()),
        ))
        .build()
        .unwrap()
}

#[tokio::test]
async fn chat_sends_bearer_token_and_json_body() {
    let mut server = Server::new_async().await;
    let auth = mock_token(&mut server, 1).await;
    let chat = server
        .mock("POST", "/api/chat")
        .match_header("authorization", "Bearer tok-1")
        .match_header("content-type", "application/json")
        .match_header("x-relevai-request-id", Matcher::Regex("^[0-9a-f-]{36}$".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "llama3.2",
            "stream": false,
            "messages": [{"role": "user", "content": "Why is the sky blue?"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(CHAT_REPLY)
        .create_async()
        .await;

    let client = client_for(&server);
    let request = ChatRequest::new("llama3.2", vec![Message::user("Why is the sky blue?")]);
    let reply = client.chat(&request).await.unwrap();

    assert_eq!(reply.message.role, MessageRole::Assistant);
    assert_eq!(reply.content(), "Rayleigh scattering.");
    assert!(reply.done);
    chat.assert_async().await;
    auth.assert_async().await;
}

#[tokio::test]
async fn token_is_cached_across_calls() {
    let mut server = Server::new_async().await;
    let auth = mock_token(&mut server, 1).await;
    let embed = server
        .mock("POST", "/api/embed")
        .match_header("authorization", "Bearer tok-1")
        .with_status(200)
        .with_body(r#"{"model":"nomic-embed-text","embeddings":[[0.1,0.2],[0.3,0.4]]}"#)
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    let request = EmbedRequest::batch("nomic-embed-text", vec!["a".into(), "b".into()]);
    for _ in 0..2 {
        let reply = client.embed(&request).await.unwrap();
        assert_eq!(reply.embeddings.len(), 2);
        assert_eq!(reply.dimensions(), Some(2));
    }
    embed.assert_async().await;
    auth.assert_async().await;
}

#[tokio::test]
async fn unauthorized_chat_is_request_error_with_status() {
    let mut server = Server::new_async().await;
    let _auth = mock_token(&mut server, 1).await;
    let _chat = server
        .mock("POST", "/api/chat")
        .with_status(401)
        .with_body(r#"{"error":"token expired"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .chat(&ChatRequest::new("llama3.2", vec![Message::user("hi")]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    match err {
        Error::Request { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("token expired"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn auth_failure_propagates_without_calling_the_api() {
    let mut server = Server::new_async().await;
    let _auth = server
        .mock("POST", "/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_client"}"#)
        .create_async()
        .await;
    let chat = server
        .mock("POST", "/api/chat")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .chat(&ChatRequest::new("llama3.2", vec![Message::user("hi")]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Authentication(AuthError::Rejected { status: 400, .. })
    ));
    chat.assert_async().await;
}

#[tokio::test]
async fn anonymous_client_sends_no_authorization() {
    let mut server = Server::new_async().await;
    let chat = server
        .mock("POST", "/api/chat")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(CHAT_REPLY)
        .create_async()
        .await;

    let client = AiLangClient::builder()
        .base_url(server.url())
        .build()
        .unwrap();
    let reply = client
        .chat(&ChatRequest::new("llama3.2", vec![Message::user("hi")]))
        .await
        .unwrap();

    assert_eq!(reply.model, "llama3.2");
    chat.assert_async().await;
}

#[tokio::test]
async fn undecodable_reply_is_serialization_error() {
    let mut server = Server::new_async().await;
    let _auth = mock_token(&mut server, 1).await;
    let _embed = server
        .mock("POST", "/api/embed")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .embed(&EmbedRequest::single("nomic-embed-text", "hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Serialization { .. }));
}

#[cfg(feature = "compact")]
#[tokio::test]
async fn compact_serializer_round_trips_through_the_api() {
    use relevai::types::EmbedResponse;
    use relevai::{Codec, Serializer};

    let serializer = Serializer::compact().unwrap();
    let reply = EmbedResponse {
        model: "nomic-embed-text".into(),
        embeddings: vec![vec![0.25, 0.5, 0.75]],
        total_duration: Some(1000),
        load_duration: None,
        prompt_eval_count: Some(1),
    };
    let request = EmbedRequest::single("nomic-embed-text", "hello");

    let mut server = Server::new_async().await;
    let _auth = mock_token(&mut server, 1).await;
    let embed = server
        .mock("POST", "/api/embed")
        .match_header("content-type", "application/msgpack")
        .match_header("accept", "application/msgpack")
        .with_status(200)
        .with_header("content-type", "application/msgpack")
        .with_body(serializer.encode(&reply).unwrap())
        .create_async()
        .await;

    let client = AiLangClient::builder()
        .base_url(server.url())
        .credential(Credential::api_key(
            "rt-123",
            "app",
            format!("{}/token", server.url()),
        ))
        .serializer(serializer)
        .build()
        .unwrap();

    assert_eq!(client.embed(&request).await.unwrap(), reply);
    embed.assert_async().await;
}
