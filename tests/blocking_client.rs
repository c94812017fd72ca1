//! Blocking client and token manager. Plain `#[test]`s: the blocking
//! transport must not run inside an async runtime.

use chrono::Utc;
use mockito::Server;
use relevai::auth::{BlockingTokenManager, Credential, Token};
use relevai::types::{ChatRequest, EmbedRequest, Message};
use relevai::{AuthError, BlockingAiLangClient, ClientConfig, Error};
use std::time::Duration;

const TOKEN_BODY: &str = r#"{"access_token":"tok-1","expires_in":3600}"#;

#[test]
fn chat_and_embed_share_one_token() {
    let mut server = Server::new();
    let auth = server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(TOKEN_BODY)
        .expect(1)
        .create();
    let chat = server
        .mock("POST", "/api/chat")
        .match_header("authorization", "Bearer tok-1")
        .with_status(200)
        .with_body(r#"{"model":"m","message":{"role":"assistant","content":"pong"},"done":true}"#)
        .create();
    let embed = server
        .mock("POST", "/api/embed")
        .match_header("authorization", "Bearer tok-1")
        .with_status(200)
        .with_body(r#"{"model":"e","embeddings":[[1.0,0.0]]}"#)
        .create();

    let client = BlockingAiLangClient::builder()
        .base_url(server.url())
        .credential(Credential::client_credentials(
            "svc",
            "s3cret",
            format!("{}/token", server.url()),
        ))
        .build_blocking()
        .unwrap();

    let reply = client
        .chat(&ChatRequest::new("m", vec![Message::user("ping")]))
        .unwrap();
    assert_eq!(reply.content(), "pong");

    let vectors = client.embed(&EmbedRequest::single("e", "x")).unwrap();
    assert_eq!(vectors.embeddings, vec![vec![1.0f32, 0.0]]);

    auth.assert();
    chat.assert();
    embed.assert();
}

#[test]
fn unauthorized_chat_is_request_error() {
    let mut server = Server::new();
    let _auth = server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(TOKEN_BODY)
        .create();
    let _chat = server
        .mock("POST", "/api/chat")
        .with_status(401)
        .with_body("unauthorized")
        .create();

    let client = BlockingAiLangClient::builder()
        .base_url(server.url())
        .credential(Credential::api_key(
            "rt-123",
            "app",
            format!("{}/token", server.url()),
        ))
        .build_blocking()
        .unwrap();

    let err = client
        .chat(&ChatRequest::new("m", vec![Message::user("ping")]))
        .unwrap_err();
    assert!(matches!(err, Error::Request { status: 401, .. }));
}

#[test]
fn expired_token_refreshes_once() {
    let mut server = Server::new();
    let auth = server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(TOKEN_BODY)
        .expect(1)
        .create();

    let tokens = BlockingTokenManager::with_http_client(
        Credential::api_key("rt-123", "app", format!("{}/token", server.url())),
        reqwest::blocking::Client::new(),
        Duration::from_secs(30),
    )
    .with_token(Token::new("stale", Utc::now() - chrono::Duration::seconds(1)));

    assert_eq!(tokens.get_token().unwrap(), "tok-1");
    assert_eq!(tokens.get_token().unwrap(), "tok-1");
    let token = tokens.current().unwrap();
    assert!(token.expires_at() - Utc::now() >= chrono::Duration::seconds(30));
    auth.assert();
}

#[test]
fn rejected_credentials_are_authentication_errors() {
    let mut server = Server::new();
    let _auth = server
        .mock("POST", "/token")
        .with_status(403)
        .with_body("forbidden")
        .create();

    let tokens = BlockingTokenManager::with_http_client(
        Credential::client_credentials("svc", "wrong", format!("{}/token", server.url())),
        reqwest::blocking::Client::new(),
        Duration::from_secs(30),
    );
    let err = tokens.get_token().unwrap_err();
    assert!(matches!(
        err,
        Error::Authentication(AuthError::Rejected { status: 403, .. })
    ));
}

#[test]
fn manager_from_config_uses_configured_transport_and_margin() {
    let mut server = Server::new();
    let auth = server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(TOKEN_BODY)
        .expect(1)
        .create();

    let config = ClientConfig {
        timeout: Duration::from_secs(5),
        safety_margin: Duration::from_secs(90),
        ..ClientConfig::default()
    };
    let credential = Credential::api_key("rt-123", "app", format!("{}/token", server.url()));
    let manager = BlockingTokenManager::from_config(credential.clone(), &config).unwrap();
    assert_eq!(manager.safety_margin(), Duration::from_secs(90));
    assert_eq!(manager.get_token().unwrap(), "tok-1");
    auth.assert();

    let with_bad_proxy = ClientConfig {
        proxy: Some("http://[::1".into()),
        ..config
    };
    let err = match BlockingTokenManager::from_config(credential, &with_bad_proxy) {
        Ok(_) => panic!("invalid proxy must be reported"),
        Err(e) => e,
    };
    assert!(matches!(err, Error::Configuration { .. }));
}
