//! Integration tests for the RelayClient using mockito for HTTP mocking.

use formrelay::{RelayClient, RelayError, RelayTransport, SubmissionPayload};
use mockito::{Matcher, Server};

fn payload() -> SubmissionPayload {
    SubmissionPayload {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        message: "hello".to_string(),
        subject: "New Contact Form Submission from Portfolio".to_string(),
        access_key: "test-access-key".to_string(),
    }
}

#[test]
fn test_submit_success() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "Ada".into()),
            Matcher::UrlEncoded("email".into(), "ada@example.com".into()),
            Matcher::UrlEncoded("message".into(), "hello".into()),
            Matcher::UrlEncoded("access_key".into(), "test-access-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "message": "Email sent"}"#)
        .create();

    let client = RelayClient::with_endpoint(server.url());
    let receipt = client.submit(&payload()).unwrap();

    mock.assert();
    assert_eq!(receipt.message.as_deref(), Some("Email sent"));
}

#[test]
fn test_submit_sends_hidden_fields() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("botcheck".into(), "".into()),
            Matcher::UrlEncoded(
                "subject".into(),
                "New Contact Form Submission from Portfolio".into(),
            ),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true}"#)
        .create();

    let client = RelayClient::with_endpoint(server.url());
    let result = client.submit(&payload());

    mock.assert();
    assert!(result.is_ok());
}

#[test]
fn test_submit_body_level_failure() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": false, "message": "Access key is invalid"}"#)
        .create();

    let client = RelayClient::with_endpoint(server.url());
    let result = client.submit(&payload());

    mock.assert();
    match result {
        Err(RelayError::Rejected { status, message }) => {
            assert_eq!(status, 200);
            assert_eq!(message, "Access key is invalid");
        }
        other => panic!("expected Rejected error, got {:?}", other),
    }
}

#[test]
fn test_submit_rate_limited() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/")
        .with_status(429)
        .with_body(r#"{"success": false, "message": "Too many requests"}"#)
        .create();

    let client = RelayClient::with_endpoint(server.url());
    let result = client.submit(&payload());

    mock.assert();
    assert!(matches!(result, Err(RelayError::RateLimited)));
}

#[test]
fn test_submit_server_error() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/")
        .with_status(503)
        .with_body("Service unavailable")
        .create();

    let client = RelayClient::with_endpoint(server.url());
    let result = client.submit(&payload());

    mock.assert();
    match result {
        Err(RelayError::ServerError { status, message }) => {
            assert_eq!(status, 503);
            assert!(message.contains("Service unavailable"));
        }
        other => panic!("expected ServerError, got {:?}", other),
    }
}

#[test]
fn test_submit_client_error_carries_relay_message() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/")
        .with_status(422)
        .with_body(r#"{"success": false, "message": "Email address is malformed"}"#)
        .create();

    let client = RelayClient::with_endpoint(server.url());
    let result = client.submit(&payload());

    mock.assert();
    match result {
        Err(RelayError::Rejected { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "Email address is malformed");
        }
        other => panic!("expected Rejected error, got {:?}", other),
    }
}

#[test]
fn test_submit_non_json_response_is_invalid() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body("<html>gateway splash page</html>")
        .create();

    let client = RelayClient::with_endpoint(server.url());
    let result = client.submit(&payload());

    mock.assert();
    assert!(matches!(result, Err(RelayError::InvalidResponse(_))));
}
