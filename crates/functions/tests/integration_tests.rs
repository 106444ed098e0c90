use hasad_functions::{FunctionOptions, FunctionsClient, FunctionsError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct TicketRequest {
    contact_id: i64,
    issue: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct TicketResponse {
    success: bool,
    ticket_id: String,
}

fn setup_client(server_uri: &str) -> FunctionsClient {
    FunctionsClient::new(server_uri, "fake-api-key", reqwest::Client::new())
}

#[tokio::test]
async fn test_invoke_json_success() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri()).with_auth("user-token");

    let request_body = TicketRequest {
        contact_id: 7,
        issue: "Delivery missed".to_string(),
    };
    let expected = TicketResponse {
        success: true,
        ticket_id: "TICKET-1-7".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/functions/v1/raise-support-ticket"))
        .and(header("apikey", "fake-api-key"))
        .and(header("Authorization", "Bearer user-token"))
        .and(header("x-request-source", "tests"))
        .and(body_json(&request_body))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&expected)
                .insert_header("x-function-version", "3"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .invoke::<TicketResponse, _>(
            "raise-support-ticket",
            Some(request_body),
            Some(FunctionOptions::default().with_header("x-request-source", "tests")),
        )
        .await
        .unwrap();

    assert_eq!(response.data, expected);
    assert_eq!(response.status, 200);
    assert_eq!(
        response.headers.get("x-function-version").map(String::as_str),
        Some("3")
    );
}

#[tokio::test]
async fn test_invoke_error_status_is_decoded() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/functions/v1/raise-support-ticket"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "DATABASE_ERROR",
            "message": "permission denied for table contacts"
        })))
        .mount(&server)
        .await;

    let result = client
        .invoke::<Value, Value>("raise-support-ticket", Some(json!({})), None)
        .await;

    match result {
        Err(FunctionsError::FunctionError {
            status, message, ..
        }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "permission denied for table contacts");
        }
        other => panic!("Expected FunctionError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invoke_without_body() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/functions/v1/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .invoke::<Value, Value>("ping", None, None)
        .await
        .unwrap();

    assert_eq!(response.data["ok"], true);
}
