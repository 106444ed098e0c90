use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hasad::auth::{Identity, UserId, UserRole};
use hasad::i18n::{Catalog, Language, Translator};
use hasad::support::{ContactMethod, SupportDesk, SupportError};
use hasad::Hasad;

fn desk(server: &MockServer, language: Language) -> SupportDesk {
    let hasad = Hasad::new(&server.uri(), "anon-key").unwrap();
    let identity = Identity {
        user_id: UserId::new("user-1"),
        role: UserRole::Consumer,
        access_token: Some("user-token".to_string()),
    };
    hasad
        .support(&identity, Arc::new(Catalog::new(language)))
        .unwrap()
}

#[tokio::test]
async fn raises_a_ticket() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/raise-support-ticket"))
        .and(header("Authorization", "Bearer user-token"))
        .and(body_json(json!({
            "contact_id": 7,
            "issue": "Delivery missed",
            "contact_method": "phone",
            "user_id": "user-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Support ticket raised successfully",
            "ticket_id": "TICKET-1707904800000-7"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let desk = desk(&server, Language::En);
    let receipt = desk
        .raise_ticket(Some(7), "Delivery missed", ContactMethod::Phone)
        .await
        .unwrap();

    assert!(receipt.success);
    assert_eq!(receipt.ticket_id.as_deref(), Some("TICKET-1707904800000-7"));
    assert_eq!(desk.success_message(), "Ticket submitted successfully");
}

#[tokio::test]
async fn incomplete_ticket_is_not_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let desk = desk(&server, Language::En);

    let err = desk
        .raise_ticket(None, "Delivery missed", ContactMethod::Email)
        .await
        .unwrap_err();
    assert!(matches!(err, SupportError::Incomplete));

    let err = desk
        .raise_ticket(Some(7), "   ", ContactMethod::Email)
        .await
        .unwrap_err();
    assert_eq!(err.message_key(), "pleaseCompleteAllFields");
}

#[tokio::test]
async fn backend_message_stays_out_of_the_ui() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/raise-support-ticket"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "DATABASE_ERROR",
            "message": "permission denied for table contacts"
        })))
        .mount(&server)
        .await;

    let desk = desk(&server, Language::Ar);
    let err = desk
        .raise_ticket(Some(7), "Delivery missed", ContactMethod::Email)
        .await
        .unwrap_err();

    let catalog = Catalog::new(Language::Ar);
    let shown = err.localized(&catalog);
    assert_eq!(shown, catalog.translate("supportTicketError"));
    assert!(!shown.contains("permission denied"));
    assert!(matches!(err, SupportError::Submission(_)));
}
