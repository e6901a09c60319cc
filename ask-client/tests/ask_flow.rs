//! Ask flow against a mocked answer service.

use ask_client::page::{ask_ai, AreaContent, MemoryArea, Page, ResponseArea};
use ask_client::render::{CONNECTIVITY_MESSAGE, NO_ANSWER_MESSAGE, TIMEOUT_MESSAGE};
use ask_client::{AskClient, AskError};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, timeout: Duration) -> AskClient {
    AskClient::new(format!("{}/ask", server.uri()), timeout)
}

fn page_with_area() -> (Page, Arc<MemoryArea>) {
    let area = Arc::new(MemoryArea::new());
    let mut page = Page::new();
    page.add_tab("dossier2", Some(area.clone() as Arc<dyn ResponseArea>));
    page.activate("dossier2");
    (page, area)
}

#[tokio::test]
async fn answer_is_rendered_after_thinking_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_json(json!({ "question": "Fréquence de visite pour un soudeur ?" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "response": "Tous les 6 mois selon la Loi 02-04." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (page, area) = page_with_area();
    let client = client_for(&server, Duration::from_secs(5));

    ask_ai(&page, &client, "Fréquence de visite pour un soudeur ?").await;

    let history = area.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], AreaContent::Thinking);
    match &history[1] {
        AreaContent::Answer { text, html } => {
            assert_eq!(text, "Tous les 6 mois selon la Loi 02-04.");
            assert!(html.contains("Tous les 6 mois selon la Loi 02-04.</div>"));
            assert!(html.contains("copyToClipboard(this, `Tous les 6 mois"));
        }
        other => panic!("expected an answer, got {other:?}"),
    }
}

#[tokio::test]
async fn legacy_answer_field_and_missing_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "Oui." })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    assert_eq!(client.ask("CHS ?").await.unwrap().as_deref(), Some("Oui."));

    let (page, area) = page_with_area();
    ask_ai(&page, &client, "CHS ?").await;

    match area.current() {
        Some(AreaContent::Answer { text, .. }) => assert_eq!(text, NO_ANSWER_MESSAGE),
        other => panic!("expected fallback answer, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "response": "trop tard" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_millis(200));
    let err = client.ask("Loi 88-07 ?").await.unwrap_err();
    assert!(matches!(err, AskError::Timeout(_)));

    let (page, area) = page_with_area();
    ask_ai(&page, &client, "Loi 88-07 ?").await;
    assert_eq!(
        area.current(),
        Some(AreaContent::Error(TIMEOUT_MESSAGE.to_string()))
    );
}

#[tokio::test]
async fn unreachable_service_is_a_connectivity_error() {
    let server = MockServer::start().await;
    let client = client_for(&server, Duration::from_secs(5));
    drop(server);

    let err = client.ask("CHS ?").await.unwrap_err();
    assert!(matches!(err, AskError::Transport(_)));

    let (page, area) = page_with_area();
    ask_ai(&page, &client, "CHS ?").await;
    assert_eq!(
        area.current(),
        Some(AreaContent::Error(CONNECTIVITY_MESSAGE.to_string()))
    );
}

#[tokio::test]
async fn error_body_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Le champ 'question' est requis et doit être une chaîne non vide."
        })))
        .mount(&server)
        .await;

    let (page, area) = page_with_area();
    ask_ai(&page, &client_for(&server, Duration::from_secs(5)), " ").await;

    assert_eq!(
        area.current(),
        Some(AreaContent::Error(
            "❌ Erreur : Le champ 'question' est requis et doit être une chaîne non vide."
                .to_string()
        ))
    );
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let (page, area) = page_with_area();
    ask_ai(&page, &client_for(&server, Duration::from_secs(5)), "CHS ?").await;

    assert_eq!(
        area.current(),
        Some(AreaContent::Error(
            "❌ Erreur : Échec de la requête (HTTP 502).".to_string()
        ))
    );
}

#[tokio::test]
async fn no_active_area_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let area = Arc::new(MemoryArea::new());
    let mut page = Page::new();
    page.add_tab("dossier1", Some(area.clone() as Arc<dyn ResponseArea>));

    ask_ai(&page, &client_for(&server, Duration::from_secs(5)), "CHS ?").await;

    assert!(area.history().is_empty());
}
