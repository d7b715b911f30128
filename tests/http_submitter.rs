//! HttpSubmitter against a local endpoint.
//!
//! Run with: cargo test --test http_submitter

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;
use url::Url;

use lead_wizard::events::MemorySink;
use lead_wizard::submission::HttpSubmitter;
use lead_wizard::{
    FieldKey, FormType, LeadSubmitter, Locale, SubmissionError, SubmitOutcome, WizardConfig,
    WizardEngine,
};

#[derive(Clone)]
struct Endpoint {
    status: StatusCode,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
}

async fn capture(
    State(endpoint): State<Endpoint>,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    endpoint.received.lock().unwrap().push(body);
    endpoint.status
}

/// Serve `/api/leads` on an ephemeral port; returns the URL and the captured bodies.
async fn serve(status: StatusCode) -> (Url, Arc<Mutex<Vec<serde_json::Value>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/api/leads", post(capture))
        .with_state(Endpoint {
            status,
            received: received.clone(),
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let url = Url::parse(&format!("http://{}/api/leads", addr)).unwrap();
    (url, received)
}

fn config_for(url: Url) -> WizardConfig {
    WizardConfig {
        submit_url: Some(url),
        submit_timeout: Duration::from_secs(5),
        default_locale: Locale::En,
        ..WizardConfig::default()
    }
}

#[tokio::test]
async fn test_inquiry_posted_as_json() {
    let (url, received) = serve(StatusCode::CREATED).await;
    let engine = WizardEngine::with_http(&config_for(url), Arc::new(MemorySink::new())).unwrap();

    let mut wizard = engine.start(FormType::Inquiry);
    wizard.edit_field(FieldKey::FullName, "Sara Khalid");
    wizard.edit_field(FieldKey::Phone, " 0551234567 ");
    wizard.edit_field(FieldKey::Email, "sara@example.com");
    wizard.edit_field(FieldKey::FinancingType, "auto");
    wizard.edit_field(FieldKey::Message, "What documents do I need?");
    wizard.edit_field(FieldKey::ConsentPdpl, true);

    let SubmitOutcome::Succeeded(reference) = wizard.submit().await else {
        panic!("expected success");
    };

    let bodies = received.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["referenceNumber"], reference.as_str());
    assert_eq!(body["formType"], "inquiry");
    assert_eq!(body["fullName"], "Sara Khalid");
    assert_eq!(body["financingType"], "auto");
    assert_eq!(body["consentPDPL"], true);
}

#[tokio::test]
async fn test_server_error_fails_submission() {
    let (url, received) = serve(StatusCode::INTERNAL_SERVER_ERROR).await;
    let engine = WizardEngine::with_http(&config_for(url), Arc::new(MemorySink::new())).unwrap();

    let mut wizard = engine.start(FormType::Contact);
    wizard.edit_field(FieldKey::FullName, "Sara Khalid");
    wizard.edit_field(FieldKey::Phone, "0551234567");
    wizard.edit_field(FieldKey::Email, "sara@example.com");
    wizard.edit_field(FieldKey::Subject, "Branch hours");
    wizard.edit_field(FieldKey::Message, "When is the Riyadh branch open?");
    wizard.edit_field(FieldKey::ConsentPdpl, true);

    assert!(matches!(wizard.submit().await, SubmitOutcome::Failed(_)));
    assert_eq!(received.lock().unwrap().len(), 1);
    assert_eq!(
        wizard.state().record().text(FieldKey::Subject),
        Some("Branch hours")
    );
}

#[tokio::test]
async fn test_rejection_reports_status() {
    let (url, _received) = serve(StatusCode::UNPROCESSABLE_ENTITY).await;
    let submitter = HttpSubmitter::new(url, Duration::from_secs(5)).unwrap();

    let payload = lead_wizard::SubmissionPayload {
        fields: [(FieldKey::FullName, "Sara Khalid")].into_iter().collect(),
        reference_number: lead_wizard::ReferenceNumber::generate(FormType::Contact),
        form_type: FormType::Contact,
    };

    let err = submitter.submit(&payload).await.unwrap_err();
    assert!(matches!(err, SubmissionError::Rejected { status: 422 }));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{}/api/leads", addr)).unwrap();
    let submitter = HttpSubmitter::new(url, Duration::from_secs(2)).unwrap();
    let payload = lead_wizard::SubmissionPayload {
        fields: Default::default(),
        reference_number: lead_wizard::ReferenceNumber::generate(FormType::Inquiry),
        form_type: FormType::Inquiry,
    };

    let err = submitter.submit(&payload).await.unwrap_err();
    assert!(matches!(err, SubmissionError::Transport(_)));
}

#[test]
fn test_http_engine_requires_url() {
    let Err(err) = WizardEngine::with_http(&WizardConfig::default(), Arc::new(MemorySink::new()))
    else {
        panic!("engine built without a submission URL");
    };
    assert!(matches!(
        err,
        lead_wizard::ConfigError::InvalidEnv { var: "LEAD_SUBMIT_URL", .. }
    ));
}
