use propoto_core::GenerateRequest;
use propoto_engine::{AgentClient, AgentFailure, AgentSettings, ReqwestAgentClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestAgentClient {
    ReqwestAgentClient::new(AgentSettings {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        ..AgentSettings::default()
    })
}

fn request() -> GenerateRequest {
    GenerateRequest {
        prospect_name: "Acme".to_string(),
        prospect_url: "acme.com".to_string(),
        pain_points: "low conversion".to_string(),
        model: Some("grok".to_string()),
        template: None,
        deep_scrape: None,
    }
}

#[tokio::test]
async fn generate_posts_the_request_and_decodes_the_proposal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/agents/proposal/generate"))
        .and(header("x-api-key", "test-key"))
        .and(body_partial_json(json!({
            "prospect_name": "Acme",
            "prospect_url": "acme.com",
            "pain_points": "low conversion",
            "model": "grok",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "executive_summary": "We can help.",
                "current_situation": "Flat growth.",
                "proposed_strategy": "Funnel rebuild.",
                "why_us": "Track record.",
                "investment": [
                    { "name": "Growth", "price": "$4,500/mo", "features": ["Weekly sprints"] }
                ],
                "next_steps": "Kickoff call.",
            },
            "pdf_url": "https://files.example/acme.pdf",
            "model_used": "grok",
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .generate(&request())
        .await
        .expect("generate ok");

    assert!(response.success);
    assert_eq!(response.data.executive_summary, "We can help.");
    assert_eq!(response.data.investment.len(), 1);
    assert_eq!(response.data.investment[0].features, vec!["Weekly sprints"]);
    assert_eq!(response.pdf_url.as_deref(), Some("https://files.example/acme.pdf"));
    assert_eq!(response.presentation_url, None);
}

#[tokio::test]
async fn generate_surfaces_the_service_error_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/agents/proposal/generate"))
        .respond_with(
            ResponseTemplate::new(502)
                .set_body_raw(r#"{"detail":"scrape failed"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate(&request())
        .await
        .expect_err("generate should fail");

    assert_eq!(err.kind, AgentFailure::HttpStatus(502));
    assert_eq!(err.message, "scrape failed");
}

#[tokio::test]
async fn generate_treats_an_unsuccessful_body_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/agents/proposal/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": false, "data": {} })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate(&request())
        .await
        .expect_err("generate should fail");

    assert_eq!(err.kind, AgentFailure::Rejected);
}

#[tokio::test]
async fn catalogs_decode_models_and_templates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/agents/proposal/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                { "key": "grok", "name": "Grok" },
                { "key": "claude", "name": "Claude" }
            ],
            "default": "grok",
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/agents/proposal/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "templates": [{
                "key": "consultative",
                "name": "Consultative",
                "description": "Problem-first narrative",
                "tone": "measured",
            }],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let models = client.models().await.expect("models ok");
    assert_eq!(models.default_model, "grok");
    assert_eq!(models.models.len(), 2);

    let templates = client.templates().await.expect("templates ok");
    assert_eq!(templates.templates[0].tone, "measured");
}

#[tokio::test]
async fn catalog_http_errors_map_to_status_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/agents/proposal/models"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).models().await.expect_err("should fail");
    assert_eq!(err.kind, AgentFailure::HttpStatus(404));
}
