use propoto_core::{NewProposal, ProposalContent, ProposalId, ProposalStatus};
use propoto_engine::{HttpProposalStore, ProposalStore, StoreError, StoreSettings};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> HttpProposalStore {
    HttpProposalStore::new(StoreSettings::new(server.uri()))
}

#[tokio::test]
async fn list_queries_the_org_and_decodes_records() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .and(body_partial_json(json!({
            "path": "proposals:list",
            "args": { "orgId": "demo-org-1" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "value": [{
                "_id": "p1",
                "prospectName": "Acme",
                "prospectUrl": "acme.com",
                "painPoints": "low conversion",
                "content": { "executive_summary": "We can help." },
                "pdfUrl": "https://files.example/acme.pdf",
                "status": "sent",
                "orgId": "demo-org-1",
                "createdAt": 1_700_000_000_000u64,
                "updatedAt": 1_700_000_005_000u64,
                "views": 3,
            }],
        })))
        .mount(&server)
        .await;

    let records = store_for(&server).list("demo-org-1").await.expect("list ok");

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, ProposalId::from("p1"));
    assert_eq!(record.status, ProposalStatus::Sent);
    assert_eq!(record.content.executive_summary, "We can help.");
    assert_eq!(record.views, 3);
    assert_eq!(record.pptx_url, None);
}

#[tokio::test]
async fn create_sends_camel_case_fields_and_returns_the_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mutation"))
        .and(body_partial_json(json!({
            "path": "proposals:create",
            "args": {
                "prospectName": "Acme",
                "prospectUrl": "acme.com",
                "painPoints": "low conversion",
                "orgId": "demo-org-1",
                "status": "draft",
            },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "value": { "id": "prop_42" },
        })))
        .mount(&server)
        .await;

    let id = store_for(&server)
        .create(
            "demo-org-1",
            &NewProposal {
                prospect_name: "Acme".to_string(),
                prospect_url: "acme.com".to_string(),
                pain_points: "low conversion".to_string(),
                content: ProposalContent::default(),
                presentation_url: None,
                pdf_url: None,
                pptx_url: None,
            },
        )
        .await
        .expect("create ok");

    assert_eq!(id, ProposalId::from("prop_42"));
}

#[tokio::test]
async fn a_function_error_envelope_is_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mutation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "errorMessage": "Proposal not found",
        })))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .update_status("demo-org-1", &ProposalId::from("ghost"), ProposalStatus::Sent)
        .await
        .expect_err("should be rejected");

    match err {
        StoreError::Rejected { path, message } => {
            assert_eq!(path, "proposals:updateStatus");
            assert_eq!(message, "Proposal not found");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_level_failures_map_to_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .list("demo-org-1")
        .await
        .expect_err("should fail");

    match err {
        StoreError::Http { status, .. } => assert_eq!(status, 503),
        other => panic!("expected http error, got {other:?}"),
    }
}
