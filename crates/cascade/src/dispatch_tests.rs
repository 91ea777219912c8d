//! End-to-end tests through the dispatcher, with canned classification
//! and generation responses.

use std::sync::Arc;

use serde_json::json;

use crate::config::Config;
use crate::context::RequestContext;
use crate::dispatch::Assistant;
use crate::events::StatusEmitter;
use crate::llm::GenerationError;
use crate::mcp::ToolClient;
use crate::test_support::{MockGeneration, MockTransport};

fn test_config() -> Config {
    Config {
        mcp_server_url: "http://127.0.0.1:1/mcp".to_string(),
        mcp_api_key: None,
        gemini_api_key: Some("test-key".to_string()),
        events_url: None,
        events_token: None,
        router_model: "gemini-2.0-flash".to_string(),
        content_model: "gemini-2.0-flash".to_string(),
        default_model: "gemini-2.0-flash".to_string(),
    }
}

fn assistant(transport: &Arc<MockTransport>, llm: &Arc<MockGeneration>) -> Assistant {
    Assistant::new(
        ToolClient::new(transport.clone()),
        llm.clone(),
        &test_config(),
    )
}

fn ctx() -> RequestContext {
    RequestContext::new(Some("42".to_string()), StatusEmitter::disabled())
}

#[tokio::test]
async fn test_create_request_stops_on_duplicate() {
    let transport = MockTransport::new();
    let llm = MockGeneration::new();
    llm.enqueue_json(&json!({
        "reasoning": "user wants a new waterfall page",
        "action": "CREATE_PAGE",
        "target_page_name": "Multnomah Falls"
    }));
    transport.stub("list_pages", json!([{"id": 7, "title": "Multnomah Falls"}]));

    let reply = assistant(&transport, &llm)
        .handle(&ctx(), "Create a page for Multnomah Falls")
        .await;

    assert_eq!(
        reply,
        "DUPLICATE_FOUND: 'Multnomah Falls' already exists (ID: 7)"
    );
    // only the classification call ran; research and content never did
    assert_eq!(llm.request_count(), 1);
    assert_eq!(transport.call_count("create_waterfall_page"), 0);
}

#[tokio::test]
async fn test_create_request_stops_on_unverified_subject() {
    let transport = MockTransport::new();
    let llm = MockGeneration::new();
    llm.enqueue_json(&json!({
        "reasoning": "user wants a new waterfall page",
        "action": "CREATE_PAGE",
        "target_page_name": "Rainbow Unicorn Falls"
    }));
    llm.enqueue_json(&json!({
        "waterfall_name": "Rainbow Unicorn Falls",
        "verified": false,
        "description": "",
        "verification_notes": "No credible source documents this waterfall."
    }));
    transport.stub("list_pages", json!([]));

    let reply = assistant(&transport, &llm)
        .handle(&ctx(), "Create a page for Rainbow Unicorn Falls")
        .await;

    assert!(reply.starts_with("RESEARCH_FAILED:"));
    // classification + research only; content generation never ran
    assert_eq!(llm.request_count(), 2);
    assert_eq!(transport.call_count("create_waterfall_page"), 0);
}

#[tokio::test]
async fn test_move_to_missing_category_is_actionable_error() {
    let transport = MockTransport::new();
    let llm = MockGeneration::new();
    llm.enqueue_json(&json!({
        "reasoning": "user wants to move a page",
        "action": "MOVE_PAGE",
        "target_page_name": "Toketee Falls",
        "destination_parent_name": "Highway 138"
    }));
    transport.stub("list_pages", json!([{"id": 5, "title": "Toketee Falls"}]));
    transport.stub("list_pages", json!([]));

    let reply = assistant(&transport, &llm)
        .handle(&ctx(), "Move Toketee Falls under Highway 138")
        .await;

    assert!(reply.starts_with("ERROR:"));
    assert!(reply.contains("Create it first"));
    assert_eq!(transport.call_count("move_page"), 0);
}

#[tokio::test]
async fn test_successful_creation_under_existing_parent() {
    let transport = MockTransport::new();
    let llm = MockGeneration::new();
    llm.enqueue_json(&json!({
        "reasoning": "user wants a new waterfall page",
        "action": "CREATE_PAGE",
        "target_page_name": "Toketee Falls",
        "destination_parent_name": "Oregon"
    }));
    llm.enqueue_json(&json!({
        "waterfall_name": "Toketee Falls",
        "verified": true,
        "difficulty": "Easy",
        "hike_type": "Out and Back",
        "description": "A two-tiered waterfall over columnar basalt.",
        "sources": ["https://www.fs.usda.gov/umpqua"]
    }));
    llm.enqueue_json(&json!({
        "title": "Toketee Falls",
        "meta_title": "Toketee Falls - Oregon's Basalt Beauty",
        "meta_description": "The short hike, the viewpoint, and the columnar basalt.",
        "difficulty": "Easy",
        "hike_type": "Out and Back",
        "blocks": [
            {"name": "cjBlockHero", "content": "<h1>Toketee Falls</h1>"},
            {"name": "cjBlockIntroduction", "content": "<p>Go see it.</p>"}
        ]
    }));
    transport.stub("list_pages", json!([]));
    transport.stub(
        "list_pages",
        json!([{"id": 3, "title": "Oregon", "slug": "oregon"}]),
    );
    transport.stub(
        "create_waterfall_page",
        json!({"id": 42, "title": "Toketee Falls"}),
    );

    let reply = assistant(&transport, &llm)
        .handle(&ctx(), "Create a page for Toketee Falls in Oregon")
        .await;

    assert!(reply.contains("SUCCESS:"));
    assert!(reply.contains("under 'Oregon'"));
    assert_eq!(transport.single_call_args("create_waterfall_page")["parent_id"], 3);
}

#[tokio::test]
async fn test_classification_failure_degrades_to_help() {
    let transport = MockTransport::new();
    let llm = MockGeneration::new();
    llm.enqueue_error(GenerationError::Request("timed out".to_string()));

    let reply = assistant(&transport, &llm)
        .handle(&ctx(), "asdfghjkl")
        .await;

    assert!(reply.contains("Falls Into Love CMS assistant"));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_create_without_target_is_instructive() {
    let transport = MockTransport::new();
    let llm = MockGeneration::new();
    llm.enqueue_json(&json!({
        "reasoning": "user wants a page but named no waterfall",
        "action": "CREATE_PAGE"
    }));

    let reply = assistant(&transport, &llm)
        .handle(&ctx(), "Create a page")
        .await;

    assert!(reply.starts_with("ERROR:"));
    assert!(reply.contains("Create a page for Multnomah Falls"));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_publish_idempotency_through_dispatch() {
    let transport = MockTransport::new();
    let llm = MockGeneration::new();
    llm.enqueue_json(&json!({
        "reasoning": "user wants to publish",
        "action": "PUBLISH_PAGE",
        "target_page_name": "Multnomah Falls"
    }));
    transport.stub(
        "list_pages",
        json!([{"id": 7, "title": "Multnomah Falls", "published": true}]),
    );

    let reply = assistant(&transport, &llm)
        .handle(&ctx(), "Publish Multnomah Falls")
        .await;

    assert!(reply.starts_with("INFO:"));
    assert_eq!(transport.call_count("publish_page"), 0);
}

#[tokio::test]
async fn test_update_content_dispatches_block_payload() {
    let transport = MockTransport::new();
    let llm = MockGeneration::new();
    llm.enqueue_json(&json!({
        "reasoning": "user wants a block update",
        "action": "UPDATE_CONTENT",
        "target_page_name": "Watson Falls",
        "content_description": "cjBlockIntroduction: <p>Fresh intro</p>"
    }));
    transport.stub("list_pages", json!([{"id": 12, "title": "Watson Falls"}]));
    transport.stub_text("update_page_content", "ok");

    let reply = assistant(&transport, &llm)
        .handle(&ctx(), "Rewrite the Watson Falls intro")
        .await;

    assert!(reply.starts_with("SUCCESS:"));
    let args = transport.single_call_args("update_page_content");
    assert_eq!(args["blocks"][0]["name"], "cjBlockIntroduction");
    assert_eq!(args["blocks"][0]["content"], "<p>Fresh intro</p>");
}

#[tokio::test]
async fn test_rename_reads_new_title_from_description() {
    let transport = MockTransport::new();
    let llm = MockGeneration::new();
    llm.enqueue_json(&json!({
        "reasoning": "user wants a rename",
        "action": "RENAME_PAGE",
        "target_page_name": "Watson Falls",
        "content_description": "Watson Falls Trail"
    }));
    transport.stub("list_pages", json!([{"id": 12, "title": "Watson Falls"}]));
    transport.stub_text("update_page_metadata", "ok");

    let reply = assistant(&transport, &llm)
        .handle(&ctx(), "Rename Watson Falls to Watson Falls Trail")
        .await;

    assert!(reply.starts_with("SUCCESS:"));
    assert_eq!(
        transport.single_call_args("update_page_metadata")["title"],
        "Watson Falls Trail"
    );
}

#[tokio::test]
async fn test_list_pages_through_dispatch() {
    let transport = MockTransport::new();
    let llm = MockGeneration::new();
    llm.enqueue_json(&json!({
        "reasoning": "user wants the page list",
        "action": "LIST_PAGES"
    }));
    transport.stub(
        "list_pages",
        json!([{"id": 7, "title": "Multnomah Falls", "published": true}]),
    );

    let reply = assistant(&transport, &llm)
        .handle(&ctx(), "What pages do we have?")
        .await;

    assert!(reply.starts_with("SUCCESS:"));
    assert!(reply.contains("Found 1 page(s)"));
    assert!(reply.contains("Multnomah Falls (ID: 7, published)"));
}

#[tokio::test]
async fn test_help_intent_returns_capabilities() {
    let transport = MockTransport::new();
    let llm = MockGeneration::new();
    llm.enqueue_json(&json!({
        "reasoning": "greeting",
        "action": "HELP"
    }));

    let reply = assistant(&transport, &llm).handle(&ctx(), "hi there").await;

    assert!(reply.contains("Create a page for Multnomah Falls"));
}
