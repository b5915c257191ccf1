//! MCP protocol tests: JSON-RPC dispatch, tool results, resources and both
//! transports, backed by a mocked Pylon API.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pylon_kb_mcp::config::Config;
use pylon_kb_mcp::knowledge_base::KnowledgeBase;
use pylon_kb_mcp::server::transport::{JsonRpcRequest, create_router};
use pylon_kb_mcp::server::{McpServer, handler, stdio};
use pylon_kb_mcp::tools::{McpTool, ToolContext, register_all_tools};

const ARTICLES_PATH: &str = "/knowledge-bases/test-kb/articles";
const FAQ_ID: &str = "459ab0c0-a720-4c11-8a88-d6315610b7f2";

fn setup_test_context(mock_server: &MockServer) -> ToolContext {
    let kb = KnowledgeBase::new(&Config::for_testing(&mock_server.uri())).unwrap();
    ToolContext::new(Arc::new(kb))
}

async fn mount_faq(mock_server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "id": FAQ_ID,
                    "title": "The checkout conversion testing program FAQ",
                    "slug": "the-checkout-conversion-testing-program-faq",
                    "identifier": "1178113824",
                    "is_published": true,
                    "current_published_content_html": "<p>Test content</p>",
                    "last_published_at": "2025-01-17T17:34:06Z"
                },
                {
                    "id": "draft-1",
                    "title": "Unreleased feature",
                    "slug": "unreleased-feature",
                    "identifier": "77",
                    "is_published": false,
                    "current_published_content_html": "<p>Soon</p>",
                    "last_published_at": null
                }
            ],
            "pagination": { "has_next_page": false }
        })))
        .expect(expected)
        .mount(mock_server)
        .await;
}

fn request(value: Value) -> JsonRpcRequest {
    serde_json::from_value(value).unwrap()
}

async fn call(ctx: &ToolContext, value: Value) -> Option<Value> {
    let tools = register_all_tools();
    handler::handle_request(&request(value), &tools, ctx)
        .await
        .map(|r| serde_json::to_value(r).unwrap())
}

fn tool_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_initialize_advertises_capabilities() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response = call(
        &ctx,
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2025-03-26"}}),
    )
    .await
    .unwrap();

    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(response["result"]["serverInfo"]["name"], "pylon-kb-mcp");
    assert!(response["result"]["capabilities"]["tools"].is_object());
    assert!(response["result"]["capabilities"]["resources"].is_object());
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response =
        call(&ctx, json!({"jsonrpc": "2.0", "method": "notifications/initialized"})).await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_unknown_method() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response =
        call(&ctx, json!({"jsonrpc": "2.0", "id": "x", "method": "prompts/list"})).await.unwrap();
    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["id"], "x");
}

#[tokio::test]
async fn test_tools_list_names() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response =
        call(&ctx, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await.unwrap();
    let names: Vec<_> = response["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();

    assert_eq!(names, vec!["get-article", "get-collection", "get-all-articles", "search"]);
    assert!(response["result"]["tools"][0]["inputSchema"].is_object());
}

// =============================================================================
// tools/call
// =============================================================================

#[tokio::test]
async fn test_get_article_tool_returns_pretty_json() {
    let mock_server = MockServer::start().await;
    mount_faq(&mock_server, 1).await;
    let ctx = setup_test_context(&mock_server);

    let response = call(
        &ctx,
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
               "params": {"name": "get-article", "arguments": {"id": FAQ_ID}}}),
    )
    .await
    .unwrap();

    assert!(response["result"].get("isError").is_none());
    let text = tool_text(&response);
    assert!(text.contains('\n'));

    let article: Value = serde_json::from_str(text).unwrap();
    assert_eq!(article["collectionId"], "test-kb");
    assert!(article["text"].as_str().unwrap().contains("Test content"));
    assert!(
        article["url"]
            .as_str()
            .unwrap()
            .ends_with("1178113824-the-checkout-conversion-testing-program-faq")
    );
}

#[tokio::test]
async fn test_search_tool_output_shape() {
    let mock_server = MockServer::start().await;
    mount_faq(&mock_server, 1).await;
    let ctx = setup_test_context(&mock_server);

    let response = call(
        &ctx,
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
               "params": {"name": "search", "arguments": {"query": "CHECKOUT", "limit": 5}}}),
    )
    .await
    .unwrap();

    let body: Value = serde_json::from_str(tool_text(&response)).unwrap();
    assert_eq!(body["query"], "CHECKOUT");
    assert_eq!(body["totalResults"], 1);
    assert_eq!(body["articles"][0]["id"], FAQ_ID);
    assert!(body["articles"][0].get("html").is_none());
}

#[tokio::test]
async fn test_get_all_articles_splits_by_status() {
    let mock_server = MockServer::start().await;
    mount_faq(&mock_server, 1).await;
    let ctx = setup_test_context(&mock_server);

    let response = call(
        &ctx,
        json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call",
               "params": {"name": "get-all-articles", "arguments": {}}}),
    )
    .await
    .unwrap();

    let body: Value = serde_json::from_str(tool_text(&response)).unwrap();
    assert_eq!(body["summary"]["total"], 2);
    assert_eq!(body["summary"]["published_count"], 1);
    assert_eq!(body["summary"]["unpublished_count"], 1);
    assert_eq!(body["summary"]["truncated"], false);
    assert_eq!(body["unpublished_articles"][0]["id"], "draft-1");
}

#[tokio::test]
async fn test_upstream_failure_becomes_error_result() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    let ctx = setup_test_context(&mock_server);

    let response = call(
        &ctx,
        json!({"jsonrpc": "2.0", "id": 6, "method": "tools/call",
               "params": {"name": "get-article", "arguments": {"slug": "anything"}}}),
    )
    .await
    .unwrap();

    assert!(response.get("error").is_none());
    assert_eq!(response["result"]["isError"], true);
    let text = tool_text(&response);
    assert!(text.starts_with("Error getting article:"));
    assert!(text.contains("Pylon API error: 500"));
}

#[tokio::test]
async fn test_validation_fails_before_network() {
    let mock_server = MockServer::start().await;
    mount_faq(&mock_server, 0).await;
    let ctx = setup_test_context(&mock_server);

    for (name, arguments) in [
        ("get-article", json!({})),
        ("get-article", json!({"id": "", "slug": ""})),
        ("get-collection", json!({"id": ""})),
        ("search", json!({"query": ""})),
        ("search", json!({"query": "x", "limit": 0})),
        ("search", json!({"query": "x", "limit": 101})),
    ] {
        let response = call(
            &ctx,
            json!({"jsonrpc": "2.0", "id": 7, "method": "tools/call",
                   "params": {"name": name, "arguments": arguments}}),
        )
        .await
        .unwrap();

        assert_eq!(response["result"]["isError"], true, "{name} {arguments}");
        assert!(tool_text(&response).contains("Invalid input"), "{name} {arguments}");
    }
}

#[tokio::test]
async fn test_unknown_tool_is_protocol_error() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response = call(
        &ctx,
        json!({"jsonrpc": "2.0", "id": 8, "method": "tools/call",
               "params": {"name": "delete-article", "arguments": {}}}),
    )
    .await
    .unwrap();

    assert_eq!(response["error"]["code"], -32602);
    assert!(response["error"]["message"].as_str().unwrap().contains("delete-article"));
}

#[tokio::test]
async fn test_missing_tool_name_is_protocol_error() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response =
        call(&ctx, json!({"jsonrpc": "2.0", "id": 9, "method": "tools/call", "params": {}}))
            .await
            .unwrap();
    assert_eq!(response["error"]["code"], -32602);
}

// =============================================================================
// Resources
// =============================================================================

#[tokio::test]
async fn test_resources_list() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response =
        call(&ctx, json!({"jsonrpc": "2.0", "id": 10, "method": "resources/list"})).await.unwrap();
    assert_eq!(response["result"]["resources"][0]["uri"], "pylon-article://help");
    assert_eq!(response["result"]["resources"][0]["mimeType"], "text/plain");
}

#[tokio::test]
async fn test_read_help_resource() {
    let mock_server = MockServer::start().await;
    mount_faq(&mock_server, 0).await;
    let ctx = setup_test_context(&mock_server);

    let response = call(
        &ctx,
        json!({"jsonrpc": "2.0", "id": 11, "method": "resources/read",
               "params": {"uri": "pylon-article://help"}}),
    )
    .await
    .unwrap();

    let contents = &response["result"]["contents"][0];
    assert_eq!(contents["uri"], "pylon-article://help");
    assert!(contents["text"].as_str().unwrap().contains("pylon-article://"));
}

#[tokio::test]
async fn test_read_article_resource_by_id_and_slug() {
    let mock_server = MockServer::start().await;
    mount_faq(&mock_server, 1).await;
    let ctx = setup_test_context(&mock_server);

    for uri in [
        format!("pylon-article://{FAQ_ID}"),
        "pylon-article://the-checkout-conversion-testing-program-faq".to_string(),
    ] {
        let response = call(
            &ctx,
            json!({"jsonrpc": "2.0", "id": 12, "method": "resources/read", "params": {"uri": uri}}),
        )
        .await
        .unwrap();

        assert_eq!(response["result"]["contents"][0]["text"], "Test content");
        assert_eq!(response["result"]["contents"][0]["mimeType"], "text/plain");
    }
}

#[tokio::test]
async fn test_read_resource_errors() {
    let mock_server = MockServer::start().await;
    mount_faq(&mock_server, 1).await;
    let ctx = setup_test_context(&mock_server);

    let response = call(
        &ctx,
        json!({"jsonrpc": "2.0", "id": 13, "method": "resources/read",
               "params": {"uri": "https://example.com/article"}}),
    )
    .await
    .unwrap();
    assert_eq!(response["error"]["code"], -32602);
    assert!(response["error"]["message"].as_str().unwrap().contains("Unsupported protocol: https:"));

    let response = call(
        &ctx,
        json!({"jsonrpc": "2.0", "id": 14, "method": "resources/read",
               "params": {"uri": "pylon-article://no-such-article"}}),
    )
    .await
    .unwrap();
    assert_eq!(response["error"]["code"], -32603);
    assert!(
        response["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to fetch article \"no-such-article\"")
    );
}

// =============================================================================
// Transports
// =============================================================================

#[tokio::test]
async fn test_stdio_serves_lines_until_eof() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);
    let tools = register_all_tools();

    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
        "\n\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        "{not json\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
    );

    let mut output = Vec::new();
    stdio::serve_lines(input.as_bytes(), &mut output, &tools, &ctx).await.unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[0]["result"], json!({}));
    assert_eq!(lines[1]["error"]["code"], -32700);
    assert_eq!(lines[1]["id"], Value::Null);
    assert_eq!(lines[2]["id"], 2);
    assert_eq!(lines[2]["result"]["tools"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_http_mcp_endpoint() {
    let mock_server = MockServer::start().await;
    mount_faq(&mock_server, 1).await;
    let ctx = setup_test_context(&mock_server);
    let router = create_router(register_all_tools(), ctx);

    let body = json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
                      "params": {"name": "search", "arguments": {"query": "faq"}}});
    let response = router
        .oneshot(
            Request::post("/mcp")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    let result: Value = serde_json::from_str(tool_text(&json)).unwrap();
    assert_eq!(result["totalResults"], 1);
}

#[tokio::test]
async fn test_http_notification_is_accepted() {
    let mock_server = MockServer::start().await;
    let router = create_router(register_all_tools(), setup_test_context(&mock_server));

    let response = router
        .oneshot(
            Request::post("/mcp")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_http_readiness_reports_knowledge_base() {
    let mock_server = MockServer::start().await;
    let router = create_router(register_all_tools(), setup_test_context(&mock_server));

    let response =
        router.oneshot(Request::get("/ready").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["knowledgeBaseId"], "test-kb");
    assert_eq!(json["tools"], 4);
}

#[test]
fn test_server_registers_every_tool() {
    let kb = KnowledgeBase::new(&Config::for_testing("http://127.0.0.1:1")).unwrap();
    let server = McpServer::new(kb);

    assert_eq!(server.list_tools().len(), 4);
    assert!(server.get_tool("get-collection").is_some());
    assert!(server.get_tool("missing").is_none());
    assert_eq!(server.context().kb.knowledge_base_id(), "test-kb");
}

#[test]
fn test_tool_actions_name_the_operation() {
    let actions: Vec<_> = register_all_tools().iter().map(|t| t.action()).collect();
    assert_eq!(
        actions,
        vec![
            "getting article",
            "getting collection",
            "getting Amplemarket articles",
            "searching articles"
        ]
    );
}
