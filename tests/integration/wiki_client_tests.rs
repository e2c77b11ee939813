use std::time::Duration;

use eve_wiki_mcp::config::WikiConfig;
use eve_wiki_mcp::wiki::client::WikiClient;
use eve_wiki_mcp::wiki::{Extract, WikiApi, WikiError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, timeout_secs: u64) -> WikiClient {
    let config = WikiConfig {
        api_url: format!("{}/api.php", server.uri()),
        timeout_secs,
        user_agent: "eve-wiki-mcp-tests".to_string(),
    };
    WikiClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_search_sends_opensearch_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("action", "opensearch"))
        .and(query_param("search", "venture"))
        .and(query_param("limit", "5"))
        .and(header("user-agent", "eve-wiki-mcp-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            "venture",
            ["Venture"],
            ["Starter mining frigate"],
            ["https://wiki.eveuniversity.org/wiki/Venture"]
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let hits = client_for(&server, 30).search("venture", 5).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Venture");
    assert_eq!(hits[0].url, "https://wiki.eveuniversity.org/wiki/Venture");
}

#[tokio::test]
async fn test_extract_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("prop", "extracts"))
        .and(query_param("titles", "Ore"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": {"42": {"pageid": 42, "title": "Ore", "extract": "Ore is mined."}}}
        })))
        .mount(&server)
        .await;

    let extract = client_for(&server, 30).get_extract("Ore").await.unwrap();
    assert_eq!(
        extract,
        Extract::Found {
            title: "Ore".to_string(),
            extract: Some("Ore is mined.".to_string())
        }
    );
}

#[tokio::test]
async fn test_server_error_maps_to_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server, 30).search("mining", 5).await.unwrap_err();
    assert!(matches!(err, WikiError::Http(500)));
    assert_eq!(err.info(), "Wiki API returned an error. Please try again.");
}

#[tokio::test]
async fn test_api_error_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": "missingtitle", "info": "The page you specified doesn't exist."}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, 30)
        .get_rendered_page("Nope")
        .await
        .unwrap_err();
    assert_eq!(err.info(), "The page you specified doesn't exist.");
}

#[tokio::test]
async fn test_slow_wiki_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, 1).search("mining", 5).await.unwrap_err();
    assert!(matches!(err, WikiError::Timeout));
    assert_eq!(err.info(), "Request timed out. Wiki may be slow.");
}
