//! Router-level tests for the HTTP surface, backed by in-process doubles.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use futures_util::StreamExt;
use ra_core::{
    Article, ArticlePatch, ArticleSource, AudioStream, Config, Error, Location, Result, Scope,
    SpeechSynthesizer,
};
use ra_inference::{prelude::ExtractiveSummarizer, SummaryCache};
use ra_reader::{ActionReconciler, FeedAssembler};
use ra_storage::{InMemoryStore, MarkerStore};
use ra_web::{create_app, AppState};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

#[derive(Default)]
struct FakeReader {
    articles: Mutex<Vec<Article>>,
    unavailable: bool,
}

#[async_trait]
impl ArticleSource for FakeReader {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list_candidates(&self, scope: Scope) -> Result<Vec<Article>> {
        if self.unavailable {
            return Err(Error::Upstream {
                status: 503,
                message: "reader is down".into(),
            });
        }
        Ok(self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_candidate() && scope.includes(a.location()))
            .cloned()
            .collect())
    }

    async fn mutate(&self, id: &str, patch: &ArticlePatch) -> Result<()> {
        if self.unavailable {
            return Err(Error::Upstream {
                status: 503,
                message: "reader is down".into(),
            });
        }
        let mut articles = self.articles.lock().unwrap();
        if let Some(article) = articles.iter_mut().find(|a| a.id == id) {
            article.location = patch.location;
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        if self.unavailable {
            return Err(Error::Upstream {
                status: 503,
                message: "reader is down".into(),
            });
        }
        self.articles.lock().unwrap().retain(|a| a.id != id);
        Ok(())
    }
}

struct FakeSpeech {
    fail: bool,
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    fn name(&self) -> &str {
        "fake speech"
    }

    async fn synthesize(&self, _text: &str, _voice: Option<&str>) -> Result<AudioStream> {
        if self.fail {
            return Err(Error::Tts("503: overloaded".into()));
        }
        let chunks: Vec<Result<Bytes>> = vec![Ok(Bytes::from_static(b"ID3")), Ok(Bytes::from_static(b"mp3"))];
        Ok(futures_util::stream::iter(chunks).boxed())
    }
}

fn article(id: &str, location: Location) -> Article {
    Article {
        id: id.to_string(),
        title: Some(format!("Title {}", id)),
        category: Some("article".to_string()),
        location: Some(location),
        site_name: Some("Example".to_string()),
        content: Some(format!("Some words about {}", id)),
        ..Default::default()
    }
}

fn app_with(reader: FakeReader, speech: Option<FakeSpeech>) -> (Router, MarkerStore) {
    let config = Config::default();
    let store = Arc::new(InMemoryStore::new());
    let reader: Arc<dyn ArticleSource> = Arc::new(reader);
    let markers = MarkerStore::new(store.clone(), &config.feed);
    let cache = SummaryCache::new(
        store,
        Arc::new(ExtractiveSummarizer::new(config.summarizer.target_words)),
        config.feed.summary_ttl,
    );

    let state = AppState {
        feed: FeedAssembler::new(reader.clone(), markers.clone(), cache, &config),
        actions: ActionReconciler::new(reader, markers.clone()),
        speech: speech.map(|s| Arc::new(s) as Arc<dyn SpeechSynthesizer>),
    };
    (create_app(state), markers)
}

fn app(articles: Vec<Article>) -> (Router, MarkerStore) {
    app_with(
        FakeReader {
            articles: Mutex::new(articles),
            ..Default::default()
        },
        None,
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(body: Body) -> Bytes {
    axum::body::to_bytes(body, usize::MAX).await.expect("Should read body")
}

async fn body_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).expect("Should parse JSON")
}

fn feed_ids(feed: &Value) -> Vec<String> {
    feed["articles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_index_serves_player() {
    let (app, _) = app(vec![]);
    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let html = String::from_utf8(body_bytes(response.into_body()).await.to_vec()).unwrap();
    assert!(html.contains("/api/feed"));
}

#[tokio::test]
async fn test_manifest_is_json() {
    let (app, _) = app(vec![]);
    let response = app.oneshot(get("/manifest.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let manifest = body_json(response.into_body()).await;
    assert_eq!(manifest["start_url"], "/");
}

#[tokio::test]
async fn test_feed_lists_due_articles() {
    let (app, _) = app(vec![
        article("a", Location::Later),
        article("b", Location::Archive),
        article("c", Location::Shortlist),
        article("d", Location::New),
    ]);
    let response = app.oneshot(get("/api/feed?location=library")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let feed = body_json(response.into_body()).await;
    assert_eq!(feed_ids(&feed), vec!["a", "c"]);
    assert_eq!(feed["total_available"], 2);
    assert_eq!(feed["location"], "library");
    assert_eq!(feed["articles"][0]["source"], "Example");
    assert_eq!(feed["articles"][0]["summary"], "Some words about a");
}

#[tokio::test]
async fn test_feed_defaults_to_all_scope() {
    let (app, _) = app(vec![article("a", Location::Feed)]);
    let response = app.oneshot(get("/api/feed")).await.unwrap();

    let feed = body_json(response.into_body()).await;
    assert_eq!(feed["location"], "all");
    assert_eq!(feed_ids(&feed), vec!["a"]);
}

#[tokio::test]
async fn test_feed_rejects_unknown_scope() {
    let (app, _) = app(vec![]);
    let response = app.oneshot(get("/api/feed?location=inbox")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("inbox"));
}

#[tokio::test]
async fn test_feed_upstream_failure_is_500() {
    let (app, _) = app_with(
        FakeReader {
            unavailable: true,
            ..Default::default()
        },
        None,
    );
    let response = app.oneshot(get("/api/feed")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("reader is down"));
}

#[tokio::test]
async fn test_archive_hides_article_from_next_feed() {
    let (app, markers) = app(vec![article("a", Location::New), article("b", Location::New)]);

    let response = app
        .clone()
        .oneshot(post_json("/api/archive", json!({ "id": "a" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await, json!({ "success": true }));
    assert!(markers.is_heard("a").await.unwrap());

    let response = app.oneshot(get("/api/feed")).await.unwrap();
    assert_eq!(feed_ids(&body_json(response.into_body()).await), vec!["b"]);
}

#[tokio::test]
async fn test_later_brings_heard_article_back() {
    let (app, markers) = app(vec![article("a", Location::New)]);
    markers.mark_heard("a").await.unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/api/later", json!({ "id": "a" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/feed")).await.unwrap();
    assert_eq!(feed_ids(&body_json(response.into_body()).await), vec!["a"]);
}

#[tokio::test]
async fn test_delete_removes_article() {
    let (app, _) = app(vec![article("a", Location::New)]);

    let response = app
        .clone()
        .oneshot(post_json("/api/delete", json!({ "id": "a" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/feed")).await.unwrap();
    assert!(feed_ids(&body_json(response.into_body()).await).is_empty());
}

#[tokio::test]
async fn test_action_without_id_is_400() {
    let (app, markers) = app(vec![]);

    for body in [json!({}), json!({ "id": "" }), json!({ "id": "a/b" })] {
        let response = app
            .clone()
            .oneshot(post_json("/api/archive", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(body_json(response.into_body()).await["success"], false);
    }
    assert!(markers.heard_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreadable_action_body_is_400() {
    let (app, markers) = app(vec![]);

    let requests = [
        post_json("/api/delete", json!({ "id": 123 })),
        post_raw("/api/later", "not json"),
        Request::builder()
            .method("POST")
            .uri("/api/archive")
            .body(Body::from(r#"{"id":"a"}"#))
            .unwrap(),
    ];
    for request in requests {
        let uri = request.uri().to_string();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {}", uri);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["success"], false);
        assert!(!body["error"].as_str().unwrap().is_empty());
    }
    assert!(markers.heard_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreadable_tts_body_is_400() {
    let (app, _) = app(vec![]);

    for request in [
        post_json("/api/tts", json!({ "text": ["not", "a", "string"] })),
        post_raw("/api/tts", "{text"),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response.into_body()).await["success"], false);
    }
}

#[tokio::test]
async fn test_action_upstream_failure_is_500() {
    let (app, markers) = app_with(
        FakeReader {
            unavailable: true,
            ..Default::default()
        },
        None,
    );
    let response = app
        .oneshot(post_json("/api/delete", json!({ "id": "a" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("503"));
    assert!(markers.is_heard("a").await.unwrap());
}

#[tokio::test]
async fn test_tts_streams_audio() {
    let (app, _) = app_with(FakeReader::default(), Some(FakeSpeech { fail: false }));
    let response = app
        .oneshot(post_json("/api/tts", json!({ "text": "Hello", "voice": "nova" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(&body_bytes(response.into_body()).await[..], b"ID3mp3");
}

#[tokio::test]
async fn test_tts_without_provider_falls_back_to_browser() {
    let (app, _) = app(vec![]);
    let response = app
        .oneshot(post_json("/api/tts", json!({ "text": "Hello" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({ "use_browser_tts": true, "text": "Hello" })
    );
}

#[tokio::test]
async fn test_tts_provider_failure_falls_back_to_browser() {
    let (app, _) = app_with(FakeReader::default(), Some(FakeSpeech { fail: true }));
    let response = app
        .oneshot(post_json("/api/tts", json!({ "text": "Hello" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await["use_browser_tts"], true);
}

#[tokio::test]
async fn test_tts_requires_text() {
    let (app, _) = app(vec![]);
    let response = app
        .oneshot(post_json("/api/tts", json!({ "text": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _) = app(vec![]);
    let response = app.oneshot(get("/api/nothing")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(&body_bytes(response.into_body()).await[..], b"Not found");
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = app(vec![]);
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/archive")
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_cors_headers_on_simple_requests() {
    let (app, _) = app(vec![]);
    let request = Request::builder()
        .method("GET")
        .uri("/api/feed")
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
