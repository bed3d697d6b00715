use std::{
  collections::VecDeque,
  convert::Infallible,
  sync::{
    Arc, Mutex,
    atomic::{AtomicU32, Ordering},
  },
};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use rebut_llm::{ChatRequest, ChatTransport, Gateway, GatewayConfig, RawResponse};
use rebut_store_memory::MemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, router};

// ─── Fixtures ─────────────────────────────────────────────────────────────────

/// Replays canned upstream responses and records what was sent.
#[derive(Clone, Default)]
struct Scripted {
  responses: Arc<Mutex<VecDeque<RawResponse>>>,
  requests:  Arc<Mutex<Vec<ChatRequest>>>,
  calls:     Arc<AtomicU32>,
}

impl Scripted {
  fn push(&self, response: RawResponse) {
    self.responses.lock().unwrap().push_back(response);
  }

  fn calls(&self) -> u32 {
    self.calls.load(Ordering::SeqCst)
  }

  fn last_prompt(&self) -> String {
    let requests = self.requests.lock().unwrap();
    let last = requests.last().expect("no upstream request was made");
    last.messages.iter().map(|m| m.content.as_str()).collect::<Vec<_>>().join("\n")
  }
}

impl ChatTransport for Scripted {
  type Error = Infallible;

  async fn send(&self, request: &ChatRequest) -> Result<RawResponse, Infallible> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.requests.lock().unwrap().push(request.clone());
    let next = self.responses.lock().unwrap().pop_front();
    Ok(next.expect("script ran out of responses"))
  }
}

fn completion(content: &str) -> RawResponse {
  let body = json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] });
  RawResponse::new(200, body.to_string())
}

const DEBATE_JSON: &str = r#"{
  "proposition": ["Cheaper energy"],
  "opposition": ["Waste storage"],
  "propositionRebuttals": ["Storage is solved"],
  "oppositionRebuttals": ["Costs overrun"],
  "evidence": [{"point": "Cheaper energy", "sources": ["IEA 2023"]}]
}"#;

fn state() -> (AppState<MemoryStore, Scripted>, Scripted) {
  let script = Scripted::default();
  let config = GatewayConfig { max_retries: 0, ..GatewayConfig::default() };
  let state = AppState::new(MemoryStore::new(), Gateway::new(script.clone(), config));
  (state, script)
}

async fn send(
  state: &AppState<MemoryStore, Scripted>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut req = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(json) => {
      req = req.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };

  let resp = router(state.clone())
    .oneshot(req.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

fn debate_points() -> Value {
  serde_json::from_str(DEBATE_JSON).unwrap()
}

async fn save(state: &AppState<MemoryStore, Scripted>, topic: &str, extra: Value) -> Value {
  let mut body = json!({ "topic": topic, "points": debate_points() });
  if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
    body.extend(extra.clone());
  }
  let (status, saved) = send(state, "POST", "/api/debates", Some(body)).await;
  assert_eq!(status, StatusCode::CREATED, "{saved}");
  saved
}

// ─── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok() {
  let (state, _) = state();
  let (status, body) = send(&state, "GET", "/health", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "status": "ok" }));
}

// ─── Saved debates ────────────────────────────────────────────────────────────

#[tokio::test]
async fn saved_debate_round_trips_through_get() {
  let (state, _) = state();
  let saved = save(&state, "Should AI be regulated?", json!({ "userId": 7 })).await;

  assert_eq!(saved["id"], 1);
  assert_eq!(saved["userId"], 7);
  assert_eq!(saved["language"], "english");
  assert!(saved["createdAt"].is_string());
  assert_eq!(saved["points"]["proposition"], json!(["Cheaper energy"]));

  let (status, fetched) = send(&state, "GET", "/api/debates/1", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched, saved);
}

#[tokio::test]
async fn missing_debate_is_404() {
  let (state, _) = state();
  let (status, body) = send(&state, "GET", "/api/debates/99", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body, json!({ "message": "Debate not found" }));
}

#[tokio::test]
async fn non_integer_id_is_400() {
  let (state, _) = state();
  let (status, body) = send(&state, "GET", "/api/debates/abc", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["message"].as_str().unwrap().starts_with("Validation error"));
}

#[tokio::test]
async fn delete_then_get_is_404() {
  let (state, _) = state();
  save(&state, "Four-day work week", json!({})).await;

  let (status, body) = send(&state, "DELETE", "/api/debates/1", None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert_eq!(body, Value::Null);

  let (status, _) = send(&state, "GET", "/api/debates/1", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(&state, "DELETE", "/api/debates/1", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_user() {
  let (state, _) = state();
  save(&state, "Topic one", json!({ "userId": 1 })).await;
  save(&state, "Topic two", json!({ "userId": 2 })).await;
  save(&state, "Topic three", json!({ "userId": 1 })).await;

  let (status, all) = send(&state, "GET", "/api/debates", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(all.as_array().unwrap().len(), 3);

  let (_, mine) = send(&state, "GET", "/api/debates?userId=1", None).await;
  let topics: Vec<_> = mine
    .as_array()
    .unwrap()
    .iter()
    .map(|d| d["topic"].as_str().unwrap())
    .collect();
  assert_eq!(topics, ["Topic one", "Topic three"]);
}

#[tokio::test]
async fn empty_user_filter_lists_everything() {
  let (state, _) = state();
  save(&state, "Topic one", json!({ "userId": 1 })).await;
  save(&state, "Topic two", json!({})).await;

  let (status, all) = send(&state, "GET", "/api/debates?userId=", None).await;
  assert_eq!(status, StatusCode::OK, "{all}");
  assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn non_integer_user_filter_is_400() {
  let (state, _) = state();
  let (status, body) = send(&state, "GET", "/api/debates?userId=abc", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["message"].as_str().unwrap().starts_with("Validation error"));
}

#[tokio::test]
async fn search_is_case_insensitive() {
  let (state, _) = state();
  save(&state, "Should AI be regulated?", json!({})).await;
  save(&state, "Universal basic income", json!({})).await;

  let (status, hits) = send(&state, "GET", "/api/debates/search?q=ai", None).await;
  assert_eq!(status, StatusCode::OK);
  let hits = hits.as_array().unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0]["topic"], "Should AI be regulated?");
}

#[tokio::test]
async fn search_without_query_is_400() {
  let (state, _) = state();
  for uri in ["/api/debates/search", "/api/debates/search?q="] {
    let (status, body) = send(&state, "GET", uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert_eq!(body, json!({ "message": "Search query is required" }));
  }
}

#[tokio::test]
async fn save_rejects_short_topic_and_bad_points() {
  let (state, _) = state();
  let body = json!({ "topic": "AI", "points": { "proposition": "not a list" } });
  let (status, resp) = send(&state, "POST", "/api/debates", Some(body)).await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  let message = resp["message"].as_str().unwrap();
  assert!(message.starts_with("Validation error: "), "{message}");
  assert!(message.contains("\"topic\""), "{message}");
  assert!(message.contains("\"points\""), "{message}");
}

// ─── Generation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn debate_is_generated_once_then_cached() {
  let (state, script) = state();
  script.push(completion(DEBATE_JSON));

  let body = json!({ "topic": "Nuclear power", "complexity": "advanced" });
  let (status, first) = send(&state, "POST", "/api/debate", Some(body.clone())).await;
  assert_eq!(status, StatusCode::OK, "{first}");
  assert_eq!(first["proposition"], json!(["Cheaper energy"]));
  assert_eq!(first["language"], "english");

  let (status, second) = send(&state, "POST", "/api/debate", Some(body)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(second, first);
  assert_eq!(script.calls(), 1);
}

#[tokio::test]
async fn debate_validation_collects_issues() {
  let (state, script) = state();
  let body = json!({ "topic": "ab", "complexity": "moderate" });
  let (status, resp) = send(&state, "POST", "/api/debate", Some(body)).await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  let message = resp["message"].as_str().unwrap();
  assert!(message.contains("at least 3 character(s) at \"topic\""), "{message}");
  assert!(message.contains("received 'moderate'"), "{message}");
  assert_eq!(script.calls(), 0);
}

#[tokio::test]
async fn malformed_json_body_is_400() {
  let (state, _) = state();
  let req = Request::builder()
    .method("POST")
    .uri("/api/debate")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unusable_model_output_hides_details() {
  let (state, script) = state();
  script.push(completion("I'm sorry, I can't help with that."));

  let body = json!({ "topic": "Nuclear power" });
  let (status, resp) = send(&state, "POST", "/api/debate", Some(body)).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(
    resp,
    json!({ "message": "Failed to generate debate points from AI service" })
  );
}

#[tokio::test]
async fn upstream_rate_limit_has_its_own_message() {
  let (state, script) = state();
  script.push(RawResponse::new(
    429,
    json!({ "error": { "message": "Please try again in 1s." } }).to_string(),
  ));

  let body = json!({ "topic": "Nuclear power", "side": "proposition" });
  let (status, resp) = send(&state, "POST", "/api/rebuttals", Some(body)).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(
    resp,
    json!({ "message": "API rate limit reached. Please try again in a few seconds." })
  );
}

#[tokio::test]
async fn rebuttals_use_the_saved_debate_language() {
  let (state, script) = state();
  save(&state, "Nuclear Power", json!({ "language": "spanish" })).await;
  script.push(completion(r#"["Uno", "Dos"]"#));

  let body = json!({ "topic": "nuclear power", "side": "opposition" });
  let (status, resp) = send(&state, "POST", "/api/rebuttals", Some(body)).await;
  assert_eq!(status, StatusCode::OK, "{resp}");
  assert_eq!(resp, json!({ "rebuttals": ["Uno", "Dos"] }));
  assert!(script.last_prompt().contains("spanish"));
}

#[tokio::test]
async fn rebuttal_count_out_of_range_is_400() {
  let (state, script) = state();
  let body = json!({ "topic": "Nuclear power", "side": "proposition", "count": 6 });
  let (status, _) = send(&state, "POST", "/api/rebuttals", Some(body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(script.calls(), 0);
}

#[tokio::test]
async fn counter_arguments_are_wrapped() {
  let (state, script) = state();
  script.push(completion("Here you go:\n[\"First\", \"Second\", \"Third\"]"));

  let body = json!({ "argument": "Nuclear is too dangerous", "topic": "Nuclear power" });
  let (status, resp) = send(&state, "POST", "/api/counter-arguments", Some(body)).await;
  assert_eq!(status, StatusCode::OK, "{resp}");
  assert_eq!(resp, json!({ "counterArguments": ["First", "Second", "Third"] }));
  assert!(script.last_prompt().contains("Nuclear is too dangerous"));
}
