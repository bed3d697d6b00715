//! Handlers for the model-backed endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/debate` | Body: `{topic, language?, complexity?}`; cached per `(topic, language, complexity)` |
//! | `POST` | `/rebuttals` | Body: `{topic, side, count?}` → `{"rebuttals": [...]}` |
//! | `POST` | `/counter-arguments` | Body: `{argument, topic?, count?}` → `{"counterArguments": [...]}` |

use axum::{Json, extract::{State, rejection::JsonRejection}};
use rebut_core::{
  debate::DebatePoint,
  store::DebateStore,
  topic::{Complexity, DEFAULT_LANGUAGE, DebateTopicRequest, Side},
};
use rebut_llm::ChatTransport;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, validate::Validator};

const COMPLEXITIES: &[&str] = &["beginner", "intermediate", "advanced", "expert"];
const SIDES: &[&str] = &["proposition", "opposition"];

// ─── Debate points ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DebateBody {
  pub topic:      Option<String>,
  pub language:   Option<String>,
  pub complexity: Option<String>,
}

impl DebateBody {
  pub fn validate(self) -> Result<DebateTopicRequest, ApiError> {
    let mut v = Validator::new();
    let topic = v.required("topic", self.topic);
    if let Some(t) = &topic {
      v.length("topic", t, 3, 200);
    }
    v.length_opt("language", self.language.as_deref(), 2, 30);
    let complexity = match &self.complexity {
      Some(c) => v.one_of::<Complexity>("complexity", c, COMPLEXITIES),
      None => Some(Complexity::default()),
    };
    let (topic, complexity) = v.finish_with(topic.zip(complexity))?;

    Ok(DebateTopicRequest {
      topic,
      language: self.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
      complexity,
    })
  }
}

/// `POST /debate`
pub async fn debate<S, T>(
  State(state): State<AppState<S, T>>,
  body: Result<Json<DebateBody>, JsonRejection>,
) -> Result<Json<DebatePoint>, ApiError>
where
  S: DebateStore + 'static,
  T: ChatTransport + 'static,
{
  let Json(body) = body?;
  let request = body.validate()?;

  let points = state
    .cache
    .get_or_generate(&request, || state.gateway.generate_debate(&request))
    .await
    .map_err(ApiError::generation("debate points"))?;
  Ok(Json(points))
}

// ─── Rebuttals ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RebuttalBody {
  pub topic: Option<String>,
  pub side:  Option<String>,
  pub count: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RebuttalResponse {
  pub rebuttals: Vec<String>,
}

/// `POST /rebuttals`
pub async fn rebuttals<S, T>(
  State(state): State<AppState<S, T>>,
  body: Result<Json<RebuttalBody>, JsonRejection>,
) -> Result<Json<RebuttalResponse>, ApiError>
where
  S: DebateStore + 'static,
  T: ChatTransport + 'static,
{
  let Json(body) = body?;

  let mut v = Validator::new();
  let topic = v.required("topic", body.topic);
  if let Some(t) = &topic {
    v.length("topic", t, 3, 200);
  }
  let side = v
    .required("side", body.side)
    .and_then(|s| v.one_of::<Side>("side", &s, SIDES));
  let count = body.count.unwrap_or(2);
  v.range("count", count, 1, 5);
  let (topic, side) = v.finish_with(topic.zip(side))?;

  let language = saved_language(&state, &topic).await;
  let rebuttals = state
    .gateway
    .generate_rebuttals(&topic, side, count as u8, &language)
    .await
    .map_err(ApiError::generation("rebuttals"))?;
  Ok(Json(RebuttalResponse { rebuttals }))
}

// ─── Counter-arguments ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CounterArgumentBody {
  pub argument: Option<String>,
  pub topic:    Option<String>,
  pub count:    Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterArgumentResponse {
  pub counter_arguments: Vec<String>,
}

/// `POST /counter-arguments`
pub async fn counter_arguments<S, T>(
  State(state): State<AppState<S, T>>,
  body: Result<Json<CounterArgumentBody>, JsonRejection>,
) -> Result<Json<CounterArgumentResponse>, ApiError>
where
  S: DebateStore + 'static,
  T: ChatTransport + 'static,
{
  let Json(body) = body?;

  let mut v = Validator::new();
  let argument = v.required("argument", body.argument);
  if let Some(a) = &argument {
    v.length("argument", a, 3, 500);
  }
  v.length_opt("topic", body.topic.as_deref(), 3, 200);
  let count = body.count.unwrap_or(3);
  v.range("count", count, 1, 5);
  let argument = v.finish_with(argument)?;

  let language = match &body.topic {
    Some(topic) => saved_language(&state, topic).await,
    None => DEFAULT_LANGUAGE.to_owned(),
  };
  let counter_arguments = state
    .gateway
    .generate_counter_arguments(&argument, body.topic.as_deref(), count as u8, &language)
    .await
    .map_err(ApiError::generation("counter-arguments"))?;
  Ok(Json(CounterArgumentResponse { counter_arguments }))
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Language of a saved debate whose topic matches `topic` (ignoring case),
/// so follow-up content matches the original. Defaults to English.
async fn saved_language<S, T>(state: &AppState<S, T>, topic: &str) -> String
where
  S: DebateStore,
{
  match state.store.get_all_debates().await {
    Ok(debates) => debates
      .into_iter()
      .find(|d| d.topic.to_lowercase() == topic.to_lowercase())
      .and_then(|d| d.language)
      .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
    Err(e) => {
      tracing::warn!(error = %e, "could not look up debate language; using default");
      DEFAULT_LANGUAGE.to_owned()
    }
  }
}
