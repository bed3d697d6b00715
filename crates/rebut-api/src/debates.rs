//! Handlers for `/debates` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/debates` | Optional `?userId=<id>` |
//! | `POST`   | `/debates` | Body: `{topic, points, userId?, language?, format?}`; returns 201 |
//! | `GET`    | `/debates/search` | Required `?q=<text>` |
//! | `GET`    | `/debates/:id` | 404 if not found |
//! | `DELETE` | `/debates/:id` | 204, or 404 if not found |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use rebut_core::{
  debate::{Debate, DebatePoint, NewDebate},
  store::DebateStore,
};
use serde::{Deserialize, Deserializer};

use crate::{AppState, error::ApiError, validate::Validator};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  /// `?userId=` with no value lists everything, like an absent parameter.
  #[serde(default, deserialize_with = "empty_as_none")]
  pub user_id: Option<i64>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
    None | Some("") => Ok(None),
    Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
  }
}

/// `GET /debates[?userId=<id>]`
pub async fn list<S, T>(
  State(state): State<AppState<S, T>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Debate>>, ApiError>
where
  S: DebateStore,
{
  let Query(params) = params?;
  let debates = state
    .store
    .get_debates_by_user_id(params.user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(debates))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `points` is kept as raw JSON so a malformed value is reported as a field
/// violation alongside the others.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub topic:    Option<String>,
  pub points:   Option<serde_json::Value>,
  pub user_id:  Option<i64>,
  pub language: Option<String>,
  pub format:   Option<String>,
}

impl CreateBody {
  pub fn validate(self) -> Result<NewDebate, ApiError> {
    let mut v = Validator::new();
    let topic = v.required("topic", self.topic);
    if let Some(t) = &topic {
      v.length("topic", t, 3, 200);
    }
    let points = v.required("points", self.points).and_then(|raw| {
      serde_json::from_value::<DebatePoint>(raw)
        .map_err(|e| v.invalid("points", e.to_string()))
        .ok()
    });
    let (topic, points) = v.finish_with(topic.zip(points))?;

    Ok(NewDebate {
      topic,
      points,
      user_id: self.user_id,
      language: self.language,
      format: self.format,
    })
  }
}

/// `POST /debates`: returns 201 and the stored [`Debate`].
pub async fn create<S, T>(
  State(state): State<AppState<S, T>>,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DebateStore,
{
  let Json(body) = body?;
  let input = body.validate()?;

  let debate = state
    .store
    .create_debate(input)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id = debate.id, topic = %debate.topic, "debate saved");
  Ok((StatusCode::CREATED, Json(debate)))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q: Option<String>,
}

/// `GET /debates/search?q=<text>`, a case-insensitive match on topic.
pub async fn search<S, T>(
  State(state): State<AppState<S, T>>,
  params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Debate>>, ApiError>
where
  S: DebateStore,
{
  let Query(params) = params?;
  let query = params
    .q
    .filter(|q| !q.is_empty())
    .ok_or_else(|| ApiError::Validation("Search query is required".to_owned()))?;

  let debates = state
    .store
    .search_debates(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(debates))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /debates/:id`
pub async fn get_one<S, T>(
  State(state): State<AppState<S, T>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Debate>, ApiError>
where
  S: DebateStore,
{
  let Path(id) = id?;
  let debate = state
    .store
    .get_debate(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Debate not found".to_owned()))?;
  Ok(Json(debate))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /debates/:id`
pub async fn delete_one<S, T>(
  State(state): State<AppState<S, T>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: DebateStore,
{
  let Path(id) = id?;
  let removed = state
    .store
    .delete_debate(id)
    .await
    .map_err(ApiError::store)?;

  if !removed {
    return Err(ApiError::NotFound("Debate not found".to_owned()));
  }
  tracing::info!(id, "debate deleted");
  Ok(StatusCode::NO_CONTENT)
}
