//! Process-lifetime cache of generated debate points.
//!
//! Keyed by `(topic, language, complexity)`. Entries never expire. Each key
//! owns a [`OnceCell`], so concurrent identical requests wait on a single
//! upstream call instead of racing. A failed generation drops its key, so the
//! next request tries again.

use std::{collections::HashMap, future::Future, sync::Arc};

use rebut_core::{
  debate::DebatePoint,
  topic::{Complexity, DebateTopicRequest},
};
use tokio::sync::{Mutex, OnceCell};

type Key = (String, String, Complexity);

#[derive(Default)]
pub struct GenerationCache {
  cells: Mutex<HashMap<Key, Arc<OnceCell<DebatePoint>>>>,
}

impl GenerationCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Return the cached points for `request`, or run `generate` to fill them.
  pub async fn get_or_generate<F, Fut, E>(
    &self,
    request: &DebateTopicRequest,
    generate: F,
  ) -> Result<DebatePoint, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<DebatePoint, E>>,
  {
    let key = (
      request.topic.clone(),
      request.language.clone(),
      request.complexity,
    );
    let cell = self.cells.lock().await.entry(key.clone()).or_default().clone();

    if let Some(points) = cell.get() {
      tracing::debug!(topic = %request.topic, "debate cache hit");
      return Ok(points.clone());
    }

    tracing::debug!(topic = %request.topic, "debate cache miss");
    let result = cell.get_or_try_init(generate).await.cloned();
    if result.is_err() {
      self.forget(&key, &cell).await;
    }
    result
  }

  /// Drop the empty cell for `key` once no other request is waiting on it.
  async fn forget(&self, key: &Key, cell: &Arc<OnceCell<DebatePoint>>) {
    let mut cells = self.cells.lock().await;
    let idle = cells.get(key).is_some_and(|current| {
      Arc::ptr_eq(current, cell) && !current.initialized() && Arc::strong_count(cell) == 2
    });
    if idle {
      cells.remove(key);
    }
  }

  /// Number of keys with a stored result.
  #[cfg(test)]
  async fn len(&self) -> usize {
    self
      .cells
      .lock()
      .await
      .values()
      .filter(|c| c.initialized())
      .count()
  }

  #[cfg(test)]
  async fn is_empty(&self) -> bool {
    self.len().await == 0
  }
}
