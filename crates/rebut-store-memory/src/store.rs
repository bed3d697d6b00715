//! [`MemoryStore`], the in-process implementation of [`DebateStore`].

use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use tokio::sync::RwLock;

use rebut_core::{
  debate::{Debate, NewDebate},
  store::DebateStore,
  topic::DEFAULT_LANGUAGE,
  user::{NewUser, User},
};

use crate::Result;

// ─── Tables ──────────────────────────────────────────────────────────────────

/// Both tables plus their id counters. Ids start at 1 and are never reused.
struct Tables {
  debates:        BTreeMap<i64, Debate>,
  users:          BTreeMap<i64, User>,
  next_debate_id: i64,
  next_user_id:   i64,
}

impl Default for Tables {
  fn default() -> Self {
    Self {
      debates:        BTreeMap::new(),
      users:          BTreeMap::new(),
      next_debate_id: 1,
      next_user_id:   1,
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A non-durable debate store backed by ordered maps.
///
/// Clones share the same reference-counted tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
  tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
  /// Create an empty store.
  pub fn new() -> Self {
    Self::default()
  }
}

// ─── DebateStore impl ────────────────────────────────────────────────────────

impl DebateStore for MemoryStore {
  type Error = crate::Error;

  // ── Debates ───────────────────────────────────────────────────────────────

  async fn get_debate(&self, id: i64) -> Result<Option<Debate>> {
    Ok(self.tables.read().await.debates.get(&id).cloned())
  }

  async fn get_debates_by_user_id(&self, user_id: Option<i64>) -> Result<Vec<Debate>> {
    let Some(user_id) = user_id else {
      return self.get_all_debates().await;
    };

    let tables = self.tables.read().await;
    Ok(
      tables
        .debates
        .values()
        .filter(|d| d.user_id == Some(user_id))
        .cloned()
        .collect(),
    )
  }

  async fn create_debate(&self, input: NewDebate) -> Result<Debate> {
    let mut tables = self.tables.write().await;
    let id = tables.next_debate_id;
    tables.next_debate_id += 1;

    let debate = Debate {
      id,
      topic:      input.topic,
      points:     input.points,
      user_id:    input.user_id,
      language:   Some(
        input
          .language
          .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
      ),
      format:     input.format,
      created_at: Utc::now(),
    };

    tables.debates.insert(id, debate.clone());
    tracing::debug!(id, topic = %debate.topic, "debate created");
    Ok(debate)
  }

  async fn delete_debate(&self, id: i64) -> Result<bool> {
    let removed = self.tables.write().await.debates.remove(&id).is_some();
    if removed {
      tracing::debug!(id, "debate deleted");
    }
    Ok(removed)
  }

  async fn get_all_debates(&self) -> Result<Vec<Debate>> {
    Ok(self.tables.read().await.debates.values().cloned().collect())
  }

  async fn search_debates(&self, query: &str) -> Result<Vec<Debate>> {
    let needle = query.to_lowercase();
    let tables = self.tables.read().await;
    Ok(
      tables
        .debates
        .values()
        .filter(|d| d.topic.to_lowercase().contains(&needle))
        .cloned()
        .collect(),
    )
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    Ok(self.tables.read().await.users.get(&id).cloned())
  }

  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let tables = self.tables.read().await;
    Ok(tables.users.values().find(|u| u.username == username).cloned())
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let mut tables = self.tables.write().await;
    if tables.users.values().any(|u| u.username == input.username) {
      return Err(rebut_core::Error::UsernameTaken(input.username).into());
    }

    let id = tables.next_user_id;
    tables.next_user_id += 1;

    let user = User {
      id,
      username:    input.username,
      password:    input.password,
      preferences: serde_json::json!({}),
      created_at:  Utc::now(),
    };

    tables.users.insert(id, user.clone());
    Ok(user)
  }
}
