//! Anonymous cookie-based sessions.
//!
//! Every request resolves to a [`User`]: a valid `userId` cookie loads
//! the stored record, anything else synthesizes a fresh anonymous user
//! with a 7-day session. User and session writes go straight to the
//! store -- they are not announced on the relay, so SSE clients only see
//! card traffic.

pub mod cookie;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use corkboard_core::user::{Session, User};
use corkboard_events::KvRelay;
use corkboard_kv::{KvError, KvKey};

use crate::keyspace;

/// Outcome of resolving a request's cookie header.
pub struct Resolved {
    pub user: User,
    /// `Set-Cookie` value the caller must attach to the response when a
    /// new session was issued.
    pub set_cookie: Option<String>,
}

/// Cookie-to-user resolution and session lifecycle over the KV store.
#[derive(Clone)]
pub struct SessionService {
    relay: Arc<KvRelay>,
}

impl SessionService {
    pub fn new(relay: Arc<KvRelay>) -> Self {
        Self { relay }
    }

    /// Resolve a request's cookie header to a user record.
    ///
    /// An existing user gets its session refreshed when the stored
    /// record lacks a valid one, and `last_seen` bumped. An absent or
    /// unresolvable cookie yields a brand-new anonymous user plus the
    /// `Set-Cookie` header for the caller to merge into the response.
    pub async fn resolve_user(&self, cookie_header: Option<&str>) -> Result<Resolved, KvError> {
        if let Some(user_id) = cookie::user_id_from_cookie(cookie_header) {
            if let Some(mut user) = self
                .relay
                .get_json::<User>(&keyspace::user(&user_id))
                .await?
            {
                let mut set_cookie = None;

                let has_valid_session = match &user.session_id {
                    Some(session_id) => self.validate_session(session_id).await?,
                    None => false,
                };
                if !has_valid_session {
                    let session = Session::new(&user.id);
                    user.session_id = Some(session.session_id.clone());
                    set_cookie = Some(session.cookie.clone());
                    self.put(&keyspace::session(&session.session_id), &session)
                        .await?;
                    tracing::debug!(user_id = %user.id, "reissued session");
                }

                user.last_seen = Utc::now();
                self.put(&keyspace::user(&user.id), &user).await?;

                return Ok(Resolved { user, set_cookie });
            }
        }

        // First contact, or a cookie pointing at nothing: start fresh.
        let mut user = User::anonymous();
        let session = Session::new(&user.id);
        user.session_id = Some(session.session_id.clone());

        self.put(&keyspace::session(&session.session_id), &session)
            .await?;
        self.put(&keyspace::user(&user.id), &user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "created anonymous user");
        Ok(Resolved {
            user,
            set_cookie: Some(session.cookie),
        })
    }

    /// Best-effort `last_seen` bump; not-found and store errors are
    /// swallowed.
    pub async fn touch_last_seen(&self, user_id: &str) {
        let key = keyspace::user(user_id);
        match self.relay.get_json::<User>(&key).await {
            Ok(Some(mut user)) => {
                user.last_seen = Utc::now();
                if let Err(error) = self.put(&key, &user).await {
                    tracing::debug!(user_id, %error, "failed to bump last_seen");
                }
            }
            Ok(None) => {}
            Err(error) => tracing::debug!(user_id, %error, "failed to load user for last_seen"),
        }
    }

    /// True when the session exists and has not expired. Expired
    /// sessions found here are deleted on the spot.
    pub async fn validate_session(&self, session_id: &str) -> Result<bool, KvError> {
        let key = keyspace::session(session_id);
        match self.relay.get_json::<Session>(&key).await? {
            Some(session) if session.is_expired(Utc::now()) => {
                self.relay.store().delete(&key).await?;
                tracing::debug!(session_id, "deleted expired session");
                Ok(false)
            }
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }

    /// Scan the whole sessions namespace and delete every expired
    /// record. Returns the number deleted.
    pub async fn sweep_expired_sessions(&self) -> Result<usize, KvError> {
        let entries = self
            .relay
            .store()
            .list(&keyspace::sessions_prefix(), None)
            .await?;

        let now = Utc::now();
        let mut deleted = 0;
        for entry in entries {
            let Ok(session) = serde_json::from_value::<Session>(entry.value) else {
                tracing::warn!(key = %entry.key, "skipping undecodable session record");
                continue;
            };
            if session.is_expired(now) {
                self.relay.store().delete(&entry.key).await?;
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn put<T: Serialize>(&self, key: &KvKey, value: &T) -> Result<(), KvError> {
        let value = serde_json::to_value(value)?;
        self.relay.store().set(key, value).await?;
        Ok(())
    }
}
