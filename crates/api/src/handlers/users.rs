//! Current-user endpoints.

use std::collections::HashMap;

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;

use corkboard_core::error::CoreError;
use corkboard_core::user::User;
use corkboard_kv::KvError;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::keyspace;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub theme: Option<String>,
    pub language: Option<String>,
    pub notifications: Option<bool>,
    /// Unknown keys merge into the open-ended extension map.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// GET /me
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}

/// PUT /me/preferences
///
/// Partial update: absent fields keep their stored values.
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(body): AppJson<UpdatePreferencesRequest>,
) -> AppResult<Json<User>> {
    let key = keyspace::user(&user.id);
    let mut stored = state
        .relay
        .get_json::<User>(&key)
        .await?
        .ok_or(CoreError::NotFound)?;

    if let Some(theme) = body.theme {
        stored.preferences.theme = theme;
    }
    if let Some(language) = body.language {
        stored.preferences.language = language;
    }
    if let Some(notifications) = body.notifications {
        stored.preferences.notifications = notifications;
    }
    stored.preferences.extra.extend(body.extra);

    let value = serde_json::to_value(&stored).map_err(KvError::from)?;
    state.relay.store().set(&key, value).await?;

    tracing::debug!(user_id = %stored.id, "preferences updated");
    Ok(Json(stored))
}
