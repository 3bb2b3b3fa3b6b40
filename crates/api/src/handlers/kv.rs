//! Raw KV passthrough endpoints.
//!
//! Keys arrive as comma-separated strings (`key=cards,info,meta,x`) and
//! pass a charset whitelist before touching the store.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use corkboard_core::error::CoreError;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::keyspace;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RawKeyQuery {
    pub key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetValueRequest {
    pub key: Option<String>,
    pub value: Option<Value>,
}

/// GET /kv/get?key=a,b,c
///
/// `value` is `null` when the key is absent.
pub async fn get_value(
    State(state): State<AppState>,
    Query(query): Query<RawKeyQuery>,
) -> AppResult<Json<Value>> {
    let key = keyspace::parse_raw_key(&query.key.unwrap_or_default())?;

    let entry = state.relay.store().get(&key).await?;

    Ok(Json(json!({
        "key": key,
        "value": entry.map(|entry| entry.value),
    })))
}

/// POST /kv/set {key, value}
///
/// The write is announced on the relay like any card mutation.
pub async fn set_value(
    State(state): State<AppState>,
    AppJson(body): AppJson<SetValueRequest>,
) -> AppResult<Json<Value>> {
    let key = keyspace::parse_raw_key(&body.key.unwrap_or_default())?;
    let value = body
        .value
        .ok_or_else(|| CoreError::Validation("value is required".to_string()))?;

    state.relay.set(&key, value).await?;

    Ok(Json(json!({ "success": true })))
}
