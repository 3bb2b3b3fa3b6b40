//! Handlers for the generic `/cards/{type}` router.
//!
//! One set of handlers serves every card type; the `{card_type}` path
//! segment selects a [`CardTypeConfig`](crate::cards::CardTypeConfig)
//! from the registry. Unknown types are 404, invalid identifier
//! characters 400.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::DateTime;
use serde::Deserialize;
use serde_json::{json, Value};

use corkboard_core::card::{BaseCard, CardAuthor, CardData, CardPermissions};
use corkboard_core::error::CoreError;
use corkboard_core::message::CardMessage;

use crate::cards::CardTypeConfig;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::keyspace;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub name: Option<String>,
    /// Optional type-specific payload; the type's default when omitted.
    pub content: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCardRequest {
    pub card_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMessageRequest {
    pub card_id: Option<String>,
    /// `text` and `content` are interchangeable; `text` wins when both
    /// are present.
    pub text: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageRequest {
    pub card_id: Option<String>,
    pub message_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardQuery {
    pub card_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesQuery {
    pub card_id: Option<String>,
    pub limit: Option<usize>,
    /// Exclusive lower bound, epoch milliseconds.
    pub after: Option<i64>,
    /// Exclusive upper bound, epoch milliseconds.
    pub before: Option<i64>,
}

// ---------------------------------------------------------------------------
// Shared lookups
// ---------------------------------------------------------------------------

fn resolve_type<'a>(state: &'a AppState, card_type: &str) -> Result<&'a CardTypeConfig, AppError> {
    if !keyspace::is_valid_identifier(card_type) {
        return Err(CoreError::Validation("invalid card type".into()).into());
    }
    state
        .cards
        .get(card_type)
        .ok_or_else(|| CoreError::NotFound.into())
}

fn require_card_id(card_id: Option<String>) -> Result<String, AppError> {
    let card_id = card_id.unwrap_or_default();
    if card_id.is_empty() {
        return Err(CoreError::Validation("cardId is required".into()).into());
    }
    if !keyspace::is_valid_identifier(&card_id) {
        return Err(CoreError::Validation("invalid card id".into()).into());
    }
    Ok(card_id)
}

// ---------------------------------------------------------------------------
// Card CRUD
// ---------------------------------------------------------------------------

/// GET /cards/{type}/list
///
/// Every metadata record of this type, in natural key order.
pub async fn list_cards(
    State(state): State<AppState>,
    Path(card_type): Path<String>,
) -> AppResult<Json<Vec<BaseCard>>> {
    let config = resolve_type(&state, &card_type)?;

    let entries = state
        .relay
        .store()
        .list(&keyspace::card_meta_prefix(config.name), None)
        .await?;

    let cards = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry.value) {
            Ok(card) => Some(card),
            Err(error) => {
                tracing::warn!(key = %entry.key, %error, "skipping undecodable card record");
                None
            }
        })
        .collect();

    Ok(Json(cards))
}

/// POST /cards/{type}/create
///
/// Writes the metadata record and the empty message container as two
/// separate announced writes; there is no transaction spanning them, so
/// a crash in between leaves the pair out of sync.
pub async fn create_card(
    State(state): State<AppState>,
    Path(card_type): Path<String>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(body): AppJson<CreateCardRequest>,
) -> AppResult<Json<BaseCard>> {
    let config = resolve_type(&state, &card_type)?;

    let name = body.name.unwrap_or_default();
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Name is required".into()).into());
    }

    let content = body
        .content
        .unwrap_or_else(|| (config.default_content)());
    if let Some(validate) = config.validate_content {
        validate(&content)?;
    }

    let card = BaseCard::new(config.name, name, CardAuthor::from(&user), content);

    state
        .relay
        .set_json(&keyspace::card_meta(config.name, &card.id), &card)
        .await?;
    state
        .relay
        .set_json(
            &keyspace::card_data(config.name, &card.id),
            &CardData::empty(&card.id),
        )
        .await?;

    tracing::info!(card_id = %card.id, card_type = config.name, user_id = %user.id, "card created");
    Ok(Json(card))
}

/// POST /cards/{type}/delete
///
/// Existence is checked on the metadata record only; the data record is
/// deleted blind.
pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_type): Path<String>,
    AppJson(body): AppJson<DeleteCardRequest>,
) -> AppResult<Json<Value>> {
    let config = resolve_type(&state, &card_type)?;
    let card_id = require_card_id(body.card_id)?;

    let meta_key = keyspace::card_meta(config.name, &card_id);
    if state.relay.store().get(&meta_key).await?.is_none() {
        return Err(CoreError::NotFound.into());
    }

    state.relay.delete(&meta_key).await?;
    state
        .relay
        .delete(&keyspace::card_data(config.name, &card_id))
        .await?;

    tracing::info!(card_id = %card_id, card_type = config.name, "card deleted");
    Ok(Json(json!({ "success": true })))
}

/// GET /cards/{type}/api?cardId=
pub async fn get_card(
    State(state): State<AppState>,
    Path(card_type): Path<String>,
    Query(query): Query<CardQuery>,
) -> AppResult<Json<BaseCard>> {
    let config = resolve_type(&state, &card_type)?;
    let card_id = require_card_id(query.card_id)?;

    let card = state
        .relay
        .get_json::<BaseCard>(&keyspace::card_meta(config.name, &card_id))
        .await?
        .ok_or(CoreError::NotFound)?;

    Ok(Json(card))
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// POST /cards/{type}/api
///
/// Append a message. This is a whole-record read-modify-write with no
/// version check: two concurrent appends to the same card can race and
/// one update is silently lost.
pub async fn add_message(
    State(state): State<AppState>,
    Path(card_type): Path<String>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(body): AppJson<AddMessageRequest>,
) -> AppResult<Json<CardMessage>> {
    let config = resolve_type(&state, &card_type)?;
    let card_id = require_card_id(body.card_id)?;

    let content = body.text.or(body.content).unwrap_or_default();
    if content.is_empty() {
        return Err(CoreError::Validation("text is required".into()).into());
    }

    let data_key = keyspace::card_data(config.name, &card_id);
    let mut data = state
        .relay
        .get_json::<CardData>(&data_key)
        .await?
        .ok_or(CoreError::NotFound)?;

    let message = CardMessage::text(&card_id, &content, CardAuthor::from(&user));
    data.messages.push(message.clone());

    state.relay.set_json(&data_key, &data).await?;

    tracing::debug!(card_id = %card_id, message_id = %message.id, "message appended");
    Ok(Json(message))
}

/// DELETE /cards/{type}/api
///
/// Remove a message. Allowed for the message author, the card creator,
/// and anyone covered by the card's delete permission list.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(card_type): Path<String>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(body): AppJson<DeleteMessageRequest>,
) -> AppResult<Json<Value>> {
    let config = resolve_type(&state, &card_type)?;
    let card_id = require_card_id(body.card_id)?;

    let message_id = body.message_id.unwrap_or_default();
    if message_id.is_empty() {
        return Err(CoreError::Validation("messageId is required".into()).into());
    }

    let card = state
        .relay
        .get_json::<BaseCard>(&keyspace::card_meta(config.name, &card_id))
        .await?
        .ok_or(CoreError::NotFound)?;

    let data_key = keyspace::card_data(config.name, &card_id);
    let mut data = state
        .relay
        .get_json::<CardData>(&data_key)
        .await?
        .ok_or(CoreError::NotFound)?;

    let message = data
        .messages
        .iter()
        .find(|message| message.id == message_id)
        .ok_or(CoreError::NotFound)?;

    let allowed = message.author.id == user.id
        || card.created_by.id == user.id
        || CardPermissions::grants(&card.metadata.permissions.can_delete, &user.id);
    if !allowed {
        return Err(CoreError::Forbidden.into());
    }

    data.messages.retain(|message| message.id != message_id);
    state.relay.set_json(&data_key, &data).await?;

    tracing::debug!(card_id = %card_id, message_id = %message_id, "message deleted");
    Ok(Json(json!({ "success": true })))
}

/// GET /cards/{type}/api/messages?cardId=&limit=&before=&after=
///
/// Messages ascending by timestamp, windowed by the optional
/// millisecond bounds.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(card_type): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> AppResult<Json<Vec<CardMessage>>> {
    let config = resolve_type(&state, &card_type)?;
    let card_id = require_card_id(query.card_id)?;

    let data = state
        .relay
        .get_json::<CardData>(&keyspace::card_data(config.name, &card_id))
        .await?
        .ok_or(CoreError::NotFound)?;

    let mut messages = data.messages;

    if let Some(after) = query.after.and_then(DateTime::from_timestamp_millis) {
        messages.retain(|message| message.timestamp > after);
    }
    if let Some(before) = query.before.and_then(DateTime::from_timestamp_millis) {
        messages.retain(|message| message.timestamp < before);
    }

    messages.sort_by_key(|message| message.timestamp);

    if let Some(limit) = query.limit {
        messages.truncate(limit);
    }

    Ok(Json(messages))
}
