//! Route definitions for the generic card router.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cards;
use crate::state::AppState;

/// Routes mounted at `/cards/{card_type}`.
///
/// ```text
/// GET    /list           -> list_cards
/// POST   /create         -> create_card
/// POST   /delete         -> delete_card
/// GET    /api            -> get_card
/// POST   /api            -> add_message
/// DELETE /api            -> delete_message
/// GET    /api/messages   -> list_messages
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cards/{card_type}/list", get(cards::list_cards))
        .route("/cards/{card_type}/create", post(cards::create_card))
        .route("/cards/{card_type}/delete", post(cards::delete_card))
        .route(
            "/cards/{card_type}/api",
            get(cards::get_card)
                .post(cards::add_message)
                .delete(cards::delete_message),
        )
        .route("/cards/{card_type}/api/messages", get(cards::list_messages))
}
