//! Session-resolving middleware.
//!
//! Runs before every card/kv/events/user handler: resolves the request
//! cookie to a user (creating one on first contact), stores it as a
//! request extension, and merges any freshly issued `Set-Cookie` into
//! the response.

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

use corkboard_core::user::User;

use crate::error::AppError;
use crate::state::AppState;

/// The acting user for the current request, available to handlers via
/// `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub async fn resolve_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let cookie_header = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);

    let resolved = state.sessions.resolve_user(cookie_header.as_deref()).await?;
    request.extensions_mut().insert(CurrentUser(resolved.user));

    let mut response = next.run(request).await;

    if let Some(cookie) = resolved.set_cookie {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(error) => tracing::error!(%error, "session cookie is not a valid header value"),
        }
    }

    Ok(response)
}
