//! Route definitions, one module per resource.
//!
//! ```text
//! /health                         service health (no session)
//!
//! /cards/{type}/list              GET    list card metadata
//! /cards/{type}/create            POST   create a card
//! /cards/{type}/delete            POST   delete a card
//! /cards/{type}/api               GET    fetch one card
//!                                 POST   append a message
//!                                 DELETE remove a message
//! /cards/{type}/api/messages      GET    list messages
//!
//! /kv/get                         GET    raw read
//! /kv/set                         POST   raw write
//!
//! /events                         GET    SSE live updates
//!
//! /me                             GET    current user
//! /me/preferences                 PUT    update preferences
//! ```

pub mod cards;
pub mod events;
pub mod health;
pub mod kv;
pub mod users;
