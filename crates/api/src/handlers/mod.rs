pub mod cards;
pub mod events;
pub mod kv;
pub mod users;
