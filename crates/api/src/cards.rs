//! Card type registry.
//!
//! One generic router serves every card type; behaviour differences live
//! in a [`CardTypeConfig`] value per type rather than in per-type code.

use std::collections::HashMap;

use corkboard_core::error::CoreError;

/// Optional content hook run at card creation.
pub type ContentValidator = fn(&serde_json::Value) -> Result<(), CoreError>;

/// Per-type configuration: the namespace string plus optional hooks.
pub struct CardTypeConfig {
    /// Namespace segment used in routes and KV keys.
    pub name: &'static str,
    /// Produces the content payload for a card created without one.
    pub default_content: fn() -> serde_json::Value,
    /// Rejects unacceptable creation payloads; `None` accepts anything.
    pub validate_content: Option<ContentValidator>,
}

/// Lookup table of known card types.
pub struct CardRegistry {
    types: HashMap<&'static str, CardTypeConfig>,
}

impl CardRegistry {
    /// Registry with the built-in types: `info`, `test`, `message`.
    pub fn builtin() -> Self {
        let mut registry = Self {
            types: HashMap::new(),
        };
        registry.register(CardTypeConfig {
            name: "info",
            default_content: || serde_json::json!({ "description": "" }),
            validate_content: None,
        });
        registry.register(CardTypeConfig {
            name: "test",
            default_content: || serde_json::json!({}),
            validate_content: None,
        });
        registry.register(CardTypeConfig {
            name: "message",
            default_content: || serde_json::json!({}),
            validate_content: None,
        });
        registry
    }

    pub fn register(&mut self, config: CardTypeConfig) {
        self.types.insert(config.name, config);
    }

    pub fn get(&self, name: &str) -> Option<&CardTypeConfig> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
