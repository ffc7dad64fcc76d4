use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use shared::domain::{ModelSelection, ViewMode};
use tracing::debug;

/// Raw storage key before encoding.
const CONTEXT_KEY_SOURCE: &str = "vdyp-projection-ctx";

pub fn storage_key() -> String {
    STANDARD.encode(CONTEXT_KEY_SOURCE)
}

/// Navigation intent carried across a reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionContext {
    NewProjection {
        model_selection: ModelSelection,
    },
    ExistingProjection {
        guid: String,
        view_mode: ViewMode,
    },
}

/// Stored shape. Every field is a plain string so nothing is trusted before
/// [`validate`] has looked at it.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StoredContext {
    New {
        #[serde(rename = "ms")]
        model_selection: String,
    },
    Existing {
        #[serde(rename = "g")]
        guid: String,
        #[serde(rename = "m")]
        view_mode: String,
    },
}

fn validate(stored: StoredContext) -> Option<SessionContext> {
    match stored {
        StoredContext::New { model_selection } => {
            let model_selection = ModelSelection::from_label(&model_selection)?;
            Some(SessionContext::NewProjection { model_selection })
        }
        StoredContext::Existing { guid, view_mode } => {
            if guid.trim().is_empty() {
                return None;
            }
            // An existing projection is never re-entered in create mode.
            let view_mode = match ViewMode::from_label(&view_mode)? {
                ViewMode::Create => return None,
                mode => mode,
            };
            Some(SessionContext::ExistingProjection { guid, view_mode })
        }
    }
}

/// Parses and validates an encoded context. Anything unexpected yields `None`.
pub fn decode_context(encoded: &str) -> Option<SessionContext> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    let stored: StoredContext = serde_json::from_slice(&bytes).ok()?;
    validate(stored)
}

pub fn encode_context(context: &SessionContext) -> String {
    let stored = match context {
        SessionContext::NewProjection { model_selection } => StoredContext::New {
            model_selection: model_selection.as_str().to_string(),
        },
        SessionContext::ExistingProjection { guid, view_mode } => StoredContext::Existing {
            guid: guid.clone(),
            view_mode: view_mode.as_str().to_string(),
        },
    };
    // Serializing a struct of strings cannot fail.
    let json = serde_json::to_vec(&stored).unwrap_or_default();
    STANDARD.encode(json)
}

/// Synchronous key/value storage scoped to one session.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String);
    fn remove_item(&self, key: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        let mut items = self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        items.insert(key.to_string(), value);
    }

    fn remove_item(&self, key: &str) {
        let mut items = self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        items.remove(key);
    }
}

/// Holds at most one [`SessionContext`] in the backing storage.
pub struct SessionContextStore<S: SessionStorage> {
    storage: S,
    key: String,
}

impl<S: SessionStorage> SessionContextStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: storage_key(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn save_new(&self, model_selection: ModelSelection) {
        self.save(&SessionContext::NewProjection { model_selection });
    }

    pub fn save_existing(&self, guid: impl Into<String>, view_mode: ViewMode) {
        self.save(&SessionContext::ExistingProjection {
            guid: guid.into(),
            view_mode,
        });
    }

    fn save(&self, context: &SessionContext) {
        self.storage.set_item(&self.key, encode_context(context));
    }

    pub fn load(&self) -> Option<SessionContext> {
        let encoded = self.storage.get_item(&self.key)?;
        let context = decode_context(&encoded);
        if context.is_none() {
            debug!("discarding unrecognised session context");
        }
        context
    }

    pub fn clear(&self) {
        self.storage.remove_item(&self.key);
    }
}

#[cfg(test)]
#[path = "tests/session_context_tests.rs"]
mod tests;
