//! Named command registry.
//!
//! A [`CommandRegistry`] is built once at start-up and maps command names to
//! typed handlers. Payloads arrive as JSON and are deserialized into each
//! handler's input type; results are serialized back to JSON.

pub mod alias;
pub mod builtin;

pub use builtin::default_registry;

use crate::error::{JarvisError, Result};
use crate::table::TableStorage;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// What a handler can reach while it runs.
pub struct Ctx<'a> {
    pub storage: &'a dyn TableStorage,
    pub registry: &'a CommandRegistry,
}

type Handler = Box<dyn Fn(&Ctx<'_>, Value) -> Result<Value> + Send + Sync>;

#[derive(Default)]
pub struct CommandRegistry {
    handlers: BTreeMap<String, Handler>,
    fallbacks: BTreeMap<String, Value>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.handlers.keys().collect::<Vec<_>>())
            .field("fallbacks", &self.fallbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous handler.
    pub fn register<I, O, F>(&mut self, name: impl Into<String>, handler: F)
    where
        I: DeserializeOwned,
        O: Serialize,
        F: Fn(&Ctx<'_>, I) -> Result<O> + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        let erased: Handler = Box::new(move |ctx, payload| {
            let input: I = serde_json::from_value(payload)
                .map_err(|e| JarvisError::InvalidPayload(format!("{label}: {e}")))?;
            let output = handler(ctx, input)?;
            Ok(serde_json::to_value(output)?)
        });
        self.handlers.insert(name, erased);
    }

    /// Payload used by [`CommandRegistry::route`] when the caller sends none.
    pub fn set_fallback(&mut self, name: impl Into<String>, payload: Value) {
        self.fallbacks.insert(name.into(), payload);
    }

    pub fn with_fallback(mut self, name: impl Into<String>, payload: Value) -> Self {
        self.set_fallback(name, payload);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Run `name` with `payload`. Unknown names fail before storage is read.
    pub fn dispatch(&self, storage: &dyn TableStorage, name: &str, payload: Value) -> Result<Value> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| JarvisError::UnknownCommand(name.to_string()))?;
        tracing::debug!(command = name, "dispatching");
        let ctx = Ctx {
            storage,
            registry: self,
        };
        handler(&ctx, payload)
    }

    /// Dispatch with `data` when it is a non-empty object, otherwise with the
    /// registered fallback payload for `name`.
    pub fn route(&self, storage: &dyn TableStorage, name: &str, data: Option<Value>) -> Result<Value> {
        if !self.contains(name) {
            return Err(JarvisError::UnknownCommand(name.to_string()));
        }
        match data {
            Some(Value::Object(map)) if !map.is_empty() => {
                self.dispatch(storage, name, Value::Object(map))
            }
            _ => {
                let fallback = self
                    .fallbacks
                    .get(name)
                    .cloned()
                    .ok_or_else(|| JarvisError::NoFallbackPayload(name.to_string()))?;
                tracing::info!(command = name, "using fallback payload");
                self.dispatch(storage, name, fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::MemoryStorage;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Echo {
        word: String,
    }

    fn registry() -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        reg.register("echo", |_ctx, input: Echo| Ok(input.word));
        reg.with_fallback("echo", json!({ "word": "default" }))
    }

    #[test]
    fn dispatch_runs_typed_handler() {
        let storage = MemoryStorage::new();
        let out = registry()
            .dispatch(&storage, "echo", json!({ "word": "hi" }))
            .unwrap();
        assert_eq!(out, json!("hi"));
    }

    #[test]
    fn unknown_command_fails() {
        let storage = MemoryStorage::new();
        let err = registry().dispatch(&storage, "nope", json!({})).unwrap_err();
        assert!(matches!(err, JarvisError::UnknownCommand(n) if n == "nope"));
    }

    #[test]
    fn bad_payload_is_invalid() {
        let storage = MemoryStorage::new();
        let err = registry()
            .dispatch(&storage, "echo", json!({ "word": 3 }))
            .unwrap_err();
        assert!(matches!(err, JarvisError::InvalidPayload(_)));
    }

    #[test]
    fn route_prefers_data_then_fallback() {
        let storage = MemoryStorage::new();
        let reg = registry();
        let given = reg
            .route(&storage, "echo", Some(json!({ "word": "given" })))
            .unwrap();
        assert_eq!(given, json!("given"));
        assert_eq!(reg.route(&storage, "echo", None).unwrap(), json!("default"));
        assert_eq!(
            reg.route(&storage, "echo", Some(json!({}))).unwrap(),
            json!("default")
        );
    }

    #[test]
    fn route_without_fallback_fails() {
        let storage = MemoryStorage::new();
        let mut reg = CommandRegistry::new();
        reg.register("echo", |_ctx, input: Echo| Ok(input.word));
        let err = reg.route(&storage, "echo", None).unwrap_err();
        assert!(matches!(err, JarvisError::NoFallbackPayload(_)));
        assert!(matches!(
            reg.route(&storage, "other", None),
            Err(JarvisError::UnknownCommand(_))
        ));
    }
}
