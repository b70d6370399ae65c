//! Scriptable transport for dispatcher tests.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::config::SkillsConfig;
use super::registry::SkillRegistry;
use super::transport::{SkillTransport, TransportError, TransportResponse};
use super::SkillDispatcher;

pub const BASE_URL: &str = "https://proj.test";
pub const ACCESS_KEY: &str = "anon-key";

#[derive(Debug, Clone)]
pub enum MockReply {
    Status(u16, String),
    Fail(String),
    Panic(String),
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub bearer: String,
    pub body: Value,
}

pub struct MockTransport {
    default: MockReply,
    routes: Vec<(String, MockReply)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn replying(status: u16, body: impl Into<String>) -> Self {
        Self { default: MockReply::Status(status, body.into()), routes: Vec::new(), calls: Mutex::new(Vec::new()) }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { default: MockReply::Fail(message.into()), routes: Vec::new(), calls: Mutex::new(Vec::new()) }
    }

    /// Reply with `reply` for URLs ending in `suffix`.
    pub fn route(mut self, suffix: &str, reply: MockReply) -> Self {
        self.routes.push((suffix.to_string(), reply));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl SkillTransport for MockTransport {
    async fn post_json(&self, url: &str, bearer: &str, body: &Value) -> Result<TransportResponse, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            bearer: bearer.to_string(),
            body: body.clone(),
        });
        let reply = self
            .routes
            .iter()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
            .map_or(&self.default, |(_, reply)| reply);
        match reply {
            MockReply::Status(status, body) => Ok(TransportResponse { status: *status, body: body.clone() }),
            MockReply::Fail(message) => Err(TransportError::Request(message.clone())),
            MockReply::Panic(message) => panic!("{message}"),
        }
    }
}

pub fn configured() -> SkillsConfig {
    SkillsConfig::new(BASE_URL, ACCESS_KEY)
}

pub fn dispatcher(transport: &Arc<MockTransport>) -> SkillDispatcher {
    SkillDispatcher::new(SkillRegistry::builtin(), configured(), transport.clone())
}
