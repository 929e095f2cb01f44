//! Shared fixtures for the wiremock-backed tests

#![allow(dead_code)]

use dorkscope::config::Settings;
use dorkscope::dispatch::{Dispatcher, Scanner};
use dorkscope::network::HttpClient;
use dorkscope::providers::{ProviderKind, ProviderLoader};
use std::sync::Arc;
use wiremock::MockServer;

pub const INSTRUCTION: &str = "Return only valid JSON.";

/// Settings with every provider pointed at `base_url`
pub fn settings_for(base_url: &str) -> Settings {
    let mut settings = Settings::default();
    for kind in ProviderKind::ALL {
        settings.providers.get_mut(kind).base_url = Some(base_url.to_string());
    }
    settings.analysis.instruction = INSTRUCTION.to_string();
    settings
}

pub fn dispatcher_for(base_url: &str) -> Dispatcher {
    let settings = settings_for(base_url);
    let registry = ProviderLoader::load(&settings.providers).unwrap();
    Dispatcher::new(
        HttpClient::new().unwrap(),
        Arc::new(registry),
        settings.analysis.instruction,
    )
}

pub fn dispatcher(server: &MockServer) -> Dispatcher {
    dispatcher_for(&server.uri())
}

pub fn scanner(server: &MockServer) -> Scanner {
    let settings = settings_for(&server.uri());
    Scanner::new(
        Arc::new(dispatcher(server)),
        settings.scan,
        settings.templates,
    )
}

pub fn chat_completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "gen-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

pub fn brave_results(count: usize) -> serde_json::Value {
    let results: Vec<_> = (0..count)
        .map(|i| {
            serde_json::json!({
                "title": format!("Result {}", i),
                "url": format!("https://example.com/{}", i),
                "description": format!("Snippet {}", i)
            })
        })
        .collect();
    serde_json::json!({ "web": { "results": results } })
}
