use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub chat: Chat,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub intent: LlmProviderConfig,
	pub reply: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub max_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Chat {
	/// How many stored turns are loaded as conversational context per chat turn.
	pub history_limit: u32,
	/// How many of the loaded turns are forwarded to the intent extractor.
	pub intent_context_turns: u32,
	/// How many of the loaded turns are forwarded to the reply generator.
	pub reply_context_turns: u32,
	/// Maximum number of property summaries returned per turn.
	pub result_limit: u32,
}
impl Default for Chat {
	fn default() -> Self {
		Self { history_limit: 10, intent_context_turns: 6, reply_context_turns: 4, result_limit: 6 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}
