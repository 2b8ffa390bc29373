pub mod chat;
pub mod history;
pub mod intent;
pub mod reply;
pub mod session;
pub mod time_serde;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

pub use chat::{ChatRequest, ChatResponse, PropertyCard};
pub use history::{HistoryMessage, HistoryResponse};
pub use intent::IntentOutcome;

use roomscout_config::{Config, LlmProviderConfig};
use roomscout_storage::{ChatStore, PropertyStore};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Structured-output language-model call that turns free text plus recent
/// history into a filter object.
pub trait IntentProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<Value>>;
}

/// Free-text language-model call that produces the user-facing reply.
pub trait ReplyProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	NotFound { message: String },
	Provider { message: String },
	Storage { message: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::NotFound { message } => write!(f, "Not found: {message}"),
			Self::Provider { message } => write!(f, "Provider error: {message}"),
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<roomscout_storage::Error> for ServiceError {
	fn from(err: roomscout_storage::Error) -> Self {
		match err {
			roomscout_storage::Error::NotFound(message) => Self::NotFound { message },
			err => Self::Storage { message: err.to_string() },
		}
	}
}

impl From<color_eyre::Report> for ServiceError {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

#[derive(Clone)]
pub struct Providers {
	pub intent: Arc<dyn IntentProvider>,
	pub reply: Arc<dyn ReplyProvider>,
}
impl Providers {
	pub fn new(intent: Arc<dyn IntentProvider>, reply: Arc<dyn ReplyProvider>) -> Self {
		Self { intent, reply }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { intent: provider.clone(), reply: provider }
	}
}

#[derive(Clone)]
pub struct Stores {
	pub chat: Arc<dyn ChatStore>,
	pub properties: Arc<dyn PropertyStore>,
}
impl Stores {
	pub fn new(chat: Arc<dyn ChatStore>, properties: Arc<dyn PropertyStore>) -> Self {
		Self { chat, properties }
	}
}

pub struct ChatService {
	pub cfg: Config,
	pub stores: Stores,
	pub providers: Providers,
}
impl ChatService {
	pub fn new(cfg: Config, stores: Stores) -> Self {
		Self { cfg, stores, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, stores: Stores, providers: Providers) -> Self {
		Self { cfg, stores, providers }
	}
}

struct DefaultProviders;

impl IntentProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(roomscout_providers::intent::extract(cfg, messages))
	}
}

impl ReplyProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(roomscout_providers::reply::generate(cfg, messages))
	}
}
