use std::sync::Mutex;

use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use roomscout_domain::{ChatTurn, FilterMap, Role};
use roomscout_storage::{
	BoxFuture, ChatStore, Error, PropertyStore, Result,
	models::{ChatMessage, ChatSession, NewChatMessage, PropertySummary},
};

/// In-memory [`ChatStore`] for tests that exercise the chat orchestration
/// without Postgres. Timestamps come from a deterministic counter so the
/// transcript order is stable.
#[derive(Default)]
pub struct MemoryChatStore {
	inner: Mutex<MemoryChatState>,
}

#[derive(Default)]
struct MemoryChatState {
	sessions: Vec<ChatSession>,
	messages: Vec<ChatMessage>,
	clock: i64,
}

impl MemoryChatStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn sessions(&self) -> Vec<ChatSession> {
		self.lock().sessions.clone()
	}

	pub fn messages(&self) -> Vec<ChatMessage> {
		self.lock().messages.clone()
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, MemoryChatState> {
		self.inner.lock().unwrap_or_else(|err| err.into_inner())
	}
}

impl MemoryChatState {
	fn tick(&mut self) -> OffsetDateTime {
		self.clock += 1;

		OffsetDateTime::from_unix_timestamp(1_700_000_000 + self.clock)
			.expect("deterministic test timestamp must be valid")
	}
}

impl ChatStore for MemoryChatStore {
	fn find_session<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<Option<ChatSession>>> {
		let found = self.lock().sessions.iter().find(|s| s.session_token == token).cloned();

		Box::pin(async move { Ok(found) })
	}

	fn create_session(&self) -> BoxFuture<'_, Result<ChatSession>> {
		let session = {
			let mut state = self.lock();
			let now = state.tick();
			let session = ChatSession {
				session_id: Uuid::new_v4(),
				session_token: Uuid::new_v4().to_string(),
				search_context: Value::Object(Map::new()),
				created_at: now,
				updated_at: now,
			};

			state.sessions.push(session.clone());

			session
		};

		Box::pin(async move { Ok(session) })
	}

	fn update_search_context<'a>(
		&'a self,
		session_id: Uuid,
		context: &'a FilterMap,
	) -> BoxFuture<'a, Result<()>> {
		let result = {
			let mut state = self.lock();
			let now = state.tick();

			match state.sessions.iter_mut().find(|s| s.session_id == session_id) {
				Some(session) => {
					session.search_context = Value::Object(context.clone());
					session.updated_at = now;

					Ok(())
				},
				None => Err(Error::NotFound(format!("Session {session_id} does not exist."))),
			}
		};

		Box::pin(async move { result })
	}

	fn append_message<'a>(&'a self, message: NewChatMessage<'a>) -> BoxFuture<'a, Result<()>> {
		{
			let mut state = self.lock();
			let now = state.tick();

			state.messages.push(ChatMessage {
				message_id: Uuid::new_v4(),
				session_id: message.session_id,
				role: message.role.as_str().to_string(),
				content: message.content.to_string(),
				extracted_filters: message
					.extracted_filters
					.map(|filters| Value::Object(filters.clone())),
				result_count: message.result_count,
				created_at: now,
			});
		}

		Box::pin(async move { Ok(()) })
	}

	fn recent_turns(&self, session_id: Uuid, limit: u32) -> BoxFuture<'_, Result<Vec<ChatTurn>>> {
		let result = {
			let state = self.lock();
			let turns: Result<Vec<ChatTurn>> = state
				.messages
				.iter()
				.filter(|m| m.session_id == session_id)
				.map(|m| {
					Role::parse(&m.role)
						.map(|role| ChatTurn { role, content: m.content.clone() })
						.ok_or_else(|| {
							Error::InvalidArgument(format!("Unknown message role {:?}.", m.role))
						})
				})
				.collect::<Result<_>>();

			turns.map(|mut turns: Vec<ChatTurn>| {
				let keep = turns.len().saturating_sub(limit as usize);

				turns.drain(..keep);

				turns
			})
		};

		Box::pin(async move { result })
	}

	fn full_messages(&self, session_id: Uuid) -> BoxFuture<'_, Result<Vec<ChatMessage>>> {
		let messages: Vec<_> =
			self.lock().messages.iter().filter(|m| m.session_id == session_id).cloned().collect();

		Box::pin(async move { Ok(messages) })
	}
}

/// In-memory [`PropertyStore`] that records every query it receives.
///
/// Filtering covers the keys present on [`PropertySummary`]; lifestyle
/// flags are visible to assertions through [`Self::recorded_queries`].
pub struct MemoryPropertyStore {
	properties: Vec<PropertySummary>,
	queries: Mutex<Vec<FilterMap>>,
}

impl MemoryPropertyStore {
	pub fn new(properties: Vec<PropertySummary>) -> Self {
		Self { properties, queries: Mutex::new(Vec::new()) }
	}

	pub fn recorded_queries(&self) -> Vec<FilterMap> {
		self.queries.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}

impl PropertyStore for MemoryPropertyStore {
	fn search<'a>(
		&'a self,
		filters: &'a FilterMap,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<PropertySummary>>> {
		self.queries.lock().unwrap_or_else(|err| err.into_inner()).push(filters.clone());

		let matches: Vec<_> = self
			.properties
			.iter()
			.filter(|property| summary_matches(property, filters))
			.take(limit as usize)
			.cloned()
			.collect();

		Box::pin(async move { Ok(matches) })
	}
}

fn summary_matches(property: &PropertySummary, filters: &FilterMap) -> bool {
	if let Some(city) = str_value(filters, "city")
		&& !property.city.to_lowercase().contains(&city.to_lowercase())
	{
		return false;
	}
	if let Some(locality) = str_value(filters, "locality") {
		let Some(value) = property.locality.as_deref() else {
			return false;
		};

		if !value.to_lowercase().contains(&locality.to_lowercase()) {
			return false;
		}
	}
	if let Some(listing_type) = str_value(filters, "listing_type")
		&& property.listing_type != listing_type
	{
		return false;
	}
	if let Some(bedrooms) = int_value(filters, "bedrooms")
		&& property.bedrooms != Some(bedrooms as i32)
	{
		return false;
	}
	if let Some(min_price) = int_value(filters, "min_price")
		&& property.price < min_price
	{
		return false;
	}
	if let Some(max_price) = int_value(filters, "max_price")
		&& property.price > max_price
	{
		return false;
	}

	true
}

fn str_value<'a>(filters: &'a FilterMap, key: &str) -> Option<&'a str> {
	filters.get(key).and_then(Value::as_str)
}

fn int_value(filters: &FilterMap, key: &str) -> Option<i64> {
	filters.get(key).and_then(Value::as_i64)
}
