use std::{future::Future, pin::Pin};

use uuid::Uuid;

use crate::{
	Result,
	models::{ChatMessage, ChatSession, NewChatMessage, PropertySummary},
};
use roomscout_domain::{ChatTurn, FilterMap};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Conversational session and transcript persistence.
///
/// Sessions are resolved by their opaque token; messages are an append-only
/// log ordered by creation time. Storage failures propagate to the caller.
pub trait ChatStore
where
	Self: Send + Sync,
{
	fn find_session<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<Option<ChatSession>>>;

	/// Inserts a session with an empty filter state and a freshly generated
	/// unique token.
	fn create_session(&self) -> BoxFuture<'_, Result<ChatSession>>;

	/// Overwrites the session's accumulated filter state with a merge result.
	fn update_search_context<'a>(
		&'a self,
		session_id: Uuid,
		context: &'a FilterMap,
	) -> BoxFuture<'a, Result<()>>;

	fn append_message<'a>(&'a self, message: NewChatMessage<'a>) -> BoxFuture<'a, Result<()>>;

	/// The most recent `limit` turns, returned oldest to newest.
	fn recent_turns(&self, session_id: Uuid, limit: u32) -> BoxFuture<'_, Result<Vec<ChatTurn>>>;

	/// The whole transcript, oldest to newest.
	fn full_messages(&self, session_id: Uuid) -> BoxFuture<'_, Result<Vec<ChatMessage>>>;
}

/// Bounded filter query over the property catalogue.
///
/// Consumes whichever keys of the merged filter map it recognizes and
/// ignores the rest; an empty result is not an error.
pub trait PropertyStore
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		filters: &'a FilterMap,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<PropertySummary>>>;
}
