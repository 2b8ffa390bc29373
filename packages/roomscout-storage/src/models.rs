use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use roomscout_domain::{FilterMap, Role, filters_from_value};

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ChatSession {
	pub session_id: Uuid,
	pub session_token: String,
	pub search_context: Value,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
impl ChatSession {
	/// The accumulated filter state, read back as a [`FilterMap`].
	pub fn context(&self) -> FilterMap {
		filters_from_value(&self.search_context)
	}
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ChatMessage {
	pub message_id: Uuid,
	pub session_id: Uuid,
	pub role: String,
	pub content: String,
	pub extracted_filters: Option<Value>,
	pub result_count: Option<i32>,
	pub created_at: OffsetDateTime,
}

/// One turn to append to a session's transcript. Filter snapshot and result
/// count are only present on assistant turns.
#[derive(Debug)]
pub struct NewChatMessage<'a> {
	pub session_id: Uuid,
	pub role: Role,
	pub content: &'a str,
	pub extracted_filters: Option<&'a FilterMap>,
	pub result_count: Option<i32>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct PropertySummary {
	pub property_id: Uuid,
	pub title: String,
	pub price: i64,
	pub listing_type: String,
	pub bedrooms: Option<i32>,
	pub bathrooms: Option<i32>,
	pub locality: Option<String>,
	pub city: String,
	pub image: Option<String>,
}
