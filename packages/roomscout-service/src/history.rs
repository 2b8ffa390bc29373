use serde::Serialize;

use crate::{ChatService, ServiceError, ServiceResult};
use roomscout_domain::FilterMap;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
	pub session_token: String,
	pub context: FilterMap,
	pub messages: Vec<HistoryMessage>,
}

#[derive(Clone, Debug, Serialize)]
pub struct HistoryMessage {
	pub role: String,
	pub content: String,
	#[serde(with = "crate::time_serde")]
	pub timestamp: time::OffsetDateTime,
}

impl ChatService {
	/// Read-only transcript retrieval: no merging, no model calls.
	pub async fn history(&self, token: &str) -> ServiceResult<HistoryResponse> {
		let Some(session) = self.stores.chat.find_session(token).await? else {
			return Err(ServiceError::NotFound { message: "Session not found.".to_string() });
		};
		let messages = self.stores.chat.full_messages(session.session_id).await?;
		let context = session.context();

		Ok(HistoryResponse {
			session_token: session.session_token,
			context,
			messages: messages
				.into_iter()
				.map(|message| HistoryMessage {
					role: message.role,
					content: message.content,
					timestamp: message.created_at,
				})
				.collect(),
		})
	}
}
