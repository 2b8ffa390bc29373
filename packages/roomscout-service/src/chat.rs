use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ChatService, ServiceError, ServiceResult};
use roomscout_domain::{FilterMap, Role, merge};
use roomscout_storage::models::{NewChatMessage, PropertySummary};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
	pub message: Option<String>,
	pub session_token: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
	pub session_token: String,
	pub message: String,
	pub filters: FilterMap,
	pub properties: Vec<PropertyCard>,
	pub total_results: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct PropertyCard {
	pub id: Uuid,
	pub title: String,
	pub price: i64,
	pub listing_type: String,
	pub bedrooms: Option<i32>,
	pub bathrooms: Option<i32>,
	pub locality: Option<String>,
	pub city: String,
	pub image: Option<String>,
}
impl From<PropertySummary> for PropertyCard {
	fn from(summary: PropertySummary) -> Self {
		Self {
			id: summary.property_id,
			title: summary.title,
			price: summary.price,
			listing_type: summary.listing_type,
			bedrooms: summary.bedrooms,
			bathrooms: summary.bathrooms,
			locality: summary.locality,
			city: summary.city,
			image: summary.image,
		}
	}
}

impl ChatService {
	/// Runs one chat turn: resolve the session, extract intent, merge it
	/// into the accumulated filter state, query the catalogue, and reply.
	///
	/// Extraction and generation degrade to their fallbacks instead of
	/// failing the turn; storage errors abort it.
	pub async fn chat(&self, req: ChatRequest) -> ServiceResult<ChatResponse> {
		let message = req
			.message
			.as_deref()
			.map(str::trim)
			.filter(|message| !message.is_empty())
			.ok_or_else(|| ServiceError::InvalidRequest {
				message: "message is required.".to_string(),
			})?;
		let session = self.get_or_create_session(req.session_token.as_deref()).await?;
		let history =
			self.stores.chat.recent_turns(session.session_id, self.cfg.chat.history_limit).await?;

		// The inbound message is persisted before any model call so the
		// transcript keeps it even when a later step fails.
		self.stores
			.chat
			.append_message(NewChatMessage {
				session_id: session.session_id,
				role: Role::User,
				content: message,
				extracted_filters: None,
				result_count: None,
			})
			.await?;

		let intent = self.extract_intent(message, &history).await;
		let merged = merge(&session.context(), &intent.filters);
		let properties =
			self.stores.properties.search(&merged, self.cfg.chat.result_limit).await?;
		let total_results = properties.len();

		self.stores.chat.update_search_context(session.session_id, &merged).await?;

		let reply = self.generate_reply(message, &merged, total_results, &history).await;

		self.stores
			.chat
			.append_message(NewChatMessage {
				session_id: session.session_id,
				role: Role::Assistant,
				content: &reply,
				extracted_filters: Some(&merged),
				result_count: Some(total_results as i32),
			})
			.await?;

		tracing::debug!(
			session_token = %session.session_token,
			extracted = intent.succeeded,
			results = total_results,
			"Chat turn completed."
		);

		Ok(ChatResponse {
			session_token: session.session_token,
			message: reply,
			filters: merged,
			properties: properties.into_iter().map(PropertyCard::from).collect(),
			total_results,
		})
	}
}
