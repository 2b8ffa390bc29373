use serde_json::Value;

use crate::ChatService;
use roomscout_domain::{ChatTurn, FilterMap};

const INTENT_SYSTEM_PROMPT: &str = "\
You are a property search assistant for an Indian real-estate marketplace.
Read the conversation and the latest user message, then extract search filters.

Recognized filters:
- city: string
- locality: string (area name)
- bedrooms: integer
- min_price: integer (rupees)
- max_price: integer (rupees)
- property_type: string (apartment, villa, house, pg, hostel)
- listing_type: string (\"sale\" or \"rent\")
- furnished: string (furnished, semi-furnished, unfurnished)
- near_metro: boolean
- pet_friendly: boolean
- bachelor_friendly: boolean

Price conventions: \"20k\" means 20000, \"20 lakhs\" or \"20L\" means 2000000, \
\"1 crore\" or \"1Cr\" means 10000000.
A query about renting implies listing_type \"rent\"; a query about buying implies \
listing_type \"sale\".
Follow-up messages refine earlier ones, so extract only the filters the latest \
message states or changes.
Respond with a single JSON object containing only the filters you extracted.";

/// Tagged result of one extraction attempt. A failed attempt carries an
/// empty filter map so the merge downstream is a no-op.
#[derive(Clone, Debug)]
pub struct IntentOutcome {
	pub filters: FilterMap,
	pub succeeded: bool,
	pub raw: Option<String>,
	pub error: Option<String>,
}
impl IntentOutcome {
	fn extracted(filters: FilterMap, raw: String) -> Self {
		Self { filters, succeeded: true, raw: Some(raw), error: None }
	}

	fn failed(error: String) -> Self {
		Self { filters: FilterMap::new(), succeeded: false, raw: None, error: Some(error) }
	}
}

pub(crate) fn intent_messages(
	message: &str,
	history: &[ChatTurn],
	context_turns: usize,
) -> Vec<Value> {
	let start = history.len().saturating_sub(context_turns);
	let mut messages = Vec::with_capacity(history.len() - start + 2);

	messages.push(serde_json::json!({ "role": "system", "content": INTENT_SYSTEM_PROMPT }));

	for turn in &history[start..] {
		messages.push(serde_json::json!({ "role": turn.role.as_str(), "content": turn.content }));
	}

	messages.push(serde_json::json!({ "role": "user", "content": message }));

	messages
}

impl ChatService {
	/// Extraction is best-effort: every failure mode degrades to an empty
	/// filter map and the turn continues on the session's existing state.
	pub(crate) async fn extract_intent(
		&self,
		message: &str,
		history: &[ChatTurn],
	) -> IntentOutcome {
		let messages =
			intent_messages(message, history, self.cfg.chat.intent_context_turns as usize);

		match self.providers.intent.complete(&self.cfg.providers.intent, &messages).await {
			Ok(value) => match value.as_object().cloned() {
				Some(filters) => IntentOutcome::extracted(filters, value.to_string()),
				None => {
					tracing::warn!("Intent extraction returned a non-object payload.");

					IntentOutcome::failed("Intent payload is not a JSON object.".to_string())
				},
			},
			Err(err) => {
				tracing::warn!(error = %err, "Intent extraction failed.");

				IntentOutcome::failed(err.to_string())
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use roomscout_domain::Role;

	fn turns(count: usize) -> Vec<ChatTurn> {
		(0..count)
			.map(|index| {
				let role = if index % 2 == 0 { Role::User } else { Role::Assistant };

				ChatTurn::new(role, format!("turn {index}"))
			})
			.collect()
	}

	#[test]
	fn window_keeps_only_the_most_recent_turns() {
		let history = turns(10);
		let messages = intent_messages("latest", &history, 6);

		assert_eq!(messages.len(), 8);
		assert_eq!(messages[0]["role"], "system");
		assert_eq!(messages[1]["content"], "turn 4");
		assert_eq!(messages[6]["content"], "turn 9");
		assert_eq!(messages[7]["role"], "user");
		assert_eq!(messages[7]["content"], "latest");
	}

	#[test]
	fn short_history_is_forwarded_whole() {
		let history = turns(2);
		let messages = intent_messages("latest", &history, 6);

		assert_eq!(messages.len(), 4);
		assert_eq!(messages[1]["content"], "turn 0");
		assert_eq!(messages[2]["content"], "turn 1");
	}

	#[test]
	fn history_roles_are_preserved_in_order() {
		let history = turns(3);
		let messages = intent_messages("latest", &history, 6);

		assert_eq!(messages[1]["role"], "user");
		assert_eq!(messages[2]["role"], "assistant");
		assert_eq!(messages[3]["role"], "user");
	}
}
