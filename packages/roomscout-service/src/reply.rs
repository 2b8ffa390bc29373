use serde_json::Value;

use crate::ChatService;
use roomscout_domain::{ChatTurn, FilterMap};

const REPLY_SYSTEM_PROMPT: &str = "\
You are a friendly assistant helping someone find a home on an Indian \
real-estate marketplace.
Keep replies concise, at most two sentences, and natural.
If homes matched, say how many were found.
If nothing matched, suggest loosening the search.
Never use technical wording such as \"filters\" or \"database\".";

pub(crate) fn reply_messages(
	message: &str,
	filters: &FilterMap,
	result_count: usize,
	history: &[ChatTurn],
	context_turns: usize,
) -> Vec<Value> {
	let start = history.len().saturating_sub(context_turns);
	let mut messages = Vec::with_capacity(history.len() - start + 2);

	messages.push(serde_json::json!({ "role": "system", "content": REPLY_SYSTEM_PROMPT }));

	for turn in &history[start..] {
		messages.push(serde_json::json!({ "role": turn.role.as_str(), "content": turn.content }));
	}

	let summary = format!(
		"User asked: \"{message}\"\nSearch criteria: {criteria}\nProperties found: {result_count}",
		criteria = Value::Object(filters.clone()),
	);

	messages.push(serde_json::json!({ "role": "user", "content": summary }));

	messages
}

/// Deterministic reply used whenever generation fails, so the turn always
/// produces a user-visible answer.
pub fn fallback_reply(result_count: usize) -> String {
	if result_count > 0 {
		format!("I found {result_count} properties matching your criteria!")
	} else {
		"I couldn't find exact matches. Try adjusting your requirements.".to_string()
	}
}

impl ChatService {
	pub(crate) async fn generate_reply(
		&self,
		message: &str,
		filters: &FilterMap,
		result_count: usize,
		history: &[ChatTurn],
	) -> String {
		let messages = reply_messages(
			message,
			filters,
			result_count,
			history,
			self.cfg.chat.reply_context_turns as usize,
		);

		match self.providers.reply.complete(&self.cfg.providers.reply, &messages).await {
			Ok(text) if !text.trim().is_empty() => text,
			Ok(_) => {
				tracing::warn!("Reply generation returned an empty completion.");

				fallback_reply(result_count)
			},
			Err(err) => {
				tracing::warn!(error = %err, "Reply generation failed.");

				fallback_reply(result_count)
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fallback_mentions_the_match_count() {
		assert_eq!(fallback_reply(3), "I found 3 properties matching your criteria!");
	}

	#[test]
	fn fallback_suggests_adjusting_when_nothing_matched() {
		assert_eq!(
			fallback_reply(0),
			"I couldn't find exact matches. Try adjusting your requirements."
		);
	}

	#[test]
	fn summary_turn_carries_message_criteria_and_count() {
		let mut filters = FilterMap::new();

		filters.insert("city".to_string(), Value::from("Pune"));

		let messages = reply_messages("anything cheaper?", &filters, 4, &[], 4);
		let summary = messages.last().expect("summary turn")["content"]
			.as_str()
			.expect("summary content")
			.to_string();

		assert!(summary.contains("anything cheaper?"));
		assert!(summary.contains("\"city\":\"Pune\""));
		assert!(summary.contains("Properties found: 4"));
	}
}
