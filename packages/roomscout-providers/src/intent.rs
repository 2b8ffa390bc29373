use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Runs one structured-output chat completion and parses the completion
/// content into the extracted filter object.
///
/// One-shot by contract: a transport failure or an unparseable payload is
/// returned to the caller, which falls back to the previous filter state.
pub async fn extract(cfg: &roomscout_config::LlmProviderConfig, messages: &[Value]) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"response_format": { "type": "json_object" },
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_intent_json(json)
}

fn parse_intent_json(json: Value) -> Result<Value> {
	let Some(content) = crate::completion_content(&json) else {
		return Err(eyre::eyre!("Intent response is missing message content."));
	};
	let parsed: Value = serde_json::from_str(content)
		.map_err(|_| eyre::eyre!("Intent content is not valid JSON."))?;

	if !parsed.is_object() {
		return Err(eyre::eyre!("Intent content is not a JSON object."));
	}

	Ok(parsed)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_choice_content_object() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "{\"bedrooms\": 2, \"near_metro\": true}" } }
			]
		});
		let parsed = parse_intent_json(json).expect("parse failed");
		assert_eq!(parsed.get("bedrooms"), Some(&serde_json::json!(2)));
	}

	#[test]
	fn rejects_non_object_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "[1, 2, 3]" } }
			]
		});
		assert!(parse_intent_json(json).is_err());
	}

	#[test]
	fn rejects_missing_content() {
		let json = serde_json::json!({ "choices": [] });
		assert!(parse_intent_json(json).is_err());
	}
}
