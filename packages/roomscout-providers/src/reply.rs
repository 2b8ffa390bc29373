use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

pub async fn generate(
	cfg: &roomscout_config::LlmProviderConfig,
	messages: &[Value],
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_reply_text(json)
}

fn parse_reply_text(json: Value) -> Result<String> {
	let Some(content) = crate::completion_content(&json) else {
		return Err(eyre::eyre!("Reply response is missing message content."));
	};
	let trimmed = content.trim();

	if trimmed.is_empty() {
		return Err(eyre::eyre!("Reply content is empty."));
	}

	Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_choice_content_text() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": " I found 3 homes near the metro. " } }
			]
		});
		let text = parse_reply_text(json).expect("parse failed");
		assert_eq!(text, "I found 3 homes near the metro.");
	}

	#[test]
	fn rejects_blank_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "   " } }
			]
		});
		assert!(parse_reply_text(json).is_err());
	}
}
