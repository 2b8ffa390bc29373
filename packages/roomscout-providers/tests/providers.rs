use reqwest::header::AUTHORIZATION;
use serde_json::Map;

#[test]
fn builds_bearer_auth_header() {
	let headers =
		roomscout_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");
	assert_eq!(value, "Bearer secret");
}

#[test]
fn forwards_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-request-source".to_string(), serde_json::json!("chat"));

	let headers =
		roomscout_providers::auth_headers("secret", &defaults).expect("Failed to build headers.");

	assert_eq!(headers.get("x-request-source").expect("Missing default header."), "chat");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-count".to_string(), serde_json::json!(3));

	assert!(roomscout_providers::auth_headers("secret", &defaults).is_err());
}
