use serde::{Deserialize, Serialize};

/// Author of one conversation turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Assistant,
}
impl Role {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::User => "user",
			Self::Assistant => "assistant",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"user" => Some(Self::User),
			"assistant" => Some(Self::Assistant),
			_ => None,
		}
	}
}

/// One turn of conversational context as forwarded to the language model.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
	pub role: Role,
	pub content: String,
}
impl ChatTurn {
	pub fn new(role: Role, content: impl Into<String>) -> Self {
		Self { role, content: content.into() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn role_round_trips_through_strings() {
		assert_eq!(Role::parse(Role::User.as_str()), Some(Role::User));
		assert_eq!(Role::parse(Role::Assistant.as_str()), Some(Role::Assistant));
		assert_eq!(Role::parse("system"), None);
	}

	#[test]
	fn role_serializes_lowercase() {
		assert_eq!(serde_json::to_string(&Role::Assistant).expect("serialize"), "\"assistant\"");
	}
}
