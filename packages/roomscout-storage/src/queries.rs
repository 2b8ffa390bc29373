use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	BoxFuture, ChatStore, Error, PropertyStore, Result,
	db::Db,
	models::{ChatMessage, ChatSession, NewChatMessage, PropertySummary},
};
use roomscout_domain::{ChatTurn, FilterMap, Role};

const SESSION_COLUMNS: &str = "session_id, session_token, search_context, created_at, updated_at";
const MESSAGE_COLUMNS: &str =
	"message_id, session_id, role, content, extracted_filters, result_count, created_at";

impl ChatStore for Db {
	fn find_session<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<Option<ChatSession>>> {
		Box::pin(async move {
			let session = sqlx::query_as::<_, ChatSession>(&format!(
				"SELECT {SESSION_COLUMNS} FROM chat_sessions WHERE session_token = $1",
			))
			.bind(token)
			.fetch_optional(&self.pool)
			.await?;

			Ok(session)
		})
	}

	fn create_session(&self) -> BoxFuture<'_, Result<ChatSession>> {
		Box::pin(async move {
			let now = OffsetDateTime::now_utc();
			let session = sqlx::query_as::<_, ChatSession>(&format!(
				"\
INSERT INTO chat_sessions (session_id, session_token, search_context, created_at, updated_at)
VALUES ($1, $2, $3, $4, $4)
RETURNING {SESSION_COLUMNS}",
			))
			.bind(Uuid::new_v4())
			.bind(Uuid::new_v4().to_string())
			.bind(Value::Object(Map::new()))
			.bind(now)
			.fetch_one(&self.pool)
			.await?;

			Ok(session)
		})
	}

	fn update_search_context<'a>(
		&'a self,
		session_id: Uuid,
		context: &'a FilterMap,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			sqlx::query(
				"UPDATE chat_sessions SET search_context = $1, updated_at = $2 WHERE session_id = $3",
			)
			.bind(Value::Object(context.clone()))
			.bind(OffsetDateTime::now_utc())
			.bind(session_id)
			.execute(&self.pool)
			.await?;

			Ok(())
		})
	}

	fn append_message<'a>(&'a self, message: NewChatMessage<'a>) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			sqlx::query(
				"\
INSERT INTO chat_messages (message_id, session_id, role, content, extracted_filters, result_count, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
			)
			.bind(Uuid::new_v4())
			.bind(message.session_id)
			.bind(message.role.as_str())
			.bind(message.content)
			.bind(message.extracted_filters.map(|filters| Value::Object(filters.clone())))
			.bind(message.result_count)
			.bind(OffsetDateTime::now_utc())
			.execute(&self.pool)
			.await?;

			Ok(())
		})
	}

	fn recent_turns(&self, session_id: Uuid, limit: u32) -> BoxFuture<'_, Result<Vec<ChatTurn>>> {
		Box::pin(async move {
			let mut rows = sqlx::query_as::<_, (String, String)>(
				"\
SELECT role, content
FROM chat_messages
WHERE session_id = $1
ORDER BY created_at DESC
LIMIT $2",
			)
			.bind(session_id)
			.bind(i64::from(limit))
			.fetch_all(&self.pool)
			.await?;

			rows.reverse();

			rows.into_iter().map(|(role, content)| parse_turn(&role, content)).collect()
		})
	}

	fn full_messages(&self, session_id: Uuid) -> BoxFuture<'_, Result<Vec<ChatMessage>>> {
		Box::pin(async move {
			let messages = sqlx::query_as::<_, ChatMessage>(&format!(
				"\
SELECT {MESSAGE_COLUMNS}
FROM chat_messages
WHERE session_id = $1
ORDER BY created_at ASC",
			))
			.bind(session_id)
			.fetch_all(&self.pool)
			.await?;

			Ok(messages)
		})
	}
}

impl PropertyStore for Db {
	fn search<'a>(
		&'a self,
		filters: &'a FilterMap,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<PropertySummary>>> {
		Box::pin(async move {
			let mut builder = sqlx::QueryBuilder::new(
				"SELECT p.property_id, p.title, p.price, p.listing_type, p.bedrooms, p.bathrooms, p.locality, p.city, \
				 (SELECT i.image_url FROM property_images i WHERE i.property_id = p.property_id \
				  ORDER BY i.position ASC LIMIT 1) AS image \
				 FROM properties p WHERE TRUE",
			);

			if let Some(city) = str_filter(filters, "city") {
				builder.push(" AND p.city ILIKE ");
				builder.push_bind(contains_pattern(city));
			}
			if let Some(locality) = str_filter(filters, "locality") {
				builder.push(" AND p.locality ILIKE ");
				builder.push_bind(contains_pattern(locality));
			}
			if let Some(property_type) = str_filter(filters, "property_type") {
				builder.push(" AND p.property_type ILIKE ");
				builder.push_bind(contains_pattern(property_type));
			}
			if let Some(listing_type) = str_filter(filters, "listing_type") {
				builder.push(" AND p.listing_type = ");
				builder.push_bind(listing_type.to_string());
			}
			if let Some(bedrooms) = int_filter(filters, "bedrooms") {
				builder.push(" AND p.bedrooms = ");
				builder.push_bind(bedrooms);
			}
			if let Some(min_price) = int_filter(filters, "min_price") {
				builder.push(" AND p.price >= ");
				builder.push_bind(min_price);
			}
			if let Some(max_price) = int_filter(filters, "max_price") {
				builder.push(" AND p.price <= ");
				builder.push_bind(max_price);
			}
			if flag_filter(filters, "near_metro") {
				builder.push(" AND p.near_metro");
			}
			if flag_filter(filters, "pet_friendly") {
				builder.push(" AND p.pet_friendly");
			}
			if flag_filter(filters, "bachelor_friendly") {
				builder.push(" AND p.bachelor_friendly");
			}

			builder.push(" ORDER BY p.created_at DESC LIMIT ");
			builder.push_bind(i64::from(limit));

			let summaries: Vec<PropertySummary> =
				builder.build_query_as().fetch_all(&self.pool).await?;

			Ok(summaries)
		})
	}
}

fn parse_turn(role: &str, content: String) -> Result<ChatTurn> {
	let role = Role::parse(role)
		.ok_or_else(|| Error::InvalidArgument(format!("Unknown message role {role:?}.")))?;

	Ok(ChatTurn { role, content })
}

fn contains_pattern(value: &str) -> String {
	format!("%{value}%")
}

fn str_filter<'a>(filters: &'a FilterMap, key: &str) -> Option<&'a str> {
	filters.get(key).and_then(Value::as_str).map(str::trim).filter(|value| !value.is_empty())
}

fn int_filter(filters: &FilterMap, key: &str) -> Option<i64> {
	let value = filters.get(key)?;

	// Extractor output is not type-validated upstream, so numeric strings
	// such as "20000" are accepted as well.
	value.as_i64().or_else(|| value.as_str().and_then(|raw| raw.trim().parse().ok()))
}

fn flag_filter(filters: &FilterMap, key: &str) -> bool {
	filters.get(key).and_then(Value::as_bool) == Some(true)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn filters(raw: Value) -> FilterMap {
		raw.as_object().cloned().expect("filters fixture must be an object")
	}

	#[test]
	fn str_filter_skips_blank_and_non_string_values() {
		let map = filters(serde_json::json!({ "city": "  ", "locality": 7, "property_type": "pg" }));

		assert_eq!(str_filter(&map, "city"), None);
		assert_eq!(str_filter(&map, "locality"), None);
		assert_eq!(str_filter(&map, "property_type"), Some("pg"));
	}

	#[test]
	fn int_filter_accepts_numbers_and_numeric_strings() {
		let map = filters(serde_json::json!({ "max_price": 20_000, "min_price": "5000", "bedrooms": "two" }));

		assert_eq!(int_filter(&map, "max_price"), Some(20_000));
		assert_eq!(int_filter(&map, "min_price"), Some(5_000));
		assert_eq!(int_filter(&map, "bedrooms"), None);
	}

	#[test]
	fn flag_filter_only_matches_explicit_true() {
		let map = filters(serde_json::json!({ "near_metro": true, "pet_friendly": false, "bachelor_friendly": "yes" }));

		assert!(flag_filter(&map, "near_metro"));
		assert!(!flag_filter(&map, "pet_friendly"));
		assert!(!flag_filter(&map, "bachelor_friendly"));
		assert!(!flag_filter(&map, "furnished"));
	}

	#[test]
	fn parse_turn_rejects_unknown_roles() {
		assert!(parse_turn("system", "hi".to_string()).is_err());
		assert!(parse_turn("user", "hi".to_string()).is_ok());
	}
}
