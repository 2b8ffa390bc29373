use serde_json::Value;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use roomscout_config::Postgres;
use roomscout_domain::{FilterMap, Role};
use roomscout_storage::{
	ChatStore, PropertyStore,
	db::Db,
	models::NewChatMessage,
};
use roomscout_testkit::TestDatabase;

fn filters(raw: Value) -> FilterMap {
	raw.as_object().cloned().expect("filters fixture must be an object")
}

async fn connect(dsn: &str) -> Db {
	let db = Db::connect(&Postgres { dsn: dsn.to_string(), pool_max_conns: 2 })
		.await
		.expect("Failed to connect to test database.");

	db.ensure_schema().await.expect("Failed to apply schema.");
	// Re-applying must be a no-op.
	db.ensure_schema().await.expect("Failed to re-apply schema.");

	db
}

async fn seed_property(
	db: &Db,
	title: &str,
	city: &str,
	price: i64,
	bedrooms: i32,
	near_metro: bool,
	created_at: OffsetDateTime,
) -> Uuid {
	let property_id = Uuid::new_v4();

	sqlx::query(
		"\
INSERT INTO properties (property_id, title, property_type, listing_type, city, locality, price, bedrooms, bathrooms, near_metro, created_at)
VALUES ($1, $2, 'flat', 'rent', $3, 'Indiranagar', $4, $5, 1, $6, $7)",
	)
	.bind(property_id)
	.bind(title)
	.bind(city)
	.bind(price)
	.bind(bedrooms)
	.bind(near_metro)
	.bind(created_at)
	.execute(&db.pool)
	.await
	.expect("Failed to seed property.");

	sqlx::query(
		"INSERT INTO property_images (image_id, property_id, image_url, position) VALUES ($1, $2, $3, 0)",
	)
	.bind(Uuid::new_v4())
	.bind(property_id)
	.bind(format!("https://cdn.example.com/{title}.jpg"))
	.execute(&db.pool)
	.await
	.expect("Failed to seed property image.");

	property_id
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ROOMSCOUT_PG_DSN to run."]
async fn sessions_and_messages_round_trip() {
	let Some(base_dsn) = roomscout_testkit::env_dsn() else {
		eprintln!("Skipping storage test; set ROOMSCOUT_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(test_db.dsn()).await;

	let session = db.create_session().await.expect("Failed to create session.");

	assert!(!session.session_token.is_empty());
	assert!(session.context().is_empty());
	assert!(
		db.find_session("no-such-token").await.expect("Lookup failed.").is_none(),
		"unknown token must not resolve"
	);

	let found = db
		.find_session(&session.session_token)
		.await
		.expect("Lookup failed.")
		.expect("Session must resolve by token.");

	assert_eq!(found.session_id, session.session_id);

	for (role, content) in [
		(Role::User, "flats in Bangalore"),
		(Role::Assistant, "Found a few options."),
		(Role::User, "make it a 2BHK"),
	] {
		db.append_message(NewChatMessage {
			session_id: session.session_id,
			role,
			content,
			extracted_filters: None,
			result_count: None,
		})
		.await
		.expect("Failed to append message.");
	}

	let recent = db.recent_turns(session.session_id, 2).await.expect("Failed to load turns.");

	assert_eq!(recent.len(), 2);
	assert_eq!(recent[0].content, "Found a few options.");
	assert_eq!(recent[1].content, "make it a 2BHK");

	let full = db.full_messages(session.session_id).await.expect("Failed to load transcript.");

	assert_eq!(full.len(), 3);
	assert_eq!(full[0].content, "flats in Bangalore");
	assert!(full.windows(2).all(|pair| pair[0].created_at <= pair[1].created_at));

	let context = filters(serde_json::json!({ "city": "Bangalore", "bedrooms": 2 }));

	db.update_search_context(session.session_id, &context)
		.await
		.expect("Failed to update context.");

	let updated = db
		.find_session(&session.session_token)
		.await
		.expect("Lookup failed.")
		.expect("Session must resolve by token.");

	assert_eq!(updated.context(), context);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ROOMSCOUT_PG_DSN to run."]
async fn property_search_applies_recognized_filters() {
	let Some(base_dsn) = roomscout_testkit::env_dsn() else {
		eprintln!("Skipping storage test; set ROOMSCOUT_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(test_db.dsn()).await;
	let base = OffsetDateTime::now_utc() - Duration::days(3);

	let older = seed_property(&db, "older-metro", "Bangalore", 18_000, 2, true, base).await;
	let newer =
		seed_property(&db, "newer-metro", "Bangalore", 15_000, 2, true, base + Duration::days(1))
			.await;
	seed_property(&db, "no-metro", "Bangalore", 12_000, 2, false, base + Duration::days(2)).await;
	seed_property(&db, "wrong-city", "Pune", 15_000, 2, true, base + Duration::days(2)).await;
	seed_property(&db, "too-pricey", "Bangalore", 40_000, 2, true, base + Duration::days(2)).await;
	seed_property(&db, "wrong-size", "Bangalore", 15_000, 3, true, base + Duration::days(2)).await;

	let query = filters(serde_json::json!({
		"city": "bangal",
		"bedrooms": 2,
		"near_metro": true,
		"max_price": "20000",
		"unrecognized": "ignored",
	}));
	let results = db.search(&query, 6).await.expect("Search failed.");
	let ids: Vec<_> = results.iter().map(|p| p.property_id).collect();

	assert_eq!(ids, vec![newer, older], "expected newest-first bounded results");
	assert_eq!(results[0].image.as_deref(), Some("https://cdn.example.com/newer-metro.jpg"));

	let capped = db.search(&query, 1).await.expect("Search failed.");

	assert_eq!(capped.len(), 1);
	assert_eq!(capped[0].property_id, newer);

	let everything = db.search(&FilterMap::new(), 6).await.expect("Search failed.");

	assert_eq!(everything.len(), 6);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
