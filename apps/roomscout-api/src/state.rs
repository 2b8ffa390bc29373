use std::sync::Arc;

use roomscout_service::{ChatService, Stores};
use roomscout_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ChatService>,
}
impl AppState {
	pub async fn new(config: roomscout_config::Config) -> color_eyre::Result<Self> {
		let db = Arc::new(Db::connect(&config.storage.postgres).await?);

		db.ensure_schema().await?;

		let service = ChatService::new(config, Stores::new(db.clone(), db));

		Ok(Self { service: Arc::new(service) })
	}
}
