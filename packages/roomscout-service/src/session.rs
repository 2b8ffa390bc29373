use crate::{ChatService, ServiceResult};
use roomscout_storage::models::ChatSession;

impl ChatService {
	/// Resolves a supplied token to its session, or creates a fresh session
	/// with an empty filter state when no token is supplied or the token is
	/// unknown.
	pub(crate) async fn get_or_create_session(
		&self,
		token: Option<&str>,
	) -> ServiceResult<ChatSession> {
		if let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) {
			if let Some(session) = self.stores.chat.find_session(token).await? {
				return Ok(session);
			}
		}

		Ok(self.stores.chat.create_session().await?)
	}
}
