use tabula_core::{AppError, UserIdentity};
use tower_sessions::Session;

mod bootstrap;
mod session;

pub use bootstrap::bootstrap_handler;
pub use session::{logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
pub const SESSION_LANGUAGE_KEY: &str = "language";

/// Reads the identity stored by a successful sign-in.
pub(crate) async fn session_identity(session: &Session) -> Result<Option<UserIdentity>, AppError> {
    session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))
}
