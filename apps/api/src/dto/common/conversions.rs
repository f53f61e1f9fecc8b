use tabula_core::UserIdentity;
use tabula_domain::Language;

use super::types::{LanguagePreferenceResponse, MutationResponse, UserIdentityResponse};

impl<T> MutationResponse<T> {
    /// Wraps a mutation result with a user-facing message.
    #[must_use]
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            user_id: identity.user_id().to_string(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
        }
    }
}

impl From<Language> for LanguagePreferenceResponse {
    fn from(value: Language) -> Self {
        Self {
            language: value.as_str().to_owned(),
        }
    }
}
