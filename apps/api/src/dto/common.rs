mod conversions;
mod types;

pub use types::{
    HealthResponse, LanguagePreferenceResponse, MutationResponse, UpdateLanguagePreferenceRequest,
    UserIdentityResponse,
};
