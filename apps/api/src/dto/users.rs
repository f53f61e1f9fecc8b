mod conversions;
mod types;

pub use types::{
    CapabilityFlagsPayload, UpdateProfileRequest, UpdateUserRoleRequest, UserProfileResponse,
};
