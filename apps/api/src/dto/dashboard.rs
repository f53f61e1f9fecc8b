mod conversions;
mod types;

pub use types::DashboardResponse;
