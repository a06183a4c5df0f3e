//! Endpoint paths, relative to the configured API base URL.

use super::{ApiError, ApiResponse, RemoteApi};

pub const LOGIN: &str = "clientAuth/login";
pub const VALIDATE_OTP: &str = "clientAuth/validate-otp";

/// Read-only data behind the authenticated tabs. Payloads are passed through
/// as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Resource {
    /// Outstanding balance and settlement options.
    Dashboard,
    /// Payment status timeline.
    Timeline,
    /// Cashback coupons.
    Coupons,
    /// Uploaded payment screenshots.
    Screenshots,
}

impl Resource {
    pub fn endpoint(self) -> &'static str {
        match self {
            Resource::Dashboard => "clients/get-client",
            Resource::Timeline => "clients/get-timeline",
            Resource::Coupons => "clients/get-coupon",
            Resource::Screenshots => "clients/get-screenshot",
        }
    }
}

pub async fn fetch(api: &dyn RemoteApi, resource: Resource) -> Result<ApiResponse, ApiError> {
    api.get(resource.endpoint()).await
}
