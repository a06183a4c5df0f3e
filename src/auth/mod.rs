//! Phone + OTP login and logout, as driven by the Login, OTP and header
//! screens.
//!
//! Every remote failure ends in a toast and leaves the session state alone;
//! only a verified OTP that came back with a credential logs the user in.

use crate::api::endpoints::{LOGIN, VALIDATE_OTP};
use crate::api::RemoteApi;
use crate::navigation::Route;
use crate::notify::DEFAULT_TOAST_MS;
use crate::session::SessionController;
use crate::store::{StoreError, TOKEN_KEY};
use serde_json::json;
use std::sync::Arc;

pub const PHONE_DIGITS: usize = 10;
pub const OTP_DIGITS: usize = 4;

const VERIFIED_TOAST_MS: u64 = 1_500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOtpOutcome {
    InvalidPhone,
    Sent,
    Rejected(String),
    NetworkError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOtpOutcome {
    InvalidOtp,
    Verified,
    Rejected(String),
    NetworkError,
}

pub fn is_valid_phone(phone: &str) -> bool {
    is_digits(phone, PHONE_DIGITS)
}

pub fn is_valid_otp(otp: &str) -> bool {
    is_digits(otp, OTP_DIGITS)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

pub struct AuthFlow {
    api: Arc<dyn RemoteApi>,
    session: SessionController,
    toast_ms: u64,
}

impl AuthFlow {
    pub fn new(api: Arc<dyn RemoteApi>, session: SessionController) -> Self {
        Self {
            api,
            session,
            toast_ms: DEFAULT_TOAST_MS,
        }
    }

    /// Duration of every toast except the short "verified" one.
    pub fn with_toast_duration(mut self, duration_ms: u64) -> Self {
        self.toast_ms = duration_ms;
        self
    }

    fn toast(&self, message: &str, duration_ms: u64) {
        self.session.notifier().show(message, duration_ms);
    }

    /// Home → Login.
    pub fn open_login(&self) {
        self.session.navigation().navigate(Route::Login);
    }

    /// Requests an OTP for `phone` and moves to the OTP screen on success.
    pub async fn send_otp(&self, phone: &str) -> SendOtpOutcome {
        if !is_valid_phone(phone) {
            self.toast("Please enter a valid 10-digit mobile number", self.toast_ms);
            return SendOtpOutcome::InvalidPhone;
        }

        match self.api.post(LOGIN, &json!({ "phone": phone })).await {
            Ok(resp) if resp.success => {
                self.toast("OTP sent successfully!", self.toast_ms);
                self.session.navigation().navigate(Route::Otp {
                    mobile: phone.to_string(),
                });
                SendOtpOutcome::Sent
            }
            Ok(resp) => {
                let message = resp.message_or("Something went wrong!").to_string();
                self.toast(&message, self.toast_ms);
                SendOtpOutcome::Rejected(message)
            }
            Err(err) => {
                tracing::warn!("OTP request failed: {err}");
                self.toast("Network error!", self.toast_ms);
                SendOtpOutcome::NetworkError
            }
        }
    }

    /// Verifies `otp`; on success the credential is persisted before the
    /// controller is told about the login.
    pub async fn verify_otp(&self, phone: &str, otp: &str) -> VerifyOtpOutcome {
        if !is_valid_otp(otp) {
            self.toast("Please enter a valid 4-digit OTP", self.toast_ms);
            return VerifyOtpOutcome::InvalidOtp;
        }

        let resp = match self
            .api
            .post(VALIDATE_OTP, &json!({ "phone": phone, "otp": otp }))
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!("OTP verification failed: {err}");
                self.toast("Network error!", self.toast_ms);
                return VerifyOtpOutcome::NetworkError;
            }
        };

        let token = match resp.jwt_token.as_deref() {
            Some(token) if resp.success => token,
            _ => {
                let message = resp.message_or("Invalid OTP!").to_string();
                self.toast(&message, self.toast_ms);
                return VerifyOtpOutcome::Rejected(message);
            }
        };

        if let Err(err) = self.session.store().set(TOKEN_KEY, token).await {
            tracing::warn!("failed to persist session token: {err}");
            self.toast("Network error!", self.toast_ms);
            return VerifyOtpOutcome::NetworkError;
        }

        self.toast("OTP Verified! Redirecting...", VERIFIED_TOAST_MS);
        self.session.set_is_logged_in(true);
        tracing::info!("customer logged in");
        VerifyOtpOutcome::Verified
    }

    /// Clears the credential, flips the controller and wipes navigation
    /// history so back-navigation cannot reach authenticated screens.
    ///
    /// The first-launch flag is left in place.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.session.store().remove(TOKEN_KEY).await?;
        self.session.set_is_logged_in(false);
        self.session.navigation().reset(vec![Route::Home]);
        tracing::info!("customer logged out");
        Ok(())
    }
}
