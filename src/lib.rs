#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

//! Session bootstrap, phone + OTP login and auth-gated navigation for the
//! RepayKaro customer app.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod navigation;
pub mod notify;
pub mod session;
pub mod store;

pub use app::App;
pub use config::Config;
pub use session::SessionController;
