//! Core library for sessiongate.
//!
//! Gates access to an application on the presence of a stored session
//! token. The pieces are:
//! - `SessionTokenGateway`: reads the token slot and decides between
//!   handing out the token or redirecting to the login page
//! - `TokenStorage`: the key-value slot the token lives in (memory, file
//!   or OS keychain)
//! - `Navigator`: whatever performs the redirect
//! - `GatewayConfig` / `AppConfig`: environment and on-disk configuration

pub mod config;
pub mod error;
pub mod gateway;
pub mod navigation;
pub mod storage;
pub mod token;

pub use config::{AppConfig, GatewayConfig, StoreKind};
pub use error::{GatewayError, Result};
pub use gateway::{Outcome, Redirect, SessionTokenGateway, TOKEN_KEY};
pub use navigation::{LocationNavigator, Navigator, RecordingNavigator, StdoutNavigator};
pub use storage::{FileStorage, KeyringStorage, MemoryStorage, TokenStorage};
pub use token::SessionToken;
