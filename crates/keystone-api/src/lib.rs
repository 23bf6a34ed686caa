//! # keystone-api
//!
//! HTTP API server for Keystone.
//!
//! This crate provides the HTTP surface over the auth use cases:
//! - `POST /api/auth/login`: credential check and token issuance
//! - `POST /api/users`: account registration
//! - `GET /health`: liveness check
//! - Mapping of auth failures to HTTP status codes
//! - Configuration loading and logging setup for the `keystone` binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod server;

use std::sync::Arc;

use keystone_auth::{CreateUserUseCase, IdentityGateway, LoginUseCase};

pub use config::KeystoneConfig;
pub use error::{ApiError, Error, Result};
pub use routes::create_router;
pub use server::Server;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Login flow.
    pub login: LoginUseCase,
    /// Registration flow.
    pub create_user: CreateUserUseCase,
}

impl AppState {
    /// Build default use cases over `gateway`.
    pub fn new(gateway: Arc<dyn IdentityGateway>) -> Self {
        Self {
            login: LoginUseCase::new(gateway.clone()),
            create_user: CreateUserUseCase::new(gateway),
        }
    }

    /// Replace the login use case (e.g. to inject a clock or token issuer).
    pub fn with_login(mut self, login: LoginUseCase) -> Self {
        self.login = login;
        self
    }
}
