use axum::{middleware::from_fn_with_state, Router};

use crate::{auth::middleware::require_auth, state::AppState};

mod dto;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod model;
pub mod repo;
mod repo_types;
pub mod services;

/// Protected routes; every request passes through [`require_auth`] first.
pub fn router(state: AppState) -> Router<AppState> {
    handlers::me_routes().route_layer(from_fn_with_state(state, require_auth))
}
