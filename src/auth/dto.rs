use serde::{Deserialize, Serialize};

use super::services::Session;
use crate::{error::AppResult, validation};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> AppResult<()> {
        validation::email("email", &self.email)?;
        validation::password("password", &self.password)
    }
}

/// Request body for login. Only presence is checked so that malformed
/// credentials fail the same way as wrong ones.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> AppResult<()> {
        validation::require("email", &self.email)?;
        validation::require("password", &self.password)?;
        Ok(())
    }
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: i64,
    pub email: String,
    pub token: String,
}

impl From<Session> for AuthResponse {
    fn from(s: Session) -> Self {
        Self {
            id: s.profile.id,
            email: s.profile.email,
            token: s.token,
        }
    }
}
