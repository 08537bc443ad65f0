use serde::{Deserialize, Serialize};

use crate::{error::AppResult, validation};

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> AppResult<()> {
        match self.email.as_deref() {
            Some(email) if !email.is_empty() => validation::email("email", email),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> AppResult<()> {
        validation::require("old_password", &self.old_password)?;
        validation::password("new_password", &self.new_password)
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
