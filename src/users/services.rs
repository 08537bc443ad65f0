use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::{model::Profile, repo::UserStore};
use crate::{
    auth::password::Hasher,
    error::{AppError, AppResult},
};

pub struct ProfileService {
    users: Arc<dyn UserStore>,
    hasher: Hasher,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserStore>, hasher: Hasher) -> Self {
        Self { users, hasher }
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: i64) -> AppResult<Profile> {
        let user = self.users.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;
        Ok(user.into())
    }

    /// `None` or an empty email leaves the profile untouched.
    #[instrument(skip(self))]
    pub async fn update_profile(&self, user_id: i64, new_email: Option<&str>) -> AppResult<Profile> {
        let user = self.users.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;

        let Some(email) = new_email.filter(|e| !e.is_empty() && *e != user.email) else {
            return Ok(user.into());
        };

        if let Some(owner) = self.users.find_by_email(email).await? {
            if owner.id != user_id {
                warn!(user_id, "email already taken");
                return Err(AppError::Conflict("email already exists".into()));
            }
        }

        let updated = self
            .users
            .update_email(user_id, email)
            .await?
            .ok_or(AppError::NotFound)?;
        info!(user_id, "profile updated");
        Ok(updated.into())
    }

    /// Existing tokens stay valid until they expire.
    #[instrument(skip(self, old_password, new_password))]
    pub async fn change_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        if new_password.is_empty() {
            return Err(AppError::validation("new_password is required"));
        }

        let user = self.users.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;

        let ok = self
            .hasher
            .verify_blocking(old_password.to_owned(), user.password_hash)
            .await
            .map_err(AppError::Internal)?;
        if !ok {
            warn!(user_id, "old password incorrect");
            return Err(AppError::InvalidCredential);
        }

        let hash = self
            .hasher
            .hash_blocking(new_password.to_owned())
            .await
            .map_err(AppError::Internal)?;
        if !self.users.update_password_hash(user_id, &hash).await? {
            return Err(AppError::NotFound);
        }

        info!(user_id, "password changed");
        Ok(())
    }
}
