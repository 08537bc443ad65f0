use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::{jwt::JwtKeys, password::Hasher};
use crate::{
    error::{AppError, AppResult},
    users::{model::Profile, repo::UserStore},
};

/// Result of a successful register or login.
#[derive(Debug, Clone)]
pub struct Session {
    pub profile: Profile,
    pub token: String,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
    hasher: Hasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys, hasher: Hasher) -> Self {
        Self {
            users,
            keys,
            hasher,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> AppResult<Session> {
        if email.is_empty() {
            return Err(AppError::validation("email is required"));
        }
        if password.is_empty() {
            return Err(AppError::validation("password is required"));
        }

        if self.users.find_by_email(email).await?.is_some() {
            warn!("email already registered");
            return Err(AppError::Conflict("email already exists".into()));
        }

        let hash = self
            .hasher
            .hash_blocking(password.to_owned())
            .await
            .map_err(AppError::Internal)?;

        // a concurrent registration can still win the race; the store's
        // uniqueness constraint turns that into DuplicateEmail -> Conflict
        let user = self.users.create(email, &hash).await?;
        let token = self.issue(user.id)?;

        info!(user_id = user.id, "user registered");
        Ok(Session {
            profile: user.into(),
            token,
        })
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Session> {
        let Some(user) = self.users.find_by_email(email).await? else {
            self.hasher.verify_dummy_blocking(password.to_owned()).await;
            warn!("login unknown email");
            return Err(AppError::Unauthorized);
        };

        let ok = self
            .hasher
            .verify_blocking(password.to_owned(), user.password_hash.clone())
            .await
            .map_err(AppError::Internal)?;
        if !ok {
            warn!(user_id = user.id, "login invalid password");
            return Err(AppError::Unauthorized);
        }

        let token = self.issue(user.id)?;
        info!(user_id = user.id, "user logged in");
        Ok(Session {
            profile: user.into(),
            token,
        })
    }

    /// Resolves a bearer token to a user id. Every failure collapses into
    /// `Unauthorized`.
    pub fn verify_token(&self, token: &str) -> AppResult<i64> {
        self.keys
            .verify(token)
            .and_then(|claims| claims.user_id())
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AppError::Unauthorized
            })
    }

    fn issue(&self, user_id: i64) -> AppResult<String> {
        self.keys.sign(user_id).map_err(AppError::Internal)
    }
}
