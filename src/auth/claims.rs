use serde::{Deserialize, Serialize};

/// JWT payload asserting a user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}

impl Claims {
    pub fn user_id(&self) -> anyhow::Result<i64> {
        self.sub
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("invalid sub claim: {e}"))
    }
}
