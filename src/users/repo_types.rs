use sqlx::FromRow;

use super::model::User;

/// Row of the `users` table. `created_at`/`updated_at` are maintained by
/// the database and not mapped.
#[derive(Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String, // argon2 PHC string
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
        }
    }
}
