//! Admin account model.

use sqlx::FromRow;

use crate::store::AdminUser;

/// Row of `admin_users`.
#[derive(Debug, Clone, FromRow)]
pub struct AdminRow {
    pub username: String,
    pub password_hash: String,
}

impl From<AdminRow> for AdminUser {
    fn from(row: AdminRow) -> Self {
        AdminUser {
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}
