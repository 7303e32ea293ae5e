/// Account row including the password hash. Only the store and the login
/// path ever see this type; everything else gets `roomplan_types::models::User`.
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<UserRow> for roomplan_types::models::User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
        }
    }
}
