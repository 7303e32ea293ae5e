use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Session token claims --

/// Claims carried by a session token. Canonical definition lives here so the
/// token service and any other verifier agree on the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

/// Login accepts either an email or a username; email wins when both are set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i64,
    pub username: String,
    pub token: String,
}

// -- Projects --

/// Missing fields default to empty/zero and are rejected by validation, so the
/// caller gets a 400 with a useful message instead of a body-parse error.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub room_layout_id: i64,
}

// -- Placed furniture --

#[derive(Debug, Deserialize)]
pub struct AddFurnitureRequest {
    pub project_id: i64,
    pub furniture_id: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub rotation: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePositionRequest {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_accepts_username_only() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","password":"pw1"}"#).unwrap();
        assert_eq!(req.username.as_deref(), Some("alice"));
        assert!(req.email.is_none());
    }

    #[test]
    fn register_rejects_unknown_fields() {
        let res = serde_json::from_str::<RegisterRequest>(
            r#"{"username":"a","email":"a@x","password":"p","admin":true}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn create_project_defaults_missing_room() {
        let req: CreateProjectRequest =
            serde_json::from_str(r#"{"name":"Den"}"#).unwrap();
        assert_eq!(req.room_layout_id, 0);
        assert_eq!(req.description, "");
    }
}
