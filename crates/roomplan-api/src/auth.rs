use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::{
    WithRejection,
    cookie::{Cookie, CookieJar, SameSite},
};
use rand_core::OsRng;
use tracing::{error, info, warn};

use roomplan_types::api::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::error::{ApiError, ApiJson};
use crate::middleware::{AuthUser, TOKEN_COOKIE};
use crate::token::{Identity, TOKEN_TTL_SECS};
use crate::{AppState, with_db};

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_string();
    if username.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Username, email and password are required".into(),
        ));
    }

    // Hash password with Argon2id
    let password_hash = hash_password(&req.password)?;

    let user_id = with_db(&state, move |db| {
        db.create_user(&username, &email, &password_hash)
    })
    .await
    .map_err(|e| match e {
        ApiError::Conflict(_) => ApiError::Conflict("Username or email already taken"),
        other => other,
    })?;

    info!("Registered user {}", user_id);
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".into(),
            user_id,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(req), _): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.filter(|e| !e.trim().is_empty());
    let username = req.username.filter(|u| !u.trim().is_empty());
    if email.is_none() && username.is_none() {
        return Err(ApiError::Validation("Email or username is required".into()));
    }

    let user = with_db(&state, move |db| match email {
        Some(email) => db.get_user_by_email(email.trim()),
        None => db.get_user_by_username(username.as_deref().unwrap_or_default().trim()),
    })
    .await?
    .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&user.password, &req.password)? {
        warn!("Failed login for user {}", user.id);
        return Err(ApiError::InvalidCredentials);
    }

    let token = state
        .tokens
        .issue(&Identity {
            user_id: user.id,
            username: user.username.clone(),
        })
        .map_err(|e| {
            error!("Could not sign session token: {}", e);
            ApiError::Internal
        })?;

    let cookie = Cookie::build((TOKEN_COOKIE, token.clone()))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::seconds(TOKEN_TTL_SECS))
        .same_site(SameSite::Lax);

    info!("User {} logged in", user.username);
    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "Login successful".into(),
            user_id: user.id,
            username: user.username,
            token,
        }),
    ))
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let users = with_db(&state, |db| db.list_users()).await?;
    Ok(Json(users))
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Password hashing failed: {}", e);
            ApiError::Internal
        })
}

fn verify_password(stored_hash: &str, password: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        error!("Stored password hash is unreadable: {}", e);
        ApiError::Internal
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("pw1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "pw1").unwrap());
        assert!(!verify_password(&hash, "pw2").unwrap());
    }

    #[test]
    fn salts_differ_per_hash() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }
}
