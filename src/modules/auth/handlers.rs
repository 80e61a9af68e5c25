use axum::{extract::State, http::StatusCode, Json};
use secrecy::ExposeSecret;
use tracing::info;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{LoginResponse, NewUser, UserLogin, UserView};
use crate::db::repositories::UserRepository;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{encode_token, CurrentUser, Identity};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> AppResult<(StatusCode, Json<UserView>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = UserRepository::create(&state.db, &payload).await?;
    info!(user_id = %user.id, role = ?user.role, "registered new user");

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<UserLogin>,
) -> AppResult<Json<LoginResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = UserRepository::authenticate(&state.db, &payload.email, &payload.password)
        .await?
        .ok_or_else(|| AppError::Authentication("invalid email or password".into()))?;

    let auth = &state.env.auth;
    let token = encode_token(
        user.id,
        &user.name,
        user.role,
        auth.token_ttl_minutes,
        auth.jwt_secret.expose_secret().as_bytes(),
    )?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

pub async fn me(CurrentUser(identity): CurrentUser) -> Json<Identity> {
    Json(identity)
}
