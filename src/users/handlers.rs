use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{ChangePasswordRequest, MessageResponse, UpdateProfileRequest},
    model::Profile,
};
use crate::{auth::middleware::AuthContext, error::AppResult, state::AppState};

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me).put(update_me))
        .route("/users/me/password", put(change_password))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> AppResult<Json<Profile>> {
    let profile = state.profiles.get_profile(ctx.user_id).await?;
    Ok(Json(profile))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AppResult<Json<Profile>> {
    let Json(payload) = payload?;
    payload.validate()?;

    let profile = state
        .profiles
        .update_profile(ctx.user_id, payload.email.as_deref())
        .await?;
    Ok(Json(profile))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(payload) = payload?;
    payload.validate()?;

    state
        .profiles
        .change_password(ctx.user_id, &payload.old_password, &payload.new_password)
        .await?;
    Ok(Json(MessageResponse {
        message: "password changed successfully",
    }))
}
