//! Patron endpoints

use axum::{extract::State, http::StatusCode, Form, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, FormFailure, FormResult},
    models::user::{AddUserForm, User},
    AppState,
};

/// User registered response
#[derive(Serialize, ToSchema)]
pub struct UserCreatedResponse {
    pub message: String,
    pub user: User,
}

/// Blank registration form
#[utoipa::path(
    get,
    path = "/add_user",
    tag = "users",
    responses(
        (status = 200, description = "Empty form", body = AddUserForm)
    )
)]
pub async fn add_user_form() -> Json<AddUserForm> {
    Json(AddUserForm::default())
}

/// Register a user
#[utoipa::path(
    post,
    path = "/add_user",
    tag = "users",
    request_body(content = AddUserForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "User registered", body = UserCreatedResponse),
        (status = 400, description = "Missing field", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_user(
    State(state): State<AppState>,
    Form(form): Form<AddUserForm>,
) -> FormResult<(StatusCode, Json<UserCreatedResponse>)> {
    let form = form.trimmed();
    let new_user = form.clone().parse().map_err(|e| FormFailure::new(e, &form))?;

    let user = state
        .services
        .patrons
        .add_user(new_user)
        .await
        .map_err(|e| FormFailure::new(e, &form))?;

    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            message: "User registered successfully.".to_string(),
            user,
        }),
    ))
}

/// List users by name
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Users", body = Vec<User>)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.services.patrons.list_users().await?;
    Ok(Json(users))
}
