use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, post},
};

use crate::{
    dto::auth::{DeletedAccount, LoginRequest, LoginResponse, RegisterRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    routes::params::DeleteAccountQuery,
    services::auth_service::{delete_account, login_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", delete(delete_me))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<User>),
        (status = 400, description = "Email taken or invalid input")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let resp = register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/auth/me",
    params(DeleteAccountQuery),
    responses(
        (status = 200, description = "Account and its favorites, recipes and reviews deleted", body = ApiResponse<DeletedAccount>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account already deleted")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn delete_me(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DeleteAccountQuery>,
) -> AppResult<Json<ApiResponse<DeletedAccount>>> {
    let resp = delete_account(&state, &user, query.reason).await?;
    Ok(Json(resp))
}
