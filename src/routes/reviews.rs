use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::reviews::ReviewList,
    error::AppResult,
    response::ApiResponse,
    routes::params::ReviewerQuery,
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(reviews_by_reviewers))
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    params(ReviewerQuery),
    responses(
        (status = 200, description = "Reviews written by the given reviewers", body = ApiResponse<ReviewList>)
    ),
    tag = "Reviews"
)]
pub async fn reviews_by_reviewers(
    State(state): State<AppState>,
    Query(query): Query<ReviewerQuery>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::reviews_by_reviewers(&state, query.names()).await?;
    Ok(Json(resp))
}
