use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use service::subscription::domain::{PeriodCostInput, Subscription, SubscriptionInput};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

pub const USER_COOKIE: &str = "userId";

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// Body of `POST /subscription/total-price`.
#[derive(Debug, Deserialize)]
pub struct TotalPriceRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub start_date: String,
    pub end_date: String,
    /// Absent, `null` and `[]` all mean every service.
    #[serde(default, rename = "service_name")]
    pub service_names: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TotalPriceResponse {
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultResponse {
    pub result: String,
}

fn user_from_cookie(jar: &CookieJar) -> Result<Uuid, JsonApiError> {
    let raw = jar
        .get(USER_COOKIE)
        .ok_or_else(|| JsonApiError::bad_request("missing userId cookie"))?;
    Uuid::parse_str(raw.value()).map_err(|_| JsonApiError::bad_request("userId cookie is not a valid uuid"))
}

fn parse_id(q: Result<Query<IdQuery>, QueryRejection>) -> Result<i32, JsonApiError> {
    let Query(q) = q?;
    let raw = q.id.ok_or_else(|| JsonApiError::bad_request("missing id"))?;
    raw.trim()
        .parse::<i32>()
        .map_err(|_| JsonApiError::bad_request(format!("invalid id {raw:?}")))
}

#[utoipa::path(get, path = "/subscription/users", tag = "subscription",
    params(("userId" = Uuid, Cookie, description = "Owner of the subscriptions")),
    responses(
        (status = 200, description = "Subscriptions ordered by id", body = [crate::openapi::SubscriptionDoc]),
        (status = 400, description = "Missing or invalid cookie", body = crate::openapi::ErrorResponse),
        (status = 404, description = "User has no subscriptions", body = crate::openapi::ErrorResponse)
    ))]
pub async fn list_by_user(State(state): State<ServerState>, jar: CookieJar) -> Result<Json<Vec<Subscription>>, JsonApiError> {
    let user_id = user_from_cookie(&jar)?;
    let list = state.subscriptions.list_by_user(&state.op_context(), user_id).await?;
    Ok(Json(list))
}

#[utoipa::path(post, path = "/subscription", tag = "subscription",
    request_body = crate::openapi::SubscriptionInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::ErrorResponse),
        (status = 409, description = "Same user, service and month already exist", body = crate::openapi::ErrorResponse)
    ))]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<SubscriptionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Subscription>), JsonApiError> {
    let Json(input) = body?;
    let created = state.subscriptions.create(&state.op_context(), input).await?;
    info!(id = created.id, user_id = %created.user_id, service = %created.service_name, "created subscription");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/subscription", tag = "subscription",
    params(("id" = i32, Query, description = "Subscription id")),
    request_body = crate::openapi::SubscriptionInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ResultDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::ErrorResponse),
        (status = 404, description = "No such id", body = crate::openapi::ErrorResponse),
        (status = 409, description = "Conflicts with another row", body = crate::openapi::ErrorResponse)
    ))]
pub async fn update(
    State(state): State<ServerState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    body: Result<Json<SubscriptionInput>, JsonRejection>,
) -> Result<Json<ResultResponse>, JsonApiError> {
    let id = parse_id(query)?;
    let Json(input) = body?;
    state.subscriptions.update(&state.op_context(), id, input).await?;
    info!(id, "updated subscription");
    Ok(Json(ResultResponse { result: "updated".into() }))
}

#[utoipa::path(delete, path = "/subscription", tag = "subscription",
    params(("id" = i32, Query, description = "Subscription id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::ResultDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::ErrorResponse),
        (status = 404, description = "No such id", body = crate::openapi::ErrorResponse)
    ))]
pub async fn delete(
    State(state): State<ServerState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<ResultResponse>, JsonApiError> {
    let id = parse_id(query)?;
    state.subscriptions.delete(&state.op_context(), id).await?;
    info!(id, "deleted subscription");
    Ok(Json(ResultResponse { result: "deleted".into() }))
}

/// Sum of prices over a month range.
///
/// Replaces the former `GET /subscription/total-price`: the filters now travel
/// in a JSON body and the sum is returned as `total` (formerly `result`).
#[utoipa::path(post, path = "/subscription/total-price", tag = "subscription",
    params(("userId" = Option<Uuid>, Cookie, description = "Used when the body has no user_id")),
    request_body = crate::openapi::TotalPriceRequestDoc,
    responses(
        (status = 200, description = "Sum of prices, 0 when nothing matches", body = crate::openapi::TotalPriceDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::ErrorResponse)
    ))]
pub async fn total_price(
    State(state): State<ServerState>,
    jar: CookieJar,
    body: Result<Json<TotalPriceRequest>, JsonRejection>,
) -> Result<Json<TotalPriceResponse>, JsonApiError> {
    let Json(req) = body?;
    let user_id = match req.user_id {
        Some(id) => id,
        None => user_from_cookie(&jar)?,
    };
    let input = PeriodCostInput {
        user_id,
        start_date: req.start_date,
        end_date: req.end_date,
        service_names: req.service_names.unwrap_or_default(),
    };
    let total = state.subscriptions.period_cost(&state.op_context(), input).await?;
    Ok(Json(TotalPriceResponse { total }))
}
