use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::services;
use crate::services::dashboard::RestaurantSummary;

/// Today-vs-yesterday snapshot. Monetary amounts are decimal strings; change
/// fields are percentages rounded to one decimal place.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub orders_today: i64,
    pub orders_yesterday: i64,
    pub orders_change: f64,
    pub revenue_today: String,
    pub revenue_yesterday: String,
    pub revenue_change: f64,
    pub rating_current: i32,
    pub rating_yesterday: f64,
    pub rating_change: f64,
    pub customers_today: i64,
    pub customers_yesterday: i64,
    pub customers_change: f64,
}

impl From<RestaurantSummary> for SummaryResponse {
    fn from(s: RestaurantSummary) -> Self {
        SummaryResponse {
            orders_today: s.orders_today,
            orders_yesterday: s.orders_yesterday,
            orders_change: s.orders_change,
            revenue_today: s.revenue_today.to_string(),
            revenue_yesterday: s.revenue_yesterday.to_string(),
            revenue_change: s.revenue_change,
            rating_current: s.rating_current,
            rating_yesterday: s.rating_yesterday,
            rating_change: s.rating_change,
            customers_today: s.customers_today,
            customers_yesterday: s.customers_yesterday,
            customers_change: s.customers_change,
        }
    }
}

/// GET /restaurant-dashboard/restaurant/{id}/summary
#[utoipa::path(
    get,
    path = "/restaurant-dashboard/restaurant/{id}/summary",
    params(("id" = Uuid, Path, description = "Restaurant UUID")),
    responses(
        (status = 200, description = "Today-vs-yesterday metrics", body = SummaryResponse),
        (status = 404, description = "Restaurant missing or soft-deleted"),
    ),
    tag = "restaurant-dashboard"
)]
pub async fn restaurant_summary(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let restaurant_id = path.into_inner();
    let summary = web::block(move || {
        let mut conn = pool.get()?;
        services::dashboard::summary(&mut conn, restaurant_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(SummaryResponse::from(summary)))
}
