use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::services;
use crate::services::revenue::{ReportPeriod, RevenueReport};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RevenueReportParams {
    /// One of "week", "month", "year". Defaults to "month".
    pub period: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueBucketResponse {
    /// "YYYY-MM-DD" for day buckets, "YYYY-MM" for month buckets.
    pub label: String,
    pub orders: i64,
    pub revenue: String,
    pub cumulative_revenue: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueReportResponse {
    pub period: String,
    pub buckets: Vec<RevenueBucketResponse>,
    pub total_orders: i64,
    pub total_revenue: String,
}

impl From<RevenueReport> for RevenueReportResponse {
    fn from(r: RevenueReport) -> Self {
        RevenueReportResponse {
            period: r.period.as_str().to_string(),
            buckets: r
                .buckets
                .into_iter()
                .map(|b| RevenueBucketResponse {
                    label: b.label,
                    orders: b.orders,
                    revenue: b.revenue.to_string(),
                    cumulative_revenue: b.cumulative_revenue.to_string(),
                })
                .collect(),
            total_orders: r.total_orders,
            total_revenue: r.total_revenue.to_string(),
        }
    }
}

/// GET /revenue-reports/restaurant/{id}/summary
#[utoipa::path(
    get,
    path = "/revenue-reports/restaurant/{id}/summary",
    params(
        ("id" = Uuid, Path, description = "Restaurant UUID"),
        ("period" = Option<String>, Query, description = "week, month (default) or year"),
    ),
    responses(
        (status = 200, description = "Cumulative revenue buckets", body = RevenueReportResponse),
        (status = 400, description = "Unknown period"),
        (status = 404, description = "Restaurant missing or soft-deleted"),
    ),
    tag = "revenue-reports"
)]
pub async fn revenue_summary(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<RevenueReportParams>,
) -> Result<HttpResponse, AppError> {
    let restaurant_id = path.into_inner();
    let period = ReportPeriod::parse(query.period.as_deref()).map_err(AppError::from)?;
    let report = web::block(move || {
        let mut conn = pool.get()?;
        services::revenue::summary(&mut conn, restaurant_id, period)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(RevenueReportResponse::from(report)))
}
