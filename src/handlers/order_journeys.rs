use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::order_journey::OrderJourney;
use crate::services;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderJourneyRequest {
    pub order_id: Uuid,
    pub content: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Waypoint timestamp; defaults to now.
    pub timeline: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderJourneyResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub content: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timeline: String,
    pub created_at: String,
}

impl From<OrderJourney> for OrderJourneyResponse {
    fn from(j: OrderJourney) -> Self {
        OrderJourneyResponse {
            id: j.id,
            order_id: j.order_id,
            content: j.content,
            latitude: j.latitude,
            longitude: j.longitude,
            timeline: j.timeline.to_rfc3339(),
            created_at: j.created_at.to_rfc3339(),
        }
    }
}

/// POST /order-journeys
#[utoipa::path(
    post,
    path = "/order-journeys",
    request_body = CreateOrderJourneyRequest,
    responses(
        (status = 201, description = "Waypoint appended", body = OrderJourneyResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Order missing or soft-deleted"),
    ),
    tag = "order-journeys"
)]
pub async fn create_order_journey(
    pool: web::Data<DbPool>,
    body: web::Json<CreateOrderJourneyRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let journey = web::block(move || {
        let mut conn = pool.get()?;
        services::order_journeys::create(
            &mut conn,
            services::order_journeys::CreateOrderJourney {
                order_id: body.order_id,
                content: body.content,
                latitude: body.latitude,
                longitude: body.longitude,
                timeline: body.timeline,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(OrderJourneyResponse::from(journey)))
}

/// GET /order-journeys/order/{id}
#[utoipa::path(
    get,
    path = "/order-journeys/order/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Waypoints of the order, oldest first", body = [OrderJourneyResponse]),
        (status = 404, description = "Order missing or soft-deleted"),
    ),
    tag = "order-journeys"
)]
pub async fn list_order_journeys(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let journeys = web::block(move || {
        let mut conn = pool.get()?;
        services::order_journeys::list_by_order(&mut conn, order_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    let items: Vec<OrderJourneyResponse> = journeys.into_iter().map(OrderJourneyResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /order-journeys/{id}
#[utoipa::path(
    get,
    path = "/order-journeys/{id}",
    params(("id" = Uuid, Path, description = "Waypoint UUID")),
    responses(
        (status = 200, description = "Waypoint found", body = OrderJourneyResponse),
        (status = 404, description = "Waypoint missing or soft-deleted"),
    ),
    tag = "order-journeys"
)]
pub async fn get_order_journey(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let journey = web::block(move || {
        let mut conn = pool.get()?;
        services::order_journeys::get(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(OrderJourneyResponse::from(journey)))
}

/// DELETE /order-journeys/{id}
#[utoipa::path(
    delete,
    path = "/order-journeys/{id}",
    params(("id" = Uuid, Path, description = "Waypoint UUID")),
    responses(
        (status = 204, description = "Waypoint soft-deleted"),
        (status = 404, description = "Waypoint missing or already soft-deleted"),
    ),
    tag = "order-journeys"
)]
pub async fn delete_order_journey(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || {
        let mut conn = pool.get()?;
        services::order_journeys::soft_delete(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::NoContent().finish())
}
