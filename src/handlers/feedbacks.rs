use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::feedback::Feedback;
use crate::services;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFeedbackRequest {
    pub order_id: Uuid,
    /// Raw rating; rounded and clamped into 1..=5 before storage.
    pub rating: f64,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFeedbackRequest {
    pub rating: Option<f64>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListFeedbacksParams {
    /// Only feedback with exactly this stored rating.
    pub rating: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub rating: i32,
    pub content: Option<String>,
    pub order_id: Uuid,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Feedback> for FeedbackResponse {
    fn from(f: Feedback) -> Self {
        FeedbackResponse {
            id: f.id,
            rating: f.rating,
            content: f.content,
            order_id: f.order_id,
            is_active: f.is_active,
            created_at: f.created_at.to_rfc3339(),
            updated_at: f.updated_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /feedbacks
///
/// Writes the feedback and re-derives the restaurant rating in one
/// transaction, so the rating a subsequent read sees already reflects this
/// feedback.
#[utoipa::path(
    post,
    path = "/feedbacks",
    request_body = CreateFeedbackRequest,
    responses(
        (status = 201, description = "Feedback created, rating recomputed", body = FeedbackResponse),
        (status = 404, description = "Order missing or soft-deleted"),
    ),
    tag = "feedbacks"
)]
pub async fn create_feedback(
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    body: web::Json<CreateFeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let policy = config.empty_feedback_policy;
    let feedback = web::block(move || {
        let mut conn = pool.get()?;
        services::feedbacks::create(
            &mut conn,
            services::feedbacks::CreateFeedback {
                order_id: body.order_id,
                rating: body.rating,
                content: body.content,
            },
            policy,
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(FeedbackResponse::from(feedback)))
}

/// GET /feedbacks/restaurant/{id}
#[utoipa::path(
    get,
    path = "/feedbacks/restaurant/{id}",
    params(
        ("id" = Uuid, Path, description = "Restaurant UUID"),
        ("rating" = Option<i32>, Query, description = "Only feedback with exactly this rating"),
    ),
    responses(
        (status = 200, description = "Active feedback for the restaurant", body = [FeedbackResponse]),
        (status = 404, description = "Restaurant missing or soft-deleted"),
    ),
    tag = "feedbacks"
)]
pub async fn list_feedbacks_by_restaurant(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<ListFeedbacksParams>,
) -> Result<HttpResponse, AppError> {
    let restaurant_id = path.into_inner();
    let rating = query.rating;
    let feedbacks = web::block(move || {
        let mut conn = pool.get()?;
        services::feedbacks::list_by_restaurant(&mut conn, restaurant_id, rating)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    let items: Vec<FeedbackResponse> = feedbacks.into_iter().map(FeedbackResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /feedbacks/{id}
#[utoipa::path(
    get,
    path = "/feedbacks/{id}",
    params(("id" = Uuid, Path, description = "Feedback UUID")),
    responses(
        (status = 200, description = "Feedback found", body = FeedbackResponse),
        (status = 404, description = "Feedback missing or soft-deleted"),
    ),
    tag = "feedbacks"
)]
pub async fn get_feedback(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let feedback = web::block(move || {
        let mut conn = pool.get()?;
        services::feedbacks::get(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(FeedbackResponse::from(feedback)))
}

/// PATCH /feedbacks/{id}
#[utoipa::path(
    patch,
    path = "/feedbacks/{id}",
    request_body = UpdateFeedbackRequest,
    params(("id" = Uuid, Path, description = "Feedback UUID")),
    responses(
        (status = 200, description = "Feedback updated, rating recomputed", body = FeedbackResponse),
        (status = 404, description = "Feedback missing or soft-deleted"),
    ),
    tag = "feedbacks"
)]
pub async fn update_feedback(
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateFeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let policy = config.empty_feedback_policy;
    let feedback = web::block(move || {
        let mut conn = pool.get()?;
        services::feedbacks::update(
            &mut conn,
            id,
            services::feedbacks::UpdateFeedback {
                rating: body.rating,
                content: body.content.map(Some),
            },
            policy,
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(FeedbackResponse::from(feedback)))
}

/// DELETE /feedbacks/{id}
#[utoipa::path(
    delete,
    path = "/feedbacks/{id}",
    params(("id" = Uuid, Path, description = "Feedback UUID")),
    responses(
        (status = 204, description = "Feedback soft-deleted, rating recomputed"),
        (status = 404, description = "Feedback missing or already soft-deleted"),
    ),
    tag = "feedbacks"
)]
pub async fn delete_feedback(
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let policy = config.empty_feedback_policy;
    web::block(move || {
        let mut conn = pool.get()?;
        services::feedbacks::soft_delete(&mut conn, id, policy)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::NoContent().finish())
}
