use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::category::Category;
use crate::services;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        CategoryResponse {
            id: c.id,
            name: c.name,
            is_active: c.is_active,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// POST /categories
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation failure"),
    ),
    tag = "categories"
)]
pub async fn create_category(
    pool: web::Data<DbPool>,
    body: web::Json<CategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let category = web::block(move || {
        let mut conn = pool.get()?;
        services::categories::create(&mut conn, body.name)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(CategoryResponse::from(category)))
}

/// GET /categories
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Active categories by name", body = [CategoryResponse]),
    ),
    tag = "categories"
)]
pub async fn list_categories(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let categories = web::block(move || {
        let mut conn = pool.get()?;
        services::categories::list(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    let items: Vec<CategoryResponse> = categories.into_iter().map(CategoryResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /categories/{id}
#[utoipa::path(
    get,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category missing or soft-deleted"),
    ),
    tag = "categories"
)]
pub async fn get_category(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let category = web::block(move || {
        let mut conn = pool.get()?;
        services::categories::get(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// PATCH /categories/{id}
#[utoipa::path(
    patch,
    path = "/categories/{id}",
    request_body = CategoryRequest,
    params(("id" = Uuid, Path, description = "Category UUID")),
    responses(
        (status = 200, description = "Category renamed", body = CategoryResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Category missing or soft-deleted"),
    ),
    tag = "categories"
)]
pub async fn update_category(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let category = web::block(move || {
        let mut conn = pool.get()?;
        services::categories::update(&mut conn, id, body.name)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// DELETE /categories/{id}
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    responses(
        (status = 204, description = "Category soft-deleted"),
        (status = 404, description = "Category missing or already soft-deleted"),
    ),
    tag = "categories"
)]
pub async fn delete_category(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || {
        let mut conn = pool.get()?;
        services::categories::soft_delete(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::NoContent().finish())
}
