use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::category_map::{CategoryProductMap, CategoryRestaurantMap};
use crate::services;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductMapRequest {
    pub category_id: Uuid,
    pub product_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantMapRequest {
    pub category_id: Uuid,
    pub restaurant_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductMapResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub product_id: Uuid,
    pub created_at: String,
}

impl From<CategoryProductMap> for ProductMapResponse {
    fn from(m: CategoryProductMap) -> Self {
        ProductMapResponse {
            id: m.id,
            category_id: m.category_id,
            product_id: m.product_id,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantMapResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub restaurant_id: Uuid,
    pub created_at: String,
}

impl From<CategoryRestaurantMap> for RestaurantMapResponse {
    fn from(m: CategoryRestaurantMap) -> Self {
        RestaurantMapResponse {
            id: m.id,
            category_id: m.category_id,
            restaurant_id: m.restaurant_id,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// POST /category-product-maps
#[utoipa::path(
    post,
    path = "/category-product-maps",
    request_body = CreateProductMapRequest,
    responses(
        (status = 201, description = "Product tagged with category", body = ProductMapResponse),
        (status = 400, description = "Duplicate mapping"),
        (status = 404, description = "Category or product missing"),
    ),
    tag = "category-maps"
)]
pub async fn create_product_map(
    pool: web::Data<DbPool>,
    body: web::Json<CreateProductMapRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let map = web::block(move || {
        let mut conn = pool.get()?;
        services::category_maps::create_product_map(&mut conn, body.category_id, body.product_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(ProductMapResponse::from(map)))
}

/// GET /category-product-maps
#[utoipa::path(
    get,
    path = "/category-product-maps",
    responses(
        (status = 200, description = "Active product-category mappings", body = [ProductMapResponse]),
    ),
    tag = "category-maps"
)]
pub async fn list_product_maps(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let maps = web::block(move || {
        let mut conn = pool.get()?;
        services::category_maps::list_product_maps(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    let items: Vec<ProductMapResponse> = maps.into_iter().map(ProductMapResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// DELETE /category-product-maps/{id}
#[utoipa::path(
    delete,
    path = "/category-product-maps/{id}",
    params(("id" = Uuid, Path, description = "Mapping UUID")),
    responses(
        (status = 204, description = "Mapping soft-deleted"),
        (status = 404, description = "Mapping missing or already soft-deleted"),
    ),
    tag = "category-maps"
)]
pub async fn delete_product_map(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || {
        let mut conn = pool.get()?;
        services::category_maps::soft_delete_product_map(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /category-restaurant-maps
#[utoipa::path(
    post,
    path = "/category-restaurant-maps",
    request_body = CreateRestaurantMapRequest,
    responses(
        (status = 201, description = "Restaurant tagged with category", body = RestaurantMapResponse),
        (status = 400, description = "Duplicate mapping"),
        (status = 404, description = "Category or restaurant missing"),
    ),
    tag = "category-maps"
)]
pub async fn create_restaurant_map(
    pool: web::Data<DbPool>,
    body: web::Json<CreateRestaurantMapRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let map = web::block(move || {
        let mut conn = pool.get()?;
        services::category_maps::create_restaurant_map(&mut conn, body.category_id, body.restaurant_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(RestaurantMapResponse::from(map)))
}

/// GET /category-restaurant-maps
#[utoipa::path(
    get,
    path = "/category-restaurant-maps",
    responses(
        (status = 200, description = "Active restaurant-category mappings", body = [RestaurantMapResponse]),
    ),
    tag = "category-maps"
)]
pub async fn list_restaurant_maps(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let maps = web::block(move || {
        let mut conn = pool.get()?;
        services::category_maps::list_restaurant_maps(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    let items: Vec<RestaurantMapResponse> = maps.into_iter().map(RestaurantMapResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// DELETE /category-restaurant-maps/{id}
#[utoipa::path(
    delete,
    path = "/category-restaurant-maps/{id}",
    params(("id" = Uuid, Path, description = "Mapping UUID")),
    responses(
        (status = 204, description = "Mapping soft-deleted"),
        (status = 404, description = "Mapping missing or already soft-deleted"),
    ),
    tag = "category-maps"
)]
pub async fn delete_restaurant_map(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || {
        let mut conn = pool.get()?;
        services::category_maps::soft_delete_restaurant_map(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::NoContent().finish())
}
