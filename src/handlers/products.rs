use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::models::product::{Product, ProductChanges};
use crate::services;

use super::{parse_id_list, Pagination};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub restaurant_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchProductsParams {
    /// Name substring filter.
    pub q: Option<String>,
    /// Comma-separated category UUIDs the product must all carry.
    pub category_ids: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub restaurant_id: Uuid,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price.to_string(),
            restaurant_id: p.restaurant_id,
            is_active: p.is_active,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListProductsResponse {
    pub items: Vec<ProductResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

fn parse_price(raw: &str) -> Result<BigDecimal, DomainError> {
    BigDecimal::from_str(raw)
        .map_err(|e| DomainError::InvalidInput(format!("invalid price '{raw}': {e}")))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Restaurant missing"),
    ),
    tag = "products"
)]
pub async fn create_product(
    pool: web::Data<DbPool>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let product = web::block(move || {
        let mut conn = pool.get()?;
        services::products::create(
            &mut conn,
            services::products::CreateProduct {
                name: body.name,
                description: body.description,
                price: parse_price(&body.price)?,
                restaurant_id: body.restaurant_id,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of active products", body = ListProductsResponse),
    ),
    tag = "products"
)]
pub async fn list_products(
    pool: web::Data<DbPool>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = query.clamped();
    let result = web::block(move || {
        let mut conn = pool.get()?;
        services::products::list(&mut conn, page, limit)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(ListProductsResponse {
        items: result.items.into_iter().map(ProductResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// GET /products/search
#[utoipa::path(
    get,
    path = "/products/search",
    params(
        ("q" = Option<String>, Query, description = "Name substring filter"),
        ("category_ids" = Option<String>, Query, description = "Comma-separated category UUIDs the product must all carry"),
    ),
    responses(
        (status = 200, description = "Matching active products", body = [ProductResponse]),
        (status = 400, description = "Malformed category id"),
    ),
    tag = "products"
)]
pub async fn search_products(
    pool: web::Data<DbPool>,
    query: web::Query<SearchProductsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let category_ids = parse_id_list(params.category_ids.as_deref())?;
    let products = web::block(move || {
        let mut conn = pool.get()?;
        services::products::search(&mut conn, params.q.as_deref(), &category_ids)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    let items: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product missing or soft-deleted"),
    ),
    tag = "products"
)]
pub async fn get_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = web::block(move || {
        let mut conn = pool.get()?;
        services::products::get(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// PATCH /products/{id}
#[utoipa::path(
    patch,
    path = "/products/{id}",
    request_body = UpdateProductRequest,
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Product missing or soft-deleted"),
    ),
    tag = "products"
)]
pub async fn update_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let product = web::block(move || {
        let mut conn = pool.get()?;
        let price = body.price.as_deref().map(parse_price).transpose()?;
        services::products::update(
            &mut conn,
            id,
            ProductChanges {
                name: body.name,
                description: body.description.map(Some),
                price,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// DELETE /products/{id}
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 204, description = "Product soft-deleted"),
        (status = 404, description = "Product missing or already soft-deleted"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || {
        let mut conn = pool.get()?;
        services::products::soft_delete(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::NoContent().finish())
}
