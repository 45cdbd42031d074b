use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::models::order::{Order, OrderChanges};
use crate::services;
use crate::services::orders::OrderListFilter;

use super::Pagination;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Decimal amount as a string to avoid floating-point issues, e.g. "24.90"
    pub total_price: String,
    pub shipping_fee: Option<String>,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub address_id: Option<Uuid>,
    pub discount_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub total_price: Option<String>,
    /// Lifecycle code 1-5; 4 marks the order completed and paid.
    pub status: Option<i32>,
    pub shipping_fee: Option<String>,
    pub address_id: Option<Uuid>,
    pub discount_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    #[serde(default = "super::default_page")]
    pub page: i64,
    #[serde(default = "super::default_limit")]
    pub limit: i64,
    pub user_id: Option<Uuid>,
    pub restaurant_id: Option<Uuid>,
    pub status: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub total_price: String,
    pub status: i32,
    pub shipping_fee: String,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub address_id: Option<Uuid>,
    pub discount_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        OrderResponse {
            id: o.id,
            total_price: o.total_price.to_string(),
            status: o.status,
            shipping_fee: o.shipping_fee.to_string(),
            user_id: o.user_id,
            restaurant_id: o.restaurant_id,
            address_id: o.address_id,
            discount_id: o.discount_id,
            is_active: o.is_active,
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

fn parse_amount(label: &str, raw: &str) -> Result<BigDecimal, DomainError> {
    BigDecimal::from_str(raw)
        .map_err(|e| DomainError::InvalidInput(format!("invalid {label} '{raw}': {e}")))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Customer or restaurant missing"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    pool: web::Data<DbPool>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let order = web::block(move || {
        let mut conn = pool.get()?;
        let total_price = parse_amount("total_price", &body.total_price)?;
        let shipping_fee = body
            .shipping_fee
            .as_deref()
            .map(|raw| parse_amount("shipping_fee", raw))
            .transpose()?
            .unwrap_or_else(|| BigDecimal::from(0));
        services::orders::create(
            &mut conn,
            services::orders::CreateOrder {
                total_price,
                shipping_fee,
                user_id: body.user_id,
                restaurant_id: body.restaurant_id,
                address_id: body.address_id,
                discount_id: body.discount_id,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("user_id" = Option<Uuid>, Query, description = "Only orders placed by this user"),
        ("restaurant_id" = Option<Uuid>, Query, description = "Only orders of this restaurant"),
        ("status" = Option<i32>, Query, description = "Only orders in this lifecycle state"),
    ),
    responses(
        (status = 200, description = "Paginated list of active orders", body = ListOrdersResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    pool: web::Data<DbPool>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let pagination = Pagination {
        page: params.page,
        limit: params.limit,
    };
    let (page, limit) = pagination.clamped();
    let filter = OrderListFilter {
        user_id: params.user_id,
        restaurant_id: params.restaurant_id,
        status: params.status,
    };
    let result = web::block(move || {
        let mut conn = pool.get()?;
        services::orders::list(&mut conn, &filter, page, limit)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order missing or soft-deleted"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let order = web::block(move || {
        let mut conn = pool.get()?;
        services::orders::get(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PATCH /orders/{id}
#[utoipa::path(
    patch,
    path = "/orders/{id}",
    request_body = UpdateOrderRequest,
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Validation failure or unknown status code"),
        (status = 404, description = "Order missing or soft-deleted"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let order = web::block(move || {
        let mut conn = pool.get()?;
        let total_price = body
            .total_price
            .as_deref()
            .map(|raw| parse_amount("total_price", raw))
            .transpose()?;
        let shipping_fee = body
            .shipping_fee
            .as_deref()
            .map(|raw| parse_amount("shipping_fee", raw))
            .transpose()?;
        services::orders::update(
            &mut conn,
            id,
            OrderChanges {
                total_price,
                status: body.status,
                shipping_fee,
                address_id: body.address_id.map(Some),
                discount_id: body.discount_id.map(Some),
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// DELETE /orders/{id}
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 204, description = "Order soft-deleted"),
        (status = 404, description = "Order missing or already soft-deleted"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || {
        let mut conn = pool.get()?;
        services::orders::soft_delete(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::NoContent().finish())
}
