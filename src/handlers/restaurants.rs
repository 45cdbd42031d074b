use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::restaurant::{Restaurant, RestaurantChanges};
use crate::services;
use crate::services::restaurants::RestaurantSearch;

use super::parse_id_list;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
    pub address_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub address_id: Option<Uuid>,
}

/// Category filters take comma-separated UUID lists; every id in a list must
/// match (intersection, not union).
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListRestaurantsParams {
    /// Name substring filter.
    pub q: Option<String>,
    pub product_category_ids: Option<String>,
    pub restaurant_category_ids: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub rating: Option<i32>,
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
    pub address_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(r: Restaurant) -> Self {
        RestaurantResponse {
            id: r.id,
            name: r.name,
            description: r.description,
            rating: r.rating,
            category_id: r.category_id,
            user_id: r.user_id,
            address_id: r.address_id,
            is_active: r.is_active,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /restaurants
#[utoipa::path(
    post,
    path = "/restaurants",
    request_body = CreateRestaurantRequest,
    responses(
        (status = 201, description = "Restaurant created", body = RestaurantResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Owner or category missing"),
    ),
    tag = "restaurants"
)]
pub async fn create_restaurant(
    pool: web::Data<DbPool>,
    body: web::Json<CreateRestaurantRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let restaurant = web::block(move || {
        let mut conn = pool.get()?;
        services::restaurants::create(
            &mut conn,
            services::restaurants::CreateRestaurant {
                name: body.name,
                description: body.description,
                category_id: body.category_id,
                user_id: body.user_id,
                address_id: body.address_id,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(RestaurantResponse::from(restaurant)))
}

/// GET /restaurants
///
/// Doubles as the search endpoint: optional name substring plus optional
/// product/restaurant category intersection filters.
#[utoipa::path(
    get,
    path = "/restaurants",
    params(
        ("q" = Option<String>, Query, description = "Name substring filter"),
        ("product_category_ids" = Option<String>, Query, description = "Comma-separated category UUIDs a product must all carry"),
        ("restaurant_category_ids" = Option<String>, Query, description = "Comma-separated category UUIDs the restaurant must all carry"),
    ),
    responses(
        (status = 200, description = "Matching active restaurants", body = [RestaurantResponse]),
        (status = 400, description = "Malformed category id"),
    ),
    tag = "restaurants"
)]
pub async fn list_restaurants(
    pool: web::Data<DbPool>,
    query: web::Query<ListRestaurantsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let filter = RestaurantSearch {
        name: params.q,
        product_category_ids: parse_id_list(params.product_category_ids.as_deref())?,
        restaurant_category_ids: parse_id_list(params.restaurant_category_ids.as_deref())?,
    };
    let restaurants = web::block(move || {
        let mut conn = pool.get()?;
        services::restaurants::search(&mut conn, &filter)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    let items: Vec<RestaurantResponse> = restaurants.into_iter().map(RestaurantResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /restaurants/{id}
#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    params(("id" = Uuid, Path, description = "Restaurant UUID")),
    responses(
        (status = 200, description = "Restaurant found", body = RestaurantResponse),
        (status = 404, description = "Restaurant missing or soft-deleted"),
    ),
    tag = "restaurants"
)]
pub async fn get_restaurant(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let restaurant = web::block(move || {
        let mut conn = pool.get()?;
        services::restaurants::get(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(RestaurantResponse::from(restaurant)))
}

/// PATCH /restaurants/{id}
///
/// `rating` is not accepted here; it only moves through the feedback
/// recompute.
#[utoipa::path(
    patch,
    path = "/restaurants/{id}",
    request_body = UpdateRestaurantRequest,
    params(("id" = Uuid, Path, description = "Restaurant UUID")),
    responses(
        (status = 200, description = "Restaurant updated", body = RestaurantResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Restaurant or category missing"),
    ),
    tag = "restaurants"
)]
pub async fn update_restaurant(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateRestaurantRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let restaurant = web::block(move || {
        let mut conn = pool.get()?;
        services::restaurants::update(
            &mut conn,
            id,
            RestaurantChanges {
                name: body.name,
                description: body.description.map(Some),
                category_id: body.category_id.map(Some),
                address_id: body.address_id.map(Some),
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(RestaurantResponse::from(restaurant)))
}

/// DELETE /restaurants/{id}
#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    params(("id" = Uuid, Path, description = "Restaurant UUID")),
    responses(
        (status = 204, description = "Restaurant soft-deleted"),
        (status = 404, description = "Restaurant missing or already soft-deleted"),
    ),
    tag = "restaurants"
)]
pub async fn delete_restaurant(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || {
        let mut conn = pool.get()?;
        services::restaurants::soft_delete(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::NoContent().finish())
}
