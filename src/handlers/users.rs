use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user::{User, UserChanges, ROLE_CUSTOMER};
use crate::services;

use super::Pagination;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    /// Role code: 1 = customer, 2 = seller, 3 = admin. Defaults to customer.
    pub role: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub role: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            name: u.name,
            email: u.email,
            phone: u.phone,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListUsersResponse {
    pub items: Vec<UserResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /users
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failure or duplicate email"),
    ),
    tag = "users"
)]
pub async fn create_user(
    pool: web::Data<DbPool>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let user = web::block(move || {
        let mut conn = pool.get()?;
        services::users::create(
            &mut conn,
            services::users::CreateUser {
                name: body.name,
                email: body.email,
                password: body.password,
                phone: body.phone,
                role: body.role.unwrap_or(ROLE_CUSTOMER),
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of active users", body = ListUsersResponse),
    ),
    tag = "users"
)]
pub async fn list_users(
    pool: web::Data<DbPool>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = query.clamped();
    let result = web::block(move || {
        let mut conn = pool.get()?;
        services::users::list(&mut conn, page, limit)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(ListUsersResponse {
        items: result.items.into_iter().map(UserResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// GET /users/all
///
/// Escape hatch that includes soft-deleted rows.
#[utoipa::path(
    get,
    path = "/users/all",
    responses(
        (status = 200, description = "Every user row, tombstoned or not", body = [UserResponse]),
    ),
    tag = "users"
)]
pub async fn list_all_users(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let users = web::block(move || {
        let mut conn = pool.get()?;
        services::users::list_all(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    let items: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /users/{id}
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User missing or soft-deleted"),
    ),
    tag = "users"
)]
pub async fn get_user(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let user = web::block(move || {
        let mut conn = pool.get()?;
        services::users::get(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PATCH /users/{id}
#[utoipa::path(
    patch,
    path = "/users/{id}",
    request_body = UpdateUserRequest,
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation failure or duplicate email"),
        (status = 404, description = "User missing or soft-deleted"),
    ),
    tag = "users"
)]
pub async fn update_user(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let user = web::block(move || {
        let mut conn = pool.get()?;
        services::users::update(
            &mut conn,
            id,
            UserChanges {
                name: body.name,
                email: body.email,
                password: body.password,
                phone: body.phone.map(Some),
                role: body.role,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// DELETE /users/{id}
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 204, description = "User soft-deleted"),
        (status = 404, description = "User missing or already soft-deleted"),
    ),
    tag = "users"
)]
pub async fn delete_user(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || {
        let mut conn = pool.get()?;
        services::users::soft_delete(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::NoContent().finish())
}
