use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::models::category::{Category, NewCategory};
use crate::schema::categories;

pub fn create(conn: &mut PgConnection, name: String) -> Result<Category, DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidInput("name must not be empty".into()));
    }
    diesel::insert_into(categories::table)
        .values(&NewCategory {
            id: Uuid::new_v4(),
            name,
        })
        .returning(Category::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub fn list(conn: &mut PgConnection) -> Result<Vec<Category>, DomainError> {
    categories::table
        .filter(categories::is_active.eq(true))
        .select(Category::as_select())
        .order(categories::name.asc())
        .load(conn)
        .map_err(Into::into)
}

pub fn get(conn: &mut PgConnection, id: Uuid) -> Result<Category, DomainError> {
    categories::table
        .filter(categories::id.eq(id))
        .filter(categories::is_active.eq(true))
        .select(Category::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("category {id} not found")))
}

pub fn update(conn: &mut PgConnection, id: Uuid, name: String) -> Result<Category, DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidInput("name must not be empty".into()));
    }
    diesel::update(
        categories::table
            .filter(categories::id.eq(id))
            .filter(categories::is_active.eq(true)),
    )
    .set((categories::name.eq(name), categories::updated_at.eq(Utc::now())))
    .returning(Category::as_returning())
    .get_result(conn)
    .optional()?
    .ok_or_else(|| DomainError::NotFound(format!("category {id} not found")))
}

pub fn soft_delete(conn: &mut PgConnection, id: Uuid) -> Result<(), DomainError> {
    let affected = diesel::update(
        categories::table
            .filter(categories::id.eq(id))
            .filter(categories::is_active.eq(true)),
    )
    .set((categories::is_active.eq(false), categories::updated_at.eq(Utc::now())))
    .execute(conn)?;
    if affected == 0 {
        return Err(DomainError::NotFound(format!("category {id} not found")));
    }
    Ok(())
}

pub fn ensure_active(conn: &mut PgConnection, id: Uuid) -> Result<(), DomainError> {
    let present: bool = diesel::select(diesel::dsl::exists(
        categories::table
            .filter(categories::id.eq(id))
            .filter(categories::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if !present {
        return Err(DomainError::NotFound(format!("category {id} not found")));
    }
    Ok(())
}
