use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::models::user::{NewUser, User, UserChanges, ROLE_ADMIN, ROLE_CUSTOMER};
use crate::schema::users;

use super::Page;

#[derive(Debug)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: i32,
}

fn email_taken(conn: &mut PgConnection, email: &str, exclude: Option<Uuid>) -> Result<bool, DomainError> {
    let query = users::table
        .filter(users::email.eq(email))
        .filter(users::is_active.eq(true));
    let taken = match exclude {
        Some(id) => diesel::select(diesel::dsl::exists(query.filter(users::id.ne(id))))
            .get_result(conn)?,
        None => diesel::select(diesel::dsl::exists(query)).get_result(conn)?,
    };
    Ok(taken)
}

pub fn create(conn: &mut PgConnection, input: CreateUser) -> Result<User, DomainError> {
    if input.name.trim().is_empty() {
        return Err(DomainError::InvalidInput("name must not be empty".into()));
    }
    if input.email.trim().is_empty() {
        return Err(DomainError::InvalidInput("email must not be empty".into()));
    }
    if input.password.is_empty() {
        return Err(DomainError::InvalidInput("password must not be empty".into()));
    }
    if !(ROLE_CUSTOMER..=ROLE_ADMIN).contains(&input.role) {
        return Err(DomainError::InvalidInput(format!(
            "unknown role code {}",
            input.role
        )));
    }
    if email_taken(conn, &input.email, None)? {
        return Err(DomainError::InvalidInput(format!(
            "email {} is already registered",
            input.email
        )));
    }

    diesel::insert_into(users::table)
        .values(&NewUser {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            password: input.password,
            phone: input.phone,
            role: input.role,
        })
        .returning(User::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub fn list(conn: &mut PgConnection, page: i64, limit: i64) -> Result<Page<User>, DomainError> {
    let offset = (page - 1) * limit;
    let total: i64 = users::table
        .filter(users::is_active.eq(true))
        .count()
        .get_result(conn)?;
    let items = users::table
        .filter(users::is_active.eq(true))
        .select(User::as_select())
        .order(users::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load(conn)?;
    Ok(Page { items, total })
}

/// Escape hatch: the only listing that includes soft-deleted rows.
pub fn list_all(conn: &mut PgConnection) -> Result<Vec<User>, DomainError> {
    users::table
        .select(User::as_select())
        .order(users::created_at.desc())
        .load(conn)
        .map_err(Into::into)
}

pub fn get(conn: &mut PgConnection, id: Uuid) -> Result<User, DomainError> {
    users::table
        .filter(users::id.eq(id))
        .filter(users::is_active.eq(true))
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("user {id} not found")))
}

pub fn update(conn: &mut PgConnection, id: Uuid, changes: UserChanges) -> Result<User, DomainError> {
    if let Some(name) = &changes.name {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidInput("name must not be empty".into()));
        }
    }
    if let Some(role) = changes.role {
        if !(ROLE_CUSTOMER..=ROLE_ADMIN).contains(&role) {
            return Err(DomainError::InvalidInput(format!("unknown role code {role}")));
        }
    }
    if let Some(email) = &changes.email {
        if email.trim().is_empty() {
            return Err(DomainError::InvalidInput("email must not be empty".into()));
        }
        if email_taken(conn, email, Some(id))? {
            return Err(DomainError::InvalidInput(format!(
                "email {email} is already registered"
            )));
        }
    }

    diesel::update(users::table.filter(users::id.eq(id)).filter(users::is_active.eq(true)))
        .set((&changes, users::updated_at.eq(Utc::now())))
        .returning(User::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("user {id} not found")))
}

pub fn soft_delete(conn: &mut PgConnection, id: Uuid) -> Result<(), DomainError> {
    let affected = diesel::update(users::table.filter(users::id.eq(id)).filter(users::is_active.eq(true)))
        .set((users::is_active.eq(false), users::updated_at.eq(Utc::now())))
        .execute(conn)?;
    if affected == 0 {
        return Err(DomainError::NotFound(format!("user {id} not found")));
    }
    Ok(())
}
