use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::models::order::{NewOrder, Order, OrderChanges, OrderStatus};
use crate::schema::{orders, restaurants, users};

use super::Page;

#[derive(Debug)]
pub struct CreateOrder {
    pub total_price: BigDecimal,
    pub shipping_fee: BigDecimal,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub address_id: Option<Uuid>,
    pub discount_id: Option<Uuid>,
}

#[derive(Debug, Default)]
pub struct OrderListFilter {
    pub user_id: Option<Uuid>,
    pub restaurant_id: Option<Uuid>,
    pub status: Option<i32>,
}

pub fn create(conn: &mut PgConnection, input: CreateOrder) -> Result<Order, DomainError> {
    if input.total_price < BigDecimal::from(0) {
        return Err(DomainError::InvalidInput("total_price must not be negative".into()));
    }
    if input.shipping_fee < BigDecimal::from(0) {
        return Err(DomainError::InvalidInput("shipping_fee must not be negative".into()));
    }
    let customer_present: bool = diesel::select(diesel::dsl::exists(
        users::table
            .filter(users::id.eq(input.user_id))
            .filter(users::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if !customer_present {
        return Err(DomainError::NotFound(format!("user {} not found", input.user_id)));
    }
    let restaurant_present: bool = diesel::select(diesel::dsl::exists(
        restaurants::table
            .filter(restaurants::id.eq(input.restaurant_id))
            .filter(restaurants::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if !restaurant_present {
        return Err(DomainError::NotFound(format!(
            "restaurant {} not found",
            input.restaurant_id
        )));
    }

    diesel::insert_into(orders::table)
        .values(&NewOrder {
            id: Uuid::new_v4(),
            total_price: input.total_price,
            status: OrderStatus::Pending.code(),
            shipping_fee: input.shipping_fee,
            user_id: input.user_id,
            restaurant_id: input.restaurant_id,
            address_id: input.address_id,
            discount_id: input.discount_id,
        })
        .returning(Order::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub fn list(
    conn: &mut PgConnection,
    filter: &OrderListFilter,
    page: i64,
    limit: i64,
) -> Result<Page<Order>, DomainError> {
    let offset = (page - 1) * limit;

    let mut count_query = orders::table.filter(orders::is_active.eq(true)).into_boxed();
    let mut rows_query = orders::table.filter(orders::is_active.eq(true)).into_boxed();
    if let Some(user_id) = filter.user_id {
        count_query = count_query.filter(orders::user_id.eq(user_id));
        rows_query = rows_query.filter(orders::user_id.eq(user_id));
    }
    if let Some(restaurant_id) = filter.restaurant_id {
        count_query = count_query.filter(orders::restaurant_id.eq(restaurant_id));
        rows_query = rows_query.filter(orders::restaurant_id.eq(restaurant_id));
    }
    if let Some(status) = filter.status {
        count_query = count_query.filter(orders::status.eq(status));
        rows_query = rows_query.filter(orders::status.eq(status));
    }

    let total: i64 = count_query.count().get_result(conn)?;
    let items = rows_query
        .select(Order::as_select())
        .order(orders::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load(conn)?;
    Ok(Page { items, total })
}

pub fn get(conn: &mut PgConnection, id: Uuid) -> Result<Order, DomainError> {
    orders::table
        .filter(orders::id.eq(id))
        .filter(orders::is_active.eq(true))
        .select(Order::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("order {id} not found")))
}

pub fn update(conn: &mut PgConnection, id: Uuid, changes: OrderChanges) -> Result<Order, DomainError> {
    if let Some(status) = changes.status {
        if OrderStatus::from_code(status).is_none() {
            return Err(DomainError::InvalidInput(format!("unknown status code {status}")));
        }
    }
    if let Some(total_price) = &changes.total_price {
        if *total_price < BigDecimal::from(0) {
            return Err(DomainError::InvalidInput("total_price must not be negative".into()));
        }
    }
    if let Some(shipping_fee) = &changes.shipping_fee {
        if *shipping_fee < BigDecimal::from(0) {
            return Err(DomainError::InvalidInput("shipping_fee must not be negative".into()));
        }
    }

    diesel::update(orders::table.filter(orders::id.eq(id)).filter(orders::is_active.eq(true)))
        .set((&changes, orders::updated_at.eq(Utc::now())))
        .returning(Order::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("order {id} not found")))
}

pub fn soft_delete(conn: &mut PgConnection, id: Uuid) -> Result<(), DomainError> {
    let affected = diesel::update(orders::table.filter(orders::id.eq(id)).filter(orders::is_active.eq(true)))
        .set((orders::is_active.eq(false), orders::updated_at.eq(Utc::now())))
        .execute(conn)?;
    if affected == 0 {
        return Err(DomainError::NotFound(format!("order {id} not found")));
    }
    Ok(())
}
