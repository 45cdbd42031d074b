use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::models::order_journey::{NewOrderJourney, OrderJourney};
use crate::schema::{order_journeys, orders};

#[derive(Debug)]
pub struct CreateOrderJourney {
    pub order_id: Uuid,
    pub content: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timeline: Option<DateTime<Utc>>,
}

pub fn create(conn: &mut PgConnection, input: CreateOrderJourney) -> Result<OrderJourney, DomainError> {
    if input.content.trim().is_empty() {
        return Err(DomainError::InvalidInput("content must not be empty".into()));
    }
    let order_present: bool = diesel::select(diesel::dsl::exists(
        orders::table
            .filter(orders::id.eq(input.order_id))
            .filter(orders::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if !order_present {
        return Err(DomainError::NotFound(format!("order {} not found", input.order_id)));
    }

    diesel::insert_into(order_journeys::table)
        .values(&NewOrderJourney {
            id: Uuid::new_v4(),
            order_id: input.order_id,
            content: input.content,
            latitude: input.latitude,
            longitude: input.longitude,
            timeline: input.timeline.unwrap_or_else(Utc::now),
        })
        .returning(OrderJourney::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub fn get(conn: &mut PgConnection, id: Uuid) -> Result<OrderJourney, DomainError> {
    order_journeys::table
        .filter(order_journeys::id.eq(id))
        .filter(order_journeys::is_active.eq(true))
        .select(OrderJourney::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("order journey {id} not found")))
}

/// Waypoints of one order, oldest first.
pub fn list_by_order(conn: &mut PgConnection, order_id: Uuid) -> Result<Vec<OrderJourney>, DomainError> {
    let order_present: bool = diesel::select(diesel::dsl::exists(
        orders::table
            .filter(orders::id.eq(order_id))
            .filter(orders::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if !order_present {
        return Err(DomainError::NotFound(format!("order {order_id} not found")));
    }

    order_journeys::table
        .filter(order_journeys::order_id.eq(order_id))
        .filter(order_journeys::is_active.eq(true))
        .select(OrderJourney::as_select())
        .order(order_journeys::timeline.asc())
        .load(conn)
        .map_err(Into::into)
}

pub fn soft_delete(conn: &mut PgConnection, id: Uuid) -> Result<(), DomainError> {
    let affected = diesel::update(
        order_journeys::table
            .filter(order_journeys::id.eq(id))
            .filter(order_journeys::is_active.eq(true)),
    )
    .set((
        order_journeys::is_active.eq(false),
        order_journeys::updated_at.eq(Utc::now()),
    ))
    .execute(conn)?;
    if affected == 0 {
        return Err(DomainError::NotFound(format!("order journey {id} not found")));
    }
    Ok(())
}
