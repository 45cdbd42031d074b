//! Today-vs-yesterday operational summary for one restaurant.
//!
//! Each metric is an independent query; one failing metric logs a warning and
//! reports 0 so the rest of the summary still comes back.

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::dashboard::{percentage_change, today_window, yesterday_window};
use crate::domain::errors::DomainError;
use crate::domain::rating::mean_or_zero;
use crate::models::order::OrderStatus;
use crate::schema::{feedbacks, orders, restaurants};

type Window = (DateTime<Utc>, DateTime<Utc>);

#[derive(Debug, Clone)]
pub struct RestaurantSummary {
    pub orders_today: i64,
    pub orders_yesterday: i64,
    pub orders_change: f64,
    pub revenue_today: BigDecimal,
    pub revenue_yesterday: BigDecimal,
    pub revenue_change: f64,
    pub rating_current: i32,
    pub rating_yesterday: f64,
    pub rating_change: f64,
    pub customers_today: i64,
    pub customers_yesterday: i64,
    pub customers_change: f64,
}

fn order_count(conn: &mut PgConnection, restaurant_id: Uuid, window: &Window) -> Result<i64, DomainError> {
    orders::table
        .filter(orders::restaurant_id.eq(restaurant_id))
        .filter(orders::is_active.eq(true))
        .filter(orders::created_at.between(window.0, window.1))
        .count()
        .get_result(conn)
        .map_err(Into::into)
}

/// Paid revenue for the window: completed orders only, keyed on the moment
/// they were last touched.
fn revenue(conn: &mut PgConnection, restaurant_id: Uuid, window: &Window) -> Result<BigDecimal, DomainError> {
    let sum: Option<BigDecimal> = orders::table
        .filter(orders::restaurant_id.eq(restaurant_id))
        .filter(orders::is_active.eq(true))
        .filter(orders::status.eq(OrderStatus::Completed.code()))
        .filter(orders::updated_at.between(window.0, window.1))
        .select(diesel::dsl::sum(orders::total_price))
        .first(conn)?;
    Ok(sum.unwrap_or_else(|| BigDecimal::from(0)))
}

fn distinct_customers(conn: &mut PgConnection, restaurant_id: Uuid, window: &Window) -> Result<i64, DomainError> {
    let ids: Vec<Uuid> = orders::table
        .filter(orders::restaurant_id.eq(restaurant_id))
        .filter(orders::is_active.eq(true))
        .filter(orders::created_at.between(window.0, window.1))
        .select(orders::user_id)
        .distinct()
        .load(conn)?;
    Ok(ids.len() as i64)
}

fn feedback_mean(conn: &mut PgConnection, restaurant_id: Uuid, window: &Window) -> Result<f64, DomainError> {
    let ratings: Vec<i32> = feedbacks::table
        .inner_join(orders::table)
        .filter(orders::restaurant_id.eq(restaurant_id))
        .filter(orders::is_active.eq(true))
        .filter(feedbacks::is_active.eq(true))
        .filter(feedbacks::created_at.between(window.0, window.1))
        .select(feedbacks::rating)
        .load(conn)?;
    Ok(mean_or_zero(&ratings))
}

fn metric_or_zero<T: Default>(label: &str, restaurant_id: Uuid, result: Result<T, DomainError>) -> T {
    result.unwrap_or_else(|e| {
        log::warn!("dashboard metric '{label}' failed for restaurant {restaurant_id}: {e}");
        T::default()
    })
}

pub fn summary(conn: &mut PgConnection, restaurant_id: Uuid) -> Result<RestaurantSummary, DomainError> {
    let rating_current: Option<i32> = restaurants::table
        .filter(restaurants::id.eq(restaurant_id))
        .filter(restaurants::is_active.eq(true))
        .select(restaurants::rating)
        .first(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("restaurant {restaurant_id} not found")))?;
    let rating_current = rating_current.unwrap_or(0);

    let today = today_window();
    let yesterday = yesterday_window();

    let orders_today = metric_or_zero("orders today", restaurant_id, order_count(conn, restaurant_id, &today));
    let orders_yesterday = metric_or_zero(
        "orders yesterday",
        restaurant_id,
        order_count(conn, restaurant_id, &yesterday),
    );
    let revenue_today = metric_or_zero("revenue today", restaurant_id, revenue(conn, restaurant_id, &today));
    let revenue_yesterday = metric_or_zero(
        "revenue yesterday",
        restaurant_id,
        revenue(conn, restaurant_id, &yesterday),
    );
    // Compared against the *current* stored rating, not a yesterday-end
    // snapshot of it; the two bases differ on purpose.
    let rating_yesterday = metric_or_zero(
        "rating yesterday",
        restaurant_id,
        feedback_mean(conn, restaurant_id, &yesterday),
    );
    let customers_today = metric_or_zero(
        "customers today",
        restaurant_id,
        distinct_customers(conn, restaurant_id, &today),
    );
    let customers_yesterday = metric_or_zero(
        "customers yesterday",
        restaurant_id,
        distinct_customers(conn, restaurant_id, &yesterday),
    );

    Ok(RestaurantSummary {
        orders_today,
        orders_yesterday,
        orders_change: percentage_change(orders_today as f64, orders_yesterday as f64),
        revenue_change: percentage_change(
            revenue_today.to_f64().unwrap_or(f64::NAN),
            revenue_yesterday.to_f64().unwrap_or(f64::NAN),
        ),
        revenue_today,
        revenue_yesterday,
        rating_current,
        rating_yesterday,
        rating_change: percentage_change(rating_current as f64, rating_yesterday),
        customers_today,
        customers_yesterday,
        customers_change: percentage_change(customers_today as f64, customers_yesterday as f64),
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::test_support::{backdate_order, seed_order, seed_restaurant, seed_user, setup_db};

    #[tokio::test]
    async fn revenue_compares_today_against_yesterday() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let user = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, user.id, "Il Forno");

        for price in ["100.00", "200.00", "300.00"] {
            seed_order(&mut conn, user.id, restaurant.id, price, 4);
        }
        let yesterdays = seed_order(&mut conn, user.id, restaurant.id, "100.00", 4);
        backdate_order(&mut conn, yesterdays.id, 1);

        let summary = summary(&mut conn, restaurant.id).expect("summary");
        assert_eq!(summary.revenue_today, BigDecimal::from_str("600.00").unwrap());
        assert_eq!(summary.revenue_yesterday, BigDecimal::from_str("100.00").unwrap());
        assert_eq!(summary.revenue_change, 500.0);
        assert_eq!(summary.orders_today, 3);
        assert_eq!(summary.orders_yesterday, 1);
    }

    #[tokio::test]
    async fn unpaid_and_soft_deleted_orders_do_not_count_as_revenue() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let user = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, user.id, "Il Forno");

        seed_order(&mut conn, user.id, restaurant.id, "100.00", 4);
        // Still pending: counts as an order, not as revenue.
        seed_order(&mut conn, user.id, restaurant.id, "250.00", 1);
        let deleted = seed_order(&mut conn, user.id, restaurant.id, "999.00", 4);
        crate::services::orders::soft_delete(&mut conn, deleted.id).expect("delete");

        let summary = summary(&mut conn, restaurant.id).expect("summary");
        assert_eq!(summary.revenue_today, BigDecimal::from_str("100.00").unwrap());
        assert_eq!(summary.orders_today, 2);
    }

    #[tokio::test]
    async fn distinct_customers_count_each_user_once() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let alice = seed_user(&mut conn);
        let bob = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, alice.id, "Il Forno");

        seed_order(&mut conn, alice.id, restaurant.id, "10.00", 4);
        seed_order(&mut conn, alice.id, restaurant.id, "20.00", 4);
        seed_order(&mut conn, bob.id, restaurant.id, "30.00", 4);

        let summary = summary(&mut conn, restaurant.id).expect("summary");
        assert_eq!(summary.customers_today, 2);
        assert_eq!(summary.orders_today, 3);
    }

    #[tokio::test]
    async fn summary_for_unknown_restaurant_is_not_found() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let err = summary(&mut conn, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
