//! Cumulative revenue statistics over a trailing window, bucketed per day or
//! per month. The other face of the dashboard's derived-aggregate pattern.

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Datelike, Duration, Local, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::dashboard::day_window;
use crate::domain::errors::DomainError;
use crate::models::order::OrderStatus;
use crate::schema::{orders, restaurants};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Week,
    Month,
    Year,
}

impl ReportPeriod {
    /// Absent means the default month window; anything unrecognized is a
    /// caller error.
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        match raw {
            None | Some("") | Some("month") => Ok(ReportPeriod::Month),
            Some("week") => Ok(ReportPeriod::Week),
            Some("year") => Ok(ReportPeriod::Year),
            Some(other) => Err(DomainError::InvalidInput(format!("unknown period '{other}'"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportPeriod::Week => "week",
            ReportPeriod::Month => "month",
            ReportPeriod::Year => "year",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RevenueBucket {
    pub label: String,
    pub orders: i64,
    pub revenue: BigDecimal,
    pub cumulative_revenue: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct RevenueReport {
    pub period: ReportPeriod,
    pub buckets: Vec<RevenueBucket>,
    pub total_orders: i64,
    pub total_revenue: BigDecimal,
}

fn day_label(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn month_label(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

pub fn summary(
    conn: &mut PgConnection,
    restaurant_id: Uuid,
    period: ReportPeriod,
) -> Result<RevenueReport, DomainError> {
    let restaurant_present: bool = diesel::select(diesel::dsl::exists(
        restaurants::table
            .filter(restaurants::id.eq(restaurant_id))
            .filter(restaurants::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if !restaurant_present {
        return Err(DomainError::NotFound(format!("restaurant {restaurant_id} not found")));
    }

    let today = Local::now().date_naive();
    let (start_date, labels): (chrono::NaiveDate, Vec<String>) = match period {
        ReportPeriod::Week => {
            let start = today - Duration::days(6);
            (start, start.iter_days().take_while(|d| *d <= today).map(day_label).collect())
        }
        ReportPeriod::Month => {
            let start = today.with_day(1).unwrap_or(today);
            (start, start.iter_days().take_while(|d| *d <= today).map(day_label).collect())
        }
        ReportPeriod::Year => {
            let start = today.with_day(1).and_then(|d| d.with_month(1)).unwrap_or(today);
            (
                start,
                (1..=today.month()).map(|m| month_label(today.year(), m)).collect(),
            )
        }
    };
    let window_start = day_window(start_date).0;
    let window_end = day_window(today).1;

    let rows: Vec<(DateTime<Utc>, BigDecimal)> = orders::table
        .filter(orders::restaurant_id.eq(restaurant_id))
        .filter(orders::is_active.eq(true))
        .filter(orders::status.eq(OrderStatus::Completed.code()))
        .filter(orders::updated_at.between(window_start, window_end))
        .select((orders::updated_at, orders::total_price))
        .load(conn)?;

    let mut per_bucket: HashMap<String, (i64, BigDecimal)> = HashMap::new();
    for (updated_at, total_price) in rows {
        let local_date = updated_at.with_timezone(&Local).date_naive();
        let label = match period {
            ReportPeriod::Week | ReportPeriod::Month => day_label(local_date),
            ReportPeriod::Year => month_label(local_date.year(), local_date.month()),
        };
        let entry = per_bucket.entry(label).or_insert_with(|| (0, BigDecimal::from(0)));
        entry.0 += 1;
        entry.1 += total_price;
    }

    let mut cumulative = BigDecimal::from(0);
    let mut total_orders = 0;
    let mut buckets = Vec::with_capacity(labels.len());
    for label in labels {
        let (order_count, bucket_revenue) = per_bucket
            .remove(&label)
            .unwrap_or_else(|| (0, BigDecimal::from(0)));
        cumulative += bucket_revenue.clone();
        total_orders += order_count;
        buckets.push(RevenueBucket {
            label,
            orders: order_count,
            revenue: bucket_revenue,
            cumulative_revenue: cumulative.clone(),
        });
    }

    Ok(RevenueReport {
        period,
        total_revenue: cumulative,
        total_orders,
        buckets,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::test_support::{backdate_order, seed_order, seed_restaurant, seed_user, setup_db};

    #[test]
    fn period_parsing_accepts_known_values_only() {
        assert_eq!(ReportPeriod::parse(None).unwrap(), ReportPeriod::Month);
        assert_eq!(ReportPeriod::parse(Some("week")).unwrap(), ReportPeriod::Week);
        assert_eq!(ReportPeriod::parse(Some("year")).unwrap(), ReportPeriod::Year);
        assert!(ReportPeriod::parse(Some("decade")).is_err());
    }

    #[tokio::test]
    async fn weekly_report_accumulates_across_days() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let user = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, user.id, "Braseria");

        seed_order(&mut conn, user.id, restaurant.id, "50.00", 4);
        let earlier = seed_order(&mut conn, user.id, restaurant.id, "25.00", 4);
        backdate_order(&mut conn, earlier.id, 2);
        // Pending orders never show up in revenue.
        seed_order(&mut conn, user.id, restaurant.id, "500.00", 1);

        let report = summary(&mut conn, restaurant.id, ReportPeriod::Week).expect("report");
        assert_eq!(report.buckets.len(), 7);
        assert_eq!(report.total_orders, 2);
        assert_eq!(report.total_revenue, BigDecimal::from_str("75.00").unwrap());

        let last = report.buckets.last().expect("today bucket");
        assert_eq!(last.orders, 1);
        assert_eq!(last.revenue, BigDecimal::from_str("50.00").unwrap());
        // Cumulative total carries through to the final bucket.
        assert_eq!(last.cumulative_revenue, report.total_revenue);
    }

    #[tokio::test]
    async fn report_for_unknown_restaurant_is_not_found() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let err = summary(&mut conn, Uuid::new_v4(), ReportPeriod::Month).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
