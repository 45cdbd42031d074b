//! Feedback writes and the rating recompute they trigger.
//!
//! Every mutation runs inside one transaction together with the recompute, so
//! a reader that observes the feedback also observes the rating derived from
//! it. Concurrent writers against the same restaurant remain last-writer-wins
//! on the rating column (no row lock is taken); see the race test below.

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::config::EmptyFeedbackPolicy;
use crate::domain::errors::DomainError;
use crate::domain::rating::{clamp_rating, rounded_mean};
use crate::models::feedback::{Feedback, FeedbackChanges, NewFeedback};
use crate::schema::{feedbacks, orders, restaurants};

#[derive(Debug)]
pub struct CreateFeedback {
    pub order_id: Uuid,
    pub rating: f64,
    pub content: Option<String>,
}

#[derive(Debug, Default)]
pub struct UpdateFeedback {
    pub rating: Option<f64>,
    pub content: Option<Option<String>>,
}

/// Re-derive the owning restaurant's stored rating from its active feedback.
///
/// The order is resolved regardless of its tombstone so that deleting the
/// feedback of an already-deleted order still converges; the aggregate itself
/// only counts active feedback on active orders.
pub fn recompute_for_order(
    conn: &mut PgConnection,
    order_id: Uuid,
    policy: EmptyFeedbackPolicy,
) -> Result<(), DomainError> {
    let restaurant_id: Uuid = orders::table
        .filter(orders::id.eq(order_id))
        .select(orders::restaurant_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("order {order_id} not found")))?;

    let ratings: Vec<i32> = feedbacks::table
        .inner_join(orders::table)
        .filter(orders::restaurant_id.eq(restaurant_id))
        .filter(orders::is_active.eq(true))
        .filter(feedbacks::is_active.eq(true))
        .select(feedbacks::rating)
        .load(conn)?;

    match rounded_mean(&ratings) {
        Some(mean) => {
            diesel::update(restaurants::table.filter(restaurants::id.eq(restaurant_id)))
                .set((
                    restaurants::rating.eq(Some(mean)),
                    restaurants::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;
        }
        None => match policy {
            EmptyFeedbackPolicy::Keep => {}
            EmptyFeedbackPolicy::Reset => {
                diesel::update(restaurants::table.filter(restaurants::id.eq(restaurant_id)))
                    .set((
                        restaurants::rating.eq(None::<i32>),
                        restaurants::updated_at.eq(Utc::now()),
                    ))
                    .execute(conn)?;
            }
        },
    }
    Ok(())
}

pub fn create(
    conn: &mut PgConnection,
    input: CreateFeedback,
    policy: EmptyFeedbackPolicy,
) -> Result<Feedback, DomainError> {
    conn.transaction(|conn| {
        let order_present: bool = diesel::select(diesel::dsl::exists(
            orders::table
                .filter(orders::id.eq(input.order_id))
                .filter(orders::is_active.eq(true)),
        ))
        .get_result(conn)?;
        if !order_present {
            return Err(DomainError::NotFound(format!("order {} not found", input.order_id)));
        }

        let feedback = diesel::insert_into(feedbacks::table)
            .values(&NewFeedback {
                id: Uuid::new_v4(),
                rating: clamp_rating(input.rating),
                content: input.content,
                order_id: input.order_id,
            })
            .returning(Feedback::as_returning())
            .get_result(conn)?;

        recompute_for_order(conn, input.order_id, policy)?;
        Ok(feedback)
    })
}

pub fn update(
    conn: &mut PgConnection,
    id: Uuid,
    input: UpdateFeedback,
    policy: EmptyFeedbackPolicy,
) -> Result<Feedback, DomainError> {
    conn.transaction(|conn| {
        let changes = FeedbackChanges {
            rating: input.rating.map(clamp_rating),
            content: input.content,
        };
        let feedback = diesel::update(
            feedbacks::table
                .filter(feedbacks::id.eq(id))
                .filter(feedbacks::is_active.eq(true)),
        )
        .set((&changes, feedbacks::updated_at.eq(Utc::now())))
        .returning(Feedback::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("feedback {id} not found")))?;

        recompute_for_order(conn, feedback.order_id, policy)?;
        Ok(feedback)
    })
}

pub fn soft_delete(
    conn: &mut PgConnection,
    id: Uuid,
    policy: EmptyFeedbackPolicy,
) -> Result<(), DomainError> {
    conn.transaction(|conn| {
        let order_id: Uuid = diesel::update(
            feedbacks::table
                .filter(feedbacks::id.eq(id))
                .filter(feedbacks::is_active.eq(true)),
        )
        .set((feedbacks::is_active.eq(false), feedbacks::updated_at.eq(Utc::now())))
        .returning(feedbacks::order_id)
        .get_result(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("feedback {id} not found")))?;

        recompute_for_order(conn, order_id, policy)
    })
}

pub fn get(conn: &mut PgConnection, id: Uuid) -> Result<Feedback, DomainError> {
    feedbacks::table
        .filter(feedbacks::id.eq(id))
        .filter(feedbacks::is_active.eq(true))
        .select(Feedback::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("feedback {id} not found")))
}

/// Active feedback for a restaurant, resolved through its active orders,
/// optionally narrowed to one rating value.
pub fn list_by_restaurant(
    conn: &mut PgConnection,
    restaurant_id: Uuid,
    rating: Option<i32>,
) -> Result<Vec<Feedback>, DomainError> {
    let restaurant_present: bool = diesel::select(diesel::dsl::exists(
        restaurants::table
            .filter(restaurants::id.eq(restaurant_id))
            .filter(restaurants::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if !restaurant_present {
        return Err(DomainError::NotFound(format!("restaurant {restaurant_id} not found")));
    }

    let mut query = feedbacks::table
        .inner_join(orders::table)
        .filter(orders::restaurant_id.eq(restaurant_id))
        .filter(orders::is_active.eq(true))
        .filter(feedbacks::is_active.eq(true))
        .into_boxed();
    if let Some(rating) = rating {
        query = query.filter(feedbacks::rating.eq(rating));
    }
    query
        .select(Feedback::as_select())
        .order(feedbacks::created_at.desc())
        .load(conn)
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::restaurants;
    use crate::test_support::{seed_order, seed_restaurant, seed_user, setup_db};

    fn stored_rating(conn: &mut PgConnection, restaurant_id: Uuid) -> Option<i32> {
        restaurants::get(conn, restaurant_id).expect("restaurant").rating
    }

    #[tokio::test]
    async fn rating_tracks_the_rounded_mean_of_active_feedback() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let user = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, user.id, "Pane e Vino");
        let o1 = seed_order(&mut conn, user.id, restaurant.id, "30.00", 4);
        let o2 = seed_order(&mut conn, user.id, restaurant.id, "45.00", 4);

        create(
            &mut conn,
            CreateFeedback { order_id: o1.id, rating: 4.0, content: None },
            EmptyFeedbackPolicy::Keep,
        )
        .expect("feedback 1");
        assert_eq!(stored_rating(&mut conn, restaurant.id), Some(4));

        // mean(4, 5) = 4.5 rounds half away from zero to 5.
        let f2 = create(
            &mut conn,
            CreateFeedback { order_id: o2.id, rating: 5.0, content: None },
            EmptyFeedbackPolicy::Keep,
        )
        .expect("feedback 2");
        assert_eq!(stored_rating(&mut conn, restaurant.id), Some(5));

        // Updating one rating re-derives the mean: mean(4, 1) = 2.5 -> 3.
        update(
            &mut conn,
            f2.id,
            UpdateFeedback { rating: Some(1.0), ..Default::default() },
            EmptyFeedbackPolicy::Keep,
        )
        .expect("update");
        assert_eq!(stored_rating(&mut conn, restaurant.id), Some(3));

        // Deleting it drops the average back to the remaining feedback.
        soft_delete(&mut conn, f2.id, EmptyFeedbackPolicy::Keep).expect("delete");
        assert_eq!(stored_rating(&mut conn, restaurant.id), Some(4));
    }

    #[tokio::test]
    async fn out_of_range_input_is_clamped_before_storage() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let user = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, user.id, "Chez Nous");
        let order = seed_order(&mut conn, user.id, restaurant.id, "20.00", 4);

        let feedback = create(
            &mut conn,
            CreateFeedback { order_id: order.id, rating: 11.0, content: None },
            EmptyFeedbackPolicy::Keep,
        )
        .expect("feedback");
        assert_eq!(feedback.rating, 5);
        assert_eq!(stored_rating(&mut conn, restaurant.id), Some(5));
    }

    #[tokio::test]
    async fn deleting_the_only_feedback_keeps_the_stale_rating() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let user = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, user.id, "La Perla");
        let order = seed_order(&mut conn, user.id, restaurant.id, "60.00", 4);

        let feedback = create(
            &mut conn,
            CreateFeedback { order_id: order.id, rating: 2.0, content: None },
            EmptyFeedbackPolicy::Keep,
        )
        .expect("feedback");
        assert_eq!(stored_rating(&mut conn, restaurant.id), Some(2));

        soft_delete(&mut conn, feedback.id, EmptyFeedbackPolicy::Keep).expect("delete");
        // Reproduces the source quirk: nothing left to average, rating stays.
        assert_eq!(stored_rating(&mut conn, restaurant.id), Some(2));
    }

    #[tokio::test]
    async fn reset_policy_clears_the_rating_instead() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let user = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, user.id, "La Perla");
        let order = seed_order(&mut conn, user.id, restaurant.id, "60.00", 4);

        let feedback = create(
            &mut conn,
            CreateFeedback { order_id: order.id, rating: 2.0, content: None },
            EmptyFeedbackPolicy::Reset,
        )
        .expect("feedback");
        soft_delete(&mut conn, feedback.id, EmptyFeedbackPolicy::Reset).expect("delete");
        assert_eq!(stored_rating(&mut conn, restaurant.id), None);
    }

    #[tokio::test]
    async fn feedback_on_soft_deleted_orders_is_ignored() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let user = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, user.id, "Osteria");
        let o1 = seed_order(&mut conn, user.id, restaurant.id, "30.00", 4);
        let o2 = seed_order(&mut conn, user.id, restaurant.id, "30.00", 4);

        create(
            &mut conn,
            CreateFeedback { order_id: o1.id, rating: 1.0, content: None },
            EmptyFeedbackPolicy::Keep,
        )
        .expect("feedback 1");
        create(
            &mut conn,
            CreateFeedback { order_id: o2.id, rating: 5.0, content: None },
            EmptyFeedbackPolicy::Keep,
        )
        .expect("feedback 2");
        assert_eq!(stored_rating(&mut conn, restaurant.id), Some(3));

        // Deleting the order removes its feedback from the aggregate on the
        // next recompute.
        crate::services::orders::soft_delete(&mut conn, o1.id).expect("delete order");
        recompute_for_order(&mut conn, o2.id, EmptyFeedbackPolicy::Keep).expect("recompute");
        assert_eq!(stored_rating(&mut conn, restaurant.id), Some(5));
    }

    #[tokio::test]
    async fn concurrent_feedback_writes_converge_on_next_recompute() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let user = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, user.id, "Due Fratelli");
        let o1 = seed_order(&mut conn, user.id, restaurant.id, "10.00", 4);
        let o2 = seed_order(&mut conn, user.id, restaurant.id, "10.00", 4);

        // Two writers race on the same restaurant. No row lock is taken, so
        // the stored rating right after the join is whichever writer
        // committed last (each may have read the pre-insert feedback set of
        // the other).
        let writer = |order_id: Uuid, rating: f64| {
            let pool = pool.clone();
            std::thread::spawn(move || {
                let mut conn = pool.get().expect("connection");
                create(
                    &mut conn,
                    CreateFeedback { order_id, rating, content: None },
                    EmptyFeedbackPolicy::Keep,
                )
            })
        };
        let h1 = writer(o1.id, 1.0);
        let h2 = writer(o2.id, 5.0);
        h1.join().expect("join").expect("feedback 1");
        h2.join().expect("join").expect("feedback 2");

        // Whatever the interleaving was, the next recompute sees the full
        // set and converges: mean(1, 5) = 3.
        recompute_for_order(&mut conn, o1.id, EmptyFeedbackPolicy::Keep).expect("recompute");
        assert_eq!(stored_rating(&mut conn, restaurant.id), Some(3));
    }

    #[tokio::test]
    async fn list_by_restaurant_filters_by_rating_value() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let user = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, user.id, "Taverna");
        let o1 = seed_order(&mut conn, user.id, restaurant.id, "10.00", 4);
        let o2 = seed_order(&mut conn, user.id, restaurant.id, "10.00", 4);

        create(
            &mut conn,
            CreateFeedback { order_id: o1.id, rating: 5.0, content: Some("great".into()) },
            EmptyFeedbackPolicy::Keep,
        )
        .expect("feedback");
        create(
            &mut conn,
            CreateFeedback { order_id: o2.id, rating: 3.0, content: None },
            EmptyFeedbackPolicy::Keep,
        )
        .expect("feedback");

        let all = list_by_restaurant(&mut conn, restaurant.id, None).expect("list");
        assert_eq!(all.len(), 2);

        let fives = list_by_restaurant(&mut conn, restaurant.id, Some(5)).expect("list");
        assert_eq!(fives.len(), 1);
        assert_eq!(fives[0].rating, 5);
    }
}
