pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod services;
#[cfg(test)]
pub mod test_support;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub use config::AppConfig;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    config: AppConfig,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/users")
                    .route("", web::post().to(handlers::users::create_user))
                    .route("", web::get().to(handlers::users::list_users))
                    .route("/all", web::get().to(handlers::users::list_all_users))
                    .route("/{id}", web::get().to(handlers::users::get_user))
                    .route("/{id}", web::patch().to(handlers::users::update_user))
                    .route("/{id}", web::delete().to(handlers::users::delete_user)),
            )
            .service(
                web::scope("/restaurants")
                    .route("", web::post().to(handlers::restaurants::create_restaurant))
                    .route("", web::get().to(handlers::restaurants::list_restaurants))
                    .route("/{id}", web::get().to(handlers::restaurants::get_restaurant))
                    .route("/{id}", web::patch().to(handlers::restaurants::update_restaurant))
                    .route("/{id}", web::delete().to(handlers::restaurants::delete_restaurant)),
            )
            .service(
                web::scope("/products")
                    .route("", web::post().to(handlers::products::create_product))
                    .route("", web::get().to(handlers::products::list_products))
                    .route("/search", web::get().to(handlers::products::search_products))
                    .route("/{id}", web::get().to(handlers::products::get_product))
                    .route("/{id}", web::patch().to(handlers::products::update_product))
                    .route("/{id}", web::delete().to(handlers::products::delete_product)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::post().to(handlers::categories::create_category))
                    .route("", web::get().to(handlers::categories::list_categories))
                    .route("/{id}", web::get().to(handlers::categories::get_category))
                    .route("/{id}", web::patch().to(handlers::categories::update_category))
                    .route("/{id}", web::delete().to(handlers::categories::delete_category)),
            )
            .service(
                web::scope("/category-product-maps")
                    .route("", web::post().to(handlers::category_maps::create_product_map))
                    .route("", web::get().to(handlers::category_maps::list_product_maps))
                    .route("/{id}", web::delete().to(handlers::category_maps::delete_product_map)),
            )
            .service(
                web::scope("/category-restaurant-maps")
                    .route("", web::post().to(handlers::category_maps::create_restaurant_map))
                    .route("", web::get().to(handlers::category_maps::list_restaurant_maps))
                    .route(
                        "/{id}",
                        web::delete().to(handlers::category_maps::delete_restaurant_map),
                    ),
            )
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}", web::patch().to(handlers::orders::update_order))
                    .route("/{id}", web::delete().to(handlers::orders::delete_order)),
            )
            .service(
                web::scope("/feedbacks")
                    .route("", web::post().to(handlers::feedbacks::create_feedback))
                    .route(
                        "/restaurant/{id}",
                        web::get().to(handlers::feedbacks::list_feedbacks_by_restaurant),
                    )
                    .route("/{id}", web::get().to(handlers::feedbacks::get_feedback))
                    .route("/{id}", web::patch().to(handlers::feedbacks::update_feedback))
                    .route("/{id}", web::delete().to(handlers::feedbacks::delete_feedback)),
            )
            .service(
                web::scope("/order-journeys")
                    .route("", web::post().to(handlers::order_journeys::create_order_journey))
                    .route(
                        "/order/{id}",
                        web::get().to(handlers::order_journeys::list_order_journeys),
                    )
                    .route("/{id}", web::get().to(handlers::order_journeys::get_order_journey))
                    .route(
                        "/{id}",
                        web::delete().to(handlers::order_journeys::delete_order_journey),
                    ),
            )
            .service(web::scope("/restaurant-dashboard").route(
                "/restaurant/{id}/summary",
                web::get().to(handlers::dashboard::restaurant_summary),
            ))
            .service(web::scope("/revenue-reports").route(
                "/restaurant/{id}/summary",
                web::get().to(handlers::revenue::revenue_summary),
            ))
    })
    .bind((host.to_string(), port))?
    .run())
}
