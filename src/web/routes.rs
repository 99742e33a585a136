// src/web/routes.rs

use actix_web::web;

// Liveness probe; deliberately does not touch the database.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called from `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    // Health Check Route
    .route("/health", web::get().to(health_check_handler))
    // Authentication Routes
    .service(
      web::scope("/auth")
        .route(
          "/signup",
          web::post().to(crate::web::handlers::auth_handlers::signup_handler),
        )
        .route(
          "/signin",
          web::post().to(crate::web::handlers::auth_handlers::signin_handler),
        )
        .route("/me", web::get().to(crate::web::handlers::auth_handlers::me_handler)),
    )
    // Order Routes
    .service(
      web::scope("/orders")
        .route(
          "",
          web::post().to(crate::web::handlers::order_handlers::create_order_handler),
        )
        .route(
          "",
          web::get().to(crate::web::handlers::order_handlers::list_orders_handler),
        ),
    )
    // Payment Routes
    // The webhook pair is public: POST receives provider callbacks, GET is
    // the on-demand status poll the order page falls back to.
    .service(
      web::scope("/payments")
        .route(
          "/webhook",
          web::post().to(crate::web::handlers::webhook_handlers::payment_webhook_handler),
        )
        .route(
          "/webhook",
          web::get().to(crate::web::handlers::webhook_handlers::poll_payment_status_handler),
        )
        .route(
          "/cancel",
          web::post().to(crate::web::handlers::payment_handlers::cancel_payment_handler),
        )
        .route(
          "",
          web::post().to(crate::web::handlers::payment_handlers::initiate_payment_handler),
        )
        .route(
          "",
          web::get().to(crate::web::handlers::payment_handlers::list_payments_handler),
        ),
    )
    // Product Catalog Routes
    .service(
      web::scope("/products")
        .route(
          "",
          web::get().to(crate::web::handlers::product_handlers::list_products_handler),
        )
        .route(
          "",
          web::post().to(crate::web::handlers::product_handlers::create_product_handler),
        )
        .route(
          "/{product_id}",
          web::get().to(crate::web::handlers::product_handlers::get_product_handler),
        ),
    );
}
