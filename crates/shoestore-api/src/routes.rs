//! Router assembly: public routes, role-gated groups and the shared pipeline

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

use shoestore_security::Role;

use crate::handlers::{
    auth, backup, catalog, general, logs, orders, password, reports, reviews, shopping, support, users,
};
use crate::middleware::{audit_mutations, authenticate, cors_layer, require_role};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let settings = state.settings.clone();

    Router::new()
        .merge(public_routes())
        .merge(user_routes().route_layer(middleware::from_fn_with_state(Role::User, require_role)))
        .merge(manager_routes().route_layer(middleware::from_fn_with_state(Role::Manager, require_role)))
        .merge(admin_routes().route_layer(middleware::from_fn_with_state(Role::Admin, require_role)))
        // Audit sits inside authentication so it sees the identity
        .layer(middleware::from_fn_with_state(state.clone(), audit_mutations))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(cors_layer(&settings))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .with_state(state)
}

/// No token needed. Catalog reads share paths with admin mutations below.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(general::hello))
        .route("/health", get(general::health_check))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/support", post(support::submit))
        .route("/password/reset", post(password::request_reset))
        .route("/password/reset/confirm", post(password::confirm_reset))
        .route("/brands", get(catalog::list_brands))
        .route("/brands/{id}", get(catalog::get_brand))
        .route("/categories", get(catalog::list_categories))
        .route("/categories/{id}", get(catalog::get_category))
        .route("/products", get(catalog::list_products))
        .route("/products/{id}", get(catalog::get_product))
        .route("/products/{id}/sizes", get(catalog::list_sizes))
        .route("/reviews/product/{id}", get(reviews::for_product))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/basket", post(shopping::add_to_basket))
        .route(
            "/basket/{id}",
            get(shopping::basket)
                .put(shopping::update_basket)
                .delete(shopping::remove_from_basket),
        )
        .route("/favorites", post(shopping::add_favorite))
        .route("/favorites/{id}", get(shopping::favorites).delete(shopping::remove_favorite))
        .route("/reviews", post(reviews::create_review))
        .route("/reviews/user/{id}", get(reviews::for_user))
        .route(
            "/reviews/{id}",
            put(reviews::update_own_review).delete(reviews::delete_own_review),
        )
        .route("/orders", post(orders::create_order))
        .route("/orders/user/{id}", get(orders::orders_for_user))
        .route("/order-products", post(orders::add_order_line))
        .route("/order-products/order/{id}", get(orders::lines_for_order))
        .route("/password/change", post(password::request_change))
        .route("/password/change/confirm", post(password::confirm_change))
}

fn manager_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", post(reports::save_report).get(reports::list_reports))
        .route("/reports/{id}", get(reports::get_report))
        .route("/reports/{id}/{format}", get(reports::generate_report))
}

fn admin_routes() -> Router<AppState> {
    let mut router = Router::new();

    // Every admin resource answers both with and without the `/admin` prefix
    for prefix in ["", "/admin"] {
        router = router
            .route(&format!("{prefix}/users"), post(users::create_user).get(users::list_users))
            .route(
                &format!("{prefix}/users/{{id}}"),
                get(users::get_user).put(users::update_user).delete(users::delete_user),
            )
            .route(&format!("{prefix}/brands"), post(catalog::create_brand))
            .route(
                &format!("{prefix}/brands/{{id}}"),
                put(catalog::update_brand).delete(catalog::delete_brand),
            )
            .route(&format!("{prefix}/categories"), post(catalog::create_category))
            .route(
                &format!("{prefix}/categories/{{id}}"),
                put(catalog::update_category).delete(catalog::delete_category),
            )
            .route(&format!("{prefix}/products"), post(catalog::create_product))
            .route(
                &format!("{prefix}/products/{{id}}"),
                put(catalog::update_product).delete(catalog::delete_product),
            )
            .route(&format!("{prefix}/productsizes/{{id}}"), put(catalog::update_size))
            .route(&format!("{prefix}/logs"), get(logs::list_logs))
            .route(&format!("{prefix}/logs/{{id}}"), get(logs::get_log).delete(logs::delete_log));
    }

    router
        // Reads of the catalog under the admin prefix
        .route("/admin/brands", get(catalog::list_brands))
        .route("/admin/brands/{id}", get(catalog::get_brand))
        .route("/admin/categories", get(catalog::list_categories))
        .route("/admin/categories/{id}", get(catalog::get_category))
        .route("/admin/products", get(catalog::list_products))
        .route("/admin/products/{id}", get(catalog::get_product))
        .route("/admin/reviews", get(reviews::list_reviews))
        .route(
            "/admin/reviews/{id}",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route("/orders", get(orders::list_orders))
        .route("/order-products", get(orders::list_order_lines))
        .route("/order-products/{id}", put(orders::update_order_line))
        .route("/admin/backup", post(backup::create_backup))
        .route("/admin/backup/info", get(backup::backup_info))
        .route("/admin/backup/restore", post(backup::restore_backup))
        .route("/admin/backup/download/{filename}", get(backup::download_backup))
        .route("/admin/backup/{filename}", delete(backup::delete_backup))
}
