//! 控制台路由

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::{
    auth::handler as auth, dashboard::handler as dashboard, participant::handler as participant,
    product::handler as product, product::image::MAX_IMAGE_BYTES, state::AppState,
};
use crate::core::error::CoreError;
use crate::core::middleware::{request_logging_middleware, session_gate_middleware};

pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let auth_routes = Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route(
            "/create-account",
            get(auth::create_account_page).post(auth::create_account),
        )
        .route(
            "/forgot-password",
            get(auth::forgot_password_page).post(auth::forgot_password),
        )
        .route("/logout", post(auth::logout));

    let product_routes = Router::new()
        .route("/dashboard/ecommerce", get(dashboard::ecommerce))
        .route("/productlist", get(product::product_list))
        .route("/productlist/:id/stock", post(product::adjust_stock))
        .route("/productlist/:id/variants", post(product::submit_variants))
        .route(
            "/addproduct",
            get(product::add_product_page).post(product::add_product),
        )
        .route(
            "/addproduct/image",
            // 超过 5 MB 的图片由 encode_data_url 拒绝
            post(product::upload_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024 * 1024)),
        )
        .route(
            "/editproduct/:id",
            get(product::edit_product_page).post(product::edit_product),
        )
        .route("/editproduct/:id/delete", post(product::delete_product))
        .route("/stock", get(product::stock_management))
        .route("/stock/:id", post(product::adjust_stock_from_management));

    let participant_routes = Router::new()
        .route("/participants", get(participant::participant_list))
        .route(
            "/participants/:id/delete",
            post(participant::delete_participant),
        )
        .route(
            "/participantregistration",
            get(participant::registration_page).post(participant::register),
        )
        .route(
            "/participantedit/:id",
            get(participant::edit_page).post(participant::edit),
        );

    Router::new()
        .route("/health", get(dashboard::health))
        .route("/dashboard", get(dashboard::dashboard))
        .merge(auth_routes)
        .merge(product_routes)
        .merge(participant_routes)
        // 门禁放行但没有处理器的路径
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_gate_middleware,
        ))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}

async fn not_found(uri: Uri) -> CoreError {
    CoreError::NotFound(uri.path().to_string())
}
