use tower_http::cors::{Any, CorsLayer};

/// Build the CORS layer. Any origin may call the API.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
