use crate::interface_adapters::handlers::{current_user, facebook_login};
use crate::interface_adapters::middleware::require_access_token;
use crate::interface_adapters::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/users/me", get(current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token,
        ));

    Router::new()
        .route("/login/facebook", post(facebook_login))
        .merge(protected)
        .with_state(state)
}
