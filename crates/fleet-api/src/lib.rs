//! # HTTP Surface
//!
//! The dashboard backend: a thin axum layer over the bridge subsystems.
//! Handlers validate input, convert between display units and wei at this
//! boundary only, and delegate everything else. No handler holds a
//! credential beyond the request that acquired it.
//!
//! ## Route map
//!
//! ```text
//! GET  /                               liveness + contract address
//! GET  /public/stats                   treasury and fleet statistics
//! GET  /public/machines                registered fleet
//! GET  /public/proposals               active proposals
//! GET  /public/activity                merged event ledger, newest first
//! GET  /investor/:address              one investor's position
//! POST /admin/add-machine              register a machine
//! POST /admin/create-proposal          open a governance proposal
//! POST /admin/execute-proposal/:id     force-execute a passed proposal
//! POST /admin/set-price                set the coffee price
//! POST /admin/pay-salary               pay a staff salary
//! POST /simulate/buy-coffee            allowance-guarded purchase
//! POST /simulate/vote                  cast a vote
//! POST /simulate/buy-shares            allowance-guarded share purchase
//! ```

#![warn(clippy::all)]

pub mod admin;
pub mod error;
pub mod public;
pub mod simulate;
pub mod state;
pub mod views;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

/// Assemble the full route tree over a wired [`AppState`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(public::root))
        .route("/public/stats", get(public::stats))
        .route("/public/machines", get(public::machines))
        .route("/public/proposals", get(public::proposals))
        .route("/public/activity", get(public::activity))
        .route("/investor/:address", get(public::investor))
        .route("/admin/add-machine", post(admin::add_machine))
        .route("/admin/create-proposal", post(admin::create_proposal))
        .route("/admin/execute-proposal/:id", post(admin::execute_proposal))
        .route("/admin/set-price", post(admin::set_price))
        .route("/admin/pay-salary", post(admin::pay_salary))
        .route("/simulate/buy-coffee", post(simulate::buy_coffee))
        .route("/simulate/vote", post(simulate::vote))
        .route("/simulate/buy-shares", post(simulate::buy_shares))
        // The dashboard is served from another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
