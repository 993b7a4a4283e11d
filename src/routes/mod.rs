pub mod assets;
pub mod audit;
pub mod auth;
pub mod company;
pub mod crud;
pub mod licenses;
pub mod transfer;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::entity::Entity;
use crate::models::{
    Accessory, Asset, AssetModel, Category, Department, License, Location, Maintenance,
    Manufacturer, Role, StatusLabel, Supplier, User,
};
use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        // Company
        .route(
            "/api/company",
            get(company::get_company).put(company::update_company),
        )
        .route("/api/audit-logs", get(audit::list))
        // Asset lifecycle
        .route("/api/assets/{id}/checkout", post(assets::checkout))
        .route("/api/assets/{id}/checkin", post(assets::checkin))
        .route("/api/assets/{id}/archive", post(assets::archive))
        // License seats
        .route("/api/licenses/reorder", get(licenses::reorder))
        .route(
            "/api/licenses/{id}/seats",
            get(licenses::list_seats).post(licenses::assign_seat),
        )
        .route(
            "/api/licenses/{id}/seats/{user_id}",
            delete(licenses::release_seat),
        )
        // Entities
        .merge(entity_routes::<Asset>())
        .merge(entity_routes::<Accessory>())
        .merge(entity_routes::<License>())
        .merge(entity_routes::<User>())
        .merge(entity_routes::<Category>())
        .merge(entity_routes::<Department>())
        .merge(entity_routes::<Location>())
        .merge(entity_routes::<Manufacturer>())
        .merge(entity_routes::<AssetModel>())
        .merge(entity_routes::<Supplier>())
        .merge(entity_routes::<StatusLabel>())
        .merge(entity_routes::<Role>())
        .merge(entity_routes::<Maintenance>())
}

/// CRUD, import and export under `/api/<path>`.
fn entity_routes<E: Entity>() -> Router<SharedState> {
    let base = format!("/api/{}", E::PATH);
    Router::new()
        .route(&base, get(crud::list::<E>).post(crud::create::<E>))
        .route(&format!("{base}/import"), post(transfer::import::<E>))
        .route(&format!("{base}/export"), get(transfer::export::<E>))
        .route(
            &format!("{base}/{{id}}"),
            get(crud::get::<E>)
                .put(crud::update::<E>)
                .delete(crud::delete::<E>),
        )
}
