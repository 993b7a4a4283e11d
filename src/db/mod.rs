pub mod accessories;
pub mod asset_models;
pub mod assets;
pub mod audit;
pub mod categories;
pub mod companies;
pub mod departments;
pub mod entity;
pub mod licenses;
pub mod locations;
pub mod maintenances;
pub mod manufacturers;
pub mod refresh_tokens;
pub mod roles;
pub mod status_labels;
pub mod suppliers;
pub mod users;
