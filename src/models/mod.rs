pub mod accessory;
pub mod asset;
pub mod asset_model;
pub mod audit_log;
pub mod category;
pub mod company;
pub mod department;
pub mod license;
pub mod location;
pub mod maintenance;
pub mod manufacturer;
pub mod refresh_token;
pub mod role;
pub mod status_label;
pub mod supplier;
pub mod user;

pub use accessory::{Accessory, AccessoryInput};
pub use asset::{Asset, AssetInput, AssetState};
pub use asset_model::{AssetModel, AssetModelInput};
pub use audit_log::AuditLog;
pub use category::{Category, CategoryInput};
pub use company::Company;
pub use department::{Department, DepartmentInput};
pub use license::{License, LicenseAssignment, LicenseInput};
pub use location::{Location, LocationInput};
pub use maintenance::{Maintenance, MaintenanceInput};
pub use manufacturer::{Manufacturer, ManufacturerInput};
pub use refresh_token::RefreshToken;
pub use role::{Role, RoleInput};
pub use status_label::{StatusLabel, StatusLabelInput};
pub use supplier::{Supplier, SupplierInput};
pub use user::{User, UserInput};
