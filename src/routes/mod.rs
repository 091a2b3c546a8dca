pub mod audit;

pub mod classes;

pub mod promotions;

pub mod reports;

pub mod settings;

pub mod students;

pub use audit::configure_audit_routes;
pub use classes::configure_classes_routes;
pub use promotions::configure_promotions_routes;
pub use reports::configure_reports_routes;
pub use settings::configure_settings_routes;
pub use students::configure_students_routes;
