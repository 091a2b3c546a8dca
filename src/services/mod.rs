pub mod audit;
pub mod classes;
pub mod promotions;
pub mod reports;
pub mod settings;
pub mod students;

pub use audit::AuditService;
pub use classes::ClassService;
pub use promotions::PromotionService;
pub use reports::ReportService;
pub use settings::SettingsService;
pub use students::StudentService;
