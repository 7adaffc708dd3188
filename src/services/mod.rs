pub mod article;
pub mod auth;
pub mod category;
pub mod database;
pub mod staff;
pub mod station;
pub mod theme;

// 重新导出常用类型
pub use article::ArticleService;
pub use auth::AuthService;
pub use category::CategoryService;
pub use database::Database;
pub use staff::StaffService;
pub use station::StationService;
pub use theme::ThemeService;
