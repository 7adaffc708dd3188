use crate::{
    config::Config,
    services::{
        article::ArticleService, auth::AuthService, category::CategoryService,
        database::Database, staff::StaffService, station::StationService, theme::ThemeService,
    },
};

/// 应用程序的共享状态
/// 包含所有服务和配置的引用
#[derive(Clone)]
pub struct AppState {
    /// 应用配置
    pub config: Config,

    /// 数据库连接
    pub db: Database,

    /// 认证服务
    pub auth_service: AuthService,

    /// 文章服务
    pub article_service: ArticleService,

    /// 分类服务
    pub category_service: CategoryService,

    /// 团队名册服务
    pub staff_service: StaffService,

    /// 主题服务
    pub theme_service: ThemeService,

    /// 电台流媒体服务
    pub station_service: StationService,
}

impl AppState {
    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.config.is_production()
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.config.is_development()
    }
}
