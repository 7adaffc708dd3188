pub mod article;
pub mod category;

pub use article::{ArticleStore, PgArticleRepository};
pub use category::CategoryRepository;
