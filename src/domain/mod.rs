pub mod article;
pub mod header;
pub mod state;

pub use article::{ArticleSource, Frontmatter, ParsedArticle};
pub use header::{format_created, ArticleHeader, Byline};
pub use state::RenderState;
