use super::ParsedArticle;

/// What an article view should currently show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RenderState {
    #[default]
    Loading,
    Error(String),
    Loaded(ParsedArticle),
}

impl RenderState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RenderState::Loading)
    }

    pub fn article(&self) -> Option<&ParsedArticle> {
        match self {
            RenderState::Loaded(article) => Some(article),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RenderState::Error(message) => Some(message),
            _ => None,
        }
    }
}
