use crate::io::{ArticleId, UserId};

/// Errors raised while loading datasets or serving recommendations.
#[derive(thiserror::Error, Debug)]
pub enum RecommendError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    #[error("Interaction of user {user_id} references article {article_id} which is not in the catalog")]
    UnknownArticle { user_id: UserId, article_id: ArticleId },

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RecommendError>;
