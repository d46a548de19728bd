pub mod article;
pub mod sentiment;

pub use article::{Article, GeneratedContent};
pub use sentiment::Sentiment;
