mod document;
mod settings;
mod tag;
mod tagging_result;
mod vocabulary;

pub use document::Document;
pub use settings::{
    DATE_PLACEHOLDER, DEFAULT_API_BASE, DEFAULT_API_KEY, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT,
    Settings, TAGS_PLACEHOLDER,
};
pub use tag::Tag;
pub use tagging_result::{TAG_LINE_PREFIX, TaggingResult};
pub use vocabulary::Vocabulary;
