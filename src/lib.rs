pub mod error;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod tagger;
pub mod utils;
pub mod workspace;

pub use error::{ModelError, PipelineError, StorageError};
pub use llm::{ChatClient, ChatClientBuilder, ChatClientTrait};
pub use models::{Document, Settings, Tag, TaggingResult, Vocabulary};
pub use pipeline::Pipeline;
pub use workspace::Workspace;
