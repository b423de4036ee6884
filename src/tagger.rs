//! Tagging of a single document against a controlled vocabulary.
//!
//! The flow for one document is:
//!
//! 1. [`PromptBuilder`] renders the system prompt from the template, the
//!    vocabulary listing and a timestamp.
//! 2. A [`ChatClientTrait`] implementation sends that prompt as the system
//!    message and the raw document as the user message.
//! 3. [`TagExtractor`] keeps the comma-separated reply pieces that are
//!    canonical tag names.
//! 4. [`TextNormalizer`] rewrites variant spellings in the document to their
//!    canonical names.
//!
//! Steps 3 and 4 never fail. Only the model call can, and its error is
//! returned as-is.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use doctag::{Document, Tag, Vocabulary};
//! use doctag::llm::ChatClientBuilder;
//! use doctag::tagger::{DocumentTagger, PromptBuilder};
//! use time::OffsetDateTime;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ChatClientBuilder::new()
//!     .base_url("http://127.0.0.1:1234/v1")
//!     .build()?;
//!
//! let vocabulary: Vocabulary =
//!     [Tag::with_variants("Cat", vec!["kitty".to_string()])].into_iter().collect();
//! let prompt = PromptBuilder::render(
//!     "Choose from:\n%TAGS%",
//!     &vocabulary,
//!     OffsetDateTime::now_utc(),
//! );
//!
//! let tagger = DocumentTagger::new(Arc::new(client), vocabulary, prompt);
//! let result = tagger.tag(&Document::new("pets.txt", "I saw a kitty."))?;
//! println!("{}", result.render());
//! # Ok(())
//! # }
//! ```

mod extractor;
mod normalizer;
mod prompt;

use std::sync::Arc;

use crate::error::ModelError;
use crate::llm::ChatClientTrait;
use crate::models::{Document, TaggingResult, Vocabulary};

pub use extractor::TagExtractor;
pub use normalizer::TextNormalizer;
pub use prompt::PromptBuilder;

/// Tags documents with one already-rendered system prompt.
///
/// The prompt is rendered once per batch by the caller and shared by every
/// document the tagger handles.
pub struct DocumentTagger {
    client: Arc<dyn ChatClientTrait>,
    vocabulary: Vocabulary,
    system_prompt: String,
}

impl DocumentTagger {
    /// Creates a tagger from a client, the batch vocabulary and the rendered prompt.
    #[must_use]
    pub fn new(
        client: Arc<dyn ChatClientTrait>,
        vocabulary: Vocabulary,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client,
            vocabulary,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Tags one document: model call, extraction, then normalization.
    ///
    /// # Errors
    ///
    /// Returns `ModelError` if the model call fails. Unusable replies are not
    /// errors; they produce an empty tag list.
    pub fn tag(&self, document: &Document) -> Result<TaggingResult, ModelError> {
        let reply = self
            .client
            .complete(&self.system_prompt, document.raw_text())?;

        let tags = TagExtractor::extract(&reply, &self.vocabulary);
        let normalized = TextNormalizer::normalize(document.raw_text(), &self.vocabulary);

        Ok(TaggingResult::new(tags, normalized))
    }
}
