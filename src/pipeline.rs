//! Batch orchestration of the tagging pipeline.
//!
//! A batch renders the system prompt once, from the vocabulary and the batch
//! start time, then tags documents one at a time. Each document's output is
//! written before the next document starts. The first failure stops the batch;
//! outputs already written stay in place.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use crate::error::PipelineError;
use crate::llm::ChatClientTrait;
use crate::models::{Document, Settings, Vocabulary};
use crate::store::{DocumentSource, OutputSink};
use crate::tagger::{DocumentTagger, PromptBuilder};

/// One batch run over a fixed vocabulary, prompt template and start time.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::Mutex;
/// use doctag::{Document, Pipeline, StorageError, Tag, Vocabulary};
/// use doctag::llm::{ChatClientTrait, ModelError};
/// use doctag::store::OutputSink;
/// use time::OffsetDateTime;
///
/// struct Fixed;
/// impl ChatClientTrait for Fixed {
///     fn complete(&self, _system: &str, _user: &str) -> Result<String, ModelError> {
///         Ok("Cat".to_string())
///     }
/// }
///
/// #[derive(Default)]
/// struct Memory(Mutex<Vec<(String, String)>>);
/// impl OutputSink for Memory {
///     fn write(&self, name: &str, text: &str) -> Result<(), StorageError> {
///         self.0.lock().unwrap().push((name.to_string(), text.to_string()));
///         Ok(())
///     }
/// }
///
/// let vocabulary: Vocabulary =
///     [Tag::with_variants("Cat", vec!["kitty".to_string()])].into_iter().collect();
/// let pipeline = Pipeline::new(Arc::new(Fixed), vocabulary, "%TAGS%", OffsetDateTime::now_utc());
///
/// let sink = Memory::default();
/// let count = pipeline
///     .run(vec![Document::new("pets.txt", "a kitty")], &sink)
///     .unwrap();
///
/// assert_eq!(count, 1);
/// assert_eq!(sink.0.lock().unwrap()[0].1, "タグ: Cat\na Cat");
/// ```
pub struct Pipeline {
    tagger: DocumentTagger,
}

impl Pipeline {
    /// Prepares a batch, rendering the system prompt from `template` right away.
    #[must_use]
    pub fn new(
        client: Arc<dyn ChatClientTrait>,
        vocabulary: Vocabulary,
        template: &str,
        started_at: OffsetDateTime,
    ) -> Self {
        let system_prompt = PromptBuilder::render(template, &vocabulary, started_at);
        debug!(
            prompt_chars = system_prompt.chars().count(),
            tags = vocabulary.len(),
            "rendered system prompt"
        );
        Self {
            tagger: DocumentTagger::new(client, vocabulary, system_prompt),
        }
    }

    /// Prepares a batch from stored settings; the template is `system_prompt`.
    #[must_use]
    pub fn from_settings(
        client: Arc<dyn ChatClientTrait>,
        vocabulary: Vocabulary,
        settings: &Settings,
        started_at: OffsetDateTime,
    ) -> Self {
        Self::new(client, vocabulary, &settings.system_prompt, started_at)
    }

    /// The prompt shared by every document of this batch.
    pub fn system_prompt(&self) -> &str {
        self.tagger.system_prompt()
    }

    /// Tags `documents` in order and writes each rendered result to `sink`.
    ///
    /// Returns the number of documents processed.
    ///
    /// # Errors
    ///
    /// Stops at the first model or storage failure and returns it.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn run(
        &self,
        documents: Vec<Document>,
        sink: &dyn OutputSink,
    ) -> Result<usize, PipelineError> {
        info!("starting tagging batch");
        let mut processed = 0;
        for document in &documents {
            self.process(document, sink)?;
            processed += 1;
        }
        info!(processed, "tagging batch complete");
        Ok(processed)
    }

    /// Tags every pending document of `source`, reading each one only when its
    /// turn comes.
    ///
    /// # Errors
    ///
    /// Stops at the first read, model or write failure and returns it.
    #[instrument(skip_all)]
    pub fn run_pending(
        &self,
        source: &dyn DocumentSource,
        sink: &dyn OutputSink,
    ) -> Result<usize, PipelineError> {
        let pending = source.pending()?;
        info!(documents = pending.len(), "starting tagging batch");

        let mut processed = 0;
        for name in &pending {
            let document = source.read(name)?;
            self.process(&document, sink)?;
            processed += 1;
        }
        info!(processed, "tagging batch complete");
        Ok(processed)
    }

    fn process(&self, document: &Document, sink: &dyn OutputSink) -> Result<(), PipelineError> {
        let result = self
            .tagger
            .tag(document)
            .map_err(|source| PipelineError::Model {
                document: document.name().to_string(),
                source,
            })?;

        sink.write(document.name(), &result.render())?;
        info!(
            document = document.name(),
            tags = result.tags().len(),
            "tagged document"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ModelError, StorageError};
    use crate::models::Tag;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use time::macros::datetime;

    /// Replies from a script, one entry per call; records every system prompt.
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<String, ModelError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<String, ModelError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatClientTrait for ScriptedClient {
        fn complete(&self, system: &str, _user: &str) -> Result<String, ModelError> {
            self.prompts.lock().unwrap().push(system.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ModelError::EmptyChoices))
        }
    }

    #[derive(Default)]
    struct MemorySink {
        written: Mutex<Vec<(String, String)>>,
    }

    impl OutputSink for MemorySink {
        fn write(&self, name: &str, text: &str) -> Result<(), StorageError> {
            self.written
                .lock()
                .unwrap()
                .push((name.to_string(), text.to_string()));
            Ok(())
        }
    }

    fn animals() -> Vocabulary {
        [
            Tag::with_variants("Cat", vec!["feline".to_string(), "kitty".to_string()]),
            Tag::with_variants("Dog", vec!["canine".to_string()]),
        ]
        .into_iter()
        .collect()
    }

    fn docs(names: &[&str]) -> Vec<Document> {
        names
            .iter()
            .map(|name| Document::new(*name, format!("{name}: a kitty")))
            .collect()
    }

    #[test]
    fn prompt_is_rendered_once_and_shared_across_documents() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok("Cat".to_string()),
            Ok("Dog".to_string()),
            Ok("".to_string()),
        ]));
        let pipeline = Pipeline::new(
            client.clone(),
            animals(),
            "%TAGS%at %DATE%",
            datetime!(2024-05-06 07:08:09 UTC),
        );

        let count = pipeline
            .run(docs(&["a.txt", "b.txt", "c.txt"]), &MemorySink::default())
            .unwrap();

        assert_eq!(count, 3);
        let prompts = client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts.iter().all(|p| p == pipeline.system_prompt()));
        assert_eq!(
            pipeline.system_prompt(),
            "Cat: Cat,feline,kitty\nDog: Dog,canine\nat 2024/05/06 07:08:09"
        );
    }

    #[test]
    fn failure_stops_batch_and_keeps_earlier_outputs() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok("Cat".to_string()),
            Err(ModelError::Http {
                status: 500,
                body: "boom".to_string(),
            }),
            Ok("Dog".to_string()),
        ]));
        let pipeline = Pipeline::new(client.clone(), animals(), "%TAGS%", OffsetDateTime::now_utc());
        let sink = MemorySink::default();

        let err = pipeline
            .run(docs(&["a.txt", "b.txt", "c.txt"]), &sink)
            .unwrap_err();

        match err {
            PipelineError::Model { document, source } => {
                assert_eq!(document, "b.txt");
                assert!(matches!(source, ModelError::Http { status: 500, .. }));
            }
            other => panic!("expected model error, got {other:?}"),
        }
        let written = sink.written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, "a.txt");
        assert_eq!(client.prompts.lock().unwrap().len(), 2);
    }

    #[test]
    fn empty_batch_processes_nothing() {
        let client = Arc::new(ScriptedClient::new(Vec::new()));
        let pipeline = Pipeline::new(client.clone(), animals(), "%TAGS%", OffsetDateTime::now_utc());

        assert_eq!(pipeline.run(Vec::new(), &MemorySink::default()).unwrap(), 0);
        assert!(client.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn sink_failure_aborts_batch() {
        struct BrokenSink;
        impl OutputSink for BrokenSink {
            fn write(&self, name: &str, _text: &str) -> Result<(), StorageError> {
                Err(StorageError::InvalidDocumentName(name.to_string()))
            }
        }

        let client = Arc::new(ScriptedClient::new(vec![
            Ok("Cat".to_string()),
            Ok("Cat".to_string()),
        ]));
        let pipeline = Pipeline::new(client.clone(), animals(), "", OffsetDateTime::now_utc());

        let err = pipeline
            .run(docs(&["a.txt", "b.txt"]), &BrokenSink)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Storage(_)));
        assert_eq!(client.prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn from_settings_uses_system_prompt_as_template() {
        let settings = Settings {
            system_prompt: "Tags:\n%TAGS%".to_string(),
            ..Settings::default()
        };
        let pipeline = Pipeline::from_settings(
            Arc::new(ScriptedClient::new(Vec::new())),
            animals(),
            &settings,
            OffsetDateTime::now_utc(),
        );

        assert_eq!(
            pipeline.system_prompt(),
            "Tags:\nCat: Cat,feline,kitty\nDog: Dog,canine\n"
        );
    }
}
