/// Chat-completion HTTP client module.
///
/// This module provides a blocking client for OpenAI-compatible chat-completion
/// endpoints (LM Studio, llama.cpp server, vLLM, hosted APIs), along with its
/// builder and the trait the pipeline depends on.
mod client;

pub use client::{
    ChatClient, ChatClientBuilder, ChatClientTrait, ENV_API_BASE, ENV_API_KEY, ENV_MODEL,
};
pub use crate::error::ModelError;
