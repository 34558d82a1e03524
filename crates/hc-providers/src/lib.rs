//! hc-providers: LLM provider implementations for the help center assistant
//!
//! This crate provides implementations of the Provider trait for chat-completion APIs.

pub mod openai;

pub use openai::OpenAIProvider;
