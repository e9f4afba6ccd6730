//! Completion requester.
//!
//! [`ChatModel`] is the seam every workflow is written against; [`CompletionClient`]
//! implements it over HTTP. [`CompletionExt`] adds typed helpers that turn a reply
//! into a [`CompletionResult`].

pub mod builder;
pub mod chat;
pub mod core;
pub mod model;
pub mod request;
pub mod response;

pub use builder::CompletionClientBuilder;
pub use chat::ChatRequestBuilder;
pub use core::CompletionClient;
pub use model::{ChatModel, CompletionExt};
pub use request::CompletionRequest;
pub use response::{CompletionResult, ModelReply, Usage};
