//! Governed LM pipeline
//!
//! Wraps every language-model invocation in a pre-check against the rule
//! engine, an audit append, a compliance evaluation, the model call
//! itself, and a post-check over the model output. A REJECTED pre-check
//! short-circuits: the model is never invoked and the caller receives a
//! blocked outcome with the rule's reason.
//!
//! The model is the only slow collaborator, reached through the narrow
//! [`LmAdapter`] contract and raced against cancellation and the
//! configured deadline. No lock is held across it.

#![deny(unsafe_code)]

mod adapter;
mod cancel;
mod error;
mod pipeline;

pub use adapter::{ChunkedAdapter, LmAdapter, SpyAdapter};
pub use cancel::{CancelHandle, CancelToken};
pub use error::{AgentError, Result};
pub use pipeline::{GovernedPipeline, PipelineConfig, RunOutcome};
