//! The narrow contract to the language model

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;

/// Single-shot and streaming completion against a language model
///
/// The default streaming implementation falls back to `complete` and
/// delivers the whole text as one chunk; adapters with native streaming
/// override both `supports_streaming` and `complete_stream`.
#[async_trait]
pub trait LmAdapter: Send + Sync {
    /// One prompt in, one completion out
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Whether `complete_stream` delivers incremental chunks
    fn supports_streaming(&self) -> bool {
        false
    }

    /// Stream chunks into the channel in order, returning the full text
    async fn complete_stream(
        &self,
        prompt: &str,
        chunks: mpsc::Sender<String>,
    ) -> Result<String> {
        let text = self.complete(prompt).await?;
        let _ = chunks.send(text.clone()).await;
        Ok(text)
    }
}

/// Fixed-reply spy adapter that records how often it was invoked
///
/// The recorder makes the REJECTED short-circuit observable: a blocked
/// pre-check must leave `calls` at zero.
pub struct SpyAdapter {
    reply: String,
    calls: AtomicUsize,
}

impl SpyAdapter {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completed invocations
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl LmAdapter for SpyAdapter {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.reply.clone())
    }
}

/// Streaming adapter that replays a fixed chunk sequence
pub struct ChunkedAdapter {
    chunks: Vec<String>,
    calls: AtomicUsize,
}

impl ChunkedAdapter {
    pub fn new(chunks: Vec<String>) -> Self {
        Self {
            chunks,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl LmAdapter for ChunkedAdapter {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.chunks.concat())
    }

    fn supports_streaming(&self) -> bool {
        true
    }

    async fn complete_stream(
        &self,
        _prompt: &str,
        chunks: mpsc::Sender<String>,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        for chunk in &self.chunks {
            if chunks.send(chunk.clone()).await.is_err() {
                // Receiver hung up (cancellation); stop producing
                break;
            }
            tokio::task::yield_now().await;
        }
        Ok(self.chunks.concat())
    }
}
