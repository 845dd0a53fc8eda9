//! Progressive reveal of an already-received reply.
//!
//! The reply arrives in one payload; revealing it a few characters at a time
//! only changes how it appears. The growing buffer is written as plain text
//! and replaced by the formatted HTML once the whole reply is shown.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use super::format::RenderedMessage;
use super::view::MessageNode;

/// Chunking and pacing of the reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    /// Unicode code points revealed per step.
    pub chunk_size: usize,
    pub base_delay: Duration,
    /// Upper bound (inclusive) of the random delay added to each step.
    pub max_jitter: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            chunk_size: 4,
            base_delay: Duration::from_millis(18),
            max_jitter: Duration::from_millis(40),
        }
    }
}

impl RevealTiming {
    /// No delays between steps.
    pub fn instant() -> Self {
        Self {
            chunk_size: 4,
            base_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    fn step_delay(&self) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base_delay;
        }
        let jitter = rand::thread_rng().gen_range(0..=jitter_ms);
        self.base_delay + Duration::from_millis(jitter)
    }
}

/// Reveal `text` into `target`, then replace it with the formatted version.
///
/// Resolves immediately when `target` is `None`. Empty text clears the node.
/// When `cancel` fires mid-reveal, no further writes are made and the
/// function returns `false`; otherwise it returns `true` once the formatted
/// content is in place.
pub async fn stream_formatted_content(
    target: Option<&Arc<dyn MessageNode>>,
    text: &str,
    timing: &RevealTiming,
    cancel: &CancellationToken,
) -> bool {
    let Some(node) = target else {
        return true;
    };
    if text.is_empty() {
        node.clear();
        return true;
    }

    let units: Vec<char> = text.chars().collect();
    let chunk_size = timing.chunk_size.max(1);
    let mut buffer = String::with_capacity(text.len());

    for chunk in units.chunks(chunk_size) {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return false,
            _ = tokio::time::sleep(timing.step_delay()) => {}
        }
        buffer.extend(chunk);
        node.set_text(&buffer);
    }

    if cancel.is_cancelled() {
        return false;
    }
    node.set_formatted(&RenderedMessage::from_raw(text));
    true
}
