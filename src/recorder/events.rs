//! Status event channel
//!
//! The core reports session state through a single outward channel. Events
//! are broadcast so the host can fan them out to several listeners (a main
//! window and an overlay, say) without the core knowing about either.

use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::broadcast;

/// Capacity of the broadcast buffer. Slow subscribers that fall further
/// behind than this lose the oldest events, never the newest.
const STATUS_CHANNEL_CAPACITY: usize = 64;

/// Session status reported to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum StatusEvent {
    /// The recorder is idle and ready to start.
    Ready,
    Recording,
    Paused,
    /// Transcoding is running; `progress` is a 0-100 percent when known.
    Processing {
        #[serde(skip_serializing_if = "Option::is_none")]
        progress: Option<u8>,
    },
    /// The final file has been written.
    Completed { output_path: PathBuf },
    Error { error: String },
}

/// Broadcast wrapper for status events.
///
/// Emission never blocks and never fails: an event sent while nobody is
/// subscribed is simply dropped.
#[derive(Debug, Clone)]
pub struct StatusChannel {
    tx: broadcast::Sender<StatusEvent>,
}

impl StatusChannel {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: StatusEvent) {
        tracing::debug!("Status event: {:?}", event);
        let _ = self.tx.send(event);
    }
}

impl Default for StatusChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_is_fine() {
        let channel = StatusChannel::new();
        channel.emit(StatusEvent::Ready);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_see_the_same_events() {
        let channel = StatusChannel::new();
        let mut a = channel.subscribe();
        let mut b = channel.subscribe();

        channel.emit(StatusEvent::Recording);
        channel.emit(StatusEvent::Processing { progress: Some(42) });

        for rx in [&mut a, &mut b] {
            assert_eq!(rx.recv().await.unwrap(), StatusEvent::Recording);
            assert_eq!(
                rx.recv().await.unwrap(),
                StatusEvent::Processing { progress: Some(42) }
            );
        }
    }

    #[test]
    fn test_wire_shape_matches_host_expectations() {
        let event = StatusEvent::Completed {
            output_path: PathBuf::from("/videos/recording-x.mp4"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["outputPath"], "/videos/recording-x.mp4");

        // Progress is omitted entirely when unknown
        let event = StatusEvent::Processing { progress: None };
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("progress"));
    }
}
