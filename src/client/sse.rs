use crate::room::events::RoomEvent;
use tracing::warn;

/// Incremental decoder for the `/events` stream.
///
/// Frames are `data: <json>` lines separated by a blank line; comment
/// lines (keep-alives) start with `:` and decode to nothing. Input is
/// buffered as raw bytes so a multi-byte character split across chunks
/// survives intact.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk off the wire; returns every event the chunk
    /// completed. Undecodable frames are dropped.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<RoomEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(boundary) = find_frame_end(&self.buffer) {
            let frame: Vec<u8> = self.buffer.drain(..boundary + 2).collect();
            let frame = String::from_utf8_lossy(&frame[..boundary]);
            if let Some(event) = decode_frame(&frame) {
                events.push(event);
            }
        }
        events
    }
}

fn find_frame_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

fn decode_frame(frame: &str) -> Option<RoomEvent> {
    let data: Vec<&str> = frame
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        .collect();
    if data.is_empty() {
        // Comment-only frame, e.g. a keep-alive.
        return None;
    }

    let json = data.join("\n");
    match serde_json::from_str(&json) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!("Dropping undecodable event frame: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::events::RecordAction;
    use std::collections::HashMap;

    #[test]
    fn decodes_single_frame() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: {\"kind\":\"files-updated\"}\n\n");
        assert_eq!(events, vec![RoomEvent::FilesUpdated]);
    }

    #[test]
    fn buffers_partial_frames_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: {\"kind\":\"record-com").is_empty());
        let events = decoder.feed(b"mand\",\"action\":\"start\",\"timestamp\":7}\n\n");
        assert_eq!(
            events,
            vec![RoomEvent::RecordCommand {
                action: RecordAction::Start,
                timestamp: Some(7),
            }]
        );
    }

    #[test]
    fn survives_multibyte_split_across_chunks() {
        let frame = "data: {\"kind\":\"name-change\",\"participants\":{\"u1\":\"Zoë\"}}\n\n";
        let bytes = frame.as_bytes();
        // Split inside the two-byte 'ë'.
        let split = frame.find('ë').unwrap() + 1;

        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(&bytes[..split]).is_empty());
        let events = decoder.feed(&bytes[split..]);
        assert_eq!(
            events,
            vec![RoomEvent::NameChange {
                participants: HashMap::from([("u1".to_string(), "Zoë".to_string())]),
            }]
        );
    }

    #[test]
    fn multiple_frames_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(
            b"data: {\"kind\":\"files-updated\"}\n\ndata: {\"kind\":\"record-command\",\"action\":\"stop\"}\n\n",
        );
        assert_eq!(
            events,
            vec![
                RoomEvent::FilesUpdated,
                RoomEvent::RecordCommand {
                    action: RecordAction::Stop,
                    timestamp: None,
                },
            ]
        );
    }

    #[test]
    fn keep_alive_comments_decode_to_nothing() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b":\n\n").is_empty());
        assert!(decoder.feed(b": keep-alive\n\n").is_empty());
    }

    #[test]
    fn garbage_frames_are_dropped() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: not json\n\ndata: {\"kind\":\"files-updated\"}\n\n");
        assert_eq!(events, vec![RoomEvent::FilesUpdated]);
    }
}
