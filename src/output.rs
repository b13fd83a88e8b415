//! JSON lines read and written by the host binary, one per input event.

use std::io;

use document::bson::Bson;
use futures::stream::{self, Stream};
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::{EventError, SyncError};
use crate::event::ChangeEvent;
use crate::pipeline::{AssetSync, SyncOutcome};

/// Lines of `reader` as a stream. A read error is yielded once and ends the
/// stream.
pub fn read_lines<R>(reader: R) -> impl Stream<Item = io::Result<String>>
where
    R: AsyncBufRead + Unpin,
{
    stream::unfold(Some(reader.lines()), |lines| async move {
        let mut lines = lines?;
        match lines.next_line().await {
            Ok(Some(line)) => Some((Ok(line), Some(lines))),
            Ok(None) => None,
            Err(err) => Some((Err(err), None)),
        }
    })
}

/// Run one input line through `sync`.
///
/// Blank lines produce no output. A line that is not a valid event produces
/// an error line without an asset id.
pub async fn process_line(sync: &AssetSync, line: &str) -> Option<OutputLine> {
    if line.trim().is_empty() {
        return None;
    }
    let output = match ChangeEvent::from_json_line(line) {
        Ok(event) => OutputLine::from_result(sync.handle(event).await),
        Err(err) => OutputLine::from_event_error(&err),
    };
    Some(output)
}

/// One output line.
///
/// - `{"skip": true}`
/// - `{"routing": "..", "document": {..}}` with the document in relaxed
///   extended JSON
/// - `{"error": "..", "asset_id": ".."}`; `asset_id` is null when it could
///   not be read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputLine {
    Skip { skip: bool },
    Indexed { routing: String, document: Value },
    Error { error: String, asset_id: Option<String> },
}

impl OutputLine {
    pub fn from_result(result: Result<SyncOutcome, SyncError>) -> Self {
        match result {
            Ok(SyncOutcome::Skip) => OutputLine::Skip { skip: true },
            Ok(SyncOutcome::Indexed(asset)) => OutputLine::Indexed {
                routing: asset.routing,
                document: Bson::Document(asset.document).into_relaxed_extjson(),
            },
            Err(err) => OutputLine::Error {
                error: err.to_string(),
                asset_id: err.asset_id().map(str::to_string),
            },
        }
    }

    pub fn from_event_error(err: &EventError) -> Self {
        OutputLine::Error {
            error: err.to_string(),
            asset_id: None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"error":"failed to encode output: {e}","asset_id":null}}"#)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::IndexedAsset;
    use document::bson::doc;
    use lookup::InMemoryReferenceStore;
    use std::sync::Arc;

    fn empty_sync() -> (Arc<InMemoryReferenceStore>, AssetSync) {
        let store = Arc::new(InMemoryReferenceStore::new());
        let sync = AssetSync::new(store.clone());
        (store, sync)
    }

    #[tokio::test]
    async fn read_lines_yields_each_line() {
        use futures::StreamExt;

        let lines: Vec<io::Result<String>> = read_lines(&b"a\n\nb\n"[..]).collect().await;
        let lines: Vec<String> = lines.into_iter().map(Result::unwrap).collect();
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[tokio::test]
    async fn read_error_is_yielded_then_ends_the_stream() {
        use futures::StreamExt;

        // Invalid UTF-8 makes the line reader fail.
        let input: &[u8] = &[b'o', b'k', b'\n', 0xff, 0xfe, b'\n', b'x', b'\n'];
        let items: Vec<io::Result<String>> = read_lines(input).collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "ok");
        assert_eq!(items[1].as_ref().unwrap_err().kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn blank_lines_produce_nothing() {
        let (store, sync) = empty_sync();
        assert_eq!(process_line(&sync, "").await, None);
        assert_eq!(process_line(&sync, "   \t").await, None);
        assert_eq!(store.query_count(), 0);
    }

    #[tokio::test]
    async fn invalid_line_becomes_error_without_asset() {
        let (_, sync) = empty_sync();
        let output = process_line(&sync, "{not json").await.unwrap();
        match output {
            OutputLine::Error { error, asset_id } => {
                assert!(error.starts_with("malformed event JSON"));
                assert_eq!(asset_id, None);
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[tokio::test]
    async fn irrelevant_update_line_is_skipped() {
        let (store, sync) = empty_sync();
        let line = r#"{"operation":"u","document":{"_id":"a1","org":"o1"},"updated_fields":["__v"]}"#;
        let output = process_line(&sync, line).await.unwrap();
        assert_eq!(output, OutputLine::Skip { skip: true });
        assert_eq!(store.query_count(), 0);
    }

    #[test]
    fn skip_line() {
        assert_eq!(OutputLine::from_result(Ok(SyncOutcome::Skip)).to_json(), r#"{"skip":true}"#);
    }

    #[test]
    fn indexed_line_carries_routing_and_document() {
        let line = OutputLine::from_result(Ok(SyncOutcome::Indexed(IndexedAsset {
            routing: "o1".into(),
            document: doc! { "id": "a1", "tags": ["finance"] },
        })));
        let value: Value = serde_json::from_str(&line.to_json()).unwrap();
        assert_eq!(value["routing"], "o1");
        assert_eq!(value["document"]["id"], "a1");
        assert_eq!(value["document"]["tags"][0], "finance");
    }

    #[test]
    fn error_line_names_the_asset() {
        let line = OutputLine::from_result(Err(SyncError::Fault {
            asset_id: "a1".into(),
            message: "boom".into(),
        }));
        let value: Value = serde_json::from_str(&line.to_json()).unwrap();
        assert_eq!(value["asset_id"], "a1");
        assert!(value["error"].as_str().unwrap().contains("a1"));
    }
}
