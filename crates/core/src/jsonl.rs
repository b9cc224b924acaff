//! Trace file format: streaming serialization/deserialization
//!
//! A `.otlog.jsonl` file has the structure:
//! ```jsonl
//! {"type":"header","version":"otlog-1","initialState":{"status":"SYNCHRONIZED","serverRevision":0}}
//! {"type":"item","entry":{"type":"USER_EDIT_IMMEDIATELY_SENT_TO_SERVER",...},"newState":{...}}
//! {"type":"item","entry":{...},"newState":{...}}
//! ```
//!
//! The header line carries the initial synchronization state. Each log item
//! is one line, in chronological order. A single JSON document of the form
//! `{"initialState": ..., "log": [...]}` is accepted on read as well.

use crate::client_log::{ClientLogItem, SynchronizationState};
use crate::sequence::ClientTrace;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::path::Path;

pub const CURRENT_VERSION: &str = "otlog-1";

/// A single line in a trace JSONL file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[non_exhaustive]
pub enum TraceLine<P> {
    /// First line: format version and initial state
    #[serde(rename_all = "camelCase")]
    Header {
        version: String,
        initial_state: SynchronizationState<P>,
    },
    /// Following lines: one log item per line
    Item(ClientLogItem<P>),
}

/// Error types for trace file operations
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TraceFileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error at line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
    #[error("Missing header line")]
    MissingHeader,
    #[error("Unexpected line type at line {0}: expected header")]
    UnexpectedLineType(usize),
    #[error("Unsupported trace version: {0}")]
    UnsupportedVersion(String),
}

/// Write a trace as JSONL to a writer
pub fn write_jsonl<P, W>(trace: &ClientTrace<P>, mut writer: W) -> Result<(), TraceFileError>
where
    P: Serialize + Clone,
    W: Write,
{
    let header = TraceLine::Header {
        version: CURRENT_VERSION.to_string(),
        initial_state: trace.initial_state.clone(),
    };
    serde_json::to_writer(&mut writer, &header)
        .map_err(|e| TraceFileError::Json { line: 1, source: e })?;
    writer.write_all(b"\n")?;

    for (i, item) in trace.log.iter().enumerate() {
        let line = TraceLine::Item(item.clone());
        serde_json::to_writer(&mut writer, &line).map_err(|e| TraceFileError::Json {
            line: i + 2,
            source: e,
        })?;
        writer.write_all(b"\n")?;
    }

    Ok(())
}

/// Write a trace as JSONL to a String
pub fn to_jsonl_string<P>(trace: &ClientTrace<P>) -> Result<String, TraceFileError>
where
    P: Serialize + Clone,
{
    let mut buf = Vec::new();
    write_jsonl(trace, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Read a trace from a JSONL reader
pub fn read_jsonl<P, R>(reader: R) -> Result<ClientTrace<P>, TraceFileError>
where
    P: DeserializeOwned,
    R: BufRead,
{
    let mut lines = reader.lines().enumerate();

    // Header: first non-empty line
    let (header_line, header_str) = loop {
        match lines.next() {
            Some((i, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break (i + 1, line);
                }
            }
            None => return Err(TraceFileError::MissingHeader),
        }
    };
    let header: TraceLine<P> =
        serde_json::from_str(&header_str).map_err(|e| TraceFileError::Json {
            line: header_line,
            source: e,
        })?;
    let initial_state = match header {
        TraceLine::Header {
            version,
            initial_state,
        } => {
            if version != CURRENT_VERSION {
                return Err(TraceFileError::UnsupportedVersion(version));
            }
            initial_state
        }
        TraceLine::Item(_) => return Err(TraceFileError::UnexpectedLineType(header_line)),
    };

    let mut trace = ClientTrace::new(initial_state);
    for (i, line_result) in lines {
        let line_str = line_result?;
        if line_str.trim().is_empty() {
            continue;
        }
        let line: TraceLine<P> =
            serde_json::from_str(&line_str).map_err(|e| TraceFileError::Json {
                line: i + 1,
                source: e,
            })?;
        match line {
            TraceLine::Item(item) => trace.log.push(item),
            TraceLine::Header { .. } => {
                tracing::debug!(line = i + 1, "ignoring duplicate trace header");
            }
        }
    }

    Ok(trace)
}

/// Read a trace from a string, accepting JSONL or a single JSON document.
pub fn from_trace_str<P>(s: &str) -> Result<ClientTrace<P>, TraceFileError>
where
    P: DeserializeOwned,
{
    if looks_like_jsonl(s) {
        return read_jsonl(io::BufReader::new(s.as_bytes()));
    }
    serde_json::from_str(s).map_err(|e| TraceFileError::Json {
        line: e.line(),
        source: e,
    })
}

/// Read a trace file from disk.
pub fn read_trace_file<P>(path: &Path) -> Result<ClientTrace<P>, TraceFileError>
where
    P: DeserializeOwned,
{
    let content = std::fs::read_to_string(path)?;
    from_trace_str(&content)
}

/// Trace lines are written tag-first, so a JSONL file opens with `{"type"`.
/// Decided on the raw text so a malformed header still reports its own line.
fn looks_like_jsonl(s: &str) -> bool {
    let Some(first) = s.lines().find(|line| !line.trim().is_empty()) else {
        return true;
    };
    first
        .trim_start()
        .strip_prefix('{')
        .is_some_and(|rest| rest.trim_start().starts_with("\"type\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn make_test_trace() -> ClientTrace<String> {
        ClientTrace {
            initial_state: testing::synchronized(0),
            log: testing::sample_log(),
        }
    }

    #[test]
    fn test_jsonl_layout() {
        let trace = make_test_trace();
        let jsonl = to_jsonl_string(&trace).unwrap();

        let lines: Vec<&str> = jsonl.trim().lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("\"type\":\"header\""));
        assert!(lines[0].contains("\"initialState\""));
        assert!(lines[1].contains("\"type\":\"item\""));
        assert!(lines[2].contains("RECEIVED_SERVER_OPERATION_WHILE_AWAITING_OPERATION"));

        let parsed: ClientTrace<String> = from_trace_str(&jsonl).unwrap();
        assert_eq!(parsed, trace);
    }

    #[test]
    fn test_plain_json_document_is_accepted() {
        let trace = make_test_trace();
        let json = serde_json::to_string_pretty(&trace).unwrap();
        let parsed: ClientTrace<String> = from_trace_str(&json).unwrap();
        assert_eq!(parsed.log.len(), 3);
        assert_eq!(parsed.initial_state, testing::synchronized(0));
    }

    #[test]
    fn test_missing_header() {
        let result = read_jsonl::<String, _>(io::BufReader::new("\n\n".as_bytes()));
        assert!(matches!(result, Err(TraceFileError::MissingHeader)));
    }

    #[test]
    fn test_item_before_header_is_rejected() {
        let trace = make_test_trace();
        let jsonl = to_jsonl_string(&trace).unwrap();
        let without_header: String = jsonl.lines().skip(1).collect::<Vec<_>>().join("\n");
        let result = from_trace_str::<String>(&without_header);
        assert!(matches!(result, Err(TraceFileError::UnexpectedLineType(1))));
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let trace = make_test_trace();
        let mut jsonl = to_jsonl_string(&trace).unwrap();
        jsonl.push_str("{\"type\":\"item\",\"entry\":42}\n");
        match from_trace_str::<String>(&jsonl) {
            Err(TraceFileError::Json { line, .. }) => assert_eq!(line, 5),
            other => panic!("expected JSON error, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_version() {
        let line = r#"{"type":"header","version":"otlog-0","initialState":{"status":"SYNCHRONIZED","serverRevision":0}}"#;
        let result = from_trace_str::<String>(line);
        assert!(matches!(result, Err(TraceFileError::UnsupportedVersion(v)) if v == "otlog-0"));
    }

    #[test]
    fn test_truncated_header_reports_first_line() {
        let trace = make_test_trace();
        let jsonl = to_jsonl_string(&trace).unwrap();
        let mut lines: Vec<&str> = jsonl.lines().collect();
        let header = lines[0];
        lines[0] = &header[..header.len() / 2];
        let broken = lines.join("\n");

        match from_trace_str::<String>(&broken) {
            Err(TraceFileError::Json { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected JSON error, got {other:?}"),
        }
    }

    #[test]
    fn test_compact_json_document_is_not_mistaken_for_jsonl() {
        let trace = make_test_trace();
        let json = serde_json::to_string(&trace).unwrap();
        let parsed: ClientTrace<String> = from_trace_str(&json).unwrap();
        assert_eq!(parsed, trace);
    }

    #[test]
    fn test_document_without_log_has_empty_log() {
        let json = r#"{"initialState":{"status":"SYNCHRONIZED","serverRevision":4}}"#;
        let parsed: ClientTrace<serde_json::Value> = from_trace_str(json).unwrap();
        assert!(parsed.log.is_empty());
        assert_eq!(
            parsed.initial_state,
            SynchronizationState::Synchronized { server_revision: 4 }
        );
    }

    #[test]
    fn test_read_trace_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.otlog.jsonl");
        let trace = make_test_trace();
        std::fs::write(&path, to_jsonl_string(&trace).unwrap()).unwrap();

        let parsed: ClientTrace<String> = read_trace_file(&path).unwrap();
        assert_eq!(parsed, trace);
    }
}
