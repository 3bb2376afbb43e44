//! Import/export of the whole state document as a JSON file.

use crate::error::{MindcopyError, MindcopyResult};
use crate::state::{RawStateDocument, StateDocument};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "mindcopy_state.json";
pub const EXPORT_CONTENT_TYPE: &str = "application/json";

/// A downloadable export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

impl ExportFile {
    /// `Content-Disposition` value offering the body as a download.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name.replace('"', ""))
    }
}

/// Pretty-printed serialization of the full document. No versioning, no redaction.
pub fn export_document(doc: &StateDocument, file_name: &str) -> MindcopyResult<ExportFile> {
    let body = serde_json::to_string_pretty(doc)?;
    Ok(ExportFile {
        file_name: file_name.to_string(),
        content_type: EXPORT_CONTENT_TYPE,
        body,
    })
}

/// Parses file contents as a state document. The top level must be a JSON object.
pub fn parse_import(contents: &str) -> MindcopyResult<RawStateDocument> {
    let value: serde_json::Value =
        serde_json::from_str(contents).map_err(MindcopyError::import_rejected)?;
    if !value.is_object() {
        return Err(MindcopyError::import_rejected("top level is not an object"));
    }
    serde_json::from_value(value).map_err(MindcopyError::import_rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IMPORT_ALERT;

    #[test]
    fn export_is_pretty_json() {
        let file = export_document(&StateDocument::default(), DEFAULT_EXPORT_FILE_NAME).unwrap();
        assert_eq!(file.file_name, "mindcopy_state.json");
        assert_eq!(file.content_type, "application/json");
        assert!(file.body.contains("\n  \"modes\""));
        assert_eq!(
            file.content_disposition(),
            "attachment; filename=\"mindcopy_state.json\""
        );
    }

    #[test]
    fn malformed_json_is_rejected_with_alert() {
        let err = parse_import("{oops").unwrap_err();
        assert_eq!(err.user_alert(), Some(IMPORT_ALERT));
    }

    #[test]
    fn non_object_top_level_is_rejected() {
        assert!(parse_import("[1,2]").is_err());
        assert!(parse_import("5").is_err());
    }

    #[test]
    fn empty_object_is_accepted() {
        let raw = parse_import("{}").unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn export_then_parse_round_trips() {
        let mut doc = StateDocument::default();
        doc.modes.kurva = true;
        doc.profile.mission = "Keep going.".into();
        let file = export_document(&doc, DEFAULT_EXPORT_FILE_NAME).unwrap();
        let back = parse_import(&file.body).unwrap().fill_defaults();
        assert_eq!(back, doc);
    }
}
