use serde::{Deserialize, Serialize};

use crate::edit::EditSet;
use crate::position::{Position, region_to_positions};

/// One edit of a report, with offsets into the original document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditJson {
    pub start: usize,
    pub end: usize,
    pub start_position: Position,
    pub end_position: Position,
    pub replacement: String,
}

impl EditJson {
    /// Describe every edit of `edit_set` against `document`
    pub fn from_edit_set(document: &str, edit_set: &EditSet) -> Vec<EditJson> {
        edit_set
            .iter()
            .map(|edit| {
                let (start_position, end_position) = region_to_positions(document, edit.region);
                EditJson {
                    start: edit.region.start,
                    end: edit.region.end,
                    start_position,
                    end_position,
                    replacement: edit.replacement.clone(),
                }
            })
            .collect()
    }
}

/// Structured result of one command run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub execution_id: String,
    pub command: String,
    pub success: bool,
    /// Checksum of the document the edits were computed against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    pub applied_count: usize,
    pub char_shift: i64,
    pub edits: Vec<EditJson>,
    /// Transformed text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn success(
        execution_id: String,
        command: String,
        checksum: Option<String>,
        edits: Vec<EditJson>,
        char_shift: i64,
        output: String,
    ) -> Self {
        Self {
            execution_id,
            command,
            success: true,
            checksum,
            applied_count: edits.len(),
            char_shift,
            edits,
            output: Some(output),
            error: None,
        }
    }

    pub fn failure(execution_id: String, command: String, error: String) -> Self {
        Self {
            execution_id,
            command,
            success: false,
            checksum: None,
            applied_count: 0,
            char_shift: 0,
            edits: Vec::new(),
            output: None,
            error: Some(error),
        }
    }
}

/// Fresh execution id (UUID v4)
pub fn generate_execution_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Codec;
    use crate::region::{Region, apply_to_regions};

    #[test]
    fn test_edits_report_positions() {
        let document = "one\ntwo three";
        let edit_set = apply_to_regions(document, &[Region::new(4, 13)], |t| Codec::Encode.apply(t))
            .unwrap();

        let edits = EditJson::from_edit_set(document, &edit_set);

        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].start_position, Position { line: 2, column: 1 });
        assert_eq!(edits[0].end_position, Position { line: 2, column: 10 });
        assert_eq!(edits[0].replacement, "two%20three");
    }

    #[test]
    fn test_failure_serialization_omits_empty_fields() {
        let response = CommandResponse::failure(
            "id-1".to_string(),
            "uri-tools.decodeClipboard".to_string(),
            "Failed to decode text: bad".to_string(),
        );

        let json: serde_json::Value = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to decode text: bad");
        assert!(json.get("output").is_none());
        assert!(json.get("checksum").is_none());
    }

    #[test]
    fn test_generate_execution_id_unique() {
        let a = generate_execution_id();
        let b = generate_execution_id();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(&a).is_ok());
    }
}
