use crate::error::EditError;
use crate::position::char_to_byte;
use crate::region::Region;

/// Replacement of one region of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Span to replace, in original document offsets
    pub region: Region,
    /// Replacement text
    pub replacement: String,
}

/// Ordered edits computed against one version of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSet {
    /// BLAKE3 checksum (hex) of the document the edits were computed against
    pub checksum: String,
    /// Edits in selection order
    pub edits: Vec<Edit>,
}

impl EditSet {
    pub fn new(checksum: String, edits: Vec<Edit>) -> Self {
        Self { checksum, edits }
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edit> {
        self.edits.iter()
    }

    /// Total change in document length, in characters
    pub fn char_shift(&self) -> i64 {
        self.edits
            .iter()
            .map(|e| e.replacement.chars().count() as i64 - e.region.len() as i64)
            .sum()
    }
}

impl<'a> IntoIterator for &'a EditSet {
    type Item = &'a Edit;
    type IntoIter = std::slice::Iter<'a, Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

/// Sort edits by region start in descending order for sequential application
///
/// Applying from the end of the document backwards keeps the offsets of the
/// remaining edits valid: a replacement never moves text before it. Edits
/// sharing a start are ordered by end descending, so a replacement runs
/// before an insertion at the same offset; identical regions keep input order
/// in the final text.
///
/// # Example
/// ```
/// use uri_tools::{Edit, Region, sort_edits_descending};
/// let edits = vec![
///     Edit { region: Region::new(10, 20), replacement: "a".to_string() },
///     Edit { region: Region::new(50, 60), replacement: "b".to_string() },
///     Edit { region: Region::new(30, 40), replacement: "c".to_string() },
/// ];
/// let sorted = sort_edits_descending(&edits);
/// assert_eq!(sorted[0].region.start, 50);
/// assert_eq!(sorted[1].region.start, 30);
/// assert_eq!(sorted[2].region.start, 10);
/// ```
pub fn sort_edits_descending(edits: &[Edit]) -> Vec<Edit> {
    let mut indexed: Vec<(usize, &Edit)> = edits.iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        b.region
            .start
            .cmp(&a.region.start)
            .then(b.region.end.cmp(&a.region.end))
            .then(ib.cmp(ia))
    });
    indexed.into_iter().map(|(_, edit)| edit.clone()).collect()
}

/// Verify that document content matches the expected checksum
///
/// # Returns
/// * `Ok(())` if checksums match
/// * `Err(EditError::ChecksumMismatch)` if they don't
pub fn verify_checksum(content: &str, expected_checksum: &str) -> Result<(), EditError> {
    let actual_checksum = blake3::hash(content.as_bytes()).to_hex().to_string();

    if actual_checksum == expected_checksum {
        Ok(())
    } else {
        Err(EditError::ChecksumMismatch {
            expected: expected_checksum.to_string(),
            actual: actual_checksum,
        })
    }
}

/// Apply a whole EditSet to `content`
///
/// This function:
/// 1. Verifies `content` is the document the EditSet was computed against
/// 2. Rejects EditSets whose regions overlap
/// 3. Replaces each region, highest offset first, so every region is
///    resolved against the original offsets
///
/// Nothing is written unless every step succeeds.
///
/// # Returns
/// * `Ok(String)` - New content after all edits
/// * `Err(EditError)` - Checksum mismatch or overlapping regions
pub fn apply_edit_set(content: &str, edit_set: &EditSet) -> Result<String, EditError> {
    verify_checksum(content, &edit_set.checksum)?;

    let sorted = sort_edits_descending(&edit_set.edits);

    for pair in sorted.windows(2) {
        let (later, earlier) = (&pair[0], &pair[1]);
        if earlier.region.overlaps(&later.region) {
            return Err(EditError::Overlapping {
                first_start: earlier.region.start,
                first_end: earlier.region.end,
                second_start: later.region.start,
                second_end: later.region.end,
            });
        }
    }

    let mut new_content = content.to_string();
    for edit in &sorted {
        let byte_start = char_to_byte(&new_content, edit.region.start);
        let byte_end = char_to_byte(&new_content, edit.region.end).max(byte_start);
        new_content.replace_range(byte_start..byte_end, &edit.replacement);
    }

    Ok(new_content)
}
