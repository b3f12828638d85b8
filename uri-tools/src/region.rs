use std::str::FromStr;

use crate::edit::{Edit, EditSet};
use crate::error::ParseRegionError;
use crate::position::char_to_byte;

/// Half-open character span `[start, end)` of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region {
    /// Starting character offset (inclusive)
    pub start: usize,
    /// Ending character offset (exclusive)
    pub end: usize,
}

impl Region {
    /// Create a region from two offsets in either order.
    ///
    /// Editor selections keep their anchor where the drag began, so the
    /// anchor may sit after the head.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self {
            start: anchor.min(head),
            end: anchor.max(head),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clamp both offsets to a document of `char_len` characters
    pub fn clamp(&self, char_len: usize) -> Self {
        Self {
            start: self.start.min(char_len),
            end: self.end.min(char_len),
        }
    }

    pub fn overlaps(&self, other: &Region) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl FromStr for Region {
    type Err = ParseRegionError;

    /// Parse `START..END`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once("..")
            .ok_or_else(|| ParseRegionError::MissingSeparator(s.to_string()))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| ParseRegionError::InvalidOffset(part.to_string()))
        };
        Ok(Region::new(parse(start)?, parse(end)?))
    }
}

/// Read access to the text of a document, addressed by character offsets
pub trait Document {
    /// Length of the document in characters
    fn char_len(&self) -> usize;

    /// Text covered by `region`, clamped to the document
    fn text(&self, region: Region) -> String;

    /// Region spanning the whole document
    fn full_region(&self) -> Region {
        Region::new(0, self.char_len())
    }

    /// BLAKE3 checksum (hex) of the whole document
    fn checksum(&self) -> String {
        blake3::hash(self.text(self.full_region()).as_bytes())
            .to_hex()
            .to_string()
    }
}

impl Document for str {
    fn char_len(&self) -> usize {
        self.chars().count()
    }

    fn text(&self, region: Region) -> String {
        let start = char_to_byte(self, region.start);
        let end = char_to_byte(self, region.end).max(start);
        self[start..end].to_string()
    }

    fn checksum(&self) -> String {
        blake3::hash(self.as_bytes()).to_hex().to_string()
    }
}

impl Document for String {
    fn char_len(&self) -> usize {
        self.as_str().char_len()
    }

    fn text(&self, region: Region) -> String {
        self.as_str().text(region)
    }

    fn checksum(&self) -> String {
        self.as_str().checksum()
    }
}

/// Run `transform` over the selected regions of `document`.
///
/// Non-empty regions are transformed independently, in input order; empty
/// regions are skipped. When no region carries content the whole document
/// is transformed as one implicit region. Offsets of every edit refer to the
/// original document.
///
/// # Returns
/// * `Ok(EditSet)` - One edit per transformed region
/// * `Err(E)` - The first transform failure; no edits are produced
///
/// # Example
/// ```
/// use uri_tools::{apply_to_regions, Codec, Region};
/// let edits = apply_to_regions("a b", &[], |t| Codec::Encode.apply(t)).unwrap();
/// assert_eq!(edits.edits[0].region, Region::new(0, 3));
/// assert_eq!(edits.edits[0].replacement, "a%20b");
/// ```
pub fn apply_to_regions<D, F, E>(
    document: &D,
    regions: &[Region],
    mut transform: F,
) -> Result<EditSet, E>
where
    D: Document + ?Sized,
    F: FnMut(&str) -> Result<String, E>,
{
    let char_len = document.char_len();
    let selected: Vec<Region> = regions
        .iter()
        .map(|region| region.clamp(char_len))
        .filter(|region| !region.is_empty())
        .collect();

    let targets = if selected.is_empty() {
        vec![document.full_region()]
    } else {
        selected
    };

    let edits = targets
        .into_iter()
        .map(|region| -> Result<Edit, E> {
            let replacement = transform(&document.text(region))?;
            Ok(Edit { region, replacement })
        })
        .collect::<Result<Vec<_>, E>>()?;

    Ok(EditSet::new(document.checksum(), edits))
}
