use serde::{Deserialize, Serialize};

use crate::region::Region;

/// Position in a text document (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
}

/// Convert a character offset to a byte offset
///
/// # Returns
/// * The byte offset of the `char_offset`-th character
/// * `content.len()` if the offset is at or past the end
pub fn char_to_byte(content: &str, char_offset: usize) -> usize {
    content
        .char_indices()
        .nth(char_offset)
        .map_or(content.len(), |(byte, _)| byte)
}

/// Convert a character offset to line and column position
///
/// Offsets past the end are clamped to the end of the content.
pub fn char_to_position(content: &str, char_offset: usize) -> Position {
    let mut line = 1;
    let mut column = 1;

    for ch in content.chars().take(char_offset) {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    Position { line, column }
}

/// Convert a region to start and end positions
pub fn region_to_positions(content: &str, region: Region) -> (Position, Position) {
    let start = char_to_position(content, region.start);
    let end = char_to_position(content, region.end);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_to_byte_multibyte() {
        let content = "añb€c";
        assert_eq!(char_to_byte(content, 0), 0);
        assert_eq!(char_to_byte(content, 2), 3);
        assert_eq!(char_to_byte(content, 4), 7);
        assert_eq!(char_to_byte(content, 5), content.len());
        assert_eq!(char_to_byte(content, 99), content.len());
    }

    #[test]
    fn test_char_to_position_start() {
        let pos = char_to_position("Hello\nWorld", 0);
        assert_eq!(pos, Position { line: 1, column: 1 });
    }

    #[test]
    fn test_char_to_position_after_newline() {
        // Offset 6 is right after '\n'
        let pos = char_to_position("Hello\nWorld", 6);
        assert_eq!(pos, Position { line: 2, column: 1 });
    }

    #[test]
    fn test_char_to_position_counts_characters() {
        let pos = char_to_position("ñandú\nx", 4);
        assert_eq!(pos, Position { line: 1, column: 5 });
    }

    #[test]
    fn test_region_to_positions() {
        let (start, end) = region_to_positions("Hello\nWorld", Region::new(3, 8));
        assert_eq!(start, Position { line: 1, column: 4 });
        assert_eq!(end, Position { line: 2, column: 3 });
    }
}
