// Percent-encoding transforms
pub mod codec;

// Error types
pub mod error;

// Regions, documents and region selection policy
pub mod region;

// Character offset to position conversion
pub mod position;

// EditSet and its application
pub mod edit;

// Host commands
pub mod commands;

// JSON output module
pub mod json;

// Re-exports
pub use codec::{Codec, Decoded, Strategy, decode, decode_detailed, encode, encode_utf16};
pub use error::{CodecError, CommandError, EditError, ParseRegionError};
pub use region::{Document, Region, apply_to_regions};
pub use position::{Position, char_to_byte, char_to_position, region_to_positions};
pub use edit::{Edit, EditSet, apply_edit_set, sort_edits_descending, verify_checksum};
pub use commands::{ActiveDocument, CommandId, CommandRegistry, Handler, Host, Outcome, Target};
pub use json::{CommandResponse, EditJson, generate_execution_id};
