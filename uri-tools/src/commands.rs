//! Host commands: identifiers bound to handlers that move text between the
//! host and the codec.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::codec::{Codec, Strategy, decode_detailed, encode};
use crate::edit::EditSet;
use crate::error::{CodecError, CommandError};
use crate::region::{Region, apply_to_regions};

/// Where a command reads its text from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Selection,
    Document,
    Clipboard,
}

/// Built-in command identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    EncodeSelection,
    DecodeSelection,
    EncodeDocument,
    DecodeDocument,
    EncodeClipboard,
    DecodeClipboard,
}

impl CommandId {
    pub const ALL: [CommandId; 6] = [
        CommandId::EncodeSelection,
        CommandId::DecodeSelection,
        CommandId::EncodeDocument,
        CommandId::DecodeDocument,
        CommandId::EncodeClipboard,
        CommandId::DecodeClipboard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandId::EncodeSelection => "uri-tools.encodeSelection",
            CommandId::DecodeSelection => "uri-tools.decodeSelection",
            CommandId::EncodeDocument => "uri-tools.encodeDocument",
            CommandId::DecodeDocument => "uri-tools.decodeDocument",
            CommandId::EncodeClipboard => "uri-tools.encodeClipboard",
            CommandId::DecodeClipboard => "uri-tools.decodeClipboard",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == id)
    }

    pub fn codec(&self) -> Codec {
        match self {
            CommandId::EncodeSelection | CommandId::EncodeDocument | CommandId::EncodeClipboard => {
                Codec::Encode
            }
            CommandId::DecodeSelection | CommandId::DecodeDocument | CommandId::DecodeClipboard => {
                Codec::Decode
            }
        }
    }

    pub fn target(&self) -> Target {
        match self {
            CommandId::EncodeSelection | CommandId::DecodeSelection => Target::Selection,
            CommandId::EncodeDocument | CommandId::DecodeDocument => Target::Document,
            CommandId::EncodeClipboard | CommandId::DecodeClipboard => Target::Clipboard,
        }
    }

    /// Status bar text shown after the command succeeds
    pub fn success_message(&self) -> &'static str {
        match (self.target(), self.codec()) {
            (Target::Clipboard, Codec::Encode) => "URI Tools: Clipboard encoded ✅",
            (Target::Clipboard, Codec::Decode) => "URI Tools: Clipboard decoded ✅",
            (_, Codec::Encode) => "URI Tools: Encoded ✅",
            (_, Codec::Decode) => "URI Tools: Decoded ✅",
        }
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the host's active document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDocument {
    pub text: String,
    pub selections: Vec<Region>,
}

/// Editor-side collaborator the commands read from and write to
pub trait Host {
    /// Active document, or `None` when no editor is focused
    fn active_document(&self) -> Option<ActiveDocument>;

    /// Materialize `edits` as one transaction
    fn apply(&mut self, edits: EditSet) -> Result<(), CommandError>;

    fn read_clipboard(&mut self) -> Result<String, CommandError>;

    fn write_clipboard(&mut self, text: &str) -> Result<(), CommandError>;

    fn show_status(&mut self, message: &str);

    fn show_error(&mut self, message: &str);
}

/// What a successful command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Edits were handed to the host
    Applied { edits: usize },
    /// Clipboard text was replaced
    Clipboard,
    /// Nothing to do: no active document
    NoActiveDocument,
}

pub type Handler = Box<dyn Fn(&mut dyn Host) -> Result<Outcome, CommandError>>;

fn run_codec(codec: Codec, text: &str) -> Result<String, CodecError> {
    match codec {
        Codec::Encode => Ok(encode(text)),
        Codec::Decode => {
            let decoded = decode_detailed(text)?;
            if decoded.strategy != Strategy::Component {
                debug!("strict decode rejected input, used {} strategy", decoded.strategy);
            }
            Ok(decoded.text)
        }
    }
}

/// Transform the selections of the active document, or the whole document
/// when nothing is selected
pub fn transform_active_document(
    host: &mut dyn Host,
    codec: Codec,
) -> Result<Outcome, CommandError> {
    let Some(document) = host.active_document() else {
        debug!("no active document, skipping {}", codec.name());
        return Ok(Outcome::NoActiveDocument);
    };

    let edits = apply_to_regions(document.text.as_str(), &document.selections, |text| {
        run_codec(codec, text)
    })?;
    let count = edits.len();
    host.apply(edits)?;

    debug!("{} applied to {} region(s)", codec.name(), count);
    Ok(Outcome::Applied { edits: count })
}

/// Replace the clipboard text with its transformed form
pub fn transform_clipboard(host: &mut dyn Host, codec: Codec) -> Result<Outcome, CommandError> {
    let text = host.read_clipboard()?;
    let output = run_codec(codec, &text)?;
    host.write_clipboard(&output)?;
    Ok(Outcome::Clipboard)
}

fn builtin_handler(id: CommandId) -> Handler {
    Box::new(move |host: &mut dyn Host| {
        let outcome = match id.target() {
            Target::Selection | Target::Document => transform_active_document(host, id.codec())?,
            Target::Clipboard => transform_clipboard(host, id.codec())?,
        };
        if outcome != Outcome::NoActiveDocument {
            host.show_status(id.success_message());
        }
        Ok(outcome)
    })
}

/// Mapping from command identifier to handler
#[derive(Default)]
pub struct CommandRegistry {
    handlers: BTreeMap<String, Handler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every [`CommandId`] bound to its built-in handler
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for id in CommandId::ALL {
            registry.register(id.as_str(), builtin_handler(id));
        }
        registry
    }

    /// Bind `id` to `handler`, replacing any previous binding
    pub fn register(&mut self, id: impl Into<String>, handler: Handler) {
        let id = id.into();
        if self.handlers.insert(id.clone(), handler).is_some() {
            warn!("command {} re-registered", id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Run the handler bound to `id`.
    ///
    /// Failures are reported to the host through `show_error` and returned;
    /// the host is left unmodified.
    pub fn execute(&self, id: &str, host: &mut dyn Host) -> Result<Outcome, CommandError> {
        let result = match self.handlers.get(id) {
            Some(handler) => {
                info!("running {}", id);
                handler(host)
            }
            None => Err(CommandError::UnknownCommand(id.to_string())),
        };

        if let Err(e) = &result {
            host.show_error(&e.to_string());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::apply_edit_set;

    #[derive(Default)]
    struct MockHost {
        document: Option<ActiveDocument>,
        clipboard: String,
        statuses: Vec<String>,
        errors: Vec<String>,
        applied: Vec<EditSet>,
        clipboard_unavailable: bool,
    }

    impl MockHost {
        fn with_document(text: &str, selections: Vec<Region>) -> Self {
            Self {
                document: Some(ActiveDocument {
                    text: text.to_string(),
                    selections,
                }),
                ..Self::default()
            }
        }

        fn text(&self) -> &str {
            self.document.as_ref().map(|d| d.text.as_str()).unwrap_or("")
        }
    }

    impl Host for MockHost {
        fn active_document(&self) -> Option<ActiveDocument> {
            self.document.clone()
        }

        fn apply(&mut self, edits: EditSet) -> Result<(), CommandError> {
            if let Some(document) = self.document.as_mut() {
                document.text = apply_edit_set(&document.text, &edits)?;
            }
            self.applied.push(edits);
            Ok(())
        }

        fn read_clipboard(&mut self) -> Result<String, CommandError> {
            if self.clipboard_unavailable {
                return Err(CommandError::Host("clipboard unavailable".to_string()));
            }
            Ok(self.clipboard.clone())
        }

        fn write_clipboard(&mut self, text: &str) -> Result<(), CommandError> {
            self.clipboard = text.to_string();
            Ok(())
        }

        fn show_status(&mut self, message: &str) {
            self.statuses.push(message.to_string());
        }

        fn show_error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }
    }

    #[test]
    fn test_command_id_parse() {
        for id in CommandId::ALL {
            assert_eq!(CommandId::parse(id.as_str()), Some(id));
        }
        assert_eq!(CommandId::parse("uri-tools.unknown"), None);
    }

    #[test]
    fn test_defaults_register_all_commands() {
        let registry = CommandRegistry::with_defaults();
        assert_eq!(registry.ids().count(), 6);
        assert!(registry.contains("uri-tools.decodeClipboard"));
    }

    #[test]
    fn test_encode_selection() {
        let registry = CommandRegistry::with_defaults();
        let mut host = MockHost::with_document("a b c d", vec![Region::new(0, 3)]);

        let outcome = registry.execute("uri-tools.encodeSelection", &mut host).unwrap();

        assert_eq!(outcome, Outcome::Applied { edits: 1 });
        assert_eq!(host.text(), "a%20b c d");
        assert_eq!(host.statuses, vec!["URI Tools: Encoded ✅"]);
        assert!(host.errors.is_empty());
    }

    #[test]
    fn test_decode_document_without_selection() {
        let registry = CommandRegistry::with_defaults();
        let mut host = MockHost::with_document("a%20b%2Fc", vec![]);

        registry.execute("uri-tools.decodeDocument", &mut host).unwrap();

        assert_eq!(host.text(), "a b/c");
        assert_eq!(host.statuses, vec!["URI Tools: Decoded ✅"]);
    }

    #[test]
    fn test_failed_decode_leaves_document_untouched() {
        let registry = CommandRegistry::with_defaults();
        let mut host =
            MockHost::with_document("a%20b %FF", vec![Region::new(0, 5), Region::new(6, 9)]);

        let result = registry.execute("uri-tools.decodeSelection", &mut host);

        assert!(matches!(result, Err(CommandError::Codec(CodecError::Decoding(_)))));
        assert_eq!(host.text(), "a%20b %FF");
        assert!(host.applied.is_empty());
        assert!(host.statuses.is_empty());
        assert_eq!(host.errors.len(), 1);
        assert!(host.errors[0].starts_with("Failed to decode text:"));
    }

    #[test]
    fn test_no_active_document() {
        let registry = CommandRegistry::with_defaults();
        let mut host = MockHost::default();

        let outcome = registry.execute("uri-tools.encodeDocument", &mut host).unwrap();

        assert_eq!(outcome, Outcome::NoActiveDocument);
        assert!(host.statuses.is_empty());
        assert!(host.errors.is_empty());
    }

    #[test]
    fn test_clipboard_round_trip() {
        let registry = CommandRegistry::with_defaults();
        let mut host = MockHost {
            clipboard: "q=a b&c".to_string(),
            ..MockHost::default()
        };

        registry.execute("uri-tools.encodeClipboard", &mut host).unwrap();
        assert_eq!(host.clipboard, "q%3Da%20b%26c");

        registry.execute("uri-tools.decodeClipboard", &mut host).unwrap();
        assert_eq!(host.clipboard, "q=a b&c");
        assert_eq!(
            host.statuses,
            vec!["URI Tools: Clipboard encoded ✅", "URI Tools: Clipboard decoded ✅"]
        );
    }

    #[test]
    fn test_clipboard_read_failure_reported() {
        let registry = CommandRegistry::with_defaults();
        let mut host = MockHost {
            clipboard: "a b".to_string(),
            clipboard_unavailable: true,
            ..MockHost::default()
        };

        let result = registry.execute("uri-tools.encodeClipboard", &mut host);

        assert!(matches!(result, Err(CommandError::Host(_))));
        assert_eq!(host.clipboard, "a b");
        assert!(host.statuses.is_empty());
        assert_eq!(host.errors, vec!["clipboard unavailable"]);
    }

    #[test]
    fn test_unknown_command_reports_error() {
        let registry = CommandRegistry::with_defaults();
        let mut host = MockHost::default();

        let result = registry.execute("uri-tools.nope", &mut host);

        assert!(matches!(result, Err(CommandError::UnknownCommand(_))));
        assert_eq!(host.errors, vec!["Unknown command: uri-tools.nope"]);
    }

    #[test]
    fn test_register_custom_handler() {
        let mut registry = CommandRegistry::new();
        registry.register(
            "custom.upper",
            Box::new(|host: &mut dyn Host| {
                let text = host.read_clipboard()?;
                host.write_clipboard(&text.to_uppercase())?;
                Ok(Outcome::Clipboard)
            }),
        );
        let mut host = MockHost {
            clipboard: "abc".to_string(),
            ..MockHost::default()
        };

        registry.execute("custom.upper", &mut host).unwrap();
        assert_eq!(host.clipboard, "ABC");
    }
}
