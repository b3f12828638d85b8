use clap::{Parser, Subcommand};
use log::{debug, info};
use std::io::{self, Read};
use uri_tools::{
    ActiveDocument, CommandError, CommandId, CommandRegistry, CommandResponse, EditJson, EditSet,
    Host, Region, apply_edit_set, generate_execution_id,
};

/// Percent-encode and decode URI text read from stdin
#[derive(Parser, Debug)]
#[command(name = "uri-tools")]
#[command(version = "0.1.0")]
#[command(about = "Encode/decode percent-escaped URI text", long_about = None)]
struct Args {
    #[command(subcommand)]
    action: Action,

    /// Output structured JSON instead of the transformed text
    #[arg(short, long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Encode selected regions of the input (whole input when none selected)
    Encode {
        /// Character range to transform, repeatable
        #[arg(short, long = "select", value_name = "START..END")]
        select: Vec<Region>,
    },
    /// Decode selected regions of the input (whole input when none selected)
    Decode {
        /// Character range to transform, repeatable
        #[arg(short, long = "select", value_name = "START..END")]
        select: Vec<Region>,
    },
    /// Encode the input as a single string
    EncodeClipboard,
    /// Decode the input as a single string
    DecodeClipboard,
}

impl Action {
    fn command_id(&self) -> CommandId {
        match self {
            Action::Encode { select } if !select.is_empty() => CommandId::EncodeSelection,
            Action::Encode { .. } => CommandId::EncodeDocument,
            Action::Decode { select } if !select.is_empty() => CommandId::DecodeSelection,
            Action::Decode { .. } => CommandId::DecodeDocument,
            Action::EncodeClipboard => CommandId::EncodeClipboard,
            Action::DecodeClipboard => CommandId::DecodeClipboard,
        }
    }

    fn selections(&self) -> Vec<Region> {
        match self {
            Action::Encode { select } | Action::Decode { select } => select.clone(),
            Action::EncodeClipboard | Action::DecodeClipboard => Vec::new(),
        }
    }
}

/// Host backed by stdin/stdout: stdin is both the document and the clipboard
struct CliHost {
    input: String,
    selections: Vec<Region>,
    output: Option<String>,
    applied: Option<EditSet>,
    error: Option<String>,
}

impl CliHost {
    fn new(input: String, selections: Vec<Region>) -> Self {
        Self {
            input,
            selections,
            output: None,
            applied: None,
            error: None,
        }
    }
}

impl Host for CliHost {
    fn active_document(&self) -> Option<ActiveDocument> {
        Some(ActiveDocument {
            text: self.input.clone(),
            selections: self.selections.clone(),
        })
    }

    fn apply(&mut self, edits: EditSet) -> Result<(), CommandError> {
        self.output = Some(apply_edit_set(&self.input, &edits)?);
        self.applied = Some(edits);
        Ok(())
    }

    fn read_clipboard(&mut self) -> Result<String, CommandError> {
        Ok(self.input.clone())
    }

    fn write_clipboard(&mut self, text: &str) -> Result<(), CommandError> {
        self.output = Some(text.to_string());
        Ok(())
    }

    fn show_status(&mut self, message: &str) {
        info!("{}", message);
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }
}

fn read_stdin() -> io::Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let input = match read_stdin() {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            std::process::exit(1);
        }
    };

    let command = args.action.command_id();
    let execution_id = generate_execution_id();
    debug!("execution {} running {}", execution_id, command);

    let registry = CommandRegistry::with_defaults();
    let mut host = CliHost::new(input, args.action.selections());

    let response = match registry.execute(command.as_str(), &mut host) {
        Ok(_) => {
            let output = host.output.take().unwrap_or_else(|| host.input.clone());
            let (checksum, edits, char_shift) = match &host.applied {
                Some(applied) => (
                    Some(applied.checksum.clone()),
                    EditJson::from_edit_set(&host.input, applied),
                    applied.char_shift(),
                ),
                None => (
                    None,
                    Vec::new(),
                    output.chars().count() as i64 - host.input.chars().count() as i64,
                ),
            };
            CommandResponse::success(
                execution_id,
                command.to_string(),
                checksum,
                edits,
                char_shift,
                output,
            )
        }
        Err(e) => CommandResponse::failure(
            execution_id,
            command.to_string(),
            host.error.take().unwrap_or_else(|| e.to_string()),
        ),
    };

    output_response(&response, args.json);

    if !response.success {
        std::process::exit(1);
    }
}

/// Format and output the response
fn output_response(response: &CommandResponse, json_mode: bool) {
    if json_mode {
        let output = serde_json::to_string_pretty(response).unwrap_or_else(|_| {
            r#"{"error": "Failed to serialize response"}"#.to_string()
        });
        println!("{}", output);
    } else if response.success {
        print!("{}", response.output.as_deref().unwrap_or(""));
    } else {
        eprintln!("Error: {}", response.error.as_deref().unwrap_or("Unknown error"));
    }
}
