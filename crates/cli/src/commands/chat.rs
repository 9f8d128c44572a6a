//! `gchat chat`: Interactive session.
//!
//! Plain lines are prompts. Lines starting with `/` adjust the request
//! inputs kept between turns.

use std::io::Write;
use std::path::PathBuf;

use gchat_core::prompt::RequestBundle;
use gchat_core::session::SessionContext;
use gchat_documents::{LoadedDocument, load_document};
use tokio::io::{self, AsyncBufReadExt, BufReader};

use super::{build_service, describe_speech, load_config, print_outcome};

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Prompt(String),
    /// Submit the current inputs with an empty prompt.
    Send,
    System(Option<String>),
    Memory(Option<String>),
    File {
        path: PathBuf,
        content_type: Option<String>,
    },
    Unfile,
    Show,
    Speak,
    Reset,
    Help,
    Exit,
    Unknown(String),
    Empty,
}

fn non_empty(rest: &str) -> Option<String> {
    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

/// Commands are recognized on the trimmed line; prompts are passed on verbatim.
fn parse_line(line: &str) -> ReplCommand {
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let trimmed = line.trim();
    if matches!(trimmed, "exit" | "quit" | "/exit" | "/quit") {
        return ReplCommand::Exit;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return ReplCommand::Prompt(line.to_string());
    };

    let (name, rest) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
    match name {
        "send" => ReplCommand::Send,
        "system" => ReplCommand::System(non_empty(rest)),
        "memory" => ReplCommand::Memory(non_empty(rest)),
        "file" => {
            let mut parts = rest.split_whitespace();
            match parts.next() {
                Some(path) => ReplCommand::File {
                    path: PathBuf::from(path),
                    content_type: parts.next().map(String::from),
                },
                None => ReplCommand::Unknown("/file needs a path".into()),
            }
        }
        "unfile" => ReplCommand::Unfile,
        "show" => ReplCommand::Show,
        "speak" => ReplCommand::Speak,
        "reset" => ReplCommand::Reset,
        "help" => ReplCommand::Help,
        other => ReplCommand::Unknown(format!("unknown command /{other}")),
    }
}

/// Inputs carried from one turn to the next.
#[derive(Default)]
struct Inputs {
    system: Option<String>,
    memory: Option<String>,
    document: Option<LoadedDocument>,
}

impl Inputs {
    fn bundle(&self, prompt: String) -> RequestBundle {
        RequestBundle {
            system_instructions: self.system.clone(),
            memory_text: self.memory.clone(),
            document_text: self.document.as_ref().map(|d| d.text.clone()),
            user_prompt: prompt,
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

fn print_help() {
    println!("  /system <text>        set system instructions (empty clears)");
    println!("  /memory <text>        set short-term memory (empty clears)");
    println!("  /file <path> [type]   attach a .txt or .pdf document");
    println!("  /unfile               detach the document");
    println!("  /send                 submit with the document and no prompt");
    println!("  /show                 show the current inputs and last reply");
    println!("  /speak                speak the last reply");
    println!("  /reset                clear the last reply and all inputs");
    println!("  exit                  quit");
}

fn prompt_marker() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

pub async fn run(system: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let service = build_service(&config)?;

    let mut session = SessionContext::new();
    let mut inputs = Inputs {
        system,
        ..Inputs::default()
    };

    println!();
    println!("  GChat — Interactive Mode");
    println!();
    println!("  Provider:  {}", service.client().provider_name());
    println!("  Model:     {}", service.client().model());
    println!("  Speech:    {}", service.speech_backend().unwrap_or("none"));
    println!();
    println!("  Type your message and press Enter. /help lists commands.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();
    prompt_marker()?;

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Exit => break,
            ReplCommand::Prompt(text) => {
                let outcome = service.submit(&mut session, &inputs.bundle(text)).await;
                print_outcome(&outcome);
            }
            ReplCommand::Send => {
                let outcome = service.submit(&mut session, &inputs.bundle(String::new())).await;
                print_outcome(&outcome);
            }
            ReplCommand::System(text) => {
                inputs.system = text;
                println!("  System instructions {}", if inputs.system.is_some() { "set" } else { "cleared" });
            }
            ReplCommand::Memory(text) => {
                inputs.memory = text;
                println!("  Memory {}", if inputs.memory.is_some() { "set" } else { "cleared" });
            }
            ReplCommand::File { path, content_type } => {
                match load_document(&path, content_type.as_deref()).await {
                    Ok(doc) => {
                        println!("  Attached {} ({}, {} chars)", doc.name, doc.kind.mime(), doc.text.len());
                        inputs.document = Some(doc);
                    }
                    // The previous document, if any, stays attached.
                    Err(e) => eprintln!("  [Error] {e}"),
                }
            }
            ReplCommand::Unfile => {
                inputs.document = None;
                println!("  Document detached");
            }
            ReplCommand::Show => {
                println!("  Session:   {}", session.id);
                println!("  System:    {}", inputs.system.as_deref().unwrap_or("-"));
                println!("  Memory:    {}", inputs.memory.as_deref().unwrap_or("-"));
                println!(
                    "  Document:  {}",
                    inputs.document.as_ref().map(|d| d.name.as_str()).unwrap_or("-")
                );
                println!("  Replies:   {}", session.replies);
                match session.last_reply() {
                    Some(reply) => {
                        println!("  Last reply:");
                        for line in reply.lines() {
                            println!("    {line}");
                        }
                    }
                    None => println!("  Last reply: -"),
                }
            }
            ReplCommand::Speak => match service.speak(&session).await {
                Ok(output) => println!("  🔊 {}", describe_speech(&output)),
                Err(e) => eprintln!("  [Speech Error] {e}"),
            },
            ReplCommand::Reset => {
                session.reset();
                inputs.clear();
                println!("  Session reset");
            }
            ReplCommand::Help => print_help(),
            ReplCommand::Unknown(msg) => eprintln!("  {msg} (try /help)"),
        }

        prompt_marker()?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gchat_documents::ContentKind;

    #[test]
    fn plain_lines_are_prompts() {
        assert_eq!(parse_line("hello there"), ReplCommand::Prompt("hello there".into()));
        assert_eq!(parse_line(""), ReplCommand::Empty);
        assert_eq!(parse_line("  exit "), ReplCommand::Exit);
    }

    #[test]
    fn prompts_are_not_trimmed() {
        assert_eq!(parse_line("  hello there "), ReplCommand::Prompt("  hello there ".into()));
        assert_eq!(parse_line("   "), ReplCommand::Prompt("   ".into()));
        assert_eq!(Inputs::default().bundle("   ".into()).combined_prompt(), "\n\n   ");
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_line("/system be terse"), ReplCommand::System(Some("be terse".into())));
        assert_eq!(parse_line("/system"), ReplCommand::System(None));
        assert_eq!(parse_line("/memory  user likes tea "), ReplCommand::Memory(Some("user likes tea".into())));
        assert_eq!(
            parse_line("/file notes.pdf application/pdf"),
            ReplCommand::File {
                path: PathBuf::from("notes.pdf"),
                content_type: Some("application/pdf".into()),
            }
        );
        assert_eq!(parse_line("/reset"), ReplCommand::Reset);
        assert_eq!(parse_line("/send"), ReplCommand::Send);
        assert!(matches!(parse_line("/file"), ReplCommand::Unknown(_)));
        assert!(matches!(parse_line("/bogus"), ReplCommand::Unknown(_)));
    }

    #[test]
    fn inputs_build_bundle() {
        let inputs = Inputs {
            system: Some("sys".into()),
            memory: Some("notes".into()),
            document: Some(LoadedDocument {
                name: "a.txt".into(),
                kind: ContentKind::PlainText,
                text: "doc".into(),
            }),
        };
        let bundle = inputs.bundle("q".into());
        assert_eq!(bundle.combined_prompt(), "notes\ndoc\nq");
        assert_eq!(bundle.system_instructions.as_deref(), Some("sys"));
    }

    #[test]
    fn clear_drops_everything() {
        let mut inputs = Inputs {
            system: Some("sys".into()),
            memory: Some("m".into()),
            document: None,
        };
        inputs.clear();
        assert!(inputs.system.is_none() && inputs.memory.is_none() && inputs.document.is_none());
    }
}
