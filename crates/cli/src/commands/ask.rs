//! `gchat ask`: One submission from the command line.

use std::path::PathBuf;

use gchat_core::prompt::RequestBundle;
use gchat_core::session::SessionContext;
use gchat_documents::load_document;

use super::{build_service, describe_speech, exit_code, load_config, print_outcome};

pub struct AskArgs {
    pub prompt: Option<String>,
    pub system: Option<String>,
    pub memory: Option<String>,
    pub file: Option<PathBuf>,
    pub content_type: Option<String>,
    pub speak: bool,
}

impl AskArgs {
    fn bundle(&self, document_text: Option<String>) -> RequestBundle {
        RequestBundle {
            system_instructions: self.system.clone(),
            memory_text: self.memory.clone(),
            document_text,
            user_prompt: self.prompt.clone().unwrap_or_default(),
        }
    }
}

pub async fn run(args: AskArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let service = build_service(&config)?;

    let document_text = match &args.file {
        Some(path) => match load_document(path, args.content_type.as_deref()).await {
            Ok(doc) => {
                eprintln!("  Loaded {} ({}, {} chars)", doc.name, doc.kind.mime(), doc.text.len());
                Some(doc.text)
            }
            Err(e) => {
                eprintln!("  [Error] {e}");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let mut session = SessionContext::new();
    let outcome = service.submit(&mut session, &args.bundle(document_text)).await;
    print_outcome(&outcome);

    // Already reported above; only the status is left to set.
    let code = exit_code(&outcome);
    if code != 0 {
        std::process::exit(code);
    }

    if args.speak && session.last_reply().is_some() {
        match service.speak(&session).await {
            Ok(output) => eprintln!("  🔊 {}", describe_speech(&output)),
            Err(e) => eprintln!("  [Speech Error] {e}"),
        }
    }

    Ok(())
}
