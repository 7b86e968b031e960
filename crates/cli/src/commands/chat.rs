//! Chat command handler.

use clap::Args;
use qna_chat::RagChat;
use qna_core::{AppConfig, AppResult};
use qna_llm::{AzureChatClient, AzureEmbeddingClient};
use qna_search::{AzureSearchBackend, DocumentRetriever};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Chat with the document index
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// The question to ask; prompts interactively when omitted
    pub query: Option<String>,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut chat = build_session(config);

        match &self.query {
            Some(query) => {
                let answer = chat.respond(query).await?;
                println!("{}", answer);
                Ok(())
            }
            None => interactive_loop(&mut chat).await,
        }
    }
}

fn build_session(config: &AppConfig) -> RagChat {
    let backend = Arc::new(AzureSearchBackend::from_config(config));
    let embedder = Arc::new(AzureEmbeddingClient::from_config(config));
    let retriever = DocumentRetriever::new(backend, embedder);
    let llm = Arc::new(AzureChatClient::from_config(config));

    RagChat::new(retriever, llm)
}

/// Read questions from stdin until EOF or an exit word. The whole loop
/// shares one session, so follow-up questions see earlier turns.
async fn interactive_loop(chat: &mut RagChat) -> AppResult<()> {
    eprintln!("Ask about your enterprise documents (exit to quit).");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        eprint!("> ");
        io::stderr().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let question = line.trim();

        if question.is_empty() {
            continue;
        }
        if question == "exit" || question == "quit" {
            break;
        }

        let answer = chat.respond(question).await?;
        println!("{}", answer);
    }

    Ok(())
}
