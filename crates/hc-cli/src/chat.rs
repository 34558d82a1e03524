//! Interactive help-center chat with readline support.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::debug;

use hc_agents::AnswerService;

use crate::interface::ReadlineInterface;

pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "What is SEAMEO SPAFA?",
    "What programs are available?",
    "How to join research activities?",
    "When is the next archaeology workshop?",
    "Where is SEAMEO SPAFA office located?",
    "What are the latest publications?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

/// Render a pipeline failure for the chat log.
pub fn format_error(error: &str) -> String {
    format!(
        "❌ **An error occurred while processing your question.**\n\n\
         **Error Details:** {}\n\n\
         Please try again or contact the administrator if the problem persists.",
        error
    )
}

/// Chat session state: an append-only message log in front of the pipeline.
pub struct ChatSession {
    service: Arc<dyn AnswerService>,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(service: Arc<dyn AnswerService>) -> Self {
        Self {
            service,
            messages: Vec::new(),
        }
    }

    /// Log the question, answer it, log and return the reply.
    pub async fn ask(&mut self, question: &str) -> &ChatMessage {
        self.push(ChatRole::User, question.to_string());

        let validation = self.service.validate(question);
        let reply = if !validation.valid {
            debug!(message = %validation.message, "Question rejected");
            format!("❌ {}", validation.message)
        } else {
            let result = self.service.process(question).await;
            if result.success {
                result.answer.unwrap_or_default()
            } else {
                format_error(result.error.as_deref().unwrap_or("Unknown error"))
            }
        };

        self.push(ChatRole::Assistant, reply)
    }

    /// Ask example question `n` (1-based). `None` if there is no such example.
    pub async fn ask_example(&mut self, n: usize) -> Option<&ChatMessage> {
        let question = n.checked_sub(1).and_then(|i| EXAMPLE_QUESTIONS.get(i))?;
        Some(self.ask(question).await)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, role: ChatRole, content: String) -> &ChatMessage {
        self.messages.push(ChatMessage {
            role,
            content,
            timestamp: Local::now(),
        });
        &self.messages[self.messages.len() - 1]
    }
}

/// Chat commands
#[derive(Debug, PartialEq, Eq)]
pub enum ChatCommand {
    Quit,
    Clear,
    History,
    Help,
    Examples,
    Example(usize),
    Unknown(String),
    Question(String),
    Empty,
}

pub fn parse_command(input: &str) -> ChatCommand {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return ChatCommand::Empty;
    }

    if !trimmed.starts_with('/') {
        return ChatCommand::Question(input.to_string());
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or_default();

    match cmd.as_str() {
        "/quit" | "/exit" | "/q" => ChatCommand::Quit,
        "/clear" | "/c" => ChatCommand::Clear,
        "/history" | "/h" => ChatCommand::History,
        "/help" | "/?" => ChatCommand::Help,
        "/examples" | "/e" => ChatCommand::Examples,
        "/example" if arg.is_empty() => ChatCommand::Examples,
        "/example" => match arg.parse() {
            Ok(n) => ChatCommand::Example(n),
            Err(_) => ChatCommand::Unknown(trimmed.to_string()),
        },
        other => match other[1..].parse() {
            Ok(n) => ChatCommand::Example(n),
            Err(_) => ChatCommand::Unknown(cmd),
        },
    }
}

fn print_help() {
    println!(
        r#"
Chat Commands:
  /help, /?          Show this help message
  /quit, /exit       Exit chat mode
  /clear, /c         Clear the conversation
  /history, /h       Show the conversation so far
  /examples, /e      List example questions
  /example <n>, /<n> Ask example question n

Tips:
  - Questions must be between 5 and 500 characters
  - Lines starting with / are read as commands, not questions
  - Press Ctrl+D to exit
  - Up/Down arrows navigate input history
"#
    );
}

/// Run interactive chat mode
pub async fn run_chat(service: Arc<dyn AnswerService>) -> Result<()> {
    let mut ui = ReadlineInterface::new();
    ui.initialize()?;

    let mut session = ChatSession::new(service);
    ui.print_welcome(EXAMPLE_QUESTIONS)?;

    while let Some(line) = ui.read_line()? {
        match parse_command(&line) {
            ChatCommand::Quit => {
                println!("Goodbye!");
                break;
            }
            ChatCommand::Clear => {
                session.clear();
                ui.print_status("Conversation cleared.\n")?;
            }
            ChatCommand::History => {
                ui.print_history(session.messages())?;
            }
            ChatCommand::Help => print_help(),
            ChatCommand::Examples => ui.print_examples(EXAMPLE_QUESTIONS)?,
            ChatCommand::Example(n) => {
                let Some(question) = n.checked_sub(1).and_then(|i| EXAMPLE_QUESTIONS.get(i)) else {
                    ui.print_error(&format!(
                        "No example {}. Choose 1-{}.",
                        n,
                        EXAMPLE_QUESTIONS.len()
                    ))?;
                    continue;
                };
                ui.print_status(&format!("you> {}", question))?;
                if let Some(reply) = session.ask_example(n).await {
                    ui.print_reply(reply)?;
                }
            }
            ChatCommand::Unknown(cmd) => {
                ui.print_error(&format!(
                    "Unknown command: {}. Type /help for available commands.",
                    cmd
                ))?;
            }
            ChatCommand::Question(text) => {
                let reply = session.ask(&text).await;
                ui.print_reply(reply)?;
            }
            ChatCommand::Empty => continue,
        }
    }

    ui.cleanup();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use hc_agents::PipelineResult;

    use super::*;

    /// Records questions and replies with a canned result.
    struct FakeService {
        result: PipelineResult,
        asked: Mutex<Vec<String>>,
    }

    impl FakeService {
        fn answering(answer: &str) -> Arc<Self> {
            Arc::new(Self {
                result: PipelineResult::completed("", answer),
                asked: Mutex::new(Vec::new()),
            })
        }

        fn failing(error: &str) -> Arc<Self> {
            Arc::new(Self {
                result: PipelineResult::failed("", error),
                asked: Mutex::new(Vec::new()),
            })
        }

        fn asked(&self) -> Vec<String> {
            self.asked.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AnswerService for FakeService {
        async fn process(&self, question: &str) -> PipelineResult {
            self.asked.lock().unwrap().push(question.to_string());
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn test_valid_question_appends_answer() {
        let service = FakeService::answering("SEAMEO SPAFA is a regional centre.");
        let mut session = ChatSession::new(service.clone());

        let reply = session.ask("What is SEAMEO SPAFA?").await;
        assert_eq!(reply.role, ChatRole::Assistant);
        assert_eq!(reply.content, "SEAMEO SPAFA is a regional centre.");

        let log = session.messages();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].role, ChatRole::User);
        assert_eq!(log[0].content, "What is SEAMEO SPAFA?");
        assert!(log[0].timestamp <= log[1].timestamp);
        assert_eq!(service.asked(), vec!["What is SEAMEO SPAFA?"]);
    }

    #[tokio::test]
    async fn test_invalid_question_never_reaches_pipeline() {
        let service = FakeService::answering("unused");
        let mut session = ChatSession::new(service.clone());

        let reply = session.ask("hi").await;
        assert_eq!(
            reply.content,
            "❌ Question is too short. Please ask a more specific question."
        );
        assert_eq!(session.messages().len(), 2);
        assert!(service.asked().is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_error_is_formatted() {
        let service = FakeService::failing("Network error: connection refused");
        let mut session = ChatSession::new(service);

        let reply = session.ask("Where is SEAMEO SPAFA office located?").await;
        assert!(reply
            .content
            .starts_with("❌ **An error occurred while processing your question.**"));
        assert!(reply
            .content
            .contains("**Error Details:** Network error: connection refused"));
        assert!(reply.content.ends_with("if the problem persists."));
    }

    #[tokio::test]
    async fn test_clear_empties_log_without_pipeline() {
        let service = FakeService::answering("answer");
        let mut session = ChatSession::new(service.clone());
        session.ask("What programs are available?").await;
        assert_eq!(service.asked().len(), 1);

        session.clear();
        assert_eq!(session.messages().len(), 0);
        assert_eq!(service.asked().len(), 1);
    }

    #[tokio::test]
    async fn test_example_behaves_like_typing() {
        let service = FakeService::answering("answer");
        let mut session = ChatSession::new(service.clone());

        assert!(session.ask_example(4).await.is_some());
        assert_eq!(session.messages()[0].content, "When is the next archaeology workshop?");
        assert_eq!(service.asked(), vec!["When is the next archaeology workshop?"]);

        assert!(session.ask_example(0).await.is_none());
        assert!(session.ask_example(7).await.is_none());
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("  "), ChatCommand::Empty);
        assert_eq!(parse_command("/quit"), ChatCommand::Quit);
        assert_eq!(parse_command("/CLEAR"), ChatCommand::Clear);
        assert_eq!(parse_command("/examples"), ChatCommand::Examples);
        assert_eq!(parse_command("/example"), ChatCommand::Examples);
        assert_eq!(parse_command("/example 2"), ChatCommand::Example(2));
        assert_eq!(parse_command("/3"), ChatCommand::Example(3));
        assert_eq!(parse_command("/frobnicate"), ChatCommand::Unknown("/frobnicate".into()));
        assert_eq!(
            parse_command("/usr path: what is SEAMEO SPAFA?"),
            ChatCommand::Unknown("/usr".into())
        );
        assert_eq!(
            parse_command("/example two"),
            ChatCommand::Unknown("/example two".into())
        );
        assert_eq!(
            parse_command("What is SEAMEO SPAFA?"),
            ChatCommand::Question("What is SEAMEO SPAFA?".into())
        );
    }

    #[test]
    fn test_example_questions() {
        assert_eq!(EXAMPLE_QUESTIONS.len(), 6);
        assert!(EXAMPLE_QUESTIONS
            .iter()
            .all(|q| hc_agents::validate_question(q).valid));
    }
}
