//! Readline-based terminal interface for the chat.
//!
//! Input comes from rustyline; output is plain text with a little color.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::terminal::size;
use crossterm::ExecutableCommand;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{Config, Editor};

use hc_agents::{ANSWER_TASK, QUALITY_TASK, RESEARCH_TASK};
use hc_core::{ProgressEvent, ProgressHandler};

use crate::chat::{ChatMessage, ChatRole};

pub struct ReadlineInterface {
    editor: Option<Editor<(), FileHistory>>,
    history_path: Option<PathBuf>,
}

impl ReadlineInterface {
    pub fn new() -> Self {
        Self {
            editor: None,
            history_path: get_history_path(),
        }
    }

    pub fn initialize(&mut self) -> Result<()> {
        let config = Config::builder()
            .history_ignore_space(true)
            .history_ignore_dups(true)?
            .build();

        let mut editor: Editor<(), FileHistory> = Editor::with_config(config)?;

        if let Some(ref path) = self.history_path {
            let _ = editor.load_history(path);
        }

        self.editor = Some(editor);
        Ok(())
    }

    /// Read one line. `None` at end of input; Ctrl+C yields an empty line.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let _ = self.print_prompt_hint();

        let editor = self
            .editor
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Interface not initialized"))?;

        match editor.readline("you> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(&line);
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                Ok(Some(String::new()))
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                Ok(None)
            }
            Err(e) => Err(anyhow::anyhow!("Error reading input: {}", e)),
        }
    }

    pub fn cleanup(&mut self) {
        if let (Some(editor), Some(path)) = (self.editor.as_mut(), self.history_path.as_ref()) {
            if let Some(dir) = path.parent() {
                let _ = std::fs::create_dir_all(dir);
            }
            let _ = editor.save_history(path);
        }
    }

    pub fn print_welcome(&self, examples: &[&str]) -> std::io::Result<()> {
        print_section_header("SEAMEO SPAFA Help Center")?;
        println!("Ask about SEAMEO SPAFA programs, research, publications and events.");
        println!("Answers are sourced from the official website only.\n");
        self.print_examples(examples)
    }

    pub fn print_examples(&self, examples: &[&str]) -> std::io::Result<()> {
        println!("Example questions (type /<n> to ask):");
        for (i, question) in examples.iter().enumerate() {
            println!("  {}. {}", i + 1, question);
        }
        println!();
        Ok(())
    }

    pub fn print_reply(&self, message: &ChatMessage) -> std::io::Result<()> {
        print_section_header("Answer")?;
        let mut stdout = std::io::stdout();
        if message.content.starts_with('❌') {
            stdout.execute(SetForegroundColor(Color::Red))?;
        }
        println!("{}\n", message.content);
        stdout.execute(ResetColor)?;
        stdout.flush()
    }

    pub fn print_history(&self, messages: &[ChatMessage]) -> std::io::Result<()> {
        if messages.is_empty() {
            println!("No messages yet.\n");
            return Ok(());
        }

        let mut stdout = std::io::stdout();
        for message in messages {
            let (label, color) = match message.role {
                ChatRole::User => ("you", Color::Green),
                ChatRole::Assistant => ("assistant", Color::Cyan),
            };
            stdout.execute(SetForegroundColor(Color::DarkGrey))?;
            print!("[{}] ", message.timestamp.format("%H:%M:%S"));
            stdout.execute(SetForegroundColor(color))?;
            print!("{}> ", label);
            stdout.execute(ResetColor)?;
            println!("{}", preview(&message.content, 120));
        }
        println!();
        stdout.flush()
    }

    fn print_prompt_hint(&self) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        stdout.execute(SetForegroundColor(Color::DarkGrey))?;
        println!("/help · /examples · /quit or Ctrl+D");
        stdout.execute(ResetColor)?;
        stdout.flush()
    }

    pub fn print_status(&self, msg: &str) -> std::io::Result<()> {
        print_colored(Color::Cyan, msg)
    }

    pub fn print_error(&self, msg: &str) -> std::io::Result<()> {
        let mut stderr = std::io::stderr();
        stderr.execute(SetForegroundColor(Color::Red))?;
        eprintln!("Error: {}", msg);
        stderr.execute(ResetColor)?;
        stderr.flush()
    }
}

impl Default for ReadlineInterface {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints pipeline progress as status lines.
pub struct StatusPrinter;

#[async_trait]
impl ProgressHandler for StatusPrinter {
    async fn on_progress(&self, event: ProgressEvent) {
        let line = match event {
            ProgressEvent::StageStart { stage, .. } => stage_status(&stage).to_string(),
            ProgressEvent::ToolStart { tool, .. } => format!("  ▶ {}", tool),
            ProgressEvent::ToolComplete { tool, is_error: true, .. } => {
                format!("  ▶ {} (error)", tool)
            }
            ProgressEvent::ToolComplete { .. } | ProgressEvent::StageComplete { .. } => return,
        };
        let _ = print_colored(Color::DarkGrey, &line);
    }
}

fn stage_status(stage: &str) -> &'static str {
    match stage {
        RESEARCH_TASK => "🔍 Searching information from SEAMEO SPAFA website...",
        ANSWER_TASK => "✍  Composing the answer...",
        QUALITY_TASK => "✅ Checking answer quality...",
        _ => "Working...",
    }
}

/// Print a section header with styling.
fn print_section_header(title: &str) -> std::io::Result<()> {
    let width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let title_len = title.chars().count() + 2;
    let remaining = width.saturating_sub(title_len).saturating_sub(1);
    let left_len = remaining / 2;
    let right_len = remaining - left_len;

    let mut stdout = std::io::stdout();
    stdout.execute(SetForegroundColor(Color::DarkGrey))?;
    print!("{} ", "─".repeat(left_len));
    stdout.execute(SetForegroundColor(Color::Cyan))?;
    print!("{}", title);
    stdout.execute(SetForegroundColor(Color::DarkGrey))?;
    println!(" {}", "─".repeat(right_len));
    stdout.execute(ResetColor)?;
    stdout.flush()
}

fn print_colored(color: Color, msg: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.execute(SetForegroundColor(color))?;
    println!("{}", msg);
    stdout.execute(ResetColor)?;
    stdout.flush()
}

/// First line of `text`, cut to `max` characters.
fn preview(text: &str, max: usize) -> String {
    let first = text.lines().next().unwrap_or_default();
    if first.chars().count() > max {
        format!("{}...", first.chars().take(max).collect::<String>())
    } else if text.lines().nth(1).is_some() {
        format!("{} ...", first)
    } else {
        first.to_string()
    }
}

/// Get the path to the history file.
fn get_history_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("hc").join("chat_history"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("first\nsecond", 10), "first ...");
        assert_eq!(preview("abcdefghijkl", 5), "abcde...");
        assert_eq!(preview("", 5), "");
    }

    #[test]
    fn test_stage_status() {
        assert!(stage_status("research").contains("Searching"));
        assert!(stage_status("quality_check").contains("quality"));
        assert_eq!(stage_status("other"), "Working...");
    }
}
