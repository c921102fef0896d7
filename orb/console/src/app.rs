//! Console Application
//!
//! The App is a thin client over the three controllers:
//! 1. Parses each input line into a [`Command`]
//! 2. Drives the matching controller operation
//! 3. Waits for kernel completions without blocking input
//! 4. Prints whatever the new snapshots show

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use orb_core::{
    ChatSessionController, KernelBackend, MessageRole, ProjectBoardController,
    ThoughtLogController,
};

use crate::commands::{Command, HELP};
use crate::render;

/// What woke the event loop
enum Event {
    Line(Option<String>),
    ChatSettled,
    ThoughtSettled,
}

/// Console state: the controllers plus what has already been printed
pub struct App<B: KernelBackend + 'static> {
    chat: ChatSessionController<B>,
    thoughts: ThoughtLogController<B>,
    board: ProjectBoardController,
    /// Transcript entries already printed
    shown_messages: usize,
    running: bool,
}

impl<B: KernelBackend + 'static> App<B> {
    /// Create the console over one backend
    pub fn new(backend: Arc<B>, degraded_status: &str) -> Self {
        Self {
            chat: ChatSessionController::new(Arc::clone(&backend)),
            thoughts: ThoughtLogController::new(backend).with_degraded_status(degraded_status),
            board: ProjectBoardController::new(),
            shown_messages: 0,
            running: true,
        }
    }

    /// Chat controller
    pub fn chat(&self) -> &ChatSessionController<B> {
        &self.chat
    }

    /// Thought controller
    pub fn thoughts(&self) -> &ThoughtLogController<B> {
        &self.thoughts
    }

    /// Project board controller
    pub fn board(&self) -> &ProjectBoardController {
        &self.board
    }

    /// Whether `/quit` has not been seen yet
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Main event loop
    ///
    /// Reads lines until `/quit` or end of input. At end of input the loop
    /// waits for outstanding kernel calls so their results are printed.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        write_lines(&mut output, &["orb console ready, /help for commands".to_string()]).await?;

        while self.running {
            let event = tokio::select! {
                line = lines.next_line() => Event::Line(line.context("Failed to read input")?),
                true = self.chat.settle_next(), if self.chat.in_flight() > 0 => Event::ChatSettled,
                true = self.thoughts.settle_next(), if self.thoughts.in_flight() > 0 => {
                    Event::ThoughtSettled
                }
            };

            let printed = match event {
                Event::Line(Some(line)) => self.handle_line(&line),
                Event::Line(None) => {
                    tracing::debug!("Input closed");
                    self.running = false;
                    self.finish().await
                }
                Event::ChatSettled => self.chat_updates(),
                Event::ThoughtSettled => self.thought_updates(1),
            };
            write_lines(&mut output, &printed).await?;
        }

        Ok(())
    }

    /// Apply one input line and return what to print
    pub fn handle_line(&mut self, line: &str) -> Vec<String> {
        let mut out = self.poll();

        match Command::parse(line) {
            Command::Empty => {}
            Command::Chat(text) => {
                self.chat.set_pending_input(text);
                if let Some((request_id, snapshot)) = self.chat.submit_pending() {
                    tracing::debug!(request = %request_id, "Chat submitted");
                    // the user's own line is already on screen
                    self.shown_messages = snapshot.transcript.len();
                    out.extend(render::awaiting_line(&snapshot, self.chat.in_flight()));
                }
            }
            Command::Thought(text) => {
                self.thoughts.set_draft(text);
                match self.thoughts.save() {
                    Some((_, snapshot)) => out.push(format!(
                        "saved: {} ({} thoughts)",
                        snapshot.entries[0].text,
                        snapshot.entries.len()
                    )),
                    None => out.push("nothing to save".to_string()),
                }
            }
            Command::Project(name) => {
                self.board.set_draft_project_name(name);
                match self.board.add_project_from_draft() {
                    Some(snapshot) => out.extend(render::board(&snapshot)),
                    None => out.push("project name is empty".to_string()),
                }
            }
            Command::Todo { project, text } => {
                self.board.set_draft_todo_text(text);
                match self.board.add_todo_from_draft(project) {
                    Some(snapshot) => out.extend(render::board(&snapshot)),
                    None => out.push(format!("cannot add todo to project {}", project + 1)),
                }
            }
            Command::Done { project, todo } => match self.board.toggle_todo(project, todo) {
                Some(snapshot) => out.extend(render::board(&snapshot)),
                None => out.push(format!("no todo {} in project {}", todo + 1, project + 1)),
            },
            Command::Show => {
                out.extend(render::thought_log(&self.thoughts.snapshot()));
                out.extend(render::board(&self.board.snapshot()));
            }
            Command::Help => out.push(HELP.to_string()),
            Command::Quit => self.running = false,
            Command::Invalid(reason) => out.push(reason),
        }

        out
    }

    /// Apply completions that have already arrived and return what to print
    pub fn poll(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        if self.chat.poll() > 0 {
            out.extend(self.chat_updates());
        }
        let applied = self.thoughts.poll();
        if applied > 0 {
            out.extend(self.thought_updates(applied));
        }
        out
    }

    /// Wait for every outstanding kernel call and return what to print
    pub async fn finish(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        while self.chat.settle_next().await {
            out.extend(self.chat_updates());
        }
        while self.thoughts.settle_next().await {
            out.extend(self.thought_updates(1));
        }
        out
    }

    /// New assistant messages since the last print
    fn chat_updates(&mut self) -> Vec<String> {
        let snapshot = self.chat.snapshot();
        let lines = snapshot
            .messages()
            .skip(self.shown_messages)
            .filter(|m| m.role == MessageRole::Assistant)
            .map(render::message_line)
            .collect();
        self.shown_messages = snapshot.transcript.len();
        lines
    }

    /// Notice after `applied` thought writes resolved
    fn thought_updates(&self, applied: usize) -> Vec<String> {
        let snapshot = self.thoughts.snapshot();
        tracing::debug!(
            applied,
            in_flight = self.thoughts.in_flight(),
            "Thought writes resolved"
        );
        render::notice_line(&snapshot).into_iter().collect()
    }
}

async fn write_lines<W: AsyncWrite + Unpin>(output: &mut W, lines: &[String]) -> Result<()> {
    for line in lines {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }
    output.flush().await.context("Failed to flush output")
}
