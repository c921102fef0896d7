//! Text Rendering
//!
//! Turns controller snapshots into plain lines for the console. Nothing here
//! mutates state; every function takes a snapshot and returns text.

use std::fmt::Write as _;

use orb_core::{
    BoardSnapshot, ChatSnapshot, Message, MessageRole, NoticeLevel, Project, ThoughtSnapshot,
};

/// Prefix for assistant lines
const ORB_PREFIX: &str = "orb>";

/// Prefix for echoed user lines
const USER_PREFIX: &str = "you>";

/// One transcript line
#[must_use]
pub fn message_line(message: &Message) -> String {
    let prefix = match message.role {
        MessageRole::User => USER_PREFIX,
        MessageRole::Assistant => ORB_PREFIX,
    };
    format!("{prefix} {}", message.content)
}

/// Typing indicator, with the number of requests still out when above one
#[must_use]
pub fn awaiting_line(snapshot: &ChatSnapshot, in_flight: usize) -> Option<String> {
    if !snapshot.is_awaiting_reply() {
        return None;
    }
    match in_flight {
        0 | 1 => Some("orb is typing...".to_string()),
        n => Some(format!("orb is typing... ({n} replies pending)")),
    }
}

/// Notice under the thought log, if any
#[must_use]
pub fn notice_line(snapshot: &ThoughtSnapshot) -> Option<String> {
    if !snapshot.has_notice() {
        return None;
    }
    let marker = match snapshot.notice_level {
        Some(NoticeLevel::Info) => "note:",
        _ => "error:",
    };
    Some(format!("{marker} {}", snapshot.error_message))
}

/// Thought log, newest first
#[must_use]
pub fn thought_log(snapshot: &ThoughtSnapshot) -> Vec<String> {
    let mut lines = vec![format!("Thoughts ({})", snapshot.entries.len())];
    for entry in &snapshot.entries {
        let mut line = format!("  [{}] {}", entry.created_at.format("%H:%M:%S"), entry.text);
        if entry.local_only {
            line.push_str(" (local only)");
        }
        lines.push(line);
    }
    if snapshot.saving() {
        lines.push("  saving...".to_string());
    }
    lines.extend(notice_line(snapshot).map(|notice| format!("  {notice}")));
    lines
}

/// Project board with 1-based numbering, newest project first
#[must_use]
pub fn board(snapshot: &BoardSnapshot) -> Vec<String> {
    if snapshot.projects.is_empty() {
        return vec!["Projects: none yet, add one with /project <name>".to_string()];
    }
    let mut lines = vec!["Projects".to_string()];
    for (i, project) in snapshot.projects.iter().enumerate() {
        lines.extend(project_lines(i + 1, project));
    }
    lines
}

fn project_lines(number: usize, project: &Project) -> Vec<String> {
    let mut header = format!("  {number}. {}", project.name);
    if !project.todos.is_empty() {
        let _ = write!(header, " [{}%]", project.progress_percent());
    }

    let mut lines = vec![header];
    for (j, todo) in project.todos.iter().enumerate() {
        let check = if todo.done { 'x' } else { ' ' };
        lines.push(format!("     {}. [{check}] {}", j + 1, todo.text));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use orb_core::ProjectBoardController;

    #[test]
    fn test_message_lines() {
        assert_eq!(message_line(&Message::user("hello")), "you> hello");
        assert_eq!(message_line(&Message::assistant("hi")), "orb> hi");
    }

    #[test]
    fn test_awaiting_line() {
        let idle = ChatSnapshot::default();
        assert_eq!(awaiting_line(&idle, 0), None);

        let sent = idle.with_user_message("hello").unwrap();
        assert_eq!(awaiting_line(&sent, 1).as_deref(), Some("orb is typing..."));
        assert_eq!(
            awaiting_line(&sent, 3).as_deref(),
            Some("orb is typing... (3 replies pending)")
        );

        let replied = sent.with_reply("hi");
        assert_eq!(awaiting_line(&replied, 2), None);
    }

    #[test]
    fn test_notice_levels() {
        let snapshot = ThoughtSnapshot::default();
        assert_eq!(notice_line(&snapshot), None);

        let info = snapshot.with_write_failed(NoticeLevel::Info, "Saved locally (backend not configured).");
        assert_eq!(
            notice_line(&info).as_deref(),
            Some("note: Saved locally (backend not configured).")
        );

        let error = snapshot.with_write_failed(NoticeLevel::Error, "HTTP 500");
        assert_eq!(notice_line(&error).as_deref(), Some("error: HTTP 500"));
    }

    #[test]
    fn test_thought_log_marks_local_entries() {
        let (saved, entry) = ThoughtSnapshot::default()
            .with_draft("offline")
            .with_saved_draft()
            .unwrap();
        let tagged = saved.with_local_only(&entry).with_write_settled();

        let lines = thought_log(&tagged);
        assert_eq!(lines[0], "Thoughts (1)");
        assert!(lines[1].ends_with("] offline (local only)"));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_board_numbering_and_progress() {
        let mut controller = ProjectBoardController::new();
        controller.add_project("Alpha");
        controller.add_project("Beta");
        controller.add_todo(1, "one");
        controller.add_todo(1, "two");
        let snapshot = controller.toggle_todo(1, 0).unwrap();

        assert_eq!(
            board(&snapshot),
            vec![
                "Projects".to_string(),
                "  1. Beta".to_string(),
                "  2. Alpha [50%]".to_string(),
                "     1. [x] one".to_string(),
                "     2. [ ] two".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_board() {
        assert_eq!(
            board(&BoardSnapshot::default()),
            vec!["Projects: none yet, add one with /project <name>".to_string()]
        );
    }
}
