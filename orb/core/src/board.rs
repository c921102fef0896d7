//! Project Board
//!
//! Two-level collection of projects and their todos. Purely local: nothing
//! here talks to the kernel.
//!
//! Every update is structural. Both levels are persistent vectors, so a new
//! snapshot shares all untouched structure with the previous one instead of
//! copying it. An update to one project replaces only that project's `Arc`,
//! so a renderer can skip every project whose pointer did not change.

use std::sync::Arc;

use im::Vector;
use tokio::sync::watch;

use crate::observe::SnapshotCell;

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Todo {
    /// Trimmed todo text
    pub text: String,
    /// Whether the todo is checked off
    pub done: bool,
}

impl Todo {
    /// An open todo
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
        }
    }
}

/// A project and its todos in creation order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    /// Trimmed project name
    pub name: String,
    /// Todos, oldest first
    pub todos: Vector<Todo>,
}

impl Project {
    /// An empty project
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            todos: Vector::new(),
        }
    }

    /// Share of todos that are done, 0-100 (0 for an empty project)
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        if self.todos.is_empty() {
            return 0;
        }
        let done = self.todos.iter().filter(|t| t.done).count();
        // done <= len, so the quotient is at most 100
        u8::try_from(done * 100 / self.todos.len()).unwrap_or(100)
    }
}

/// Immutable view of the project board
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Projects, newest first
    pub projects: Vector<Arc<Project>>,
    /// Text in the new-project box
    pub draft_project_name: String,
    /// Text in the new-todo box
    pub draft_todo_text: String,
}

impl BoardSnapshot {
    /// Project at `index`
    #[must_use]
    pub fn project(&self, index: usize) -> Option<&Project> {
        self.projects.get(index).map(AsRef::as_ref)
    }

    /// Replace the new-project box text
    #[must_use]
    pub fn with_draft_project_name(&self, text: impl Into<String>) -> Self {
        Self {
            draft_project_name: text.into(),
            ..self.clone()
        }
    }

    /// Replace the new-todo box text
    #[must_use]
    pub fn with_draft_todo_text(&self, text: impl Into<String>) -> Self {
        Self {
            draft_todo_text: text.into(),
            ..self.clone()
        }
    }

    /// Prepend a new empty project
    ///
    /// Returns `None` for a blank name.
    #[must_use]
    pub fn with_project(&self, name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut next = self.clone();
        next.projects.push_front(Arc::new(Project::new(name)));
        Some(next)
    }

    /// Append a todo to the project at `project_index`
    ///
    /// Returns `None` for blank text or an index out of range. Only the
    /// targeted project is rebuilt.
    #[must_use]
    pub fn with_todo(&self, project_index: usize, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.with_project_updated(project_index, |project| {
            project.todos.push_back(Todo::new(text));
            true
        })
    }

    /// Flip `done` on one todo
    ///
    /// Returns `None` when either index is out of range.
    #[must_use]
    pub fn with_todo_toggled(&self, project_index: usize, todo_index: usize) -> Option<Self> {
        self.with_project_updated(project_index, |project| {
            match project.todos.get_mut(todo_index) {
                Some(todo) => {
                    todo.done = !todo.done;
                    true
                }
                None => false,
            }
        })
    }

    /// Rebuild one project and keep every other `Arc` as it is
    fn with_project_updated<F>(&self, project_index: usize, update: F) -> Option<Self>
    where
        F: FnOnce(&mut Project) -> bool,
    {
        let mut project = self.projects.get(project_index)?.as_ref().clone();
        if !update(&mut project) {
            return None;
        }
        let mut next = self.clone();
        next.projects[project_index] = Arc::new(project);
        Some(next)
    }
}

/// Controller for the project board
pub struct ProjectBoardController {
    cell: SnapshotCell<BoardSnapshot>,
}

impl ProjectBoardController {
    /// Create an empty board
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: SnapshotCell::new(BoardSnapshot::default()),
        }
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.cell.current()
    }

    /// Observe every future snapshot
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<BoardSnapshot>> {
        self.cell.subscribe()
    }

    /// Replace the new-project box text
    pub fn set_draft_project_name(&mut self, text: impl Into<String>) -> Arc<BoardSnapshot> {
        let next = self.cell.current().with_draft_project_name(text);
        self.cell.publish(next)
    }

    /// Replace the new-todo box text
    pub fn set_draft_todo_text(&mut self, text: impl Into<String>) -> Arc<BoardSnapshot> {
        let next = self.cell.current().with_draft_todo_text(text);
        self.cell.publish(next)
    }

    /// Prepend a project named `name`; `None` if the name is blank
    pub fn add_project(&mut self, name: &str) -> Option<Arc<BoardSnapshot>> {
        let next = self.cell.current().with_project(name)?;
        tracing::debug!(name = %name.trim(), "Project added");
        Some(self.cell.publish(next))
    }

    /// Append a todo to one project; `None` if blank or out of range
    pub fn add_todo(&mut self, project_index: usize, text: &str) -> Option<Arc<BoardSnapshot>> {
        let next = self.cell.current().with_todo(project_index, text)?;
        tracing::debug!(project = project_index, "Todo added");
        Some(self.cell.publish(next))
    }

    /// Flip one todo; `None` if either index is out of range
    pub fn toggle_todo(
        &mut self,
        project_index: usize,
        todo_index: usize,
    ) -> Option<Arc<BoardSnapshot>> {
        let next = self
            .cell
            .current()
            .with_todo_toggled(project_index, todo_index)?;
        Some(self.cell.publish(next))
    }

    /// Add a project from the new-project box and clear it on success
    pub fn add_project_from_draft(&mut self) -> Option<Arc<BoardSnapshot>> {
        let current = self.cell.current();
        let next = current
            .with_project(&current.draft_project_name)?
            .with_draft_project_name(String::new());
        Some(self.cell.publish(next))
    }

    /// Add a todo from the new-todo box and clear it on success
    pub fn add_todo_from_draft(&mut self, project_index: usize) -> Option<Arc<BoardSnapshot>> {
        let current = self.cell.current();
        let next = current
            .with_todo(project_index, &current.draft_todo_text)?
            .with_draft_todo_text(String::new());
        Some(self.cell.publish(next))
    }
}

impl Default for ProjectBoardController {
    fn default() -> Self {
        Self::new()
    }
}
