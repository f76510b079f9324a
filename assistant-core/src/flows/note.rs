//! Step-by-step note creation and editing

use super::{Flow, FlowStep};
use crate::models::{Note, Notes};
use crate::render;
use crate::validators::validate_title;
use tracing::debug;

#[derive(Debug, Clone)]
enum NewNote {
    Title,
    Text { title: String },
    Tags { note: Note },
}

/// Collects title, text and tags for a new note
#[derive(Debug, Clone)]
pub struct NoteFlow {
    state: NewNote,
}

impl Default for NoteFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteFlow {
    pub fn new() -> Self {
        Self { state: NewNote::Title }
    }
}

impl Flow for NoteFlow {
    type Store = Notes;
    type Output = Note;

    fn prompt(&self) -> String {
        render::input(match self.state {
            NewNote::Title => "Enter note title: ",
            NewNote::Text { .. } => "Enter note text: ",
            NewNote::Tags { .. } => "Enter tag: ",
        })
    }

    fn advance(&mut self, input: &str, notes: &Notes) -> FlowStep<Note> {
        let input = input.trim();
        let (state, step) = match std::mem::replace(&mut self.state, NewNote::Title) {
            NewNote::Title => match validate_title(input) {
                Err(e) => (NewNote::Title, FlowStep::Continue(Some(render::warning(e.to_string())))),
                Ok(title) if notes.contains(&title) => {
                    let message = format!("Note with title '{}' already exists.", title);
                    (NewNote::Title, FlowStep::Continue(Some(render::warning(message))))
                }
                Ok(title) => (NewNote::Text { title }, FlowStep::Continue(None)),
            },
            NewNote::Text { title } => {
                debug!("Collecting tags for note '{}'", title);
                (
                    NewNote::Tags { note: Note::new(title, input) },
                    FlowStep::Continue(Some(render::info(
                        "Add tags for this note (optional). Leave empty to stop.",
                    ))),
                )
            }
            NewNote::Tags { note } if input.is_empty() => (NewNote::Title, FlowStep::Finished(note)),
            NewNote::Tags { mut note } => {
                let feedback = match note.add_tag(input) {
                    Ok(()) => render::success(format!("Tag '{}' added.", input)),
                    Err(e) => render::error(e.to_string()),
                };
                (NewNote::Tags { note }, FlowStep::Continue(Some(feedback)))
            }
        };
        self.state = state;
        step
    }
}

/// Changes requested for an existing note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEdit {
    pub title: String,
    /// Replacement content, `None` keeps the current one
    pub content: Option<String>,
    /// Replacement title, `None` keeps the current one
    pub new_title: Option<String>,
}

impl NoteEdit {
    /// Title the note is stored under once the edit is applied
    pub fn final_title(&self) -> &str {
        self.new_title.as_deref().unwrap_or(&self.title)
    }
}

#[derive(Debug, Clone)]
enum EditNote {
    Title,
    Text { title: String },
    NewTitle { title: String, content: Option<String> },
}

/// Asks which note to change, then for its new text and title
#[derive(Debug, Clone)]
pub struct NoteEditFlow {
    state: EditNote,
}

impl Default for NoteEditFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteEditFlow {
    pub fn new() -> Self {
        Self { state: EditNote::Title }
    }
}

impl Flow for NoteEditFlow {
    type Store = Notes;
    type Output = NoteEdit;

    fn prompt(&self) -> String {
        render::input(match self.state {
            EditNote::Title => "Enter the title of the note to change: ",
            EditNote::Text { .. } => "Enter new text (leave empty to keep current): ",
            EditNote::NewTitle { .. } => "Enter new title (leave empty to keep current): ",
        })
    }

    fn advance(&mut self, input: &str, notes: &Notes) -> FlowStep<NoteEdit> {
        let input = input.trim();
        let (state, step) = match std::mem::replace(&mut self.state, EditNote::Title) {
            EditNote::Title => match notes.find(input) {
                None => {
                    (EditNote::Title, FlowStep::Cancelled(format!("Note '{}' not found.", input)))
                }
                Some(note) => {
                    let current = render::search(format!("Current text: {}", note.content()));
                    (EditNote::Text { title: note.title().to_string() }, FlowStep::Continue(Some(current)))
                }
            },
            EditNote::Text { title } => {
                let content = (!input.is_empty()).then(|| input.to_string());
                (EditNote::NewTitle { title, content }, FlowStep::Continue(None))
            }
            EditNote::NewTitle { title, content } => {
                if input.is_empty() || input == title {
                    (EditNote::Title, FlowStep::Finished(NoteEdit { title, content, new_title: None }))
                } else if notes.contains(input) {
                    let message = render::warning(format!("Note with title '{}' already exists.", input));
                    (EditNote::NewTitle { title, content }, FlowStep::Continue(Some(message)))
                } else {
                    let new_title = Some(input.to_string());
                    (EditNote::Title, FlowStep::Finished(NoteEdit { title, content, new_title }))
                }
            }
        };
        self.state = state;
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::flows::{FlowEnd, drive};

    fn notes() -> Notes {
        [Note::new("Plan", "ship it"), Note::new("Ideas", "")].into_iter().collect()
    }

    fn run<F: Flow<Store = Notes>>(flow: &mut F, lines: &[&str]) -> (FlowEnd<F::Output>, ScriptedConsole) {
        let mut console = ScriptedConsole::new(lines.iter().copied());
        let end = drive(flow, &notes(), &mut console).unwrap();
        (end, console)
    }

    #[test]
    fn test_new_note_with_tags() {
        let (end, console) = run(&mut NoteFlow::new(), &["Groceries", "milk, eggs", "home", "home", "shop", ""]);
        let FlowEnd::Finished(note) = end else { panic!("flow cancelled") };

        assert_eq!(note.title(), "Groceries");
        assert_eq!(note.content(), "milk, eggs");
        assert_eq!(note.tags(), ["home", "shop"]);
        assert!(console.transcript().contains("already exists"));
    }

    #[test]
    fn test_new_note_rejects_taken_and_empty_titles() {
        let (end, console) = run(&mut NoteFlow::new(), &["", "Plan", "Other", "", ""]);
        let FlowEnd::Finished(note) = end else { panic!("flow cancelled") };

        assert_eq!(note.title(), "Other");
        assert!(note.content().is_empty());
        let transcript = console.transcript();
        assert!(transcript.contains("Title cannot be empty."));
        assert!(transcript.contains("Note with title 'Plan' already exists."));
    }

    #[test]
    fn test_new_note_cancel() {
        let (end, _) = run(&mut NoteFlow::new(), &["Draft", "text", "CANCEL"]);
        assert_eq!(end, FlowEnd::Cancelled("Operation cancelled.".to_string()));
    }

    #[test]
    fn test_edit_unknown_note_aborts() {
        let (end, console) = run(&mut NoteEditFlow::new(), &["Missing", "never read"]);
        assert_eq!(end, FlowEnd::Cancelled("Note 'Missing' not found.".to_string()));
        assert_eq!(console.remaining(), 1);
    }

    #[test]
    fn test_edit_keeps_blank_fields() {
        let (end, console) = run(&mut NoteEditFlow::new(), &["Plan", "", ""]);
        assert_eq!(
            end,
            FlowEnd::Finished(NoteEdit { title: "Plan".to_string(), content: None, new_title: None })
        );
        assert!(console.transcript().contains("Current text: ship it"));
    }

    #[test]
    fn test_edit_reasks_for_taken_title() {
        let (end, _) = run(&mut NoteEditFlow::new(), &["Plan", "ship it today", "Ideas", "Roadmap"]);
        let FlowEnd::Finished(edit) = end else { panic!("flow cancelled") };

        assert_eq!(edit.content.as_deref(), Some("ship it today"));
        assert_eq!(edit.final_title(), "Roadmap");
    }
}
