//! Notes and the note collection

use crate::error::{AssistantError, FieldKind, Result};
use crate::validators::{validate_tag, validate_title};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum characters of content shown in tables
const PREVIEW_CHARS: usize = 50;

/// A single note with title, content, and tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into(), tags: Vec::new() }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    fn duplicate_tag(&self, tag: &str) -> AssistantError {
        AssistantError::duplicate(FieldKind::Tag, tag, format!("note '{}'", self.title))
    }

    /// Add a unique tag
    pub fn add_tag(&mut self, tag: &str) -> Result<()> {
        let tag = validate_tag(tag)?;
        if self.has_tag(&tag) {
            return Err(self.duplicate_tag(&tag));
        }
        self.tags.push(tag);
        Ok(())
    }

    /// Rename a tag in place. Returns `false` when `old` is not present.
    pub fn edit_tag(&mut self, old: &str, new: &str) -> Result<bool> {
        let new = validate_tag(new)?;
        let Some(idx) = self.tags.iter().position(|t| t == old) else {
            return Ok(false);
        };
        if new != old && self.has_tag(&new) {
            return Err(self.duplicate_tag(&new));
        }
        self.tags[idx] = new;
        Ok(true)
    }

    pub fn delete_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Case-insensitive match against title, content, and tags
    pub fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.title.to_lowercase().contains(&keyword)
            || self.content.to_lowercase().contains(&keyword)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&keyword))
    }

    pub fn tags_display(&self) -> String {
        if self.tags.is_empty() {
            "No tags".to_string()
        } else {
            self.tags.join(", ")
        }
    }

    pub fn content_preview(&self) -> String {
        if self.content.chars().count() <= PREVIEW_CHARS {
            self.content.clone()
        } else {
            let head: String = self.content.chars().take(PREVIEW_CHARS).collect();
            format!("{}...", head)
        }
    }
}

/// In-memory note store keyed by exact title
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notes {
    notes: BTreeMap<String, Note>,
}

impl Notes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, note: Note) -> Option<Note> {
        self.notes.insert(note.title.clone(), note)
    }

    pub fn find(&self, title: &str) -> Option<&Note> {
        self.notes.get(title)
    }

    pub fn find_mut(&mut self, title: &str) -> Option<&mut Note> {
        self.notes.get_mut(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.notes.contains_key(title)
    }

    pub fn remove(&mut self, title: &str) -> Option<Note> {
        self.notes.remove(title)
    }

    /// Re-key a note. Returns `false` when `old` does not exist.
    pub fn rename(&mut self, old: &str, new_title: &str) -> Result<bool> {
        let new_title = validate_title(new_title)?;
        if !self.notes.contains_key(old) {
            return Ok(false);
        }
        if new_title != old && self.notes.contains_key(&new_title) {
            return Err(AssistantError::duplicate(FieldKind::Title, new_title, "another note"));
        }

        if let Some(mut note) = self.notes.remove(old) {
            note.title = new_title;
            self.add(note);
        }
        Ok(true)
    }

    pub fn search(&self, keyword: &str) -> Vec<&Note> {
        self.iter().filter(|n| n.matches(keyword)).collect()
    }

    pub fn by_tag(&self, tag: &str) -> Vec<&Note> {
        self.iter().filter(|n| n.has_tag(tag)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl FromIterator<Note> for Notes {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        let mut notes = Self::new();
        for note in iter {
            notes.add(note);
        }
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        let mut note = Note::new("Groceries", "milk, eggs");
        note.add_tag("home").unwrap();
        note.add_tag("weekly").unwrap();
        assert!(note.add_tag("home").is_err());
        assert!(note.add_tag("  ").is_err());

        assert!(note.edit_tag("weekly", "daily").unwrap());
        assert!(!note.edit_tag("monthly", "yearly").unwrap());
        assert!(note.edit_tag("daily", "home").is_err());
        assert_eq!(note.tags_display(), "home, daily");
    }

    #[test]
    fn test_delete_missing_tag_leaves_note_unchanged() {
        let mut note = Note::new("Todo", "stuff");
        note.add_tag("work").unwrap();
        let before = serde_json::to_string(&note).unwrap();

        assert!(!note.delete_tag("play"));
        assert_eq!(serde_json::to_string(&note).unwrap(), before);
    }

    #[test]
    fn test_search() {
        let mut work = Note::new("Standup", "Discuss the RELEASE");
        work.add_tag("work").unwrap();
        let home = Note::new("Shopping", "bread");
        let notes: Notes = [work, home].into_iter().collect();

        assert_eq!(notes.search("release").len(), 1);
        assert_eq!(notes.search("WORK").len(), 1);
        assert_eq!(notes.by_tag("work").len(), 1);
        assert!(notes.by_tag("Work").is_empty());
    }

    #[test]
    fn test_rename() {
        let notes_vec = vec![Note::new("A", "a"), Note::new("B", "b")];
        let mut notes: Notes = notes_vec.into_iter().collect();

        assert!(notes.rename("A", "C").is_ok_and(|found| found));
        assert_eq!(notes.find("C").map(Note::content), Some("a"));
        assert!(notes.rename("C", "B").is_err());
        assert!(!notes.rename("missing", "D").unwrap());
    }

    #[test]
    fn test_content_preview() {
        let note = Note::new("Long", "x".repeat(60));
        assert_eq!(note.content_preview().chars().count(), PREVIEW_CHARS + 3);
        assert!(Note::new("Short", "hi").tags_display() == "No tags");
    }
}
