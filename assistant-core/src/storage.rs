//! Storage for the contact and note collections
//!
//! Both stores are kept as JSON documents under a single data directory and
//! are loaded on start and written back on exit.

use crate::models::{AddressBook, Contact, Note, Notes};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Storage layout version
const STORAGE_VERSION: &str = "1.0";

const CONTACTS_FILE: &str = "contacts.json";
const NOTES_FILE: &str = "notes.json";

/// On-disk envelope around a list of entries
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile<T> {
    version: String,
    entries: Vec<T>,
}

/// Manages the files backing both stores
#[derive(Debug, Clone)]
pub struct Storage {
    /// Directory holding the store files
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contacts_path(&self) -> PathBuf {
        self.root.join(CONTACTS_FILE)
    }

    pub fn notes_path(&self) -> PathBuf {
        self.root.join(NOTES_FILE)
    }

    /// Load contacts; a missing file is an empty address book
    pub fn load_contacts(&self) -> Result<AddressBook> {
        let entries: Vec<Contact> = load_entries(&self.contacts_path())?;
        info!("Loaded {} contacts", entries.len());
        Ok(entries.into_iter().collect())
    }

    pub fn save_contacts(&self, book: &AddressBook) -> Result<()> {
        save_entries(&self.contacts_path(), book.iter())?;
        info!("Saved {} contacts", book.len());
        Ok(())
    }

    /// Load notes; a missing file is an empty collection
    pub fn load_notes(&self) -> Result<Notes> {
        let entries: Vec<Note> = load_entries(&self.notes_path())?;
        info!("Loaded {} notes", entries.len());
        Ok(entries.into_iter().collect())
    }

    pub fn save_notes(&self, notes: &Notes) -> Result<()> {
        save_entries(&self.notes_path(), notes.iter())?;
        info!("Saved {} notes", notes.len());
        Ok(())
    }
}

fn load_entries<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        debug!("No store file at {}, starting empty", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read store file: {}", path.display()))?;
    let file: StoreFile<T> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse store file: {}", path.display()))?;

    if file.version != STORAGE_VERSION {
        anyhow::bail!(
            "Unsupported store version '{}' in {} (expected {})",
            file.version,
            path.display(),
            STORAGE_VERSION
        );
    }

    Ok(file.entries)
}

fn save_entries<'a, T, I>(path: &Path, entries: I) -> Result<()>
where
    T: Serialize + 'a,
    I: Iterator<Item = &'a T>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }

    let file = StoreFile { version: STORAGE_VERSION.to_string(), entries: entries.collect::<Vec<_>>() };
    let content = serde_json::to_string_pretty(&file).context("Failed to serialize store")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write store file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, Birthday, Email, Name, Phone};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn full_contact() -> Contact {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut contact = Contact::new(Name::parse("john smith").unwrap());
        contact.add_phone(Phone::parse("+380501234567").unwrap()).unwrap();
        contact.add_phone(Phone::parse("0441234567").unwrap()).unwrap();
        contact.add_email(Email::parse("john@example.com").unwrap()).unwrap();
        contact.set_birthday(Birthday::parse_at("15.04.1990", today).unwrap());
        contact.add_address(Address::parse("kyiv, main st 1").unwrap()).unwrap();
        contact
    }

    #[test]
    fn test_missing_files_load_empty() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("nested"));
        assert!(storage.load_contacts().unwrap().is_empty());
        assert!(storage.load_notes().unwrap().is_empty());
    }

    #[test]
    fn test_contact_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("data"));
        let book: AddressBook = [full_contact()].into_iter().collect();

        storage.save_contacts(&book).unwrap();
        let loaded = storage.load_contacts().unwrap();

        assert_eq!(loaded, book);
        let contact = loaded.find("john smith").unwrap();
        assert_eq!(contact.phones_display(), "+380501234567, 0441234567");
    }

    #[test]
    fn test_notes_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        let mut note = Note::new("Plan", "ship it");
        note.add_tag("work").unwrap();
        note.add_tag("urgent").unwrap();
        let notes: Notes = [note].into_iter().collect();

        storage.save_notes(&notes).unwrap();
        assert_eq!(storage.load_notes().unwrap(), notes);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        fs::write(storage.notes_path(), r#"{"version":"9","entries":[]}"#).unwrap();
        assert!(storage.load_notes().is_err());
    }

    #[test]
    fn test_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        fs::write(storage.contacts_path(), "not json").unwrap();
        let err = storage.load_contacts().unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse store file"));
    }

    #[test]
    fn test_hand_written_file_is_normalized() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        fs::write(
            storage.contacts_path(),
            r#"{"version":"1.0","entries":[{"name":"  bob ","phones":[" 1234567890"],"birthday":"1990-04-15"}]}"#,
        )
        .unwrap();

        let book = storage.load_contacts().unwrap();
        assert_eq!(book.len(), 1);
        let contact = book.find("bob").unwrap();
        assert_eq!(contact.name().as_str(), "Bob");
        assert_eq!(contact.phones_display(), "1234567890");
        assert!(book.find("BOB").is_some());
    }

    #[test]
    fn test_hand_written_file_with_bad_phone_is_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        fs::write(storage.contacts_path(), r#"{"version":"1.0","entries":[{"name":"bob","phones":["abc"]}]}"#)
            .unwrap();

        let err = storage.load_contacts().unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Failed to parse store file"));
        assert!(message.contains("Invalid phone format"));
    }
}
