//! Contacts and the address book
//!
//! A [`Contact`] owns its multi-valued fields in insertion order and rejects
//! duplicates within itself. The [`AddressBook`] keys contacts by their
//! title-cased name, so lookups are case-insensitive in practice.

use super::fields::{Address, Birthday, Email, Name, Phone};
use crate::error::{AssistantError, FieldKind, Result};
use crate::validators::title_case;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single contact record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    name: Name,
    #[serde(default)]
    phones: Vec<Phone>,
    #[serde(default)]
    emails: Vec<Email>,
    #[serde(default)]
    birthday: Option<Birthday>,
    #[serde(default)]
    addresses: Vec<Address>,
}

impl Contact {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            phones: Vec::new(),
            emails: Vec::new(),
            birthday: None,
            addresses: Vec::new(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn birthday(&self) -> Option<Birthday> {
        self.birthday
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    fn duplicate(&self, field: FieldKind, value: &str) -> AssistantError {
        AssistantError::duplicate(field, value, self.name.as_str())
    }

    // Phones

    pub fn add_phone(&mut self, phone: Phone) -> Result<()> {
        if self.phones.contains(&phone) {
            return Err(self.duplicate(FieldKind::Phone, phone.as_str()));
        }
        self.phones.push(phone);
        Ok(())
    }

    /// Replace `old` in place. Returns `false` when `old` is not present.
    pub fn change_phone(&mut self, old: &str, new: Phone) -> Result<bool> {
        let Some(idx) = self.phones.iter().position(|p| p == old) else {
            return Ok(false);
        };
        if new != *old && self.phones.contains(&new) {
            return Err(self.duplicate(FieldKind::Phone, new.as_str()));
        }
        self.phones[idx] = new;
        Ok(true)
    }

    pub fn delete_phone(&mut self, phone: &str) -> bool {
        let before = self.phones.len();
        self.phones.retain(|p| p != phone);
        self.phones.len() != before
    }

    /// Substring match; an empty query matches any contact with a phone
    pub fn has_phone(&self, query: &str) -> bool {
        self.phones.iter().any(|p| p.as_str().contains(query))
    }

    pub fn phones_display(&self) -> String {
        join(&self.phones, ", ")
    }

    // Emails

    pub fn add_email(&mut self, email: Email) -> Result<()> {
        if self.emails.contains(&email) {
            return Err(self.duplicate(FieldKind::Email, email.as_str()));
        }
        self.emails.push(email);
        Ok(())
    }

    pub fn change_email(&mut self, old: &str, new: Email) -> Result<bool> {
        let Some(idx) = self.emails.iter().position(|e| e == old) else {
            return Ok(false);
        };
        if new != *old && self.emails.contains(&new) {
            return Err(self.duplicate(FieldKind::Email, new.as_str()));
        }
        self.emails[idx] = new;
        Ok(true)
    }

    pub fn delete_email(&mut self, email: &str) -> bool {
        let before = self.emails.len();
        self.emails.retain(|e| e != email);
        self.emails.len() != before
    }

    pub fn has_email(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.emails.iter().any(|e| e.as_str().to_lowercase().contains(&query))
    }

    pub fn emails_display(&self) -> String {
        join(&self.emails, ", ")
    }

    // Addresses

    pub fn add_address(&mut self, address: Address) -> Result<()> {
        if self.addresses.contains(&address) {
            return Err(self.duplicate(FieldKind::Address, address.as_str()));
        }
        self.addresses.push(address);
        Ok(())
    }

    /// Addresses compare title-cased, so `old` may be typed in any case
    pub fn change_address(&mut self, old: &str, new: Address) -> Result<bool> {
        let old = title_case(old.trim());
        let Some(idx) = self.addresses.iter().position(|a| *a == *old) else {
            return Ok(false);
        };
        if new != *old.as_str() && self.addresses.contains(&new) {
            return Err(self.duplicate(FieldKind::Address, new.as_str()));
        }
        self.addresses[idx] = new;
        Ok(true)
    }

    pub fn delete_address(&mut self, address: &str) -> bool {
        let address = title_case(address.trim());
        let before = self.addresses.len();
        self.addresses.retain(|a| *a != *address);
        self.addresses.len() != before
    }

    pub fn has_address(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.addresses.iter().any(|a| a.as_str().to_lowercase().contains(&query))
    }

    pub fn addresses_display(&self) -> String {
        join(&self.addresses, "; ")
    }

    // Birthday

    /// Set the birthday, returning the one it replaced
    pub fn set_birthday(&mut self, birthday: Birthday) -> Option<Birthday> {
        self.birthday.replace(birthday)
    }

    pub fn clear_birthday(&mut self) -> bool {
        self.birthday.take().is_some()
    }

    /// Substring match against the `DD.MM.YYYY` rendering
    pub fn has_birthday(&self, query: &str) -> bool {
        self.birthday.is_some_and(|b| b.to_string().contains(query))
    }

    pub fn birthday_display(&self) -> String {
        self.birthday.map(|b| b.to_string()).unwrap_or_default()
    }

    /// Next anniversary on or after `today`
    pub fn next_birthday(&self, today: NaiveDate) -> Option<NaiveDate> {
        let born = self.birthday?.date();
        let this_year = anniversary(born, today.year());
        if this_year < today {
            Some(anniversary(born, today.year() + 1))
        } else {
            Some(this_year)
        }
    }

    pub fn has_name(&self, query: &str) -> bool {
        self.name.as_str().to_lowercase().contains(&query.to_lowercase())
    }
}

/// 29 February falls back to 28 February in common years
fn anniversary(born: NaiveDate, year: i32) -> NaiveDate {
    born.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(born)
}

fn join<T: AsRef<str>>(items: &[T], sep: &str) -> String {
    items.iter().map(AsRef::<str>::as_ref).collect::<Vec<_>>().join(sep)
}

/// Contact field selected by the `find` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Name,
    Phone,
    Email,
    Address,
    Birthday,
}

impl SearchField {
    /// Pick the field whose keyword appears in `text` (`"phones"` → `Phone`)
    pub fn detect(text: &str) -> Option<Self> {
        let text = text.to_lowercase();
        [
            ("name", Self::Name),
            ("phone", Self::Phone),
            ("email", Self::Email),
            ("address", Self::Address),
            ("birthday", Self::Birthday),
        ]
        .into_iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, field)| field)
    }
}

/// In-memory contact store keyed by title-cased name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    contacts: BTreeMap<String, Contact>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str) -> String {
        title_case(name.trim())
    }

    /// Insert or replace a contact under its own name
    pub fn add(&mut self, contact: Contact) -> Option<Contact> {
        self.contacts.insert(contact.name().as_str().to_string(), contact)
    }

    pub fn find(&self, name: &str) -> Option<&Contact> {
        self.contacts.get(&Self::key(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Contact> {
        self.contacts.get_mut(&Self::key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.contacts.contains_key(&Self::key(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Contact> {
        self.contacts.remove(&Self::key(name))
    }

    /// Re-key a contact. Returns `false` when `old` does not exist.
    pub fn rename(&mut self, old: &str, new_name: Name) -> Result<bool> {
        let old_key = Self::key(old);
        if !self.contacts.contains_key(&old_key) {
            return Ok(false);
        }
        if new_name.as_str() != old_key && self.contacts.contains_key(new_name.as_str()) {
            return Err(AssistantError::duplicate(
                FieldKind::Name,
                new_name.as_str(),
                "another contact",
            ));
        }

        if let Some(mut contact) = self.contacts.remove(&old_key) {
            contact.name = new_name;
            self.add(contact);
        }
        Ok(true)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Name of another contact already holding `phone`
    pub fn phone_owner(&self, phone: &Phone, except: &str) -> Option<&Name> {
        let except = Self::key(except);
        self.iter()
            .find(|c| c.name().as_str() != except && c.phones().contains(phone))
            .map(Contact::name)
    }

    /// Name of another contact already holding `email`
    pub fn email_owner(&self, email: &Email, except: &str) -> Option<&Name> {
        let except = Self::key(except);
        self.iter()
            .find(|c| c.name().as_str() != except && c.emails().contains(email))
            .map(Contact::name)
    }

    pub fn search(&self, field: SearchField, query: &str) -> Vec<&Contact> {
        self.iter()
            .filter(|c| match field {
                SearchField::Name => c.has_name(query),
                SearchField::Phone => c.has_phone(query),
                SearchField::Email => c.has_email(query),
                SearchField::Address => c.has_address(query),
                SearchField::Birthday => c.has_birthday(query),
            })
            .collect()
    }

    /// Contacts whose next birthday is within `days` days of `today`,
    /// soonest first
    pub fn upcoming_birthdays(&self, today: NaiveDate, days: u32) -> Vec<(&Contact, NaiveDate)> {
        let mut upcoming: Vec<_> = self
            .iter()
            .filter_map(|c| c.next_birthday(today).map(|next| (c, next)))
            .filter(|(_, next)| (*next - today).num_days() <= i64::from(days))
            .collect();
        upcoming.sort_by_key(|(_, next)| *next);
        upcoming
    }
}

impl FromIterator<Contact> for AddressBook {
    fn from_iter<I: IntoIterator<Item = Contact>>(iter: I) -> Self {
        let mut book = Self::new();
        for contact in iter {
            book.add(contact);
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str) -> Contact {
        Contact::new(Name::parse(name).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn birthday(text: &str) -> Birthday {
        Birthday::parse_at(text, date(2024, 12, 31)).unwrap()
    }

    #[test]
    fn test_phone_lifecycle() {
        let mut c = contact("john");
        c.add_phone(Phone::parse("1234567890").unwrap()).unwrap();
        c.add_phone(Phone::parse("0987654321").unwrap()).unwrap();

        let dup = c.add_phone(Phone::parse("1234567890").unwrap()).unwrap_err();
        assert!(matches!(dup, AssistantError::Duplicate { field: FieldKind::Phone, .. }));

        assert!(c.change_phone("1234567890", Phone::parse("1111111111").unwrap()).unwrap());
        assert!(!c.change_phone("5555555555", Phone::parse("2222222222").unwrap()).unwrap());
        assert_eq!(c.phones_display(), "1111111111, 0987654321");

        assert!(c.delete_phone("0987654321"));
        assert!(!c.delete_phone("0987654321"));
        assert!(c.has_phone("111"));
    }

    #[test]
    fn test_change_phone_rejects_existing_value() {
        let mut c = contact("john");
        c.add_phone(Phone::parse("1234567890").unwrap()).unwrap();
        c.add_phone(Phone::parse("0987654321").unwrap()).unwrap();
        let before = c.clone();

        assert!(c.change_phone("1234567890", Phone::parse("0987654321").unwrap()).is_err());
        assert_eq!(c, before);
    }

    #[test]
    fn test_address_case_insensitive() {
        let mut c = contact("john");
        c.add_address(Address::parse("kyiv main st").unwrap()).unwrap();
        assert!(c.add_address(Address::parse("KYIV MAIN ST").unwrap()).is_err());
        assert!(c.change_address("kyiv MAIN st", Address::parse("lviv").unwrap()).unwrap());
        assert_eq!(c.addresses_display(), "Lviv");
        assert!(!c.delete_address("kyiv main st"));
        assert!(c.delete_address("LVIV"));
    }

    #[test]
    fn test_birthday_set_and_clear() {
        let mut c = contact("john");
        assert!(!c.clear_birthday());
        assert!(c.set_birthday(birthday("01.02.1990")).is_none());
        assert!(c.set_birthday(birthday("03.02.1990")).is_some());
        assert!(c.has_birthday("02.1990"));
        assert!(c.clear_birthday());
        assert_eq!(c.birthday_display(), "");
    }

    #[test]
    fn test_book_lookup_is_title_cased() {
        let mut book = AddressBook::new();
        book.add(contact("john smith"));
        assert!(book.find("JOHN SMITH").is_some());
        assert!(book.contains(" john smith "));
        assert!(book.remove("john Smith").is_some());
        assert!(book.is_empty());
    }

    #[test]
    fn test_rename() {
        let mut book: AddressBook = [contact("alice"), contact("bob")].into_iter().collect();
        assert!(book.rename("alice", Name::parse("carol").unwrap()).unwrap());
        assert!(book.find("carol").is_some());
        assert!(book.find("alice").is_none());
        assert!(!book.rename("nobody", Name::parse("dave").unwrap()).unwrap());
        assert!(book.rename("carol", Name::parse("bob").unwrap()).is_err());
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_owner_lookup_skips_self() {
        let mut alice = contact("alice");
        let phone = Phone::parse("1234567890").unwrap();
        alice.add_phone(phone.clone()).unwrap();
        let book: AddressBook = [alice, contact("bob")].into_iter().collect();

        assert_eq!(book.phone_owner(&phone, "bob").map(Name::as_str), Some("Alice"));
        assert!(book.phone_owner(&phone, "ALICE").is_none());
    }

    #[test]
    fn test_search_fields() {
        let mut alice = contact("alice");
        alice.add_email(Email::parse("Alice@Example.com").unwrap()).unwrap();
        let book: AddressBook = [alice, contact("bob")].into_iter().collect();

        assert_eq!(SearchField::detect("Emails"), Some(SearchField::Email));
        assert_eq!(SearchField::detect("colour"), None);
        assert_eq!(book.search(SearchField::Email, "example").len(), 1);
        assert_eq!(book.search(SearchField::Name, "O").len(), 1);
    }

    #[test]
    fn test_upcoming_birthdays() {
        let today = date(2024, 12, 28);
        let mut soon = contact("soon");
        soon.set_birthday(birthday("02.01.1990"));
        let mut today_c = contact("today");
        today_c.set_birthday(birthday("28.12.1980"));
        let mut later = contact("later");
        later.set_birthday(birthday("20.01.1990"));
        let book: AddressBook = [soon, today_c, later, contact("none")].into_iter().collect();

        let upcoming = book.upcoming_birthdays(today, 7);
        let names: Vec<_> = upcoming.iter().map(|(c, _)| c.name().as_str()).collect();
        assert_eq!(names, vec!["Today", "Soon"]);
        assert_eq!(upcoming[1].1, date(2025, 1, 2));
    }

    #[test]
    fn test_leap_day_anniversary() {
        let mut c = contact("leap");
        c.set_birthday(birthday("29.02.2000"));
        assert_eq!(c.next_birthday(date(2023, 2, 1)), Some(date(2023, 2, 28)));
        assert_eq!(c.next_birthday(date(2024, 2, 1)), Some(date(2024, 2, 29)));
    }
}
