//! Step-by-step contact creation

use super::{Flow, FlowStep};
use crate::models::{Address, AddressBook, Birthday, Contact, Email, Name, Phone};
use crate::render;
use chrono::{Local, NaiveDate};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Phones,
    Emails,
    Addresses,
    Birthday,
}

/// Value already held by another contact, waiting for the operator's answer
#[derive(Debug, Clone)]
enum Pending {
    Phone(Phone, Name),
    Email(Email, Name),
}

#[derive(Debug, Clone)]
enum State {
    Name,
    Collecting { draft: Contact, field: Field },
    Confirming { draft: Contact, pending: Pending },
}

/// Collects a new contact field by field.
///
/// Blank input closes the current section. The contact is only handed back
/// on `Finished`; the caller adds it to the address book.
#[derive(Debug, Clone)]
pub struct ContactFlow {
    state: State,
    today: NaiveDate,
}

impl Default for ContactFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactFlow {
    pub fn new() -> Self {
        Self::with_today(Local::now().date_naive())
    }

    /// Flow validating birthdays against a fixed date
    pub fn with_today(today: NaiveDate) -> Self {
        Self { state: State::Name, today }
    }

    fn on_name(&self, input: &str, book: &AddressBook) -> (State, FlowStep<Contact>) {
        if input.is_empty() {
            return (State::Name, FlowStep::Continue(Some(render::warning("Name cannot be empty."))));
        }

        let name = match Name::parse(input) {
            Ok(name) => name,
            Err(e) => return (State::Name, FlowStep::Continue(Some(render::error(e.to_string())))),
        };

        if book.contains(name.as_str()) {
            let message = format!("Contact '{}' already exists.", name);
            return (State::Name, FlowStep::Continue(Some(render::warning(message))));
        }

        debug!("Collecting fields for new contact '{}'", name);
        (
            State::Collecting { draft: Contact::new(name), field: Field::Phones },
            FlowStep::Continue(Some(render::success(
                "Now add fields to the contact. Leave empty to stop each section.",
            ))),
        )
    }

    fn on_field(
        &self,
        mut draft: Contact,
        field: Field,
        input: &str,
        book: &AddressBook,
    ) -> (State, FlowStep<Contact>) {
        if input.is_empty() {
            return match field {
                Field::Phones => (State::Collecting { draft, field: Field::Emails }, FlowStep::Continue(None)),
                Field::Emails => (State::Collecting { draft, field: Field::Addresses }, FlowStep::Continue(None)),
                Field::Addresses => (State::Collecting { draft, field: Field::Birthday }, FlowStep::Continue(None)),
                Field::Birthday => (State::Name, FlowStep::Finished(draft)),
            };
        }

        let feedback = match field {
            Field::Phones => match Phone::parse(input) {
                Err(e) => render::error(e.to_string()),
                Ok(phone) => match book.phone_owner(&phone, draft.name().as_str()) {
                    Some(owner) => {
                        let pending = Pending::Phone(phone, owner.clone());
                        return (State::Confirming { draft, pending }, FlowStep::Continue(None));
                    }
                    None => add_phone(&mut draft, phone),
                },
            },
            Field::Emails => match Email::parse(input) {
                Err(e) => render::error(e.to_string()),
                Ok(email) => match book.email_owner(&email, draft.name().as_str()) {
                    Some(owner) => {
                        let pending = Pending::Email(email, owner.clone());
                        return (State::Confirming { draft, pending }, FlowStep::Continue(None));
                    }
                    None => add_email(&mut draft, email),
                },
            },
            Field::Addresses => match Address::parse(input) {
                Err(e) => render::error(e.to_string()),
                Ok(address) => match draft.add_address(address) {
                    Ok(()) => render::success(format!("Address added to {}.", draft.name())),
                    Err(e) => render::error(e.to_string()),
                },
            },
            Field::Birthday => match Birthday::parse_at(input, self.today) {
                Err(e) => render::error(e.to_string()),
                Ok(birthday) => {
                    draft.set_birthday(birthday);
                    return (State::Name, FlowStep::Finished(draft));
                }
            },
        };

        (State::Collecting { draft, field }, FlowStep::Continue(Some(feedback)))
    }

    fn on_confirm(mut draft: Contact, pending: Pending, input: &str) -> (State, FlowStep<Contact>) {
        let accepted = crate::console::is_affirmative(input);
        let (field, feedback) = match pending {
            Pending::Phone(phone, _) => {
                (Field::Phones, accepted.then(|| add_phone(&mut draft, phone)))
            }
            Pending::Email(email, _) => {
                (Field::Emails, accepted.then(|| add_email(&mut draft, email)))
            }
        };

        let feedback = feedback.unwrap_or_else(|| render::warning("Operation cancelled."));
        (State::Collecting { draft, field }, FlowStep::Continue(Some(feedback)))
    }
}

fn add_phone(draft: &mut Contact, phone: Phone) -> String {
    match draft.add_phone(phone) {
        Ok(()) => render::success(format!("Added phone to {}.", draft.name())),
        Err(e) => render::error(e.to_string()),
    }
}

fn add_email(draft: &mut Contact, email: Email) -> String {
    match draft.add_email(email) {
        Ok(()) => render::success(format!("Email added to {}.", draft.name())),
        Err(e) => render::error(e.to_string()),
    }
}

impl Flow for ContactFlow {
    type Store = AddressBook;
    type Output = Contact;

    fn prompt(&self) -> String {
        match &self.state {
            State::Name => render::input("Enter contact name (type \"cancel\" to stop): "),
            State::Collecting { field, .. } => render::input(match field {
                Field::Phones => "Enter phone number: ",
                Field::Emails => "Enter email: ",
                Field::Addresses => "Enter address: ",
                Field::Birthday => "Enter birthday (DD.MM.YYYY, optional): ",
            }),
            State::Confirming { pending, .. } => {
                let (label, owner) = match pending {
                    Pending::Phone(_, owner) => ("phone", owner),
                    Pending::Email(_, owner) => ("email", owner),
                };
                render::warning(format!(
                    "This {} is already used in contact '{}'. Proceed anyway? (y/n): ",
                    label, owner
                ))
            }
        }
    }

    fn advance(&mut self, input: &str, book: &AddressBook) -> FlowStep<Contact> {
        let input = input.trim();
        let (state, step) = match std::mem::replace(&mut self.state, State::Name) {
            State::Name => self.on_name(input, book),
            State::Collecting { draft, field } => self.on_field(draft, field, input, book),
            State::Confirming { draft, pending } => Self::on_confirm(draft, pending, input),
        };
        self.state = state;
        step
    }

    fn confirming(&self) -> bool {
        matches!(self.state, State::Confirming { .. })
    }

    fn cancel_message(&self) -> String {
        "Contact creation cancelled.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::flows::{FlowEnd, drive};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn run(lines: &[&str], book: &AddressBook) -> (FlowEnd<Contact>, ScriptedConsole) {
        let mut console = ScriptedConsole::new(lines.iter().copied());
        let mut flow = ContactFlow::with_today(today());
        let end = drive(&mut flow, book, &mut console).unwrap();
        (end, console)
    }

    fn finished(end: FlowEnd<Contact>) -> Contact {
        match end {
            FlowEnd::Finished(contact) => contact,
            FlowEnd::Cancelled(reason) => panic!("flow cancelled: {reason}"),
        }
    }

    #[test]
    fn test_collects_all_fields() {
        let book = AddressBook::new();
        let lines = [
            "john smith",
            "1234567890",
            "0987654321",
            "",
            "john@example.com",
            "",
            "kyiv, main st",
            "",
            "15.04.1990",
        ];
        let (end, _) = run(&lines, &book);
        let contact = finished(end);

        assert_eq!(contact.name().as_str(), "John Smith");
        assert_eq!(contact.phones_display(), "1234567890, 0987654321");
        assert_eq!(contact.emails_display(), "john@example.com");
        assert_eq!(contact.addresses_display(), "Kyiv, Main St");
        assert_eq!(contact.birthday_display(), "15.04.1990");
    }

    #[test]
    fn test_invalid_values_reprompt() {
        let book = AddressBook::new();
        let lines = ["", "bob", "123", "", "not-an-email", "", "", "31.02.1990", ""];
        let (end, console) = run(&lines, &book);
        let contact = finished(end);

        assert!(contact.phones().is_empty());
        assert!(contact.emails().is_empty());
        assert!(contact.birthday().is_none());
        let transcript = console.transcript();
        assert!(transcript.contains("Name cannot be empty."));
        assert!(transcript.contains("Invalid phone format"));
        assert!(transcript.contains("Invalid email format"));
        assert!(transcript.contains("Invalid date format"));
    }

    #[test]
    fn test_cancel_at_name() {
        let book = AddressBook::new();
        let (end, _) = run(&["Cancel"], &book);
        assert_eq!(end, FlowEnd::Cancelled("Contact creation cancelled.".to_string()));
    }

    #[test]
    fn test_cancel_mid_flow_returns_nothing() {
        let book = AddressBook::new();
        let (end, console) = run(&["alice", "1234567890", "cancel", "never read"], &book);
        assert!(matches!(end, FlowEnd::Cancelled(_)));
        assert_eq!(console.remaining(), 1);
    }

    #[test]
    fn test_end_of_input_cancels() {
        let book = AddressBook::new();
        let (end, _) = run(&["alice", "1234567890"], &book);
        assert!(matches!(end, FlowEnd::Cancelled(_)));
    }

    #[test]
    fn test_existing_name_reprompts() {
        let book: AddressBook = [Contact::new(Name::parse("alice").unwrap())].into_iter().collect();
        let (end, console) = run(&["ALICE", "bob", "", "", "", ""], &book);
        assert_eq!(finished(end).name().as_str(), "Bob");
        assert!(console.transcript().contains("Contact 'Alice' already exists."));
    }

    #[test]
    fn test_shared_phone_needs_confirmation() {
        let phone = Phone::parse("1234567890").unwrap();
        let mut alice = Contact::new(Name::parse("alice").unwrap());
        alice.add_phone(phone.clone()).unwrap();
        let book: AddressBook = [alice].into_iter().collect();

        let (declined, console) = run(&["bob", "1234567890", "n", "", "", "", ""], &book);
        assert!(finished(declined).phones().is_empty());
        assert!(console.prompts().iter().any(|p| p.contains("already used in contact 'Alice'")));
        assert!(console.transcript().contains("Operation cancelled."));

        // "cancel" answers the question instead of aborting the flow
        let (declined, _) = run(&["bob", "1234567890", "cancel", "", "", "", ""], &book);
        assert!(finished(declined).phones().is_empty());

        let (accepted, _) = run(&["bob", "1234567890", "y", "", "", "", ""], &book);
        assert_eq!(finished(accepted).phones(), [phone]);
    }
}
