use super::{CommandContext, Outcome};
use crate::error::{AssistantError, FieldKind, Result};
use crate::flows::{self, ContactFlow, FlowEnd};
use crate::models::{Address, Birthday, Email, Name, Phone, SearchField};
use crate::render;
use tracing::info;

const NOT_FOUND: &str = "Contact not found.";
const CANCELLED: &str = "Operation cancelled.";

fn not_found() -> Result<Outcome> {
    Ok(Outcome::error(NOT_FOUND))
}

/// Ask before reusing a value another contact already holds
fn approve_shared(ctx: &mut CommandContext<'_>, field: FieldKind, owner: Option<Name>) -> Result<bool> {
    match owner {
        None => Ok(true),
        Some(owner) => ctx.confirm(&format!(
            "This {} is already used in contact '{}'. Proceed anyway? (y/n): ",
            field.label(),
            owner
        )),
    }
}

pub(super) fn all(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    if ctx.book.is_empty() {
        return Ok(Outcome::warning("No records found."));
    }
    Ok(Outcome::Message(render::contacts_table(ctx.book.iter(), "All contacts")))
}

pub(super) fn add(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    if !ctx.args.is_empty() {
        return Ok(Outcome::info("'add' asks for each field in turn, type it without arguments."));
    }

    let mut flow = ContactFlow::with_today(ctx.today);
    match flows::drive(&mut flow, &*ctx.book, &mut *ctx.console)? {
        FlowEnd::Finished(contact) => {
            let name = contact.name().to_string();
            ctx.book.add(contact);
            info!("Added contact '{}'", name);
            Ok(Outcome::success(format!("Contact '{}' added successfully.", name)))
        }
        FlowEnd::Cancelled(reason) => Ok(Outcome::warning(reason)),
    }
}

pub(super) fn find(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let (field, query) = ctx.first_and_rest()?;
    let Some(field) = SearchField::detect(field) else {
        return Ok(Outcome::error(format!("Unknown field: '{}'.", field)));
    };

    let results = ctx.book.search(field, &query);
    if results.is_empty() {
        return Ok(Outcome::warning("No records found."));
    }
    Ok(Outcome::Message(render::contacts_table(results, "Search results")))
}

pub(super) fn delete_contact(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name] = ctx.expect()?;
    match ctx.book.remove(name) {
        Some(contact) => {
            info!("Deleted contact '{}'", contact.name());
            Ok(Outcome::success(format!("Contact '{}' deleted.", contact.name())))
        }
        None => not_found(),
    }
}

// Phones

pub(super) fn add_phone(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name, phone] = ctx.expect()?;
    if !ctx.book.contains(name) {
        return not_found();
    }

    let phone = Phone::parse(phone)?;
    let owner = ctx.book.phone_owner(&phone, name).cloned();
    if !approve_shared(ctx, FieldKind::Phone, owner)? {
        return Ok(Outcome::warning(CANCELLED));
    }

    let Some(contact) = ctx.book.find_mut(name) else {
        return not_found();
    };
    contact.add_phone(phone)?;
    Ok(Outcome::success(format!("Phone added to {}.", contact.name())))
}

pub(super) fn change_phone(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name, old, new] = ctx.expect()?;
    let Some(contact) = ctx.book.find(name) else {
        return not_found();
    };
    if !contact.phones().iter().any(|p| *p == *old) {
        return Ok(Outcome::error(format!("Couldn't find {}'s phone '{}'.", contact.name(), old)));
    }

    let new = Phone::parse(new)?;
    let owner = ctx.book.phone_owner(&new, name).cloned();
    if !approve_shared(ctx, FieldKind::Phone, owner)? {
        return Ok(Outcome::warning(CANCELLED));
    }

    let Some(contact) = ctx.book.find_mut(name) else {
        return not_found();
    };
    let message = format!("Phone for {} changed from {} to {}.", contact.name(), old, new);
    if !contact.change_phone(old, new)? {
        return Ok(Outcome::error(format!("Couldn't find {}'s phone '{}'.", contact.name(), old)));
    }
    Ok(Outcome::success(message))
}

pub(super) fn delete_phone(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name, phone] = ctx.expect()?;
    if let Some(contact) = ctx.book.find_mut(name) {
        if contact.delete_phone(phone) {
            return Ok(Outcome::success(format!("Phone '{}' deleted from {}.", phone, contact.name())));
        }
    }
    Ok(Outcome::error("Contact or phone not found."))
}

pub(super) fn show_phones(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name] = ctx.expect()?;
    let Some(contact) = ctx.book.find(name) else {
        return not_found();
    };
    if contact.phones().is_empty() {
        return Ok(Outcome::warning(format!("{} has no phones.", contact.name())));
    }
    Ok(Outcome::Message(render::search(format!("{}: {}", contact.name(), contact.phones_display()))))
}

pub(super) fn change_name(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [old, new] = ctx.expect()?;
    let new = Name::parse(new)?;
    let renamed = new.to_string();

    if !ctx.book.rename(old, new)? {
        return not_found();
    }
    info!("Renamed contact '{}' to '{}'", old, renamed);
    Ok(Outcome::success(format!("Contact '{}' renamed to '{}'.", old, renamed)))
}

// Emails

pub(super) fn add_email(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name, email] = ctx.expect()?;
    if !ctx.book.contains(name) {
        return not_found();
    }

    let email = Email::parse(email)?;
    let owner = ctx.book.email_owner(&email, name).cloned();
    if !approve_shared(ctx, FieldKind::Email, owner)? {
        return Ok(Outcome::warning(CANCELLED));
    }

    let Some(contact) = ctx.book.find_mut(name) else {
        return not_found();
    };
    contact.add_email(email)?;
    Ok(Outcome::success(format!("Email added to {}.", contact.name())))
}

pub(super) fn change_email(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name, old, new] = ctx.expect()?;
    let Some(contact) = ctx.book.find(name) else {
        return not_found();
    };
    if !contact.emails().iter().any(|e| *e == *old) {
        return Ok(Outcome::error(format!("Couldn't find {}'s email '{}'.", contact.name(), old)));
    }

    let new = Email::parse(new)?;
    let owner = ctx.book.email_owner(&new, name).cloned();
    if !approve_shared(ctx, FieldKind::Email, owner)? {
        return Ok(Outcome::warning(CANCELLED));
    }

    let Some(contact) = ctx.book.find_mut(name) else {
        return not_found();
    };
    let message = format!("Email for {} changed from {} to {}.", contact.name(), old, new);
    if !contact.change_email(old, new)? {
        return Ok(Outcome::error(format!("Couldn't find {}'s email '{}'.", contact.name(), old)));
    }
    Ok(Outcome::success(message))
}

pub(super) fn delete_email(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name, email] = ctx.expect()?;
    if let Some(contact) = ctx.book.find_mut(name) {
        if contact.delete_email(email) {
            return Ok(Outcome::success(format!("Email '{}' deleted from {}.", email, contact.name())));
        }
    }
    Ok(Outcome::error("Contact or email not found."))
}

pub(super) fn show_emails(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name] = ctx.expect()?;
    let Some(contact) = ctx.book.find(name) else {
        return not_found();
    };
    if contact.emails().is_empty() {
        return Ok(Outcome::warning(format!("{} has no emails.", contact.name())));
    }
    Ok(Outcome::Message(render::search(format!("{}: {}", contact.name(), contact.emails_display()))))
}

// Birthday

pub(super) fn add_birthday(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name, date] = ctx.expect()?;
    let today = ctx.today;
    let Some(contact) = ctx.book.find_mut(name) else {
        return not_found();
    };

    let birthday = Birthday::parse_at(date, today)?;
    match contact.set_birthday(birthday) {
        Some(previous) => Ok(Outcome::warning(format!(
            "Birthday for {} was already set to {}. Updated to {}.",
            contact.name(),
            previous,
            birthday
        ))),
        None => Ok(Outcome::success(format!("Birthday added to {}.", contact.name()))),
    }
}

pub(super) fn change_birthday(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name, date] = ctx.expect()?;
    let today = ctx.today;
    let Some(contact) = ctx.book.find_mut(name) else {
        return not_found();
    };

    let birthday = Birthday::parse_at(date, today)?;
    contact.set_birthday(birthday);
    Ok(Outcome::success(format!("Birthday for {} changed to {}.", contact.name(), birthday)))
}

pub(super) fn delete_birthday(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name] = ctx.expect()?;
    let Some(contact) = ctx.book.find_mut(name) else {
        return not_found();
    };
    if !contact.clear_birthday() {
        return Ok(Outcome::warning("Birthday wasn't set."));
    }
    Ok(Outcome::success(format!("Birthday deleted from {}.", contact.name())))
}

pub(super) fn birthdays(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let days = match ctx.args {
        [] => ctx.config.birthday_window_days,
        [days] => days.trim().parse::<u32>().map_err(|_| AssistantError::usage(ctx.usage))?,
        _ => return Err(AssistantError::usage(ctx.usage)),
    };

    let upcoming = ctx.book.upcoming_birthdays(ctx.today, days);
    if upcoming.is_empty() {
        return Ok(Outcome::info("No upcoming birthdays."));
    }

    let lines: Vec<String> = upcoming
        .iter()
        .map(|(contact, date)| format!("{}: {}", contact.name(), date.format("%d.%m.%Y")))
        .collect();
    Ok(Outcome::Message(render::search(lines.join("\n"))))
}

// Addresses

pub(super) fn add_address(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let (name, address) = ctx.first_and_rest()?;
    let Some(contact) = ctx.book.find_mut(name) else {
        return not_found();
    };

    contact.add_address(Address::parse(&address)?)?;
    Ok(Outcome::success(format!("Address added to {}.", contact.name())))
}

pub(super) fn change_address(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name, old, new] = ctx.expect()?;
    let Some(contact) = ctx.book.find_mut(name) else {
        return not_found();
    };

    let new = Address::parse(new)?;
    let message = format!("Address for {} changed to {}.", contact.name(), new);
    if !contact.change_address(old, new)? {
        return Ok(Outcome::error(format!("Couldn't find {}'s address '{}'.", contact.name(), old)));
    }
    Ok(Outcome::success(message))
}

pub(super) fn delete_address(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let (name, address) = ctx.first_and_rest()?;
    let Some(contact) = ctx.book.find_mut(name) else {
        return not_found();
    };
    if !contact.delete_address(&address) {
        return Ok(Outcome::warning(format!("Address '{}' not found for {}.", address, contact.name())));
    }
    Ok(Outcome::success(format!("Address deleted from {}.", contact.name())))
}

pub(super) fn show_addresses(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [name] = ctx.expect()?;
    let Some(contact) = ctx.book.find(name) else {
        return not_found();
    };
    if contact.addresses().is_empty() {
        return Ok(Outcome::warning(format!("{} has no addresses.", contact.name())));
    }
    Ok(Outcome::Message(render::search(format!("{}: {}", contact.name(), contact.addresses_display()))))
}
