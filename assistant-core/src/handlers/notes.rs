use super::{CommandContext, Outcome};
use crate::error::Result;
use crate::flows::{self, FlowEnd, NoteEditFlow, NoteFlow};
use crate::render;
use crate::validators::validate_title;
use tracing::info;

fn not_found(title: &str) -> Result<Outcome> {
    Ok(Outcome::error(format!("Note '{}' not found.", title)))
}

pub(super) fn all(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    if ctx.notes.is_empty() {
        return Ok(Outcome::warning("No notes found."));
    }
    Ok(Outcome::Message(render::notes_table(ctx.notes.iter(), "All notes")))
}

pub(super) fn add(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    if !ctx.args.is_empty() {
        return Ok(Outcome::info("'add-note' asks for the title, text and tags in turn, type it without arguments."));
    }

    let mut flow = NoteFlow::new();
    match flows::drive(&mut flow, &*ctx.notes, &mut *ctx.console)? {
        FlowEnd::Finished(note) => {
            let title = note.title().to_string();
            ctx.notes.add(note);
            info!("Added note '{}'", title);
            Ok(Outcome::success(format!("Note '{}' added successfully.", title)))
        }
        FlowEnd::Cancelled(reason) => Ok(Outcome::warning(reason)),
    }
}

pub(super) fn delete(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [title] = ctx.expect()?;
    match ctx.notes.remove(title) {
        Some(_) => {
            info!("Deleted note '{}'", title);
            Ok(Outcome::success(format!("Note '{}' deleted.", title)))
        }
        None => not_found(title),
    }
}

pub(super) fn change_title(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [old, new] = ctx.expect()?;
    let new = validate_title(new)?;
    if !ctx.notes.rename(old, &new)? {
        return not_found(old);
    }
    Ok(Outcome::success(format!("Note '{}' renamed to '{}'.", old, new)))
}

pub(super) fn change(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    if !ctx.args.is_empty() {
        return Ok(Outcome::info("'change-note' asks which note to edit, type it without arguments."));
    }

    let mut flow = NoteEditFlow::new();
    let edit = match flows::drive(&mut flow, &*ctx.notes, &mut *ctx.console)? {
        FlowEnd::Finished(edit) => edit,
        FlowEnd::Cancelled(reason) => return Ok(Outcome::warning(reason)),
    };

    if let Some(content) = &edit.content {
        let Some(note) = ctx.notes.find_mut(&edit.title) else {
            return not_found(&edit.title);
        };
        note.set_content(content.as_str());
    }
    if let Some(new_title) = &edit.new_title {
        if !ctx.notes.rename(&edit.title, new_title)? {
            return not_found(&edit.title);
        }
    }

    Ok(Outcome::success(format!("Note '{}' updated successfully.", edit.final_title())))
}

pub(super) fn find(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let keyword = ctx.joined()?;
    let results = ctx.notes.search(&keyword);
    if results.is_empty() {
        return Ok(Outcome::warning("No notes found."));
    }
    Ok(Outcome::Message(render::notes_table(results, "Search results")))
}

// Tags

pub(super) fn add_tag(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [title, tag] = ctx.expect()?;
    let Some(note) = ctx.notes.find_mut(title) else {
        return not_found(title);
    };
    note.add_tag(tag)?;
    Ok(Outcome::success(format!("Tag '{}' added to note '{}'.", tag.trim(), title)))
}

pub(super) fn find_tag(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [tag] = ctx.expect()?;
    let results = ctx.notes.by_tag(tag);
    if results.is_empty() {
        return Ok(Outcome::warning(format!("No notes found with tag '{}'.", tag)));
    }
    Ok(Outcome::Message(render::notes_table(results, &format!("Notes tagged '{}'", tag))))
}

pub(super) fn edit_tag(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [title, old, new] = ctx.expect()?;
    let Some(note) = ctx.notes.find_mut(title) else {
        return not_found(title);
    };
    if !note.edit_tag(old, new)? {
        return Ok(Outcome::warning(format!("Tag '{}' not found in note '{}'.", old, title)));
    }
    Ok(Outcome::success(format!("Tag '{}' changed to '{}' in note '{}'.", old, new.trim(), title)))
}

pub(super) fn delete_tag(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    let [title, tag] = ctx.expect()?;
    let Some(note) = ctx.notes.find_mut(title) else {
        return not_found(title);
    };
    if !note.delete_tag(tag) {
        return Ok(Outcome::warning(format!("Tag '{}' not found in note '{}'.", tag, title)));
    }
    Ok(Outcome::success(format!("Tag '{}' deleted from note '{}'.", tag, title)))
}
