use super::{CommandContext, Outcome};
use crate::error::Result;
use crate::render;

pub(super) fn help(ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    Ok(Outcome::Message(render::help_table(ctx.registry)))
}

pub(super) fn hello(_: &mut CommandContext<'_>) -> Result<Outcome> {
    Ok(Outcome::Message(render::greet("How can I help you, my Lord?")))
}

pub(super) fn exit(_: &mut CommandContext<'_>) -> Result<Outcome> {
    Ok(Outcome::Exit)
}
