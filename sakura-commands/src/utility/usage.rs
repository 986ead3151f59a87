use sakura_core::{Context, Error};

use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    desc: "Show usage syntax for a specific command.",
    category: "utility",
    usage: "!usage <command>",
};

const ALIASES: &[(&str, &str)] = &[
    ("tn", "translatename"),
    ("tt", "translatetext"),
    ("tall", "translateall"),
    ("rn", "resetname"),
    ("rname", "randomname"),
];

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn usage(
    ctx: Context<'_>,
    #[description = "Command name"] command: Option<String>,
) -> Result<(), Error> {
    let Some(raw_name) = command.as_deref() else {
        ctx.say(format!("Usage: `{}`", META.usage)).await?;
        return Ok(());
    };

    let lookup = canonical_name(raw_name);

    let Some(command) = COMMANDS.iter().find(|command| command.name == lookup) else {
        ctx.say(format!("Unknown command: `{}`", lookup)).await?;
        return Ok(());
    };

    ctx.say(format!("Usage: `{}`", command.usage)).await?;
    Ok(())
}

fn canonical_name(raw: &str) -> String {
    let lookup = raw.trim().trim_start_matches('!').to_ascii_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == lookup)
        .map(|(_, name)| (*name).to_owned())
        .unwrap_or(lookup)
}

#[cfg(test)]
mod tests {
    use super::canonical_name;

    #[test]
    fn aliases_resolve() {
        assert_eq!(canonical_name("!tn"), "translatename");
        assert_eq!(canonical_name(" TALL "), "translateall");
        assert_eq!(canonical_name("help"), "help");
    }
}
