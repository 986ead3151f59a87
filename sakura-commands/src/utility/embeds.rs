use crate::CommandMeta;

pub fn unknown_category_message(wanted_category: &str, valid_categories: &[&str]) -> String {
    let valid = valid_categories
        .iter()
        .map(|category| display_category(category))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Unknown category: {}\nValid categories: {}",
        display_category(wanted_category),
        valid
    )
}

pub fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", display_category(command.category)));
            current_category = Some(command.category);
        }

        out.push_str(&format!("`{}`: {}\n", command.name, command.desc));
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

/// Render a unix timestamp as a Discord relative time tag.
pub fn relative_time(unix_secs: u64) -> String {
    format!("<t:{unix_secs}:R>")
}

fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{grouped_help_description, unknown_category_message};
    use crate::CommandMeta;

    const PING: CommandMeta = CommandMeta {
        name: "ping",
        desc: "Replies with Pong!",
        category: "utility",
        usage: "!ping",
    };
    const TN: CommandMeta = CommandMeta {
        name: "translatename",
        desc: "Translate a name.",
        category: "nickname",
        usage: "!translatename",
    };

    #[test]
    fn groups_by_category() {
        let description = grouped_help_description(&[&TN, &PING]);
        assert_eq!(
            description,
            "**Nickname**\n`translatename`: Translate a name.\n\n**Utility**\n`ping`: Replies with Pong!"
        );
    }

    #[test]
    fn unknown_category_lists_valid_ones() {
        assert_eq!(
            unknown_category_message("fun", &["nickname", "utility"]),
            "Unknown category: Fun\nValid categories: Nickname, Utility"
        );
    }
}
