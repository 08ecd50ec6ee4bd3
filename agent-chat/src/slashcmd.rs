use regex::Regex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashCommandCall {
    pub name: String,
    pub args: String,
}

pub struct SlashCommandInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub aliases: &'static [&'static str],
}

impl SlashCommandInfo {
    pub fn slash_name(&self) -> String {
        if self.aliases.is_empty() {
            format!("/{}", self.name)
        } else {
            format!("/{} ({})", self.name, self.aliases.join(", "))
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

pub const SLASH_COMMANDS: &[SlashCommandInfo] = &[
    SlashCommandInfo {
        name: "help",
        description: "Show available commands.",
        aliases: &["?"],
    },
    SlashCommandInfo {
        name: "history",
        description: "Print the conversation so far.",
        aliases: &[],
    },
    SlashCommandInfo {
        name: "exit",
        description: "End the session.",
        aliases: &["quit"],
    },
];

pub fn find_command(name: &str) -> Option<&'static SlashCommandInfo> {
    SLASH_COMMANDS.iter().find(|command| command.matches(name))
}

/// Splits `/name args` into its parts. Returns `None` for ordinary text.
pub fn parse_slash_command_call(user_input: &str) -> Option<SlashCommandCall> {
    let user_input = user_input.trim();
    if user_input.is_empty() || !user_input.starts_with('/') {
        return None;
    }

    let re = Regex::new(r"^/([a-zA-Z0-9_?-]+)").ok()?;
    let captures = re.captures(user_input)?;
    let command_name = captures.get(1)?.as_str();
    let whole_match = captures.get(0)?;

    let rest = user_input.get(whole_match.end()..).unwrap_or("");
    if let Some(next_char) = rest.chars().next() {
        if !next_char.is_whitespace() {
            return None;
        }
    }

    Some(SlashCommandCall {
        name: command_name.to_string(),
        args: rest.trim_start().to_string(),
    })
}
