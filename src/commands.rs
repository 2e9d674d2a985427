/// Commands the bot reacts to. Anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Phrase,
    Slap,
}

/// Plain-text messages that behave like `/phrase`. Matched literally.
pub const PHRASE_TRIGGERS: &[&str] = &[
    "!фраза",
    "!фразочка",
    "!фраza",
    "!fraza",
    "!frazochka",
    "!frazo4ka",
    "/фраза",
];

impl Command {
    /// Map a command token (without `/` and `@botname`) to a command.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "add" => Some(Self::Add),
            "phrase" | "fraza" | "frazochka" => Some(Self::Phrase),
            "slap" => Some(Self::Slap),
            _ => None,
        }
    }

    /// Match a whole message text against the phrase triggers.
    pub fn from_trigger(text: &str) -> Option<Self> {
        PHRASE_TRIGGERS.contains(&text).then_some(Self::Phrase)
    }

    /// Commands published to the platform menu, with their descriptions.
    pub fn menu() -> Vec<(&'static str, &'static str)> {
        vec![
            ("add", "Добавить фразочку: /add <текст>"),
            ("phrase", "!фраза"),
            ("slap", "Слапнуть: /slap [имя]"),
        ]
    }
}

/// Split a command invocation into its name and argument string.
///
/// Follows Telegram's `bot_command` rules: `/` then `[A-Za-z0-9_]+`, an
/// optional `@botname`, then end of text or whitespace. The argument is
/// everything after the token minus one separator character.
pub fn parse_command(text: &str) -> Option<(String, String)> {
    let rest = text.strip_prefix('/')?;

    let token_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let token = &rest[..token_end];

    let name = match token.split_once('@') {
        Some((name, bot)) if is_command_word(bot) => name,
        Some(_) => return None,
        None => token,
    };
    if !is_command_word(name) {
        return None;
    }

    let after = &rest[token_end..];
    let args = match after.chars().next() {
        Some(sep) => &after[sep.len_utf8()..],
        None => "",
    };

    Some((name.to_string(), args.to_string()))
}

fn is_command_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(name: &str, args: &str) -> Option<(String, String)> {
        Some((name.to_string(), args.to_string()))
    }

    #[test]
    fn test_parses_bare_command() {
        assert_eq!(parse_command("/phrase"), cmd("phrase", ""));
    }

    #[test]
    fn test_parses_arguments() {
        assert_eq!(parse_command("/add hello world"), cmd("add", "hello world"));
    }

    #[test]
    fn test_skips_exactly_one_separator() {
        assert_eq!(parse_command("/add  padded"), cmd("add", " padded"));
        assert_eq!(parse_command("/add\nnext line"), cmd("add", "next line"));
    }

    #[test]
    fn test_strips_bot_mention() {
        assert_eq!(parse_command("/slap@utphrase_bot Dutch"), cmd("slap", "Dutch"));
    }

    #[test]
    fn test_rejects_non_command_text() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("/ add"), None);
        assert_eq!(parse_command("/фраза"), None);
        assert_eq!(parse_command("/add@"), None);
        assert_eq!(parse_command("/add-more"), None);
    }

    #[test]
    fn test_command_tokens_and_aliases() {
        assert_eq!(Command::from_token("add"), Some(Command::Add));
        assert_eq!(Command::from_token("phrase"), Some(Command::Phrase));
        assert_eq!(Command::from_token("fraza"), Some(Command::Phrase));
        assert_eq!(Command::from_token("frazochka"), Some(Command::Phrase));
        assert_eq!(Command::from_token("slap"), Some(Command::Slap));
        assert_eq!(Command::from_token("Add"), None);
        assert_eq!(Command::from_token("start"), None);
    }

    #[test]
    fn test_triggers_match_literally() {
        for trigger in PHRASE_TRIGGERS {
            assert_eq!(Command::from_trigger(trigger), Some(Command::Phrase));
        }
        assert_eq!(Command::from_trigger("!фраза "), None);
        assert_eq!(Command::from_trigger("!ФРАЗА"), None);
        assert_eq!(Command::from_trigger("фраза"), None);
    }

    #[test]
    fn test_menu_tokens_are_known_commands() {
        for (token, description) in Command::menu() {
            assert!(Command::from_token(token).is_some(), "{}", token);
            assert!(!description.is_empty());
        }
    }
}
