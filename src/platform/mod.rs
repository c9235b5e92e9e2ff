pub mod telegram;

/// A plain-text message received from the chat platform.
#[derive(Debug, Clone)]
pub struct Event {
    /// Chat the reply goes back to.
    pub chat_id: i64,
    /// Display name of the sender.
    pub sender: String,
    /// The message text.
    pub text: String,
}

/// Splits a leading bot command from its arguments.
///
/// The command keeps its `/` but loses any `@botname` suffix; the arguments
/// are whatever follows the first whitespace. Only `/[A-Za-z0-9_]+` counts as
/// command syntax; anything else (plain text included) returns `None`.
pub fn command(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with('/') {
        return None;
    }

    let (head, args) = match text.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args),
        None => (text, ""),
    };
    let name = match head.split_once('@') {
        Some((name, _)) => name,
        None => head,
    };

    // Telegram only lexes /[A-Za-z0-9_]+ as a bot command; a bare "/" or a
    // name with any other character is ordinary text.
    let tail = &name[1..];
    if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return None;
    }

    Some((name, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_splits_name_and_args() {
        assert_eq!(command("/start"), Some(("/start", "")));
        assert_eq!(
            command("/image красивый закат"),
            Some(("/image", "красивый закат"))
        );
    }

    #[test]
    fn test_command_strips_bot_mention() {
        assert_eq!(command("/help@ComradeBot"), Some(("/help", "")));
        assert_eq!(
            command("/image@ComradeBot sunset over ocean"),
            Some(("/image", "sunset over ocean"))
        );
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(command("привет"), None);
        assert_eq!(command(""), None);
        assert_eq!(command("see /help for details"), None);
    }

    #[test]
    fn test_bare_slash_is_not_a_command() {
        assert_eq!(command("/"), None);
        assert_eq!(command("/ привет"), None);
    }

    #[test]
    fn test_slash_text_without_command_syntax_is_plain_text() {
        assert_eq!(command("/привет"), None);
        assert_eq!(command("/what?"), None);
        assert_eq!(command("/re-do the plan"), None);
    }

    #[test]
    fn test_command_names_allow_digits_and_underscore() {
        assert_eq!(command("/start_2 now"), Some(("/start_2", "now")));
    }
}
