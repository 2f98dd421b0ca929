use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Channel admin bot commands:")]
pub enum Command {
    #[command(description = "open the admin menu")]
    Start,
    #[command(description = "leave the current menu")]
    Cancel,
    #[command(description = "show this help")]
    Help,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert!(matches!(
            Command::parse("/start", "chanadmin_bot"),
            Ok(Command::Start)
        ));
        assert!(matches!(
            Command::parse("/cancel@chanadmin_bot", "chanadmin_bot"),
            Ok(Command::Cancel)
        ));
        assert!(Command::parse("hello", "chanadmin_bot").is_err());
        assert!(Command::parse("/start@other_bot", "chanadmin_bot").is_err());
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = Command::descriptions().to_string();
        for command in ["/start", "/cancel", "/help"] {
            assert!(help.contains(command), "{} missing from {}", command, help);
        }
    }
}
