use std::collections::HashMap;

use twilight_model::application::command::CommandOptionType;
use twilight_model::guild::Permissions;

/// Translation keys describing a command. `content` is resolved per locale
/// when the slash-command manifest is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandDescription {
    pub content: String,
    pub usage: String,
    pub examples: Vec<String>,
}

/// Voice/player preconditions checked by the dispatch layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerRequirements {
    pub voice: bool,
    pub dj: bool,
    pub active: bool,
    pub dj_perm: Option<Permissions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPermissions {
    /// Restricted to the configured owners.
    pub dev: bool,
    /// What the bot itself needs in the channel.
    pub client: Vec<Permissions>,
    /// What the invoking member needs. Empty means no restriction.
    pub user: Vec<Permissions>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionChoice {
    pub name: String,
    pub value: String,
}

/// A slash-command option. `description` starts out as a translation key and
/// is replaced by its base-locale text during manifest assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    pub kind: CommandOptionType,
    pub required: bool,
    pub choices: Vec<OptionChoice>,
    pub name_localizations: Option<HashMap<String, String>>,
    pub description_localizations: Option<HashMap<String, String>>,
}

impl CommandOption {
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: CommandOptionType) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            choices: Vec::new(),
            name_localizations: None,
            description_localizations: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn choice(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.choices.push(OptionChoice {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

/// Metadata for one bot command, produced once by its module factory.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub aliases: Vec<String>,
    /// Filled in by the loader from the containing directory.
    pub category: String,
    pub description: CommandDescription,
    pub cooldown: u64,
    pub args: bool,
    pub player: PlayerRequirements,
    pub permissions: CommandPermissions,
    pub slash_command: bool,
    pub options: Vec<CommandOption>,
}

impl Command {
    pub fn new(name: impl Into<String>, description_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            category: String::new(),
            description: CommandDescription {
                content: description_key.into(),
                ..Default::default()
            },
            cooldown: 3,
            args: false,
            player: PlayerRequirements::default(),
            permissions: CommandPermissions::default(),
            slash_command: false,
            options: Vec::new(),
        }
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.description.usage = usage.into();
        self
    }

    pub fn examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.description.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    pub fn cooldown(mut self, seconds: u64) -> Self {
        self.cooldown = seconds;
        self
    }

    pub fn args(mut self, args: bool) -> Self {
        self.args = args;
        self
    }

    pub fn player(mut self, player: PlayerRequirements) -> Self {
        self.player = player;
        self
    }

    pub fn dev_only(mut self) -> Self {
        self.permissions.dev = true;
        self
    }

    pub fn client_permissions(mut self, perms: impl IntoIterator<Item = Permissions>) -> Self {
        self.permissions.client = perms.into_iter().collect();
        self
    }

    pub fn user_permissions(mut self, perms: impl IntoIterator<Item = Permissions>) -> Self {
        self.permissions.user = perms.into_iter().collect();
        self
    }

    pub fn slash(mut self, slash_command: bool) -> Self {
        self.slash_command = slash_command;
        self
    }

    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_option_order() {
        let cmd = Command::new("play", "cmd.play.description")
            .aliases(["p"])
            .slash(true)
            .option(CommandOption::new("song", "cmd.play.options.song", CommandOptionType::String).required(true))
            .option(CommandOption::new("source", "cmd.play.options.source", CommandOptionType::String));

        assert_eq!(cmd.aliases, vec!["p".to_string()]);
        assert_eq!(cmd.options[0].name, "song");
        assert!(cmd.options[0].required);
        assert_eq!(cmd.options[1].name, "source");
        assert!(cmd.category.is_empty());
    }
}
