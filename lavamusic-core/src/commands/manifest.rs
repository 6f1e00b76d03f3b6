// File: lavamusic-core/src/commands/manifest.rs
//
// Projection of command metadata into the platform's slash-command schema,
// with name/description locale maps filled from the i18n tables.

use std::collections::HashMap;

use twilight_model::application::command::{
    Command as ManifestEntry, CommandOption as ManifestOption, CommandOptionChoice,
    CommandOptionChoiceValue, CommandOptionType, CommandType,
};
use twilight_model::guild::Permissions;
use twilight_util::builder::command::CommandBuilder;

use lavamusic_common::models::{Command, CommandOption};

use crate::i18n::I18n;

/// Locale -> translated text, one entry per configured locale.
pub type LocaleMap = HashMap<String, String>;

/// Build the name and description locale maps for one `(name, description)`
/// key pair. Every locale produces exactly one entry in each map; misses are
/// covered by the resolver's fallback, never by omission.
pub fn locale_maps(i18n: &I18n, locales: &[String], name: &str, description: &str) -> (LocaleMap, LocaleMap) {
    let mut names = LocaleMap::with_capacity(locales.len());
    let mut descriptions = LocaleMap::with_capacity(locales.len());
    for locale in locales {
        let localized = i18n.localize(locale, name, description);
        names.insert(localized.name.0, localized.name.1);
        descriptions.insert(localized.description.0, localized.description.1);
    }
    (names, descriptions)
}

/// `None` means "no restriction": the field is left out of the manifest.
pub fn default_member_permissions(user: &[Permissions]) -> Option<Permissions> {
    if user.is_empty() {
        return None;
    }
    Some(user.iter().fold(Permissions::empty(), |acc, p| acc | *p))
}

/// Assemble the manifest entry for `command`.
///
/// This also localizes the command's options in place: each option gets its
/// locale maps, and its `description` key is replaced by the base-locale
/// text. The key is gone afterwards, so assemble a command only once.
pub fn assemble(i18n: &I18n, command: &mut Command) -> ManifestEntry {
    let base = i18n.base_locale();
    let locales = i18n.locales();

    let (name_localizations, description_localizations) =
        locale_maps(i18n, &locales, &command.name, &command.description.content);

    for option in &mut command.options {
        let (names, descriptions) = locale_maps(i18n, &locales, &option.name, &option.description);
        option.name_localizations = Some(names);
        option.description_localizations = Some(descriptions);
        option.description = i18n.translate(base, &option.description);
    }

    let mut builder = CommandBuilder::new(
        command.name.clone(),
        i18n.translate(base, &command.description.content),
        CommandType::ChatInput,
    )
    .name_localizations(name_localizations)
    .description_localizations(description_localizations);

    if let Some(perms) = default_member_permissions(&command.permissions.user) {
        builder = builder.default_member_permissions(perms);
    }
    for option in &command.options {
        builder = builder.option(project_option(option));
    }

    builder.build()
}

fn project_option(option: &CommandOption) -> ManifestOption {
    let choices = if option.choices.is_empty() {
        None
    } else {
        Some(
            option
                .choices
                .iter()
                .map(|c| CommandOptionChoice {
                    name: c.name.clone(),
                    name_localizations: None,
                    value: choice_value(option.kind, &c.value),
                })
                .collect(),
        )
    };

    ManifestOption {
        autocomplete: None,
        channel_types: None,
        choices,
        description: option.description.clone(),
        description_localizations: option.description_localizations.clone(),
        kind: option.kind,
        max_length: None,
        max_value: None,
        min_length: None,
        min_value: None,
        name: option.name.clone(),
        name_localizations: option.name_localizations.clone(),
        options: None,
        required: Some(option.required),
    }
}

fn choice_value(kind: CommandOptionType, raw: &str) -> CommandOptionChoiceValue {
    match kind {
        CommandOptionType::Integer => raw
            .parse()
            .map(CommandOptionChoiceValue::Integer)
            .unwrap_or_else(|_| CommandOptionChoiceValue::String(raw.to_string())),
        CommandOptionType::Number => raw
            .parse()
            .map(CommandOptionChoiceValue::Number)
            .unwrap_or_else(|_| CommandOptionChoiceValue::String(raw.to_string())),
        _ => CommandOptionChoiceValue::String(raw.to_string()),
    }
}
