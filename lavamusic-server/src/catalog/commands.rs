// File: lavamusic-server/src/catalog/commands.rs
//
// Command metadata for the built-in modules. Execution lives in the
// dispatch layer; these factories only describe the commands.

use twilight_model::application::command::CommandOptionType;
use twilight_model::guild::Permissions;

use lavamusic_common::models::{Command, CommandOption, PlayerRequirements};
use lavamusic_core::{BotContext, Error};

fn playing() -> PlayerRequirements {
    PlayerRequirements {
        voice: true,
        dj: false,
        active: true,
        dj_perm: None,
    }
}

fn dj_playing() -> PlayerRequirements {
    PlayerRequirements {
        dj: true,
        ..playing()
    }
}

fn speak() -> [Permissions; 4] {
    [
        Permissions::SEND_MESSAGES,
        Permissions::EMBED_LINKS,
        Permissions::CONNECT,
        Permissions::SPEAK,
    ]
}

// info

pub fn ping(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("ping", "cmd.ping.description")
        .aliases(["pong"])
        .usage("ping")
        .examples(["ping"])
        .client_permissions([Permissions::SEND_MESSAGES, Permissions::EMBED_LINKS])
        .slash(true))
}

pub fn help(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("help", "cmd.help.description")
        .aliases(["h"])
        .usage("help [command]")
        .examples(["help", "help play"])
        .client_permissions([Permissions::SEND_MESSAGES, Permissions::EMBED_LINKS])
        .slash(true)
        .option(CommandOption::new("command", "cmd.help.options.command", CommandOptionType::String)))
}

pub fn about(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("about", "cmd.about.description")
        .aliases(["ab"])
        .usage("about")
        .client_permissions([Permissions::SEND_MESSAGES, Permissions::EMBED_LINKS])
        .slash(true))
}

pub fn invite(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("invite", "cmd.invite.description")
        .aliases(["iv"])
        .usage("invite")
        .slash(true))
}

// music

pub fn play(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("play", "cmd.play.description")
        .aliases(["p"])
        .usage("play <song>")
        .examples(["play example", "play https://www.youtube.com/watch?v=example"])
        .args(true)
        .player(PlayerRequirements {
            voice: true,
            ..Default::default()
        })
        .client_permissions(speak())
        .slash(true)
        .option(CommandOption::new("song", "cmd.play.options.song", CommandOptionType::String).required(true)))
}

pub fn pause(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("pause", "cmd.pause.description")
        .usage("pause")
        .player(dj_playing())
        .client_permissions(speak())
        .slash(true))
}

pub fn resume(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("resume", "cmd.resume.description")
        .aliases(["r"])
        .usage("resume")
        .player(dj_playing())
        .client_permissions(speak())
        .slash(true))
}

pub fn skip(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("skip", "cmd.skip.description")
        .aliases(["sk"])
        .usage("skip")
        .player(dj_playing())
        .client_permissions(speak())
        .slash(true))
}

pub fn stop(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("stop", "cmd.stop.description")
        .aliases(["sp"])
        .usage("stop")
        .player(dj_playing())
        .client_permissions(speak())
        .slash(true))
}

pub fn queue(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("queue", "cmd.queue.description")
        .aliases(["q"])
        .usage("queue")
        .player(playing())
        .client_permissions([Permissions::SEND_MESSAGES, Permissions::EMBED_LINKS])
        .slash(true))
}

pub fn nowplaying(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("nowplaying", "cmd.nowplaying.description")
        .aliases(["np"])
        .usage("nowplaying")
        .player(playing())
        .client_permissions([Permissions::SEND_MESSAGES, Permissions::EMBED_LINKS])
        .slash(true))
}

pub fn volume(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("volume", "cmd.volume.description")
        .aliases(["v", "vol"])
        .usage("volume <number>")
        .examples(["volume 100", "volume 50"])
        .args(true)
        .player(dj_playing())
        .client_permissions(speak())
        .slash(true)
        .option(CommandOption::new("number", "cmd.volume.options.number", CommandOptionType::Integer).required(true)))
}

pub fn repeat(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("loop", "cmd.loop.description")
        .aliases(["loop_song"])
        .usage("loop [off|song|queue]")
        .examples(["loop", "loop queue"])
        .player(dj_playing())
        .client_permissions(speak())
        .slash(true)
        .option(
            CommandOption::new("mode", "cmd.loop.options.mode", CommandOptionType::String)
                .choice("off", "off")
                .choice("song", "repeat")
                .choice("queue", "queue"),
        ))
}

// config

pub fn setup(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("setup", "cmd.setup.description")
        .usage("setup <create|delete|info>")
        .examples(["setup create", "setup delete"])
        .args(true)
        .cooldown(10)
        .client_permissions([
            Permissions::SEND_MESSAGES,
            Permissions::EMBED_LINKS,
            Permissions::MANAGE_CHANNELS,
        ])
        .user_permissions([Permissions::MANAGE_GUILD])
        .slash(true)
        .option(
            CommandOption::new("action", "cmd.setup.options.action", CommandOptionType::String)
                .required(true)
                .choice("create", "create")
                .choice("delete", "delete")
                .choice("info", "info"),
        ))
}

pub fn prefix(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("prefix", "cmd.prefix.description")
        .aliases(["pf"])
        .usage("prefix <set|reset> [prefix]")
        .args(true)
        .user_permissions([Permissions::MANAGE_GUILD])
        .slash(true)
        .option(CommandOption::new("prefix", "cmd.prefix.options.prefix", CommandOptionType::String)))
}

pub fn language(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("language", "cmd.language.description")
        .aliases(["lang"])
        .usage("language <set|reset> [language]")
        .args(true)
        .user_permissions([Permissions::MANAGE_GUILD])
        .slash(true)
        .option(CommandOption::new("language", "cmd.language.options.language", CommandOptionType::String)))
}

// dev

pub fn eval(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("eval", "cmd.eval.description")
        .aliases(["ev"])
        .usage("eval <code>")
        .args(true)
        .dev_only())
}

pub fn reload(_: &BotContext) -> Result<Command, Error> {
    Ok(Command::new("reload", "cmd.reload.description")
        .aliases(["rl"])
        .usage("reload")
        .dev_only())
}
