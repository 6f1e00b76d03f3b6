//! src/events/mod.rs
//!
//! Typed events for the two buses the bot listens on: the platform (Discord
//! gateway) bus and the audio-node bus. Handlers subscribe by event name;
//! the name is parsed into the kind enum of the handler's scope at load time.

pub mod router;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use twilight_model::application::interaction::{Interaction, InteractionData, InteractionType};
use twilight_model::channel::message::component::ComponentType;
use twilight_model::channel::Message;
use twilight_model::id::marker::{
    ApplicationMarker, ChannelMarker, GuildMarker, InteractionMarker, MessageMarker, UserMarker,
};
use twilight_model::id::Id;
use twilight_model::voice::VoiceState;

use lavamusic_common::models::TrackInfo;

use crate::Error;

pub use router::EventRouter;

/// Events under this category directory are audio-node handlers.
pub const PLAYER_CATEGORY: &str = "player";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventScope {
    Platform,
    AudioNode,
}

impl EventScope {
    pub fn for_category(category: &str) -> Self {
        if category == PLAYER_CATEGORY {
            EventScope::AudioNode
        } else {
            EventScope::Platform
        }
    }
}

impl fmt::Display for EventScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventScope::Platform => f.write_str("platform"),
            EventScope::AudioNode => f.write_str("audio-node"),
        }
    }
}

macro_rules! event_kinds {
    ($scope:expr, $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(Error::UnknownEvent {
                        scope: $scope.to_string(),
                        name: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

event_kinds!(EventScope::Platform, PlatformEventKind {
    Ready => "ready",
    InteractionCreate => "interactionCreate",
    MessageCreate => "messageCreate",
    GuildCreate => "guildCreate",
    GuildDelete => "guildDelete",
    VoiceStateUpdate => "voiceStateUpdate",
    SetupButtons => "setupButtons",
});

event_kinds!(EventScope::AudioNode, NodeEventKind {
    NodeConnect => "nodeConnect",
    NodeDisconnect => "nodeDisconnect",
    NodeReconnect => "nodeReconnect",
    NodeError => "nodeError",
    TrackStart => "trackStart",
    TrackEnd => "trackEnd",
    TrackStuck => "trackStuck",
    TrackException => "trackException",
    QueueEnd => "queueEnd",
    PlayerDestroy => "playerDestroy",
    SocketClosed => "socketClosed",
});

/// What the synchronizer needs from the gateway's READY payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyInfo {
    pub application_id: Id<ApplicationMarker>,
    pub user_id: Id<UserMarker>,
    pub user_name: String,
    pub guild_count: usize,
}

/// The identifiers of a message-component button press that the setup
/// routing matches on. Handlers get the full interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPress {
    pub interaction_id: Id<InteractionMarker>,
    pub application_id: Id<ApplicationMarker>,
    pub token: String,
    pub guild_id: Option<Id<GuildMarker>>,
    pub channel_id: Option<Id<ChannelMarker>>,
    pub message_id: Option<Id<MessageMarker>>,
    pub user_id: Option<Id<UserMarker>>,
    pub custom_id: String,
}

impl ButtonPress {
    /// `None` unless the interaction is a button press on a message.
    pub fn from_interaction(interaction: &Interaction) -> Option<Self> {
        if interaction.kind != InteractionType::MessageComponent {
            return None;
        }
        let Some(InteractionData::MessageComponent(data)) = &interaction.data else {
            return None;
        };
        if data.component_type != ComponentType::Button {
            return None;
        }

        Some(Self {
            interaction_id: interaction.id,
            application_id: interaction.application_id,
            token: interaction.token.clone(),
            guild_id: interaction.guild_id,
            channel_id: interaction.channel.as_ref().map(|c| c.id),
            message_id: interaction.message.as_ref().map(|m| m.id),
            user_id: interaction.author_id(),
            custom_id: data.custom_id.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub enum PlatformEvent {
    Ready(ReadyInfo),
    InteractionCreate(Arc<Interaction>),
    MessageCreate(Arc<Message>),
    GuildCreate { guild_id: Id<GuildMarker> },
    GuildDelete { guild_id: Id<GuildMarker> },
    VoiceStateUpdate(Arc<VoiceState>),
    /// The original component interaction, re-emitted unchanged.
    SetupButtons(Arc<Interaction>),
}

impl PlatformEvent {
    pub fn kind(&self) -> PlatformEventKind {
        match self {
            PlatformEvent::Ready(_) => PlatformEventKind::Ready,
            PlatformEvent::InteractionCreate(_) => PlatformEventKind::InteractionCreate,
            PlatformEvent::MessageCreate(_) => PlatformEventKind::MessageCreate,
            PlatformEvent::GuildCreate { .. } => PlatformEventKind::GuildCreate,
            PlatformEvent::GuildDelete { .. } => PlatformEventKind::GuildDelete,
            PlatformEvent::VoiceStateUpdate(_) => PlatformEventKind::VoiceStateUpdate,
            PlatformEvent::SetupButtons(_) => PlatformEventKind::SetupButtons,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    NodeConnect { node: String, reconnected: bool },
    NodeDisconnect { node: String, count: u32 },
    NodeReconnect { node: String },
    NodeError { node: String, error: String },
    TrackStart { guild_id: Id<GuildMarker>, track: TrackInfo },
    TrackEnd { guild_id: Id<GuildMarker>, track: TrackInfo, reason: String },
    TrackStuck { guild_id: Id<GuildMarker>, track: TrackInfo, threshold_ms: u64 },
    TrackException { guild_id: Id<GuildMarker>, track: TrackInfo, message: String },
    QueueEnd { guild_id: Id<GuildMarker> },
    PlayerDestroy { guild_id: Id<GuildMarker> },
    SocketClosed { guild_id: Id<GuildMarker>, code: u16, reason: String, by_remote: bool },
}

impl NodeEvent {
    pub fn kind(&self) -> NodeEventKind {
        match self {
            NodeEvent::NodeConnect { .. } => NodeEventKind::NodeConnect,
            NodeEvent::NodeDisconnect { .. } => NodeEventKind::NodeDisconnect,
            NodeEvent::NodeReconnect { .. } => NodeEventKind::NodeReconnect,
            NodeEvent::NodeError { .. } => NodeEventKind::NodeError,
            NodeEvent::TrackStart { .. } => NodeEventKind::TrackStart,
            NodeEvent::TrackEnd { .. } => NodeEventKind::TrackEnd,
            NodeEvent::TrackStuck { .. } => NodeEventKind::TrackStuck,
            NodeEvent::TrackException { .. } => NodeEventKind::TrackException,
            NodeEvent::QueueEnd { .. } => NodeEventKind::QueueEnd,
            NodeEvent::PlayerDestroy { .. } => NodeEventKind::PlayerDestroy,
            NodeEvent::SocketClosed { .. } => NodeEventKind::SocketClosed,
        }
    }
}

/// The argument every handler's `run` receives: the triggering event,
/// untouched.
#[derive(Debug, Clone)]
pub enum BotEvent {
    Platform(PlatformEvent),
    Node(NodeEvent),
}

impl BotEvent {
    pub fn scope(&self) -> EventScope {
        match self {
            BotEvent::Platform(_) => EventScope::Platform,
            BotEvent::Node(_) => EventScope::AudioNode,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BotEvent::Platform(e) => e.kind().as_str(),
            BotEvent::Node(e) => e.kind().as_str(),
        }
    }
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    /// The event this handler listens for, e.g. `"trackStart"`.
    fn name(&self) -> &str;

    async fn run(&self, event: &BotEvent) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_names() {
        for kind in NodeEventKind::ALL {
            assert_eq!(kind.as_str().parse::<NodeEventKind>().unwrap(), *kind);
        }
        for kind in PlatformEventKind::ALL {
            assert_eq!(kind.as_str().parse::<PlatformEventKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn unknown_name_reports_scope() {
        let err = "trackStart".parse::<PlatformEventKind>().unwrap_err();
        match err {
            Error::UnknownEvent { scope, name } => {
                assert_eq!(scope, "platform");
                assert_eq!(name, "trackStart");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn only_player_category_is_audio_scope() {
        assert_eq!(EventScope::for_category("player"), EventScope::AudioNode);
        assert_eq!(EventScope::for_category("client"), EventScope::Platform);
        assert_eq!(EventScope::for_category("Player"), EventScope::Platform);
    }
}
