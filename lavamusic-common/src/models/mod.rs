// File: lavamusic-common/src/models/mod.rs
pub mod command;
pub mod node;
pub mod setup;

pub use command::{Command, CommandDescription, CommandOption, CommandPermissions, OptionChoice, PlayerRequirements};
pub use node::{NodeDescriptor, TrackInfo};
pub use setup::SetupRecord;
