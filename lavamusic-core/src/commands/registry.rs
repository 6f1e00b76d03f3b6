use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};
use twilight_model::application::command::Command as ManifestEntry;

use lavamusic_common::models::Command;

use crate::commands::manifest;
use crate::i18n::I18n;
use crate::loader::{HandlerLoader, ModuleTree};
use crate::Error;

/// Name index, alias index and the slash-command manifest.
///
/// Lookup maps are unordered; `manifest` keeps load order and is exactly
/// what the synchronizer publishes.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
    aliases: HashMap<String, String>,
    manifest: Vec<ManifestEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate every command module in `tree` and register it.
    pub fn load<C>(
        &mut self,
        loader: &HandlerLoader,
        tree: &ModuleTree<C, Command>,
        ctx: &C,
        i18n: &I18n,
    ) -> Result<usize, Error> {
        let modules = loader.load(tree, ctx)?;
        let count = modules.len();
        for module in modules {
            self.register(&module.category, module.handler, i18n)?;
        }
        info!(
            "(CommandRegistry) {} command(s), {} alias(es), {} slash entr(ies) loaded from '{}'",
            self.commands.len(),
            self.aliases.len(),
            self.manifest.len(),
            tree.root()
        );
        Ok(count)
    }

    /// Register one command. Name and alias collisions are rejected before
    /// anything is inserted.
    pub fn register(&mut self, category: &str, mut command: Command, i18n: &I18n) -> Result<(), Error> {
        command.category = category.to_string();
        self.check_collisions(&command)?;

        for alias in &command.aliases {
            self.aliases.insert(alias.clone(), command.name.clone());
        }
        if command.slash_command {
            let entry = manifest::assemble(i18n, &mut command);
            self.manifest.push(entry);
        }
        debug!(
            "(CommandRegistry) {}/{} aliases={:?} slash={}",
            command.category, command.name, command.aliases, command.slash_command
        );
        self.commands.insert(command.name.clone(), command);
        Ok(())
    }

    fn check_collisions(&self, command: &Command) -> Result<(), Error> {
        let name = &command.name;
        if self.commands.contains_key(name) {
            return Err(Error::DuplicateCommand(name.clone()));
        }
        if let Some(owner) = self.aliases.get(name) {
            return Err(Error::AliasCollision {
                alias: name.clone(),
                existing: owner.clone(),
            });
        }

        let mut seen = BTreeSet::new();
        for alias in &command.aliases {
            if !seen.insert(alias.as_str()) {
                return Err(Error::AliasCollision {
                    alias: alias.clone(),
                    existing: name.clone(),
                });
            }
            if let Some(owner) = self.aliases.get(alias) {
                return Err(Error::AliasCollision {
                    alias: alias.clone(),
                    existing: owner.clone(),
                });
            }
            if alias != name && self.commands.contains_key(alias) {
                return Err(Error::AliasCollision {
                    alias: alias.clone(),
                    existing: alias.clone(),
                });
            }
        }
        Ok(())
    }

    /// Aliases are resolved first (one hop), then the direct name.
    pub fn lookup(&self, name_or_alias: &str) -> Option<&Command> {
        self.aliases
            .get(name_or_alias)
            .and_then(|name| self.commands.get(name))
            .or_else(|| self.commands.get(name_or_alias))
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn resolve_alias(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn aliases_of(&self, name: &str) -> Vec<&str> {
        self.commands
            .get(name)
            .map(|c| c.aliases.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.commands.values().map(|c| c.category.as_str()).collect();
        set.into_iter().collect()
    }

    pub fn manifest(&self) -> &[ManifestEntry] {
        &self.manifest
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
