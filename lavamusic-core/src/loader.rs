// File: lavamusic-core/src/loader.rs
//
// Handler modules are registered up front in a `ModuleTree`, laid out the
// way they would sit on disk: `<root>/<category>/<file>`. The loader walks
// that tree in lexicographic order (categories, then files), keeps files
// ending in the configured suffix, and calls each factory with the bot
// context. A failing factory aborts the whole load.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::Error;

pub type Factory<C, H> = Box<dyn Fn(&C) -> Result<H, Error> + Send + Sync>;

pub struct ModuleTree<C, H> {
    root: String,
    categories: BTreeMap<String, BTreeMap<String, Factory<C, H>>>,
}

impl<C, H> ModuleTree<C, H> {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            categories: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Register `factory` as `<root>/<category>/<file>`. Re-registering the
    /// same path replaces the earlier factory.
    pub fn register<F>(&mut self, category: &str, file: &str, factory: F) -> &mut Self
    where
        F: Fn(&C) -> Result<H, Error> + Send + Sync + 'static,
    {
        let previous = self
            .categories
            .entry(category.to_string())
            .or_default()
            .insert(file.to_string(), Box::new(factory));
        if previous.is_some() {
            debug!("(ModuleTree) {}/{}/{} registered twice; keeping the latest", self.root, category, file);
        }
        self
    }

    pub fn with<F>(mut self, category: &str, file: &str, factory: F) -> Self
    where
        F: Fn(&C) -> Result<H, Error> + Send + Sync + 'static,
    {
        self.register(category, file, factory);
        self
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One instantiated handler together with where it came from.
#[derive(Debug)]
pub struct LoadedModule<H> {
    pub category: String,
    pub file: String,
    pub handler: H,
}

#[derive(Debug, Clone)]
pub struct HandlerLoader {
    suffix: String,
}

impl Default for HandlerLoader {
    fn default() -> Self {
        Self::new(".rs")
    }
}

impl HandlerLoader {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }

    pub fn load<C, H>(&self, tree: &ModuleTree<C, H>, ctx: &C) -> Result<Vec<LoadedModule<H>>, Error> {
        let mut loaded = Vec::with_capacity(tree.len());

        for (category, files) in &tree.categories {
            for (file, factory) in files {
                if !file.ends_with(&self.suffix) {
                    trace!("(HandlerLoader) skipping {}/{}/{}", tree.root, category, file);
                    continue;
                }
                let handler = factory(ctx).map_err(|e| Error::HandlerLoad {
                    category: category.clone(),
                    file: file.clone(),
                    reason: e.to_string(),
                })?;
                debug!("(HandlerLoader) loaded {}/{}/{}", tree.root, category, file);
                loaded.push(LoadedModule {
                    category: category.clone(),
                    file: file.clone(),
                    handler,
                });
            }
        }

        Ok(loaded)
    }
}
