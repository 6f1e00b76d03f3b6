//! Audio-node client shell.
//!
//! The node connection itself (websocket sessions, players, REST calls) lives
//! outside this crate. What the bot core needs is the node list it was
//! started with and the event bus the node client publishes player events on.

pub mod discovery;

use lavamusic_common::models::NodeDescriptor;

use crate::eventbus::EventBus;
use crate::events::NodeEvent;

pub struct AudioNodeClient {
    nodes: Vec<NodeDescriptor>,
    events: EventBus<NodeEvent>,
}

impl AudioNodeClient {
    pub fn new(nodes: Vec<NodeDescriptor>) -> Self {
        Self {
            nodes,
            events: EventBus::new(),
        }
    }

    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&NodeDescriptor> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Bus carrying node and player events.
    pub fn events(&self) -> &EventBus<NodeEvent> {
        &self.events
    }

    pub async fn emit(&self, event: NodeEvent) {
        self.events.publish(event).await;
    }
}
