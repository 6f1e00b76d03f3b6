// File: lavamusic-core/src/services/setup_buttons.rs
//
// Standing interaction listener. A button press on a guild's configured
// setup message is re-emitted on the platform bus as `setupButtons`.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use twilight_model::application::interaction::Interaction;

use lavamusic_common::traits::repository_traits::SetupRepository;

use crate::eventbus::EventBus;
use crate::events::{ButtonPress, PlatformEvent};
use crate::Error;

#[derive(Clone)]
pub struct SetupButtonRouter {
    setups: Arc<dyn SetupRepository>,
    events: EventBus<PlatformEvent>,
}

impl SetupButtonRouter {
    pub fn new(setups: Arc<dyn SetupRepository>, events: EventBus<PlatformEvent>) -> Self {
        Self { setups, events }
    }

    /// Emit `setupButtons` with `interaction` itself if it is a button press
    /// on its guild's setup message. Returns whether the event was emitted.
    pub async fn route(&self, interaction: Arc<Interaction>) -> Result<bool, Error> {
        let Some(press) = ButtonPress::from_interaction(&interaction) else {
            return Ok(false);
        };
        let (Some(guild_id), Some(channel_id), Some(message_id)) =
            (press.guild_id, press.channel_id, press.message_id)
        else {
            return Ok(false);
        };

        let Some(setup) = self.setups.get_setup(&guild_id.to_string()).await? else {
            trace!("(SetupButtons) guild {} has no setup", guild_id);
            return Ok(false);
        };
        if !setup.matches(&channel_id.to_string(), &message_id.to_string()) {
            return Ok(false);
        }

        debug!("(SetupButtons) '{}' pressed in guild {}", press.custom_id, guild_id);
        self.events.publish(PlatformEvent::SetupButtons(interaction)).await;
        Ok(true)
    }

    /// Route every button press seen on `bus`. Each lookup runs on its own
    /// task so a slow store never blocks the listener.
    pub async fn listen(self, bus: &EventBus<PlatformEvent>) -> JoinHandle<()> {
        let mut rx = bus.subscribe(None).await;
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let PlatformEvent::InteractionCreate(interaction) = event else {
                    continue;
                };
                if ButtonPress::from_interaction(&interaction).is_none() {
                    continue;
                }
                let router = self.clone();
                tokio::spawn(async move {
                    if let Err(e) = router.route(interaction).await {
                        warn!("(SetupButtons) setup lookup failed: {:?}", e);
                    }
                });
            }
            debug!("(SetupButtons) platform bus closed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemorySetupRepository;
    use crate::test_utils::{component_interaction, ping_interaction, BUTTON, STRING_SELECT};
    use std::time::Duration;

    async fn router() -> (SetupButtonRouter, EventBus<PlatformEvent>) {
        let repo = InMemorySetupRepository::new();
        repo.upsert_setup("10", "20", "30").await.unwrap();
        let bus = EventBus::new();
        (SetupButtonRouter::new(Arc::new(repo), bus.clone()), bus)
    }

    async fn drain(rx: &mut tokio::sync::mpsc::Receiver<PlatformEvent>) -> Vec<PlatformEvent> {
        let mut out = Vec::new();
        while let Ok(Some(event)) = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await {
            out.push(event);
        }
        out
    }

    fn setup_buttons(events: Vec<PlatformEvent>) -> Vec<Arc<Interaction>> {
        events
            .into_iter()
            .filter_map(|e| match e {
                PlatformEvent::SetupButtons(interaction) => Some(interaction),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn only_button_presses_are_extracted() {
        let press = ButtonPress::from_interaction(&component_interaction(10, 20, 30, BUTTON, "PAUSE_BUT")).unwrap();
        assert_eq!(press.guild_id.map(|id| id.get()), Some(10));
        assert_eq!(press.channel_id.map(|id| id.get()), Some(20));
        assert_eq!(press.message_id.map(|id| id.get()), Some(30));
        assert_eq!(press.custom_id, "PAUSE_BUT");

        assert!(ButtonPress::from_interaction(&component_interaction(10, 20, 30, STRING_SELECT, "menu")).is_none());
        assert!(ButtonPress::from_interaction(&ping_interaction()).is_none());
    }

    #[tokio::test]
    async fn matching_press_is_emitted_once_with_the_original_interaction() {
        let (router, bus) = router().await;
        let mut rx = bus.subscribe(None).await;
        let interaction = component_interaction(10, 20, 30, BUTTON, "PAUSE_BUT");

        assert!(router.route(interaction.clone()).await.unwrap());

        let emitted = setup_buttons(drain(&mut rx).await);
        assert_eq!(emitted.len(), 1);
        assert!(Arc::ptr_eq(&emitted[0], &interaction));
        assert_eq!(emitted[0].locale.as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn other_message_or_channel_is_ignored() {
        let (router, bus) = router().await;
        let mut rx = bus.subscribe(None).await;

        assert!(!router.route(component_interaction(10, 20, 31, BUTTON, "PAUSE_BUT")).await.unwrap());
        assert!(!router.route(component_interaction(10, 21, 30, BUTTON, "PAUSE_BUT")).await.unwrap());
        assert!(drain(&mut rx).await.is_empty());
    }

    #[tokio::test]
    async fn guild_without_setup_or_non_button_is_ignored() {
        let (router, bus) = router().await;
        let mut rx = bus.subscribe(None).await;

        assert!(!router.route(component_interaction(11, 20, 30, BUTTON, "PAUSE_BUT")).await.unwrap());
        assert!(!router.route(component_interaction(10, 20, 30, STRING_SELECT, "menu")).await.unwrap());
        assert!(!router.route(ping_interaction()).await.unwrap());
        assert!(drain(&mut rx).await.is_empty());
    }

    #[tokio::test]
    async fn listener_emits_one_event_per_matching_press() {
        let (router, bus) = router().await;
        let handle = router.listen(&bus).await;
        let mut rx = bus.subscribe(None).await;

        let matching = component_interaction(10, 20, 30, BUTTON, "SKIP_BUT");
        for interaction in [
            ping_interaction(),
            component_interaction(10, 20, 30, STRING_SELECT, "menu"),
            component_interaction(10, 20, 99, BUTTON, "SKIP_BUT"),
            matching.clone(),
        ] {
            bus.publish(PlatformEvent::InteractionCreate(interaction)).await;
        }

        let events = drain(&mut rx).await;
        let interactions = events
            .iter()
            .filter(|e| matches!(e, PlatformEvent::InteractionCreate(_)))
            .count();
        assert_eq!(interactions, 4);

        let emitted = setup_buttons(events);
        assert_eq!(emitted.len(), 1);
        assert!(Arc::ptr_eq(&emitted[0], &matching));

        bus.shutdown().await;
        handle.await.unwrap();
    }
}
