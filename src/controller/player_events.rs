//! Playback backend event listener

use chrono::Utc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::backend::BackendEvent;
use crate::error::CoreError;
use crate::model::PlaybackPhase;
use super::intents::Effect;
use super::AppController;

impl AppController {
    pub fn start_player_event_listener(&self, mut events: UnboundedReceiver<BackendEvent>) -> JoinHandle<()> {
        let controller = self.clone();
        tracing::info!("Starting player event listener");

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if controller.model.lock().await.should_quit() {
                    tracing::debug!("Player event listener shutting down");
                    break;
                }
                controller.handle_backend_event(event).await;
            }
        })
    }

    pub async fn handle_backend_event(&self, event: BackendEvent) {
        let effect = {
            let mut model = self.model.lock().await;
            if model.playback().phase() == PlaybackPhase::Idle {
                tracing::debug!(?event, "Ignoring player event while idle");
                return;
            }
            if model.playback().attempt() != Some(event.attempt()) {
                tracing::debug!(?event, current = ?model.playback().attempt(), "Ignoring stale player event");
                return;
            }

            match event {
                BackendEvent::Ready(_) => {
                    tracing::debug!("BackendEvent::Ready");
                    if let Err(e) = model.on_ready() {
                        tracing::debug!(error = %e, "Ready ignored");
                    }
                    Effect::None
                }
                BackendEvent::Buffering(_) => {
                    tracing::debug!("BackendEvent::Buffering");
                    if let Err(e) = model.on_buffering() {
                        tracing::debug!(error = %e, "Buffering ignored");
                    }
                    Effect::None
                }
                BackendEvent::Ended(_) => {
                    tracing::debug!("BackendEvent::Ended");
                    match model.on_ended(self.settings.auto_advance) {
                        Some((attempt, song)) => {
                            tracing::info!(song_id = %song.id, "Advancing to next song");
                            Effect::Play { attempt, song }
                        }
                        None => Effect::None,
                    }
                }
                BackendEvent::Error(_, reason) => {
                    tracing::warn!(%reason, "BackendEvent::Error");
                    model.on_playback_error();
                    let error = CoreError::TransientBackendFailure {
                        operation: "play",
                        reason,
                    };
                    model.raise(&error, Utc::now());
                    Effect::None
                }
            }
        };
        self.run_effect(effect).await;
    }
}
