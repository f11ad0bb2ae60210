//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that turns user intents
//! and backend events into model transitions and backend calls.
//! It is organized into submodules by responsibility:
//!
//! - `intents`: Intent enum and its synchronous application to the model
//! - `effects`: Backend calls an intent requires and how their results land
//! - `player_events`: Playback backend event listener
//! - `input`: Key event handling

mod intents;
mod effects;
mod player_events;
mod input;

pub use intents::Intent;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::backend::{LibraryBackend, PlaybackBackend};
use crate::config::Settings;
use crate::error::CoreError;
use crate::model::AppModel;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    player: Arc<dyn PlaybackBackend>,
    library: Arc<dyn LibraryBackend>,
    settings: Arc<Settings>,
}

impl AppController {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        player: Arc<dyn PlaybackBackend>,
        library: Arc<dyn LibraryBackend>,
        settings: Settings,
    ) -> Self {
        Self {
            model,
            player,
            library,
            settings: Arc::new(settings),
        }
    }

    /// Load the user's playlists and favorites into the store.
    pub async fn bootstrap(&self) {
        let (playlists, favorites) =
            futures::join!(self.library.playlists(), self.library.favorites());
        crate::log_backend_result!("playlists", playlists);
        crate::log_backend_result!("favorites", favorites);

        let now = Utc::now();
        let mut model = self.model.lock().await;
        let playlists = playlists.unwrap_or_else(|e| {
            model.raise(&CoreError::backend("load playlists", &e), now);
            Vec::new()
        });
        let favorites = favorites.unwrap_or_else(|e| {
            model.raise(&CoreError::backend("load favorites", &e), now);
            Vec::new()
        });
        model.seed_library(playlists, favorites);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use crate::backend::testing::ScriptedLibrary;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn bootstrap_seeds_playlists_and_favorites() {
        let library = ScriptedLibrary::default()
            .with_playlist(playlist("p", 3))
            .with_favorites(songs(&["f1", "f2"]));
        let h = harness(library);

        h.controller.bootstrap().await;

        let model = h.controller.model.lock().await;
        assert_eq!(model.library().list_playlists().len(), 1);
        assert!(model.library().list_playlists()[0].songs.is_empty(), "songs load on open");
        assert_eq!(model.library().list_favorites(), songs(&["f1", "f2"]).as_slice());
        assert!(model.library().is_favorite("f2"));
    }

    #[tokio::test]
    async fn failed_bootstrap_leaves_a_notice() {
        let h = harness(ScriptedLibrary::default().with_favorites(songs(&["f"])));
        h.library.fail_playlists.store(true, Ordering::SeqCst);
        h.controller.bootstrap().await;

        let model = h.controller.model.lock().await;
        assert_eq!(
            model.status_projection().notice.as_deref(),
            Some("Could not load playlists: offline")
        );
        assert_eq!(model.library().list_favorites().len(), 1, "favorites still load");
    }
}
