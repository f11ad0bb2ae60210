//! Key event handling

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::CoreError;
use crate::model::{AppModel, Song, Tab};
use super::{AppController, Intent};

/// What a key press asks the controller to do
#[derive(Debug, PartialEq)]
pub(crate) enum KeyAction {
    Submit(Intent),
    AddSuggestedPlaylist,
    /// Handled locally (cursor, search text) or ignored
    Nothing,
}

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let action = {
            let mut model = self.model.lock().await;
            key_action(&mut model, key)
        };

        match action {
            KeyAction::Submit(intent) => self.submit(intent).await,
            KeyAction::AddSuggestedPlaylist => self.add_suggested_playlist(),
            KeyAction::Nothing => {}
        }
        Ok(())
    }

    /// Ask the library for a playlist suggestion and add it.
    fn add_suggested_playlist(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            let result = controller.library.suggested_playlist().await;
            crate::log_backend_result!("suggested playlist", result);
            match result {
                Ok(Some(playlist)) => controller.dispatch(Intent::AddPlaylist(playlist)).await,
                Ok(None) => tracing::debug!("No playlist to suggest"),
                Err(e) => {
                    let error = CoreError::backend("load suggestions", &e);
                    controller.model.lock().await.raise(&error, Utc::now());
                }
            }
        });
    }
}

pub(crate) fn key_action(model: &mut AppModel, key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return KeyAction::Submit(Intent::Quit);
    }

    if model.ui().editing_search {
        return search_key(model, key);
    }
    if model.ui().drawer.is_open {
        return drawer_key(model, key);
    }

    let content_type = model.ui().content_type;
    match key.code {
        KeyCode::Char('q') => KeyAction::Submit(Intent::Quit),
        KeyCode::Esc if model.ui().notice.is_some() => KeyAction::Submit(Intent::DismissNotice),
        KeyCode::BackTab => KeyAction::Submit(Intent::SwitchTab(content_type.prev())),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
            KeyAction::Submit(Intent::SwitchTab(content_type.prev()))
        }
        KeyCode::Tab => KeyAction::Submit(Intent::SwitchTab(content_type.next())),
        KeyCode::Up => {
            model.move_cursor_up();
            KeyAction::Nothing
        }
        KeyCode::Down => {
            model.move_cursor_down();
            KeyAction::Nothing
        }
        KeyCode::Enter => select_at_cursor(model),
        KeyCode::Char('f') => match selected_song(model) {
            Some((song, index)) => KeyAction::Submit(Intent::ToggleFavorite { song, index }),
            None => KeyAction::Nothing,
        },
        KeyCode::Char(' ') => KeyAction::Submit(Intent::TogglePause),
        KeyCode::Backspace => KeyAction::Submit(Intent::PlaylistBack),
        KeyCode::Char('d') => KeyAction::Submit(Intent::OpenDrawer(model.ui().drawer.active_tab)),
        KeyCode::Char('/') => {
            model.set_editing_search(true);
            KeyAction::Nothing
        }
        KeyCode::Char('x') => KeyAction::Submit(Intent::ClearSearchResults),
        KeyCode::Char('a') => KeyAction::AddSuggestedPlaylist,
        _ => KeyAction::Nothing,
    }
}

fn search_key(model: &mut AppModel, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter => KeyAction::Submit(Intent::Search(model.ui().search_input.clone())),
        KeyCode::Esc => {
            model.set_editing_search(false);
            KeyAction::Nothing
        }
        KeyCode::Backspace => {
            model.search_input().pop();
            KeyAction::Nothing
        }
        KeyCode::Char(c) => {
            model.search_input().push(c);
            KeyAction::Nothing
        }
        _ => KeyAction::Nothing,
    }
}

fn drawer_key(model: &mut AppModel, key: KeyEvent) -> KeyAction {
    let drawer = &model.ui().drawer;
    let (tab, cursor) = (drawer.active_tab, drawer.cursor);
    let other_tab = match tab {
        Tab::Playlists => Tab::Favorites,
        Tab::Favorites | Tab::Search => Tab::Playlists,
    };

    match key.code {
        KeyCode::Esc | KeyCode::Char('d') => KeyAction::Submit(Intent::CloseDrawer),
        KeyCode::Char('q') => KeyAction::Submit(Intent::Quit),
        KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
            KeyAction::Submit(Intent::SetDrawerTab(other_tab))
        }
        KeyCode::Up => {
            model.move_cursor_up();
            KeyAction::Nothing
        }
        KeyCode::Down => {
            model.move_cursor_down();
            KeyAction::Nothing
        }
        KeyCode::Enter => match tab {
            Tab::Playlists => match model.library().list_playlists().get(cursor) {
                Some(playlist) => KeyAction::Submit(Intent::DrawerSelectPlaylist(playlist.clone())),
                None => KeyAction::Nothing,
            },
            Tab::Favorites | Tab::Search => KeyAction::Submit(Intent::DrawerSelectFavorite(cursor)),
        },
        KeyCode::Char('f') if tab != Tab::Playlists => {
            match model.library().list_favorites().get(cursor) {
                Some(song) => KeyAction::Submit(Intent::DrawerToggleFavorite { song: song.clone() }),
                None => KeyAction::Nothing,
            }
        }
        _ => KeyAction::Nothing,
    }
}

fn selected_song(model: &AppModel) -> Option<(Song, usize)> {
    let list = model.displayed_list()?;
    let index = model.ui().cursor;
    model.song_at(&list, index).ok().map(|song| (song, index))
}

fn select_at_cursor(model: &AppModel) -> KeyAction {
    let content_type = model.ui().content_type;
    if content_type == Tab::Playlists && model.displayed_list().is_none() {
        return match model.library().list_playlists().get(model.ui().cursor) {
            Some(playlist) => KeyAction::Submit(Intent::PlaylistSelect(playlist.clone())),
            None => KeyAction::Nothing,
        };
    }
    match selected_song(model) {
        Some((song, _)) => KeyAction::Submit(Intent::PlaySong { song, content_type }),
        None => KeyAction::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::test_support::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn model_with_library() -> AppModel {
        let mut model = AppModel::new();
        model.seed_library(vec![playlist("p", 2), playlist("r", 1)], songs(&["f0", "f1"]));
        model
    }

    #[test]
    fn typing_edits_search_until_enter() {
        let mut model = AppModel::new();
        assert_eq!(key_action(&mut model, press(KeyCode::Char('/'))), KeyAction::Nothing);
        for c in "abx".chars() {
            key_action(&mut model, press(KeyCode::Char(c)));
        }
        key_action(&mut model, press(KeyCode::Backspace));

        assert_eq!(
            key_action(&mut model, press(KeyCode::Enter)),
            KeyAction::Submit(Intent::Search("ab".into()))
        );
    }

    #[test]
    fn tab_cycles_content_type() {
        let mut model = AppModel::new();
        assert_eq!(
            key_action(&mut model, press(KeyCode::Tab)),
            KeyAction::Submit(Intent::SwitchTab(Tab::Favorites))
        );
        assert_eq!(
            key_action(&mut model, press(KeyCode::BackTab)),
            KeyAction::Submit(Intent::SwitchTab(Tab::Playlists))
        );
    }

    #[test]
    fn enter_on_summary_opens_playlist_under_cursor() {
        let mut model = model_with_library();
        model.set_content_type(Tab::Playlists);
        key_action(&mut model, press(KeyCode::Down));

        match key_action(&mut model, press(KeyCode::Enter)) {
            KeyAction::Submit(Intent::PlaylistSelect(p)) => assert_eq!(p.id, "r"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn enter_and_f_act_on_row_under_cursor() {
        let mut model = model_with_library();
        model.set_content_type(Tab::Favorites);
        key_action(&mut model, press(KeyCode::Down));

        assert_eq!(
            key_action(&mut model, press(KeyCode::Enter)),
            KeyAction::Submit(Intent::PlaySong {
                song: song("f1"),
                content_type: Tab::Favorites,
            })
        );
        assert_eq!(
            key_action(&mut model, press(KeyCode::Char('f'))),
            KeyAction::Submit(Intent::ToggleFavorite {
                song: song("f1"),
                index: 1,
            })
        );
    }

    #[test]
    fn drawer_keys_stay_in_drawer() {
        let mut model = model_with_library();
        model.open_drawer(Tab::Favorites);

        key_action(&mut model, press(KeyCode::Down));
        assert_eq!(model.ui().cursor, 0, "main cursor untouched");
        assert_eq!(
            key_action(&mut model, press(KeyCode::Enter)),
            KeyAction::Submit(Intent::DrawerSelectFavorite(1))
        );
        assert_eq!(
            key_action(&mut model, press(KeyCode::Right)),
            KeyAction::Submit(Intent::SetDrawerTab(Tab::Playlists))
        );
        assert_eq!(
            key_action(&mut model, press(KeyCode::Esc)),
            KeyAction::Submit(Intent::CloseDrawer)
        );
    }

    #[test]
    fn ctrl_c_quits_even_while_typing() {
        let mut model = AppModel::new();
        model.set_editing_search(true);
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_action(&mut model, key), KeyAction::Submit(Intent::Quit));
    }
}
