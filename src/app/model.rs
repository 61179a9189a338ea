//! Application model: the player controller plus the page state around it.
//!
//! `App` owns everything the pages read and write: the current location,
//! the auth forms, search state and the liked list cached from storage. The
//! player is only reached through its controller methods.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use crate::audio::PlaybackHandle;
use crate::auth::{
    self, AuthForm, AuthUser, FormOutcome, LoginForm, Location, Route, SignupForm, after_auth,
    guard,
};
use crate::config::AuthSettings;
use crate::liked::{self, LikedEntry};
use crate::player::{PlayerApi, PlayerController, TrackChanged};
use crate::search::{SearchSource, SearchState};
use crate::storage::Storage;

/// The main application model.
pub struct App<H: PlaybackHandle> {
    pub player: PlayerController<H>,
    storage: Box<dyn Storage>,
    auth: AuthSettings,
    fallback_feed: Option<PathBuf>,

    pub location: Location,
    pub login: LoginForm,
    pub signup: SignupForm,
    pub search: SearchState,

    pub liked: Vec<LikedEntry>,
    pub liked_selected: usize,
    /// Whether the playing track is in `liked`. Refreshed on track changes.
    pub current_liked: bool,

    pub queue_selected: usize,
    pub user: Option<AuthUser>,
    pub status: Option<String>,

    track_changes: Receiver<TrackChanged>,
}

impl<H: PlaybackHandle> App<H> {
    pub fn new(
        mut player: PlayerController<H>,
        storage: Box<dyn Storage>,
        auth: AuthSettings,
        fallback_feed: Option<PathBuf>,
        start: Location,
    ) -> Self {
        let track_changes = player.subscribe();
        let liked = liked::load(storage.as_ref());
        let user = auth::current_user(storage.as_ref());
        let search = SearchState::new(SearchSource::resolve(
            Some(&player as &dyn PlayerApi),
            fallback_feed.as_deref(),
        ));

        let mut app = Self {
            player,
            storage,
            auth,
            fallback_feed,
            location: Location::default(),
            login: LoginForm::default(),
            signup: SignupForm::default(),
            search,
            liked,
            liked_selected: 0,
            current_liked: false,
            queue_selected: 0,
            user,
            status: None,
            track_changes,
        };
        app.refresh_current_liked();
        app.navigate(start);
        app
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Go to `target`, applying the session guard.
    pub fn navigate(&mut self, target: Location) {
        let to = guard(&target, self.signed_in());
        if to.route != target.route {
            log::debug!("redirect {} -> {}", target.to_url(), to.to_url());
            if to.route == Route::Login {
                self.status = Some(format!("Log in to open {}.", target.route.title()));
            }
        }

        match to.route {
            Route::Liked => {
                self.liked = liked::load(self.storage.as_ref());
                self.liked_selected = self.liked_selected.min(self.liked.len().saturating_sub(1));
            }
            Route::Search => {
                if self.search.source().tracks().is_empty() {
                    self.search = SearchState::new(SearchSource::resolve(
                        Some(&self.player as &dyn PlayerApi),
                        self.fallback_feed.as_deref(),
                    ));
                }
            }
            _ => {}
        }
        self.location = to;
    }

    pub fn open(&mut self, route: Route) {
        self.navigate(Location::new(route));
    }

    /// Open the login page, returning here afterwards.
    pub fn open_login(&mut self) {
        let next = (!self.location.route.is_auth_page())
            .then(|| self.location.route.path().to_string());
        self.navigate(Location {
            route: Route::Login,
            next,
        });
    }

    /// Switch between the two auth pages, keeping the return path.
    pub fn switch_auth_page(&mut self) {
        let route = match self.location.route {
            Route::Login => Route::Signup,
            _ => Route::Login,
        };
        let next = self.location.next.clone();
        self.navigate(Location { route, next });
    }

    /// Drain track-change notifications. Returns whether any arrived.
    pub fn sync_track_changes(&mut self) -> bool {
        let mut changed = false;
        while let Ok(TrackChanged { index }) = self.track_changes.try_recv() {
            self.queue_selected = index;
            changed = true;
        }
        if changed {
            self.refresh_current_liked();
        }
        changed
    }

    fn refresh_current_liked(&mut self) {
        self.current_liked = self
            .player
            .current_track()
            .is_some_and(|t| liked::contains(&self.liked, &t.like_id()));
    }

    pub fn toggle_like_current(&mut self) {
        let Some(track) = self.player.current_track() else {
            return;
        };
        let entry = LikedEntry::for_track(track, self.player.duration(), Some(track.like_id()));
        let title = entry.title.clone();

        match liked::toggle(self.storage.as_mut(), entry) {
            Ok(now_liked) => {
                self.current_liked = now_liked;
                self.status = Some(if now_liked {
                    format!("Added {title} to Liked Songs.")
                } else {
                    format!("Removed {title} from Liked Songs.")
                });
            }
            Err(e) => {
                log::warn!("could not update liked songs: {e}");
                self.status = Some("Could not save Liked Songs.".to_string());
            }
        }
        self.liked = liked::load(self.storage.as_ref());
    }

    pub fn liked_select_next(&mut self) {
        if !self.liked.is_empty() {
            self.liked_selected = (self.liked_selected + 1).min(self.liked.len() - 1);
        }
    }

    pub fn liked_select_prev(&mut self) {
        self.liked_selected = self.liked_selected.saturating_sub(1);
    }

    /// Play the highlighted liked song if it is in the playlist.
    pub fn play_liked_selected(&mut self) {
        let Some(entry) = self.liked.get(self.liked_selected) else {
            return;
        };
        let found = self.player.playlist().iter().position(|t| {
            t.like_id() == entry.id || (t.title == entry.title && t.artist == entry.artist)
        });
        match found {
            Some(index) => self.player.play_at(index),
            None => self.status = Some(format!("{} is not in the playlist.", entry.title)),
        }
    }

    pub fn remove_liked_selected(&mut self) {
        let Some(id) = self.liked.get(self.liked_selected).map(|e| e.id.clone()) else {
            return;
        };
        match liked::remove(self.storage.as_mut(), &id) {
            Ok(left) => self.liked = left,
            Err(e) => log::warn!("could not update liked songs: {e}"),
        }
        self.liked_selected = self.liked_selected.min(self.liked.len().saturating_sub(1));
        self.refresh_current_liked();
    }

    pub fn queue_select_next(&mut self) {
        let len = self.player.playlist().len();
        if len > 0 {
            self.queue_selected = (self.queue_selected + 1).min(len - 1);
        }
    }

    pub fn queue_select_prev(&mut self) {
        self.queue_selected = self.queue_selected.saturating_sub(1);
    }

    pub fn play_queue_selected(&mut self) {
        self.player.play_at(self.queue_selected);
    }

    pub fn play_search_selected(&mut self) {
        if let Some(index) = self.search.playable_selection() {
            self.player.play_at(index);
            self.open(Route::Player);
        } else if !self.search.results.is_empty() {
            self.status = Some("Search results from the feed cannot be played.".to_string());
        }
    }

    pub fn submit_login(&mut self) {
        if let FormOutcome::Success(user) = self.login.submit(&self.auth) {
            self.finish_auth(user);
        }
    }

    pub fn submit_signup(&mut self) {
        if let FormOutcome::Success(user) = self.signup.submit(&self.auth) {
            self.finish_auth(user);
        }
    }

    /// The form for the current page, if it has one.
    pub fn active_form(&mut self) -> Option<&mut dyn AuthForm> {
        match self.location.route {
            Route::Login => Some(&mut self.login),
            Route::Signup => Some(&mut self.signup),
            _ => None,
        }
    }

    fn finish_auth(&mut self, user: AuthUser) {
        if let Err(e) = auth::sign_in(self.storage.as_mut(), &user) {
            log::warn!("could not persist session: {e}");
        }
        self.status = Some(format!("Welcome, {}.", user.label()));
        self.user = Some(user);
        let to = after_auth(&self.location);
        self.navigate(to);
    }

    pub fn sign_out(&mut self) {
        if self.user.is_none() {
            return;
        }
        if let Err(e) = auth::sign_out(self.storage.as_mut()) {
            log::warn!("could not clear session: {e}");
        }
        self.user = None;
        self.status = Some("Signed out.".to_string());
        if self.location.route.requires_session() {
            self.open(Route::Player);
        }
    }
}
