use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::config::GeneralConfig;
use crate::event::Event;
use crate::feed::MovieFeed;
use crate::store::StateDir;
use crate::theme;
use crate::types::{Filter, Movie, Theme};

const PAGE_STEP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,   // Catalog or favorites, depending on the filter
    Detail, // Single movie
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

pub struct App {
    pub screen: Screen,
    pub filter: Filter,
    pub theme: Theme,
    pub input_mode: InputMode,
    pub search_input: String,
    pub index: usize,
    pub scroll_offset: usize,
    pub detail_id: Option<u64>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub should_quit: bool,
    pub feed: MovieFeed,
    last_keystroke: Option<Instant>,
    debounce: Duration,
    min_search_len: usize,
    state_dir: Option<StateDir>,
}

impl App {
    pub fn new(
        mut feed: MovieFeed,
        general: &GeneralConfig,
        state_dir: Option<StateDir>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        feed.set_on_update(move || {
            action_tx.send(Action::FeedUpdated).ok();
        });

        Self {
            screen: Screen::List,
            filter: Filter::default(),
            theme: theme::load(state_dir.as_ref()),
            input_mode: InputMode::default(),
            search_input: String::new(),
            index: 0,
            scroll_offset: 0,
            detail_id: None,
            error: None,
            notice: None,
            should_quit: false,
            feed,
            last_keystroke: None,
            debounce: Duration::from_millis(general.search_debounce_ms),
            min_search_len: general.min_search_len.max(1),
            state_dir,
        }
    }

    /// Movies shown by the list screen under the current filter
    pub fn visible(&self) -> Vec<&Movie> {
        self.feed.visible(self.filter)
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        match self.screen {
            Screen::List => self.visible().get(self.index).copied(),
            Screen::Detail => {
                let id = self.detail_id?;
                self.feed.items().iter().find(|m| m.id == id)
            }
        }
    }

    fn selected_url(&self) -> Option<String> {
        let movie = self.selected_movie()?;
        Some(self.feed.catalog().web_url(movie.id))
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Tick => Action::Tick,
            Event::Key(key) => self.handle_key(key),
            Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.input_mode == InputMode::Search {
            return match key.code {
                KeyCode::Esc => Action::ExitSearchMode,
                KeyCode::Enter => Action::SearchConfirm,
                KeyCode::Backspace => Action::SearchBackspace,
                KeyCode::Down => Action::ScrollDown,
                KeyCode::Up => Action::ScrollUp,
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Action::SearchInput(c)
                }
                _ => Action::None,
            };
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('d') => Action::PageDown,
                KeyCode::Char('u') => Action::PageUp,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') => match self.screen {
                Screen::List => Action::Quit,
                Screen::Detail => Action::Back,
            },
            KeyCode::Esc => match self.screen {
                Screen::Detail => Action::Back,
                Screen::List if self.feed.is_searching() => Action::ExitSearchMode,
                Screen::List => Action::Quit,
            },
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('f') => Action::ToggleFavorite,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('t') => Action::ToggleTheme,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('y') => Action::YankUrl,
            KeyCode::Tab if self.screen == Screen::List => Action::ToggleFilter,
            KeyCode::Char('/') if self.screen == Screen::List => Action::EnterSearchMode,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if !matches!(
            action,
            Action::Tick | Action::Feed(_) | Action::FeedUpdated | Action::None
        ) {
            self.error = None;
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match self.screen {
                Screen::List => {
                    self.should_quit = true;
                }
                Screen::Detail => {
                    self.screen = Screen::List;
                    self.detail_id = None;
                    self.scroll_offset = 0;
                }
            },
            Action::ScrollUp => match self.screen {
                Screen::List => {
                    self.index = self.index.saturating_sub(1);
                    self.maybe_load_more();
                }
                Screen::Detail => {
                    self.scroll_offset = self.scroll_offset.saturating_sub(1);
                }
            },
            Action::ScrollDown => match self.screen {
                Screen::List => {
                    let len = self.visible().len();
                    if len > 0 && self.index < len - 1 {
                        self.index += 1;
                    }
                    self.maybe_load_more();
                }
                Screen::Detail => {
                    self.scroll_offset += 1;
                }
            },
            Action::PageUp => match self.screen {
                Screen::List => {
                    self.index = self.index.saturating_sub(PAGE_STEP);
                    self.maybe_load_more();
                }
                Screen::Detail => {
                    self.scroll_offset = self.scroll_offset.saturating_sub(PAGE_STEP);
                }
            },
            Action::PageDown => match self.screen {
                Screen::List => {
                    let last = self.visible().len().saturating_sub(1);
                    self.index = (self.index + PAGE_STEP).min(last);
                    self.maybe_load_more();
                }
                Screen::Detail => {
                    self.scroll_offset += PAGE_STEP;
                }
            },
            Action::GoToTop => match self.screen {
                Screen::List => self.index = 0,
                Screen::Detail => self.scroll_offset = 0,
            },
            Action::GoToBottom => {
                if self.screen == Screen::List {
                    self.index = self.visible().len().saturating_sub(1);
                    self.maybe_load_more();
                }
            }
            Action::Select => {
                if self.screen == Screen::List {
                    if let Some(id) = self.selected_movie().map(|m| m.id) {
                        self.detail_id = Some(id);
                        self.scroll_offset = 0;
                        self.screen = Screen::Detail;
                    }
                }
            }
            Action::Tick => {
                self.poll_search(Instant::now());
            }

            // Catalog
            Action::FetchInitial => {
                self.feed.fetch_initial();
            }
            Action::Refresh => {
                self.input_mode = InputMode::Normal;
                self.search_input.clear();
                self.last_keystroke = None;
                self.screen = Screen::List;
                self.detail_id = None;
                self.index = 0;
                self.feed.reset_and_fetch();
            }
            Action::Feed(event) => {
                if let Some(e) = self.feed.apply(event) {
                    self.error = Some(format!("Search failed: {}", e));
                }
            }
            Action::FeedUpdated => {
                self.clamp_selection();
            }

            Action::ToggleFilter => {
                self.filter = self.filter.toggled();
                self.index = 0;
            }
            Action::ToggleFavorite => {
                if let Some(id) = self.selected_movie().map(|m| m.id) {
                    let favorite = self.feed.toggle_favorite(id);
                    self.notice = Some(if favorite {
                        "Added to favorites".to_string()
                    } else {
                        "Removed from favorites".to_string()
                    });
                }
            }

            // Search
            Action::EnterSearchMode => {
                self.input_mode = InputMode::Search;
                self.filter = Filter::All;
            }
            Action::ExitSearchMode => {
                self.input_mode = InputMode::Normal;
                self.search_input.clear();
                self.last_keystroke = None;
                if self.feed.is_searching() {
                    self.index = 0;
                    self.feed.fetch_initial();
                }
            }
            Action::SearchInput(c) => {
                self.search_input.push(c);
                self.last_keystroke = Some(Instant::now());
            }
            Action::SearchBackspace => {
                self.search_input.pop();
                self.last_keystroke = Some(Instant::now());
            }
            Action::SearchConfirm => {
                self.input_mode = InputMode::Normal;
                self.last_keystroke = None;
                self.submit_search();
            }

            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                theme::save(self.state_dir.as_ref(), self.theme);
                self.notice = Some(format!("{} theme", self.theme));
            }
            Action::OpenInBrowser => {
                if let Some(url) = self.selected_url() {
                    if let Err(e) = open::that(&url) {
                        self.error = Some(format!("Failed to open browser: {}", e));
                    }
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.selected_url() {
                    match arboard::Clipboard::new().and_then(|mut c| c.set_text(url.clone())) {
                        Ok(()) => self.notice = Some(format!("Copied {}", url)),
                        Err(e) => self.error = Some(format!("Clipboard unavailable: {}", e)),
                    }
                }
            }

            Action::None => {}
        }
    }

    /// Prefetch only applies to the unfiltered catalog listing
    fn maybe_load_more(&mut self) {
        if self.filter == Filter::All && !self.feed.is_searching() {
            self.feed.load_more_if_needed(self.index);
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.index >= len {
            self.index = len.saturating_sub(1);
        }

        if self.screen == Screen::Detail && self.selected_movie().is_none() {
            self.screen = Screen::List;
            self.detail_id = None;
            self.scroll_offset = 0;
        }
    }

    /// Fire the pending search once typing has paused for the debounce window
    fn poll_search(&mut self, now: Instant) {
        let Some(at) = self.last_keystroke else {
            return;
        };
        if now.saturating_duration_since(at) >= self.debounce {
            self.last_keystroke = None;
            self.submit_search();
        }
    }

    fn submit_search(&mut self) {
        let query = self.search_input.trim();
        if query.chars().count() >= self.min_search_len {
            if self.feed.search_query() != Some(query) {
                self.feed.search(query);
                self.index = 0;
            }
        } else if query.is_empty() && self.feed.is_searching() {
            self.feed.fetch_initial();
            self.index = 0;
        }
    }
}
