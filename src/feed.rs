//! Paginated movie feed: concurrent batch fetching, ordered merging and the
//! favorites overlay.
//!
//! All state except the in-flight page set is owned by the update loop. Page
//! fetches run inside one spawned task per batch; when every fetch of the
//! batch has returned, the task posts a [`FeedEvent`] back and the update loop
//! merges it with [`MovieFeed::apply`].

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::catalog::Catalog;
use crate::error::FetchError;
use crate::favorites::FavoritesStore;
use crate::types::{Filter, Movie, PageResult};

type InFlight = Arc<Mutex<BTreeSet<u32>>>;
type UpdateCallback = Box<dyn Fn() + Send + Sync>;

/// Completions posted by background fetches, to be handed to [`MovieFeed::apply`]
#[derive(Debug)]
pub enum FeedEvent {
    BatchFinished(BatchOutcome),
    SearchFinished {
        generation: u64,
        query: String,
        result: Result<Vec<Movie>, FetchError>,
    },
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub generation: u64,
    /// Every page the batch asked for, including the ones that failed
    pub requested: Vec<u32>,
    /// Successful pages, in completion order
    pub pages: Vec<PageResult>,
}

#[derive(Debug, Clone, Copy)]
pub struct FeedSettings {
    pub batch_size: u32,
    pub lookahead: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            batch_size: 2,
            lookahead: 5,
        }
    }
}

pub struct MovieFeed {
    catalog: Arc<dyn Catalog>,
    favorites_store: Box<dyn FavoritesStore>,
    favorites: HashSet<u64>,
    items: Vec<Movie>,
    seen: HashSet<u64>,
    current_page: u32,
    total_pages: Option<u32>,
    // Replaced, not cleared, on reset so late completions from an older
    // session can only touch their own set.
    in_flight: InFlight,
    batch_loading: bool,
    search_query: Option<String>,
    generation: u64,
    settings: FeedSettings,
    events: mpsc::UnboundedSender<FeedEvent>,
    on_update: Option<UpdateCallback>,
}

impl std::fmt::Debug for MovieFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieFeed")
            .field("items", &self.items.len())
            .field("current_page", &self.current_page)
            .field("total_pages", &self.total_pages)
            .field("batch_loading", &self.batch_loading)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl MovieFeed {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        favorites_store: Box<dyn FavoritesStore>,
        settings: FeedSettings,
        events: mpsc::UnboundedSender<FeedEvent>,
    ) -> Self {
        let favorites = favorites_store.load();
        tracing::debug!(count = favorites.len(), "loaded favorites");

        Self {
            catalog,
            favorites_store,
            favorites,
            items: Vec::new(),
            seen: HashSet::new(),
            current_page: 1,
            total_pages: None,
            in_flight: Arc::new(Mutex::new(BTreeSet::new())),
            batch_loading: false,
            search_query: None,
            generation: 0,
            settings: FeedSettings {
                batch_size: settings.batch_size.max(1),
                ..settings
            },
            events,
            on_update: None,
        }
    }

    /// Called after every merge, search result, favorite toggle and reset
    pub fn set_on_update(&mut self, callback: impl Fn() + Send + Sync + 'static) {
        self.on_update = Some(Box::new(callback));
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    /// Loaded movies passing `filter`, recomputed on every call
    pub fn visible(&self, filter: Filter) -> Vec<&Movie> {
        self.items.iter().filter(|m| filter.matches(m)).collect()
    }

    /// Mean `vote_average` of the movies passing `filter`, 0.0 when none do
    pub fn average_rating(&self, filter: Filter) -> f64 {
        let visible = self.visible(filter);
        if visible.is_empty() {
            return 0.0;
        }
        visible.iter().map(|m| m.vote_average).sum::<f64>() / visible.len() as f64
    }

    pub fn is_favorite(&self, id: u64) -> bool {
        self.favorites.contains(&id)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn in_flight(&self) -> BTreeSet<u32> {
        self.in_flight.lock().clone()
    }

    pub fn is_batch_loading(&self) -> bool {
        self.batch_loading
    }

    pub fn is_searching(&self) -> bool {
        self.search_query.is_some()
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    /// Start (or continue) browsing. Leaves search results behind by starting
    /// a fresh session.
    pub fn fetch_initial(&mut self) -> Vec<u32> {
        if self.is_searching() {
            self.reset_and_fetch()
        } else {
            self.schedule_next_batch()
        }
    }

    /// Drop everything loaded so far. Requests already on the wire keep
    /// running; their results are discarded when they arrive.
    pub fn reset(&mut self) {
        self.start_session();
        self.items.clear();
        self.seen.clear();
        self.search_query = None;
        tracing::debug!(generation = self.generation, "feed reset");
        self.publish();
    }

    pub fn reset_and_fetch(&mut self) -> Vec<u32> {
        self.reset();
        self.schedule_next_batch()
    }

    /// Prefetch heuristic for scrolling: schedules the next batch once the
    /// visible index is within `lookahead` of the end of the list.
    pub fn load_more_if_needed(&mut self, visible_index: usize) -> Vec<u32> {
        if self.is_searching() {
            return Vec::new();
        }
        let threshold = self.items.len().saturating_sub(self.settings.lookahead);
        if visible_index >= threshold {
            self.schedule_next_batch()
        } else {
            Vec::new()
        }
    }

    /// Issue one concurrent fetch per page of the next batch and return the
    /// pages requested. Does nothing while a batch is loading, while showing
    /// search results, or when every candidate page is past the end or
    /// already in flight.
    pub fn schedule_next_batch(&mut self) -> Vec<u32> {
        if self.batch_loading || self.is_searching() {
            return Vec::new();
        }

        let pages = self.candidate_pages();
        if pages.is_empty() {
            tracing::trace!(
                current_page = self.current_page,
                total_pages = ?self.total_pages,
                "nothing to schedule"
            );
            return pages;
        }

        self.batch_loading = true;
        self.in_flight.lock().extend(pages.iter().copied());
        tracing::debug!(?pages, generation = self.generation, "scheduling batch");
        self.spawn_batch(pages.clone());
        pages
    }

    fn candidate_pages(&self) -> Vec<u32> {
        let in_flight = self.in_flight.lock();
        let mut pages = Vec::new();
        for offset in 0..self.settings.batch_size {
            let page = self.current_page + offset;
            if self.total_pages.is_some_and(|total| page > total) {
                break;
            }
            if in_flight.contains(&page) {
                continue;
            }
            pages.push(page);
        }
        pages
    }

    fn spawn_batch(&self, requested: Vec<u32>) {
        let catalog = Arc::clone(&self.catalog);
        let in_flight = Arc::clone(&self.in_flight);
        let tx = self.events.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            let collected = Mutex::new(Vec::with_capacity(requested.len()));

            let fetches = requested.iter().map(|&page| {
                let (catalog, in_flight, collected) = (&catalog, &in_flight, &collected);
                async move {
                    let result = catalog.fetch_page(page).await;
                    in_flight.lock().remove(&page);
                    match result {
                        Ok(response) => {
                            if response.page != page {
                                tracing::warn!(page, reported = response.page, "page number mismatch");
                            }
                            collected.lock().push(PageResult {
                                page,
                                items: response.results,
                                total_pages: response.total_pages,
                            });
                        }
                        Err(e) => {
                            tracing::warn!(page, error = %e, "page fetch failed, skipping");
                        }
                    }
                }
            });
            join_all(fetches).await;

            let outcome = BatchOutcome {
                generation,
                pages: collected.into_inner(),
                requested,
            };
            tx.send(FeedEvent::BatchFinished(outcome)).ok();
        });
    }

    /// Run a search, replacing the list with its results once they arrive.
    /// Pagination state is reset up front; the current items stay visible
    /// until the results replace them.
    pub fn search(&mut self, query: &str) {
        let query = query.trim().to_string();
        self.start_session();
        self.search_query = Some(query.clone());

        let catalog = Arc::clone(&self.catalog);
        let tx = self.events.clone();
        let generation = self.generation;
        tracing::debug!(%query, generation, "searching");

        tokio::spawn(async move {
            let result = catalog.search(&query).await.map(|r| r.results);
            tx.send(FeedEvent::SearchFinished {
                generation,
                query,
                result,
            })
            .ok();
        });
    }

    /// Flip favorite status of `id`, persist it and return the new status
    pub fn toggle_favorite(&mut self, id: u64) -> bool {
        let favorite = if self.favorites.remove(&id) {
            false
        } else {
            self.favorites.insert(id);
            true
        };
        self.favorites_store.save(&self.favorites);

        for movie in self.items.iter_mut().filter(|m| m.id == id) {
            movie.favorite = favorite;
        }
        self.publish();
        favorite
    }

    /// Fold a background completion into the feed. Returns the error of a
    /// failed search for the current session; page failures are only logged.
    pub fn apply(&mut self, event: FeedEvent) -> Option<FetchError> {
        match event {
            FeedEvent::BatchFinished(outcome) => {
                self.merge_batch(outcome);
                None
            }
            FeedEvent::SearchFinished {
                generation,
                query,
                result,
            } => self.finish_search(generation, query, result),
        }
    }

    fn merge_batch(&mut self, outcome: BatchOutcome) {
        if outcome.generation != self.generation {
            tracing::debug!(
                stale = outcome.generation,
                current = self.generation,
                "discarding batch from an earlier session"
            );
            return;
        }

        let BatchOutcome {
            requested,
            mut pages,
            ..
        } = outcome;

        if self.total_pages.is_none() {
            self.total_pages = pages.iter().find_map(|p| p.total_pages);
        }

        pages.sort_by_key(|p| p.page);
        let merged_pages = pages.len();

        let fresh_session = self.items.is_empty() && self.current_page == 1;
        if fresh_session {
            self.seen.clear();
        }
        let mut merged = Vec::new();
        for page in pages {
            for movie in page.items {
                if self.seen.insert(movie.id) {
                    merged.push(self.attach_favorite(movie));
                }
            }
        }
        if fresh_session {
            self.items = merged;
        } else {
            self.items.extend(merged);
        }

        self.current_page += requested.len() as u32;
        self.batch_loading = false;

        tracing::info!(
            requested = requested.len(),
            merged = merged_pages,
            items = self.items.len(),
            next_page = self.current_page,
            "batch merged"
        );
        self.publish();
    }

    fn finish_search(
        &mut self,
        generation: u64,
        query: String,
        result: Result<Vec<Movie>, FetchError>,
    ) -> Option<FetchError> {
        if generation != self.generation || !self.is_searching() {
            tracing::debug!(%query, "discarding stale search results");
            return None;
        }

        match result {
            Ok(movies) => {
                self.seen.clear();
                self.items = movies
                    .into_iter()
                    .filter(|m| self.seen.insert(m.id))
                    .collect();
                for movie in &mut self.items {
                    movie.favorite = self.favorites.contains(&movie.id);
                }
                tracing::info!(%query, results = self.items.len(), "search finished");
                self.publish();
                None
            }
            Err(e) => {
                tracing::warn!(%query, error = %e, "search failed");
                Some(e)
            }
        }
    }

    fn attach_favorite(&self, mut movie: Movie) -> Movie {
        movie.favorite = self.favorites.contains(&movie.id);
        movie
    }

    /// Forget pagination progress and fence off anything still in flight
    fn start_session(&mut self) {
        self.generation += 1;
        self.in_flight = Arc::new(Mutex::new(BTreeSet::new()));
        self.current_page = 1;
        self.total_pages = None;
        self.batch_loading = false;
    }

    fn publish(&self) {
        if let Some(callback) = &self.on_update {
            callback();
        }
    }
}
