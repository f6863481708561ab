use crate::feed::FeedEvent;

#[derive(Debug)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Select,
    Tick,

    // Catalog
    FetchInitial,
    Refresh,
    Feed(FeedEvent),
    FeedUpdated,

    // List filtering and favorites
    ToggleFilter,
    ToggleFavorite,

    // Search
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,
    SearchConfirm,

    // Polish
    ToggleTheme,
    OpenInBrowser,
    YankUrl,

    None,
}
