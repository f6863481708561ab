use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// A catalog entry. `favorite` is attached locally by the feed and never
/// read from or written to the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: String,
    #[serde(skip)]
    pub favorite: bool,
}

impl Movie {
    /// Year part of `release_date`, when it is a valid `YYYY-MM-DD` date
    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", POSTER_BASE_URL, p))
    }
}

/// One page of the top-rated listing as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub results: Vec<Movie>,
}

/// Search response. Only the first page is ever requested.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<Movie>,
}

/// A page collected by a batch, keyed by the page number that was requested
#[derive(Debug, Clone)]
pub struct PageResult {
    pub page: u32,
    pub items: Vec<Movie>,
    pub total_pages: Option<u32>,
}

/// Which slice of the loaded catalog a list screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Favorites,
}

impl Filter {
    pub fn matches(&self, movie: &Movie) -> bool {
        match self {
            Filter::All => true,
            Filter::Favorites => movie.favorite,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Filter::All => Filter::Favorites,
            Filter::Favorites => Filter::All,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "Top rated"),
            Filter::Favorites => write!(f, "Favorites"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "Light"),
            Theme::Dark => write!(f, "Dark"),
        }
    }
}
