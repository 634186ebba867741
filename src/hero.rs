use crate::models::{
    Catalog, ContentItem, ContentKind, DisplayKind, DisplayRecord, HOME_HERO_TAG,
};
use crate::navigation::NavigationIntent;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";
const DEFAULT_RATING: &str = "TV-PG";
const DEFAULT_SCORE: &str = "8.0";
const DEFAULT_YEAR: &str = "2024";
const NO_DESCRIPTION: &str = "No description available";

/// Pick the featured item for the home hero.
///
/// Movies and web-series entries tagged "Home Hero" compete; the most
/// recently created one wins and equal timestamps keep catalog order.
/// With no candidate the platform welcome card is returned.
pub fn select_hero(catalog: &Catalog) -> DisplayRecord {
    let mut candidates: Vec<&ContentItem> = catalog
        .movies
        .iter()
        .chain(catalog.web_series.iter())
        .filter(|item| is_home_hero(item))
        .collect();

    // Vec::sort_by_key is stable, ties keep their catalog order.
    candidates.sort_by_key(|item| std::cmp::Reverse(created_at_key(&item.created_at)));

    match candidates.first() {
        Some(item) => {
            debug!(id = %item.id, title = %item.title, "Selected hero content");
            project(item)
        }
        None => {
            debug!("No Home Hero content, using welcome card");
            placeholder()
        }
    }
}

/// The card shown when nothing in the catalog is featured.
pub fn placeholder() -> DisplayRecord {
    DisplayRecord {
        id: "1".to_string(),
        title: "Welcome to StreamVault".to_string(),
        description:
            "Discover amazing movies, web series, and shows. Upload your content to get started."
                .to_string(),
        rating: DEFAULT_RATING.to_string(),
        year: DEFAULT_YEAR.to_string(),
        score: "9.0".to_string(),
        image: PLACEHOLDER_IMAGE.to_string(),
        kind: DisplayKind::Platform,
        season_number: None,
        video_url: String::new(),
    }
}

/// Project any catalog item into a hero display record.
pub fn project(item: &ContentItem) -> DisplayRecord {
    let fields = HeroFields::of(item);

    let description = first_non_empty([
        fields.description,
        fields.season_description,
        item.description.as_deref(),
    ])
    .unwrap_or(NO_DESCRIPTION);
    let year = first_non_empty([fields.release_year, extract_year(&item.created_at)])
        .unwrap_or(DEFAULT_YEAR);

    let (kind, season_number) = match &item.kind {
        ContentKind::Movie { .. } => (DisplayKind::Movie, None),
        ContentKind::WebSeries { .. } => {
            (DisplayKind::Series, Some(item.season_number.unwrap_or(1)))
        }
        ContentKind::Show { .. } => (DisplayKind::Show, None),
        ContentKind::Unknown => (DisplayKind::Platform, None),
    };

    DisplayRecord {
        id: item.id.clone(),
        title: item.title.clone(),
        description: description.to_string(),
        rating: first_non_empty([fields.rating_type])
            .unwrap_or(DEFAULT_RATING)
            .to_string(),
        year: year.to_string(),
        score: first_non_empty([fields.rating])
            .unwrap_or(DEFAULT_SCORE)
            .to_string(),
        image: first_non_empty([fields.thumbnail_url])
            .unwrap_or(PLACEHOLDER_IMAGE)
            .to_string(),
        kind,
        season_number,
        video_url: fields.video_url.unwrap_or_default().to_string(),
    }
}

/// Navigation for the hero's Play button.
pub fn play_intent(record: &DisplayRecord) -> NavigationIntent {
    NavigationIntent::Details {
        id: None,
        record: Some(record.clone()),
    }
}

/// Navigation for the hero's More Info button.
pub fn more_info_intent(record: &DisplayRecord) -> NavigationIntent {
    NavigationIntent::Details {
        id: Some(record.id.clone()),
        record: Some(record.clone()),
    }
}

/// Local state of the hero banner. The video starts muted and the content
/// card collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroState {
    pub muted: bool,
    pub hovered: bool,
}

impl Default for HeroState {
    fn default() -> Self {
        Self {
            muted: true,
            hovered: false,
        }
    }
}

impl HeroState {
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn card_expanded(&self) -> bool {
        self.hovered
    }
}

fn is_home_hero(item: &ContentItem) -> bool {
    let tags = match &item.kind {
        ContentKind::Movie { movie: Some(movie) } => &movie.feature_in,
        ContentKind::WebSeries {
            web_series: Some(series),
        } => match series.sole_season() {
            Some(season) => &season.feature_in,
            None => return false,
        },
        _ => return false,
    };
    tags.iter().any(|tag| tag == HOME_HERO_TAG)
}

/// Type-specific fields the hero reads, borrowed from whichever record the
/// item carries.
#[derive(Default)]
struct HeroFields<'a> {
    description: Option<&'a str>,
    season_description: Option<&'a str>,
    rating_type: Option<&'a str>,
    rating: Option<&'a str>,
    release_year: Option<&'a str>,
    thumbnail_url: Option<&'a str>,
    video_url: Option<&'a str>,
}

impl<'a> HeroFields<'a> {
    fn of(item: &'a ContentItem) -> Self {
        match &item.kind {
            ContentKind::Movie { movie: Some(movie) } => Self {
                description: movie.description.as_deref(),
                season_description: None,
                rating_type: movie.rating_type.as_deref(),
                rating: movie.rating.as_deref(),
                release_year: movie.release_year.as_deref(),
                thumbnail_url: movie.thumbnail_url.as_deref(),
                video_url: movie.video_url.as_deref(),
            },
            ContentKind::WebSeries {
                web_series: Some(series),
            } => match series.sole_season() {
                Some(season) => Self {
                    description: None,
                    season_description: season.season_description.as_deref(),
                    rating_type: season.rating_type.as_deref(),
                    rating: season.rating.as_deref(),
                    release_year: season.release_year.as_deref(),
                    thumbnail_url: season.thumbnail_url.as_deref(),
                    video_url: season
                        .episodes
                        .first()
                        .and_then(|episode| episode.video_url.as_deref()),
                },
                None => Self::default(),
            },
            ContentKind::Show { show: Some(show) } => Self {
                description: show.description.as_deref(),
                season_description: None,
                rating_type: show.rating_type.as_deref(),
                rating: show.rating.as_deref(),
                release_year: show.release_year.as_deref(),
                thumbnail_url: show.thumbnail_url.as_deref(),
                video_url: None,
            },
            _ => Self::default(),
        }
    }
}

fn first_non_empty<'a, const N: usize>(values: [Option<&'a str>; N]) -> Option<&'a str> {
    values.into_iter().flatten().find(|v| !v.is_empty())
}

fn extract_year(created_at: &str) -> Option<&str> {
    created_at.split('-').next().filter(|s| !s.is_empty())
}

/// Sort key for `created_at`; `None` (unparseable) orders before any
/// timestamp, so it lands last once reversed.
fn created_at_key(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
