use crate::catalog::CatalogSnapshot;
use crate::models::{Catalog, ContentItem, ContentKind, DisplayDetails, DisplayRecord, Episode};
use crate::navigation::NavigationIntent;
use serde::Serialize;
use tracing::{debug, info};

/// Supplies the episodes behind a season's or show's episode id list.
pub trait EpisodeSource: Send + Sync {
    fn episodes(&self, episode_ids: &[String]) -> Vec<Episode>;
}

/// Fixed three-episode listing used until a real episode lookup is wired
/// in. Ignores the ids it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderEpisodes;

impl EpisodeSource for PlaceholderEpisodes {
    fn episodes(&self, _episode_ids: &[String]) -> Vec<Episode> {
        (1..=3)
            .map(|n| Episode {
                id: n.to_string(),
                title: format!("Episode {n}"),
                description: format!("Episode description {n}"),
            })
            .collect()
    }
}

/// Map the type-specific record of an item onto the uniform detail fields.
/// Items without a usable record come back empty rather than failing.
pub fn normalize_details(item: &ContentItem) -> DisplayDetails {
    match &item.kind {
        ContentKind::Movie { movie: Some(movie) } => DisplayDetails {
            description: movie.description.clone().unwrap_or_default(),
            release_year: movie.release_year.clone(),
            rating_type: movie.rating_type.clone(),
            rating: movie.rating.clone(),
            duration: movie.duration.clone(),
            directors: movie.director.clone(),
            writers: movie.writer.clone(),
            cast: movie.cast_members.clone(),
            thumbnail_url: movie.thumbnail_url.clone().unwrap_or_default(),
            trailer_url: movie.trailer_url.clone().unwrap_or_default(),
            genres: item.genre.clone(),
        },
        ContentKind::WebSeries {
            web_series: Some(series),
        } => match series.sole_season() {
            Some(season) => DisplayDetails {
                description: season.season_description.clone().unwrap_or_default(),
                release_year: season.release_year.clone(),
                rating_type: season.rating_type.clone(),
                rating: season.rating.clone(),
                duration: None,
                directors: season.director.clone(),
                writers: season.writer.clone(),
                cast: season.cast_members.clone(),
                thumbnail_url: season.thumbnail_url.clone().unwrap_or_default(),
                trailer_url: season.trailer_url.clone().unwrap_or_default(),
                genres: item.genre.clone(),
            },
            None => DisplayDetails::default(),
        },
        ContentKind::Show { show: Some(show) } => DisplayDetails {
            description: show.description.clone().unwrap_or_default(),
            release_year: show.release_year.clone(),
            rating_type: show.rating_type.clone(),
            rating: show.rating.clone(),
            duration: None,
            directors: show.directors.clone(),
            writers: show.writers.clone(),
            cast: show.cast_members.clone(),
            thumbnail_url: show.thumbnail_url.clone().unwrap_or_default(),
            trailer_url: show.trailer_url.clone().unwrap_or_default(),
            genres: show.genres.clone().unwrap_or_else(|| item.genre.clone()),
        },
        ContentKind::Movie { movie: None }
        | ContentKind::WebSeries { web_series: None }
        | ContentKind::Show { show: None }
        | ContentKind::Unknown => DisplayDetails::default(),
    }
}

/// Episodes to list for `selected_season` (1-based).
///
/// Web series read the chosen season's id list. Shows have no seasons and
/// list their episodes latest first. Movies have none.
pub fn resolve_episodes(
    item: &ContentItem,
    selected_season: usize,
    source: &dyn EpisodeSource,
) -> Vec<Episode> {
    match &item.kind {
        ContentKind::WebSeries {
            web_series: Some(series),
        } => selected_season
            .checked_sub(1)
            .and_then(|index| series.seasons.get(index))
            .and_then(|season| season.episode_id_list.as_deref())
            .map(|ids| source.episodes(ids))
            .unwrap_or_default(),
        ContentKind::Show { show: Some(show) } => match show.episode_id_list.as_deref() {
            Some(ids) => {
                let mut episodes = source.episodes(ids);
                episodes.reverse();
                episodes
            }
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Find an item by database id, content id, or the id nested in its
/// type-specific record. Movies are searched first, then web series, then
/// shows; the first match wins.
pub fn find_content<'a>(catalog: &'a Catalog, id: &str) -> Option<&'a ContentItem> {
    debug!("Searching for content with ID: {}", id);
    let found = catalog.items().find(|item| {
        item.id == id || item.content_id == id || nested_id(item) == Some(id)
    });
    match found {
        Some(item) => debug!(title = %item.title, "Found content"),
        None => info!("Content not found for ID: {}", id),
    }
    found
}

fn nested_id(item: &ContentItem) -> Option<&str> {
    match &item.kind {
        ContentKind::Movie { movie: Some(movie) } => movie.content_id.as_deref(),
        ContentKind::WebSeries {
            web_series: Some(series),
        } => series.content_id.as_deref(),
        ContentKind::Show { show: Some(show) } => show.id.as_deref(),
        _ => None,
    }
}

/// What the details page should show.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsView<'a> {
    Loading,
    /// A record handed over by the previous screen; no lookup was done.
    Navigated(DisplayRecord),
    Found(&'a ContentItem),
    NotFound { id: String, available: usize },
}

/// Decide the details view for `id`. A navigation-provided record wins over
/// the catalog, but not over a catalog that is still loading.
pub fn resolve_view<'a>(
    snapshot: &'a CatalogSnapshot,
    id: Option<&str>,
    navigated: Option<DisplayRecord>,
) -> DetailsView<'a> {
    if snapshot.loading {
        return DetailsView::Loading;
    }
    if let Some(record) = navigated {
        return DetailsView::Navigated(record);
    }
    let catalog = snapshot.catalog.as_deref();
    let found = match (catalog, id) {
        (Some(catalog), Some(id)) => find_content(catalog, id),
        _ => None,
    };
    match found {
        Some(item) => DetailsView::Found(item),
        None => DetailsView::NotFound {
            id: id.unwrap_or_default().to_string(),
            available: catalog.map(Catalog::len).unwrap_or(0),
        },
    }
}

/// Season dropdown state. Seasons are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonPicker {
    pub selected: usize,
    pub open: bool,
}

impl Default for SeasonPicker {
    fn default() -> Self {
        Self {
            selected: 1,
            open: false,
        }
    }
}

impl SeasonPicker {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn choose(&mut self, season: usize) {
        self.selected = season;
        self.open = false;
    }

    /// One "Season N" label per season of a web series; empty otherwise.
    pub fn options(item: &ContentItem) -> Vec<String> {
        match &item.kind {
            ContentKind::WebSeries {
                web_series: Some(series),
            } => (1..=series.seasons.len())
                .map(|n| format!("Season {n}"))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Everything the details page renders for a found item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsPage {
    pub id: String,
    pub content_id: String,
    pub title: String,
    pub content_type: &'static str,
    pub details: DisplayDetails,
    pub image: String,
    pub playable: bool,
    pub selected_season: usize,
    pub season_dropdown_open: bool,
    pub season_options: Vec<String>,
    pub episodes: Vec<Episode>,
}

impl DetailsPage {
    pub fn build(item: &ContentItem, picker: &SeasonPicker, source: &dyn EpisodeSource) -> Self {
        let details = normalize_details(item);
        let image = if details.thumbnail_url.is_empty() {
            "/placeholder.svg".to_string()
        } else {
            details.thumbnail_url.clone()
        };
        Self {
            id: item.id.clone(),
            content_id: item.content_id.clone(),
            title: item.title.clone(),
            content_type: item.kind.label(),
            details,
            image,
            playable: matches!(item.kind, ContentKind::Movie { .. }),
            selected_season: picker.selected,
            season_dropdown_open: picker.open,
            season_options: SeasonPicker::options(item),
            episodes: resolve_episodes(item, picker.selected, source),
        }
    }
}

/// Play action from the details page. Movies play directly; everything
/// else needs an episode.
pub fn play_intent(item: &ContentItem, episode_id: Option<&str>) -> Option<NavigationIntent> {
    match (&item.kind, episode_id) {
        (ContentKind::Movie { .. }, _) => Some(NavigationIntent::Player {
            content_id: item.content_id.clone(),
            episode: None,
        }),
        (_, Some(episode)) => Some(NavigationIntent::Player {
            content_id: item.content_id.clone(),
            episode: Some(episode.to_string()),
        }),
        (_, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> ContentItem {
        serde_json::from_value(value).unwrap()
    }

    fn sample_catalog() -> Catalog {
        serde_json::from_value(json!({
            "movies": [{
                "id": "m1", "content_id": "cm1", "title": "Movie One", "content_type": "Movie",
                "movie": { "content_id": "nested-m1" }
            }],
            "webSeries": [{
                "id": "w1", "content_id": "cw1", "title": "Series One", "content_type": "Web Series",
                "web_series": { "content_id": "nested-w1", "seasons": [] }
            }],
            "shows": [{
                "id": "s1", "content_id": "cs1", "title": "Show One", "content_type": "Show",
                "show": { "id": "nested-s1" }
            }, {
                "id": "cm1", "content_id": "dup", "title": "Show Two", "content_type": "Show"
            }]
        }))
        .unwrap()
    }

    #[test]
    fn movie_without_genre_has_empty_genres() {
        let movie = item(json!({
            "id": "m1", "content_type": "Movie",
            "movie": { "description": "Heist", "duration": 95, "director": ["D"], "cast_members": ["C"] }
        }));
        let details = normalize_details(&movie);
        assert!(details.genres.is_empty());
        assert_eq!(details.description, "Heist");
        assert_eq!(details.duration.as_deref(), Some("95"));
        assert_eq!(details.directors, vec!["D"]);
        assert_eq!(details.cast, vec!["C"]);
    }

    #[test]
    fn web_series_uses_first_season() {
        let series = item(json!({
            "id": "w1", "content_type": "Web Series", "genre": ["Drama"],
            "web_series": { "seasons": [{
                "season_description": "First", "release_year": 2022, "rating_type": "TV-14",
                "rating": "8.4", "writer": ["W"], "thumbnail_url": "s1.jpg"
            }] }
        }));
        let details = normalize_details(&series);
        assert_eq!(details.description, "First");
        assert_eq!(details.release_year.as_deref(), Some("2022"));
        assert_eq!(details.rating.as_deref(), Some("8.4"));
        assert_eq!(details.duration, None);
        assert_eq!(details.writers, vec!["W"]);
        assert_eq!(details.genres, vec!["Drama"]);
    }

    #[test]
    fn show_genres_fall_back_to_item_genre() {
        let with_own = item(json!({
            "id": "s1", "content_type": "Show", "genre": ["Item"],
            "show": { "genres": ["Own"], "directors": ["D"] }
        }));
        assert_eq!(normalize_details(&with_own).genres, vec!["Own"]);

        let without_own = item(json!({
            "id": "s2", "content_type": "Show", "genre": ["Item"], "show": {}
        }));
        assert_eq!(normalize_details(&without_own).genres, vec!["Item"]);
    }

    #[test]
    fn missing_records_normalize_to_empty() {
        for value in [
            json!({ "id": "a", "content_type": "Movie" }),
            json!({ "id": "b", "content_type": "Web Series", "web_series": { "seasons": [] } }),
            json!({ "id": "c", "content_type": "Show", "show": null }),
            json!({ "id": "d", "content_type": "Audiobook" }),
        ] {
            assert_eq!(normalize_details(&item(value)), DisplayDetails::default());
        }
    }

    #[test]
    fn show_episodes_are_latest_first() {
        let show = item(json!({
            "id": "s1", "content_type": "Show", "show": { "episode_id_list": ["e1", "e2", "e3"] }
        }));
        let mut generated = PlaceholderEpisodes.episodes(&[]);
        generated.reverse();
        let resolved = resolve_episodes(&show, 1, &PlaceholderEpisodes);
        assert_eq!(resolved, generated);
        assert_eq!(resolved[0].title, "Episode 3");
        assert_eq!(resolve_episodes(&show, 4, &PlaceholderEpisodes), generated);
    }

    #[test]
    fn web_series_episodes_follow_selected_season() {
        let series = item(json!({
            "id": "w1", "content_type": "Web Series",
            "web_series": { "seasons": [
                { "episode_id_list": [] },
                { "season_description": "No ids yet" }
            ] }
        }));
        assert_eq!(resolve_episodes(&series, 1, &PlaceholderEpisodes).len(), 3);
        assert!(resolve_episodes(&series, 2, &PlaceholderEpisodes).is_empty());
        assert!(resolve_episodes(&series, 3, &PlaceholderEpisodes).is_empty());
        assert!(resolve_episodes(&series, 0, &PlaceholderEpisodes).is_empty());
    }

    #[test]
    fn episode_source_receives_season_ids() {
        struct Echo;
        impl EpisodeSource for Echo {
            fn episodes(&self, ids: &[String]) -> Vec<Episode> {
                ids.iter()
                    .map(|id| Episode {
                        id: id.clone(),
                        title: id.to_uppercase(),
                        description: String::new(),
                    })
                    .collect()
            }
        }
        let series = item(json!({
            "id": "w1", "content_type": "Web Series",
            "web_series": { "seasons": [{ "episode_id_list": ["a", "b"] }] }
        }));
        let ids: Vec<String> = resolve_episodes(&series, 1, &Echo)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn movies_have_no_episode_list() {
        let movie = item(json!({ "id": "m1", "content_type": "Movie", "movie": {} }));
        assert!(resolve_episodes(&movie, 1, &PlaceholderEpisodes).is_empty());
    }

    #[test]
    fn lookup_matches_every_id_kind() {
        let catalog = sample_catalog();
        assert_eq!(find_content(&catalog, "m1").unwrap().title, "Movie One");
        assert_eq!(find_content(&catalog, "cw1").unwrap().title, "Series One");
        assert_eq!(find_content(&catalog, "nested-m1").unwrap().title, "Movie One");
        assert_eq!(find_content(&catalog, "nested-w1").unwrap().title, "Series One");
        assert_eq!(find_content(&catalog, "nested-s1").unwrap().title, "Show One");
        assert!(find_content(&catalog, "missing").is_none());
    }

    #[test]
    fn lookup_first_match_wins() {
        // "cm1" is the movie's content id and the second show's id.
        let catalog = sample_catalog();
        assert_eq!(find_content(&catalog, "cm1").unwrap().title, "Movie One");
    }

    #[test]
    fn view_states() {
        let loading = CatalogSnapshot::loading();
        assert_eq!(resolve_view(&loading, Some("m1"), None), DetailsView::Loading);

        let ready = CatalogSnapshot::ready(sample_catalog());
        match resolve_view(&ready, Some("s1"), None) {
            DetailsView::Found(item) => assert_eq!(item.title, "Show One"),
            other => panic!("unexpected view {:?}", other),
        }
        assert_eq!(
            resolve_view(&ready, Some("nope"), None),
            DetailsView::NotFound {
                id: "nope".to_string(),
                available: 4
            }
        );

        let record = crate::hero::placeholder();
        assert_eq!(
            resolve_view(&ready, Some("nope"), Some(record.clone())),
            DetailsView::Navigated(record)
        );
    }

    #[test]
    fn season_picker_closes_on_choice() {
        let mut picker = SeasonPicker::default();
        assert_eq!(picker.selected, 1);
        picker.toggle();
        assert!(picker.open);
        picker.choose(2);
        assert_eq!(picker.selected, 2);
        assert!(!picker.open);
    }

    #[test]
    fn page_for_series() {
        let series = item(json!({
            "id": "w1", "content_id": "cw1", "title": "Series", "content_type": "Web Series",
            "web_series": { "seasons": [{ "episode_id_list": ["x"] }, { "episode_id_list": ["y"] }] }
        }));
        let page = DetailsPage::build(&series, &SeasonPicker::default(), &PlaceholderEpisodes);
        assert_eq!(page.content_type, "Web Series");
        assert!(!page.playable);
        assert_eq!(page.image, "/placeholder.svg");
        assert_eq!(page.season_options, vec!["Season 1", "Season 2"]);
        assert_eq!(page.episodes.len(), 3);
    }

    #[test]
    fn play_targets() {
        let movie = item(json!({ "id": "m1", "content_id": "cm1", "content_type": "Movie" }));
        assert_eq!(play_intent(&movie, None).unwrap().path(), "/player/cm1");

        let show = item(json!({ "id": "s1", "content_id": "cs1", "content_type": "Show" }));
        assert!(play_intent(&show, None).is_none());
        assert_eq!(
            play_intent(&show, Some("2")).unwrap().path(),
            "/player/cs1?episode=2"
        );
    }
}
