use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Feature tag that makes a movie or season eligible for the home hero.
pub const HOME_HERO_TAG: &str = "Home Hero";

/// Everything the catalog provider returns for one page view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default, deserialize_with = "skip_bad_items")]
    pub movies: Vec<ContentItem>,
    #[serde(default, deserialize_with = "skip_bad_items")]
    pub web_series: Vec<ContentItem>,
    #[serde(default, deserialize_with = "skip_bad_items")]
    pub shows: Vec<ContentItem>,
}

impl Catalog {
    /// Movies, then web-series entries, then shows, in provider order.
    pub fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.movies
            .iter()
            .chain(self.web_series.iter())
            .chain(self.shows.iter())
    }

    pub fn len(&self) -> usize {
        self.movies.len() + self.web_series.len() + self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "seasonNumber",
        deserialize_with = "loose_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub season_number: Option<u32>,
    #[serde(flatten)]
    pub kind: ContentKind,
}

/// Type-specific payload of a catalog item, tagged by `content_type`.
///
/// Missing, null or unrecognised tags land in [`ContentKind::Unknown`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "content_type")]
pub enum ContentKind {
    #[serde(rename = "Movie")]
    Movie {
        #[serde(default)]
        movie: Option<MovieRecord>,
    },
    #[serde(rename = "Web Series")]
    WebSeries {
        #[serde(default)]
        web_series: Option<WebSeriesRecord>,
    },
    #[serde(rename = "Show")]
    Show {
        #[serde(default)]
        show: Option<ShowRecord>,
    },
    #[default]
    Unknown,
}

impl<'de> Deserialize<'de> for ContentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Tagged {
            #[serde(default)]
            content_type: Option<String>,
            #[serde(default)]
            movie: Option<MovieRecord>,
            #[serde(default)]
            web_series: Option<WebSeriesRecord>,
            #[serde(default)]
            show: Option<ShowRecord>,
        }

        let tagged = Tagged::deserialize(deserializer)?;
        Ok(match tagged.content_type.as_deref() {
            Some("Movie") => ContentKind::Movie {
                movie: tagged.movie,
            },
            Some("Web Series") => ContentKind::WebSeries {
                web_series: tagged.web_series,
            },
            Some("Show") => ContentKind::Show { show: tagged.show },
            _ => ContentKind::Unknown,
        })
    }
}

impl ContentKind {
    /// The `content_type` label as the catalog spells it.
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Movie { .. } => "Movie",
            ContentKind::WebSeries { .. } => "Web Series",
            ContentKind::Show { .. } => "Show",
            ContentKind::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(default)]
    pub content_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub release_year: Option<String>,
    #[serde(default)]
    pub rating_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub director: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub writer: Vec<String>,
    #[serde(default, alias = "cast", deserialize_with = "null_as_default")]
    pub cast_members: Vec<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feature_in: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebSeriesRecord {
    #[serde(default)]
    pub content_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub seasons: Vec<Season>,
}

impl WebSeriesRecord {
    /// Each web-series catalog entry carries exactly one season.
    pub fn sole_season(&self) -> Option<&Season> {
        self.seasons.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Season {
    #[serde(default)]
    pub season_description: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub release_year: Option<String>,
    #[serde(default)]
    pub rating_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub director: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub writer: Vec<String>,
    #[serde(default, alias = "cast", deserialize_with = "null_as_default")]
    pub cast_members: Vec<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub trailer_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feature_in: Vec<String>,
    #[serde(default)]
    pub episode_id_list: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episodes: Vec<EpisodeRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub release_year: Option<String>,
    #[serde(default)]
    pub rating_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub directors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub writers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast_members: Vec<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub episode_id_list: Option<Vec<String>>,
}

/// Presentation tag carried by a [`DisplayRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayKind {
    Platform,
    Movie,
    #[serde(rename = "series")]
    Series,
    Show,
}

/// Uniform, fully populated projection of a catalog item for the hero
/// banner. Rendering never has to branch on a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub rating: String,
    pub year: String,
    pub score: String,
    pub image: String,
    #[serde(rename = "type")]
    pub kind: DisplayKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_number: Option<u32>,
    #[serde(default)]
    pub video_url: String,
}

/// Uniform detail fields for the details page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayDetails {
    pub description: String,
    pub release_year: Option<String>,
    pub rating_type: Option<String>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub cast: Vec<String>,
    pub thumbnail_url: String,
    pub trailer_url: String,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// Accepts `"7.5"`, `7.5`, `2021` or `null`; keeps the textual form.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts `2`, `"2"` or `null`; anything that is not a season number is
/// treated as absent.
fn loose_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Parses a list of catalog items one by one, dropping the entries that do
/// not parse instead of failing the whole list.
fn skip_bad_items<'de, D>(deserializer: D) -> Result<Vec<ContentItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping catalog entry {}: {}", index, e);
                None
            }
        })
        .collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tagged_movie_with_numeric_fields() {
        let item: ContentItem = serde_json::from_value(json!({
            "id": "m1",
            "content_id": "c-m1",
            "title": "Night Train",
            "content_type": "Movie",
            "created_at": "2023-05-01T10:00:00Z",
            "movie": {
                "release_year": 2021,
                "rating": 7.5,
                "duration": "118",
                "cast": ["A", "B"],
                "feature_in": ["Home Hero"]
            }
        }))
        .unwrap();

        let ContentKind::Movie { movie: Some(movie) } = &item.kind else {
            panic!("expected a movie, got {:?}", item.kind);
        };
        assert_eq!(movie.release_year.as_deref(), Some("2021"));
        assert_eq!(movie.rating.as_deref(), Some("7.5"));
        assert_eq!(movie.duration.as_deref(), Some("118"));
        assert_eq!(movie.cast_members, vec!["A", "B"]);
        assert!(item.genre.is_empty());
    }

    #[test]
    fn unknown_content_type_does_not_fail() {
        let item: ContentItem = serde_json::from_value(json!({
            "id": "x1",
            "title": "Podcast",
            "content_type": "Podcast"
        }))
        .unwrap();
        assert!(matches!(item.kind, ContentKind::Unknown));
    }

    #[test]
    fn null_lists_become_empty() {
        let item: ContentItem = serde_json::from_value(json!({
            "id": "w1",
            "content_type": "Web Series",
            "genre": null,
            "seasonNumber": 2,
            "web_series": { "seasons": [{ "director": null, "episodes": null }] }
        }))
        .unwrap();
        assert!(item.genre.is_empty());
        assert_eq!(item.season_number, Some(2));
        let ContentKind::WebSeries { web_series: Some(series) } = &item.kind else {
            panic!("expected a web series");
        };
        let season = series.sole_season().unwrap();
        assert!(season.director.is_empty());
        assert!(season.episodes.is_empty());
        assert!(season.episode_id_list.is_none());
    }

    #[test]
    fn catalog_uses_camel_case_and_defaults() {
        let catalog: Catalog = serde_json::from_value(json!({
            "webSeries": [{ "id": "w1", "content_type": "Web Series" }]
        }))
        .unwrap();
        assert!(catalog.movies.is_empty());
        assert_eq!(catalog.web_series.len(), 1);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn missing_or_null_tag_is_unknown() {
        let item: ContentItem = serde_json::from_value(json!({
            "id": "s1",
            "title": "x"
        }))
        .unwrap();
        assert_eq!(item.kind, ContentKind::Unknown);

        let item: ContentItem = serde_json::from_value(json!({
            "id": "s2",
            "content_type": null,
            "show": { "id": "nested" }
        }))
        .unwrap();
        assert_eq!(item.kind, ContentKind::Unknown);
    }

    #[test]
    fn null_text_fields_become_empty() {
        let item: ContentItem = serde_json::from_value(json!({
            "id": "m1",
            "content_id": null,
            "title": null,
            "created_at": null,
            "content_type": "Movie",
            "movie": null
        }))
        .unwrap();
        assert_eq!(item.content_id, "");
        assert_eq!(item.title, "");
        assert_eq!(item.created_at, "");
        assert_eq!(item.kind, ContentKind::Movie { movie: None });
    }

    #[test]
    fn season_number_accepts_text() {
        let parse = |raw: Value| {
            serde_json::from_value::<ContentItem>(json!({
                "id": "w1",
                "content_type": "Web Series",
                "seasonNumber": raw
            }))
            .unwrap()
            .season_number
        };
        assert_eq!(parse(json!("3")), Some(3));
        assert_eq!(parse(json!(2)), Some(2));
        assert_eq!(parse(json!("two")), None);
        assert_eq!(parse(json!(-1)), None);
    }

    #[test]
    fn bad_entries_do_not_sink_the_catalog() {
        let catalog: Catalog = serde_json::from_value(json!({
            "movies": [
                { "id": "m1", "content_type": "Movie", "content_id": null, "title": null },
                { "id": 7, "content_type": "Movie" },
                "not an item",
                { "id": "m2", "content_type": "Movie", "title": "Kept" }
            ],
            "webSeries": null,
            "shows": [{ "id": "s1", "title": "x" }]
        }))
        .unwrap();
        let ids: Vec<&str> = catalog.items().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "s1"]);
        assert_eq!(catalog.shows[0].kind, ContentKind::Unknown);
    }

    #[test]
    fn display_kind_wire_names() {
        assert_eq!(serde_json::to_value(DisplayKind::Series).unwrap(), json!("series"));
        assert_eq!(serde_json::to_value(DisplayKind::Movie).unwrap(), json!("Movie"));
    }
}
