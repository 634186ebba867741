use crate::models::DisplayRecord;
use serde::Serialize;

/// Where a screen wants to go next. Routing itself belongs to the host; the
/// core only describes the target and any record it hands over.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum NavigationIntent {
    /// Details page, optionally for a given id, optionally carrying a
    /// precomputed record that spares the page a catalog lookup.
    Details {
        id: Option<String>,
        record: Option<DisplayRecord>,
    },
    Player {
        content_id: String,
        episode: Option<String>,
    },
}

impl NavigationIntent {
    pub fn path(&self) -> String {
        match self {
            NavigationIntent::Details { id: None, .. } => "/details".to_string(),
            NavigationIntent::Details { id: Some(id), .. } => {
                format!("/details/{}", urlencoding::encode(id))
            }
            NavigationIntent::Player {
                content_id,
                episode: None,
            } => format!("/player/{}", urlencoding::encode(content_id)),
            NavigationIntent::Player {
                content_id,
                episode: Some(episode),
            } => format!(
                "/player/{}?episode={}",
                urlencoding::encode(content_id),
                urlencoding::encode(episode)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_paths_encode_segments() {
        let intent = NavigationIntent::Player {
            content_id: "abc/123".to_string(),
            episode: Some("ep 2".to_string()),
        };
        assert_eq!(intent.path(), "/player/abc%2F123?episode=ep%202");

        let movie = NavigationIntent::Player {
            content_id: "c-9".to_string(),
            episode: None,
        };
        assert_eq!(movie.path(), "/player/c-9");
    }

    #[test]
    fn details_path_without_id() {
        let intent = NavigationIntent::Details {
            id: None,
            record: None,
        };
        assert_eq!(intent.path(), "/details");
    }
}
