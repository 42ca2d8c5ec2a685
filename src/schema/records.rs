//! Normalized, version-independent records
//!
//! Field names serialize in the services' camelCase so a normalized record
//! converted back to JSON adapts to itself.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn unknown() -> String {
    "Unknown".to_string()
}

/// Absent and `null` text both read as "Unknown"
fn or_unknown<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown))
}

// ============================================================================
// References
// ============================================================================

/// Parent series of an episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRef {
    pub title: String,
}

/// Episode embedded in a queue entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRef {
    pub season_number: u32,
    pub episode_number: u32,
    #[serde(default = "unknown", deserialize_with = "or_unknown")]
    pub title: String,
}

/// Movie embedded in a queue entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRef {
    pub title: String,
    pub tmdb_id: i64,
}

/// Quality descriptor, nested as `{"quality": {"name": ...}}` by both generations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityModel {
    pub quality: Quality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quality {
    #[serde(default = "unknown", deserialize_with = "or_unknown")]
    pub name: String,
}

// ============================================================================
// Episodes
// ============================================================================

/// A TV episode from the calendar or the wanted/missing list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: i64,
    #[serde(default = "unknown", deserialize_with = "or_unknown")]
    pub title: String,
    pub season_number: u32,
    pub episode_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_date_utc: Option<String>,
    pub monitored: bool,
    pub has_file: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_file_id: Option<i64>,
    pub series: SeriesRef,
}

impl Episode {
    /// `S01E02` style code
    pub fn sxe(&self) -> String {
        sxe(self.season_number, self.episode_number)
    }

    /// Monitored but not on disk
    pub fn is_missing(&self) -> bool {
        self.monitored && !self.has_file
    }
}

/// Format a season/episode pair as `S{season:02}E{episode:02}`
pub fn sxe(season: u32, episode: u32) -> String {
    format!("S{season:02}E{episode:02}")
}

// ============================================================================
// Movies
// ============================================================================

/// A movie from the library listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub year: u32,
    pub tmdb_id: i64,
    pub title_slug: String,
    pub monitored: bool,
    pub has_file: bool,
    pub is_available: bool,
}

impl Movie {
    /// `Title (Year)`
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }

    /// Monitored but not on disk
    pub fn is_missing(&self) -> bool {
        self.monitored && !self.has_file
    }
}

// ============================================================================
// Queue
// ============================================================================

/// Download protocol of a queue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Usenet,
    Torrent,
    Unknown,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usenet => "usenet",
            Self::Torrent => "torrent",
            Self::Unknown => "unknown",
        }
    }

    /// 1 for usenet, 0 otherwise
    pub fn id(&self) -> i64 {
        i64::from(*self == Self::Usenet)
    }
}

impl Serialize for Protocol {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Protocol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.to_ascii_lowercase().as_str() {
            "usenet" => Self::Usenet,
            "torrent" => Self::Torrent,
            _ => Self::Unknown,
        })
    }
}

/// Media a queue entry downloads
#[derive(Debug, Clone, PartialEq)]
pub enum QueueMedia {
    Movie(MovieRef),
    Episode { series: SeriesRef, episode: EpisodeRef },
}

/// One active download task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: i64,
    /// Release title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<MovieRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeRef>,
    pub protocol: Protocol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityModel>,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub sizeleft: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeleft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_completion_time: Option<String>,
    #[serde(default = "unknown", deserialize_with = "or_unknown")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracked_download_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracked_download_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_format_score: Option<i64>,
}

impl QueueItem {
    /// Parent media, when the server included it
    pub fn media(&self) -> Option<QueueMedia> {
        if let Some(movie) = &self.movie {
            return Some(QueueMedia::Movie(movie.clone()));
        }
        match (&self.series, &self.episode) {
            (Some(series), Some(episode)) => Some(QueueMedia::Episode {
                series: series.clone(),
                episode: episode.clone(),
            }),
            _ => None,
        }
    }

    /// Quality label, `Unknown` when absent
    pub fn quality_name(&self) -> &str {
        self.quality
            .as_ref()
            .map_or("Unknown", |q| q.quality.name.as_str())
    }
}
