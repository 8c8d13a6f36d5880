//! The now-playing value and its display rendering
//!
//! `NowPlaying` is the single observation the service holds: the latest
//! track pushed from a local source or fetched by the poller. It is always
//! replaced as a whole; empty strings mean "absent".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lead-in phrase for the rendered display line
pub const LEAD_IN: &str = "Сейчас играет: ";

/// The latest now-playing observation
///
/// All string fields are non-null; the empty string is the "absent"
/// sentinel. `updated_at` carries the wall-clock time of the most recent
/// accepted update, or the Unix epoch when nothing has been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub source: String,
    pub updated_at: DateTime<Utc>,
}

impl NowPlaying {
    /// The initial/cleared value: all fields empty, timestamp at the epoch
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            artist: String::new(),
            source: String::new(),
            updated_at: DateTime::UNIX_EPOCH,
        }
    }

    /// True when there is nothing to show (title and artist both empty)
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.artist.is_empty()
    }
}

impl Default for NowPlaying {
    fn default() -> Self {
        Self::empty()
    }
}

/// Render a snapshot into the user-facing display line
///
/// Returns the empty string when there is nothing to show; callers
/// substitute their own localized "nothing is playing" text. Otherwise the
/// line is the lead-in phrase, `artist — ` when the artist is known, the
/// title, and ` [source]` when the source is known.
pub fn format_now_playing(snapshot: &NowPlaying) -> String {
    if snapshot.is_empty() {
        return String::new();
    }
    let mut line = String::from(LEAD_IN);
    if !snapshot.artist.is_empty() {
        line.push_str(&snapshot.artist);
        line.push_str(" — ");
    }
    line.push_str(&snapshot.title);
    if !snapshot.source.is_empty() {
        line.push_str(" [");
        line.push_str(&snapshot.source);
        line.push(']');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(title: &str, artist: &str, source: &str) -> NowPlaying {
        NowPlaying {
            title: title.to_string(),
            artist: artist.to_string(),
            source: source.to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_snapshot_renders_empty_string() {
        assert_eq!(format_now_playing(&NowPlaying::empty()), "");
    }

    #[test]
    fn artist_only_still_renders() {
        // Title empty but artist known: there is something to show
        let line = format_now_playing(&playing("", "Boards of Canada", ""));
        assert_eq!(line, format!("{}Boards of Canada — ", LEAD_IN));
    }

    #[test]
    fn title_only_skips_artist_separator() {
        let line = format_now_playing(&playing("Roygbiv", "", ""));
        assert_eq!(line, format!("{}Roygbiv", LEAD_IN));
    }

    #[test]
    fn full_snapshot_renders_all_parts() {
        let line = format_now_playing(&playing("Roygbiv", "Boards of Canada", "Last.fm"));
        assert_eq!(line, format!("{}Boards of Canada — Roygbiv [Last.fm]", LEAD_IN));
    }

    #[test]
    fn source_is_omitted_when_empty() {
        let line = format_now_playing(&playing("Roygbiv", "Boards of Canada", ""));
        assert_eq!(line, format!("{}Boards of Canada — Roygbiv", LEAD_IN));
    }

    #[test]
    fn rendered_line_always_starts_with_lead_in() {
        for snap in [
            playing("Roygbiv", "", ""),
            playing("", "Boards of Canada", ""),
            playing("Roygbiv", "Boards of Canada", "YouTube Music"),
        ] {
            assert!(format_now_playing(&snap).starts_with(LEAD_IN));
        }
    }

    #[test]
    fn empty_value_sits_at_the_epoch() {
        assert_eq!(NowPlaying::empty().updated_at, DateTime::UNIX_EPOCH);
        assert!(NowPlaying::empty().is_empty());
    }
}
