//! Response shapes shared by the HTTP API and the CLI's `--json` output.

use crate::domain::model::{Combination, Video};
use crate::utils::duration::format_duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoView {
    pub id: String,
    pub title: String,
    pub duration: i64,
    pub duration_formatted: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationView {
    pub videos: Vec<VideoView>,
    pub total_time: i64,
    pub total_time_formatted: String,
    pub remaining_time: i64,
    pub remaining_time_formatted: String,
}

impl From<&Video> for VideoView {
    fn from(video: &Video) -> Self {
        Self {
            id: video.id.clone(),
            title: video.title.clone(),
            duration: video.duration,
            duration_formatted: format_duration(video.duration),
            url: video.url.clone(),
        }
    }
}

impl From<&Combination> for CombinationView {
    fn from(combination: &Combination) -> Self {
        Self {
            videos: combination.items.iter().map(VideoView::from).collect(),
            total_time: combination.total_duration,
            total_time_formatted: format_duration(combination.total_duration),
            remaining_time: combination.remaining,
            remaining_time_formatted: format_duration(combination.remaining),
        }
    }
}

pub fn to_views(combinations: &[Combination]) -> Vec<CombinationView> {
    combinations.iter().map(CombinationView::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_view_formats_durations() {
        let combination = Combination {
            items: vec![
                Video::youtube("a", "First", 240),
                Video::new("b", "Second", 300),
            ],
            total_duration: 540,
            remaining: 60,
        };

        let view = CombinationView::from(&combination);
        assert_eq!(view.total_time_formatted, "0:09:00");
        assert_eq!(view.remaining_time_formatted, "0:01:00");
        assert_eq!(view.videos[0].duration_formatted, "0:04:00");
        assert_eq!(view.videos[1].url, None);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["videos"][0]["url"], "https://www.youtube.com/watch?v=a");
        assert_eq!(json["remaining_time"], 60);
    }
}
