use serde::{Deserialize, Serialize};
use super::time_range::TimeRange;

/// User-facing label of [`ReplayOption::ReplaceCompletely`]
pub const REPLACE_ALL_LABEL: &str = "replace all";

/// 粘贴模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayOption {
    Replace,
    #[default]
    ReplaceCompletely,
    Insert,
    Merge,
}

impl ReplayOption {
    pub const ALL: [ReplayOption; 4] = [
        ReplayOption::Replace,
        ReplayOption::ReplaceCompletely,
        ReplayOption::Insert,
        ReplayOption::Merge,
    ];

    /// Identifier understood by the replay engine
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplayOption::Replace => "replace",
            ReplayOption::ReplaceCompletely => "replaceCompletely",
            ReplayOption::Insert => "insert",
            ReplayOption::Merge => "merge",
        }
    }

    /// Label shown in the option combo
    pub fn label(&self) -> &'static str {
        match self {
            ReplayOption::ReplaceCompletely => REPLACE_ALL_LABEL,
            other => other.as_str(),
        }
    }

    /// Parse an engine identifier. Matching is exact.
    pub fn from_identifier(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|opt| opt.as_str() == s)
    }
}

/// Rewrite the "replace all" label (any case) to `replaceCompletely`.
///
/// Every other value is returned untouched; rejecting unknown identifiers is
/// left to the replay engine.
pub fn normalize_option(option: &str) -> String {
    if option.to_lowercase() == REPLACE_ALL_LABEL {
        ReplayOption::ReplaceCompletely.as_str().to_string()
    } else {
        option.to_string()
    }
}

/// Load options as collected by the options panel or passed by scripts.
///
/// Deserializes from the panel's option map (`startFrame`, `source`,
/// `option`, `connect`, `currentTime`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadOptions {
    /// Destination frame for the first source frame; `None` keeps source timing
    pub start_frame: Option<i32>,
    /// Source window override; `None` or `[0, 0]` uses the bundle's own range
    pub source: Option<TimeRange>,
    pub option: Option<String>,
    pub connect: bool,
    pub current_time: bool,
}

impl LoadOptions {
    pub fn new(option: impl Into<String>) -> Self {
        Self {
            option: Some(option.into()),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<TimeRange>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_start_frame(mut self, frame: i32) -> Self {
        self.start_frame = Some(frame);
        self
    }

    pub fn with_connect(mut self, connect: bool) -> Self {
        self.connect = connect;
        self
    }

    pub fn with_current_time(mut self, current_time: bool) -> Self {
        self.current_time = current_time;
        self
    }
}

/// Fully resolved replay request, the only form handed to the replay engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRequest {
    pub objects: Vec<String>,
    pub namespaces: Vec<String>,
    pub option: String,
    pub connect: bool,
    pub current_time: bool,
    pub start_frame: Option<i32>,
    pub source_time: TimeRange,
}

impl LoadRequest {
    /// Frames added to every source key; `None` when it does not fit in `i32`
    pub fn delta(&self) -> Option<i32> {
        match self.start_frame {
            Some(frame) => frame.checked_sub(self.source_time.start),
            None => Some(0),
        }
    }

    /// Destination window the source keys land on, `None` if it leaves the
    /// `i32` frame range
    pub fn destination(&self) -> Option<TimeRange> {
        self.source_time.checked_offset(self.delta()?)
    }
}

/// Resolve the source window: an explicit range wins as-is, otherwise each
/// end falls back to the recorded frame, then to `0`.
pub fn resolve_source_time(
    source: Option<TimeRange>,
    recorded_start: Option<i32>,
    recorded_end: Option<i32>,
) -> TimeRange {
    let (start, end) = match TimeRange::explicit(source) {
        Some(range) => (Some(range.start), Some(range.end)),
        None => (None, None),
    };

    TimeRange::new(
        start.or(recorded_start).unwrap_or(0),
        end.or(recorded_end).unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replace_all() {
        for label in ["replace all", "Replace All", "REPLACE ALL"] {
            let once = normalize_option(label);
            assert_eq!(once, "replaceCompletely");
            assert_eq!(normalize_option(&once), "replaceCompletely");
        }
    }

    #[test]
    fn test_normalize_passes_other_values_through() {
        assert_eq!(normalize_option("merge"), "merge");
        assert_eq!(normalize_option("insert"), "insert");
        assert_eq!(normalize_option("replace"), "replace");
        assert_eq!(normalize_option("Merge"), "Merge");
        assert_eq!(normalize_option("bogus"), "bogus");
    }

    #[test]
    fn test_labels_and_identifiers() {
        let labels: Vec<&str> = ReplayOption::ALL.iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["replace", "replace all", "insert", "merge"]);

        for opt in ReplayOption::ALL {
            assert_eq!(ReplayOption::from_identifier(opt.as_str()), Some(opt));
            assert_eq!(ReplayOption::from_identifier(&normalize_option(opt.label())), Some(opt));
        }
        assert_eq!(ReplayOption::from_identifier("replace all"), None);
    }

    #[test]
    fn test_resolve_source_time() {
        assert_eq!(resolve_source_time(None, Some(0), Some(200)), TimeRange::new(0, 200));
        assert_eq!(
            resolve_source_time(Some(TimeRange::UNSET), Some(10), Some(30)),
            TimeRange::new(10, 30)
        );
        assert_eq!(
            resolve_source_time(Some(TimeRange::new(50, 100)), Some(0), Some(200)),
            TimeRange::new(50, 100)
        );
        assert_eq!(resolve_source_time(None, None, None), TimeRange::new(0, 0));
    }

    #[test]
    fn test_load_options_from_panel_state() {
        let json = r#"{"connect": true, "currentTime": true, "source": [0, 0], "option": "replace all"}"#;
        let options: LoadOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options.option.as_deref(), Some("replace all"));
        assert_eq!(options.source, Some(TimeRange::UNSET));
        assert!(options.connect);
        assert!(options.current_time);
        assert_eq!(options.start_frame, None);
    }

    #[test]
    fn test_destination_window() {
        let mut request = LoadRequest {
            objects: vec![],
            namespaces: vec![],
            option: "merge".into(),
            connect: false,
            current_time: false,
            start_frame: None,
            source_time: TimeRange::new(50, 100),
        };
        assert_eq!(request.destination(), Some(TimeRange::new(50, 100)));

        request.start_frame = Some(1);
        assert_eq!(request.delta(), Some(-49));
        assert_eq!(request.destination(), Some(TimeRange::new(1, 51)));
    }

    #[test]
    fn test_destination_out_of_frame_range() {
        let mut request = LoadRequest {
            objects: vec![],
            namespaces: vec![],
            option: "merge".into(),
            connect: false,
            current_time: false,
            start_frame: Some(i32::MAX - 100),
            source_time: TimeRange::new(0, 200),
        };
        assert_eq!(request.delta(), Some(i32::MAX - 100));
        assert_eq!(request.destination(), None);

        // 差值本身溢出
        request.start_frame = Some(i32::MAX);
        request.source_time = TimeRange::new(-1, 0);
        assert_eq!(request.delta(), None);
        assert_eq!(request.destination(), None);
    }
}
