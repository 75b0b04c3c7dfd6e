use serde::{Deserialize, Serialize};

/// Countdown length a fresh (or reset) widget starts from: 25 minutes
pub const DEFAULT_DURATION_SECS: u32 = 1500;

/// Complete persisted/rendered state of the Pomodoro widget
///
/// Field names on disk match the flat storage record:
/// `{"timer": 1500, "posX": 0, "posY": 0, "isMinimized": false, "isRunning": false}`.
/// Every field is required when deserializing; a record missing any of them
/// is treated as malformed rather than patched with defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetState {
    /// Seconds left on the countdown (never negative)
    #[serde(rename = "timer")]
    pub remaining_seconds: u32,

    /// Offset from the top-left anchor, in cells. May go negative mid-drag.
    #[serde(rename = "posX")]
    pub pos_x: i32,
    #[serde(rename = "posY")]
    pub pos_y: i32,

    #[serde(rename = "isMinimized")]
    pub is_minimized: bool,

    #[serde(rename = "isRunning")]
    pub is_running: bool,
}

impl WidgetState {
    /// Countdown formatted for display
    pub fn display_time(&self) -> String {
        format_time(self.remaining_seconds)
    }

    /// True once the countdown has run out
    pub fn is_finished(&self) -> bool {
        self.remaining_seconds == 0
    }
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            remaining_seconds: DEFAULT_DURATION_SECS,
            pos_x: 0,
            pos_y: 0,
            is_minimized: false,
            is_running: false,
        }
    }
}

/// Format seconds as `MM:SS`
///
/// Minutes are not rolled over into hours, so 3661 seconds renders as `61:01`.
pub fn format_time(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{:02}:{:02}", minutes, remainder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(59), "00:59");
    }

    #[test]
    fn test_format_time_no_hour_rollover() {
        assert_eq!(format_time(3661), "61:01");
        assert_eq!(format_time(6000), "100:00");
    }

    #[test]
    fn test_defaults() {
        let state = WidgetState::default();
        assert_eq!(state.remaining_seconds, 1500);
        assert_eq!((state.pos_x, state.pos_y), (0, 0));
        assert!(!state.is_minimized);
        assert!(!state.is_running);
        assert_eq!(state.display_time(), "25:00");
    }

    #[test]
    fn test_record_field_names() {
        let state = WidgetState {
            remaining_seconds: 42,
            pos_x: -3,
            pos_y: 7,
            is_minimized: true,
            is_running: true,
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "timer": 42,
                "posX": -3,
                "posY": 7,
                "isMinimized": true,
                "isRunning": true,
            })
        );
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result: Result<WidgetState, _> =
            serde_json::from_str(r#"{"timer": 10, "posX": 0, "posY": 0, "isRunning": false}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_timer_is_rejected() {
        let result: Result<WidgetState, _> = serde_json::from_str(
            r#"{"timer": -5, "posX": 0, "posY": 0, "isMinimized": false, "isRunning": false}"#,
        );
        assert!(result.is_err());
    }
}
