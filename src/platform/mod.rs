//! Platform abstraction layer
//!
//! Output surfaces the host wires up around the simulation:
//! - Score display (DOM text element on web, log line on native)
//! - Frame hand-off to the external renderer (web only)

use crate::sim::GameEvent;

/// The single externally-owned text element that shows the score
pub trait ScoreDisplay {
    fn show_score(&mut self, score: u64);
}

/// Push score changes from a batch of events to the display.
/// Only the latest score in the batch is shown.
pub fn refresh_score(display: &mut dyn ScoreDisplay, events: &[GameEvent]) {
    let latest = events.iter().rev().find_map(|e| match e {
        GameEvent::ScoreChanged { score } => Some(*score),
        _ => None,
    });
    if let Some(score) = latest {
        display.show_score(score);
    }
}

/// Log an event batch; collisions are chatty so they go to debug unless asked
pub fn log_events(events: &[GameEvent], verbose_collisions: bool) {
    for event in events {
        match event {
            GameEvent::TrackReady { obstacles } => {
                log::info!("Track ready with {} obstacles", obstacles)
            }
            GameEvent::TrackFailed { reason } => log::error!("Track unavailable: {}", reason),
            GameEvent::ScoreChanged { .. } | GameEvent::ProjectileSpawned { .. } => {}
            other if verbose_collisions => log::info!("{:?}", other),
            other => log::debug!("{:?}", other),
        }
    }
}

/// Native score display: writes to the log
#[derive(Debug, Default)]
pub struct LogScoreDisplay {
    pub last: Option<u64>,
}

impl ScoreDisplay for LogScoreDisplay {
    fn show_score(&mut self, score: u64) {
        if self.last != Some(score) {
            log::info!("Score: {}", score);
            self.last = Some(score);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub mod web {
    use super::ScoreDisplay;

    /// Writes the score into a DOM element's text content
    pub struct DomScoreDisplay {
        element: Option<web_sys::Element>,
    }

    impl DomScoreDisplay {
        pub fn new(element_id: &str) -> Self {
            let element = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(element_id));
            if element.is_none() {
                log::warn!("No #{} element, score will not be shown", element_id);
            }
            Self { element }
        }
    }

    impl ScoreDisplay for DomScoreDisplay {
        fn show_score(&mut self, score: u64) {
            if let Some(el) = &self.element {
                el.set_text_content(Some(&score.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<u64>);

    impl ScoreDisplay for Recorder {
        fn show_score(&mut self, score: u64) {
            self.0.push(score);
        }
    }

    #[test]
    fn test_refresh_shows_latest_score_only() {
        let mut display = Recorder::default();
        let events = vec![
            GameEvent::ScoreChanged { score: 2 },
            GameEvent::ObstacleCollected {
                obstacle_id: 1,
                value: 4,
            },
            GameEvent::ScoreChanged { score: 6 },
        ];
        refresh_score(&mut display, &events);
        assert_eq!(display.0, vec![6]);

        refresh_score(&mut display, &[GameEvent::ProjectileSpawned { projectile_id: 3 }]);
        assert_eq!(display.0, vec![6]);
    }

    #[test]
    fn test_log_display_dedups() {
        let mut display = LogScoreDisplay::default();
        display.show_score(4);
        display.show_score(4);
        assert_eq!(display.last, Some(4));
    }
}
