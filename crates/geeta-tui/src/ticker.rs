//! Marquee scrolling for the selected chapter label.
//!
//! The ticker owns no timer of its own. It exposes a single [`deadline`]
//! that the event loop sleeps on, so cancelling is just a state change and
//! two timers can never be in flight at once.
//!
//! [`deadline`]: AutoScrollTicker::deadline

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use regex::Regex;

/// Idle delay between the Chapters panel gaining focus and the first tick.
pub const FIRST_DELAY: Duration = Duration::from_millis(1000);
/// Interval between two steps of one character.
pub const STEP: Duration = Duration::from_millis(150);
/// Hold at either end before reversing.
pub const PAUSE: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerState {
    Idle,
    /// Waiting out the first delay.
    Scheduled { due: Instant },
    Running { due: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone)]
pub struct AutoScrollTicker {
    state: TickerState,
    offset: usize,
    direction: Direction,
}

impl Default for AutoScrollTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoScrollTicker {
    pub fn new() -> Self {
        Self {
            state: TickerState::Idle,
            offset: 0,
            direction: Direction::Forward,
        }
    }

    pub fn state(&self) -> TickerState {
        self.state
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// When the event loop should call [`tick`](Self::tick) next.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            TickerState::Idle => None,
            TickerState::Scheduled { due } | TickerState::Running { due } => Some(due),
        }
    }

    /// Back to offset 0 with nothing scheduled.
    pub fn cancel(&mut self) {
        self.state = TickerState::Idle;
        self.offset = 0;
        self.direction = Direction::Forward;
    }

    /// The Chapters panel gained focus.
    pub fn on_focus(&mut self, now: Instant, label: &str, width: usize) {
        self.cancel();
        if Marquee::measure(label, width).is_some() {
            self.state = TickerState::Scheduled {
                due: now + FIRST_DELAY,
            };
            log::trace!("marquee scheduled for {label:?}");
        }
    }

    pub fn on_blur(&mut self) {
        self.cancel();
    }

    /// The chapter cursor moved. Starts over if the panel still has focus.
    pub fn reset_for_selection(&mut self, now: Instant, label: &str, width: usize, focused: bool) {
        if focused {
            self.on_focus(now, label, width);
        } else {
            self.on_blur();
        }
    }

    /// Advance one step if the deadline has passed. Returns `true` when the
    /// visible window changed.
    pub fn tick(&mut self, now: Instant, label: &str, width: usize) -> bool {
        let Some(due) = self.deadline() else {
            return false;
        };
        if now < due {
            return false;
        }
        let Some(marquee) = Marquee::measure(label, width) else {
            self.cancel();
            return false;
        };

        self.offset = self.offset.min(marquee.max_offset);
        let wait = match self.direction {
            Direction::Forward => {
                self.offset += 1;
                if self.offset >= marquee.max_offset {
                    self.offset = marquee.max_offset;
                    self.direction = Direction::Backward;
                    PAUSE
                } else {
                    STEP
                }
            }
            Direction::Backward => {
                self.offset = self.offset.saturating_sub(1);
                if self.offset == 0 {
                    self.direction = Direction::Forward;
                    PAUSE
                } else {
                    STEP
                }
            }
        };

        self.state = TickerState::Running { due: now + wait };
        true
    }

    /// The label as it should be drawn: the numeric prefix followed by the
    /// visible slice of the title. Labels that fit come back unchanged.
    pub fn window(&self, label: &str, width: usize) -> String {
        let Some(marquee) = Marquee::measure(label, width) else {
            return label.to_string();
        };
        let visible: String = marquee
            .title
            .chars()
            .skip(self.offset.min(marquee.max_offset))
            .take(marquee.title_width)
            .collect();
        format!("{}{}", marquee.prefix, visible)
    }
}

/// `"<n>. "` and the title after it. Labels without a number scroll whole.
fn split_label(label: &str) -> (&str, &str) {
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    let numbered =
        NUMBERED.get_or_init(|| Regex::new(r"^\s*(\d+\.\s+)(.+)$").expect("static regex"));

    match numbered.captures(label) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(prefix), Some(title)) => (prefix.as_str(), title.as_str()),
            _ => ("", label),
        },
        None => ("", label),
    }
}

struct Marquee<'a> {
    prefix: &'a str,
    title: &'a str,
    title_width: usize,
    max_offset: usize,
}

impl<'a> Marquee<'a> {
    /// `None` when the label fits in `width` columns.
    fn measure(label: &'a str, width: usize) -> Option<Self> {
        if label.chars().count() <= width {
            return None;
        }
        let (prefix, title) = split_label(label);
        let title_width = width.saturating_sub(prefix.chars().count());
        let title_len = title.chars().count();
        if title_width == 0 || title_len <= title_width {
            return None;
        }
        Some(Self {
            prefix,
            title,
            title_width,
            max_offset: title_len - title_width,
        })
    }
}
