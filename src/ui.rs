//! On-screen readouts
//!
//! The game pushes formatted strings; the host decides how to show them.

use std::cell::RefCell;
use std::rc::Rc;

/// Score, timer and restart surfaces
pub trait Hud {
    fn set_score_text(&mut self, text: &str);

    fn set_timer_text(&mut self, text: &str);

    fn set_high_score_text(&mut self, text: &str);

    /// Offer the restart action once the round is over
    fn show_restart(&mut self);

    /// Hide the restart action when a new round starts
    fn hide_restart(&mut self) {}
}

/// Lets the host keep a handle on a HUD it lent to the game
impl<H: Hud> Hud for Rc<RefCell<H>> {
    fn set_score_text(&mut self, text: &str) {
        self.borrow_mut().set_score_text(text);
    }

    fn set_timer_text(&mut self, text: &str) {
        self.borrow_mut().set_timer_text(text);
    }

    fn set_high_score_text(&mut self, text: &str) {
        self.borrow_mut().set_high_score_text(text);
    }

    fn show_restart(&mut self) {
        self.borrow_mut().show_restart();
    }

    fn hide_restart(&mut self) {
        self.borrow_mut().hide_restart();
    }
}

pub fn score_text(score: u64) -> String {
    format!("Score: {}", score)
}

pub fn timer_text(remaining_secs: i32) -> String {
    format!("Time: {}s", remaining_secs.max(0))
}

pub fn high_score_text(high_score: u64) -> String {
    format!("High Score: {}", high_score)
}

/// Hud that remembers the last value pushed to each surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingHud {
    pub score: String,
    pub timer: String,
    pub high_score: String,
    pub restart_visible: bool,
}

impl Hud for RecordingHud {
    fn set_score_text(&mut self, text: &str) {
        self.score = text.to_string();
    }

    fn set_timer_text(&mut self, text: &str) {
        self.timer = text.to_string();
    }

    fn set_high_score_text(&mut self, text: &str) {
        self.high_score = text.to_string();
    }

    fn show_restart(&mut self) {
        self.restart_visible = true;
    }

    fn hide_restart(&mut self) {
        self.restart_visible = false;
    }
}
