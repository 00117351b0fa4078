//! Input translation
//!
//! Raw host events (key names, touch samples) become `InputCommand`s. The
//! multi-touch table lives here, owned by the router, never in the core.

use crate::consts::TOUCH_NORMALIZE_FACTOR;
use crate::error::GameError;
use crate::sim::PartialVec3;

/// Cardinal movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Arrow keys only; other keys are ignored
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// One step of `speed` world units in this direction
    pub fn offset(self, speed: f32) -> PartialVec3 {
        match self {
            Direction::Up => PartialVec3::y(speed),
            Direction::Down => PartialVec3::y(-speed),
            Direction::Left => PartialVec3::x(-speed),
            Direction::Right => PartialVec3::x(speed),
        }
    }
}

/// The closed set of host event categories routed to movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Keyboard,
    TouchStart,
    TouchMove,
    TouchEnd,
}

impl InputKind {
    pub fn from_event_name(name: &str) -> Result<Self, GameError> {
        match name {
            "keydown" | "keyup" | "keypress" => Ok(InputKind::Keyboard),
            "touchstart" => Ok(InputKind::TouchStart),
            "touchmove" => Ok(InputKind::TouchMove),
            "touchend" => Ok(InputKind::TouchEnd),
            other => Err(GameError::UnknownInputEvent(other.to_string())),
        }
    }
}

/// One touch point in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub id: i32,
    pub x: f32,
    pub y: f32,
}

/// Payload of a host event
#[derive(Debug, Clone, Copy)]
pub enum RawInput<'a> {
    Key(&'a str),
    Touches(&'a [TouchSample]),
}

/// Resolved movement intent handed to the game
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    /// One keyboard step
    Step(Direction),
    /// Normalized touch delta in screen orientation (y grows downward)
    Drag { dx: f32, dy: f32 },
    /// A new finger touched down
    TouchBegan,
}

/// Last known sample per active touch identifier
#[derive(Debug, Clone)]
pub struct TouchTracker {
    ongoing: Vec<TouchSample>,
    normalize_factor: f32,
}

impl Default for TouchTracker {
    fn default() -> Self {
        Self::new(TOUCH_NORMALIZE_FACTOR)
    }
}

impl TouchTracker {
    pub fn new(normalize_factor: f32) -> Self {
        let normalize_factor = if normalize_factor.is_finite() && normalize_factor > 0.0 {
            normalize_factor
        } else {
            TOUCH_NORMALIZE_FACTOR
        };
        Self {
            ongoing: Vec::new(),
            normalize_factor,
        }
    }

    pub fn len(&self) -> usize {
        self.ongoing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ongoing.is_empty()
    }

    pub fn begin(&mut self, touches: &[TouchSample]) {
        for touch in touches {
            match self.ongoing.iter_mut().find(|t| t.id == touch.id) {
                Some(existing) => *existing = *touch,
                None => self.ongoing.push(*touch),
            }
        }
    }

    /// Deltas since the previous sample of each tracked touch
    ///
    /// Untracked identifiers are ignored.
    pub fn update(&mut self, touches: &[TouchSample]) -> Vec<InputCommand> {
        let mut commands = Vec::new();
        for touch in touches {
            if let Some(previous) = self.ongoing.iter_mut().find(|t| t.id == touch.id) {
                commands.push(InputCommand::Drag {
                    dx: (touch.x - previous.x) / self.normalize_factor,
                    dy: (touch.y - previous.y) / self.normalize_factor,
                });
                *previous = *touch;
            }
        }
        commands
    }

    pub fn end(&mut self, touches: &[TouchSample]) {
        self.ongoing
            .retain(|tracked| !touches.iter().any(|t| t.id == tracked.id));
    }

    pub fn clear(&mut self) {
        self.ongoing.clear();
    }
}

/// Routes host events through the closed keyboard/touch table
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    touches: TouchTracker,
}

impl InputRouter {
    pub fn new(normalize_factor: f32) -> Self {
        Self {
            touches: TouchTracker::new(normalize_factor),
        }
    }

    pub fn touches(&self) -> &TouchTracker {
        &self.touches
    }

    pub fn route(
        &mut self,
        event_name: &str,
        input: RawInput<'_>,
    ) -> Result<Vec<InputCommand>, GameError> {
        let kind = InputKind::from_event_name(event_name)?;
        match (kind, input) {
            (InputKind::Keyboard, RawInput::Key(key)) => {
                Ok(Direction::from_key(key).map(InputCommand::Step).into_iter().collect())
            }
            (InputKind::TouchStart, RawInput::Touches(touches)) => {
                self.touches.begin(touches);
                Ok(vec![InputCommand::TouchBegan])
            }
            (InputKind::TouchMove, RawInput::Touches(touches)) => Ok(self.touches.update(touches)),
            (InputKind::TouchEnd, RawInput::Touches(touches)) => {
                self.touches.end(touches);
                Ok(Vec::new())
            }
            (kind, _) => Err(GameError::UnknownInputEvent(format!(
                "{} payload does not match {:?}",
                event_name, kind
            ))),
        }
    }

    /// Forget all touches (input detached)
    pub fn reset(&mut self) {
        self.touches.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(id: i32, x: f32, y: f32) -> TouchSample {
        TouchSample { id, x, y }
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(Direction::from_key("a"), None);
        assert_eq!(Direction::Left.offset(2.0), PartialVec3::x(-2.0));
        assert_eq!(Direction::Down.offset(2.0), PartialVec3::y(-2.0));
    }

    #[test]
    fn test_event_routing_table() {
        assert_eq!(InputKind::from_event_name("keyup"), Ok(InputKind::Keyboard));
        assert_eq!(InputKind::from_event_name("touchend"), Ok(InputKind::TouchEnd));
        assert_eq!(
            InputKind::from_event_name("wheel"),
            Err(GameError::UnknownInputEvent("wheel".to_string()))
        );
    }

    #[test]
    fn test_router_rejects_unknown_and_mismatched() {
        let mut router = InputRouter::default();
        assert!(router.route("mousemove", RawInput::Key("x")).is_err());
        assert!(router.route("keydown", RawInput::Touches(&[])).is_err());
        assert!(router.route("touchmove", RawInput::Key("ArrowUp")).is_err());
    }

    #[test]
    fn test_keyboard_step() {
        let mut router = InputRouter::default();
        assert_eq!(
            router.route("keydown", RawInput::Key("ArrowRight")).unwrap(),
            vec![InputCommand::Step(Direction::Right)]
        );
        assert!(router.route("keydown", RawInput::Key("Shift")).unwrap().is_empty());
    }

    #[test]
    fn test_touch_deltas_per_identifier() {
        let mut router = InputRouter::new(40.0);
        router
            .route("touchstart", RawInput::Touches(&[touch(1, 100.0, 100.0), touch(2, 0.0, 0.0)]))
            .unwrap();
        assert_eq!(router.touches().len(), 2);

        let commands = router
            .route("touchmove", RawInput::Touches(&[touch(1, 140.0, 80.0), touch(2, -40.0, 0.0)]))
            .unwrap();
        assert_eq!(
            commands,
            vec![
                InputCommand::Drag { dx: 1.0, dy: -0.5 },
                InputCommand::Drag { dx: -1.0, dy: 0.0 },
            ]
        );

        // Deltas are relative to the latest sample of the same identifier
        let commands = router
            .route("touchmove", RawInput::Touches(&[touch(1, 180.0, 80.0)]))
            .unwrap();
        assert_eq!(commands, vec![InputCommand::Drag { dx: 1.0, dy: 0.0 }]);
    }

    #[test]
    fn test_untracked_touch_ignored_and_end_removes() {
        let mut router = InputRouter::default();
        router
            .route("touchstart", RawInput::Touches(&[touch(5, 0.0, 0.0)]))
            .unwrap();
        let commands = router
            .route("touchmove", RawInput::Touches(&[touch(9, 10.0, 10.0)]))
            .unwrap();
        assert!(commands.is_empty());

        router
            .route("touchend", RawInput::Touches(&[touch(5, 0.0, 0.0)]))
            .unwrap();
        assert!(router.touches().is_empty());
        let commands = router
            .route("touchmove", RawInput::Touches(&[touch(5, 40.0, 0.0)]))
            .unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn test_reset_drops_fingers_still_down() {
        let mut router = InputRouter::default();
        router
            .route(
                "touchstart",
                RawInput::Touches(&[touch(1, 0.0, 0.0), touch(2, 5.0, 5.0)]),
            )
            .unwrap();
        assert_eq!(router.touches().len(), 2);

        router.reset();
        assert!(router.touches().is_empty());
        // A finger lifted after the round ended no longer produces drags
        let commands = router
            .route("touchmove", RawInput::Touches(&[touch(1, 40.0, 0.0)]))
            .unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn test_invalid_normalize_factor_falls_back() {
        let mut tracker = TouchTracker::new(0.0);
        tracker.begin(&[touch(1, 0.0, 0.0)]);
        assert_eq!(
            tracker.update(&[touch(1, 40.0, 0.0)]),
            vec![InputCommand::Drag { dx: 1.0, dy: 0.0 }]
        );
    }
}
