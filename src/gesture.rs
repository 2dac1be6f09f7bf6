//! Drag-and-drop input handling
//!
//! Both sensors reduce their raw input to the same [`DropIntent`]; the
//! session decides what a drop means.

use crate::domain::{Lane, TaskId, TaskStatus};

/// Pointer travel before a press becomes a drag, in pixels
pub const POINTER_ACTIVATION_DISTANCE: f64 = 8.0;

/// A card released over a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropIntent {
    pub task_id: TaskId,
    pub lane: TaskStatus,
}

/// Source of drag gestures
pub trait DragSensor {
    type Input;

    /// Feeds one input event, returning an intent when a drag ends on a lane
    fn handle(&mut self, input: Self::Input) -> Option<DropIntent>;

    fn is_dragging(&self) -> bool;

    /// Lane currently under the dragged card
    fn over(&self) -> Option<TaskStatus>;

    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// On-screen bounds of the rendered lanes
#[derive(Debug, Clone, Default)]
pub struct LaneLayout {
    lanes: Vec<(TaskStatus, Rect)>,
}

impl LaneLayout {
    pub fn new(lanes: Vec<(TaskStatus, Rect)>) -> Self {
        Self { lanes }
    }

    /// Lays lanes out left to right in equal columns
    pub fn columns(lanes: &[&Lane], width: f64, height: f64) -> Self {
        Self {
            lanes: lanes
                .iter()
                .enumerate()
                .map(|(i, lane)| (lane.status, Rect::new(i as f64 * width, 0.0, width, height)))
                .collect(),
        }
    }

    pub fn hit_test(&self, point: Point) -> Option<TaskStatus> {
        self.lanes
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(status, _)| *status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { task_id: TaskId, at: Point },
    Move(Point),
    Up(Point),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerState {
    Idle,
    Pressed { task_id: TaskId, origin: Point },
    Dragging { task_id: TaskId, over: Option<TaskStatus> },
}

/// Mouse and touch dragging
#[derive(Debug, Clone)]
pub struct PointerSensor {
    layout: LaneLayout,
    activation_distance: f64,
    state: PointerState,
}

impl PointerSensor {
    pub fn new(layout: LaneLayout) -> Self {
        Self {
            layout,
            activation_distance: POINTER_ACTIVATION_DISTANCE,
            state: PointerState::Idle,
        }
    }

    pub fn with_activation_distance(mut self, distance: f64) -> Self {
        self.activation_distance = distance;
        self
    }

    pub fn set_layout(&mut self, layout: LaneLayout) {
        self.layout = layout;
    }
}

impl DragSensor for PointerSensor {
    type Input = PointerInput;

    fn handle(&mut self, input: PointerInput) -> Option<DropIntent> {
        match (self.state, input) {
            (_, PointerInput::Down { task_id, at }) => {
                self.state = PointerState::Pressed {
                    task_id,
                    origin: at,
                };
                None
            }
            (PointerState::Pressed { task_id, origin }, PointerInput::Move(at)) => {
                if origin.distance(&at) >= self.activation_distance {
                    self.state = PointerState::Dragging {
                        task_id,
                        over: self.layout.hit_test(at),
                    };
                }
                None
            }
            (PointerState::Dragging { task_id, .. }, PointerInput::Move(at)) => {
                self.state = PointerState::Dragging {
                    task_id,
                    over: self.layout.hit_test(at),
                };
                None
            }
            (PointerState::Dragging { task_id, .. }, PointerInput::Up(at)) => {
                self.state = PointerState::Idle;
                self.layout
                    .hit_test(at)
                    .map(|lane| DropIntent { task_id, lane })
            }
            // A press released before activation is a click
            (_, PointerInput::Up(_)) => {
                self.state = PointerState::Idle;
                None
            }
            (PointerState::Idle, PointerInput::Move(_)) => None,
        }
    }

    fn is_dragging(&self) -> bool {
        matches!(self.state, PointerState::Dragging { .. })
    }

    fn over(&self) -> Option<TaskStatus> {
        match self.state {
            PointerState::Dragging { over, .. } => over,
            _ => None,
        }
    }

    fn cancel(&mut self) {
        self.state = PointerState::Idle;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Picks up a card from the lane it currently sits in
    Pick { task_id: TaskId, from: TaskStatus },
    Left,
    Right,
    Commit,
    Cancel,
}

/// Keyboard dragging across the visible lanes
#[derive(Debug, Clone)]
pub struct KeyboardSensor {
    lanes: Vec<TaskStatus>,
    held: Option<(TaskId, usize)>,
}

impl KeyboardSensor {
    pub fn new(lanes: Vec<TaskStatus>) -> Self {
        Self { lanes, held: None }
    }

    pub fn for_lanes(lanes: &[&Lane]) -> Self {
        Self::new(lanes.iter().map(|lane| lane.status).collect())
    }
}

impl DragSensor for KeyboardSensor {
    type Input = KeyInput;

    fn handle(&mut self, input: KeyInput) -> Option<DropIntent> {
        match input {
            KeyInput::Pick { task_id, from } => {
                if !self.lanes.is_empty() {
                    let index = self.lanes.iter().position(|s| *s == from).unwrap_or(0);
                    self.held = Some((task_id, index));
                }
                None
            }
            KeyInput::Left => {
                if let Some((_, index)) = self.held.as_mut() {
                    *index = index.saturating_sub(1);
                }
                None
            }
            KeyInput::Right => {
                let last = self.lanes.len().saturating_sub(1);
                if let Some((_, index)) = self.held.as_mut() {
                    *index = (*index + 1).min(last);
                }
                None
            }
            KeyInput::Commit => self.held.take().and_then(|(task_id, index)| {
                self.lanes
                    .get(index)
                    .map(|lane| DropIntent { task_id, lane: *lane })
            }),
            KeyInput::Cancel => {
                self.held = None;
                None
            }
        }
    }

    fn is_dragging(&self) -> bool {
        self.held.is_some()
    }

    fn over(&self) -> Option<TaskStatus> {
        self.held
            .and_then(|(_, index)| self.lanes.get(index).copied())
    }

    fn cancel(&mut self) {
        self.held = None;
    }
}
