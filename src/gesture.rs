//! Platform-neutral multi-touch events.
//!
//! The canvas only ever sees `MotionEvent`s. `tools::box_tool` builds them
//! out of the raw egui input, the tests build them by hand.

use kurbo::Point;

/// what happened to which pointer
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// first finger touched down
    Down,
    /// last finger lifted
    Up,
    /// another finger touched down while at least one is already down
    PointerDown,
    /// a finger lifted while at least one other stays down
    PointerUp,
    Move,
    Cancel,
}

/// which multi-touch operation is in progress
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TouchType {
    #[default]
    None,
    // reserved for moving boxes, nothing drives it yet
    #[allow(dead_code)]
    Translate,
    Scale,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pointer {
    pub id: u64,
    pub pos: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MotionEvent {
    pub action: Action,

    /// index into `pointers` of the finger this action is about
    pub action_index: usize,

    /// every pointer that is down, in the order they touched down.
    /// for `Up`/`PointerUp` the lifted pointer is still included.
    pub pointers: Vec<Pointer>,
}

impl MotionEvent {
    pub fn new(action: Action, action_index: usize, pointers: Vec<Pointer>) -> Self {
        MotionEvent {
            action,
            action_index,
            pointers,
        }
    }

    /// position of the primary (first) pointer
    pub fn pos(&self) -> Point {
        self.pointer_pos(0).unwrap_or(Point::ZERO)
    }

    pub fn pointer_pos(&self, index: usize) -> Option<Point> {
        self.pointers.get(index).map(|p| p.pos)
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn action_pointer_id(&self) -> Option<u64> {
        self.pointers.get(self.action_index).map(|p| p.id)
    }
}

/// angle in degrees of the vector from the second pointer to the first.
///
/// returns `None` if fewer than two pointers are down.
pub fn rotation_degrees(event: &MotionEvent) -> Option<f64> {
    let first = event.pointer_pos(0)?;
    let second = event.pointer_pos(1)?;
    let delta = first - second;
    Some(delta.y.atan2(delta.x).to_degrees())
}

/// `to - from`, wrapped into (-180, 180].
///
/// atan2 jumps from 180 to -180 when the fingers cross the horizontal axis,
/// without wrapping the box would spin a full turn in a single frame.
pub fn angle_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}
