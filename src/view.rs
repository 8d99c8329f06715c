use crate::gesture::{self, Action, MotionEvent, TouchType};
use crate::settings::Settings;
use crate::shape::{BoxShape, Shapes};
use eframe::egui::{Painter, Pos2, Rect, Stroke, epaint::PathShape};
use kurbo::Point;

/// owns the box list and turns motion events into box edits.
///
/// input is fed through `on_touch_event`, drawing happens in `render`.
#[derive(Default)]
pub struct BoxDrawingView {
    boxes: Vec<BoxShape>,

    // index into `boxes` of the box being dragged out, if any
    current: Option<usize>,

    touch_type: TouchType,

    // angle between the two fingers on the previous move
    last_rotation: f64,
    rotation_started: bool,

    content_description: String,
}

impl BoxDrawingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxes(&self) -> &[BoxShape] {
        &self.boxes
    }

    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    pub fn current_box(&self) -> Option<&BoxShape> {
        self.current.and_then(|idx| self.boxes.get(idx))
    }

    pub fn touch_type(&self) -> TouchType {
        self.touch_type
    }

    /// accessibility text, refreshed every time a gesture ends
    pub fn content_description(&self) -> &str {
        &self.content_description
    }

    pub fn is_gesture_active(&self) -> bool {
        self.current.is_some() || self.touch_type != TouchType::None
    }

    /// returns whether the event was consumed, which is always the case
    pub fn on_touch_event(&mut self, event: &MotionEvent) -> bool {
        let current = event.pos();

        match event.action {
            Action::Down => {
                log_action("DOWN", event);
                self.boxes.push(BoxShape::new(current));
                self.current = Some(self.boxes.len() - 1);
                log::trace!("boxes: {:?}", self.boxes);
            }

            Action::Up => {
                log_action("UP", event);
                if self.touch_type == TouchType::None {
                    self.update_current_box(current);
                }
                self.current = None;
                self.touch_type = TouchType::None;
                self.update_content_description();
            }

            Action::PointerDown => {
                log_action("POINTER_DOWN", event);
                if self.touch_type != TouchType::Scale {
                    // the first finger already started a box, a second finger
                    // means the user wanted to twist, not draw
                    if self.boxes.pop().is_some() {
                        log::debug!("dropped in-progress box, {} left", self.boxes.len());
                    }
                    self.current = None;
                }
                if let Some(angle) = gesture::rotation_degrees(event) {
                    self.last_rotation = angle;
                }
                self.rotation_started = true;
                self.touch_type = TouchType::Scale;
            }

            Action::PointerUp => {
                log_action("POINTER_UP", event);
                self.rotation_started = false;
                // the lifted pointer is still part of the event
                if event.pointer_count() <= 2 {
                    self.touch_type = TouchType::None;
                }
            }

            Action::Move => {
                if self.touch_type != TouchType::Scale {
                    self.update_current_box(current);
                }
                self.process_move(event);
            }

            Action::Cancel => {
                log_action("CANCEL", event);
                // the box stays, but no Up follows a cancel so the gesture
                // state has to be reset here
                self.current = None;
                self.touch_type = TouchType::None;
                self.rotation_started = false;
            }
        }
        true
    }

    fn update_current_box(&mut self, current: Point) {
        if let Some(b) = self.current.and_then(|idx| self.boxes.get_mut(idx)) {
            b.end = current;
            b.rotation = 0.0;
        }
    }

    fn process_move(&mut self, event: &MotionEvent) {
        match self.touch_type {
            TouchType::Scale => self.rotate_with_motion(event),
            TouchType::Translate | TouchType::None => {}
        }
    }

    /// adds the change in finger angle to every box that holds both fingers
    fn rotate_with_motion(&mut self, event: &MotionEvent) {
        if event.pointer_count() != 2 || !self.rotation_started {
            return;
        }
        let (Some(first), Some(second), Some(angle)) = (
            event.pointer_pos(0),
            event.pointer_pos(1),
            gesture::rotation_degrees(event),
        ) else {
            return;
        };

        let delta = gesture::angle_delta(self.last_rotation, angle);
        for b in self
            .boxes
            .iter_mut()
            .filter(|b| b.contains(first) && b.contains(second))
        {
            b.rotation += delta;
        }
        self.last_rotation = angle;
    }

    fn update_content_description(&mut self) {
        self.content_description = format!("Number of boxes on screen: {}", self.boxes.len());
        log::debug!("{}", self.content_description);
    }

    /// removes the newest box, ignored while a finger is down
    pub fn undo_last(&mut self) -> Option<BoxShape> {
        if self.is_gesture_active() {
            return None;
        }
        let removed = self.boxes.pop();
        self.update_content_description();
        removed
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
        self.current = None;
        self.touch_type = TouchType::None;
        self.rotation_started = false;
        self.update_content_description();
    }

    /// snapshot of the list for saving
    pub fn shapes(&self) -> Shapes {
        Shapes::new(self.boxes.clone())
    }

    /// replaces the whole list, any gesture in flight is forgotten
    pub fn restore(&mut self, shapes: Shapes) {
        self.boxes = shapes.into_boxes();
        self.current = None;
        self.touch_type = TouchType::None;
        self.rotation_started = false;
        self.update_content_description();
    }

    /// fills `canvas` with the background and draws every box in list order.
    ///
    /// box coordinates are relative to `canvas.min`.
    pub fn render(&self, painter: &Painter, canvas: Rect, settings: &Settings) {
        painter.rect_filled(canvas, 0.0, settings.background_color);

        let origin = canvas.min.to_vec2();
        for b in &self.boxes {
            let points: Vec<Pos2> = b
                .corners()
                .iter()
                .map(|p| to_pos2(*p) + origin)
                .collect();
            painter.add(PathShape::convex_polygon(
                points,
                settings.box_color,
                Stroke::NONE,
            ));
        }
    }
}

fn log_action(name: &str, event: &MotionEvent) {
    log::debug!(
        "{} index: {}, ID: {:?}",
        name,
        event.action_index,
        event.action_pointer_id()
    );
}

pub fn to_pos2(p: Point) -> Pos2 {
    Pos2::new(p.x as f32, p.y as f32)
}

pub fn to_point(p: Pos2) -> Point {
    Point::new(p.x as f64, p.y as f64)
}

/// converts a screen position into canvas-local coordinates
pub fn to_local(p: Pos2, canvas_min: Pos2) -> Point {
    to_point(p - canvas_min.to_vec2())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Pointer;

    fn finger(id: u64, x: f64, y: f64) -> Pointer {
        Pointer {
            id,
            pos: Point::new(x, y),
        }
    }

    fn event(action: Action, action_index: usize, pointers: &[Pointer]) -> MotionEvent {
        MotionEvent::new(action, action_index, pointers.to_vec())
    }

    /// single-finger press, drag, release
    fn draw_box(view: &mut BoxDrawingView, from: (f64, f64), to: (f64, f64)) {
        let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
        view.on_touch_event(&event(Action::Down, 0, &[finger(0, from.0, from.1)]));
        view.on_touch_event(&event(Action::Move, 0, &[finger(0, mid.0, mid.1)]));
        view.on_touch_event(&event(Action::Move, 0, &[finger(0, to.0, to.1)]));
        view.on_touch_event(&event(Action::Up, 0, &[finger(0, to.0, to.1)]));
    }

    /// two fingers on a circle of radius 20 around (50, 50)
    fn fingers_at(angle_deg: f64) -> [Pointer; 2] {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        [
            finger(0, 50.0 + 20.0 * cos, 50.0 + 20.0 * sin),
            finger(1, 50.0 - 20.0 * cos, 50.0 - 20.0 * sin),
        ]
    }

    #[test]
    fn test_single_finger_gestures_create_boxes_in_order() {
        let mut view = BoxDrawingView::new();
        let drags = [
            ((10.0, 10.0), (60.0, 40.0)),
            ((200.0, 150.0), (120.0, 90.0)),
            ((5.0, 300.0), (6.0, 301.0)),
        ];
        for (from, to) in drags {
            draw_box(&mut view, from, to);
        }

        assert_eq!(view.box_count(), 3);
        for (b, (from, to)) in view.boxes().iter().zip(drags) {
            assert_eq!(b.start, Point::new(from.0, from.1));
            assert_eq!(b.end, Point::new(to.0, to.1));
            assert_eq!(b.rotation, 0.0);
        }
        assert!(view.current_box().is_none());
        assert_eq!(view.touch_type(), TouchType::None);
        assert_eq!(view.content_description(), "Number of boxes on screen: 3");
    }

    #[test]
    fn test_drag_moves_free_corner_of_current_box() {
        let mut view = BoxDrawingView::new();
        view.on_touch_event(&event(Action::Down, 0, &[finger(0, 10.0, 10.0)]));
        assert_eq!(view.current_box().map(|b| b.end), Some(Point::new(10.0, 10.0)));

        view.on_touch_event(&event(Action::Move, 0, &[finger(0, 30.0, 5.0)]));
        let current = view.current_box().unwrap();
        assert_eq!(current.start, Point::new(10.0, 10.0));
        assert_eq!(current.end, Point::new(30.0, 5.0));
        assert_eq!(current.top(), 5.0);
    }

    #[test]
    fn test_second_finger_discards_newest_box() {
        let mut view = BoxDrawingView::new();
        draw_box(&mut view, (0.0, 0.0), (100.0, 100.0));
        draw_box(&mut view, (300.0, 300.0), (400.0, 400.0));

        view.on_touch_event(&event(Action::Down, 0, &[finger(0, 20.0, 20.0)]));
        assert_eq!(view.box_count(), 3);
        view.on_touch_event(&event(
            Action::PointerDown,
            1,
            &[finger(0, 20.0, 20.0), finger(1, 80.0, 80.0)],
        ));
        assert_eq!(view.box_count(), 2);
        assert!(view.current_box().is_none());
        assert_eq!(view.touch_type(), TouchType::Scale);
        assert_eq!(view.boxes()[1].start, Point::new(300.0, 300.0));
    }

    #[test]
    fn test_third_finger_does_not_discard_again() {
        let mut view = BoxDrawingView::new();
        draw_box(&mut view, (0.0, 0.0), (100.0, 100.0));

        let fingers = [finger(0, 20.0, 20.0), finger(1, 80.0, 80.0), finger(2, 50.0, 50.0)];
        view.on_touch_event(&event(Action::Down, 0, &fingers[..1]));
        view.on_touch_event(&event(Action::PointerDown, 1, &fingers[..2]));
        view.on_touch_event(&event(Action::PointerDown, 2, &fingers));
        assert_eq!(view.box_count(), 1);
    }

    #[test]
    fn test_second_finger_on_empty_list_is_harmless() {
        let mut view = BoxDrawingView::new();
        // pointer ids only, the first down was never seen
        view.on_touch_event(&event(
            Action::PointerDown,
            1,
            &[finger(0, 0.0, 0.0), finger(1, 10.0, 0.0)],
        ));
        assert_eq!(view.box_count(), 0);
        assert_eq!(view.touch_type(), TouchType::Scale);
    }

    #[test]
    fn test_twist_rotates_box_under_both_fingers() {
        let mut view = BoxDrawingView::new();
        draw_box(&mut view, (0.0, 0.0), (100.0, 100.0));
        draw_box(&mut view, (200.0, 200.0), (300.0, 300.0));
        // only holds the first finger
        draw_box(&mut view, (60.0, 40.0), (90.0, 70.0));

        let start = fingers_at(0.0);
        view.on_touch_event(&event(Action::Down, 0, &start[..1]));
        view.on_touch_event(&event(Action::PointerDown, 1, &start));
        assert_eq!(view.box_count(), 3);

        let mut last = 0.0;
        for step in 1..=6 {
            let fingers = fingers_at(step as f64 * 5.0);
            view.on_touch_event(&event(Action::Move, 0, &fingers));
            let rotation = view.boxes()[0].rotation;
            assert!(rotation > last, "rotation should keep growing");
            last = rotation;
        }

        assert!((view.boxes()[0].rotation - 30.0).abs() < 1e-6);
        assert_eq!(view.boxes()[1].rotation, 0.0);
        assert_eq!(view.boxes()[2].rotation, 0.0);
    }

    #[test]
    fn test_twist_across_half_turn_stays_continuous() {
        let mut view = BoxDrawingView::new();
        draw_box(&mut view, (0.0, 0.0), (100.0, 100.0));

        let start = fingers_at(170.0);
        view.on_touch_event(&event(Action::Down, 0, &start[..1]));
        view.on_touch_event(&event(Action::PointerDown, 1, &start));
        view.on_touch_event(&event(Action::Move, 0, &fingers_at(180.0)));
        view.on_touch_event(&event(Action::Move, 0, &fingers_at(190.0)));

        // atan2 reports -170 for the last frame, the box still turns by +20
        assert!((view.boxes()[0].rotation - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_twist_needs_exactly_two_fingers() {
        let mut view = BoxDrawingView::new();
        draw_box(&mut view, (0.0, 0.0), (100.0, 100.0));

        let start = fingers_at(0.0);
        view.on_touch_event(&event(Action::Down, 0, &start[..1]));
        view.on_touch_event(&event(Action::PointerDown, 1, &start));
        let turned = fingers_at(20.0);
        let third = finger(2, 50.0, 50.0);
        view.on_touch_event(&event(Action::Move, 0, &[turned[0], turned[1], third]));
        assert_eq!(view.boxes()[0].rotation, 0.0);
    }

    #[test]
    fn test_lifting_second_finger_returns_to_none() {
        let mut view = BoxDrawingView::new();
        draw_box(&mut view, (0.0, 0.0), (100.0, 100.0));

        let start = fingers_at(0.0);
        view.on_touch_event(&event(Action::Down, 0, &start[..1]));
        view.on_touch_event(&event(Action::PointerDown, 1, &start));
        view.on_touch_event(&event(Action::PointerUp, 1, &start));
        assert_eq!(view.touch_type(), TouchType::None);

        // the remaining finger neither rotates nor resizes anything
        view.on_touch_event(&event(Action::Move, 0, &[finger(0, 90.0, 90.0)]));
        view.on_touch_event(&event(Action::Up, 0, &[finger(0, 90.0, 90.0)]));
        assert_eq!(view.box_count(), 1);
        assert_eq!(view.boxes()[0].end, Point::new(100.0, 100.0));
        assert_eq!(view.boxes()[0].rotation, 0.0);
        assert_eq!(view.content_description(), "Number of boxes on screen: 1");
    }

    #[test]
    fn test_cancel_keeps_box_but_stops_tracking() {
        let mut view = BoxDrawingView::new();
        view.on_touch_event(&event(Action::Down, 0, &[finger(0, 10.0, 10.0)]));
        view.on_touch_event(&event(Action::Move, 0, &[finger(0, 20.0, 20.0)]));
        view.on_touch_event(&event(Action::Cancel, 0, &[finger(0, 20.0, 20.0)]));
        view.on_touch_event(&event(Action::Move, 0, &[finger(0, 90.0, 90.0)]));

        assert_eq!(view.box_count(), 1);
        assert!(view.current_box().is_none());
        assert_eq!(view.boxes()[0].end, Point::new(20.0, 20.0));
    }

    #[test]
    fn test_cancel_during_twist_resets_gesture_state() {
        let mut view = BoxDrawingView::new();
        draw_box(&mut view, (0.0, 0.0), (100.0, 100.0));

        let start = fingers_at(0.0);
        view.on_touch_event(&event(Action::Down, 0, &start[..1]));
        view.on_touch_event(&event(Action::PointerDown, 1, &start));
        view.on_touch_event(&event(Action::Cancel, 1, &start));
        assert_eq!(view.touch_type(), TouchType::None);
        assert!(!view.is_gesture_active());

        // a fresh single-finger drag resizes its box again
        draw_box(&mut view, (200.0, 200.0), (300.0, 300.0));
        assert_eq!(view.box_count(), 2);
        assert_eq!(view.boxes()[1].start, Point::new(200.0, 200.0));
        assert_eq!(view.boxes()[1].end, Point::new(300.0, 300.0));

        // and undo works once nothing is down
        assert!(view.undo_last().is_some());
        assert_eq!(view.box_count(), 1);
    }

    #[test]
    fn test_undo_and_clear() {
        let mut view = BoxDrawingView::new();
        draw_box(&mut view, (0.0, 0.0), (10.0, 10.0));
        draw_box(&mut view, (20.0, 20.0), (30.0, 30.0));

        let removed = view.undo_last().unwrap();
        assert_eq!(removed.start, Point::new(20.0, 20.0));
        assert_eq!(view.content_description(), "Number of boxes on screen: 1");

        view.on_touch_event(&event(Action::Down, 0, &[finger(0, 50.0, 50.0)]));
        assert!(view.undo_last().is_none());
        assert_eq!(view.box_count(), 2);

        view.clear();
        assert_eq!(view.box_count(), 0);
        assert!(view.current_box().is_none());
        assert!(view.undo_last().is_none());
    }

    #[test]
    fn test_restore_replaces_list() {
        let mut view = BoxDrawingView::new();
        draw_box(&mut view, (0.0, 0.0), (10.0, 10.0));
        let saved = view.shapes();

        let mut other = BoxDrawingView::new();
        draw_box(&mut other, (5.0, 5.0), (6.0, 6.0));
        draw_box(&mut other, (7.0, 7.0), (8.0, 8.0));
        other.on_touch_event(&event(Action::Down, 0, &[finger(0, 1.0, 1.0)]));
        other.restore(saved.clone());

        assert_eq!(other.boxes(), saved.boxes.as_slice());
        assert!(other.current_box().is_none());
        assert_eq!(other.content_description(), "Number of boxes on screen: 1");
    }

    #[test]
    fn test_local_coordinates() {
        let p = to_local(Pos2::new(110.0, 65.0), Pos2::new(10.0, 15.0));
        assert_eq!(p, Point::new(100.0, 50.0));
        assert_eq!(to_pos2(p), Pos2::new(100.0, 50.0));
    }
}
