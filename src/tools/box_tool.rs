use crate::DragAndDraw;
use crate::gesture::{Action, MotionEvent, Pointer};
use crate::tool::Tool;
use crate::view::{to_local, to_pos2};
use eframe::egui::{
    self, Color32, Context, Event, Painter, PointerButton, Pos2, Response, Stroke, TouchPhase,
};

/// pointer id used for the emulated single-finger mouse
const MOUSE_POINTER_ID: u64 = u64::MAX;

/// radius (in points) of the circle drawn under each finger
const TOUCH_INDICATOR_RADIUS: f32 = 18.0;

/// Turns raw egui input into `MotionEvent`s, one per touch change.
///
/// Pointers are kept in touch-down order so the first finger is always
/// pointer 0, the same way a phone reports them.
#[derive(Default)]
pub struct TouchTracker {
    active: Vec<Pointer>,

    // set while the emulated mouse finger is down, `active` then holds only it
    mouse_down: bool,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_pointers(&self) -> &[Pointer] {
        &self.active
    }

    /// egui-winit echoes the first finger as mouse input, pointer events are
    /// ignored while any real finger is down
    fn touching(&self) -> bool {
        !self.mouse_down && !self.active.is_empty()
    }

    /// `accepts` decides whether a gesture may start at a screen position,
    /// fingers added to a running gesture are always taken.
    pub fn process(
        &mut self,
        events: &[Event],
        canvas_min: Pos2,
        accepts: impl Fn(Pos2) -> bool,
    ) -> Vec<MotionEvent> {
        let mut out = Vec::new();
        for event in events {
            match event {
                Event::Touch { id, phase, pos, .. } if !self.mouse_down => {
                    let pointer = Pointer {
                        id: id.0,
                        pos: to_local(*pos, canvas_min),
                    };
                    self.on_touch(*phase, pointer, *pos, &accepts, &mut out);
                }
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } if !self.touching() => {
                    let pointer = Pointer {
                        id: MOUSE_POINTER_ID,
                        pos: to_local(*pos, canvas_min),
                    };
                    if *pressed && !self.mouse_down && accepts(*pos) {
                        self.mouse_down = true;
                        self.active = vec![pointer];
                        out.push(MotionEvent::new(Action::Down, 0, self.active.clone()));
                    } else if !*pressed && self.mouse_down {
                        self.mouse_down = false;
                        self.active = vec![pointer];
                        out.push(MotionEvent::new(Action::Up, 0, std::mem::take(&mut self.active)));
                    }
                }
                Event::PointerMoved(pos) if self.mouse_down => {
                    self.active = vec![Pointer {
                        id: MOUSE_POINTER_ID,
                        pos: to_local(*pos, canvas_min),
                    }];
                    out.push(MotionEvent::new(Action::Move, 0, self.active.clone()));
                }
                Event::PointerGone if self.mouse_down => {
                    self.mouse_down = false;
                    out.push(MotionEvent::new(Action::Cancel, 0, std::mem::take(&mut self.active)));
                }
                _ => {}
            }
        }
        out
    }

    fn on_touch(
        &mut self,
        phase: TouchPhase,
        pointer: Pointer,
        screen_pos: Pos2,
        accepts: &impl Fn(Pos2) -> bool,
        out: &mut Vec<MotionEvent>,
    ) {
        let index = self.active.iter().position(|p| p.id == pointer.id);
        match (phase, index) {
            (TouchPhase::Start, None) => {
                if self.active.is_empty() && !accepts(screen_pos) {
                    return;
                }
                self.active.push(pointer);
                let action = if self.active.len() == 1 {
                    Action::Down
                } else {
                    Action::PointerDown
                };
                out.push(MotionEvent::new(action, self.active.len() - 1, self.active.clone()));
            }
            (TouchPhase::Move, Some(idx)) => {
                self.active[idx].pos = pointer.pos;
                out.push(MotionEvent::new(Action::Move, idx, self.active.clone()));
            }
            (TouchPhase::End, Some(idx)) => {
                self.active[idx].pos = pointer.pos;
                let action = if self.active.len() == 1 {
                    Action::Up
                } else {
                    Action::PointerUp
                };
                out.push(MotionEvent::new(action, idx, self.active.clone()));
                self.active.remove(idx);
            }
            (TouchPhase::Cancel, Some(idx)) => {
                out.push(MotionEvent::new(Action::Cancel, idx, std::mem::take(&mut self.active)));
            }
            // touches that never started on the canvas, or a repeated start
            _ => {}
        }
    }
}

/// number of Backspace/Delete presses, none while a widget owns the keyboard
fn undo_presses(events: &[Event], keyboard_taken: bool) -> usize {
    if keyboard_taken {
        return 0;
    }
    events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::Key {
                    key: egui::Key::Delete | egui::Key::Backspace,
                    pressed: true,
                    ..
                }
            )
        })
        .count()
}

/// the one and only tool: draw boxes with one finger, twist them with two
pub struct BoxTool {
    tracker: TouchTracker,

    // top-left of the canvas on the last frame, for painting indicators
    canvas_min: Pos2,
}

impl BoxTool {
    pub fn new() -> Self {
        BoxTool {
            tracker: TouchTracker::new(),
            canvas_min: Pos2::ZERO,
        }
    }
}

impl Tool for BoxTool {
    fn handle_input(&mut self, ctx: &Context, response: &Response, app: &mut DragAndDraw) {
        self.canvas_min = response.rect.min;

        let events = ctx.input(|i| i.events.clone());
        let canvas = response.rect;
        let canvas_layer = response.layer_id;
        // windows on top of the canvas (settings) keep their own clicks
        let accepts = |pos: Pos2| {
            canvas.contains(pos) && ctx.layer_id_at(pos).is_none_or(|layer| layer == canvas_layer)
        };

        let motions = self.tracker.process(&events, canvas.min, accepts);
        for motion in &motions {
            app.view.on_touch_event(motion);
        }
        if !motions.is_empty() {
            log::trace!(
                "touch type: {:?}, current: {:?}",
                app.view.touch_type(),
                app.view.current_box()
            );
            ctx.request_repaint();
        }

        // event: allow “delete last box” via Backspace/Delete:
        let presses = undo_presses(&events, ctx.wants_keyboard_input());
        for _ in 0..presses {
            if app.view.undo_last().is_some() {
                log::debug!("undo, {} boxes left", app.view.box_count());
            }
        }
    }

    fn paint(&mut self, painter: &Painter, app: &DragAndDraw) {
        if !app.settings.show_touches {
            return;
        }
        let origin = self.canvas_min.to_vec2();
        for pointer in self.tracker.active_pointers() {
            let center = to_pos2(pointer.pos) + origin;
            painter.circle(
                center,
                TOUCH_INDICATOR_RADIUS,
                Color32::from_black_alpha(0x20),
                Stroke::new(1.5, Color32::from_rgb(10, 118, 241)),
            );
        }
    }
}
