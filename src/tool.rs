use eframe::egui::{Context, Painter, Response};

/// Each tool must be able to:
/// - handle input events
/// - draw itself onto the `painter`
/// - modify the app state (e.g. the box list or settings)
pub trait Tool {
    /// called once per frame; let the tool inspect input, mutate app state, etc.
    fn handle_input(&mut self, ctx: &Context, response: &Response, app: &mut crate::DragAndDraw);

    /// called after the boxes are drawn, to let the tool draw any decorations
    /// on top (touch indicators etc.)
    fn paint(&mut self, painter: &Painter, app: &crate::DragAndDraw);
}
