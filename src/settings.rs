use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

/// user-tweakable look of the canvas, persisted together with the boxes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// fill of every box, semi-transparent so overlapping boxes stay visible
    pub box_color: Color32,

    pub background_color: Color32,

    /// draw a circle under each finger that is down
    pub show_touches: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            // 0x22ff0000 (argb)
            box_color: Color32::from_rgba_unmultiplied(0xff, 0x00, 0x00, 0x22),
            // 0xfff8efe0 (argb)
            background_color: Color32::from_rgb(0xf8, 0xef, 0xe0),
            show_touches: true,
        }
    }
}
