pub mod modes {
    pub const SIMPLE_SELECT: &str = "simple_select";
    pub const DIRECT_SELECT: &str = "direct_select";
    pub const DRAW_POLYGON: &str = "draw_polygon";
    pub const DRAW_RECTANGLE: &str = "draw_rectangle";
    pub const DRAW_CIRCLE: &str = "draw_circle";
    pub const STATIC: &str = "static";

    /// Modes in which a shape is being drawn from scratch.
    pub fn is_drawing_mode(mode: &str) -> bool {
        matches!(mode, DRAW_POLYGON | DRAW_CIRCLE | DRAW_RECTANGLE)
    }
}

pub mod events {
    pub const CREATE: &str = "draw.create";
    pub const UPDATE: &str = "draw.update";
    pub const DELETE: &str = "draw.delete";
    pub const SELECTION_CHANGE: &str = "draw.selectionchange";
    pub const MODE_CHANGE: &str = "draw.modechange";
    pub const LIVE_UPDATE: &str = "draw.liveUpdate";
}

pub mod properties {
    pub const IS_CIRCLE: &str = "isCircle";
    pub const CENTER: &str = "center";
    pub const RADIUS_IN_KM: &str = "radiusInKm";

    // Display properties read by style filters.
    pub const META: &str = "meta";
    pub const ACTIVE: &str = "active";
    pub const MODE: &str = "mode";
    pub const PARENT: &str = "parent";
    pub const COORD_PATH: &str = "coord_path";
    pub const ID: &str = "id";
}

pub mod keys {
    pub const ESCAPE: &str = "Escape";
    pub const ENTER: &str = "Enter";
    pub const BACKSPACE: &str = "Backspace";
    pub const DELETE: &str = "Delete";
}

pub mod buttons {
    pub const POLYGON: &str = "polygon";
}
