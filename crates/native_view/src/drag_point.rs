use touch_input::{PlatformTouch, Point, ViewFrame};

/// One contact of a multi-drag event.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPoint {
    pub drag_id: i64,
    /// Engine window coordinates
    pub global: Point,
    /// View-local coordinates
    pub local: Point,
    /// Platform tap or click count, 0 for a synthetic midpoint
    pub click_count: i64,
}

impl DragPoint {
    pub fn new(drag_id: i64, global: Point, local: Point) -> Self {
        Self {
            drag_id,
            global,
            local,
            click_count: 0,
        }
    }

    pub fn with_click_count(mut self, click_count: impl Into<i64>) -> Self {
        self.click_count = click_count.into();
        self
    }

    /// Read a platform contact's current position and click count relative to
    /// `frame`.
    pub fn from_touch<T: PlatformTouch>(drag_id: i64, touch: &T, frame: &ViewFrame) -> Self {
        let global = frame.normalize_window_point(touch.location_in_window());
        Self::new(drag_id, global, frame.to_local(global)).with_click_count(touch.tap_count())
    }
}
