//! Label placement helpers for the Macroquad rendering backend.
//!
//! Macroquad draws text from the baseline of its left edge, so anchored labels
//! are converted to that origin here. The arithmetic is kept apart from the
//! drawing call so it can be tested without a window.

use glam::Vec2;
use icecream_core::{HorizontalAnchor, VerticalAnchor};
use icecream_rendering::{LabelPresentation, Viewport};

use crate::to_macroquad_color;

/// Measured size of a rendered string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TextExtent {
    /// Width of the string.
    pub(crate) width: f32,
    /// Height of the string's bounding box.
    pub(crate) height: f32,
    /// Distance from the top of the bounding box down to the baseline.
    pub(crate) offset_y: f32,
}

/// Returns the baseline origin that places text of `extent` at `anchor`.
///
/// `anchor` is expressed in y-down screen coordinates.
pub(crate) fn baseline_origin(
    anchor: Vec2,
    extent: TextExtent,
    anchor_x: HorizontalAnchor,
    anchor_y: VerticalAnchor,
) -> Vec2 {
    let left = match anchor_x {
        HorizontalAnchor::Left => anchor.x,
        HorizontalAnchor::Center => anchor.x - extent.width / 2.0,
        HorizontalAnchor::Right => anchor.x - extent.width,
    };
    let top = match anchor_y {
        VerticalAnchor::Top => anchor.y,
        VerticalAnchor::Center => anchor.y - extent.height / 2.0,
        VerticalAnchor::Bottom => anchor.y - extent.height,
    };

    Vec2::new(left, top + extent.offset_y)
}

/// Draws `label` onto the current frame.
pub(crate) fn draw_label(label: &LabelPresentation, viewport: Viewport, font_size: u16) {
    let dimensions = macroquad::text::measure_text(&label.text, None, font_size, 1.0);
    let extent = TextExtent {
        width: dimensions.width,
        height: dimensions.height,
        offset_y: dimensions.offset_y,
    };
    let origin = baseline_origin(
        viewport.to_screen(label.anchor),
        extent,
        label.anchor_x,
        label.anchor_y,
    );

    macroquad::text::draw_text(
        &label.text,
        origin.x,
        origin.y,
        f32::from(font_size),
        to_macroquad_color(label.color),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENT: TextExtent = TextExtent {
        width: 120.0,
        height: 20.0,
        offset_y: 16.0,
    };

    #[test]
    fn centered_text_straddles_the_anchor() {
        let origin = baseline_origin(
            Vec2::new(400.0, 10.0),
            EXTENT,
            HorizontalAnchor::Center,
            VerticalAnchor::Center,
        );

        assert_eq!(origin, Vec2::new(340.0, 16.0));
    }

    #[test]
    fn top_left_anchor_drops_to_the_baseline() {
        let origin = baseline_origin(
            Vec2::new(5.0, 5.0),
            EXTENT,
            HorizontalAnchor::Left,
            VerticalAnchor::Top,
        );

        assert_eq!(origin, Vec2::new(5.0, 21.0));
    }

    #[test]
    fn bottom_right_anchor_ends_at_the_anchor() {
        let origin = baseline_origin(
            Vec2::new(200.0, 100.0),
            EXTENT,
            HorizontalAnchor::Right,
            VerticalAnchor::Bottom,
        );

        assert_eq!(origin, Vec2::new(80.0, 96.0));
    }
}
