#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure layout system that tiles ice creams across a canvas.
//!
//! The canvas is split into a padded grid of equally sized boxes. Row 0 and
//! column 0 are left empty so that no scoop touches the canvas border; every
//! other box holds at most one ice cream, filled row by row. Coordinates are
//! expressed in a y-up canvas space with the origin at the bottom-left corner.

use icecream_core::{
    FlavorId, HorizontalAnchor, IceCream, Label, Palette, RunParameters, ScoopCircle,
    VerticalAnchor, LABEL_OPACITY, SCOOP_OPACITY,
};
use thiserror::Error;

/// Vertical slack reserved in each box, measured in scoop radii.
pub const UNIT_VERTICAL_SLOP: u32 = 2;

/// Distance between the top of the canvas and the summary label.
pub const LABEL_TOP_MARGIN: f32 = 10.0;

/// Drawable area the layout is computed for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    width: f32,
    height: f32,
}

impl Canvas {
    /// Creates a canvas descriptor.
    ///
    /// Both dimensions must be finite and positive.
    pub fn new(width: f32, height: f32) -> Result<Self, LayoutError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(width) || !valid(height) {
            return Err(LayoutError::EmptyCanvas { width, height });
        }

        Ok(Self { width, height })
    }

    /// Width of the canvas.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the canvas.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Ratio of width to height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Row and column counts of the padded layout grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    /// Number of rows including the empty padding row.
    pub rows: usize,
    /// Number of columns including the empty padding column.
    pub columns: usize,
}

impl GridSize {
    /// Number of boxes that can hold an ice cream.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.rows.saturating_sub(1) * self.columns.saturating_sub(1)
    }
}

/// Computes the padded grid needed to fit `count` ice creams.
///
/// With `side = sqrt(count / aspect_ratio)`, rows start at `floor(side)` and
/// columns at `floor(side * aspect_ratio)`; rows then grow until the unpadded
/// grid holds more than `count` boxes. One padding row and column are added to
/// the result.
pub fn grid_dimensions(count: usize, aspect_ratio: f64) -> Result<GridSize, LayoutError> {
    if count == 0 {
        return Err(LayoutError::NothingToLayout);
    }
    if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
        return Err(LayoutError::InvalidAspectRatio { aspect_ratio });
    }

    let side = (count as f64 / aspect_ratio).sqrt();
    let rows = side.floor() as usize;
    // Tall canvases holding few items round the column count down to zero,
    // which no number of rows can compensate for.
    let columns = ((side * aspect_ratio).floor() as usize).max(1);

    // Smallest row count whose grid exceeds `count`, without lowering `rows`.
    let rows = rows.max(count / columns + 1);

    Ok(GridSize {
        rows: rows + 1,
        columns: columns + 1,
    })
}

/// Circles and label describing one rendered frame.
#[derive(Clone, Debug, PartialEq)]
pub struct IceCreamLayout {
    /// Padded grid the ice creams were placed on.
    pub grid: GridSize,
    /// Width of a single grid box.
    pub box_width: f32,
    /// Height of a single grid box.
    pub box_height: f32,
    /// Radius shared by every scoop.
    pub radius: f32,
    /// One circle per scoop, grouped by ice cream in placement order.
    pub circles: Vec<ScoopCircle>,
    /// Summary of the run parameters.
    pub label: Label,
}

/// Places every ice cream on `canvas`.
///
/// Ice creams fill boxes in row-major order starting at row 1, column 1.
/// Each ice cream becomes a stack of circles starting half a stack below the
/// box center and advancing one radius per scoop.
pub fn layout_ice_creams(
    parameters: RunParameters,
    ice_creams: &[IceCream],
    palette: &Palette,
    canvas: Canvas,
) -> Result<IceCreamLayout, LayoutError> {
    let grid = grid_dimensions(ice_creams.len(), canvas.aspect_ratio())?;
    let num_scoops = parameters.num_scoops();

    let box_width = canvas.width() / grid.columns as f32;
    let box_height = canvas.height() / grid.rows as f32;
    let radius = box_width.min(box_height) / (num_scoops + UNIT_VERTICAL_SLOP) as f32;
    let stack_offset = radius * num_scoops as f32 / 2.0;

    let boxes = (1..grid.rows).flat_map(|row| (1..grid.columns).map(move |column| (row, column)));

    let mut circles = Vec::with_capacity(ice_creams.len() * num_scoops as usize);
    for ((row, column), ice_cream) in boxes.zip(ice_creams) {
        let x = column as f32 * box_width;
        let mut y = row as f32 * box_height - stack_offset;

        for &flavor in ice_cream.scoops() {
            let color = palette
                .color(flavor)
                .ok_or(LayoutError::MissingFlavorColor { flavor })?;
            circles.push(ScoopCircle {
                x,
                y,
                radius,
                flavor,
                color,
                opacity: SCOOP_OPACITY,
            });
            y += radius;
        }
    }

    Ok(IceCreamLayout {
        grid,
        box_width,
        box_height,
        radius,
        circles,
        label: summary_label(parameters, ice_creams.len(), canvas),
    })
}

/// Builds the label summarising scoops, flavors, and the ice cream count.
#[must_use]
pub fn summary_label(parameters: RunParameters, count: usize, canvas: Canvas) -> Label {
    Label {
        text: format!(
            "scoops={}, flavors={}, icecreams={count}",
            parameters.num_scoops(),
            parameters.num_flavors()
        ),
        x: (canvas.width() / 2.0).floor(),
        y: canvas.height() - LABEL_TOP_MARGIN,
        anchor_x: HorizontalAnchor::Center,
        anchor_y: VerticalAnchor::Center,
        opacity: LABEL_OPACITY,
    }
}

/// Reasons a layout cannot be produced.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum LayoutError {
    /// The canvas has no drawable area.
    #[error("canvas must have a positive, finite size (received {width}x{height})")]
    EmptyCanvas {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
    /// The aspect ratio is zero, negative, or not finite.
    #[error("aspect ratio must be positive and finite (received {aspect_ratio})")]
    InvalidAspectRatio {
        /// Provided aspect ratio.
        aspect_ratio: f64,
    },
    /// There are no ice creams to place.
    #[error("there are no ice creams to lay out")]
    NothingToLayout,
    /// An ice cream uses a flavor the palette has no color for.
    #[error("no color assigned to flavor {}", .flavor.get())]
    MissingFlavorColor {
        /// Flavor lacking a color.
        flavor: FlavorId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_canvas_grows_rows_past_the_count() {
        let grid = grid_dimensions(15, 1.0).expect("valid inputs");
        assert_eq!(grid, GridSize { rows: 7, columns: 4 });
    }

    #[test]
    fn wide_canvas_favours_columns() {
        let grid = grid_dimensions(10, 2.0).expect("valid inputs");
        assert_eq!(grid, GridSize { rows: 4, columns: 5 });
    }

    #[test]
    fn default_window_spreads_ten_items_over_three_columns() {
        let grid = grid_dimensions(10, 4.0 / 3.0).expect("valid inputs");
        assert_eq!(grid, GridSize { rows: 5, columns: 4 });
    }

    #[test]
    fn narrow_strip_lays_items_side_by_side() {
        let grid = grid_dimensions(3, 8.0).expect("valid inputs");
        assert_eq!(grid, GridSize { rows: 2, columns: 5 });
        assert!(grid.columns - 1 > 1);

        let grid = grid_dimensions(1, 10.0).expect("valid inputs");
        assert_eq!(grid, GridSize { rows: 2, columns: 4 });
    }

    #[test]
    fn tall_canvas_keeps_at_least_one_column() {
        let grid = grid_dimensions(1, 0.5).expect("valid inputs");
        assert_eq!(grid, GridSize { rows: 3, columns: 2 });
    }

    #[test]
    fn rejects_degenerate_inputs() {
        assert_eq!(grid_dimensions(0, 1.0), Err(LayoutError::NothingToLayout));
        assert!(matches!(
            grid_dimensions(3, 0.0),
            Err(LayoutError::InvalidAspectRatio { .. })
        ));
        assert!(matches!(
            grid_dimensions(3, f64::NAN),
            Err(LayoutError::InvalidAspectRatio { .. })
        ));
        assert!(Canvas::new(0.0, 10.0).is_err());
        assert!(Canvas::new(10.0, f32::INFINITY).is_err());
    }
}
