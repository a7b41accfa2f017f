#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for ice cream adapters.
//!
//! Scenes are expressed in the y-up canvas space produced by the layout
//! system. Backends whose screen space grows downwards convert positions with
//! [`Viewport::to_screen`].

use std::{error::Error, fmt, path::PathBuf};

use anyhow::Result as AnyResult;
use glam::Vec2;
use icecream_core::{FlavorColor, HorizontalAnchor, Label, ScoopCircle, VerticalAnchor};
use icecream_system_layout::IceCreamLayout;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the color with its alpha replaced by a byte opacity.
    #[must_use]
    pub const fn with_opacity(self, opacity: u8) -> Self {
        Self {
            alpha: opacity as f32 / 255.0,
            ..self
        }
    }
}

impl From<FlavorColor> for Color {
    fn from(color: FlavorColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Size of the drawable surface a scene is built for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Width of the surface.
    pub width: f32,
    /// Height of the surface.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport descriptor.
    ///
    /// Returns an error when either dimension is not positive and finite.
    pub fn new(width: f32, height: f32) -> Result<Self, RenderingError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(width) || !valid(height) {
            return Err(RenderingError::InvalidViewport { width, height });
        }

        Ok(Self { width, height })
    }

    /// Converts a y-up canvas position into y-down screen coordinates.
    #[must_use]
    pub fn to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(position.x, self.height - position.y)
    }
}

/// Single translucent scoop drawn as a filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoopPresentation {
    /// Circle center in canvas space.
    pub center: Vec2,
    /// Circle radius.
    pub radius: f32,
    /// Fill color including opacity.
    pub color: Color,
}

impl From<&ScoopCircle> for ScoopPresentation {
    fn from(circle: &ScoopCircle) -> Self {
        Self {
            center: Vec2::new(circle.x, circle.y),
            radius: circle.radius,
            color: Color::from(circle.color).with_opacity(circle.opacity),
        }
    }
}

/// Text drawn relative to an anchor point.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelPresentation {
    /// Text content.
    pub text: String,
    /// Anchor point in canvas space.
    pub anchor: Vec2,
    /// Horizontal alignment around the anchor.
    pub anchor_x: HorizontalAnchor,
    /// Vertical alignment around the anchor.
    pub anchor_y: VerticalAnchor,
    /// Text color including opacity.
    pub color: Color,
}

impl From<&Label> for LabelPresentation {
    fn from(label: &Label) -> Self {
        Self {
            text: label.text.clone(),
            anchor: Vec2::new(label.x, label.y),
            anchor_x: label.anchor_x,
            anchor_y: label.anchor_y,
            color: Color::WHITE.with_opacity(label.opacity),
        }
    }
}

/// Everything drawn in a single frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Scoops in draw order.
    pub scoops: Vec<ScoopPresentation>,
    /// Optional label drawn above the scoops.
    pub label: Option<LabelPresentation>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(scoops: Vec<ScoopPresentation>, label: Option<LabelPresentation>) -> Self {
        Self { scoops, label }
    }

    /// Converts a computed layout into presentation descriptors.
    #[must_use]
    pub fn from_layout(layout: &IceCreamLayout) -> Self {
        Self::new(
            layout.circles.iter().map(ScoopPresentation::from).collect(),
            Some(LabelPresentation::from(&layout.label)),
        )
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Initial window width.
    pub window_width: u32,
    /// Initial window height.
    pub window_height: u32,
    /// Where to save a PNG of the first complete frame, if anywhere.
    pub snapshot: Option<PathBuf>,
}

impl Presentation {
    /// Constructs a new presentation descriptor that clears to black.
    #[must_use]
    pub fn new<T>(window_title: T, window_width: u32, window_height: u32) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color: Color::BLACK,
            window_width,
            window_height,
            snapshot: None,
        }
    }

    /// Requests a PNG snapshot of the first complete frame.
    #[must_use]
    pub fn with_snapshot(mut self, snapshot: Option<PathBuf>) -> Self {
        self.snapshot = snapshot;
        self
    }
}

/// Rendering backend capable of presenting ice cream scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// `build_scene` is invoked before the first frame and again whenever the
    /// drawable surface changes size, so the layout can be recomputed for the
    /// new aspect ratio. An error returned from `build_scene` stops the
    /// backend and is propagated to the caller.
    fn run<F>(self, presentation: Presentation, build_scene: F) -> AnyResult<()>
    where
        F: FnMut(Viewport) -> AnyResult<Scene> + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Viewports must have a positive, finite area.
    InvalidViewport {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(
                    f,
                    "viewport must have a positive, finite size (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use icecream_core::{FlavorId, LABEL_OPACITY, SCOOP_OPACITY};
    use icecream_system_layout::GridSize;

    fn sample_layout() -> IceCreamLayout {
        IceCreamLayout {
            grid: GridSize {
                rows: 3,
                columns: 3,
            },
            box_width: 100.0,
            box_height: 80.0,
            radius: 20.0,
            circles: vec![ScoopCircle {
                x: 100.0,
                y: 60.0,
                radius: 20.0,
                flavor: FlavorId::new(0),
                color: FlavorColor::from_rgb(255, 51, 102),
                opacity: SCOOP_OPACITY,
            }],
            label: Label {
                text: "scoops=1, flavors=1, icecreams=1".to_owned(),
                x: 150.0,
                y: 230.0,
                anchor_x: HorizontalAnchor::Center,
                anchor_y: VerticalAnchor::Center,
                opacity: LABEL_OPACITY,
            },
        }
    }

    #[test]
    fn viewport_rejects_empty_surfaces() {
        assert!(Viewport::new(640.0, 480.0).is_ok());
        assert_eq!(
            Viewport::new(0.0, 480.0),
            Err(RenderingError::InvalidViewport {
                width: 0.0,
                height: 480.0
            })
        );
        assert!(Viewport::new(640.0, f32::NAN).is_err());
    }

    #[test]
    fn to_screen_flips_the_vertical_axis() {
        let viewport = Viewport::new(300.0, 240.0).expect("valid viewport");

        assert_eq!(
            viewport.to_screen(Vec2::new(100.0, 60.0)),
            Vec2::new(100.0, 180.0)
        );
    }

    #[test]
    fn scene_from_layout_preserves_geometry_and_opacity() {
        let scene = Scene::from_layout(&sample_layout());

        assert_eq!(scene.scoops.len(), 1);
        let scoop = scene.scoops[0];
        assert_eq!(scoop.center, Vec2::new(100.0, 60.0));
        assert_eq!(scoop.radius, 20.0);
        assert!((scoop.color.red - 1.0).abs() < f32::EPSILON);
        assert!((scoop.color.green - 0.2).abs() < 1e-6);
        assert!((scoop.color.alpha - 128.0 / 255.0).abs() < 1e-6);

        let label = scene.label.expect("label present");
        assert_eq!(label.text, "scoops=1, flavors=1, icecreams=1");
        assert_eq!(label.anchor, Vec2::new(150.0, 230.0));
        assert!((label.color.alpha - 200.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn presentation_defaults_to_black_without_snapshot() {
        let presentation = Presentation::new("ice creams", 960, 720);

        assert_eq!(presentation.clear_color, Color::BLACK);
        assert!(presentation.snapshot.is_none());

        let presentation = presentation.with_snapshot(Some(PathBuf::from("out.png")));
        assert_eq!(presentation.snapshot, Some(PathBuf::from("out.png")));
    }
}
