#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the ice cream enumerator.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Text placement lives in the local `text` module so anchor arithmetic can be
//! tested without opening a window.

mod text;

use std::{
    path::{Path, PathBuf},
    sync::mpsc,
};

use anyhow::{Context, Result};
use icecream_rendering::{Color, Presentation, RenderingBackend, Scene, Viewport};
use macroquad::input::{is_key_pressed, KeyCode};
use tracing::{debug, info};

use self::text::draw_label;

/// Font size used for labels unless configured otherwise.
pub const DEFAULT_FONT_SIZE: u16 = 20;

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    font_size: u16,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures the font size used for labels.
    #[must_use]
    pub fn with_font_size(mut self, font_size: u16) -> Self {
        self.font_size = font_size.max(1);
        self
    }

    /// Font size used for labels.
    #[must_use]
    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    /// Swap interval requested from the platform, if any.
    #[must_use]
    pub fn swap_interval(&self) -> Option<i32> {
        self.swap_interval
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, build_scene: F) -> Result<()>
    where
        F: FnMut(Viewport) -> Result<Scene> + 'static,
    {
        let Self {
            swap_interval,
            font_size,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            window_width,
            window_height,
            snapshot,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(window_width).context("window width is too large")?,
            window_height: i32::try_from(window_height).context("window height is too large")?,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (outcome_sender, outcome_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let outcome = present(clear_color, snapshot, font_size, build_scene).await;
            let _ = outcome_sender.send(outcome);
        });

        // Closing the window drops the render future without reporting back.
        outcome_receiver.recv().unwrap_or_else(|_| Ok(()))
    }
}

async fn present<F>(
    clear_color: Color,
    snapshot: Option<PathBuf>,
    font_size: u16,
    mut build_scene: F,
) -> Result<()>
where
    F: FnMut(Viewport) -> Result<Scene>,
{
    let background = to_macroquad_color(clear_color);
    let mut pending_snapshot = snapshot;
    let mut current: Option<(Viewport, Scene)> = None;

    loop {
        if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
            break;
        }

        let surface = Viewport::new(
            macroquad::window::screen_width(),
            macroquad::window::screen_height(),
        );
        let Ok(viewport) = surface else {
            // Minimised windows report an empty surface; wait for a real one.
            macroquad::window::next_frame().await;
            continue;
        };

        let stale = current
            .as_ref()
            .map_or(true, |(cached, _)| *cached != viewport);
        if stale {
            let scene = build_scene(viewport).with_context(|| {
                format!(
                    "failed to build scene for a {}x{} viewport",
                    viewport.width, viewport.height
                )
            })?;
            debug!(
                width = viewport.width,
                height = viewport.height,
                scoops = scene.scoops.len(),
                "rebuilt scene"
            );
            current = Some((viewport, scene));
        }

        macroquad::window::clear_background(background);
        if let Some((_, scene)) = &current {
            draw_scene(scene, viewport, font_size);
        }

        if let Some(path) = pending_snapshot.take() {
            save_snapshot(&path)?;
        }

        macroquad::window::next_frame().await;
    }

    Ok(())
}

fn draw_scene(scene: &Scene, viewport: Viewport, font_size: u16) {
    for scoop in &scene.scoops {
        let center = viewport.to_screen(scoop.center);
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            scoop.radius,
            to_macroquad_color(scoop.color),
        );
    }

    if let Some(label) = &scene.label {
        draw_label(label, viewport, font_size);
    }
}

fn save_snapshot(path: &Path) -> Result<()> {
    let target = path
        .to_str()
        .with_context(|| format!("snapshot path {} is not valid UTF-8", path.display()))?;
    macroquad::texture::get_screen_data().export_png(target);
    info!(path = %path.display(), "saved snapshot");
    Ok(())
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
