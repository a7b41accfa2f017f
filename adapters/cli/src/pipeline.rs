//! Wiring between the pure systems and the console.

use anyhow::{Context, Result};
use icecream_core::{FingerprintPolicy, IceCream, Palette, RunParameters};
use icecream_rendering::{Scene, Viewport};
use icecream_system_enumeration::Enumeration;
use icecream_system_layout::{layout_ice_creams, Canvas, IceCreamLayout};
use icecream_system_palette::seeded_palette;
use tracing::{debug, info};

/// Everything computed before layout: the distinct ice creams and their colors.
#[derive(Clone, Debug)]
pub(crate) struct Menu {
    parameters: RunParameters,
    ice_creams: Vec<IceCream>,
    palette: Palette,
}

impl Menu {
    /// Enumerates the ice creams and assigns flavor colors.
    ///
    /// Fails when the enumeration disagrees with the closed form.
    pub(crate) fn prepare(
        parameters: RunParameters,
        policy: FingerprintPolicy,
        seed: u64,
    ) -> Result<Self> {
        let enumeration = Enumeration::from_parameters(parameters, policy)
            .context("ice cream enumeration is internally inconsistent")?;
        info!(
            num_total_combos = enumeration.examined(),
            unique = enumeration.len(),
            closed_form = enumeration.expected(),
            policy = policy.name(),
            "enumerated ice creams"
        );

        let palette = seeded_palette(parameters.num_flavors(), seed);
        info!(seed, "assigned flavor colors");
        for (flavor, color) in palette.iter() {
            info!(
                flavor = flavor.get(),
                red = color.red(),
                green = color.green(),
                blue = color.blue(),
                "flavor"
            );
        }

        Ok(Self {
            parameters,
            ice_creams: enumeration.into_ice_creams(),
            palette,
        })
    }

    /// Lays the menu out on `canvas`.
    pub(crate) fn layout(&self, canvas: Canvas) -> Result<IceCreamLayout> {
        info!(aspect_ratio = canvas.aspect_ratio(), "sizing layout grid");
        let layout = layout_ice_creams(self.parameters, &self.ice_creams, &self.palette, canvas)
            .context("failed to lay out ice creams")?;
        info!(
            num_rows = layout.grid.rows,
            num_cols = layout.grid.columns,
            radius = layout.radius,
            "computed layout grid"
        );
        debug!(circles = layout.circles.len(), label = %layout.label.text, "placed scoops");
        Ok(layout)
    }

    /// Builds a renderable scene for the current viewport.
    pub(crate) fn scene(&self, viewport: Viewport) -> Result<Scene> {
        let canvas = Canvas::new(viewport.width, viewport.height)
            .context("viewport cannot hold a layout")?;
        let layout = self.layout(canvas)?;
        Ok(Scene::from_layout(&layout))
    }
}
