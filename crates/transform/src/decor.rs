use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tilescene_common::{GridCoord, PlacementInfo, TileId};

use crate::profile::{GrassScatter, PlacementConvention, VerticalConvention};

/// A placement resolved into the engine's index space.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub kind: String,
    pub x_index: f64,
    pub y_index: f64,
}

impl Placement {
    /// Resolve an authored placement; `x` is kept as is.
    pub fn resolve(info: &PlacementInfo, convention: PlacementConvention, height: usize) -> Self {
        Self {
            kind: info.kind.clone(),
            x_index: info.position.x,
            y_index: convention.y_index(info.position.y, height),
        }
    }
}

/// Random source for decoration scattering.
///
/// Seeded runs are reproducible; without a seed the generator draws from OS
/// entropy and every run differs.
pub fn scatter_rng(seed: Option<u64>) -> Pcg64 {
    match seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    }
}

/// Scatter grass decorations over every cell carrying the grass tile.
///
/// Each candidate cell gets a decoration with probability `rule.probability`,
/// placed at a uniformly random offset inside the cell.
pub fn scatter_grass<R: Rng + ?Sized>(
    layout: &[TileId],
    width: usize,
    height: usize,
    rule: &GrassScatter,
    vertical: VerticalConvention,
    rng: &mut R,
) -> Vec<Placement> {
    let mut placed = Vec::new();
    if width == 0 {
        return placed;
    }
    for (index, &id) in layout.iter().enumerate() {
        if id != rule.tile || !rng.gen_bool(rule.probability) {
            continue;
        }
        let coord = GridCoord::from_index(index, width);
        let dx: f64 = rng.gen_range(0.0..1.0);
        let dy: f64 = rng.gen_range(0.0..1.0);
        placed.push(Placement {
            kind: rule.decoration.clone(),
            x_index: coord.col as f64 + dx,
            y_index: vertical.y_index(coord.row, height) as f64 + dy,
        });
    }
    tracing::debug!(count = placed.len(), "grass scattered");
    placed
}
