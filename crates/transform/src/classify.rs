use tilescene_common::{GridCoord, TileId};

use crate::profile::{RetagSlot, WallRetag};

/// Re-tag wall cells whose vertical neighbors are open.
///
/// A wall with an open cell below becomes a wall-face; otherwise a wall with
/// an open cell above becomes a half-wall. Neighbors are always read from
/// `layout`, never from the partially re-tagged output, so the result does
/// not depend on visiting order except where two walls target the same
/// neighbor slot (the later one in row-major order wins).
pub fn convert_wall_tiles(
    layout: &[TileId],
    width: usize,
    height: usize,
    rule: &WallRetag,
) -> Vec<TileId> {
    debug_assert_eq!(layout.len(), width * height);
    let mut derived = layout.to_vec();
    if width == 0 {
        return derived;
    }
    let open = |c: GridCoord| layout[c.index(width)] != rule.wall;

    for (index, &id) in layout.iter().enumerate() {
        if id != rule.wall {
            continue;
        }
        let coord = GridCoord::from_index(index, width);
        let (neighbor, tag) = if let Some(below) = coord.below(height).filter(|&c| open(c)) {
            (below, rule.wall_face)
        } else if let Some(above) = coord.above().filter(|&c| open(c)) {
            (above, rule.half_wall)
        } else {
            continue;
        };
        let slot = match rule.slot {
            RetagSlot::Current => index,
            RetagSlot::Neighbor => neighbor.index(width),
        };
        tracing::trace!(row = coord.row, col = coord.col, slot, %tag, "wall re-tagged");
        derived[slot] = tag;
    }
    derived
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALL: u32 = 1;
    const FACE: u32 = 11;
    const HALF: u32 = 10;

    fn rule(slot: RetagSlot) -> WallRetag {
        WallRetag {
            wall: TileId(WALL),
            wall_face: TileId(FACE),
            half_wall: TileId(HALF),
            slot,
        }
    }

    fn run(raw: &[u32], width: usize, height: usize, slot: RetagSlot) -> Vec<u32> {
        let layout: Vec<TileId> = raw.iter().copied().map(TileId).collect();
        convert_wall_tiles(&layout, width, height, &rule(slot))
            .into_iter()
            .map(|t| t.0)
            .collect()
    }

    #[test]
    fn two_by_two_current_slot() {
        // Top-left wall has floor below; bottom-right wall has floor above.
        assert_eq!(run(&[1, 0, 0, 1], 2, 2, RetagSlot::Current), [FACE, 0, 0, HALF]);
    }

    #[test]
    fn two_by_two_neighbor_slot() {
        assert_eq!(run(&[1, 0, 0, 1], 2, 2, RetagSlot::Neighbor), [1, HALF, FACE, 1]);
    }

    #[test]
    fn face_takes_precedence_over_half() {
        // Middle wall has floor both above and below.
        assert_eq!(run(&[0, 1, 0], 1, 3, RetagSlot::Current), [0, FACE, 0]);
    }

    #[test]
    fn wall_runs_only_tag_their_ends() {
        assert_eq!(run(&[1, 1, 1], 1, 3, RetagSlot::Current), [1, 1, 1]);
        assert_eq!(run(&[1, 1, 0], 1, 3, RetagSlot::Current), [1, FACE, 0]);
        assert_eq!(run(&[0, 1, 1], 1, 3, RetagSlot::Current), [0, HALF, 1]);
    }

    #[test]
    fn bottom_row_wall_checks_above_only() {
        assert_eq!(run(&[0, 1], 1, 2, RetagSlot::Current), [0, HALF]);
        assert_eq!(run(&[0, 1], 1, 2, RetagSlot::Neighbor), [HALF, 1]);
    }

    #[test]
    fn top_row_wall_checks_below_only() {
        assert_eq!(run(&[1, 0], 1, 2, RetagSlot::Current), [FACE, 0]);
        assert_eq!(run(&[1, 0], 1, 2, RetagSlot::Neighbor), [1, FACE]);
    }

    #[test]
    fn single_row_is_untouched() {
        assert_eq!(run(&[1, 0, 1, 1], 4, 1, RetagSlot::Current), [1, 0, 1, 1]);
    }

    #[test]
    fn later_neighbor_write_wins() {
        // Both walls target the open middle cell; the bottom wall comes last.
        assert_eq!(run(&[1, 0, 1], 1, 3, RetagSlot::Neighbor), [1, HALF, 1]);
    }

    #[test]
    fn reads_ignore_earlier_retags() {
        // The half-wall written at row 1 must not make row 2 look open.
        assert_eq!(run(&[0, 1, 1], 1, 3, RetagSlot::Current), [0, HALF, 1]);
        assert_eq!(run(&[1, 1, 0, 0], 2, 2, RetagSlot::Current), [FACE, FACE, 0, 0]);
    }

    #[test]
    fn retags_only_produce_known_ids() {
        let raw = [
            0, 1, 1, 0, 1, //
            1, 1, 0, 0, 1, //
            0, 0, 1, 1, 1, //
            1, 0, 1, 0, 0,
        ];
        for slot in [RetagSlot::Current, RetagSlot::Neighbor] {
            let out = run(&raw, 5, 4, slot);
            assert_eq!(out.len(), raw.len());
            for (before, after) in raw.iter().zip(&out) {
                assert!(before == after || *after == FACE || *after == HALF);
            }
        }
        // In the current slot only walls change.
        let out = run(&raw, 5, 4, RetagSlot::Current);
        for (before, after) in raw.iter().zip(&out) {
            if before != after {
                assert_eq!(*before, WALL);
            }
        }
    }
}
