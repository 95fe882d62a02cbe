//! Shape tables - tetromino layouts and the SRS rotation data
//!
//! Everything a piece needs to know about its kind lives here as immutable
//! static data: block offsets per rotation state, wall-kick test sequences,
//! the coupling graph used for sprite connectivity, and a palette id.
//! Reference: https://tetris.wiki/SRS
//!
//! Offsets are `(col, row)` within the shape's bounding box with row 0 at the
//! bottom; block index 0 is the pivot. A malformed table is a construction
//! bug, not a runtime condition: [`validate`] checks every table once and
//! panics on the first inconsistency.

use blockfall_types::{RotationDir, RotationState, ShapeKind};

/// Offset of a single block relative to the piece origin.
pub type BlockOffset = (i8, i8);

/// One rotation state of a shape - 4 block offsets, pivot first.
pub type ShapeLayout = [BlockOffset; 4];

/// A wall-kick test sequence: 5 candidate global offsets, `(0, 0)` first.
pub type KickSequence = [(i8, i8); 5];

/// Kick table indexed by `from_state * 2 + direction` (0 = CW, 1 = CCW).
pub type KickTable = [KickSequence; 8];

/// Get the block offsets for a shape kind in a rotation state.
pub fn layout(kind: ShapeKind, state: RotationState) -> ShapeLayout {
    match kind {
        ShapeKind::I => I_LAYOUTS[state.index()],
        ShapeKind::J => J_LAYOUTS[state.index()],
        ShapeKind::L => L_LAYOUTS[state.index()],
        ShapeKind::O => O_LAYOUTS[state.index()],
        ShapeKind::S => S_LAYOUTS[state.index()],
        ShapeKind::T => T_LAYOUTS[state.index()],
        ShapeKind::Z => Z_LAYOUTS[state.index()],
    }
}

/// Per-block deltas that carry a shape from `state` to the next state in
/// `dir`, before any wall-kick offset is applied.
pub fn rotation_deltas(kind: ShapeKind, state: RotationState, dir: RotationDir) -> [(i8, i8); 4] {
    let next = match dir {
        RotationDir::Cw => state.cw(),
        RotationDir::Ccw => state.ccw(),
    };
    let from = layout(kind, state);
    let to = layout(kind, next);

    let mut deltas = [(0i8, 0i8); 4];
    for i in 0..4 {
        deltas[i] = (to[i].0 - from[i].0, to[i].1 - from[i].1);
    }
    deltas
}

/// Get the kick test sequence for a transition out of `state` in `dir`.
pub fn kick_sequence(kind: ShapeKind, state: RotationState, dir: RotationDir) -> &'static KickSequence {
    let table: &'static KickTable = match kind {
        ShapeKind::I => &I_KICKS,
        ShapeKind::O => &O_KICKS,
        _ => &JLSTZ_KICKS,
    };
    let dir_index = match dir {
        RotationDir::Cw => 0,
        RotationDir::Ccw => 1,
    };
    &table[state.index() * 2 + dir_index]
}

/// Block-index pairs that are cardinally adjacent within the shape.
///
/// Adjacency is rotation-invariant for a rigid body, so a single list per
/// kind covers all states. Used to derive the connectivity bitmask.
pub fn coupling_pairs(kind: ShapeKind) -> &'static [(usize, usize)] {
    match kind {
        ShapeKind::I => &[(0, 1), (0, 2), (2, 3)],
        ShapeKind::J => &[(0, 1), (0, 2), (1, 3)],
        ShapeKind::L => &[(0, 1), (0, 2), (2, 3)],
        ShapeKind::O => &[(0, 1), (0, 2), (1, 3), (2, 3)],
        ShapeKind::S => &[(0, 1), (0, 2), (2, 3)],
        ShapeKind::T => &[(0, 1), (0, 2), (0, 3)],
        ShapeKind::Z => &[(0, 1), (0, 2), (2, 3)],
    }
}

/// Palette index for the renderer (1..=7; 0 is reserved for empty cells).
pub fn color_id(kind: ShapeKind) -> u8 {
    kind.index() as u8 + 1
}

/// I piece: 4x4 box, horizontal on row 2 at spawn.
const I_LAYOUTS: [ShapeLayout; 4] = [
    [(1, 2), (0, 2), (2, 2), (3, 2)],
    [(2, 2), (2, 3), (2, 1), (2, 0)],
    [(2, 1), (3, 1), (1, 1), (0, 1)],
    [(1, 1), (1, 0), (1, 2), (1, 3)],
];

/// J piece: corner block above the left end of the bar.
const J_LAYOUTS: [ShapeLayout; 4] = [
    [(1, 1), (0, 1), (2, 1), (0, 2)],
    [(1, 1), (1, 2), (1, 0), (2, 2)],
    [(1, 1), (2, 1), (0, 1), (2, 0)],
    [(1, 1), (1, 0), (1, 2), (0, 0)],
];

/// L piece: corner block above the right end of the bar.
const L_LAYOUTS: [ShapeLayout; 4] = [
    [(1, 1), (0, 1), (2, 1), (2, 2)],
    [(1, 1), (1, 2), (1, 0), (2, 0)],
    [(1, 1), (2, 1), (0, 1), (0, 0)],
    [(1, 1), (1, 0), (1, 2), (0, 2)],
];

/// O piece: identical in every state (its kick table is all zeros).
const O_LAYOUTS: [ShapeLayout; 4] = [
    [(1, 1), (2, 1), (1, 2), (2, 2)],
    [(1, 1), (2, 1), (1, 2), (2, 2)],
    [(1, 1), (2, 1), (1, 2), (2, 2)],
    [(1, 1), (2, 1), (1, 2), (2, 2)],
];

/// S piece: upper pair sits right of the lower pair.
const S_LAYOUTS: [ShapeLayout; 4] = [
    [(1, 1), (0, 1), (1, 2), (2, 2)],
    [(1, 1), (1, 2), (2, 1), (2, 0)],
    [(1, 1), (2, 1), (1, 0), (0, 0)],
    [(1, 1), (1, 0), (0, 1), (0, 2)],
];

/// T piece: nub points up at spawn.
const T_LAYOUTS: [ShapeLayout; 4] = [
    [(1, 1), (0, 1), (2, 1), (1, 2)],
    [(1, 1), (1, 2), (1, 0), (2, 1)],
    [(1, 1), (2, 1), (0, 1), (1, 0)],
    [(1, 1), (1, 0), (1, 2), (0, 1)],
];

/// Z piece: upper pair sits left of the lower pair.
const Z_LAYOUTS: [ShapeLayout; 4] = [
    [(1, 1), (2, 1), (1, 2), (0, 2)],
    [(1, 1), (1, 0), (2, 1), (2, 2)],
    [(1, 1), (0, 1), (1, 0), (2, 0)],
    [(1, 1), (1, 2), (0, 1), (0, 0)],
];

/// JLSTZ kick table (shared by J, L, S, T, Z), row-up orientation.
const JLSTZ_KICKS: KickTable = [
    // 0 -> 1 (CW)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0 -> 3 (CCW)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1 -> 2 (CW)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1 -> 0 (CCW)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2 -> 3 (CW)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 2 -> 1 (CCW)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 3 -> 0 (CW)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3 -> 2 (CCW)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// I piece kick table (distinct from JLSTZ).
const I_KICKS: KickTable = [
    // 0 -> 1 (CW)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 0 -> 3 (CCW)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 1 -> 2 (CW)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 1 -> 0 (CCW)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 2 -> 3 (CW)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 2 -> 1 (CCW)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 3 -> 0 (CW)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 3 -> 2 (CCW)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
];

/// O piece never displaces on rotation.
const O_KICKS: KickTable = [[(0, 0); 5]; 8];

/// Validate every static table once at startup.
///
/// Panics on the first inconsistency: these tables are construction-time
/// data, and a malformed entry is a bug that no runtime guard should paper
/// over.
pub fn validate() {
    for kind in ShapeKind::ALL {
        for state in [
            RotationState::R0,
            RotationState::R1,
            RotationState::R2,
            RotationState::R3,
        ] {
            let cells = layout(kind, state);
            let box_size: i8 = if kind == ShapeKind::I { 4 } else { 3 };

            for (i, &(c, r)) in cells.iter().enumerate() {
                assert!(
                    c >= 0 && c < box_size && r >= 0 && r < box_size,
                    "shape {:?} state {:?} block {} offset ({}, {}) escapes its box",
                    kind,
                    state,
                    i,
                    c,
                    r
                );
            }
            for i in 0..4 {
                for j in (i + 1)..4 {
                    assert_ne!(
                        cells[i], cells[j],
                        "shape {:?} state {:?} has overlapping blocks {} and {}",
                        kind, state, i, j
                    );
                }
            }

            // Coupled pairs must actually touch in every state.
            for &(a, b) in coupling_pairs(kind) {
                assert!(a < 4 && b < 4, "shape {:?} couples an invalid block index", kind);
                let dc = (cells[a].0 - cells[b].0).abs();
                let dr = (cells[a].1 - cells[b].1).abs();
                assert_eq!(
                    dc + dr,
                    1,
                    "shape {:?} state {:?} coupling ({}, {}) is not cardinally adjacent",
                    kind,
                    state,
                    a,
                    b
                );
            }
        }
    }
}
