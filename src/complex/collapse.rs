use super::cell::{Axis, CellBits};
use super::CubicalComplex;

/// One of the six thinning directions, in pass order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    XNeg,
    XPos,
    YNeg,
    YPos,
    ZNeg,
    ZPos,
}

impl Direction {
    pub const ALL: [Self; 6] = [
        Self::XNeg,
        Self::XPos,
        Self::YNeg,
        Self::YPos,
        Self::ZNeg,
        Self::ZPos,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::XNeg => 0,
            Self::XPos => 1,
            Self::YNeg => 2,
            Self::YPos => 3,
            Self::ZNeg => 4,
            Self::ZPos => 5,
        }
    }

    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Self::XNeg | Self::XPos => Axis::X,
            Self::YNeg | Self::YPos => Axis::Y,
            Self::ZNeg | Self::ZPos => Axis::Z,
        }
    }

    /// The four collapse rules of this direction, in priority order.
    #[must_use]
    pub fn rules(self) -> &'static [CollapseRule; 4] {
        &COLLAPSE_RULES[self.index()]
    }
}

/// Dimension class of a collapsible pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    /// A cube and one of its side faces.
    CubeFace,
    /// A face and one of its boundary edges.
    FaceEdge,
    /// An edge and one of its endpoints.
    EdgePoint,
}

/// One directional collapse rule, anchored at a lattice point.
///
/// The rule fires at origin `(x, y, z)` when `top` is present at the origin,
/// `face` is present at `face_offset`, and every cell of the `absent` list
/// is missing. The absent list enumerates the other cells one dimension
/// above `face` that could cover it; in a closure-complete complex their
/// absence already rules out higher-dimensional covers, so the pair
/// `(top, face)` is free and removing both is an elementary collapse.
#[derive(Debug)]
pub struct CollapseRule {
    pub direction: Direction,
    pub kind: PairKind,
    /// Cell removed together with its free face, anchored at the origin.
    pub top: CellBits,
    /// Anchor of the free face, relative to the origin.
    pub face_offset: (isize, isize, isize),
    /// The free face's existence bit.
    pub face: CellBits,
    /// Cells that must be absent for the face to be free.
    pub absent: &'static [(isize, isize, isize, CellBits)],
}

/// The 24 collapse rules, grouped by direction in pass order.
///
/// Per direction the priority is cube pair, then the two face pairs, then
/// the edge pair. The free face always sits on the side of the top cell the
/// direction points away from, so a pass peels the object from that side.
pub static COLLAPSE_RULES: [[CollapseRule; 4]; 6] = [
    // -X
    [
        CollapseRule {
            direction: Direction::XNeg,
            kind: PairKind::CubeFace,
            top: CellBits::CUBE,
            face_offset: (0, 0, 0),
            face: CellBits::YZ_FACE,
            absent: &[(-1, 0, 0, CellBits::CUBE)],
        },
        CollapseRule {
            direction: Direction::XNeg,
            kind: PairKind::FaceEdge,
            top: CellBits::XY_FACE,
            face_offset: (0, 0, 0),
            face: CellBits::Y_EDGE,
            absent: &[
                (-1, 0, 0, CellBits::XY_FACE),
                (0, 0, 0, CellBits::YZ_FACE),
                (0, 0, -1, CellBits::YZ_FACE),
            ],
        },
        CollapseRule {
            direction: Direction::XNeg,
            kind: PairKind::FaceEdge,
            top: CellBits::XZ_FACE,
            face_offset: (0, 0, 0),
            face: CellBits::Z_EDGE,
            absent: &[
                (-1, 0, 0, CellBits::XZ_FACE),
                (0, 0, 0, CellBits::YZ_FACE),
                (0, -1, 0, CellBits::YZ_FACE),
            ],
        },
        CollapseRule {
            direction: Direction::XNeg,
            kind: PairKind::EdgePoint,
            top: CellBits::X_EDGE,
            face_offset: (0, 0, 0),
            face: CellBits::POINT,
            absent: &[
                (-1, 0, 0, CellBits::X_EDGE),
                (0, -1, 0, CellBits::Y_EDGE),
                (0, 0, 0, CellBits::Y_EDGE),
                (0, 0, -1, CellBits::Z_EDGE),
                (0, 0, 0, CellBits::Z_EDGE),
            ],
        },
    ],
    // +X
    [
        CollapseRule {
            direction: Direction::XPos,
            kind: PairKind::CubeFace,
            top: CellBits::CUBE,
            face_offset: (1, 0, 0),
            face: CellBits::YZ_FACE,
            absent: &[(1, 0, 0, CellBits::CUBE)],
        },
        CollapseRule {
            direction: Direction::XPos,
            kind: PairKind::FaceEdge,
            top: CellBits::XY_FACE,
            face_offset: (1, 0, 0),
            face: CellBits::Y_EDGE,
            absent: &[
                (1, 0, 0, CellBits::XY_FACE),
                (1, 0, 0, CellBits::YZ_FACE),
                (1, 0, -1, CellBits::YZ_FACE),
            ],
        },
        CollapseRule {
            direction: Direction::XPos,
            kind: PairKind::FaceEdge,
            top: CellBits::XZ_FACE,
            face_offset: (1, 0, 0),
            face: CellBits::Z_EDGE,
            absent: &[
                (1, 0, 0, CellBits::XZ_FACE),
                (1, 0, 0, CellBits::YZ_FACE),
                (1, -1, 0, CellBits::YZ_FACE),
            ],
        },
        CollapseRule {
            direction: Direction::XPos,
            kind: PairKind::EdgePoint,
            top: CellBits::X_EDGE,
            face_offset: (1, 0, 0),
            face: CellBits::POINT,
            absent: &[
                (1, 0, 0, CellBits::X_EDGE),
                (1, -1, 0, CellBits::Y_EDGE),
                (1, 0, 0, CellBits::Y_EDGE),
                (1, 0, -1, CellBits::Z_EDGE),
                (1, 0, 0, CellBits::Z_EDGE),
            ],
        },
    ],
    // -Y
    [
        CollapseRule {
            direction: Direction::YNeg,
            kind: PairKind::CubeFace,
            top: CellBits::CUBE,
            face_offset: (0, 0, 0),
            face: CellBits::XZ_FACE,
            absent: &[(0, -1, 0, CellBits::CUBE)],
        },
        CollapseRule {
            direction: Direction::YNeg,
            kind: PairKind::FaceEdge,
            top: CellBits::XY_FACE,
            face_offset: (0, 0, 0),
            face: CellBits::X_EDGE,
            absent: &[
                (0, -1, 0, CellBits::XY_FACE),
                (0, 0, 0, CellBits::XZ_FACE),
                (0, 0, -1, CellBits::XZ_FACE),
            ],
        },
        CollapseRule {
            direction: Direction::YNeg,
            kind: PairKind::FaceEdge,
            top: CellBits::YZ_FACE,
            face_offset: (0, 0, 0),
            face: CellBits::Z_EDGE,
            absent: &[
                (0, -1, 0, CellBits::YZ_FACE),
                (0, 0, 0, CellBits::XZ_FACE),
                (-1, 0, 0, CellBits::XZ_FACE),
            ],
        },
        CollapseRule {
            direction: Direction::YNeg,
            kind: PairKind::EdgePoint,
            top: CellBits::Y_EDGE,
            face_offset: (0, 0, 0),
            face: CellBits::POINT,
            absent: &[
                (0, -1, 0, CellBits::Y_EDGE),
                (-1, 0, 0, CellBits::X_EDGE),
                (0, 0, 0, CellBits::X_EDGE),
                (0, 0, -1, CellBits::Z_EDGE),
                (0, 0, 0, CellBits::Z_EDGE),
            ],
        },
    ],
    // +Y
    [
        CollapseRule {
            direction: Direction::YPos,
            kind: PairKind::CubeFace,
            top: CellBits::CUBE,
            face_offset: (0, 1, 0),
            face: CellBits::XZ_FACE,
            absent: &[(0, 1, 0, CellBits::CUBE)],
        },
        CollapseRule {
            direction: Direction::YPos,
            kind: PairKind::FaceEdge,
            top: CellBits::XY_FACE,
            face_offset: (0, 1, 0),
            face: CellBits::X_EDGE,
            absent: &[
                (0, 1, 0, CellBits::XY_FACE),
                (0, 1, 0, CellBits::XZ_FACE),
                (0, 1, -1, CellBits::XZ_FACE),
            ],
        },
        CollapseRule {
            direction: Direction::YPos,
            kind: PairKind::FaceEdge,
            top: CellBits::YZ_FACE,
            face_offset: (0, 1, 0),
            face: CellBits::Z_EDGE,
            absent: &[
                (0, 1, 0, CellBits::YZ_FACE),
                (0, 1, 0, CellBits::XZ_FACE),
                (-1, 1, 0, CellBits::XZ_FACE),
            ],
        },
        CollapseRule {
            direction: Direction::YPos,
            kind: PairKind::EdgePoint,
            top: CellBits::Y_EDGE,
            face_offset: (0, 1, 0),
            face: CellBits::POINT,
            absent: &[
                (0, 1, 0, CellBits::Y_EDGE),
                (-1, 1, 0, CellBits::X_EDGE),
                (0, 1, 0, CellBits::X_EDGE),
                (0, 1, -1, CellBits::Z_EDGE),
                (0, 1, 0, CellBits::Z_EDGE),
            ],
        },
    ],
    // -Z
    [
        CollapseRule {
            direction: Direction::ZNeg,
            kind: PairKind::CubeFace,
            top: CellBits::CUBE,
            face_offset: (0, 0, 0),
            face: CellBits::XY_FACE,
            absent: &[(0, 0, -1, CellBits::CUBE)],
        },
        CollapseRule {
            direction: Direction::ZNeg,
            kind: PairKind::FaceEdge,
            top: CellBits::YZ_FACE,
            face_offset: (0, 0, 0),
            face: CellBits::Y_EDGE,
            absent: &[
                (0, 0, 0, CellBits::XY_FACE),
                (-1, 0, 0, CellBits::XY_FACE),
                (0, 0, -1, CellBits::YZ_FACE),
            ],
        },
        CollapseRule {
            direction: Direction::ZNeg,
            kind: PairKind::FaceEdge,
            top: CellBits::XZ_FACE,
            face_offset: (0, 0, 0),
            face: CellBits::X_EDGE,
            absent: &[
                (0, 0, 0, CellBits::XY_FACE),
                (0, -1, 0, CellBits::XY_FACE),
                (0, 0, -1, CellBits::XZ_FACE),
            ],
        },
        CollapseRule {
            direction: Direction::ZNeg,
            kind: PairKind::EdgePoint,
            top: CellBits::Z_EDGE,
            face_offset: (0, 0, 0),
            face: CellBits::POINT,
            absent: &[
                (0, 0, -1, CellBits::Z_EDGE),
                (-1, 0, 0, CellBits::X_EDGE),
                (0, 0, 0, CellBits::X_EDGE),
                (0, -1, 0, CellBits::Y_EDGE),
                (0, 0, 0, CellBits::Y_EDGE),
            ],
        },
    ],
    // +Z
    [
        CollapseRule {
            direction: Direction::ZPos,
            kind: PairKind::CubeFace,
            top: CellBits::CUBE,
            face_offset: (0, 0, 1),
            face: CellBits::XY_FACE,
            absent: &[(0, 0, 1, CellBits::CUBE)],
        },
        CollapseRule {
            direction: Direction::ZPos,
            kind: PairKind::FaceEdge,
            top: CellBits::YZ_FACE,
            face_offset: (0, 0, 1),
            face: CellBits::Y_EDGE,
            absent: &[
                (0, 0, 1, CellBits::XY_FACE),
                (-1, 0, 1, CellBits::XY_FACE),
                (0, 0, 1, CellBits::YZ_FACE),
            ],
        },
        CollapseRule {
            direction: Direction::ZPos,
            kind: PairKind::FaceEdge,
            top: CellBits::XZ_FACE,
            face_offset: (0, 0, 1),
            face: CellBits::X_EDGE,
            absent: &[
                (0, 0, 1, CellBits::XY_FACE),
                (0, -1, 1, CellBits::XY_FACE),
                (0, 0, 1, CellBits::XZ_FACE),
            ],
        },
        CollapseRule {
            direction: Direction::ZPos,
            kind: PairKind::EdgePoint,
            top: CellBits::Z_EDGE,
            face_offset: (0, 0, 1),
            face: CellBits::POINT,
            absent: &[
                (0, 0, 1, CellBits::Z_EDGE),
                (-1, 0, 1, CellBits::X_EDGE),
                (0, 0, 1, CellBits::X_EDGE),
                (0, -1, 1, CellBits::Y_EDGE),
                (0, 0, 1, CellBits::Y_EDGE),
            ],
        },
    ],
];

impl CubicalComplex {
    /// True when `rule` applies at the lattice origin `(x, y, z)`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn is_free(&self, rule: &CollapseRule, x: usize, y: usize, z: usize) -> bool {
        if !self.bits(x, y, z).contains(rule.top) {
            return false;
        }
        let (ox, oy, oz) = (x as isize, y as isize, z as isize);
        let (fx, fy, fz) = rule.face_offset;
        if !self.bits_signed(ox + fx, oy + fy, oz + fz).contains(rule.face) {
            return false;
        }
        rule.absent.iter().all(|&(ax, ay, az, bits)| {
            !self.bits_signed(ox + ax, oy + ay, oz + az).intersects(bits)
        })
    }

    /// Removes the free pair of `rule` anchored at `(x, y, z)`.
    ///
    /// # Panics
    /// In debug builds, panics when the pair is not free.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn collapse(&mut self, rule: &CollapseRule, x: usize, y: usize, z: usize) {
        debug_assert!(
            self.is_free(rule, x, y, z),
            "collapse of a non-free {:?} pair at ({x}, {y}, {z})",
            rule.kind
        );
        self.remove_bits(x, y, z, rule.top);
        let (fx, fy, fz) = rule.face_offset;
        self.remove_bits(
            (x as isize + fx) as usize,
            (y as isize + fy) as usize,
            (z as isize + fz) as usize,
            rule.face,
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::cell::{CellKind, CUBE_CLOSURE};
    use super::*;
    use crate::grid::VoxelGrid;

    /// Cells of the closure of one cell, as `(dx, dy, dz, bits)` anchors.
    fn closure_entries(kind: CellKind) -> Vec<(usize, usize, usize, CellBits)> {
        let p = CellBits::POINT;
        match kind {
            CellKind::Point => vec![(0, 0, 0, p)],
            CellKind::XEdge => vec![(0, 0, 0, p | CellBits::X_EDGE), (1, 0, 0, p)],
            CellKind::YEdge => vec![(0, 0, 0, p | CellBits::Y_EDGE), (0, 1, 0, p)],
            CellKind::ZEdge => vec![(0, 0, 0, p | CellBits::Z_EDGE), (0, 0, 1, p)],
            CellKind::XyFace => vec![
                (0, 0, 0, p | CellBits::X_EDGE | CellBits::Y_EDGE | CellBits::XY_FACE),
                (1, 0, 0, p | CellBits::Y_EDGE),
                (0, 1, 0, p | CellBits::X_EDGE),
                (1, 1, 0, p),
            ],
            CellKind::YzFace => vec![
                (0, 0, 0, p | CellBits::Y_EDGE | CellBits::Z_EDGE | CellBits::YZ_FACE),
                (0, 1, 0, p | CellBits::Z_EDGE),
                (0, 0, 1, p | CellBits::Y_EDGE),
                (0, 1, 1, p),
            ],
            CellKind::XzFace => vec![
                (0, 0, 0, p | CellBits::X_EDGE | CellBits::Z_EDGE | CellBits::XZ_FACE),
                (1, 0, 0, p | CellBits::Z_EDGE),
                (0, 0, 1, p | CellBits::X_EDGE),
                (1, 0, 1, p),
            ],
            CellKind::Cube => CUBE_CLOSURE
                .iter()
                .map(|&(dx, dy, dz, bits)| (dx, dy, dz, bits))
                .collect(),
        }
    }

    fn insert_closed_cell(complex: &mut CubicalComplex, x: usize, y: usize, z: usize, kind: CellKind) {
        for (dx, dy, dz, bits) in closure_entries(kind) {
            complex.insert_bits(x + dx, y + dy, z + dz, bits);
        }
    }

    fn kind_of_bit(bit: CellBits) -> CellKind {
        *CellKind::ALL
            .iter()
            .find(|kind| kind.bit() == bit)
            .unwrap()
    }

    fn total_cells(complex: &CubicalComplex) -> usize {
        CellKind::ALL
            .iter()
            .map(|&kind| complex.cell_count(kind))
            .sum()
    }

    #[test]
    fn every_rule_fires_on_the_closure_of_its_top() {
        for direction in Direction::ALL {
            for rule in direction.rules() {
                let voxels = VoxelGrid::new(4, 4, 4);
                let mut complex = CubicalComplex::build(&voxels, false);
                insert_closed_cell(&mut complex, 2, 2, 2, kind_of_bit(rule.top));

                assert!(
                    complex.is_free(rule, 2, 2, 2),
                    "{direction:?} {:?} rule blocked on a lone closed cell",
                    rule.kind
                );

                let before = total_cells(&complex);
                assert_eq!(complex.euler_characteristic(), 1);
                complex.collapse(rule, 2, 2, 2);

                assert_eq!(total_cells(&complex), before - 2);
                assert_eq!(
                    complex.euler_characteristic(),
                    1,
                    "{direction:?} {:?} rule changed the Euler characteristic",
                    rule.kind
                );
                assert!(!complex.bits(2, 2, 2).contains(rule.top));
            }
        }
    }

    #[test]
    fn collapses_preserve_closure() {
        for direction in Direction::ALL {
            for rule in direction.rules() {
                let voxels = VoxelGrid::new(4, 4, 4);
                let mut complex = CubicalComplex::build(&voxels, false);
                insert_closed_cell(&mut complex, 2, 2, 2, kind_of_bit(rule.top));
                complex.collapse(rule, 2, 2, 2);
                assert_closure_complete(&complex);
            }
        }
    }

    fn assert_closure_complete(complex: &CubicalComplex) {
        for z in 0..complex.depth() {
            for y in 0..complex.height() {
                for x in 0..complex.width() {
                    let bits = complex.bits(x, y, z);
                    for kind in CellKind::ALL {
                        if !bits.contains(kind.bit()) {
                            continue;
                        }
                        for (dx, dy, dz, required) in closure_entries(kind) {
                            assert!(
                                complex.bits(x + dx, y + dy, z + dz).contains(required),
                                "boundary of {kind:?} at ({x}, {y}, {z}) is incomplete"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn shared_face_blocks_the_cube_rule() {
        let voxels = VoxelGrid::from_fn(2, 1, 1, |_, _, _| true);
        let complex = CubicalComplex::build(&voxels, false);

        let x_neg_cube = &Direction::XNeg.rules()[0];
        let x_pos_cube = &Direction::XPos.rules()[0];

        // The YZ face between the two cubes covers both of them.
        assert!(complex.is_free(x_neg_cube, 0, 0, 0));
        assert!(!complex.is_free(x_neg_cube, 1, 0, 0));
        assert!(complex.is_free(x_pos_cube, 1, 0, 0));
        assert!(!complex.is_free(x_pos_cube, 0, 0, 0));
    }

    #[test]
    fn covered_edge_is_not_free() {
        let voxels = VoxelGrid::new(2, 2, 2);
        let mut complex = CubicalComplex::build(&voxels, false);
        insert_closed_cell(&mut complex, 0, 0, 0, CellKind::XyFace);

        // The X edge at the origin bounds the face, so its endpoint pair
        // is blocked until the face is gone.
        let x_neg_edge = &Direction::XNeg.rules()[3];
        assert!(!complex.is_free(x_neg_edge, 0, 0, 0));
    }

    #[test]
    fn rule_table_is_consistent() {
        for direction in Direction::ALL {
            let rules = direction.rules();
            assert_eq!(rules[0].kind, PairKind::CubeFace);
            assert_eq!(rules[1].kind, PairKind::FaceEdge);
            assert_eq!(rules[2].kind, PairKind::FaceEdge);
            assert_eq!(rules[3].kind, PairKind::EdgePoint);
            for rule in rules {
                assert_eq!(rule.direction, direction);
                // The free face anchor never moves against the axis grid.
                let (dx, dy, dz) = rule.face_offset;
                assert!((0..=1).contains(&dx));
                assert!((0..=1).contains(&dy));
                assert!((0..=1).contains(&dz));
                // Edge rules remove the top edge along the pass axis.
                if rule.kind == PairKind::EdgePoint {
                    assert_eq!(rule.top, direction.axis().edge_kind().bit());
                }
            }
        }
    }
}
