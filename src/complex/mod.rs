pub mod cell;
pub mod collapse;
pub mod invariants;

pub use cell::{Axis, CellBits, CellKind, CUBE_CLOSURE};
pub use collapse::{CollapseRule, Direction, PairKind, COLLAPSE_RULES};

use crate::grid::{Grid3D, VoxelGrid};

/// Faces incident to a lattice point, as `(dx, dy, dz, face bit)` anchors.
const POINT_FACES: [(isize, isize, isize, CellBits); 12] = [
    (0, 0, 0, CellBits::XY_FACE),
    (-1, 0, 0, CellBits::XY_FACE),
    (0, -1, 0, CellBits::XY_FACE),
    (-1, -1, 0, CellBits::XY_FACE),
    (0, 0, 0, CellBits::YZ_FACE),
    (0, -1, 0, CellBits::YZ_FACE),
    (0, 0, -1, CellBits::YZ_FACE),
    (0, -1, -1, CellBits::YZ_FACE),
    (0, 0, 0, CellBits::XZ_FACE),
    (-1, 0, 0, CellBits::XZ_FACE),
    (0, 0, -1, CellBits::XZ_FACE),
    (-1, 0, -1, CellBits::XZ_FACE),
];

/// Faces covering an X edge.
const X_EDGE_COFACES: [(isize, isize, isize, CellBits); 4] = [
    (0, 0, 0, CellBits::XY_FACE),
    (0, -1, 0, CellBits::XY_FACE),
    (0, 0, 0, CellBits::XZ_FACE),
    (0, 0, -1, CellBits::XZ_FACE),
];

/// Faces covering a Y edge.
const Y_EDGE_COFACES: [(isize, isize, isize, CellBits); 4] = [
    (0, 0, 0, CellBits::XY_FACE),
    (-1, 0, 0, CellBits::XY_FACE),
    (0, 0, 0, CellBits::YZ_FACE),
    (0, 0, -1, CellBits::YZ_FACE),
];

/// Faces covering a Z edge.
const Z_EDGE_COFACES: [(isize, isize, isize, CellBits); 4] = [
    (0, 0, 0, CellBits::YZ_FACE),
    (0, -1, 0, CellBits::YZ_FACE),
    (0, 0, 0, CellBits::XZ_FACE),
    (-1, 0, 0, CellBits::XZ_FACE),
];

/// Cubical complex over the lattice of a voxel grid.
///
/// Lattice dimensions are the voxel dimensions plus one along each axis.
/// The byte at lattice point `(x, y, z)` records which of the eight cells
/// anchored there exist. Building from an occupancy grid yields a
/// closure-complete complex (every face of every present cell is present),
/// and free-pair collapse keeps it that way, so out-of-lattice reads may
/// simply report "empty".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubicalComplex {
    cells: Grid3D<CellBits>,
}

impl CubicalComplex {
    /// Builds the closure of every selected voxel cube.
    ///
    /// `complement = false` selects the occupied voxels, `complement = true`
    /// the unoccupied ones (the cavity of the object).
    #[must_use]
    pub fn build(voxels: &VoxelGrid, complement: bool) -> Self {
        let mut cells = Grid3D::new_fill(
            voxels.width() + 1,
            voxels.height() + 1,
            voxels.depth() + 1,
            CellBits::empty(),
        );
        for z in 0..voxels.depth() {
            for y in 0..voxels.height() {
                for x in 0..voxels.width() {
                    if voxels.is_occupied(x, y, z) != complement {
                        for &(dx, dy, dz, bits) in &CUBE_CLOSURE {
                            cells[(x + dx, y + dy, z + dz)].insert(bits);
                        }
                    }
                }
            }
        }
        Self { cells }
    }

    /// Lattice width (voxel grid width + 1).
    #[must_use]
    pub fn width(&self) -> usize {
        self.cells.width()
    }

    /// Lattice height (voxel grid height + 1).
    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.height()
    }

    /// Lattice depth (voxel grid depth + 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.cells.depth()
    }

    /// Number of lattice points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat offset of a lattice point, in raster order.
    #[must_use]
    pub fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        self.cells.offset(x, y, z)
    }

    /// Lattice coordinates of a flat offset.
    #[must_use]
    pub fn coords(&self, offset: usize) -> (usize, usize, usize) {
        self.cells.coords(offset)
    }

    /// Existence mask at a lattice point.
    ///
    /// # Panics
    /// Panics when the point is outside the lattice.
    #[must_use]
    pub fn bits(&self, x: usize, y: usize, z: usize) -> CellBits {
        self.cells[(x, y, z)]
    }

    /// Existence mask with signed coordinates; outside the lattice is empty.
    #[must_use]
    pub fn bits_signed(&self, x: isize, y: isize, z: isize) -> CellBits {
        self.cells.get_signed(x, y, z).copied().unwrap_or_default()
    }

    /// True when the cell of `kind` anchored at `(x, y, z)` is present.
    #[must_use]
    pub fn contains_cell(&self, x: usize, y: usize, z: usize, kind: CellKind) -> bool {
        self.cells[(x, y, z)].contains(kind.bit())
    }

    /// Number of present cells of one kind.
    #[must_use]
    pub fn cell_count(&self, kind: CellKind) -> usize {
        let bit = kind.bit();
        self.cells.data().iter().filter(|b| b.contains(bit)).count()
    }

    /// True when the edge along `axis` at `(x, y, z)` is covered by a face.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn edge_has_coface(&self, x: usize, y: usize, z: usize, axis: Axis) -> bool {
        let cofaces = match axis {
            Axis::X => &X_EDGE_COFACES,
            Axis::Y => &Y_EDGE_COFACES,
            Axis::Z => &Z_EDGE_COFACES,
        };
        cofaces.iter().any(|&(dx, dy, dz, bit)| {
            self.bits_signed(x as isize + dx, y as isize + dy, z as isize + dz)
                .contains(bit)
        })
    }

    /// True when the lattice point at `(x, y, z)` lies on a present face.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn point_touches_face(&self, x: usize, y: usize, z: usize) -> bool {
        POINT_FACES.iter().any(|&(dx, dy, dz, bit)| {
            self.bits_signed(x as isize + dx, y as isize + dy, z as isize + dz)
                .contains(bit)
        })
    }

    pub(crate) fn insert_bits(&mut self, x: usize, y: usize, z: usize, bits: CellBits) {
        self.cells[(x, y, z)].insert(bits);
    }

    pub(crate) fn remove_bits(&mut self, x: usize, y: usize, z: usize, bits: CellBits) {
        self.cells[(x, y, z)].remove(bits);
    }
}
