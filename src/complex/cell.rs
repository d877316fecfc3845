/// Existence mask for the eight cell kinds anchored at one lattice point.
///
/// A cell is anchored at its minimum corner: the X edge at `(x, y, z)` spans
/// to `(x + 1, y, z)`, the XY face spans the `x` and `y` axes, the cube spans
/// the full unit cube. One byte per lattice point encodes which of the eight
/// anchored cells currently exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellBits(u8);

bitflags::bitflags! {
    impl CellBits: u8 {
        /// The lattice point itself (0-cell).
        const POINT = 1 << 0;
        /// Edge along `+x` (1-cell).
        const X_EDGE = 1 << 1;
        /// Edge along `+y` (1-cell).
        const Y_EDGE = 1 << 2;
        /// Edge along `+z` (1-cell).
        const Z_EDGE = 1 << 3;
        /// Face spanning `+x` and `+y` (2-cell, normal `z`).
        const XY_FACE = 1 << 4;
        /// Face spanning `+y` and `+z` (2-cell, normal `x`).
        const YZ_FACE = 1 << 5;
        /// Face spanning `+x` and `+z` (2-cell, normal `y`).
        const XZ_FACE = 1 << 6;
        /// The unit cube (3-cell).
        const CUBE = 1 << 7;
    }
}

/// A coordinate axis of the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// The edge kind running along this axis.
    #[must_use]
    pub fn edge_kind(self) -> CellKind {
        match self {
            Self::X => CellKind::XEdge,
            Self::Y => CellKind::YEdge,
            Self::Z => CellKind::ZEdge,
        }
    }

    /// Unit step along the axis.
    #[must_use]
    pub fn unit(self) -> (usize, usize, usize) {
        match self {
            Self::X => (1, 0, 0),
            Self::Y => (0, 1, 0),
            Self::Z => (0, 0, 1),
        }
    }
}

/// One of the eight cell kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Point,
    XEdge,
    YEdge,
    ZEdge,
    XyFace,
    YzFace,
    XzFace,
    Cube,
}

impl CellKind {
    /// Every kind, in ascending dimension order.
    pub const ALL: [Self; 8] = [
        Self::Point,
        Self::XEdge,
        Self::YEdge,
        Self::ZEdge,
        Self::XyFace,
        Self::YzFace,
        Self::XzFace,
        Self::Cube,
    ];

    /// The existence bit of this kind.
    #[must_use]
    pub fn bit(self) -> CellBits {
        match self {
            Self::Point => CellBits::POINT,
            Self::XEdge => CellBits::X_EDGE,
            Self::YEdge => CellBits::Y_EDGE,
            Self::ZEdge => CellBits::Z_EDGE,
            Self::XyFace => CellBits::XY_FACE,
            Self::YzFace => CellBits::YZ_FACE,
            Self::XzFace => CellBits::XZ_FACE,
            Self::Cube => CellBits::CUBE,
        }
    }

    /// Topological dimension (0 for points through 3 for cubes).
    #[must_use]
    pub fn dimension(self) -> u32 {
        match self {
            Self::Point => 0,
            Self::XEdge | Self::YEdge | Self::ZEdge => 1,
            Self::XyFace | Self::YzFace | Self::XzFace => 2,
            Self::Cube => 3,
        }
    }
}

/// Closure of one cube, spread over its eight corners.
///
/// Entry `(dx, dy, dz, bits)` means: the cube anchored at `(x, y, z)`
/// contributes `bits` to the lattice point `(x + dx, y + dy, z + dz)`.
/// Only cells anchored at that corner appear in its entry, so OR-ing every
/// entry of every occupied cube builds a closure-complete complex.
pub const CUBE_CLOSURE: [(usize, usize, usize, CellBits); 8] = [
    (0, 0, 0, CellBits::all()),
    (
        1,
        0,
        0,
        CellBits::POINT
            .union(CellBits::Y_EDGE)
            .union(CellBits::Z_EDGE)
            .union(CellBits::YZ_FACE),
    ),
    (
        0,
        1,
        0,
        CellBits::POINT
            .union(CellBits::X_EDGE)
            .union(CellBits::Z_EDGE)
            .union(CellBits::XZ_FACE),
    ),
    (
        0,
        0,
        1,
        CellBits::POINT
            .union(CellBits::X_EDGE)
            .union(CellBits::Y_EDGE)
            .union(CellBits::XY_FACE),
    ),
    (1, 1, 0, CellBits::POINT.union(CellBits::Z_EDGE)),
    (1, 0, 1, CellBits::POINT.union(CellBits::Y_EDGE)),
    (0, 1, 1, CellBits::POINT.union(CellBits::X_EDGE)),
    (1, 1, 1, CellBits::POINT),
];
