use crate::complex::{Axis, CubicalComplex};
use crate::grid::Grid3D;

const UNBORN: u32 = u32::MAX;

/// Per-edge record of the first iteration an edge was exposed.
///
/// An edge is exposed when it exists without a covering face. The record is
/// write-once: later iterations never move a birth, and an edge removed in
/// the same iteration it was exposed is never recorded at all.
#[derive(Debug)]
pub(crate) struct BirthMap {
    births: Grid3D<[u32; 3]>,
}

impl BirthMap {
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            births: Grid3D::new_fill(width, height, depth, [UNBORN; 3]),
        }
    }

    /// Birth iteration of the edge along `axis` at `(x, y, z)`, if exposed.
    pub fn get(&self, x: usize, y: usize, z: usize, axis: Axis) -> Option<u32> {
        let birth = self.births[(x, y, z)][axis.index()];
        (birth != UNBORN).then_some(birth)
    }

    /// Stamps `iteration` on every candidate edge that is present and bare.
    ///
    /// Candidates must cover the anchors of all faces removed during the
    /// iteration; edges elsewhere cannot have lost a coface.
    pub fn update(&mut self, complex: &CubicalComplex, candidates: &[usize], iteration: u32) {
        for &offset in candidates {
            let (x, y, z) = complex.coords(offset);
            for axis in Axis::ALL {
                if self.births[(x, y, z)][axis.index()] != UNBORN {
                    continue;
                }
                if complex.contains_cell(x, y, z, axis.edge_kind())
                    && !complex.edge_has_coface(x, y, z, axis)
                {
                    self.births[(x, y, z)][axis.index()] = iteration;
                }
            }
        }
    }
}
