use bitvec::vec::BitVec;

use super::cell::{CellBits, CellKind};
use super::CubicalComplex;

/// Cell linking two lattice points one step apart in direction
/// `(dx, dy, dz)`; the cell is anchored at the componentwise minimum.
fn linking_bit(dx: isize, dy: isize, dz: isize) -> CellBits {
    match (dx != 0, dy != 0, dz != 0) {
        (true, false, false) => CellBits::X_EDGE,
        (false, true, false) => CellBits::Y_EDGE,
        (false, false, true) => CellBits::Z_EDGE,
        (true, true, false) => CellBits::XY_FACE,
        (false, true, true) => CellBits::YZ_FACE,
        (true, false, true) => CellBits::XZ_FACE,
        (true, true, true) => CellBits::CUBE,
        (false, false, false) => CellBits::empty(),
    }
}

impl CubicalComplex {
    /// Euler characteristic: points minus edges plus faces minus cubes.
    ///
    /// Free-pair collapse removes one cell of dimension `d` and one of
    /// dimension `d - 1`, so a correct thinning run leaves this unchanged.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn euler_characteristic(&self) -> i64 {
        let mut sum = 0i64;
        for kind in CellKind::ALL {
            let count = self.cell_count(kind) as i64;
            if kind.dimension() % 2 == 0 {
                sum += count;
            } else {
                sum -= count;
            }
        }
        sum
    }

    /// Number of connected components of the complex.
    ///
    /// Two present points are adjacent when a present cell contains both:
    /// an edge for axis steps, a face for two-axis diagonals, a cube for
    /// three-axis diagonals, the cell anchored at the minimum corner of the
    /// step. Flood fill runs on an explicit stack with a bit-per-point
    /// visited set.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn connected_components(&self) -> usize {
        let mut visited: BitVec = BitVec::repeat(false, self.len());
        let mut stack: Vec<usize> = Vec::new();
        let mut components = 0;

        for start in 0..self.len() {
            if visited[start] {
                continue;
            }
            let (sx, sy, sz) = self.coords(start);
            if !self.bits(sx, sy, sz).contains(CellBits::POINT) {
                continue;
            }

            components += 1;
            visited.set(start, true);
            stack.push(start);

            while let Some(offset) = stack.pop() {
                let (x, y, z) = self.coords(offset);
                let (x, y, z) = (x as isize, y as isize, z as isize);
                for dz in -1..=1 {
                    for dy in -1..=1 {
                        for dx in -1..=1isize {
                            if dx == 0 && dy == 0 && dz == 0 {
                                continue;
                            }
                            let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                            if !self.bits_signed(nx, ny, nz).contains(CellBits::POINT) {
                                continue;
                            }
                            let anchor = (x + dx.min(0), y + dy.min(0), z + dz.min(0));
                            if !self
                                .bits_signed(anchor.0, anchor.1, anchor.2)
                                .contains(linking_bit(dx, dy, dz))
                            {
                                continue;
                            }
                            let neighbor =
                                self.offset(nx as usize, ny as usize, nz as usize);
                            if !visited[neighbor] {
                                visited.set(neighbor, true);
                                stack.push(neighbor);
                            }
                        }
                    }
                }
            }
        }

        components
    }
}
