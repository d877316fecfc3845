pub mod voxel;

pub use voxel::VoxelGrid;

use std::ops::{Index, IndexMut};

use crate::error::GridError;

/// Dense row-major 3D array owning a flat buffer.
///
/// Element `(x, y, z)` lives at flat offset `x + y * width + z * width * height`,
/// so scanning the buffer front to back visits cells in raster order
/// (x fastest, z slowest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid3D<T> {
    width: usize,
    height: usize,
    depth: usize,
    data: Vec<T>,
}

impl<T> Grid3D<T> {
    /// Builds a grid from an existing flat buffer.
    ///
    /// # Errors
    /// Returns [`GridError::DimensionOverflow`] when `width * height * depth`
    /// does not fit in `usize`, and [`GridError::SizeMismatch`] when the
    /// buffer length differs from that product.
    pub fn from_vec(
        width: usize,
        height: usize,
        depth: usize,
        data: Vec<T>,
    ) -> Result<Self, GridError> {
        let expected = checked_volume(width, height, depth).ok_or(GridError::DimensionOverflow {
            width,
            height,
            depth,
        })?;

        if data.len() != expected {
            return Err(GridError::SizeMismatch {
                width,
                height,
                depth,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            depth,
            data,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Flat offset of `(x, y, z)`. Does not check bounds.
    #[must_use]
    pub fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.width + z * self.width * self.height
    }

    /// Inverse of [`offset`](Self::offset).
    #[must_use]
    pub fn coords(&self, offset: usize) -> (usize, usize, usize) {
        let layer = self.width * self.height;
        (
            offset % self.width,
            (offset / self.width) % self.height,
            offset / layer,
        )
    }

    /// True when the signed coordinates fall inside the grid.
    #[must_use]
    pub fn contains(&self, x: isize, y: isize, z: isize) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && (z as usize) < self.depth
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<&T> {
        if x >= self.width || y >= self.height || z >= self.depth {
            return None;
        }
        self.data.get(self.offset(x, y, z))
    }

    pub fn get_mut(&mut self, x: usize, y: usize, z: usize) -> Option<&mut T> {
        if x >= self.width || y >= self.height || z >= self.depth {
            return None;
        }
        let offset = self.offset(x, y, z);
        self.data.get_mut(offset)
    }

    /// Checked access with signed coordinates; anything outside is `None`.
    #[allow(clippy::cast_sign_loss)]
    pub fn get_signed(&self, x: isize, y: isize, z: isize) -> Option<&T> {
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        self.get(x as usize, y as usize, z as usize)
    }
}

impl<T: Clone> Grid3D<T> {
    /// Builds a grid with every cell set to `value`.
    ///
    /// # Panics
    /// Panics when `width * height * depth` overflows `usize`; grids near
    /// that size are unrepresentable anyway.
    #[must_use]
    pub fn new_fill(width: usize, height: usize, depth: usize, value: T) -> Self {
        let len = checked_volume(width, height, depth)
            .unwrap_or_else(|| panic!("grid size {width}x{height}x{depth} overflows usize"));
        Self {
            width,
            height,
            depth,
            data: vec![value; len],
        }
    }

    /// Overwrites every cell with `value`, keeping the allocation.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Index<(usize, usize, usize)> for Grid3D<T> {
    type Output = T;

    fn index(&self, (x, y, z): (usize, usize, usize)) -> &T {
        assert!(
            x < self.width && y < self.height && z < self.depth,
            "grid index ({x}, {y}, {z}) out of bounds"
        );
        &self.data[self.offset(x, y, z)]
    }
}

impl<T> IndexMut<(usize, usize, usize)> for Grid3D<T> {
    fn index_mut(&mut self, (x, y, z): (usize, usize, usize)) -> &mut T {
        assert!(
            x < self.width && y < self.height && z < self.depth,
            "grid index ({x}, {y}, {z}) out of bounds"
        );
        let offset = self.offset(x, y, z);
        &mut self.data[offset]
    }
}

fn checked_volume(width: usize, height: usize, depth: usize) -> Option<usize> {
    width.checked_mul(height)?.checked_mul(depth)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn offset_and_coords_round_trip() {
        let grid = Grid3D::new_fill(3, 4, 5, 0u32);
        for z in 0..5 {
            for y in 0..4 {
                for x in 0..3 {
                    let off = grid.offset(x, y, z);
                    assert_eq!(grid.coords(off), (x, y, z));
                }
            }
        }
    }

    #[test]
    fn raster_order_is_x_fastest() {
        let grid = Grid3D::new_fill(3, 2, 2, 0u8);
        assert_eq!(grid.offset(0, 0, 0), 0);
        assert_eq!(grid.offset(1, 0, 0), 1);
        assert_eq!(grid.offset(0, 1, 0), 3);
        assert_eq!(grid.offset(0, 0, 1), 6);
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        let result = Grid3D::from_vec(2, 2, 2, vec![0u8; 7]);
        assert!(matches!(
            result,
            Err(GridError::SizeMismatch {
                expected: 8,
                actual: 7,
                ..
            })
        ));
    }

    #[test]
    fn from_vec_accepts_exact_length() {
        let grid = Grid3D::from_vec(2, 3, 4, (0u32..24).collect()).unwrap();
        assert_eq!(grid[(1, 2, 3)], 23);
        assert_eq!(grid[(0, 0, 0)], 0);
    }

    #[test]
    fn get_signed_rejects_outside() {
        let grid = Grid3D::new_fill(2, 2, 2, 7u32);
        assert_eq!(grid.get_signed(-1, 0, 0), None);
        assert_eq!(grid.get_signed(0, 2, 0), None);
        assert_eq!(grid.get_signed(1, 1, 1), Some(&7));
    }

    #[test]
    fn index_mut_writes_through() {
        let mut grid = Grid3D::new_fill(2, 2, 2, 0u32);
        grid[(1, 0, 1)] = 42;
        assert_eq!(grid.get(1, 0, 1), Some(&42));
        assert_eq!(grid.data().iter().sum::<u32>(), 42);
    }

    #[test]
    fn contains_matches_bounds() {
        let grid = Grid3D::new_fill(2, 3, 4, ());
        assert!(grid.contains(0, 0, 0));
        assert!(grid.contains(1, 2, 3));
        assert!(!grid.contains(2, 0, 0));
        assert!(!grid.contains(0, -1, 0));
    }
}
