use bitvec::vec::BitVec;

/// Binary occupancy grid with bit-packed storage.
///
/// One bit per voxel, raster layout as in [`Grid3D`](super::Grid3D). This is
/// the read-only input of the skeletonization pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    width: usize,
    height: usize,
    depth: usize,
    bits: BitVec,
}

impl VoxelGrid {
    /// Creates an empty grid with every voxel unoccupied.
    #[must_use]
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
            bits: BitVec::repeat(false, width * height * depth),
        }
    }

    /// Creates a grid by evaluating `occupied` at every voxel coordinate.
    #[must_use]
    pub fn from_fn<F>(width: usize, height: usize, depth: usize, mut occupied: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> bool,
    {
        let mut grid = Self::new(width, height, depth);
        for z in 0..depth {
            for y in 0..height {
                for x in 0..width {
                    if occupied(x, y, z) {
                        let offset = grid.offset(x, y, z);
                        grid.bits.set(offset, true);
                    }
                }
            }
        }
        grid
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

    /// Flat offset of `(x, y, z)`. Does not check bounds.
    #[must_use]
    pub fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.width + z * self.width * self.height
    }

    /// Occupancy at `(x, y, z)`.
    ///
    /// # Panics
    /// Panics when the coordinates are out of bounds; use
    /// [`is_occupied_signed`](Self::is_occupied_signed) for neighbor probes.
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize, z: usize) -> bool {
        assert!(
            x < self.width && y < self.height && z < self.depth,
            "voxel index ({x}, {y}, {z}) out of bounds"
        );
        self.bits[self.offset(x, y, z)]
    }

    /// Occupancy probe with signed coordinates; everything outside is free.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn is_occupied_signed(&self, x: isize, y: isize, z: isize) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && (z as usize) < self.depth
            && self.bits[self.offset(x as usize, y as usize, z as usize)]
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, occupied: bool) {
        assert!(
            x < self.width && y < self.height && z < self.depth,
            "voxel index ({x}, {y}, {z}) out of bounds"
        );
        let offset = self.offset(x, y, z);
        self.bits.set(offset, occupied);
    }

    /// Number of occupied voxels.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.bits.count_ones()
    }
}
