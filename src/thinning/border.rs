use bitvec::vec::BitVec;

use crate::complex::{CubicalComplex, Direction};

/// Per-direction lists of lattice origins with an applicable collapse pair.
///
/// The lists are a snapshot taken between iterations: a pass scans them in
/// raster order and re-checks each pair before applying it. Keeping the
/// lists sorted by flat offset makes the scan order identical to a full
/// lattice rescan, which is what the equivalence tests rely on.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Border {
    members: [Vec<usize>; 6],
    seen: BitVec,
}

impl Border {
    pub fn new(lattice_len: usize) -> Self {
        Self {
            members: Default::default(),
            seen: BitVec::repeat(false, lattice_len),
        }
    }

    pub fn members(&self, direction: Direction) -> &[usize] {
        &self.members[direction.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.members.iter().all(Vec::is_empty)
    }

    pub fn total_len(&self) -> usize {
        self.members.iter().map(Vec::len).sum()
    }

    /// Collects the origins whose membership may have changed: the current
    /// members plus the 26-neighborhoods of every touched anchor. Output is
    /// deduplicated and sorted to raster order; the flag grid is reset on
    /// the way out.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn collect_candidates(
        &mut self,
        complex: &CubicalComplex,
        touched: &[usize],
        out: &mut Vec<usize>,
    ) {
        out.clear();

        for list in &self.members {
            for &offset in list {
                if !self.seen[offset] {
                    self.seen.set(offset, true);
                    out.push(offset);
                }
            }
        }

        let (w, h, d) = (
            complex.width() as isize,
            complex.height() as isize,
            complex.depth() as isize,
        );
        for &offset in touched {
            let (x, y, z) = complex.coords(offset);
            let (x, y, z) = (x as isize, y as isize, z as isize);
            for dz in -1..=1 {
                for dy in -1..=1 {
                    for dx in -1..=1isize {
                        let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                        if nx < 0 || ny < 0 || nz < 0 || nx >= w || ny >= h || nz >= d {
                            continue;
                        }
                        let neighbor =
                            complex.offset(nx as usize, ny as usize, nz as usize);
                        if !self.seen[neighbor] {
                            self.seen.set(neighbor, true);
                            out.push(neighbor);
                        }
                    }
                }
            }
        }

        out.sort_unstable();
        for &offset in out.iter() {
            self.seen.set(offset, false);
        }
    }

    /// Re-tests the candidate origins and replaces the member lists.
    pub fn rebuild(
        &mut self,
        candidates: &[usize],
        mut applicable: impl FnMut(usize, Direction) -> bool,
    ) {
        for list in &mut self.members {
            list.clear();
        }
        for &offset in candidates {
            for direction in Direction::ALL {
                if applicable(offset, direction) {
                    self.members[direction.index()].push(offset);
                }
            }
        }
    }

    /// Rebuilds the member lists by scanning the whole lattice. Used for
    /// the initial border and by the reference rescan variant.
    pub fn rebuild_full(
        &mut self,
        lattice_len: usize,
        mut applicable: impl FnMut(usize, Direction) -> bool,
    ) {
        for list in &mut self.members {
            list.clear();
        }
        for offset in 0..lattice_len {
            for direction in Direction::ALL {
                if applicable(offset, direction) {
                    self.members[direction.index()].push(offset);
                }
            }
        }
    }
}
