use std::collections::VecDeque;

use super::distance::DistanceMap;
use crate::grid::Grid3D;

/// A candidate maximal ball during a line sweep.
///
/// A ball of radius `r` centered at `c` covers every voxel within Chebyshev
/// distance `r - 1` of `c`, so it reaches `r - 1` positions past its center
/// along the sweep line.
#[derive(Debug, Clone, Copy)]
struct Ball {
    radius: u32,
    /// Last line position the ball still covers.
    reach: u64,
    center: [u32; 3],
}

/// Reusable line buffers for [`OpeningMap::compute`].
///
/// The sweeps gather each grid line into these buffers, run both directions
/// in place, and scatter the result back; nothing allocates inside the
/// per-line loops once the buffers have grown to the longest axis.
#[derive(Debug, Default)]
pub struct OpeningScratch {
    deque: VecDeque<Ball>,
    line_radii: Vec<u32>,
    line_centers: Vec<[u32; 3]>,
}

impl OpeningScratch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn prepare(&mut self, len: usize) {
        self.line_radii.resize(len, 0);
        self.line_centers.resize(len, [0; 3]);
    }
}

/// Per-voxel morphological opening radius under the 26-metric.
///
/// The opening at a voxel `v` is the largest radius of a ball that fits
/// inside the object (radius bounded by the distance value at its center)
/// and covers `v`; the realizing center is recorded alongside. Computed
/// from the distance transform by three axis passes, each sweeping every
/// grid line in both directions with a monotone deque of dominating balls.
/// Later passes keep only the largest-radius candidate per voxel, which is
/// lossless: of two balls whose centers share the remaining axes, the
/// larger one covers everything the smaller does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningMap {
    radii: Grid3D<u32>,
    centers: Grid3D<[u32; 3]>,
}

impl OpeningMap {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn compute(distance: &DistanceMap, scratch: &mut OpeningScratch) -> Self {
        let mut radii = distance.values().clone();
        let (w, h, d) = (radii.width(), radii.height(), radii.depth());

        let mut centers = Grid3D::new_fill(w, h, d, [0u32; 3]);
        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    centers[(x, y, z)] = [x as u32, y as u32, z as u32];
                }
            }
        }

        // X lines.
        scratch.prepare(w);
        for z in 0..d {
            for y in 0..h {
                let base = radii.offset(0, y, z);
                sweep_line(&mut radii, &mut centers, scratch, base, 1, w);
            }
        }

        // Y lines.
        scratch.prepare(h);
        for z in 0..d {
            for x in 0..w {
                let base = radii.offset(x, 0, z);
                sweep_line(&mut radii, &mut centers, scratch, base, w, h);
            }
        }

        // Z lines.
        scratch.prepare(d);
        for y in 0..h {
            for x in 0..w {
                let base = radii.offset(x, y, 0);
                sweep_line(&mut radii, &mut centers, scratch, base, w * h, d);
            }
        }

        Self { radii, centers }
    }

    /// Opening radius at a voxel.
    ///
    /// # Panics
    /// Panics when the voxel is out of bounds.
    #[must_use]
    pub fn radius(&self, x: usize, y: usize, z: usize) -> u32 {
        self.radii[(x, y, z)]
    }

    /// Center of the ball realizing the opening at a voxel.
    ///
    /// # Panics
    /// Panics when the voxel is out of bounds.
    #[must_use]
    pub fn center(&self, x: usize, y: usize, z: usize) -> [u32; 3] {
        self.centers[(x, y, z)]
    }

    #[must_use]
    pub fn radii(&self) -> &Grid3D<u32> {
        &self.radii
    }
}

fn sweep_line(
    radii: &mut Grid3D<u32>,
    centers: &mut Grid3D<[u32; 3]>,
    scratch: &mut OpeningScratch,
    base: usize,
    stride: usize,
    len: usize,
) {
    let radii_data = radii.data_mut();
    let centers_data = centers.data_mut();
    for i in 0..len {
        scratch.line_radii[i] = radii_data[base + i * stride];
        scratch.line_centers[i] = centers_data[base + i * stride];
    }

    sweep(
        &mut scratch.line_radii,
        &mut scratch.line_centers,
        &mut scratch.deque,
    );
    scratch.line_radii.reverse();
    scratch.line_centers.reverse();
    sweep(
        &mut scratch.line_radii,
        &mut scratch.line_centers,
        &mut scratch.deque,
    );
    scratch.line_radii.reverse();
    scratch.line_centers.reverse();

    for i in 0..len {
        radii_data[base + i * stride] = scratch.line_radii[i];
        centers_data[base + i * stride] = scratch.line_centers[i];
    }
}

/// One direction of a line sweep, in place.
///
/// Deque invariants: radii strictly decrease and reaches strictly increase
/// from front to back, so the front is always the largest ball still
/// covering the current position.
fn sweep(radii: &mut [u32], centers: &mut [[u32; 3]], deque: &mut VecDeque<Ball>) {
    deque.clear();
    for i in 0..radii.len() {
        let position = i as u64;
        let radius = radii[i];
        if radius > 0 {
            let ball = Ball {
                radius,
                reach: position + u64::from(radius) - 1,
                center: centers[i],
            };
            match deque.front() {
                Some(front) if ball.radius < front.radius => {
                    while deque.back().is_some_and(|back| back.radius <= ball.radius) {
                        deque.pop_back();
                    }
                    if deque.back().map_or(true, |back| ball.reach > back.reach) {
                        deque.push_back(ball);
                    }
                }
                _ => {
                    deque.clear();
                    deque.push_back(ball);
                }
            }
        }
        while deque.front().is_some_and(|front| front.reach < position) {
            deque.pop_front();
        }
        if let Some(front) = deque.front() {
            radii[i] = front.radius;
            centers[i] = front.center;
        }
    }
}
