pub mod distance;
pub mod opening;

pub use distance::DistanceMap;
pub use opening::{OpeningMap, OpeningScratch};
