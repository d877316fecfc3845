pub mod complex;
pub mod error;
pub mod fields;
pub mod grid;
pub mod math;
pub mod skeleton;
pub mod skeletonize;
pub mod thinning;

pub use error::{Result, SkelisError};
pub use skeletonize::{Skeletonize, SkeletonizeParams};
