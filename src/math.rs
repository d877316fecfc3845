/// 3D point type in world coordinates.
pub type Point3 = nalgebra::Point3<f32>;

/// 3D vector type in world coordinates.
pub type Vector3 = nalgebra::Vector3<f32>;

/// 4x4 transformation matrix (grid-to-world and its inverse).
pub type Matrix4 = nalgebra::Matrix4<f32>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f32 = 1e-6;

/// Isotropic scale factor of an affine transform.
///
/// The cube root of the absolute determinant of the linear part, i.e. the
/// factor by which the transform scales lengths when it is a uniform
/// scaling composed with rotation and translation.
#[must_use]
pub fn uniform_scale(transform: &Matrix4) -> f32 {
    let linear = transform.fixed_view::<3, 3>(0, 0);
    linear.determinant().abs().cbrt()
}
