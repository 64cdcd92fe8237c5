pub mod stereographic;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type. Planar input leaves `z` at zero.
pub type Point3 = nalgebra::Point3<f64>;

/// Sphere radius used by Gmsh's stereographic coordinate system, in metres.
pub const EARTH_RADIUS: f64 = 6.37101e6;

/// Returns the bit pattern of a point, used wherever two coordinates must
/// compare equal only when they are bit-identical.
#[must_use]
pub fn bit_key(p: &Point3) -> [u64; 3] {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}
