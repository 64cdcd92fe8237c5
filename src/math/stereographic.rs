use std::f64::consts::FRAC_PI_4;

use super::{Point2, Point3};

/// Projects a longitude/latitude point (degrees) into Gmsh's flavour of
/// the north-polar stereographic plane.
///
/// This is the spherical polar stereographic projection centred on the
/// north pole with unit scale factor, normalised by the sphere radius and
/// with its axes swapped the way Gmsh's `PolarSphere` expects: the first
/// returned component is `y / R`, the second `-x / R`.
#[must_use]
pub fn project(lonlat: &Point3) -> Point2 {
    let lambda = lonlat.x.to_radians();
    let phi = lonlat.y.to_radians();
    let rho = 2.0 * (FRAC_PI_4 - phi / 2.0).tan();
    Point2::new(-rho * lambda.cos(), -rho * lambda.sin())
}
