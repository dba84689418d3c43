use nalgebra::{UnitQuaternion, Vector3};

pub fn lerp(a: &Vector3<f64>, b: &Vector3<f64>, alpha: f64) -> Vector3<f64> {
    a.lerp(b, alpha)
}

/// cubic Hermite interpolation between `p1` and `p2` with tangents `m1` and
/// `m2`, already scaled to the length of the interval.
pub fn hermite(
    p1: &Vector3<f64>,
    p2: &Vector3<f64>,
    m1: &Vector3<f64>,
    m2: &Vector3<f64>,
    t: f64,
) -> Vector3<f64> {
    let t2 = t * t;
    let t3 = t2 * t;
    let a = 2.0 * t3 - 3.0 * t2 + 1.0;
    let b = -2.0 * t3 + 3.0 * t2;
    let c = t3 - 2.0 * t2 + t;
    let d = t3 - t2;
    p1 * a + p2 * b + m1 * c + m2 * d
}

/// spherical interpolation. when the two orientations are too close for the
/// arc to be well defined, the nearer endpoint is used instead.
pub fn slerp(a: &UnitQuaternion<f64>, b: &UnitQuaternion<f64>, alpha: f64) -> UnitQuaternion<f64> {
    a.try_slerp(b, alpha, 1.0e-9)
        .unwrap_or(if alpha < 0.5 { *a } else { *b })
}
