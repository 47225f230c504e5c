//! Conversions between cartesian vectors and `[azimuth, elevation, radius]`.
//!
//! Angles are in radians. Elevation is measured from the XY plane.

use crate::prelude::{NumericError, NumericResult};

fn norm(vec: [f64; 3]) -> f64 {
    vec.iter().map(|v| v * v).sum::<f64>().sqrt()
}

fn elevation_and_radius(vec: [f64; 3]) -> NumericResult<(f64, f64)> {
    let radius = norm(vec);
    if !(radius > 0.0) || !radius.is_finite() {
        return Err(NumericError::InvalidParameter(format!(
            "cannot take direction of vector with norm {}",
            radius
        )));
    }
    // clamp guards against |z| / r drifting past 1 by rounding
    let elevation = (vec[2] / radius).clamp(-1.0, 1.0).asin();
    Ok((elevation, radius))
}

/// Cartesian to `[az, el, r]` with azimuth counter-clockwise from +X.
pub fn cartesian_to_spherical(vec: [f64; 3]) -> NumericResult<[f64; 3]> {
    let (elevation, radius) = elevation_and_radius(vec)?;
    Ok([vec[1].atan2(vec[0]), elevation, radius])
}

/// Cartesian to `[az, el, r]` with azimuth measured clockwise from +X.
pub fn cartesian_to_azel(vec: [f64; 3]) -> NumericResult<[f64; 3]> {
    let (elevation, radius) = elevation_and_radius(vec)?;
    Ok([-vec[1].atan2(vec[0]), elevation, radius])
}

pub fn spherical_to_cartesian(vec: [f64; 3]) -> [f64; 3] {
    let [azimuth, elevation, radius] = vec;
    [
        radius * elevation.cos() * azimuth.cos(),
        radius * elevation.cos() * azimuth.sin(),
        radius * elevation.sin(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn assert_close(lhs: [f64; 3], rhs: [f64; 3]) {
        for (l, r) in lhs.iter().zip(rhs.iter()) {
            assert!((l - r).abs() < 1e-12, "{:?} != {:?}", lhs, rhs);
        }
    }

    #[test]
    fn spherical_round_trip_restores_vector() {
        let vec = [1.5, -2.0, 0.75];
        let spherical = cartesian_to_spherical(vec).unwrap();
        assert_close(spherical_to_cartesian(spherical), vec);
    }

    #[test]
    fn azel_mirrors_azimuth() {
        let vec = [1.0, 1.0, 0.0];
        let spherical = cartesian_to_spherical(vec).unwrap();
        let azel = cartesian_to_azel(vec).unwrap();
        assert!((spherical[0] - FRAC_PI_4).abs() < 1e-12);
        assert!((azel[0] + FRAC_PI_4).abs() < 1e-12);
        assert_eq!(spherical[1], azel[1]);
    }

    #[test]
    fn elevation_uses_normalised_height() {
        let [_, elevation, radius] = cartesian_to_spherical([0.0, 0.0, 5.0]).unwrap();
        assert!((elevation - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(radius, 5.0);
    }

    #[test]
    fn zero_vector_is_rejected() {
        assert!(matches!(
            cartesian_to_spherical([0.0, 0.0, 0.0]),
            Err(NumericError::InvalidParameter(_))
        ));
    }
}
