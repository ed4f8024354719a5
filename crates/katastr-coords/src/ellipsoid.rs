//! Reference ellipsoids and the geocentric datum shift between them.

/// A reference ellipsoid given by its semi-major axis and inverse flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in metres
    pub a: f64,
    /// Inverse flattening
    pub inv_f: f64,
}

/// WGS-84, used by GPS and web maps.
pub const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    inv_f: 298.257_223_563,
};

/// Bessel 1841, the ellipsoid S-JTSK is defined on.
pub const BESSEL_1841: Ellipsoid = Ellipsoid {
    a: 6_377_397.155,
    inv_f: 299.152_812_8,
};

/// Geocentric translation from S-JTSK (Bessel) to WGS-84, in metres (EPSG:1623).
pub const SJTSK_TO_WGS84: [f64; 3] = [589.0, 76.0, 480.0];

const GEODETIC_ITERATIONS: usize = 10;

impl Ellipsoid {
    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        let f = 1.0 / self.inv_f;
        f * (2.0 - f)
    }

    /// Geodetic (radians, metres) to Earth-centred Cartesian coordinates.
    pub fn to_ecef(&self, lat: f64, lon: f64, h: f64) -> [f64; 3] {
        let e2 = self.e2();
        let n = self.a / (1.0 - e2 * lat.sin().powi(2)).sqrt();
        [
            (n + h) * lat.cos() * lon.cos(),
            (n + h) * lat.cos() * lon.sin(),
            (n * (1.0 - e2) + h) * lat.sin(),
        ]
    }

    /// Earth-centred Cartesian coordinates to geodetic latitude and longitude
    /// in radians. Height is discarded.
    pub fn from_ecef(&self, xyz: [f64; 3]) -> (f64, f64) {
        let [x, y, z] = xyz;
        let e2 = self.e2();
        let p = x.hypot(y);
        let lon = y.atan2(x);

        let mut lat = z.atan2(p * (1.0 - e2));
        for _ in 0..GEODETIC_ITERATIONS {
            let n = self.a / (1.0 - e2 * lat.sin().powi(2)).sqrt();
            let h = p / lat.cos() - n;
            lat = z.atan2(p * (1.0 - e2 * n / (n + h)));
        }

        (lat, lon)
    }
}

/// Moves a geodetic position (radians) from one datum to another through a
/// geocentric translation. The result is on the `to` ellipsoid at the same
/// physical point, projected onto its surface.
pub fn shift_datum(
    lat: f64,
    lon: f64,
    from: &Ellipsoid,
    to: &Ellipsoid,
    translation: [f64; 3],
) -> (f64, f64) {
    let [x, y, z] = from.to_ecef(lat, lon, 0.0);
    to.from_ecef([x + translation[0], y + translation[1], z + translation[2]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecef_roundtrip() {
        let lat = 50.088_f64.to_radians();
        let lon = 14.421_f64.to_radians();

        let xyz = WGS84.to_ecef(lat, lon, 0.0);
        let (lat2, lon2) = WGS84.from_ecef(xyz);

        assert!((lat - lat2).abs() < 1e-12);
        assert!((lon - lon2).abs() < 1e-12);
    }

    #[test]
    fn test_bessel_eccentricity() {
        assert!((BESSEL_1841.e2() - 0.006_674_372_23).abs() < 1e-10);
    }

    #[test]
    fn test_shift_datum_is_reversible() {
        let lat = 49.5_f64.to_radians();
        let lon = 16.0_f64.to_radians();
        let back = SJTSK_TO_WGS84.map(|t| -t);

        let (b_lat, b_lon) = shift_datum(lat, lon, &WGS84, &BESSEL_1841, back);
        let (w_lat, w_lon) = shift_datum(b_lat, b_lon, &BESSEL_1841, &WGS84, SJTSK_TO_WGS84);

        // Height is dropped on each leg, so allow a few millimetres of drift.
        assert!((lat - w_lat).abs() < 1e-8);
        assert!((lon - w_lon).abs() < 1e-8);
    }
}
