//! Křovák oblique conformal conic projection on the Bessel ellipsoid.
//!
//! Works on the projection's native south/west-oriented plane (`Xp`, `Yp`),
//! which for the Czech Republic holds positive values of roughly
//! 930 000..1 230 000 (`Xp`) and 430 000..910 000 (`Yp`).

use std::f64::consts::FRAC_PI_4;

use crate::ellipsoid::{Ellipsoid, BESSEL_1841};

const LATITUDE_ITERATIONS: usize = 15;
const LATITUDE_EPSILON: f64 = 1e-14;

/// Projection constants derived once from the defining parameters.
#[derive(Debug, Clone, Copy)]
pub struct Krovak {
    e: f64,
    lon0: f64,
    cone_colat: f64,
    pseudo_par: f64,
    b: f64,
    t0: f64,
    n: f64,
    r0: f64,
}

impl Krovak {
    /// Parameters of S-JTSK / Krovak (EPSG:5514, Greenwich-based).
    pub fn s_jtsk() -> Self {
        Self::new(
            &BESSEL_1841,
            49.5_f64.to_radians(),
            (24.0 + 50.0 / 60.0_f64).to_radians(),
            30.288_139_752_777_78_f64.to_radians(),
            78.5_f64.to_radians(),
            0.9999,
        )
    }

    /// Builds the projection from the latitude of the projection centre,
    /// longitude of origin, co-latitude of the cone axis, latitude of the
    /// pseudo standard parallel (all radians) and the scale factor on it.
    pub fn new(
        ellipsoid: &Ellipsoid,
        lat_c: f64,
        lon0: f64,
        cone_colat: f64,
        pseudo_par: f64,
        k_p: f64,
    ) -> Self {
        let e2 = ellipsoid.e2();
        let e = e2.sqrt();

        let a = ellipsoid.a * (1.0 - e2).sqrt() / (1.0 - e2 * lat_c.sin().powi(2));
        let b = (1.0 + e2 * lat_c.cos().powi(4) / (1.0 - e2)).sqrt();
        let gamma0 = (lat_c.sin() / b).asin();
        let t0 = (FRAC_PI_4 + gamma0 / 2.0).tan()
            * ((1.0 + e * lat_c.sin()) / (1.0 - e * lat_c.sin())).powf(e * b / 2.0)
            / (FRAC_PI_4 + lat_c / 2.0).tan().powf(b);
        let n = pseudo_par.sin();
        let r0 = k_p * a / pseudo_par.tan();

        Self {
            e,
            lon0,
            cone_colat,
            pseudo_par,
            b,
            t0,
            n,
            r0,
        }
    }

    /// Projects Bessel latitude/longitude (radians) to the native (`Xp`, `Yp`) plane.
    pub fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let e_sin = self.e * lat.sin();
        let u = 2.0
            * ((self.t0 * (lat / 2.0 + FRAC_PI_4).tan().powf(self.b)
                / ((1.0 + e_sin) / (1.0 - e_sin)).powf(self.e * self.b / 2.0))
            .atan()
                - FRAC_PI_4);
        let v = self.b * (self.lon0 - lon);

        let (sin_a, cos_a) = self.cone_colat.sin_cos();
        let t = (cos_a * u.sin() + sin_a * u.cos() * v.cos()).asin();
        let d = (u.cos() * v.sin() / t.cos()).asin();

        let theta = self.n * d;
        let r = self.r0 * (FRAC_PI_4 + self.pseudo_par / 2.0).tan().powf(self.n)
            / (t / 2.0 + FRAC_PI_4).tan().powf(self.n);

        (r * theta.cos(), r * theta.sin())
    }

    /// Inverse of [`Krovak::forward`], returning Bessel latitude/longitude in radians.
    pub fn inverse(&self, xp: f64, yp: f64) -> (f64, f64) {
        let r = xp.hypot(yp);
        let theta = yp.atan2(xp);
        let d = theta / self.n;
        let t = 2.0
            * (((self.r0 / r).powf(1.0 / self.n) * (FRAC_PI_4 + self.pseudo_par / 2.0).tan())
                .atan()
                - FRAC_PI_4);

        let (sin_a, cos_a) = self.cone_colat.sin_cos();
        let u = (cos_a * t.sin() - sin_a * t.cos() * d.cos()).asin();
        let v = (t.cos() * d.sin() / u.cos()).asin();

        let base = self.t0.powf(-1.0 / self.b) * (u / 2.0 + FRAC_PI_4).tan().powf(1.0 / self.b);
        let mut lat = u;
        for _ in 0..LATITUDE_ITERATIONS {
            let e_sin = self.e * lat.sin();
            let next =
                2.0 * ((base * ((1.0 + e_sin) / (1.0 - e_sin)).powf(self.e / 2.0)).atan() - FRAC_PI_4);
            let delta = (next - lat).abs();
            lat = next;
            if delta < LATITUDE_EPSILON {
                break;
            }
        }

        (lat, self.lon0 - v / self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_of_projection_is_on_meridian() {
        let k = Krovak::s_jtsk();
        let (_, yp) = k.forward(49.5_f64.to_radians(), (24.0 + 50.0 / 60.0_f64).to_radians());
        assert!(yp.abs() < 1e-6, "Yp should vanish on the central meridian: {}", yp);
    }

    #[test]
    fn test_forward_inverse_on_bessel() {
        let k = Krovak::s_jtsk();
        let lat = 50.0_f64.to_radians();
        let lon = 15.0_f64.to_radians();

        let (xp, yp) = k.forward(lat, lon);
        let (lat2, lon2) = k.inverse(xp, yp);

        assert!((lat - lat2).abs() < 1e-11);
        assert!((lon - lon2).abs() < 1e-11);
    }
}
