//! Coordinate conversion between WGS-84 and S-JTSK.
//!
//! Web clients speak WGS-84 latitude/longitude, while the cadastral registry
//! API expects S-JTSK (Křovák, EPSG:5514) coordinates. EPSG:5514 places the
//! whole country in the negative quadrant; the registry uses the same numbers
//! without the sign and labels the north-derived axis `X` and the east-derived
//! axis `Y`. The functions here take care of both conventions.

pub mod ellipsoid;
pub mod krovak;

use std::sync::LazyLock;

use ellipsoid::{shift_datum, BESSEL_1841, SJTSK_TO_WGS84, WGS84};
use krovak::Krovak;

static KROVAK: LazyLock<Krovak> = LazyLock::new(Krovak::s_jtsk);

/// Converts WGS-84 coordinates to registry-style S-JTSK coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees
/// * `lon` - Longitude in degrees
///
/// # Returns
///
/// `(x, y)` in metres, both positive inside the Czech Republic. `x` is the
/// absolute northing and `y` the absolute easting of EPSG:5514.
///
/// Inputs are not range-checked; far-away points produce meaningless (but
/// non-panicking) output.
pub fn to_projected(lat: f64, lon: f64) -> (f64, f64) {
    let to_bessel = SJTSK_TO_WGS84.map(|t| -t);
    let (b_lat, b_lon) = shift_datum(
        lat.to_radians(),
        lon.to_radians(),
        &WGS84,
        &BESSEL_1841,
        to_bessel,
    );

    // EPSG:5514 is east/north: easting = -Yp, northing = -Xp.
    let (xp, yp) = KROVAK.forward(b_lat, b_lon);
    let (east, north) = (-yp, -xp);

    (north.abs(), east.abs())
}

/// Converts registry-style S-JTSK coordinates back to WGS-84.
///
/// `x` and `y` are the positive values returned by [`to_projected`] or by the
/// registry API. Returns `(lat, lon)` in degrees.
pub fn to_geographic(x: f64, y: f64) -> (f64, f64) {
    let (east, north) = (-y, -x);
    let (b_lat, b_lon) = KROVAK.inverse(-north, -east);

    let (lat, lon) = shift_datum(b_lat, b_lon, &BESSEL_1841, &WGS84, SJTSK_TO_WGS84);
    (lat.to_degrees(), lon.to_degrees())
}
