//! Seat placement around the elliptical table.

use std::f64::consts::PI;

/// Number of seats around the table.
pub const SEAT_COUNT: u8 = 10;

/// Default horizontal radius, in percent of the table width.
pub const TABLE_RADIUS_X: f64 = 42.0;

/// Default vertical radius, in percent of the table height.
pub const TABLE_RADIUS_Y: f64 = 38.0;

/// Face-down placeholder cards in the middle of the table.
pub const COMMUNITY_CARDS: usize = 5;

/// Face-down placeholder cards shown with each seated player.
pub const HOLE_CARDS: usize = 2;

/// A point on the table surface in percentage coordinates.
///
/// `(50, 50)` is the centre, `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatPoint {
    pub x: f64,
    pub y: f64,
}

/// Where seat `position` sits on an ellipse with radii `rx` and `ry`.
///
/// Position 0 is at the top and positions advance clockwise.
pub fn seat_point(position: u8, rx: f64, ry: f64) -> SeatPoint {
    let angle = f64::from(position) / f64::from(SEAT_COUNT) * 2.0 * PI - PI / 2.0;
    SeatPoint {
        x: 50.0 + rx * angle.cos(),
        y: 50.0 + ry * angle.sin(),
    }
}

/// [`seat_point`] with the default table radii.
pub fn default_seat_point(position: u8) -> SeatPoint {
    seat_point(position, TABLE_RADIUS_X, TABLE_RADIUS_Y)
}
