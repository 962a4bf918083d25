//! Position trait for list ordering using fractional keys.

/// Something ordered within a list by a real-valued position.
///
/// Positions only carry relative order. A value between two neighbors can be
/// produced without touching either neighbor, which is what keeps single moves
/// cheap.
pub trait Positioned {
    /// Current sort key
    fn position(&self) -> f64;

    /// Replace the sort key
    fn set_position(&mut self, position: f64);
}

impl Positioned for f64 {
    fn position(&self) -> f64 {
        *self
    }

    fn set_position(&mut self, position: f64) {
        *self = position;
    }
}

/// Check if a position is a whole number.
///
/// Fractional positions mean bisection has run out of integer room between
/// two neighbors.
pub fn is_integral(position: f64) -> bool {
    position.is_finite() && position.fract() == 0.0
}
