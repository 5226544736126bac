/*
 * Math Module
 *
 * Small vector helpers used by every steering behavior. All of them are
 * zero-safe: a zero-length vector never turns into NaN or infinity, it
 * simply stays zero.
 */

use nannou::geom::Vec3;

// Below this squared length a vector is treated as zero
const ZERO_LENGTH_SQUARED: f32 = 1.0e-12;

pub trait SteeringMath: Sized {
    /// Unit vector in the same direction, or zero for a zero-length input.
    fn unit_or_zero(self) -> Self;

    /// Clamp the length to `max`, keeping the direction.
    fn limit(self, max: f32) -> Self;

    /// Rescale to exactly `length` (zero stays zero).
    fn with_length(self, length: f32) -> Self;
}

impl SteeringMath for Vec3 {
    fn unit_or_zero(self) -> Self {
        let length_squared = self.length_squared();
        if length_squared <= ZERO_LENGTH_SQUARED || !length_squared.is_finite() {
            return Vec3::ZERO;
        }
        self / length_squared.sqrt()
    }

    fn limit(self, max: f32) -> Self {
        if max <= 0.0 {
            return Vec3::ZERO;
        }
        let length_squared = self.length_squared();
        if length_squared > max * max {
            self * (max / length_squared.sqrt())
        } else {
            self
        }
    }

    fn with_length(self, length: f32) -> Self {
        self.unit_or_zero() * length
    }
}
