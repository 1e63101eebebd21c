use glam::Vec2;

/// Pixel/meter conversion around a single pixels-per-meter ratio.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UnitConverter {
    pub ratio: f32,
}

impl UnitConverter {
    pub fn new(ratio: f32) -> Self {
        Self { ratio }
    }

    pub fn meters_to_pixels(&self, meters: f32) -> f32 {
        meters * self.ratio
    }

    pub fn pixels_to_meters(&self, pixels: f32) -> f32 {
        pixels / self.ratio
    }

    pub fn vec_to_pixels(&self, meters: Vec2) -> Vec2 {
        meters * self.ratio
    }

    pub fn vec_to_meters(&self, pixels: Vec2) -> Vec2 {
        pixels / self.ratio
    }
}

/// Radians to degrees, wrapped into `[0, 360)`.
pub fn rotation_degrees(radians: f32) -> f32 {
    let degrees = radians.to_degrees().rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.
    if degrees >= 360.0 { 0.0 } else { degrees }
}
