use std::ops;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self { Self { x, y, z } }

    pub const fn splat(v: f32) -> Self { Self::new(v, v, v) }
}

impl ops::Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self { Self::new(self.x + other.x, self.y + other.y, self.z + other.z) }
}

impl ops::AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) { *self = *self + other; }
}

impl ops::Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, k: f32) -> Self { Self::new(self.x * k, self.y * k, self.z * k) }
}
