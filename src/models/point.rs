use std::ops::{Add, Sub};

/// 2D point, generic over its coordinate type (pixel space defaults to `f64`)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point<T = f64> {
    /// X coordinate (column)
    pub x: T,
    /// Y coordinate (row)
    pub y: T,
}

impl<T> Point<T> {
    /// Create a new point
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Copy + Into<f64>> Point<T> {
    /// Convert to a floating point position
    pub fn to_f64(self) -> Point<f64> {
        Point::new(self.x.into(), self.y.into())
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x.into() - other.x.into();
        let dy = self.y.into() - other.y.into();
        (dx * dx + dy * dy).sqrt()
    }
}

impl Point<f64> {
    /// Dot product, treating both points as vectors
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the cross product, treating both points as vectors
    pub fn cross(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Length of the vector from the origin
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }
}

impl<T: Add<Output = T>> Add for Point<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Sub<Output = T>> Sub for Point<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}
