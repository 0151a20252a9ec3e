//! Geometry primitives shared by every conversion stage

use glam::{Quat, Vec3};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box holding every point, or a zero box at the origin when there are none
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::default();
        };
        points.fold(Self::new(first, first), |bbox, point| Self {
            min: bbox.min.min(point),
            max: bbox.max.max(point),
        })
    }

    /// Grow every face outwards by `padding`
    #[must_use]
    pub fn padded(self, padding: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(padding),
            max: self.max + Vec3::splat(padding),
        }
    }

    /// Grow any axis shorter than `min_size` symmetrically around its centre
    #[must_use]
    pub fn with_min_size(self, min_size: f32) -> Self {
        let center = self.center();
        let half = (self.extent().max(Vec3::splat(min_size))) * 0.5;
        Self {
            min: self.min.min(center - half),
            max: self.max.max(center + half),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Distance from the centre to the furthest corner
    pub fn radius(&self) -> f32 {
        self.max.distance(self.center())
    }
}

/// Triangle referencing three vertices and the material it is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct TriangleFace {
    pub material_index: u32,
    pub v1: u32,
    pub v2: u32,
    pub v3: u32,
}

impl TriangleFace {
    pub const fn new(material_index: u32, v1: u32, v2: u32, v3: u32) -> Self {
        Self {
            material_index,
            v1,
            v2,
            v3,
        }
    }

    pub const fn indices(&self) -> [u32; 3] {
        [self.v1, self.v2, self.v3]
    }

    /// Same triangle seen from the other side
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            material_index: self.material_index,
            v1: self.v3,
            v2: self.v2,
            v3: self.v1,
        }
    }

    /// Shift every index by `offset`
    #[must_use]
    pub const fn offset(self, offset: u32) -> Self {
        Self {
            material_index: self.material_index,
            v1: self.v1 + offset,
            v2: self.v2 + offset,
            v3: self.v3 + offset,
        }
    }
}

/// Compressed quaternion using 16-bit integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct CompQuat {
    pub x: i16,
    pub y: i16,
    pub z: i16,
    pub w: i16,
}

impl CompQuat {
    const SCALE: f32 = 32767.0;

    pub const IDENTITY: Self = Self {
        x: 0,
        y: 0,
        z: 0,
        w: i16::MAX,
    };

    /// Compress a normalized quaternion
    pub fn from_quat(q: Quat) -> Self {
        let pack = |v: f32| (v.clamp(-1.0, 1.0) * Self::SCALE).round() as i16;
        Self {
            x: pack(q.x),
            y: pack(q.y),
            z: pack(q.z),
            w: pack(q.w),
        }
    }

    /// Expand back to a float quaternion
    pub fn to_quat(self) -> Quat {
        Quat::from_xyzw(
            f32::from(self.x) / Self::SCALE,
            f32::from(self.y) / Self::SCALE,
            f32::from(self.z) / Self::SCALE,
            f32::from(self.w) / Self::SCALE,
        )
    }
}

impl Default for CompQuat {
    fn default() -> Self {
        Self::IDENTITY
    }
}
