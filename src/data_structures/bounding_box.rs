//! Axis-aligned bounding boxes.

use std::fmt;

use cgmath::{InnerSpace, Matrix4, Point3, Transform as _, Vector3};

/// A three-dimensional axis-aligned bounding box.
///
/// The default box is zero-sized and sits at the origin. It doubles as the
/// "empty" box, which means merging into a default box always pulls the
/// origin into the result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// lower-left corner
    pub ll: Vector3<f32>,
    /// upper-right corner
    pub ur: Vector3<f32>,
}

impl BoundingBox {
    pub fn new(ll: impl Into<Vector3<f32>>, ur: impl Into<Vector3<f32>>) -> Self {
        Self {
            ll: ll.into(),
            ur: ur.into(),
        }
    }

    /// Tightest box around `points`, or the default box if there are none.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Vector3<f32>>,
    {
        let mut points = points.into_iter().map(Into::into);
        let Some(first) = points.next() else {
            return Self::default();
        };
        points.fold(Self::new(first, first), |bbox, p| Self {
            ll: min(bbox.ll, p),
            ur: max(bbox.ur, p),
        })
    }

    /// Smallest box containing both `self` and `other`.
    pub fn merge(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            ll: min(self.ll, other.ll),
            ur: max(self.ur, other.ur),
        }
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.ll + self.ur) * 0.5
    }

    /// Distance between the two opposite corners.
    pub fn diameter(&self) -> f32 {
        (self.ur - self.ll).magnitude()
    }

    /// Box around the eight corners of `self` after applying `m`.
    pub fn transformed(&self, m: &Matrix4<f32>) -> BoundingBox {
        let (ll, ur) = (self.ll, self.ur);
        let corners = (0..8).map(|i| {
            let corner = Point3::new(
                if i & 1 == 0 { ll.x } else { ur.x },
                if i & 2 == 0 { ll.y } else { ur.y },
                if i & 4 == 0 { ll.z } else { ur.z },
            );
            let p = m.transform_point(corner);
            Vector3::new(p.x, p.y, p.z)
        });
        BoundingBox::from_points(corners)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            ll: Vector3::new(0.0, 0.0, 0.0),
            ur: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}) -> ({}, {}, {})",
            self.ll.x, self.ll.y, self.ll.z, self.ur.x, self.ur.y, self.ur.z
        )
    }
}

fn min(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

fn max(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}
