//! 2D affine transforms.

use vek::*;


/// 2D affine transform, mapping `p` to `linear * p + translation`.
///
/// `linear` is stored row-major.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine2 {
    pub linear: [[f32; 2]; 2],
    pub translation: Vec2<f32>,
}

impl Affine2 {
    pub const IDENTITY: Affine2 = Affine2 {
        linear: [[1.0, 0.0], [0.0, 1.0]],
        translation: Vec2 { x: 0.0, y: 0.0 },
    };

    /// Pure translation by `v`.
    pub fn translation<V: Into<Vec2<f32>>>(v: V) -> Self {
        Affine2 {
            translation: v.into(),
            ..Self::IDENTITY
        }
    }

    /// Rotation about the origin by `degrees`.
    pub fn rotation(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Affine2 {
            linear: [[cos, -sin], [sin, cos]],
            translation: Vec2::zero(),
        }
    }

    /// Non-uniform scaling about the origin.
    pub fn scaling<V: Into<Vec2<f32>>>(s: V) -> Self {
        let s = s.into();
        Affine2 {
            linear: [[s.x, 0.0], [0.0, s.y]],
            translation: Vec2::zero(),
        }
    }

    /// Transform which applies `self` and then `next`.
    pub fn then(&self, next: &Affine2) -> Self {
        let a = &next.linear;
        let b = &self.linear;
        let mut linear = [[0.0; 2]; 2];
        for r in 0..2 {
            for c in 0..2 {
                linear[r][c] = a[r][0] * b[0][c] + a[r][1] * b[1][c];
            }
        }
        Affine2 {
            linear,
            translation: next.apply_linear(self.translation) + next.translation,
        }
    }

    /// Apply only the linear part.
    pub fn apply_linear(&self, p: Vec2<f32>) -> Vec2<f32> {
        let m = &self.linear;
        Vec2::new(
            m[0][0] * p.x + m[0][1] * p.y,
            m[1][0] * p.x + m[1][1] * p.y,
        )
    }

    /// Transform the point `p`.
    pub fn apply(&self, p: Vec2<f32>) -> Vec2<f32> {
        self.apply_linear(p) + self.translation
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f32 {
        let m = &self.linear;
        m[0][0] * m[1][1] - m[0][1] * m[1][0]
    }

    /// Inverse transform, or `None` if the linear part is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() <= f32::EPSILON {
            return None;
        }
        let m = &self.linear;
        let inv = Affine2 {
            linear: [
                [m[1][1] / det, -m[0][1] / det],
                [-m[1][0] / det, m[0][0] / det],
            ],
            translation: Vec2::zero(),
        };
        Some(Affine2 {
            translation: -inv.apply_linear(self.translation),
            ..inv
        })
    }
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}


#[test]
fn inverse_undoes_transform() {
    let t = Affine2::scaling([2.0, 0.5])
        .then(&Affine2::rotation(30.0))
        .then(&Affine2::translation([3.0, -4.0]));
    let inv = t.inverse().unwrap();
    let p = Vec2::new(1.5, -2.25);
    let q = inv.apply(t.apply(p));
    assert!((q - p).magnitude() < 1e-4);
}

#[test]
fn singular_transform_has_no_inverse() {
    assert!(Affine2::scaling([0.0, 1.0]).inverse().is_none());
}
