//! Analytic surface primitives.
//!
//! Each surface divides space by the sign of a defining form `f(p)`: the
//! MCNP convention is that `f(p) > 0` is the *positive* side of the surface.
//! All defining forms here are at most second order in the point
//! coordinates, which is what lets line intersection be solved uniformly by
//! a quadratic in the ray parameter.

use nalgebra::{Point3, Vector3};

/// Tolerance below which a point counts as lying on a surface.
pub const SURF_TOL: f64 = 1e-8;

/// Which side of a surface a point lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The defining form is negative.
    Negative,
    /// The defining form is within tolerance of zero.
    On,
    /// The defining form is positive.
    Positive,
}

/// An analytic surface primitive.
///
/// The variant set is closed: MCNP-style cell descriptions only ever need
/// first- and second-order surfaces, and a general [`Surface::Quadric`]
/// covers anything the named forms do not.
#[derive(Clone, Debug, PartialEq)]
pub enum Surface {
    /// Plane `n . p - d = 0` with unit normal `n`; positive side is the
    /// half-space the normal points into.
    Plane {
        /// Unit normal.
        normal: Vector3<f64>,
        /// Signed distance of the plane from the origin along the normal.
        offset: f64,
    },
    /// Sphere; positive side is outside.
    Sphere {
        /// Center point.
        center: Point3<f64>,
        /// Radius (positive).
        radius: f64,
    },
    /// Infinite circular cylinder; positive side is outside.
    Cylinder {
        /// Any point on the axis.
        point: Point3<f64>,
        /// Unit axis direction.
        axis: Vector3<f64>,
        /// Radius (positive).
        radius: f64,
    },
    /// Infinite double cone; positive side is inside the cone (both
    /// nappes), matching the cone-as-quadric sign convention.
    Cone {
        /// Apex point.
        apex: Point3<f64>,
        /// Unit axis direction.
        axis: Vector3<f64>,
        /// Cosine squared of the half-opening angle.
        cos2: f64,
    },
    /// General second-order surface
    /// `ax^2 + by^2 + cz^2 + dxy + eyz + fzx + gx + hy + iz + j`.
    Quadric {
        /// Coefficients `[a, b, c, d, e, f, g, h, i, j]`.
        coeffs: [f64; 10],
    },
}

impl Surface {
    /// Creates a plane from a (not necessarily unit) normal and the plane
    /// equation `normal . p = offset`.
    ///
    /// # Panics
    /// Panics if the normal has zero length.
    #[must_use]
    pub fn plane(normal: Vector3<f64>, offset: f64) -> Self {
        let len = normal.norm();
        assert!(len > 0.0, "plane normal must be nonzero");
        Self::Plane {
            normal: normal / len,
            offset: offset / len,
        }
    }

    /// Creates a sphere.
    #[must_use]
    pub fn sphere(center: Point3<f64>, radius: f64) -> Self {
        Self::Sphere { center, radius }
    }

    /// Creates an infinite circular cylinder about an axis.
    ///
    /// # Panics
    /// Panics if the axis has zero length.
    #[must_use]
    pub fn cylinder(point: Point3<f64>, axis: Vector3<f64>, radius: f64) -> Self {
        let len = axis.norm();
        assert!(len > 0.0, "cylinder axis must be nonzero");
        Self::Cylinder {
            point,
            axis: axis / len,
            radius,
        }
    }

    /// Creates an infinite double cone from an apex, axis, and half-opening
    /// angle in radians.
    ///
    /// # Panics
    /// Panics if the axis has zero length.
    #[must_use]
    pub fn cone(apex: Point3<f64>, axis: Vector3<f64>, half_angle: f64) -> Self {
        let len = axis.norm();
        assert!(len > 0.0, "cone axis must be nonzero");
        let c = half_angle.cos();
        Self::Cone {
            apex,
            axis: axis / len,
            cos2: c * c,
        }
    }

    /// Creates a general quadric from its ten coefficients.
    #[must_use]
    pub fn quadric(coeffs: [f64; 10]) -> Self {
        Self::Quadric { coeffs }
    }

    /// Evaluates the defining form at a point. The sign of the result is
    /// the side of the surface the point lies on.
    #[must_use]
    pub fn eval(&self, p: &Point3<f64>) -> f64 {
        match self {
            Self::Plane { normal, offset } => normal.dot(&p.coords) - offset,
            Self::Sphere { center, radius } => {
                let m = p - center;
                m.dot(&m) - radius * radius
            }
            Self::Cylinder {
                point,
                axis,
                radius,
            } => {
                let m = p - point;
                let along = m.dot(axis);
                m.dot(&m) - along * along - radius * radius
            }
            Self::Cone { apex, axis, cos2 } => {
                let w = p - apex;
                let along = w.dot(axis);
                along * along - cos2 * w.dot(&w)
            }
            Self::Quadric { coeffs } => {
                let [a, b, c, d, e, f, g, h, i, j] = *coeffs;
                let (x, y, z) = (p.x, p.y, p.z);
                a * x * x
                    + b * y * y
                    + c * z * z
                    + d * x * y
                    + e * y * z
                    + f * z * x
                    + g * x
                    + h * y
                    + i * z
                    + j
            }
        }
    }

    /// Classifies a point against the surface with [`SURF_TOL`].
    #[must_use]
    pub fn side(&self, p: &Point3<f64>) -> Side {
        let v = self.eval(p);
        if v.abs() <= SURF_TOL {
            Side::On
        } else if v > 0.0 {
            Side::Positive
        } else {
            Side::Negative
        }
    }

    /// Returns every real ray parameter `t` at which the line
    /// `origin + t * direction` crosses the surface, sorted ascending.
    /// Both signs of `t` are returned; callers filter for forward hits.
    ///
    /// The defining form of every variant is at most quadratic in the
    /// point, so `f(origin + t d)` is `A t^2 + B t + C` with coefficients
    /// recovered exactly from three evaluations of `f`.
    #[must_use]
    pub fn line_intersect(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Vec<f64> {
        let c = self.eval(origin);
        let fp = self.eval(&(origin + direction));
        let fm = self.eval(&(origin - direction));
        let a = 0.5 * (fp + fm) - c;
        let b = 0.5 * (fp - fm);

        const COEF_TOL: f64 = 1e-12;
        if a.abs() < COEF_TOL {
            if b.abs() < COEF_TOL {
                return Vec::new();
            }
            return vec![-c / b];
        }
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return Vec::new();
        }
        let root = disc.sqrt();
        // Numerically stable quadratic roots.
        let q = -0.5 * (b + b.signum() * root);
        let mut ts = if q.abs() < COEF_TOL {
            vec![0.0, -b / a]
        } else {
            vec![q / a, c / q]
        };
        ts.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
        ts.dedup_by(|x, y| (*x - *y).abs() < COEF_TOL);
        ts
    }

    /// Estimates the unsigned distance from a point to the surface.
    ///
    /// Exact for planes, spheres, and cylinders; for cones and general
    /// quadrics the magnitude of the defining form stands in, which is
    /// adequate for nearest-surface ranking.
    #[must_use]
    pub fn distance_estimate(&self, p: &Point3<f64>) -> f64 {
        match self {
            Self::Plane { .. } => self.eval(p).abs(),
            Self::Sphere { center, radius } => ((p - center).norm() - radius).abs(),
            Self::Cylinder {
                point,
                axis,
                radius,
            } => {
                let m = p - point;
                let perp = m - axis * m.dot(axis);
                (perp.norm() - radius).abs()
            }
            Self::Cone { .. } | Self::Quadric { .. } => self.eval(p).abs(),
        }
    }
}
