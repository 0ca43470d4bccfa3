//! Coordinate-conversion policies owned by a [`PhaseSpacePoint`](crate::PhaseSpacePoint).
//!
//! A spatial policy maps local coordinates (Cartesian, cylindrical or
//! spherical) about an `origin` and a local z-axis onto global Cartesian
//! coordinates and back. A directional policy does the same for unit
//! direction vectors, without the translation.
//!
//! The local frame for a normalised axis `(a, b, c)` is
//!
//! ```text
//! X = (a c / s, b c / s, -s)
//! Y = (-b / s, a / s, 0)
//! Z = (a, b, c)              s = sqrt(1 - c^2)
//! ```
//!
//! collapsing to the identity for `+z` and to a flip for `-z`.

use std::f64::consts::TAU;
use std::fmt;

use crate::ConfigurationError;

/// Tolerance used to detect an axis aligned with `±z`.
const AXIS_ALIGNMENT_TOL: f64 = 1e-15;

/// Local coordinate system for the three spatial dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpatialCoordinateSystem {
    /// `(x, y, z)`.
    Cartesian,
    /// `(r, theta, z)` with `theta` the azimuthal angle in `[0, 2pi)`.
    Cylindrical,
    /// `(r, theta, mu)` with `mu` the polar-angle cosine.
    Spherical,
}

/// Local coordinate system for the three directional dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectionalCoordinateSystem {
    /// `(u, v, w)`, normalised on conversion.
    Cartesian,
    /// `(r, theta, mu)`; `r` is always 1 after conversion from Cartesian.
    Spherical,
}

impl fmt::Display for SpatialCoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cartesian => "Cartesian",
            Self::Cylindrical => "cylindrical",
            Self::Spherical => "spherical",
        };
        f.write_str(name)
    }
}

impl fmt::Display for DirectionalCoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cartesian => "Cartesian",
            Self::Spherical => "spherical",
        };
        f.write_str(name)
    }
}

// ── Rotation frame ──────────────────────────────────────────────

/// Orthonormal local frame with rows `X`, `Y`, `Z` expressed globally.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Frame {
    x: [f64; 3],
    y: [f64; 3],
    z: [f64; 3],
}

impl Frame {
    const IDENTITY: Self = Self {
        x: [1.0, 0.0, 0.0],
        y: [0.0, 1.0, 0.0],
        z: [0.0, 0.0, 1.0],
    };

    fn from_axis(axis: [f64; 3]) -> Result<Self, ConfigurationError> {
        let norm = dot(axis, axis).sqrt();
        if !norm.is_finite() || norm == 0.0 {
            return Err(ConfigurationError::InvalidCoordinateSystem {
                reason: format!(
                    "axis ({}, {}, {}) cannot be normalised",
                    axis[0], axis[1], axis[2]
                ),
            });
        }
        let [a, b, c] = axis.map(|v| v / norm);

        if (c - 1.0).abs() < AXIS_ALIGNMENT_TOL {
            return Ok(Self::IDENTITY);
        }
        if (c + 1.0).abs() < AXIS_ALIGNMENT_TOL {
            return Ok(Self {
                x: [1.0, 0.0, 0.0],
                y: [0.0, -1.0, 0.0],
                z: [0.0, 0.0, -1.0],
            });
        }

        let s = (1.0 - c * c).sqrt();
        Ok(Self {
            x: [a * c / s, b * c / s, -s],
            y: [-b / s, a / s, 0.0],
            z: [a, b, c],
        })
    }

    fn to_global(&self, local: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (i, o) in out.iter_mut().enumerate() {
            *o = local[0] * self.x[i] + local[1] * self.y[i] + local[2] * self.z[i];
        }
        out
    }

    fn to_local(&self, global: [f64; 3]) -> [f64; 3] {
        [dot(global, self.x), dot(global, self.y), dot(global, self.z)]
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Azimuthal angle of `(x, y)` in `[0, 2pi)`.
fn azimuth(x: f64, y: f64) -> f64 {
    let theta = y.atan2(x);
    if theta < 0.0 {
        theta + TAU
    } else {
        theta
    }
}

/// Local spherical `(r, theta, mu)` to local Cartesian.
fn spherical_to_cartesian([r, theta, mu]: [f64; 3]) -> [f64; 3] {
    let sin_polar = (1.0 - mu * mu).max(0.0).sqrt();
    [
        r * sin_polar * theta.cos(),
        r * sin_polar * theta.sin(),
        r * mu,
    ]
}

/// Local Cartesian to local spherical `(r, theta, mu)`.
fn cartesian_to_spherical([x, y, z]: [f64; 3]) -> [f64; 3] {
    let r = (x * x + y * y + z * z).sqrt();
    if r == 0.0 {
        return [0.0, 0.0, 1.0];
    }
    [r, azimuth(x, y), (z / r).clamp(-1.0, 1.0)]
}

fn validate_vector(name: &str, v: [f64; 3]) -> Result<(), ConfigurationError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidCoordinateSystem {
            reason: format!("{name} ({}, {}, {}) is not finite", v[0], v[1], v[2]),
        })
    }
}

// ── Spatial ─────────────────────────────────────────────────────

/// Converts local spatial coordinates to global Cartesian and back.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialCoordinateConversion {
    system: SpatialCoordinateSystem,
    origin: [f64; 3],
    frame: Frame,
}

impl SpatialCoordinateConversion {
    /// Create a conversion for `system` centred at `origin` whose local
    /// z-axis points along `axis`.
    ///
    /// The axis is normalised. A zero or non-finite axis, or a non-finite
    /// origin, is rejected.
    pub fn new(
        system: SpatialCoordinateSystem,
        origin: [f64; 3],
        axis: [f64; 3],
    ) -> Result<Self, ConfigurationError> {
        validate_vector("origin", origin)?;
        validate_vector("axis", axis)?;
        Ok(Self {
            system,
            origin,
            frame: Frame::from_axis(axis)?,
        })
    }

    /// Global Cartesian coordinates with no translation or rotation.
    pub fn basic_cartesian() -> Self {
        Self::basic(SpatialCoordinateSystem::Cartesian)
    }

    /// `system` at the global origin with the global z-axis.
    pub fn basic(system: SpatialCoordinateSystem) -> Self {
        Self {
            system,
            origin: [0.0; 3],
            frame: Frame::IDENTITY,
        }
    }

    /// The local coordinate system.
    pub fn system(&self) -> SpatialCoordinateSystem {
        self.system
    }

    /// The origin of the local frame in global coordinates.
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    /// The (normalised) local z-axis in global coordinates.
    pub fn axis(&self) -> [f64; 3] {
        self.frame.z
    }

    /// Convert local coordinates to global Cartesian coordinates.
    pub fn to_cartesian(&self, local: [f64; 3]) -> [f64; 3] {
        let cartesian = match self.system {
            SpatialCoordinateSystem::Cartesian => local,
            SpatialCoordinateSystem::Cylindrical => {
                let [r, theta, z] = local;
                [r * theta.cos(), r * theta.sin(), z]
            }
            SpatialCoordinateSystem::Spherical => spherical_to_cartesian(local),
        };
        let rotated = self.frame.to_global(cartesian);
        [
            rotated[0] + self.origin[0],
            rotated[1] + self.origin[1],
            rotated[2] + self.origin[2],
        ]
    }

    /// Convert global Cartesian coordinates to local coordinates.
    pub fn from_cartesian(&self, global: [f64; 3]) -> [f64; 3] {
        let shifted = [
            global[0] - self.origin[0],
            global[1] - self.origin[1],
            global[2] - self.origin[2],
        ];
        let local = self.frame.to_local(shifted);
        match self.system {
            SpatialCoordinateSystem::Cartesian => local,
            SpatialCoordinateSystem::Cylindrical => {
                let [x, y, z] = local;
                [(x * x + y * y).sqrt(), azimuth(x, y), z]
            }
            SpatialCoordinateSystem::Spherical => cartesian_to_spherical(local),
        }
    }
}

impl Default for SpatialCoordinateConversion {
    fn default() -> Self {
        Self::basic_cartesian()
    }
}

// ── Directional ─────────────────────────────────────────────────

/// Converts local directional coordinates to a global unit vector and back.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalCoordinateConversion {
    system: DirectionalCoordinateSystem,
    frame: Frame,
}

impl DirectionalCoordinateConversion {
    /// Create a conversion for `system` whose local z-axis points along
    /// `axis` (normalised).
    pub fn new(
        system: DirectionalCoordinateSystem,
        axis: [f64; 3],
    ) -> Result<Self, ConfigurationError> {
        validate_vector("axis", axis)?;
        Ok(Self {
            system,
            frame: Frame::from_axis(axis)?,
        })
    }

    /// Global Cartesian directions with no rotation.
    pub fn basic_cartesian() -> Self {
        Self::basic(DirectionalCoordinateSystem::Cartesian)
    }

    /// `system` with the global z-axis.
    pub fn basic(system: DirectionalCoordinateSystem) -> Self {
        Self {
            system,
            frame: Frame::IDENTITY,
        }
    }

    /// The local coordinate system.
    pub fn system(&self) -> DirectionalCoordinateSystem {
        self.system
    }

    /// The (normalised) local z-axis in global coordinates.
    pub fn axis(&self) -> [f64; 3] {
        self.frame.z
    }

    /// Convert local directional coordinates to a global unit vector.
    ///
    /// A zero Cartesian vector is returned unchanged.
    pub fn to_cartesian(&self, local: [f64; 3]) -> [f64; 3] {
        let cartesian = match self.system {
            DirectionalCoordinateSystem::Cartesian => normalize(local),
            DirectionalCoordinateSystem::Spherical => {
                let [_, theta, mu] = local;
                spherical_to_cartesian([1.0, theta, mu])
            }
        };
        self.frame.to_global(cartesian)
    }

    /// Convert a global direction to local directional coordinates.
    pub fn from_cartesian(&self, global: [f64; 3]) -> [f64; 3] {
        let local = self.frame.to_local(normalize(global));
        match self.system {
            DirectionalCoordinateSystem::Cartesian => local,
            DirectionalCoordinateSystem::Spherical => {
                let [_, theta, mu] = cartesian_to_spherical(local);
                [1.0, theta, mu]
            }
        }
    }
}

impl Default for DirectionalCoordinateConversion {
    fn default() -> Self {
        Self::basic_cartesian()
    }
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let norm = dot(v, v).sqrt();
    if norm == 0.0 || !norm.is_finite() {
        v
    } else {
        v.map(|c| c / norm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn assert_close(actual: [f64; 3], expected: [f64; 3], tol: f64) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() <= tol,
                "component {i}: {actual:?} vs {expected:?}"
            );
        }
    }

    fn rotated(system: SpatialCoordinateSystem) -> SpatialCoordinateConversion {
        SpatialCoordinateConversion::new(system, [2.0, -1.0, 0.1], [1.0, 1.0, 1.0]).unwrap()
    }

    #[test]
    fn rotated_cartesian_to_global() {
        let conv = rotated(SpatialCoordinateSystem::Cartesian);
        let s = 2.0 / 3.0_f64.sqrt();
        assert_close(
            conv.to_cartesian([0.0, 0.0, 2.0]),
            [s + 2.0, s - 1.0, s + 0.1],
            1e-12,
        );
    }

    #[test]
    fn rotated_cylindrical_to_global() {
        let conv = rotated(SpatialCoordinateSystem::Cylindrical);
        let sqrt2 = 2.0_f64.sqrt();
        assert_close(
            conv.to_cartesian([2.0, 3.0 * PI / 2.0, 0.0]),
            [sqrt2 + 2.0, -sqrt2 - 1.0, 0.1],
            1e-12,
        );
    }

    #[test]
    fn rotated_spherical_to_global() {
        let conv = rotated(SpatialCoordinateSystem::Spherical);
        let inv_sqrt6 = 1.0 / 6.0_f64.sqrt();
        assert_close(
            conv.to_cartesian([2.0, PI, 0.0]),
            [
                -2.0 * inv_sqrt6 + 2.0,
                -2.0 * inv_sqrt6 - 1.0,
                (8.0_f64 / 3.0).sqrt() + 0.1,
            ],
            1e-12,
        );
    }

    #[test]
    fn spatial_round_trip_through_rotated_frame() {
        for system in [
            SpatialCoordinateSystem::Cartesian,
            SpatialCoordinateSystem::Cylindrical,
            SpatialCoordinateSystem::Spherical,
        ] {
            let conv = rotated(system);
            let global = [1.3, -0.4, 2.2];
            let back = conv.to_cartesian(conv.from_cartesian(global));
            assert_close(back, global, 1e-12);
        }
    }

    #[test]
    fn basic_spherical_from_global() {
        let conv = SpatialCoordinateConversion::basic(SpatialCoordinateSystem::Spherical);
        assert_close(conv.from_cartesian([0.0, 0.0, -2.0]), [2.0, 0.0, -1.0], 1e-14);
        assert_close(
            conv.from_cartesian([0.0, -2.0, 0.0]),
            [2.0, 3.0 * PI / 2.0, 0.0],
            1e-14,
        );
        assert_close(
            conv.from_cartesian([1.0, 1.0, 1.0]),
            [3.0_f64.sqrt(), PI / 4.0, 1.0 / 3.0_f64.sqrt()],
            1e-14,
        );
    }

    #[test]
    fn directional_cartesian_is_normalised() {
        let conv = DirectionalCoordinateConversion::basic_cartesian();
        let v = 1.0 / 3.0_f64.sqrt();
        assert_close(conv.to_cartesian([1.0, 1.0, 1.0]), [v, v, v], 1e-14);
    }

    #[test]
    fn rotated_directional_spherical_to_global() {
        let conv = DirectionalCoordinateConversion::new(
            DirectionalCoordinateSystem::Spherical,
            [1.0, 1.0, 1.0],
        )
        .unwrap();
        let h = 2.0_f64.sqrt() / 2.0;
        assert_close(conv.to_cartesian([1.0, PI / 2.0, 0.0]), [-h, h, 0.0], 1e-12);
    }

    #[test]
    fn basic_directional_spherical_from_global() {
        let conv = DirectionalCoordinateConversion::basic(DirectionalCoordinateSystem::Spherical);
        assert_close(conv.from_cartesian([0.0, 1.0, 0.0]), [1.0, PI / 2.0, 0.0], 1e-14);
        assert_close(conv.from_cartesian([0.0, 0.0, -1.0]), [1.0, 0.0, -1.0], 1e-14);
    }

    #[test]
    fn negative_z_axis_flips_frame() {
        let conv = SpatialCoordinateConversion::new(
            SpatialCoordinateSystem::Cartesian,
            [0.0; 3],
            [0.0, 0.0, -3.0],
        )
        .unwrap();
        assert_close(conv.to_cartesian([1.0, 1.0, 1.0]), [1.0, -1.0, -1.0], 1e-15);
    }

    #[test]
    fn zero_axis_is_rejected() {
        let err = SpatialCoordinateConversion::new(
            SpatialCoordinateSystem::Cartesian,
            [0.0; 3],
            [0.0; 3],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidCoordinateSystem { .. }
        ));
        assert!(DirectionalCoordinateConversion::new(
            DirectionalCoordinateSystem::Cartesian,
            [f64::NAN, 0.0, 1.0]
        )
        .is_err());
    }
}
