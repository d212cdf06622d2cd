//! The four interactive exercises.
//!
//! Each scene owns its controls and records into a [`DrawList`], so it can be
//! driven without a window.
//!
//! [`DrawList`]: crate::draw::DrawList

mod fov;
mod homogeneous;
mod linear;
mod orbits;

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::transforms::TransformError;
use crate::widgets::Panel;

pub use fov::FovScene;
pub use homogeneous::HomogeneousScene;
pub use linear::LinearScene;
pub use orbits::OrbitScene;

/// Exercise names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exercise {
    Fov,
    Linear,
    Homogeneous,
    Orbits,
}

impl Exercise {
    pub const ALL: [Exercise; 4] = [
        Exercise::Fov,
        Exercise::Linear,
        Exercise::Homogeneous,
        Exercise::Orbits,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Exercise::Fov => "fov",
            Exercise::Linear => "linear",
            Exercise::Homogeneous => "homogeneous",
            Exercise::Orbits => "orbits",
        }
    }

    /// Window title.
    pub fn title(self) -> &'static str {
        match self {
            Exercise::Fov => "Field of view",
            Exercise::Linear => "Linear transforms",
            Exercise::Homogeneous => "Homogeneous transforms",
            Exercise::Orbits => "Orbits",
        }
    }

    /// Whether the exercise draws a loaded mesh.
    pub fn uses_mesh(self) -> bool {
        !matches!(self, Exercise::Fov)
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown exercise {0:?}, expected one of: fov, linear, homogeneous, orbits")]
pub struct UnknownExercise(pub String);

impl FromStr for Exercise {
    type Err = UnknownExercise;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Exercise::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownExercise(s.to_string()))
    }
}

/// Three sliders editing the components of `v`.
fn vector_sliders(panel: &mut Panel<'_>, label: &str, v: &mut Vec3, min: f32, max: f32) -> bool {
    let x = panel.slider(&format!("{label} X"), &mut v.x, min, max);
    let y = panel.slider(&format!("{label} Y"), &mut v.y, min, max);
    let z = panel.slider(&format!("{label} Z"), &mut v.z, min, max);
    x || y || z
}

/// Warns about a degenerate projection once, until drawing succeeds again.
#[derive(Debug)]
struct DegenerateLog {
    what: &'static str,
    failing: bool,
}

impl DegenerateLog {
    fn new(what: &'static str) -> Self {
        Self {
            what,
            failing: false,
        }
    }

    /// Records this frame's outcome. Returns true when it logged.
    fn record(&mut self, error: Option<&TransformError>) -> bool {
        match (error, self.failing) {
            (Some(err), false) => {
                log::warn!("not drawing {}: {err}", self.what);
                self.failing = true;
                true
            }
            (None, true) => {
                log::info!("drawing {} again", self.what);
                self.failing = false;
                true
            }
            _ => false,
        }
    }
}
