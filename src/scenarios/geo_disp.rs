//! Deformed aerodynamic surface coordinates.
//!
//! `geo_disp` sits inside the aerostructural coupling group right after
//! displacement transfer. It adds the transferred surface displacements to the
//! undeformed surface coordinates so the aerodynamic solver sees the deformed
//! shape. It is the one subsystem the assembler supplies itself.

use thiserror::Error;
use twine_core::Model;

use crate::support::{
    subsystem::{Subsystem, Variable},
    variables::aerodynamics::surface,
};

/// Coordinates are stored as interleaved `(x, y, z)` triples.
const COORDINATES_PER_NODE: usize = 3;

/// Errors that can occur while evaluating [`GeoDisp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoDispError {
    /// An input vector does not have the expected length.
    #[error("{variable} has {found} entries, expected {expected}")]
    ShapeMismatch {
        variable: &'static str,
        found: usize,
        expected: usize,
    },
}

/// Inputs to [`GeoDisp`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoDispInput {
    /// Undeformed surface coordinates.
    pub x_aero0: Vec<f64>,
    /// Surface displacements from transfer.
    pub u_aero: Vec<f64>,
}

/// Adds surface displacements to undeformed surface coordinates.
///
/// # Example
///
/// ```
/// use twine_core::Model;
/// use twine_coupling::scenarios::geo_disp::{GeoDisp, GeoDispInput};
///
/// let geo_disp = GeoDisp::new(Some(1));
/// let x_aero = geo_disp
///     .call(&GeoDispInput {
///         x_aero0: vec![1.0, 2.0, 3.0],
///         u_aero: vec![0.5, 0.0, -1.0],
///     })
///     .unwrap();
///
/// assert_eq!(x_aero, vec![1.5, 2.0, 2.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeoDisp {
    number_of_nodes: Option<usize>,
}

impl GeoDisp {
    /// Label reported by [`Subsystem::kind`].
    pub const KIND: &'static str = "GeoDisp";

    /// Creates the combination for a surface with the given node count.
    ///
    /// With `None`, lengths are only required to agree with each other.
    #[must_use]
    pub fn new(number_of_nodes: Option<usize>) -> Self {
        Self { number_of_nodes }
    }

    /// Describes this combination as a subsystem for placement.
    #[must_use]
    pub fn subsystem(&self) -> Subsystem {
        Subsystem::new(Self::KIND)
            .with_input(Variable::coordinates(surface::COORDINATES_INITIAL))
            .with_input(Variable::coupling(surface::DISPLACEMENTS))
            .with_output(Variable::coordinates(surface::COORDINATES))
    }

    fn expected_len(&self, input: &GeoDispInput) -> usize {
        self.number_of_nodes
            .map_or(input.x_aero0.len(), |n| n * COORDINATES_PER_NODE)
    }
}

impl Model for GeoDisp {
    type Input = GeoDispInput;
    type Output = Vec<f64>;
    type Error = GeoDispError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let expected = self.expected_len(input);

        for (variable, values) in [
            (surface::COORDINATES_INITIAL, &input.x_aero0),
            (surface::DISPLACEMENTS, &input.u_aero),
        ] {
            if values.len() != expected {
                return Err(GeoDispError::ShapeMismatch {
                    variable,
                    found: values.len(),
                    expected,
                });
            }
        }

        Ok(input
            .x_aero0
            .iter()
            .zip(&input.u_aero)
            .map(|(x, u)| x + u)
            .collect())
    }
}
