use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    builder::Discipline,
    support::{comm::Comm, variables::Quantity},
};

/// Which members of the coupled block exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouplingTopology {
    /// Displacement transfer, aerodynamics, load transfer and structures
    /// iterate together.
    #[default]
    Aerostructural,

    /// Only the aerodynamic solver is coupled; structural state flows from
    /// pre-coupling straight to post-coupling.
    AerodynamicsOnly,

    /// No coupled block at all.
    #[serde(rename = "none")]
    Uncoupled,
}

impl CouplingTopology {
    /// True if a transfer builder must be supplied.
    #[must_use]
    pub const fn requires_transfer_builder(self) -> bool {
        !matches!(self, Self::Uncoupled)
    }

    /// Scenario inputs that the coordinate source of `discipline` must feed.
    ///
    /// Outside full coupling nothing produces deformed aerodynamic
    /// coordinates, so the undeformed source feeds them as well.
    #[must_use]
    pub fn coordinate_targets(self, discipline: Discipline) -> Vec<Quantity> {
        match (self, discipline) {
            (Self::Aerostructural, Discipline::Aero) => vec![Quantity::AeroCoordinatesInitial],
            (_, Discipline::Aero) => {
                vec![Quantity::AeroCoordinatesInitial, Quantity::AeroCoordinates]
            }
            (_, Discipline::Struct) => vec![Quantity::StructCoordinates],
        }
    }
}

impl fmt::Display for CouplingTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Aerostructural => "aerostructural",
            Self::AerodynamicsOnly => "aerodynamics_only",
            Self::Uncoupled => "none",
        })
    }
}

/// Options for assembling an aerostructural scenario.
///
/// Order overrides list discipline tags (`"aero"`, `"struct"`) for the pre-
/// and post-coupling segments, and member names for the coupled block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Members of the coupled block.
    pub coupling: CouplingTopology,

    /// Execution order of the pre-coupling stages.
    pub pre_coupling_order: Option<Vec<String>>,

    /// Execution order of the post-coupling stages.
    pub post_coupling_order: Option<Vec<String>>,

    /// Execution order inside the coupled block.
    pub coupling_order: Option<Vec<String>>,

    /// True if the scenario owns its meshes and initializes its builders,
    /// as each scenario does under a parallel multipoint.
    pub in_multipoint_parallel: bool,

    /// Process group used to initialize builders in parallel mode.
    pub comm: Comm,
}
