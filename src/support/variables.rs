//! Canonical variable names shared by every builder and assembler.
//!
//! Subsystems connect purely by name equality, so these names are the wire
//! protocol between independently developed disciplines. A builder whose
//! subsystems use these names plugs into any scenario without glue code.
//!
//! The names are available both as constants grouped by discipline
//! (e.g., [`aerodynamics::surface::COORDINATES`]) and through the
//! [`Quantity`] enum when the quantity is chosen at runtime.

use std::fmt;

use crate::builder::Discipline;

/// Aerodynamic variable names.
pub mod aerodynamics {
    /// Variables living on the aerodynamic surface.
    pub mod surface {
        /// Undeformed surface coordinates (scenario input).
        pub const COORDINATES_INITIAL: &str = "x_aero0";
        /// Deformed surface coordinates (coupling state).
        pub const COORDINATES: &str = "x_aero";
        /// Surface displacements produced by displacement transfer.
        pub const DISPLACEMENTS: &str = "u_aero";
        /// Surface loads produced by the aerodynamic solver.
        pub const LOADS: &str = "f_aero";

        /// Mesh stage outputs.
        pub mod mesh {
            /// Coordinates produced by the aerodynamic mesh stage.
            pub const COORDINATES: &str = "x_aero0_mesh";
        }

        /// Geometry stage inputs and outputs.
        pub mod geometry {
            /// Coordinates entering the geometry parameterization.
            pub const COORDINATES_INPUT: &str = "x_aero0_geometry_input";
            /// Coordinates leaving the geometry parameterization.
            pub const COORDINATES_OUTPUT: &str = "x_aero0_geometry_output";
        }
    }
}

/// Structural variable names.
pub mod structures {
    /// Undeformed structural coordinates.
    pub const COORDINATES: &str = "x_struct0";
    /// Structural displacement state.
    pub const DISPLACEMENTS: &str = "u_struct";

    /// Loads applied to the structure.
    pub mod loads {
        /// Aerodynamic loads transferred onto the structure.
        pub const AERODYNAMIC: &str = "f_struct";
    }

    /// Mesh stage outputs.
    pub mod mesh {
        /// Coordinates produced by the structural mesh stage.
        pub const COORDINATES: &str = "x_struct0_mesh";
    }

    /// Geometry stage inputs and outputs.
    pub mod geometry {
        /// Coordinates entering the geometry parameterization.
        pub const COORDINATES_INPUT: &str = "x_struct0_geometry_input";
        /// Coordinates leaving the geometry parameterization.
        pub const COORDINATES_OUTPUT: &str = "x_struct0_geometry_output";
    }
}

/// A semantic quantity exchanged between subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    AeroCoordinatesInitial,
    AeroCoordinates,
    AeroDisplacements,
    AeroLoads,
    AeroMeshCoordinates,
    AeroGeometryInput,
    AeroGeometryOutput,
    StructCoordinates,
    StructDisplacements,
    StructAeroLoads,
    StructMeshCoordinates,
    StructGeometryInput,
    StructGeometryOutput,
}

impl Quantity {
    /// Returns the canonical variable name for this quantity.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AeroCoordinatesInitial => aerodynamics::surface::COORDINATES_INITIAL,
            Self::AeroCoordinates => aerodynamics::surface::COORDINATES,
            Self::AeroDisplacements => aerodynamics::surface::DISPLACEMENTS,
            Self::AeroLoads => aerodynamics::surface::LOADS,
            Self::AeroMeshCoordinates => aerodynamics::surface::mesh::COORDINATES,
            Self::AeroGeometryInput => aerodynamics::surface::geometry::COORDINATES_INPUT,
            Self::AeroGeometryOutput => aerodynamics::surface::geometry::COORDINATES_OUTPUT,
            Self::StructCoordinates => structures::COORDINATES,
            Self::StructDisplacements => structures::DISPLACEMENTS,
            Self::StructAeroLoads => structures::loads::AERODYNAMIC,
            Self::StructMeshCoordinates => structures::mesh::COORDINATES,
            Self::StructGeometryInput => structures::geometry::COORDINATES_INPUT,
            Self::StructGeometryOutput => structures::geometry::COORDINATES_OUTPUT,
        }
    }

    /// Undeformed coordinates a discipline's pre-coupling stage consumes.
    #[must_use]
    pub const fn initial_coordinates(discipline: Discipline) -> Self {
        match discipline {
            Discipline::Aero => Self::AeroCoordinatesInitial,
            Discipline::Struct => Self::StructCoordinates,
        }
    }

    /// Coordinates a discipline's mesh stage produces.
    #[must_use]
    pub const fn mesh_coordinates(discipline: Discipline) -> Self {
        match discipline {
            Discipline::Aero => Self::AeroMeshCoordinates,
            Discipline::Struct => Self::StructMeshCoordinates,
        }
    }

    /// Coordinates a geometry stage consumes for a discipline.
    #[must_use]
    pub const fn geometry_input(discipline: Discipline) -> Self {
        match discipline {
            Discipline::Aero => Self::AeroGeometryInput,
            Discipline::Struct => Self::StructGeometryInput,
        }
    }

    /// Coordinates a geometry stage produces for a discipline.
    #[must_use]
    pub const fn geometry_output(discipline: Discipline) -> Self {
        match discipline {
            Discipline::Aero => Self::AeroGeometryOutput,
            Discipline::Struct => Self::StructGeometryOutput,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl AsRef<str> for Quantity {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_routes_differ_from_mesh_and_scenario_names() {
        for discipline in [Discipline::Aero, Discipline::Struct] {
            let names = [
                Quantity::mesh_coordinates(discipline).name(),
                Quantity::geometry_input(discipline).name(),
                Quantity::geometry_output(discipline).name(),
                Quantity::initial_coordinates(discipline).name(),
            ];
            for (i, a) in names.iter().enumerate() {
                for b in &names[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(Quantity::AeroCoordinates.to_string(), "x_aero");
        assert_eq!(Quantity::StructAeroLoads.to_string(), "f_struct");
    }
}
