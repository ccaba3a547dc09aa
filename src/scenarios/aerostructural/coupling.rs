//! The coupled block iterated until aerodynamic and structural states agree.

use tracing::debug;

use crate::{
    builder::Stage,
    scenarios::geo_disp::GeoDisp,
    support::{
        order::{OrderContext, OrderError, check_order},
        pipeline::Group,
        subsystem::Subsystem,
        variables::{aerodynamics::surface, structures},
    },
};

use super::{
    AERO_BUILDER, AssemblyError, Builders, CouplingTopology, STRUCT_BUILDER, TRANSFER_BUILDER,
};

pub const DISP_XFER: &str = "disp_xfer";
pub const GEO_DISP: &str = "geo_disp";
pub const AERO: &str = "aero";
pub const LOAD_XFER: &str = "load_xfer";
pub const STRUCT: &str = "struct";

/// Default member order of the aerostructural coupled block.
pub const DEFAULT_ORDER: [&str; 5] = [DISP_XFER, GEO_DISP, AERO, LOAD_XFER, STRUCT];

/// The aerostructural coupled block.
///
/// Displacement transfer, `geo_disp`, aerodynamics, load transfer and
/// structures, all wired by the standard variable names.
pub struct CouplingAeroStructural;

impl CouplingAeroStructural {
    /// Label reported by [`Group::kind`].
    pub const KIND: &'static str = "CouplingAeroStructural";
}

/// Resolves the coupled block's member order for `topology`.
///
/// Returns an empty order for topologies without a coupled block.
pub(super) fn resolve_order(
    topology: CouplingTopology,
    requested: Option<&[String]>,
) -> Result<Vec<&'static str>, AssemblyError> {
    match (topology, requested) {
        (CouplingTopology::Aerostructural, None) => Ok(DEFAULT_ORDER.to_vec()),
        (CouplingTopology::Aerostructural, Some(requested)) => {
            let order = check_order(OrderContext::Coupling, requested, &DEFAULT_ORDER)?;
            let position = |name| order.iter().position(|n| *n == name);
            match (position(DISP_XFER), position(GEO_DISP)) {
                (Some(disp), Some(geo)) if geo == disp + 1 => Ok(order),
                _ => Err(AssemblyError::GeoDispNotAfterDispXfer),
            }
        }
        (topology, Some(_)) => Err(AssemblyError::CouplingOrderNotApplicable { topology }),
        (_, None) => Ok(Vec::new()),
    }
}

/// Builds the aerostructural coupled block in the given member order.
pub(super) fn build(
    scenario: &str,
    builders: &Builders<'_>,
    order: &[&str],
) -> Result<Group, AssemblyError> {
    let mut group = Group::new(CouplingAeroStructural::KIND);

    for name in order {
        let subsystem = match *name {
            DISP_XFER => displacement_xfer(scenario, builders)?,
            GEO_DISP => GeoDisp::new(builders.aero.number_of_nodes()).subsystem(),
            AERO => aero_coupling(scenario, builders)?,
            LOAD_XFER => load_xfer(scenario, builders)?,
            STRUCT => struct_coupling(scenario, builders)?,
            other => {
                return Err(OrderError::Unrecognized {
                    context: OrderContext::Coupling,
                    name: other.to_owned(),
                    valid: DEFAULT_ORDER.map(str::to_owned).to_vec(),
                }
                .into());
            }
        };
        debug!(scenario, member = *name, kind = subsystem.kind(), "coupling member placed");
        group.add(*name, subsystem)?;
    }

    Ok(group)
}

/// The aerodynamic coupling subsystem, required by every coupled topology.
pub(super) fn aero_coupling(
    scenario: &str,
    builders: &Builders<'_>,
) -> Result<Subsystem, AssemblyError> {
    let subsystem = builders
        .aero
        .coupling_group_subsystem(scenario)
        .ok_or(AssemblyError::MissingStage {
            builder: AERO_BUILDER,
            stage: Stage::Coupling,
        })?;
    require_output(subsystem, AERO_BUILDER, Stage::Coupling, surface::LOADS)
}

fn struct_coupling(scenario: &str, builders: &Builders<'_>) -> Result<Subsystem, AssemblyError> {
    let subsystem = builders
        .structure
        .coupling_group_subsystem(scenario)
        .ok_or(AssemblyError::MissingStage {
            builder: STRUCT_BUILDER,
            stage: Stage::Coupling,
        })?;
    require_output(subsystem, STRUCT_BUILDER, Stage::Coupling, structures::DISPLACEMENTS)
}

fn displacement_xfer(scenario: &str, builders: &Builders<'_>) -> Result<Subsystem, AssemblyError> {
    let stage = Stage::DisplacementTransfer;
    let subsystem = builders
        .transfer(CouplingTopology::Aerostructural)?
        .displacement_xfer_subsystem(scenario)
        .ok_or(AssemblyError::MissingStage {
            builder: TRANSFER_BUILDER,
            stage,
        })?;
    require_output(subsystem, TRANSFER_BUILDER, stage, surface::DISPLACEMENTS)
}

fn load_xfer(scenario: &str, builders: &Builders<'_>) -> Result<Subsystem, AssemblyError> {
    let stage = Stage::LoadTransfer;
    let subsystem = builders
        .transfer(CouplingTopology::Aerostructural)?
        .load_xfer_subsystem(scenario)
        .ok_or(AssemblyError::MissingStage {
            builder: TRANSFER_BUILDER,
            stage,
        })?;
    require_output(subsystem, TRANSFER_BUILDER, stage, structures::loads::AERODYNAMIC)
}

/// Passes `subsystem` through if it declares the standard output `variable`.
pub(super) fn require_output(
    subsystem: Subsystem,
    builder: &'static str,
    stage: Stage,
    variable: &'static str,
) -> Result<Subsystem, AssemblyError> {
    if subsystem.has_output(variable) {
        Ok(subsystem)
    } else {
        Err(AssemblyError::InconsistentVariable {
            builder,
            stage,
            variable,
        })
    }
}
