//! Aerostructural scenario assembly.
//!
//! [`ScenarioAeroStructural`] composes aerodynamic and structural builders,
//! plus optional transfer and geometry builders, into an ordered group:
//!
//! ```text
//! [aero_mesh, struct_mesh, [geometry]]  aero_pre, struct_pre  <coupling>  aero_post, struct_post
//!  parallel mode only                    pre-coupling                      post-coupling
//! ```
//!
//! `<coupling>` is the [`CouplingAeroStructural`] group named `coupling`, the
//! bare aerodynamic coupling subsystem named `aero`, or nothing, depending on
//! the [`CouplingTopology`]. Pre- and post-coupling order can be overridden
//! with discipline tags; the coupled slot always sits between the two.
//!
//! Every configuration check runs before any builder is asked for a
//! subsystem, and assembly either returns a complete scenario or an
//! [`AssemblyError`].

mod config;
mod coupling;
mod error;

#[cfg(test)]
mod test_support;

pub use config::{CouplingTopology, ScenarioConfig};
pub use coupling::{CouplingAeroStructural, DEFAULT_ORDER as DEFAULT_COUPLING_ORDER};
pub use error::AssemblyError;

use tracing::{debug, info, warn};

use crate::{
    builder::{Builder, Discipline, GeometryBuilder, Stage, TransferBuilder},
    support::{
        comm::Comm,
        order::{OrderContext, check_order},
        pipeline::{Group, Member},
        subsystem::{Subsystem, Tag},
        variables::Quantity,
    },
};

use coupling::require_output;

/// Builder names used in error messages.
pub const AERO_BUILDER: &str = "aerodynamics";
pub const STRUCT_BUILDER: &str = "structures";
pub const TRANSFER_BUILDER: &str = "load and displacement transfer";
pub const GEOMETRY_BUILDER: &str = "geometry";

/// Member name of the coupled block under full coupling.
pub const COUPLING: &str = "coupling";
/// Member name of the geometry stage.
pub const GEOMETRY: &str = "geometry";

/// Builders taking part in a scenario.
///
/// All builders are borrowed; the caller keeps ownership and may share them
/// between scenarios.
#[derive(Clone, Copy)]
pub struct Builders<'a> {
    pub aero: &'a dyn Builder,
    pub structure: &'a dyn Builder,
    pub ldxfer: Option<&'a dyn TransferBuilder>,
    pub geometry: Option<&'a dyn GeometryBuilder>,
}

impl<'a> Builders<'a> {
    /// Starts from the two discipline builders.
    #[must_use]
    pub fn new(aero: &'a dyn Builder, structure: &'a dyn Builder) -> Self {
        Self {
            aero,
            structure,
            ldxfer: None,
            geometry: None,
        }
    }

    /// Adds the load and displacement transfer builder.
    #[must_use]
    pub fn with_ldxfer(mut self, ldxfer: &'a dyn TransferBuilder) -> Self {
        self.ldxfer = Some(ldxfer);
        self
    }

    /// Adds the geometry builder.
    #[must_use]
    pub fn with_geometry(mut self, geometry: &'a dyn GeometryBuilder) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// The builder for `discipline`.
    #[must_use]
    pub fn discipline(&self, discipline: Discipline) -> &'a dyn Builder {
        match discipline {
            Discipline::Aero => self.aero,
            Discipline::Struct => self.structure,
        }
    }

    fn transfer(
        &self,
        topology: CouplingTopology,
    ) -> Result<&'a dyn TransferBuilder, AssemblyError> {
        self.ldxfer
            .ok_or(AssemblyError::MissingTransferBuilder { topology })
    }
}

const fn builder_name(discipline: Discipline) -> &'static str {
    match discipline {
        Discipline::Aero => AERO_BUILDER,
        Discipline::Struct => STRUCT_BUILDER,
    }
}

/// An assembled aerostructural scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioAeroStructural {
    name: String,
    topology: CouplingTopology,
    in_multipoint_parallel: bool,
    group: Group,
}

impl ScenarioAeroStructural {
    /// Label reported by [`Group::kind`].
    pub const KIND: &'static str = "ScenarioAeroStructural";

    /// Assembles a scenario named `name`.
    ///
    /// The name is passed to every builder request so builders can tell
    /// scenarios apart.
    ///
    /// # Errors
    ///
    /// Returns an [`AssemblyError`] if the configuration is invalid, a
    /// builder is not initialized, a builder breaks its contract, or members
    /// cannot be wired.
    pub fn new(
        name: impl Into<String>,
        builders: Builders<'_>,
        config: &ScenarioConfig,
    ) -> Result<Self, AssemblyError> {
        let name = name.into();
        let topology = config.coupling;
        let parallel = config.in_multipoint_parallel;

        if topology.requires_transfer_builder() {
            builders.transfer(topology)?;
        }
        if builders.geometry.is_some() && !parallel {
            warn!(
                scenario = %name,
                "geometry builder ignored; geometry is only placed in multipoint parallel scenarios"
            );
        }

        let pre_order =
            segment_order(OrderContext::PreCoupling, config.pre_coupling_order.as_deref())?;
        let post_order =
            segment_order(OrderContext::PostCoupling, config.post_coupling_order.as_deref())?;
        let coupling_order = coupling::resolve_order(topology, config.coupling_order.as_deref())?;

        if parallel {
            initialize_builders(&builders, &config.comm)?;
        }
        ensure_initialized(&builders, topology, parallel)?;

        let mut group = Group::new(Self::KIND);

        if parallel {
            add_mesh_and_geometry(&mut group, &name, &builders)?;
        }

        for discipline in pre_order {
            let builder = builders.discipline(discipline);
            if let Some(subsystem) = builder.pre_coupling_subsystem(&name) {
                place(&mut group, &name, format!("{}_pre", discipline.tag()), subsystem)?;
            }
        }

        match topology {
            CouplingTopology::Aerostructural => {
                let block = coupling::build(&name, &builders, &coupling_order)?;
                place(&mut group, &name, COUPLING, block)?;
            }
            CouplingTopology::AerodynamicsOnly => {
                let aero = coupling::aero_coupling(&name, &builders)?;
                place(&mut group, &name, coupling::AERO, aero)?;
            }
            CouplingTopology::Uncoupled => {}
        }

        for discipline in post_order {
            let builder = builders.discipline(discipline);
            if let Some(subsystem) = builder.post_coupling_subsystem(&name) {
                place(&mut group, &name, format!("{}_post", discipline.tag()), subsystem)?;
            }
        }

        if parallel {
            connect_coordinates(&mut group, &builders, topology)?;
            ensure_self_contained(&group, &name, topology)?;
        }

        info!(
            scenario = %name,
            %topology,
            parallel,
            order = ?group.order(),
            "scenario assembled"
        );

        Ok(Self {
            name,
            topology,
            in_multipoint_parallel: parallel,
            group,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn topology(&self) -> CouplingTopology {
        self.topology
    }

    #[must_use]
    pub fn is_multipoint_parallel(&self) -> bool {
        self.in_multipoint_parallel
    }

    /// The assembled members and their wiring.
    #[must_use]
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Consumes the scenario, returning its group.
    #[must_use]
    pub fn into_group(self) -> Group {
        self.group
    }

    /// Member names in execution order.
    #[must_use]
    pub fn order(&self) -> Vec<&str> {
        self.group.order()
    }

    /// Returns the named member if it is a single subsystem.
    #[must_use]
    pub fn subsystem(&self, name: &str) -> Option<&Subsystem> {
        self.group.subsystem(name)
    }

    /// The coupled block, present under full coupling only.
    #[must_use]
    pub fn coupling(&self) -> Option<&Group> {
        self.group.group(COUPLING)
    }

    /// Coordinate inputs still waiting for `discipline`'s mesh.
    ///
    /// In single-scenario mode the mesh lives outside the scenario; connect
    /// its coordinates to each of these names. When a geometry stage
    /// perturbs the discipline, its input is listed instead of the stages'.
    #[must_use]
    pub fn external_coordinate_inputs(&self, discipline: Discipline) -> Vec<&'static str> {
        open_coordinate_inputs(&self.group, self.topology, discipline)
    }
}

impl From<ScenarioAeroStructural> for Member {
    fn from(scenario: ScenarioAeroStructural) -> Self {
        Self::Group(scenario.into_group())
    }
}

/// Resolves a pre- or post-coupling order of discipline tags.
fn segment_order(
    context: OrderContext,
    requested: Option<&[String]>,
) -> Result<Vec<Discipline>, AssemblyError> {
    let canonical = Discipline::ALL.map(Discipline::tag);
    let order = match requested {
        Some(requested) => check_order(context, requested, &canonical)?,
        None => canonical.to_vec(),
    };
    Ok(order.into_iter().filter_map(Discipline::from_tag).collect())
}

fn place(
    group: &mut Group,
    scenario: &str,
    name: impl Into<String>,
    member: impl Into<Member>,
) -> Result<(), AssemblyError> {
    let name = name.into();
    let member = member.into();
    debug!(scenario, member = %name, kind = member.kind(), "member placed");
    group.add(name, member)?;
    Ok(())
}

/// Initializes every supplied builder that is not yet initialized.
fn initialize_builders(builders: &Builders<'_>, comm: &Comm) -> Result<(), AssemblyError> {
    initialize(builders.aero, AERO_BUILDER, comm)?;
    initialize(builders.structure, STRUCT_BUILDER, comm)?;
    if let Some(ldxfer) = builders.ldxfer {
        initialize(ldxfer, TRANSFER_BUILDER, comm)?;
    }
    if let Some(geometry) = builders.geometry {
        initialize(geometry, GEOMETRY_BUILDER, comm)?;
    }
    Ok(())
}

fn initialize<B: Builder + ?Sized>(
    builder: &B,
    name: &'static str,
    comm: &Comm,
) -> Result<(), AssemblyError> {
    if builder.is_initialized() {
        debug!(builder = name, "already initialized");
        return Ok(());
    }
    builder
        .initialize(comm)
        .map_err(|source| AssemblyError::Initialization {
            builder: name,
            source,
        })
}

/// Checks that every builder the scenario will call is initialized.
fn ensure_initialized(
    builders: &Builders<'_>,
    topology: CouplingTopology,
    parallel: bool,
) -> Result<(), AssemblyError> {
    let mut required: Vec<(bool, &'static str)> = vec![
        (builders.aero.is_initialized(), AERO_BUILDER),
        (builders.structure.is_initialized(), STRUCT_BUILDER),
    ];
    if topology == CouplingTopology::Aerostructural {
        let ldxfer = builders.transfer(topology)?;
        required.push((ldxfer.is_initialized(), TRANSFER_BUILDER));
    }
    if let (true, Some(geometry)) = (parallel, builders.geometry) {
        required.push((geometry.is_initialized(), GEOMETRY_BUILDER));
    }

    match required.into_iter().find(|(ready, _)| !ready) {
        Some((_, builder)) => Err(AssemblyError::Uninitialized { builder }),
        None => Ok(()),
    }
}

/// Places the scenario-owned mesh stages and the optional geometry stage.
fn add_mesh_and_geometry(
    group: &mut Group,
    scenario: &str,
    builders: &Builders<'_>,
) -> Result<(), AssemblyError> {
    for discipline in Discipline::ALL {
        let builder = builders.discipline(discipline);
        if let Some(mesh) = builder.mesh_coordinate_subsystem(scenario) {
            let mesh = require_output(
                mesh,
                builder_name(discipline),
                Stage::Mesh,
                Quantity::mesh_coordinates(discipline).name(),
            )?;
            place(group, scenario, format!("{}_mesh", discipline.tag()), mesh)?;
        }
    }

    if let Some(geometry) = builders.geometry {
        let mut subsystem = geometry.mesh_coordinate_subsystem(scenario).ok_or(
            AssemblyError::MissingStage {
                builder: GEOMETRY_BUILDER,
                stage: Stage::Mesh,
            },
        )?;
        for &discipline in geometry.disciplines() {
            let input = Quantity::geometry_input(discipline).name();
            if !subsystem.has_input(input) {
                return Err(AssemblyError::InconsistentVariable {
                    builder: GEOMETRY_BUILDER,
                    stage: Stage::Mesh,
                    variable: input,
                });
            }
            let output = Quantity::geometry_output(discipline).name();
            subsystem = require_output(subsystem, GEOMETRY_BUILDER, Stage::Mesh, output)?;
        }
        place(group, scenario, GEOMETRY, subsystem)?;
    }

    Ok(())
}

/// Routes each scenario-owned mesh, through geometry if it applies, into the
/// coordinate inputs of the assembled stages.
///
/// Geometry output feeds its discipline's stages even when the mesh is
/// absent; the geometry input is then left for the caller.
fn connect_coordinates(
    group: &mut Group,
    builders: &Builders<'_>,
    topology: CouplingTopology,
) -> Result<(), AssemblyError> {
    let inputs = group.inputs();
    let outputs = group.outputs();

    for discipline in Discipline::ALL {
        let mesh = Quantity::mesh_coordinates(discipline).name();
        let mut source = outputs.iter().any(|o| o == mesh).then_some(mesh);

        if builders.geometry.is_some_and(|g| g.affects(discipline)) {
            if let Some(mesh) = source {
                group.connect(mesh, Quantity::geometry_input(discipline).name())?;
            }
            source = Some(Quantity::geometry_output(discipline).name());
        }

        let Some(source) = source else {
            debug!(%discipline, "no scenario-owned coordinate source");
            continue;
        };

        for target in topology.coordinate_targets(discipline) {
            let target = target.name();
            if inputs.iter().any(|i| i == target) {
                group.connect(source, target)?;
            } else {
                debug!(%discipline, target, "no stage consumes coordinates");
            }
        }
    }

    Ok(())
}

/// Coordinate inputs of `group` still waiting for `discipline`'s mesh.
fn open_coordinate_inputs(
    group: &Group,
    topology: CouplingTopology,
    discipline: Discipline,
) -> Vec<&'static str> {
    let open = group.unconnected_inputs();
    std::iter::once(Quantity::geometry_input(discipline))
        .chain(topology.coordinate_targets(discipline))
        .map(Quantity::name)
        .filter(|name| open.iter().any(|input| input == name))
        .collect()
}

/// Checks that a scenario owning its meshes leaves nothing unwired.
///
/// Design inputs and the coordinates of meshes a builder did not provide are
/// expected to come from outside.
fn ensure_self_contained(
    group: &Group,
    scenario: &str,
    topology: CouplingTopology,
) -> Result<(), AssemblyError> {
    let external: Vec<&str> = Discipline::ALL
        .into_iter()
        .flat_map(|discipline| open_coordinate_inputs(group, topology, discipline))
        .collect();

    let inputs: Vec<String> = group
        .open_inputs()
        .into_iter()
        .filter(|(name, tag)| *tag != Some(Tag::Input) && !external.contains(&name.as_str()))
        .map(|(name, _)| name)
        .collect();

    if inputs.is_empty() {
        Ok(())
    } else {
        Err(AssemblyError::UnconnectedInputs {
            scenario: scenario.to_owned(),
            inputs,
        })
    }
}
