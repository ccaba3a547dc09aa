//! Lightweight builders standing in for real discipline solvers.
//!
//! Each fake counts its subsystem requests so tests can confirm that failed
//! assemblies never reach the builders.

use std::cell::{Cell, RefCell};

use crate::{
    builder::{Builder, BuilderError, BuilderState, Discipline, GeometryBuilder, TransferBuilder},
    support::{
        comm::Comm,
        pipeline::Group,
        subsystem::{Subsystem, Variable},
        variables::{Quantity, aerodynamics::surface, structures},
    },
};

use super::ScenarioAeroStructural;

/// Bookkeeping shared by every fake.
#[derive(Debug, Default)]
struct Record {
    state: BuilderState,
    requests: Cell<usize>,
    scenarios: RefCell<Vec<String>>,
}

impl Record {
    fn request(&self, scenario: &str) {
        self.requests.set(self.requests.get() + 1);
        self.scenarios.borrow_mut().push(scenario.to_owned());
    }
}

macro_rules! impl_record_access {
    ($($fake:ty),*) => {$(
        // Not every fake needs every accessor.
        #[allow(dead_code)]
        impl $fake {
            /// Initializes on a single process, for tests that mimic an
            /// externally set up builder.
            pub(super) fn initialized(self) -> Self {
                self.record.state.initialize(&Comm::solo()).unwrap();
                self
            }

            /// Number of subsystems requested so far.
            pub(super) fn requests(&self) -> usize {
                self.record.requests.get()
            }

            /// Scenario names passed with each request.
            pub(super) fn scenarios(&self) -> Vec<String> {
                self.record.scenarios.borrow().clone()
            }

            pub(super) fn comm(&self) -> Option<Comm> {
                self.record.state.comm()
            }
        }
    )*};
}

impl_record_access!(FakeAero, FakeStruct, FakeLdXfer, FakeGeometry);

#[derive(Debug)]
pub(super) struct FakeAero {
    record: Record,
    initial_coordinates: &'static str,
    design_input: Option<&'static str>,
    loads: &'static str,
    coupled_post: bool,
    has_mesh: bool,
}

impl FakeAero {
    pub(super) fn new() -> Self {
        Self {
            record: Record::default(),
            initial_coordinates: surface::COORDINATES_INITIAL,
            design_input: None,
            loads: surface::LOADS,
            coupled_post: true,
            has_mesh: true,
        }
    }

    /// Post-coupling stage that needs no coupled state.
    pub(super) fn without_coupling(mut self) -> Self {
        self.coupled_post = false;
        self
    }

    /// Coupling stage with a nonstandard loads name.
    pub(super) fn with_loads_named(mut self, loads: &'static str) -> Self {
        self.loads = loads;
        self
    }

    pub(super) fn without_mesh(mut self) -> Self {
        self.has_mesh = false;
        self
    }

    /// Pre-coupling stage reading undeformed coordinates under another name.
    pub(super) fn with_initial_coordinates_named(mut self, name: &'static str) -> Self {
        self.initial_coordinates = name;
        self
    }

    /// Pre-coupling stage with a design input set from outside the scenario.
    pub(super) fn with_design_input(mut self, name: &'static str) -> Self {
        self.design_input = Some(name);
        self
    }
}

impl Builder for FakeAero {
    fn initialize(&self, comm: &Comm) -> Result<(), BuilderError> {
        self.record.state.initialize(comm)
    }

    fn is_initialized(&self) -> bool {
        self.record.state.is_initialized()
    }

    fn mesh_coordinate_subsystem(&self, scenario: &str) -> Option<Subsystem> {
        self.record.request(scenario);
        self.has_mesh.then(|| {
            Subsystem::new("AeroMeshComp")
                .with_output(Variable::coordinates(surface::mesh::COORDINATES))
        })
    }

    fn pre_coupling_subsystem(&self, scenario: &str) -> Option<Subsystem> {
        self.record.request(scenario);
        let pre = Subsystem::new("AeroPreCouplingComp")
            .with_input(Variable::coordinates(self.initial_coordinates))
            .with_output(Variable::coupling("prestate_aero"));
        Some(match self.design_input {
            Some(name) => pre.with_input(Variable::input(name)),
            None => pre,
        })
    }

    fn coupling_group_subsystem(&self, scenario: &str) -> Option<Subsystem> {
        self.record.request(scenario);
        Some(
            Subsystem::new("AeroCouplingComp")
                .with_input(Variable::coordinates(surface::COORDINATES))
                .with_input(Variable::coupling("prestate_aero"))
                .with_output(Variable::coupling(self.loads)),
        )
    }

    fn post_coupling_subsystem(&self, scenario: &str) -> Option<Subsystem> {
        self.record.request(scenario);
        let post = if self.coupled_post {
            Subsystem::new("AeroPostCouplingComp").with_input(Variable::coupling(surface::LOADS))
        } else {
            Subsystem::new("AeroPostCouplingCompForNoCoupling")
        };
        Some(
            post.with_input(Variable::coupling("prestate_aero"))
                .with_input(Variable::coordinates(surface::COORDINATES))
                .with_output(Variable::result("func_aero")),
        )
    }

    fn number_of_nodes(&self) -> Option<usize> {
        Some(3)
    }
}

#[derive(Debug)]
pub(super) struct FakeStruct {
    record: Record,
    coupled_post: bool,
    has_pre: bool,
}

impl FakeStruct {
    pub(super) fn new() -> Self {
        Self {
            record: Record::default(),
            coupled_post: true,
            has_pre: true,
        }
    }

    /// Post-coupling stage that needs no coupled state.
    pub(super) fn without_coupling(mut self) -> Self {
        self.coupled_post = false;
        self
    }

    /// No pre-coupling stage; the post stage then needs no pre-state either.
    pub(super) fn without_pre(mut self) -> Self {
        self.has_pre = false;
        self
    }
}

impl Builder for FakeStruct {
    fn initialize(&self, comm: &Comm) -> Result<(), BuilderError> {
        self.record.state.initialize(comm)
    }

    fn is_initialized(&self) -> bool {
        self.record.state.is_initialized()
    }

    fn mesh_coordinate_subsystem(&self, scenario: &str) -> Option<Subsystem> {
        self.record.request(scenario);
        Some(
            Subsystem::new("StructMeshComp")
                .with_output(Variable::coordinates(structures::mesh::COORDINATES)),
        )
    }

    fn pre_coupling_subsystem(&self, scenario: &str) -> Option<Subsystem> {
        self.record.request(scenario);
        self.has_pre.then(|| {
            Subsystem::new("StructPreCouplingComp")
                .with_input(Variable::coordinates(structures::COORDINATES))
                .with_output(Variable::coupling("prestate_struct"))
        })
    }

    fn coupling_group_subsystem(&self, scenario: &str) -> Option<Subsystem> {
        self.record.request(scenario);
        Some(
            Subsystem::new("StructCouplingComp")
                .with_input(Variable::coordinates(structures::COORDINATES))
                .with_input(Variable::coupling("prestate_struct"))
                .with_input(Variable::coupling(structures::loads::AERODYNAMIC))
                .with_output(Variable::coupling(structures::DISPLACEMENTS)),
        )
    }

    fn post_coupling_subsystem(&self, scenario: &str) -> Option<Subsystem> {
        self.record.request(scenario);
        let mut post = if self.coupled_post {
            Subsystem::new("StructPostCouplingComp")
                .with_input(Variable::coupling(structures::DISPLACEMENTS))
        } else {
            Subsystem::new("StructPostCouplingCompForNoCoupling")
        };
        if self.has_pre {
            post = post.with_input(Variable::coupling("prestate_struct"));
        }
        Some(
            post.with_input(Variable::coordinates(structures::COORDINATES))
                .with_output(Variable::result("func_struct")),
        )
    }

    fn number_of_nodes(&self) -> Option<usize> {
        Some(2)
    }
}

#[derive(Debug)]
pub(super) struct FakeLdXfer {
    record: Record,
    nodes: (Option<usize>, Option<usize>),
    has_load_xfer: bool,
}

impl FakeLdXfer {
    pub(super) fn new(aero: &dyn Builder, structure: &dyn Builder) -> Self {
        Self {
            record: Record::default(),
            nodes: (aero.number_of_nodes(), structure.number_of_nodes()),
            has_load_xfer: true,
        }
    }

    pub(super) fn without_load_xfer(mut self) -> Self {
        self.has_load_xfer = false;
        self
    }

    pub(super) fn nodes(&self) -> (Option<usize>, Option<usize>) {
        self.nodes
    }
}

impl Builder for FakeLdXfer {
    fn initialize(&self, comm: &Comm) -> Result<(), BuilderError> {
        self.record.state.initialize(comm)
    }

    fn is_initialized(&self) -> bool {
        self.record.state.is_initialized()
    }
}

impl TransferBuilder for FakeLdXfer {
    fn displacement_xfer_subsystem(&self, scenario: &str) -> Option<Subsystem> {
        self.record.request(scenario);
        Some(
            Subsystem::new("DispXferComp")
                .with_input(Variable::coordinates(structures::COORDINATES))
                .with_input(Variable::coordinates(surface::COORDINATES_INITIAL))
                .with_input(Variable::coupling(structures::DISPLACEMENTS))
                .with_output(Variable::coupling(surface::DISPLACEMENTS)),
        )
    }

    fn load_xfer_subsystem(&self, scenario: &str) -> Option<Subsystem> {
        self.record.request(scenario);
        self.has_load_xfer.then(|| {
            Subsystem::new("LoadXferComp")
                .with_input(Variable::coordinates(structures::COORDINATES))
                .with_input(Variable::coordinates(surface::COORDINATES_INITIAL))
                .with_input(Variable::coupling(structures::DISPLACEMENTS))
                .with_input(Variable::coupling(surface::LOADS))
                .with_output(Variable::coupling(structures::loads::AERODYNAMIC))
        })
    }
}

#[derive(Debug)]
pub(super) struct FakeGeometry {
    record: Record,
    disciplines: Vec<Discipline>,
}

impl FakeGeometry {
    pub(super) fn new(disciplines: &[Discipline]) -> Self {
        Self {
            record: Record::default(),
            disciplines: disciplines.to_vec(),
        }
    }
}

impl Builder for FakeGeometry {
    fn initialize(&self, comm: &Comm) -> Result<(), BuilderError> {
        self.record.state.initialize(comm)
    }

    fn is_initialized(&self) -> bool {
        self.record.state.is_initialized()
    }

    fn mesh_coordinate_subsystem(&self, scenario: &str) -> Option<Subsystem> {
        self.record.request(scenario);
        let geometry = self
            .disciplines
            .iter()
            .fold(Subsystem::new("Geometry"), |geometry, &discipline| {
                geometry
                    .with_input(Variable::coordinates(Quantity::geometry_input(discipline)))
                    .with_output(Variable::coordinates(Quantity::geometry_output(discipline)))
            });
        Some(geometry)
    }
}

impl GeometryBuilder for FakeGeometry {
    fn disciplines(&self) -> &[Discipline] {
        &self.disciplines
    }
}

/// Places externally owned meshes next to `scenario` in a fresh model and
/// connects them the way a single-scenario driver would.
pub(super) fn model_with_external_meshes(
    aero: &FakeAero,
    structure: &FakeStruct,
    scenario: ScenarioAeroStructural,
) -> Group {
    let mut model = Group::new("Model");
    let name = scenario.name().to_owned();

    let mut links = Vec::new();
    let meshes = [(Discipline::Aero, "aero_mesh"), (Discipline::Struct, "struct_mesh")];
    for (discipline, member) in meshes {
        let source = format!("{member}.{}", Quantity::mesh_coordinates(discipline));
        for target in scenario.external_coordinate_inputs(discipline) {
            links.push((source.clone(), format!("{name}.{target}")));
        }
    }

    let aero_mesh = aero.mesh_coordinate_subsystem("model").unwrap();
    let struct_mesh = structure.mesh_coordinate_subsystem("model").unwrap();
    model.add_unpromoted("aero_mesh", aero_mesh).unwrap();
    model.add_unpromoted("struct_mesh", struct_mesh).unwrap();
    model.add_unpromoted(name, scenario).unwrap();

    for (source, target) in links {
        model.connect(source, target).unwrap();
    }

    model
}
