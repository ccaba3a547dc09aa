//! The contract between discipline solvers and the scenario assemblers.
//!
//! A builder wraps one discipline (or one auxiliary mechanism such as load and
//! displacement transfer) and produces the subsystems for each pipeline stage.
//! Assemblers only ever borrow builders; the caller owns them.
//!
//! Builders are initialized once with the process group they run on, and must
//! be initialized before any stage is requested. [`BuilderState`] implements
//! that one-shot rule for builder authors.

use std::{cell::OnceCell, fmt};

use thiserror::Error;

use crate::support::{comm::Comm, subsystem::Subsystem};

/// Discipline participating in an aerostructural scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discipline {
    Aero,
    Struct,
}

impl Discipline {
    /// Both disciplines, in default execution order.
    pub const ALL: [Self; 2] = [Self::Aero, Self::Struct];

    /// Short tag used in member names and order overrides.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Aero => "aero",
            Self::Struct => "struct",
        }
    }

    /// Looks up a discipline by its tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.tag() == tag)
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Aero => "aerodynamics",
            Self::Struct => "structures",
        })
    }
}

/// Pipeline stage a subsystem is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Mesh,
    PreCoupling,
    Coupling,
    PostCoupling,
    DisplacementTransfer,
    LoadTransfer,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mesh => "mesh",
            Self::PreCoupling => "pre-coupling",
            Self::Coupling => "coupling",
            Self::PostCoupling => "post-coupling",
            Self::DisplacementTransfer => "displacement transfer",
            Self::LoadTransfer => "load transfer",
        })
    }
}

/// Errors reported by builders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// `initialize` was called on a builder that is already initialized.
    #[error("builder is already initialized")]
    AlreadyInitialized,

    /// The discipline solver could not be set up.
    #[error("builder initialization failed: {context}")]
    Initialization { context: String },
}

/// Capabilities every discipline builder provides.
///
/// Optional stages return `None` when the builder has nothing to contribute;
/// assemblers skip the stage and wiring stays name-consistent.
///
/// `scenario` is the name of the requesting scenario, so builders can tell
/// instances apart when several scenarios share one model.
pub trait Builder {
    /// Performs one-time setup on the given process group.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::AlreadyInitialized`] on a second call, or
    /// another [`BuilderError`] if setup fails.
    fn initialize(&self, comm: &Comm) -> Result<(), BuilderError>;

    /// True once [`Builder::initialize`] has succeeded.
    fn is_initialized(&self) -> bool;

    /// Subsystem producing this discipline's mesh coordinates.
    fn mesh_coordinate_subsystem(&self, _scenario: &str) -> Option<Subsystem> {
        None
    }

    /// Subsystem run once before the coupled iteration.
    fn pre_coupling_subsystem(&self, _scenario: &str) -> Option<Subsystem> {
        None
    }

    /// Subsystem taking part in the coupled iteration.
    fn coupling_group_subsystem(&self, _scenario: &str) -> Option<Subsystem> {
        None
    }

    /// Subsystem run once after the coupled iteration converges.
    fn post_coupling_subsystem(&self, _scenario: &str) -> Option<Subsystem> {
        None
    }

    /// Number of surface or mesh nodes owned by this process, if known.
    fn number_of_nodes(&self) -> Option<usize> {
        None
    }
}

/// A builder for load and displacement transfer between two disciplines.
///
/// Implementations are constructed from the aero and struct builders they
/// connect, so those must exist first.
pub trait TransferBuilder: Builder {
    /// Maps structural displacements onto the aerodynamic surface.
    fn displacement_xfer_subsystem(&self, scenario: &str) -> Option<Subsystem>;

    /// Maps aerodynamic loads onto the structure.
    fn load_xfer_subsystem(&self, scenario: &str) -> Option<Subsystem>;
}

/// A builder for shape parameterization.
///
/// Its [`Builder::mesh_coordinate_subsystem`] maps design variables to
/// perturbed coordinates for each discipline in [`GeometryBuilder::disciplines`].
pub trait GeometryBuilder: Builder {
    /// Disciplines whose coordinates this geometry perturbs.
    fn disciplines(&self) -> &[Discipline];

    /// True if this geometry perturbs `discipline`.
    fn affects(&self, discipline: Discipline) -> bool {
        self.disciplines().contains(&discipline)
    }
}

/// One-shot initialization cell for builder implementations.
///
/// # Example
///
/// ```
/// use twine_coupling::builder::{BuilderError, BuilderState};
/// use twine_coupling::support::comm::Comm;
///
/// let state = BuilderState::default();
/// assert!(!state.is_initialized());
///
/// state.initialize(&Comm::solo()).unwrap();
/// assert_eq!(state.comm(), Some(Comm::solo()));
/// assert_eq!(state.initialize(&Comm::solo()), Err(BuilderError::AlreadyInitialized));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuilderState {
    comm: OnceCell<Comm>,
}

impl BuilderState {
    /// Records the process group.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::AlreadyInitialized`] if called more than once.
    pub fn initialize(&self, comm: &Comm) -> Result<(), BuilderError> {
        self.comm
            .set(*comm)
            .map_err(|_| BuilderError::AlreadyInitialized)
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.comm.get().is_some()
    }

    /// The process group recorded at initialization.
    #[must_use]
    pub fn comm(&self) -> Option<Comm> {
        self.comm.get().copied()
    }
}
