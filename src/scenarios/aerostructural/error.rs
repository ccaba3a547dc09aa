use thiserror::Error;

use crate::{
    builder::{BuilderError, Stage},
    support::{order::OrderError, pipeline::PipelineError},
};

use super::CouplingTopology;

/// Errors that can occur while assembling an aerostructural scenario.
///
/// Configuration errors are raised before any subsystem is requested from a
/// builder. Contract errors mean a builder did not honor [`Builder`]'s
/// contract and are not recoverable by the assembler.
///
/// [`Builder`]: crate::builder::Builder
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// An order override is invalid.
    #[error("invalid subsystem order: {0}")]
    Order(#[from] OrderError),

    /// The topology needs a transfer builder that was not supplied.
    #[error("{topology} coupling requires a load and displacement transfer builder")]
    MissingTransferBuilder { topology: CouplingTopology },

    /// A coupling order was given for a topology without a coupled block.
    #[error("a coupling order cannot be given for {topology} coupling")]
    CouplingOrderNotApplicable { topology: CouplingTopology },

    /// The coupling order separates `geo_disp` from `disp_xfer`.
    #[error("`geo_disp` must directly follow `disp_xfer` in the coupling order")]
    GeoDispNotAfterDispXfer,

    /// A builder was used before being initialized.
    #[error("{builder} builder must be initialized before subsystems are requested")]
    Uninitialized { builder: &'static str },

    /// A builder failed to initialize.
    #[error("{builder} builder failed to initialize")]
    Initialization {
        builder: &'static str,
        #[source]
        source: BuilderError,
    },

    /// A builder did not provide a stage the topology requires.
    #[error("{builder} builder did not provide a {stage} subsystem")]
    MissingStage {
        builder: &'static str,
        stage: Stage,
    },

    /// A subsystem does not use the standard name for a quantity.
    #[error("{stage} subsystem from the {builder} builder does not declare `{variable}`")]
    InconsistentVariable {
        builder: &'static str,
        stage: Stage,
        variable: &'static str,
    },

    /// A scenario that owns its meshes left inputs without a source.
    #[error("scenario `{scenario}` leaves inputs without a source: {inputs:?}")]
    UnconnectedInputs {
        scenario: String,
        inputs: Vec<String>,
    },

    /// Placing or wiring a member failed.
    #[error("pipeline wiring failed: {0}")]
    Pipeline(#[from] PipelineError),
}
