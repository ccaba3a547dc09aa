//! # Twine Coupling
//!
//! Assembly of coupled aerostructural scenarios from discipline builders.
//!
//! ## Crate layout
//!
//! - [`builder`]: The contract discipline builders implement.
//! - [`scenarios`]: Scenario assemblers and the small models they own.
//! - [`support`]: Wiring, ordering and naming utilities used by scenarios.
//!
//! ## Assembling a scenario
//!
//! Builders are initialized once, then lend their subsystems to any number
//! of scenarios. A scenario validates its configuration up front and either
//! returns a fully wired [`Group`](support::pipeline::Group) or an error; it
//! never hands back a partial assembly.
//!
//! Modules in [`support`] are public because builder implementations need
//! them, but their APIs are not stable. Breaking changes may occur as needed.

pub mod builder;
pub mod scenarios;
pub mod support;
