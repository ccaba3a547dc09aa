//! Coupled multidisciplinary scenarios.
//!
//! A scenario asks discipline builders for their subsystems and places them
//! in a [`Group`](crate::support::pipeline::Group) in execution order, wired
//! by the standard variable names in [`variables`](crate::support::variables).

pub mod aerostructural;
pub mod geo_disp;
