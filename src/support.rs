//! Supporting utilities shared by scenario assemblers.
//!
//! These modules are public because builder implementations need them, but
//! their APIs are not yet stable.

pub mod comm;
pub mod order;
pub mod pipeline;
pub mod subsystem;
pub mod variables;
