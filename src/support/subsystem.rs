//! Subsystem descriptors and their tagged variables.
//!
//! A [`Subsystem`] describes a unit of computation by its declared inputs
//! and outputs. The numerics behind it belong to the discipline that built it;
//! assembly only needs names and tags to place and wire it.

use std::fmt;

/// Role a variable plays in the standard naming convention.
///
/// Tagged variables are promoted when their subsystem is placed into a
/// [`Group`](super::pipeline::Group), so they connect to same-named variables
/// of sibling members without explicit connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Mesh or surface coordinates.
    Coordinates,
    /// State exchanged during or around the coupled iteration.
    Coupling,
    /// Quantity of interest reported after convergence.
    Result,
    /// Design or operating-condition input.
    Input,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Coordinates => "mphys_coordinates",
            Self::Coupling => "mphys_coupling",
            Self::Result => "mphys_result",
            Self::Input => "mphys_input",
        })
    }
}

/// A named input or output of a subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    name: String,
    tag: Option<Tag>,
}

impl Variable {
    /// Creates a variable with an optional tag.
    pub fn new(name: impl Into<String>, tag: Option<Tag>) -> Self {
        Self {
            name: name.into(),
            tag,
        }
    }

    /// Creates a [`Tag::Coordinates`] variable.
    pub fn coordinates(name: impl AsRef<str>) -> Self {
        Self::new(name.as_ref(), Some(Tag::Coordinates))
    }

    /// Creates a [`Tag::Coupling`] variable.
    pub fn coupling(name: impl AsRef<str>) -> Self {
        Self::new(name.as_ref(), Some(Tag::Coupling))
    }

    /// Creates a [`Tag::Result`] variable.
    pub fn result(name: impl AsRef<str>) -> Self {
        Self::new(name.as_ref(), Some(Tag::Result))
    }

    /// Creates a [`Tag::Input`] variable.
    pub fn input(name: impl AsRef<str>) -> Self {
        Self::new(name.as_ref(), Some(Tag::Input))
    }

    /// Creates an untagged variable, addressable only through its member path.
    pub fn local(name: impl AsRef<str>) -> Self {
        Self::new(name.as_ref(), None)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    /// True if the variable takes part in promotion.
    #[must_use]
    pub fn is_tagged(&self) -> bool {
        self.tag.is_some()
    }
}

/// Descriptor of a single analysis component.
///
/// The `kind` names the implementation (e.g., `"AeroPreCouplingComp"`) so
/// callers can check which implementation ended up in a slot.
///
/// # Example
///
/// ```
/// use twine_coupling::support::subsystem::{Subsystem, Variable};
/// use twine_coupling::support::variables::aerodynamics::surface;
///
/// let pre = Subsystem::new("AeroPreCouplingComp")
///     .with_input(Variable::coordinates(surface::COORDINATES_INITIAL))
///     .with_output(Variable::coupling("prestate_aero"));
///
/// assert!(pre.has_input(surface::COORDINATES_INITIAL));
/// assert!(pre.has_output("prestate_aero"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsystem {
    kind: String,
    inputs: Vec<Variable>,
    outputs: Vec<Variable>,
}

impl Subsystem {
    /// Creates a subsystem with no variables.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Adds an input variable.
    #[must_use]
    pub fn with_input(mut self, variable: Variable) -> Self {
        self.inputs.push(variable);
        self
    }

    /// Adds an output variable.
    #[must_use]
    pub fn with_output(mut self, variable: Variable) -> Self {
        self.outputs.push(variable);
        self
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn inputs(&self) -> &[Variable] {
        &self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[Variable] {
        &self.outputs
    }

    /// True if an input with this name is declared.
    #[must_use]
    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.iter().any(|v| v.name() == name)
    }

    /// True if an output with this name is declared.
    #[must_use]
    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.iter().any(|v| v.name() == name)
    }
}
