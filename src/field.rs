//! Field containers, i.e. values stored at the cells, edges or nodes of a grid.
//!
//! Every container carries ghost or boundary slots around its interior values.
//! Operators read these slots but never write boundary conditions into them;
//! filling ghost cells with Dirichlet, Neumann or periodic data
//! before applying an operator is the caller's job.

mod arith;

pub mod cell;
#[doc(inline)]
pub use cell::CellData;

pub mod edge;
#[doc(inline)]
pub use edge::EdgeData;

pub mod node;
#[doc(inline)]
pub use node::NodeData;

use crate::grid::GridDims;

/// The three kinds of field container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// [`CellData`], values at cell centers.
    Cell,
    /// [`EdgeData`], normal components at edge midpoints.
    Edge,
    /// [`NodeData`], values at cell corners.
    Node,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldKind::Cell => "cell",
            FieldKind::Edge => "edge",
            FieldKind::Node => "node",
        };
        f.write_str(name)
    }
}

/// Error in constructing a field or applying an operation to one.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// A raw array doesn't have the padded shape its container requires,
    /// or the two components of an edge field imply different grids.
    #[error("shape mismatch in {component}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Which array was rejected.
        component: &'static str,
        /// The stored shape that was required.
        expected: (usize, usize),
        /// The shape that was given.
        found: (usize, usize),
    },
    /// Runtime grid dimensions disagree with the container's type-level tag.
    #[error("requested a {requested} grid, but the field type lives on a {tagged} grid")]
    DimensionMismatch {
        /// The dimensions that were asked for.
        requested: GridDims,
        /// The dimensions in the container's type.
        tagged: GridDims,
    },
    /// An operation was given a container kind it isn't defined for.
    #[error("{operation} is defined for {expected} data, got {found} data")]
    TypeMismatch {
        /// Name of the rejected operation.
        operation: &'static str,
        /// The kind the operation accepts.
        expected: FieldKind,
        /// The kind it was given.
        found: FieldKind,
    },
}

/// Check that `found` is the required shape, logging rejections.
pub(crate) fn check_shape(
    component: &'static str,
    expected: (usize, usize),
    found: (usize, usize),
) -> Result<(), FieldError> {
    if expected == found {
        return Ok(());
    }
    log::debug!("rejecting {component} array of shape {found:?}, expected {expected:?}");
    Err(FieldError::ShapeMismatch {
        component,
        expected,
        found,
    })
}

/// Check that runtime dimensions match a type-level tag.
pub(crate) fn check_dims<const NX: usize, const NY: usize>(
    nx: usize,
    ny: usize,
) -> Result<(), FieldError> {
    let requested = GridDims::new(nx, ny);
    let tagged = GridDims::of::<NX, NY>();
    if requested == tagged {
        return Ok(());
    }
    log::debug!("rejecting {requested} allocation for a {tagged} field type");
    Err(FieldError::DimensionMismatch { requested, tagged })
}
