//! Fields whose kind is only known at runtime.
//!
//! The typed API rejects mismatched kinds at compile time.
//! Code that has to choose a container kind at runtime
//! (e.g. a solver reading field definitions from a configuration)
//! can wrap fields in [`AnyField`], whose operators check the kind on every call
//! and fail with [`FieldError::TypeMismatch`] instead of coercing.
//!
//! ```
//! # use stagger::{CellData, FieldError, FieldKind, dynamic::AnyField};
//! let p = AnyField::from(CellData::<4, 4>::zeros());
//! assert_eq!(
//!     p.divergence().unwrap_err(),
//!     FieldError::TypeMismatch {
//!         operation: "divergence",
//!         expected: FieldKind::Edge,
//!         found: FieldKind::Cell,
//!     },
//! );
//! ```

use crate::{
    field::{FieldError, FieldKind},
    inner::InnerProduct,
    operator, CellData, EdgeData, NodeData,
};

/// A field container of any kind on an `NX` by `NY` grid.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyField<const NX: usize, const NY: usize> {
    /// Cell-centered data.
    Cell(CellData<NX, NY>),
    /// Edge-centered data.
    Edge(EdgeData<NX, NY>),
    /// Node-centered data.
    Node(NodeData<NX, NY>),
}

impl<const NX: usize, const NY: usize> AnyField<NX, NY> {
    /// Zero data of the given kind.
    pub fn zeros(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Cell => Self::Cell(CellData::zeros()),
            FieldKind::Edge => Self::Edge(EdgeData::zeros()),
            FieldKind::Node => Self::Node(NodeData::zeros()),
        }
    }

    /// Which kind of container this is.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Cell(_) => FieldKind::Cell,
            Self::Edge(_) => FieldKind::Edge,
            Self::Node(_) => FieldKind::Node,
        }
    }

    /// Borrow the cell data, or fail naming `operation`.
    pub fn as_cell(&self, operation: &'static str) -> Result<&CellData<NX, NY>, FieldError> {
        match self {
            Self::Cell(c) => Ok(c),
            other => Err(other.mismatch(operation, FieldKind::Cell)),
        }
    }

    /// Borrow the edge data, or fail naming `operation`.
    pub fn as_edge(&self, operation: &'static str) -> Result<&EdgeData<NX, NY>, FieldError> {
        match self {
            Self::Edge(e) => Ok(e),
            other => Err(other.mismatch(operation, FieldKind::Edge)),
        }
    }

    /// Borrow the node data, or fail naming `operation`.
    pub fn as_node(&self, operation: &'static str) -> Result<&NodeData<NX, NY>, FieldError> {
        match self {
            Self::Node(n) => Ok(n),
            other => Err(other.mismatch(operation, FieldKind::Node)),
        }
    }

    fn mismatch(&self, operation: &'static str, expected: FieldKind) -> FieldError {
        let found = self.kind();
        log::debug!("{operation} rejected {found} data");
        FieldError::TypeMismatch {
            operation,
            expected,
            found,
        }
    }

    /// [`divergence`][operator::divergence], defined for edge data.
    pub fn divergence(&self) -> Result<Self, FieldError> {
        Ok(Self::Cell(operator::divergence(self.as_edge("divergence")?)))
    }

    /// [`gradient`][operator::gradient], defined for cell data.
    pub fn gradient(&self) -> Result<Self, FieldError> {
        Ok(Self::Edge(operator::gradient(self.as_cell("gradient")?)))
    }

    /// [`rot`][operator::rot], defined for edge data.
    pub fn rot(&self) -> Result<Self, FieldError> {
        Ok(Self::Node(operator::rot(self.as_edge("rot")?)))
    }

    /// [`curl`][operator::curl]: vorticity of edge data,
    /// perpendicular gradient of node data.
    /// Cell data has no curl.
    pub fn curl(&self) -> Result<Self, FieldError> {
        match self {
            Self::Edge(e) => Ok(Self::Node(operator::rot(e))),
            Self::Node(n) => Ok(Self::Edge(operator::curl_of_nodes(n))),
            // either of the other two kinds would do; report the usual input
            Self::Cell(_) => Err(self.mismatch("curl", FieldKind::Node)),
        }
    }

    /// [`laplacian`][operator::laplacian], defined for cell data.
    pub fn laplacian(&self) -> Result<Self, FieldError> {
        Ok(Self::Cell(operator::laplacian(self.as_cell("laplacian")?)))
    }

    /// Inner product with another field of the same kind.
    pub fn dot(&self, other: &Self) -> Result<f64, FieldError> {
        match (self, other) {
            (Self::Cell(a), Self::Cell(b)) => Ok(a.dot(b)),
            (Self::Edge(a), Self::Edge(b)) => Ok(a.dot(b)),
            (Self::Node(a), Self::Node(b)) => Ok(a.dot(b)),
            (a, b) => Err(b.mismatch("dot", a.kind())),
        }
    }

    /// The L2 norm.
    pub fn norm(&self) -> f64 {
        match self {
            Self::Cell(c) => c.dot(c).sqrt(),
            Self::Edge(e) => e.dot(e).sqrt(),
            Self::Node(n) => n.dot(n).sqrt(),
        }
    }
}

impl<const NX: usize, const NY: usize> From<CellData<NX, NY>> for AnyField<NX, NY> {
    fn from(c: CellData<NX, NY>) -> Self {
        Self::Cell(c)
    }
}

impl<const NX: usize, const NY: usize> From<EdgeData<NX, NY>> for AnyField<NX, NY> {
    fn from(e: EdgeData<NX, NY>) -> Self {
        Self::Edge(e)
    }
}

impl<const NX: usize, const NY: usize> From<NodeData<NX, NY>> for AnyField<NX, NY> {
    fn from(n: NodeData<NX, NY>) -> Self {
        Self::Node(n)
    }
}
