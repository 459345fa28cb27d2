//! Node-centered scalar fields.

use nalgebra as na;

use super::{check_dims, check_shape, FieldError, FieldKind};
use crate::{
    grid::{GridDims, GridField},
    Vec2,
};

/// Scalar values at the corners of cells, e.g. vorticity or a stream function.
///
/// Stored in an `(NX + 1) x (NY + 1)` matrix with no ghost layer.
/// Node `(i, j)` is the corner shared by cells `(i, j)` and `(i + 1, j + 1)`
/// of a [`CellData`][crate::CellData],
/// so rows `0` and `NX` and columns `0` and `NY` lie on the domain boundary
/// and the four corners of the matrix are the corners of the domain.
#[derive(Clone, PartialEq)]
pub struct NodeData<const NX: usize, const NY: usize> {
    /// The underlying matrix of values, exposed for convenience.
    ///
    /// Note that resizing this matrix at runtime breaks the shape invariant
    /// and will cause a panic when an operator is applied.
    /// Use with caution.
    pub values: na::DMatrix<f64>,
}

impl<const NX: usize, const NY: usize> NodeData<NX, NY> {
    /// The stored shape, boundary nodes included.
    pub const SHAPE: (usize, usize) = (NX + 1, NY + 1);

    /// Node data with every value set to zero.
    #[inline]
    pub fn zeros() -> Self {
        Self::filled(0.0)
    }

    /// Node data with every value set to `value`.
    #[inline]
    pub fn filled(value: f64) -> Self {
        Self {
            values: na::DMatrix::from_element(Self::SHAPE.0, Self::SHAPE.1, value),
        }
    }

    /// Zero node data for a grid given at runtime.
    ///
    /// Fails with [`FieldError::DimensionMismatch`]
    /// if `(nx, ny)` isn't the type-level `(NX, NY)`.
    pub fn zeros_with_dims(nx: usize, ny: usize) -> Result<Self, FieldError> {
        check_dims::<NX, NY>(nx, ny)?;
        Ok(Self::zeros())
    }

    /// Zero node data on the same grid as another container of any kind.
    #[inline]
    pub fn zeros_like<F: GridField<NX, NY>>(_other: &F) -> Self {
        Self::zeros()
    }

    /// Wrap a matrix of shape `(NX + 1) x (NY + 1)`.
    pub fn from_matrix(values: na::DMatrix<f64>) -> Result<Self, FieldError> {
        check_shape("node values", Self::SHAPE, values.shape())?;
        Ok(Self { values })
    }

    /// Evaluate a function at every node.
    pub fn from_fn(mut f: impl FnMut(Vec2) -> f64) -> Self {
        let dims = GridDims::of::<NX, NY>();
        Self {
            values: na::DMatrix::from_fn(Self::SHAPE.0, Self::SHAPE.1, |i, j| {
                f(dims.node_position(i, j))
            }),
        }
    }

    /// The full stored shape `(NX + 1, NY + 1)`.
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// The interior dimensions `(NX, NY)`.
    #[inline]
    pub fn dims(&self) -> GridDims {
        GridDims::of::<NX, NY>()
    }

    /// View of the interior nodes, excluding the domain boundary.
    #[inline]
    pub fn interior(&self) -> na::DMatrixView<'_, f64> {
        self.values.view((1, 1), (NX - 1, NY - 1))
    }

    /// Mutable view of the interior nodes.
    #[inline]
    pub fn interior_mut(&mut self) -> na::DMatrixViewMut<'_, f64> {
        self.values.view_mut((1, 1), (NX - 1, NY - 1))
    }

    /// Whether node `(i, j)` lies on the domain boundary.
    #[inline]
    pub fn is_boundary(i: usize, j: usize) -> bool {
        i == 0 || i == NX || j == 0 || j == NY
    }

    /// Set every value.
    #[inline]
    pub fn fill(&mut self, value: f64) {
        self.values.fill(value);
    }

    /// Linearly interpolate along the line from `self` to `end`.
    pub fn lerp(&self, end: &Self, t: f64) -> Self {
        self + &(t * (end - self))
    }
}

impl<const NX: usize, const NY: usize> GridField<NX, NY> for NodeData<NX, NY> {
    const KIND: FieldKind = FieldKind::Node;

    fn zeros() -> Self {
        Self::zeros()
    }

    fn filled(value: f64) -> Self {
        Self::filled(value)
    }
}

impl<const NX: usize, const NY: usize> std::fmt::Debug for NodeData<NX, NY> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "node data on {} grid, values {:?}",
            GridDims::of::<NX, NY>(),
            self.values
        )
    }
}

impl<const NX: usize, const NY: usize> std::ops::Index<(usize, usize)> for NodeData<NX, NY> {
    type Output = f64;

    #[inline]
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.values[idx]
    }
}

impl<const NX: usize, const NY: usize> std::ops::IndexMut<(usize, usize)> for NodeData<NX, NY> {
    #[inline]
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        &mut self.values[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_layout() {
        let n = NodeData::<5, 7>::from_fn(|p| p.x * p.y);
        assert_eq!(n.size(), (6, 8));
        assert_eq!(n[(5, 7)], 1.0);
        assert_eq!(n[(0, 3)], 0.0);
        assert_eq!(n.interior().shape(), (4, 6));

        assert!(NodeData::<5, 7>::is_boundary(5, 3));
        assert!(NodeData::<5, 7>::is_boundary(2, 0));
        assert!(!NodeData::<5, 7>::is_boundary(4, 6));

        assert!(NodeData::<5, 7>::from_matrix(na::DMatrix::zeros(6, 8)).is_ok());
        assert!(matches!(
            NodeData::<5, 7>::from_matrix(na::DMatrix::zeros(7, 9)),
            Err(FieldError::ShapeMismatch {
                component: "node values",
                expected: (6, 8),
                found: (7, 9),
            })
        ));
    }
}
