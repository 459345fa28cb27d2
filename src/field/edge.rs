//! Edge-centered vector fields.

use nalgebra as na;

use super::{check_dims, check_shape, FieldError, FieldKind};
use crate::{
    grid::{GridDims, GridField},
    Vec2,
};

/// A vector field stored as its normal components on cell edges.
///
/// The x-component lives on vertical edges, in an `(NX + 1) x (NY + 2)` matrix.
/// `x[(i, j)]` is the flux through the edge between cells `(i, j)` and `(i + 1, j)`
/// of a [`CellData`][crate::CellData].
/// Rows `0` and `NX` are the domain boundary,
/// rows `1..NX` the interior,
/// and columns `0` and `NY + 1` a ghost layer along y.
///
/// The y-component is the transpose arrangement, an `(NX + 2) x (NY + 1)` matrix
/// with boundary columns `0` and `NY` and ghost rows `0` and `NX + 1`.
///
/// The ghost layers exist because [`rot`][crate::operator::rot]
/// needs a one-edge lookahead past the boundary nodes.
#[derive(Clone, PartialEq)]
pub struct EdgeData<const NX: usize, const NY: usize> {
    /// The x-component, exposed for convenience.
    ///
    /// Resizing this matrix breaks the shape invariant
    /// and will cause a panic when an operator is applied.
    pub x: na::DMatrix<f64>,
    /// The y-component, exposed for convenience.
    ///
    /// Resizing this matrix breaks the shape invariant
    /// and will cause a panic when an operator is applied.
    pub y: na::DMatrix<f64>,
}

impl<const NX: usize, const NY: usize> EdgeData<NX, NY> {
    /// The stored shape of the x-component.
    pub const X_SHAPE: (usize, usize) = (NX + 1, NY + 2);
    /// The stored shape of the y-component.
    pub const Y_SHAPE: (usize, usize) = (NX + 2, NY + 1);

    /// Edge data with every stored value set to zero.
    #[inline]
    pub fn zeros() -> Self {
        Self::filled(0.0)
    }

    /// Edge data with every stored value of both components set to `value`.
    #[inline]
    pub fn filled(value: f64) -> Self {
        Self {
            x: na::DMatrix::from_element(Self::X_SHAPE.0, Self::X_SHAPE.1, value),
            y: na::DMatrix::from_element(Self::Y_SHAPE.0, Self::Y_SHAPE.1, value),
        }
    }

    /// Zero edge data for a grid given at runtime.
    ///
    /// Fails with [`FieldError::DimensionMismatch`]
    /// if `(nx, ny)` isn't the type-level `(NX, NY)`.
    pub fn zeros_with_dims(nx: usize, ny: usize) -> Result<Self, FieldError> {
        check_dims::<NX, NY>(nx, ny)?;
        Ok(Self::zeros())
    }

    /// Zero edge data on the same grid as another container of any kind.
    #[inline]
    pub fn zeros_like<F: GridField<NX, NY>>(_other: &F) -> Self {
        Self::zeros()
    }

    /// Wrap a pair of component matrices.
    ///
    /// The grid implied by `x` must agree with the one implied by `y`,
    /// and both with the type-level tag.
    pub fn from_components(x: na::DMatrix<f64>, y: na::DMatrix<f64>) -> Result<Self, FieldError> {
        if let Some(from_x) = Self::dims_of_x(&x) {
            check_shape("edge y-component", (from_x.nx + 2, from_x.ny + 1), y.shape())?;
        }
        check_shape("edge x-component", Self::X_SHAPE, x.shape())?;
        check_shape("edge y-component", Self::Y_SHAPE, y.shape())?;
        Ok(Self { x, y })
    }

    /// Infer grid dimensions from a pair of component matrices
    /// without reference to a type-level tag.
    ///
    /// Useful for choosing the `NX, NY` parameters
    /// before calling [`from_components`][Self::from_components].
    pub fn infer_dims(x: &na::DMatrix<f64>, y: &na::DMatrix<f64>) -> Result<GridDims, FieldError> {
        let from_x = Self::dims_of_x(x).ok_or(FieldError::ShapeMismatch {
            component: "edge x-component",
            expected: (1, 2),
            found: x.shape(),
        })?;
        check_shape("edge y-component", (from_x.nx + 2, from_x.ny + 1), y.shape())?;
        Ok(from_x)
    }

    fn dims_of_x(x: &na::DMatrix<f64>) -> Option<GridDims> {
        Some(GridDims::new(
            x.nrows().checked_sub(1)?,
            x.ncols().checked_sub(2)?,
        ))
    }

    /// Sample a vector field at edge midpoints,
    /// keeping the component normal to each edge.
    ///
    /// Ghost edges are sampled at their positions outside the unit square.
    pub fn from_fn(mut f: impl FnMut(Vec2) -> Vec2) -> Self {
        let dims = GridDims::of::<NX, NY>();
        Self {
            x: na::DMatrix::from_fn(Self::X_SHAPE.0, Self::X_SHAPE.1, |i, j| {
                f(dims.x_edge_midpoint(i, j)).x
            }),
            y: na::DMatrix::from_fn(Self::Y_SHAPE.0, Self::Y_SHAPE.1, |i, j| {
                f(dims.y_edge_midpoint(i, j)).y
            }),
        }
    }

    /// The stored shapes of the x- and y-components, ghosts included.
    #[inline]
    pub fn size(&self) -> ((usize, usize), (usize, usize)) {
        (self.x.shape(), self.y.shape())
    }

    /// The interior dimensions `(NX, NY)`.
    #[inline]
    pub fn dims(&self) -> GridDims {
        GridDims::of::<NX, NY>()
    }

    /// View of the interior x-edges, excluding boundary and ghosts.
    #[inline]
    pub fn x_interior(&self) -> na::DMatrixView<'_, f64> {
        self.x.view((1, 1), (NX - 1, NY))
    }

    /// View of the interior y-edges, excluding boundary and ghosts.
    #[inline]
    pub fn y_interior(&self) -> na::DMatrixView<'_, f64> {
        self.y.view((1, 1), (NX, NY - 1))
    }

    /// Set every stored value of both components.
    #[inline]
    pub fn fill(&mut self, value: f64) {
        self.x.fill(value);
        self.y.fill(value);
    }

    /// Linearly interpolate along the line from `self` to `end`.
    pub fn lerp(&self, end: &Self, t: f64) -> Self {
        self + &(t * (end - self))
    }
}

impl<const NX: usize, const NY: usize> GridField<NX, NY> for EdgeData<NX, NY> {
    const KIND: FieldKind = FieldKind::Edge;

    fn zeros() -> Self {
        Self::zeros()
    }

    fn filled(value: f64) -> Self {
        Self::filled(value)
    }
}

impl<const NX: usize, const NY: usize> std::fmt::Debug for EdgeData<NX, NY> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "edge data on {} grid, x {:?}, y {:?}",
            GridDims::of::<NX, NY>(),
            self.x,
            self.y
        )
    }
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellData;

    #[test]
    fn component_shapes_must_agree() {
        let e = EdgeData::<50, 25>::zeros();
        assert_eq!(e.size(), ((51, 27), (52, 26)));

        let ok = EdgeData::<3, 2>::from_components(na::DMatrix::zeros(4, 4), na::DMatrix::zeros(5, 3));
        assert!(ok.is_ok());

        // x says 3x2, y says 2x3
        let inconsistent =
            EdgeData::<3, 2>::from_components(na::DMatrix::zeros(4, 4), na::DMatrix::zeros(4, 4));
        assert_eq!(
            inconsistent,
            Err(FieldError::ShapeMismatch {
                component: "edge y-component",
                expected: (5, 3),
                found: (4, 4),
            })
        );

        // consistent with each other but not with the tag
        let wrong_grid =
            EdgeData::<3, 2>::from_components(na::DMatrix::zeros(5, 4), na::DMatrix::zeros(6, 3));
        assert!(matches!(
            wrong_grid,
            Err(FieldError::ShapeMismatch {
                component: "edge x-component",
                ..
            })
        ));
    }

    #[test]
    fn dims_inferred_from_components() {
        let x = na::DMatrix::zeros(8, 5);
        let y = na::DMatrix::zeros(9, 4);
        assert_eq!(
            EdgeData::<7, 3>::infer_dims(&x, &y),
            Ok(GridDims::new(7, 3))
        );
        assert!(EdgeData::<7, 3>::infer_dims(&x, &x).is_err());
        assert!(EdgeData::<7, 3>::infer_dims(&na::DMatrix::zeros(0, 0), &y).is_err());
    }

    #[test]
    fn from_fn_keeps_normal_components() {
        let e = EdgeData::<4, 2>::from_fn(|p| Vec2::new(p.x, -p.y));
        // x-edges sit on node columns, y-edges on node rows
        assert_eq!(e.x[(4, 1)], 1.0);
        assert_eq!(e.y[(1, 2)], -1.0);
        assert_eq!(e.x_interior().shape(), (3, 2));
        assert_eq!(e.y_interior().shape(), (4, 1));

        let c = CellData::<4, 2>::zeros();
        assert_eq!(EdgeData::zeros_like(&c).size(), e.size());
    }
}
