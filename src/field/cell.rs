//! Cell-centered scalar fields.

use nalgebra as na;

use super::{check_dims, check_shape, FieldError, FieldKind};
use crate::{
    grid::{GridDims, GridField},
    Vec2,
};

/// Scalar values at cell centers,
/// padded with one layer of ghost cells on every side.
///
/// Values are stored in an `(NX + 2) x (NY + 2)` matrix indexed `(i, j)`.
/// Interior cells occupy `1..=NX` by `1..=NY`;
/// rows `0` and `NX + 1` and columns `0` and `NY + 1` are ghost cells.
/// Ghost values are never written by operators.
/// They are read by [`gradient`][crate::operator::gradient]
/// and [`laplacian`][crate::operator::laplacian],
/// so boundary conditions are imposed by filling them before the call.
///
/// Cell data can be constructed with
/// - [`zeros`][Self::zeros] or [`filled`][Self::filled] from the type-level tag,
/// - [`zeros_with_dims`][Self::zeros_with_dims] from runtime dimensions,
/// - [`zeros_like`][Self::zeros_like] sized from any other container,
/// - [`from_matrix`][Self::from_matrix] wrapping an existing matrix,
/// - [`from_fn`][Self::from_fn] sampling a function at cell centers.
#[derive(Clone, PartialEq)]
pub struct CellData<const NX: usize, const NY: usize> {
    /// The underlying matrix of values, exposed for convenience.
    ///
    /// Note that resizing this matrix at runtime breaks the shape invariant
    /// and will cause a panic when an operator is applied.
    /// Use with caution.
    pub values: na::DMatrix<f64>,
}

impl<const NX: usize, const NY: usize> CellData<NX, NY> {
    /// The stored shape, ghosts included.
    pub const SHAPE: (usize, usize) = (NX + 2, NY + 2);

    /// Cell data with every stored value set to zero.
    #[inline]
    pub fn zeros() -> Self {
        Self::filled(0.0)
    }

    /// Cell data with every stored value, ghosts included, set to `value`.
    #[inline]
    pub fn filled(value: f64) -> Self {
        Self {
            values: na::DMatrix::from_element(Self::SHAPE.0, Self::SHAPE.1, value),
        }
    }

    /// Zero cell data for a grid given at runtime.
    ///
    /// Fails with [`FieldError::DimensionMismatch`]
    /// if `(nx, ny)` isn't the type-level `(NX, NY)`.
    pub fn zeros_with_dims(nx: usize, ny: usize) -> Result<Self, FieldError> {
        check_dims::<NX, NY>(nx, ny)?;
        Ok(Self::zeros())
    }

    /// Zero cell data on the same grid as another container of any kind.
    ///
    /// This is how operators allocate their output.
    #[inline]
    pub fn zeros_like<F: GridField<NX, NY>>(_other: &F) -> Self {
        Self::zeros()
    }

    /// Wrap a matrix of shape `(NX + 2) x (NY + 2)`.
    pub fn from_matrix(values: na::DMatrix<f64>) -> Result<Self, FieldError> {
        check_shape("cell values", Self::SHAPE, values.shape())?;
        Ok(Self { values })
    }

    /// Evaluate a function at the center of every stored cell.
    ///
    /// Ghost cells are sampled half a cell outside the unit square,
    /// which gives them the values of the function's extension,
    /// not any particular boundary condition.
    pub fn from_fn(mut f: impl FnMut(Vec2) -> f64) -> Self {
        let dims = GridDims::of::<NX, NY>();
        Self {
            values: na::DMatrix::from_fn(Self::SHAPE.0, Self::SHAPE.1, |i, j| {
                f(dims.cell_center(i, j))
            }),
        }
    }

    /// The full stored shape `(NX + 2, NY + 2)`, ghosts included.
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// The interior dimensions `(NX, NY)`.
    #[inline]
    pub fn dims(&self) -> GridDims {
        GridDims::of::<NX, NY>()
    }

    /// View of the interior cells without ghosts.
    #[inline]
    pub fn interior(&self) -> na::DMatrixView<'_, f64> {
        self.values.view((1, 1), (NX, NY))
    }

    /// Mutable view of the interior cells without ghosts.
    #[inline]
    pub fn interior_mut(&mut self) -> na::DMatrixViewMut<'_, f64> {
        self.values.view_mut((1, 1), (NX, NY))
    }

    /// Set every stored value, ghosts included.
    #[inline]
    pub fn fill(&mut self, value: f64) {
        self.values.fill(value);
    }

    /// Linearly interpolate along the line from `self` to `end`.
    pub fn lerp(&self, end: &Self, t: f64) -> Self {
        self + &(t * (end - self))
    }
}

impl<const NX: usize, const NY: usize> GridField<NX, NY> for CellData<NX, NY> {
    const KIND: FieldKind = FieldKind::Cell;

    fn zeros() -> Self {
        Self::zeros()
    }

    fn filled(value: f64) -> Self {
        Self::filled(value)
    }
}

impl<const NX: usize, const NY: usize> std::fmt::Debug for CellData<NX, NY> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cell data on {} grid, values {:?}",
            GridDims::of::<NX, NY>(),
            self.values
        )
    }
}

impl<const NX: usize, const NY: usize> std::ops::Index<(usize, usize)> for CellData<NX, NY> {
    type Output = f64;

    #[inline]
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.values[idx]
    }
}

impl<const NX: usize, const NY: usize> std::ops::IndexMut<(usize, usize)> for CellData<NX, NY> {
    #[inline]
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        &mut self.values[idx]
    }
}

//
// tests
//
