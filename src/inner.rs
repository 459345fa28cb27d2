//! Discrete L2 inner products, norms and integration.
//!
//! Inner products are normalized by the interior cell count `NX * NY`,
//! so that a field uniformly equal to one integrates to one over the unit square.
//! Each container kind weights its stored values with a trapezoidal rule:
//!
//! - cells: interior weight 1, ghosts excluded,
//! - edges: interior weight 1, boundary edges 1/2, ghosts excluded,
//! - nodes: interior weight 1, boundary nodes 1/2, the four domain corners 1/4.
//!
//! A boundary edge or node only borders half as much of the domain
//! as an interior one, hence the halved weights.
//! The node weights also make [`rot`][crate::operator::rot]
//! and [`curl`][crate::operator::curl] adjoint:
//! `dot(rot(q), s) == dot(q, curl(s))` whenever `s` vanishes on the boundary
//! and `q` has zero ghost values.
//!
//! # Examples
//!
//! ```
//! # use stagger::{CellData, inner::{dot, norm, integrate}};
//! let mut p = CellData::<50, 25>::zeros();
//! p[(10, 10)] = 1.0;
//! assert_eq!(norm(&p) * ((50 * 25) as f64).sqrt(), 1.0);
//! assert_eq!(integrate(&CellData::<50, 25>::filled(1.0)), 1.0);
//! assert_eq!(dot(&p, &p), 1.0 / 1250.0);
//! ```

use itertools::izip;
use nalgebra as na;

use crate::{grid::GridDims, CellData, EdgeData, NodeData};

/// Trait implemented by the field containers to provide the weighted inner product.
pub trait InnerProduct: Sized {
    /// The weighted inner product of two fields on the same grid.
    fn dot(&self, other: &Self) -> f64;

    /// The field uniformly equal to one, used for integration.
    fn one() -> Self;

    /// The per-value quadrature weights as a field of the same kind,
    /// including the `1 / (NX * NY)` normalization.
    ///
    /// Summing `weights * a * b` elementwise gives [`dot(a, b)`][Self::dot]
    /// up to roundoff; `dot` itself normalizes after summing.
    fn weights() -> Self;
}

/// Inner product of two fields of the same kind on the same grid.
#[inline]
pub fn dot<F: InnerProduct>(a: &F, b: &F) -> f64 {
    a.dot(b)
}

/// The L2 norm, `sqrt(dot(a, a))`.
#[inline]
pub fn norm<F: InnerProduct>(a: &F) -> f64 {
    a.dot(a).sqrt()
}

/// Integral of a field over the unit square, `dot(a, 1)`.
///
/// For [`EdgeData`] this is the sum of the integrals of both components.
#[inline]
pub fn integrate<F: InnerProduct>(a: &F) -> f64 {
    a.dot(&F::one())
}

//
// weights
//

/// Weights along one axis of a cell-centered array of length `n + 2`:
/// zero on the ghosts, one in the interior.
fn cell_axis_weights(n: usize) -> na::DVector<f64> {
    let mut w = na::DVector::from_element(n + 2, 1.0);
    w[0] = 0.0;
    w[n + 1] = 0.0;
    w
}

/// Weights along one axis of a node-centered array of length `n + 1`:
/// one half on the boundary, one in the interior.
fn node_axis_weights(n: usize) -> na::DVector<f64> {
    let mut w = na::DVector::from_element(n + 1, 1.0);
    w[0] = 0.5;
    w[n] = 0.5;
    w
}

/// Sum of `wi[i] * wj[j] * a[(i, j)] * b[(i, j)]` over all stored values.
fn weighted_sum(
    a: &na::DMatrix<f64>,
    b: &na::DMatrix<f64>,
    wi: &na::DVector<f64>,
    wj: &na::DVector<f64>,
) -> f64 {
    let mut sum = 0.0;
    // skipping zero weights keeps garbage in ghost slots (even NaN) out of the sum
    for (j, &w_col) in wj.iter().enumerate() {
        if w_col == 0.0 {
            continue;
        }
        let col_sum: f64 = izip!(a.column(j).iter(), b.column(j).iter(), wi.iter())
            .filter(|(_, _, w_row)| **w_row != 0.0)
            .map(|(a_val, b_val, w_row)| w_row * a_val * b_val)
            .sum();
        sum += w_col * col_sum;
    }
    sum
}

/// Outer product of axis weights, normalized by the cell count.
fn weight_matrix(wi: &na::DVector<f64>, wj: &na::DVector<f64>, dims: GridDims) -> na::DMatrix<f64> {
    let count = dims.cell_count() as f64;
    na::DMatrix::from_fn(wi.len(), wj.len(), |i, j| wi[i] * wj[j] / count)
}

//
// impls
//

impl<const NX: usize, const NY: usize> InnerProduct for CellData<NX, NY> {
    fn dot(&self, other: &Self) -> f64 {
        let sum = weighted_sum(
            &self.values,
            &other.values,
            &cell_axis_weights(NX),
            &cell_axis_weights(NY),
        );
        sum / (NX * NY) as f64
    }

    fn one() -> Self {
        Self::filled(1.0)
    }

    fn weights() -> Self {
        Self {
            values: weight_matrix(
                &cell_axis_weights(NX),
                &cell_axis_weights(NY),
                GridDims::of::<NX, NY>(),
            ),
        }
    }
}

impl<const NX: usize, const NY: usize> InnerProduct for EdgeData<NX, NY> {
    fn dot(&self, other: &Self) -> f64 {
        let x_sum = weighted_sum(
            &self.x,
            &other.x,
            &node_axis_weights(NX),
            &cell_axis_weights(NY),
        );
        let y_sum = weighted_sum(
            &self.y,
            &other.y,
            &cell_axis_weights(NX),
            &node_axis_weights(NY),
        );
        (x_sum + y_sum) / (NX * NY) as f64
    }

    fn one() -> Self {
        Self::filled(1.0)
    }

    fn weights() -> Self {
        let dims = GridDims::of::<NX, NY>();
        Self {
            x: weight_matrix(&node_axis_weights(NX), &cell_axis_weights(NY), dims),
            y: weight_matrix(&cell_axis_weights(NX), &node_axis_weights(NY), dims),
        }
    }
}

impl<const NX: usize, const NY: usize> InnerProduct for NodeData<NX, NY> {
    fn dot(&self, other: &Self) -> f64 {
        let sum = weighted_sum(
            &self.values,
            &other.values,
            &node_axis_weights(NX),
            &node_axis_weights(NY),
        );
        sum / (NX * NY) as f64
    }

    fn one() -> Self {
        Self::filled(1.0)
    }

    fn weights() -> Self {
        Self {
            values: weight_matrix(
                &node_axis_weights(NX),
                &node_axis_weights(NY),
                GridDims::of::<NX, NY>(),
            ),
        }
    }
}

//
// tests
//
