//! Mimetic vector calculus on two-dimensional staggered grids.
//!
//! The unit square is divided into `NX` by `NY` cells,
//! and discrete fields live at three kinds of locations:
//!
//! - [`CellData`]: one scalar at each cell center, plus a ring of ghost cells,
//! - [`EdgeData`]: the normal component of a vector at each edge midpoint,
//! - [`NodeData`]: one scalar at each cell corner.
//!
//! The grid size is part of each container's type,
//! so mixing fields from different grids is a compile error.
//!
//! The [differential operators][operator] map between these kinds:
//!
//! ```text
//!          gradient             rot
//!   cell ───────────▶ edge ───────────▶ node
//!   cell ◀─────────── edge ◀─────────── node
//!         divergence            curl
//! ```
//!
//! and satisfy the discrete identities of vector calculus exactly,
//! up to floating-point roundoff:
//! divergence of a curl and rot of a gradient vanish,
//! and each operator is the (negative) adjoint of its partner
//! under the [inner products][inner].
//!
//! # Example
//!
//! Solving nothing in particular, but exercising most of the API:
//!
//! ```
//! use stagger::{CellData, EdgeData, inner::{dot, norm}, operator::{divergence, gradient}};
//!
//! // a pressure-like field with homogeneous Neumann ghosts
//! let mut p = CellData::<16, 16>::from_fn(|pos| (pos.x * pos.y).sin());
//! for j in 0..18 {
//!     p[(0, j)] = p[(1, j)];
//!     p[(17, j)] = p[(16, j)];
//! }
//! let grad_p = gradient(&p);
//! let div_grad_p = divergence(&grad_p);
//! assert!(norm(&div_grad_p).is_finite());
//!
//! // fields support the usual arithmetic
//! let q = 2.0 * &grad_p - &grad_p;
//! assert!(dot(&q, &grad_p) > 0.0);
//! assert_eq!(EdgeData::<16, 16>::zeros(), &q - &grad_p);
//! ```

#![warn(missing_docs)]

pub mod grid;
#[doc(inline)]
pub use grid::{GridDims, GridField};

pub mod field;
#[doc(inline)]
pub use field::{CellData, EdgeData, FieldError, FieldKind, NodeData};

pub mod inner;
#[doc(inline)]
pub use inner::{dot, integrate, norm, InnerProduct};

pub mod operator;
#[doc(inline)]
pub use operator::{
    curl, curl_of_nodes, divergence, gradient, laplacian, rot, translate, HasCurl,
    MatrixOperator, Operand, Operator,
};

pub mod dynamic;

// nalgebra re-exports of common types for convenience

pub use nalgebra as na;
/// Type alias for a 2D `nalgebra` vector.
pub type Vec2 = na::Vector2<f64>;
