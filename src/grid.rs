//! The grid dimension tag shared by every field container.
//!
//! Grid sizes live in the type system as the const generics `NX` and `NY`,
//! the number of interior cells along each axis.
//! Combining fields from differently sized grids is therefore a compile error:
//!
//! ```compile_fail
//! # use stagger::CellData;
//! let a = CellData::<4, 4>::zeros();
//! let b = CellData::<4, 5>::zeros();
//! let _ = a + b;
//! ```
//!
//! [`GridDims`] is the runtime view of the same tag,
//! used in error messages and for mapping indices to physical positions.
//! The physical domain is always the unit square,
//! so cells have width `1/NX` and height `1/NY`.

use crate::{field::FieldKind, Vec2};

/// Number of interior cells along each axis of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
    /// Interior cell count along x.
    pub nx: usize,
    /// Interior cell count along y.
    pub ny: usize,
}

impl GridDims {
    /// Construct a dimension pair.
    #[inline]
    pub const fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny }
    }

    /// The dimension pair carried by the const generics of a field type.
    #[inline]
    pub const fn of<const NX: usize, const NY: usize>() -> Self {
        Self { nx: NX, ny: NY }
    }

    /// Total number of interior cells, `nx * ny`.
    ///
    /// This is also the normalization factor of every inner product.
    #[inline]
    pub const fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    /// Physical cell width and height.
    #[inline]
    pub fn spacing(&self) -> (f64, f64) {
        (1.0 / self.nx as f64, 1.0 / self.ny as f64)
    }

    // Positions below take storage indices, ghosts included.
    // Node 0 sits on the left/bottom boundary of the domain
    // and cell 1 is the first interior cell,
    // so cell-space coordinates are node-space coordinates shifted by a half.

    /// Center of the cell stored at `(i, j)` in [`CellData`][crate::CellData].
    ///
    /// Ghost cells get the position they would have outside the domain.
    #[inline]
    pub fn cell_center(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new(self.cell_coord_x(i), self.cell_coord_y(j))
    }

    /// Position of the node stored at `(i, j)` in [`NodeData`][crate::NodeData].
    #[inline]
    pub fn node_position(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new(self.node_coord_x(i), self.node_coord_y(j))
    }

    /// Midpoint of the edge stored at `(i, j)` in the x-component of an
    /// [`EdgeData`][crate::EdgeData].
    /// These edges are vertical, i.e. they carry fluxes in the x direction.
    #[inline]
    pub fn x_edge_midpoint(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new(self.node_coord_x(i), self.cell_coord_y(j))
    }

    /// Midpoint of the edge stored at `(i, j)` in the y-component of an
    /// [`EdgeData`][crate::EdgeData].
    #[inline]
    pub fn y_edge_midpoint(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new(self.cell_coord_x(i), self.node_coord_y(j))
    }

    #[inline]
    fn cell_coord_x(&self, i: usize) -> f64 {
        (i as f64 - 0.5) / self.nx as f64
    }

    #[inline]
    fn cell_coord_y(&self, j: usize) -> f64 {
        (j as f64 - 0.5) / self.ny as f64
    }

    #[inline]
    fn node_coord_x(&self, i: usize) -> f64 {
        i as f64 / self.nx as f64
    }

    #[inline]
    fn node_coord_y(&self, j: usize) -> f64 {
        j as f64 / self.ny as f64
    }
}

impl std::fmt::Display for GridDims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.nx, self.ny)
    }
}

/// Trait implemented by all field containers living on an `NX` by `NY` grid.
///
/// This is mostly used to size one kind of container from another,
/// e.g. [`CellData::zeros_like`][crate::CellData::zeros_like]
/// accepts any `GridField` with the same tag.
pub trait GridField<const NX: usize, const NY: usize>: Sized {
    /// Which of the three container kinds this is.
    const KIND: FieldKind;

    /// A container with every stored value (ghosts included) set to zero.
    fn zeros() -> Self;

    /// A container with every stored value (ghosts included) set to `value`.
    fn filled(value: f64) -> Self;

    /// The interior dimensions of the grid this container lives on.
    #[inline]
    fn dims(&self) -> GridDims {
        GridDims::of::<NX, NY>()
    }
}

//
// tests
//
