//! std trait impls for arithmetic on field containers.
//!
//! Every operation acts on the entire stored array, ghosts included.
//! Binary operations only exist between containers of the same kind
//! on the same grid, so mixing them up is a type error.
//! Several permutations are needed to also work with references.

use super::{CellData, EdgeData, NodeData};

/// Arithmetic for containers backed by a single `values` matrix.
macro_rules! impl_scalar_field_arith {
    ($field:ident) => {
        impl<const NX: usize, const NY: usize> $field<NX, NY> {
            /// Negate every stored value in place, ghosts included,
            /// and return the same container.
            ///
            /// This mutates the receiver.
            /// Use the [`Neg`][std::ops::Neg] operator for a value-returning negation.
            #[inline]
            pub fn negate(&mut self) -> &mut Self {
                self.values.neg_mut();
                self
            }
        }

        // Neg

        impl<const NX: usize, const NY: usize> std::ops::Neg for $field<NX, NY> {
            type Output = Self;

            fn neg(mut self) -> Self::Output {
                self.values.neg_mut();
                self
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::Neg for &$field<NX, NY> {
            type Output = $field<NX, NY>;

            fn neg(self) -> Self::Output {
                $field { values: -&self.values }
            }
        }

        // Add

        impl<const NX: usize, const NY: usize> std::ops::Add for $field<NX, NY> {
            type Output = Self;

            fn add(self, rhs: Self) -> Self::Output {
                $field { values: self.values + rhs.values }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::Add<&$field<NX, NY>> for $field<NX, NY> {
            type Output = Self;

            fn add(self, rhs: &$field<NX, NY>) -> Self::Output {
                $field { values: self.values + &rhs.values }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::Add<$field<NX, NY>> for &$field<NX, NY> {
            type Output = $field<NX, NY>;

            fn add(self, rhs: $field<NX, NY>) -> Self::Output {
                $field { values: &self.values + rhs.values }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::Add for &$field<NX, NY> {
            type Output = $field<NX, NY>;

            fn add(self, rhs: Self) -> Self::Output {
                $field { values: &self.values + &rhs.values }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::AddAssign for $field<NX, NY> {
            fn add_assign(&mut self, rhs: Self) {
                self.values += rhs.values;
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::AddAssign<&$field<NX, NY>>
            for $field<NX, NY>
        {
            fn add_assign(&mut self, rhs: &$field<NX, NY>) {
                self.values += &rhs.values;
            }
        }

        // Sub

        impl<const NX: usize, const NY: usize> std::ops::Sub for $field<NX, NY> {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                $field { values: self.values - rhs.values }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::Sub<&$field<NX, NY>> for $field<NX, NY> {
            type Output = Self;

            fn sub(self, rhs: &$field<NX, NY>) -> Self::Output {
                $field { values: self.values - &rhs.values }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::Sub<$field<NX, NY>> for &$field<NX, NY> {
            type Output = $field<NX, NY>;

            fn sub(self, rhs: $field<NX, NY>) -> Self::Output {
                $field { values: &self.values - rhs.values }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::Sub for &$field<NX, NY> {
            type Output = $field<NX, NY>;

            fn sub(self, rhs: Self) -> Self::Output {
                $field { values: &self.values - &rhs.values }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::SubAssign for $field<NX, NY> {
            fn sub_assign(&mut self, rhs: Self) {
                self.values -= rhs.values;
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::SubAssign<&$field<NX, NY>>
            for $field<NX, NY>
        {
            fn sub_assign(&mut self, rhs: &$field<NX, NY>) {
                self.values -= &rhs.values;
            }
        }

        // Mul, Div (scalar)

        impl<const NX: usize, const NY: usize> std::ops::Mul<$field<NX, NY>> for f64 {
            type Output = $field<NX, NY>;

            fn mul(self, rhs: $field<NX, NY>) -> Self::Output {
                $field { values: self * rhs.values }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::Mul<&$field<NX, NY>> for f64 {
            type Output = $field<NX, NY>;

            fn mul(self, rhs: &$field<NX, NY>) -> Self::Output {
                $field { values: self * &rhs.values }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::Mul<f64> for $field<NX, NY> {
            type Output = Self;

            fn mul(self, rhs: f64) -> Self::Output {
                $field { values: self.values * rhs }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::Mul<f64> for &$field<NX, NY> {
            type Output = $field<NX, NY>;

            fn mul(self, rhs: f64) -> Self::Output {
                $field { values: &self.values * rhs }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::MulAssign<f64> for $field<NX, NY> {
            fn mul_assign(&mut self, rhs: f64) {
                self.values *= rhs;
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::Div<f64> for $field<NX, NY> {
            type Output = Self;

            fn div(self, rhs: f64) -> Self::Output {
                $field { values: self.values / rhs }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::Div<f64> for &$field<NX, NY> {
            type Output = $field<NX, NY>;

            fn div(self, rhs: f64) -> Self::Output {
                $field { values: &self.values / rhs }
            }
        }

        impl<const NX: usize, const NY: usize> std::ops::DivAssign<f64> for $field<NX, NY> {
            fn div_assign(&mut self, rhs: f64) {
                self.values /= rhs;
            }
        }
    };
}

impl_scalar_field_arith!(CellData);
impl_scalar_field_arith!(NodeData);

// EdgeData applies everything to both components independently

impl<const NX: usize, const NY: usize> EdgeData<NX, NY> {
    /// Negate both components in place, ghosts included,
    /// and return the same container.
    ///
    /// This mutates the receiver.
    /// Use the [`Neg`][std::ops::Neg] operator for a value-returning negation.
    #[inline]
    pub fn negate(&mut self) -> &mut Self {
        self.x.neg_mut();
        self.y.neg_mut();
        self
    }
}

impl<const NX: usize, const NY: usize> std::ops::Neg for EdgeData<NX, NY> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        self.negate();
        self
    }
}

impl<const NX: usize, const NY: usize> std::ops::Neg for &EdgeData<NX, NY> {
    type Output = EdgeData<NX, NY>;

    fn neg(self) -> Self::Output {
        EdgeData {
            x: -&self.x,
            y: -&self.y,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::Add for EdgeData<NX, NY> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        EdgeData {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::Add<&EdgeData<NX, NY>> for EdgeData<NX, NY> {
    type Output = Self;

    fn add(self, rhs: &EdgeData<NX, NY>) -> Self::Output {
        EdgeData {
            x: self.x + &rhs.x,
            y: self.y + &rhs.y,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::Add<EdgeData<NX, NY>> for &EdgeData<NX, NY> {
    type Output = EdgeData<NX, NY>;

    fn add(self, rhs: EdgeData<NX, NY>) -> Self::Output {
        EdgeData {
            x: &self.x + rhs.x,
            y: &self.y + rhs.y,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::Add for &EdgeData<NX, NY> {
    type Output = EdgeData<NX, NY>;

    fn add(self, rhs: Self) -> Self::Output {
        EdgeData {
            x: &self.x + &rhs.x,
            y: &self.y + &rhs.y,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::AddAssign for EdgeData<NX, NY> {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl<const NX: usize, const NY: usize> std::ops::AddAssign<&EdgeData<NX, NY>> for EdgeData<NX, NY> {
    fn add_assign(&mut self, rhs: &EdgeData<NX, NY>) {
        self.x += &rhs.x;
        self.y += &rhs.y;
    }
}

impl<const NX: usize, const NY: usize> std::ops::Sub for EdgeData<NX, NY> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        EdgeData {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::Sub<&EdgeData<NX, NY>> for EdgeData<NX, NY> {
    type Output = Self;

    fn sub(self, rhs: &EdgeData<NX, NY>) -> Self::Output {
        EdgeData {
            x: self.x - &rhs.x,
            y: self.y - &rhs.y,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::Sub<EdgeData<NX, NY>> for &EdgeData<NX, NY> {
    type Output = EdgeData<NX, NY>;

    fn sub(self, rhs: EdgeData<NX, NY>) -> Self::Output {
        EdgeData {
            x: &self.x - rhs.x,
            y: &self.y - rhs.y,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::Sub for &EdgeData<NX, NY> {
    type Output = EdgeData<NX, NY>;

    fn sub(self, rhs: Self) -> Self::Output {
        EdgeData {
            x: &self.x - &rhs.x,
            y: &self.y - &rhs.y,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::SubAssign for EdgeData<NX, NY> {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl<const NX: usize, const NY: usize> std::ops::SubAssign<&EdgeData<NX, NY>> for EdgeData<NX, NY> {
    fn sub_assign(&mut self, rhs: &EdgeData<NX, NY>) {
        self.x -= &rhs.x;
        self.y -= &rhs.y;
    }
}

impl<const NX: usize, const NY: usize> std::ops::Mul<EdgeData<NX, NY>> for f64 {
    type Output = EdgeData<NX, NY>;

    fn mul(self, rhs: EdgeData<NX, NY>) -> Self::Output {
        EdgeData {
            x: self * rhs.x,
            y: self * rhs.y,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::Mul<&EdgeData<NX, NY>> for f64 {
    type Output = EdgeData<NX, NY>;

    fn mul(self, rhs: &EdgeData<NX, NY>) -> Self::Output {
        EdgeData {
            x: self * &rhs.x,
            y: self * &rhs.y,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::Mul<f64> for EdgeData<NX, NY> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        EdgeData {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::Mul<f64> for &EdgeData<NX, NY> {
    type Output = EdgeData<NX, NY>;

    fn mul(self, rhs: f64) -> Self::Output {
        EdgeData {
            x: &self.x * rhs,
            y: &self.y * rhs,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::MulAssign<f64> for EdgeData<NX, NY> {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl<const NX: usize, const NY: usize> std::ops::Div<f64> for EdgeData<NX, NY> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        EdgeData {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::Div<f64> for &EdgeData<NX, NY> {
    type Output = EdgeData<NX, NY>;

    fn div(self, rhs: f64) -> Self::Output {
        EdgeData {
            x: &self.x / rhs,
            y: &self.y / rhs,
        }
    }
}

impl<const NX: usize, const NY: usize> std::ops::DivAssign<f64> for EdgeData<NX, NY> {
    fn div_assign(&mut self, rhs: f64) {
        self.x /= rhs;
        self.y /= rhs;
    }
}

//
// tests
//
