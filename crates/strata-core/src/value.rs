//! Generic per-cell value type.
//!
//! Interpolation, averaging and flux correction are written once against
//! [`CellValue`] and work unchanged for scalars (`f64`) and small fixed-size
//! vectors ([`Vector<N>`], usually [`Vector3`] for velocity and momentum).

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Index, Mul, Sub};

/// A per-cell value with a fixed number of `f64` components.
///
/// Implementations must behave as a vector space over `f64`: addition,
/// subtraction and scaling act component-wise.
pub trait CellValue:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
{
    /// Number of `f64` components (1 for scalars, 3 for vectors).
    const COMPONENTS: usize;

    /// The additive identity.
    fn zero() -> Self;

    /// A value with every component equal to `v`.
    fn splat(v: f64) -> Self;

    /// Component `i`. Panics if `i >= COMPONENTS`.
    fn component(&self, i: usize) -> f64;

    /// A value whose component `i` is `f(i)`.
    fn from_components(f: impl FnMut(usize) -> f64) -> Self;

    /// `true` if every component is finite.
    fn is_finite(&self) -> bool {
        (0..Self::COMPONENTS).all(|i| self.component(i).is_finite())
    }

    /// Largest absolute component difference between `self` and `other`.
    fn max_abs_diff(&self, other: &Self) -> f64 {
        (0..Self::COMPONENTS)
            .map(|i| (self.component(i) - other.component(i)).abs())
            .fold(0.0, f64::max)
    }
}

impl CellValue for f64 {
    const COMPONENTS: usize = 1;

    fn zero() -> Self {
        0.0
    }

    fn splat(v: f64) -> Self {
        v
    }

    fn component(&self, i: usize) -> f64 {
        assert_eq!(i, 0, "scalar has a single component");
        *self
    }

    fn from_components(mut f: impl FnMut(usize) -> f64) -> Self {
        f(0)
    }
}

/// A fixed-size vector of `f64` components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector<const N: usize>(pub [f64; N]);

/// Three-component vector (velocity, momentum).
pub type Vector3 = Vector<3>;

impl<const N: usize> Vector<N> {
    /// Build a vector by evaluating `f` for each component index.
    pub fn from_fn(f: impl FnMut(usize) -> f64) -> Self {
        Self(std::array::from_fn(f))
    }
}

impl Vector3 {
    /// Construct from three components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self([0.0; N])
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl<const N: usize> Add for Vector<N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_fn(|i| self.0[i] + rhs.0[i])
    }
}

impl<const N: usize> AddAssign for Vector<N> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl<const N: usize> Sub for Vector<N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_fn(|i| self.0[i] - rhs.0[i])
    }
}

impl<const N: usize> Mul<f64> for Vector<N> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0.map(|c| c * rhs))
    }
}

impl<const N: usize> CellValue for Vector<N> {
    const COMPONENTS: usize = N;

    fn zero() -> Self {
        Self([0.0; N])
    }

    fn splat(v: f64) -> Self {
        Self([v; N])
    }

    fn component(&self, i: usize) -> f64 {
        self.0[i]
    }

    fn from_components(f: impl FnMut(usize) -> f64) -> Self {
        Self::from_fn(f)
    }
}
