//! Integer cell indices, coordinate axes and patch faces.

use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// One of the three Cartesian axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// The x axis (index 0).
    X,
    /// The y axis (index 1).
    Y,
    /// The z axis (index 2).
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis (0, 1 or 2).
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// The two axes orthogonal to this one, in index order.
    pub fn tangential(self) -> [Axis; 2] {
        match self {
            Self::X => [Axis::Y, Axis::Z],
            Self::Y => [Axis::X, Axis::Z],
            Self::Z => [Axis::X, Axis::Y],
        }
    }

    /// Upper-case axis name used in face-flux variable names (`"X"`).
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A three-component integer cell index.
///
/// Indices are signed: ghost cells and coarse-level footprints routinely
/// extend below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVector(pub [i32; 3]);

impl IntVector {
    /// `(0, 0, 0)`.
    pub const ZERO: Self = Self([0, 0, 0]);
    /// `(1, 1, 1)`.
    pub const ONE: Self = Self([1, 1, 1]);

    /// Construct from components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self([x, y, z])
    }

    /// All three components equal to `v`.
    pub const fn splat(v: i32) -> Self {
        Self([v, v, v])
    }

    /// Unit vector along `axis`.
    pub fn unit(axis: Axis) -> Self {
        let mut v = Self::ZERO;
        v[axis] = 1;
        v
    }

    /// x component.
    pub fn x(self) -> i32 {
        self.0[0]
    }

    /// y component.
    pub fn y(self) -> i32 {
        self.0[1]
    }

    /// z component.
    pub fn z(self) -> i32 {
        self.0[2]
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].min(other.0[i])))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].max(other.0[i])))
    }

    /// Component-wise floor division (rounds toward negative infinity).
    pub fn div_floor(self, divisor: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].div_euclid(divisor.0[i])))
    }

    /// Product of the components, widened to avoid overflow.
    pub fn product(self) -> i64 {
        self.0.iter().map(|&c| i64::from(c)).product()
    }

    /// `true` if every component is strictly less than `other`'s.
    pub fn all_lt(self, other: Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a < b)
    }

    /// `true` if every component is less than or equal to `other`'s.
    pub fn all_le(self, other: Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }
}

impl fmt::Display for IntVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0[0], self.0[1], self.0[2])
    }
}

impl From<[i32; 3]> for IntVector {
    fn from(v: [i32; 3]) -> Self {
        Self(v)
    }
}

impl Index<Axis> for IntVector {
    type Output = i32;

    fn index(&self, axis: Axis) -> &i32 {
        &self.0[axis.index()]
    }
}

impl IndexMut<Axis> for IntVector {
    fn index_mut(&mut self, axis: Axis) -> &mut i32 {
        &mut self.0[axis.index()]
    }
}

impl Add for IntVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl AddAssign for IntVector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for IntVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl SubAssign for IntVector {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Component-wise product.
impl Mul for IntVector {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] * rhs.0[i]))
    }
}

impl Mul<i32> for IntVector {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self(self.0.map(|c| c * rhs))
    }
}

impl Neg for IntVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.map(|c| -c))
    }
}

/// One of the six axis-aligned faces of a patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    /// Low-x face.
    XMinus,
    /// High-x face.
    XPlus,
    /// Low-y face.
    YMinus,
    /// High-y face.
    YPlus,
    /// Low-z face.
    ZMinus,
    /// High-z face.
    ZPlus,
}

impl Face {
    /// All faces in canonical order (x-, x+, y-, y+, z-, z+).
    pub const ALL: [Face; 6] = [
        Face::XMinus,
        Face::XPlus,
        Face::YMinus,
        Face::YPlus,
        Face::ZMinus,
        Face::ZPlus,
    ];

    /// The low face along `axis`.
    pub fn minus(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::XMinus,
            Axis::Y => Self::YMinus,
            Axis::Z => Self::ZMinus,
        }
    }

    /// The high face along `axis`.
    pub fn plus(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::XPlus,
            Axis::Y => Self::YPlus,
            Axis::Z => Self::ZPlus,
        }
    }

    /// The axis this face is normal to.
    pub fn axis(self) -> Axis {
        match self {
            Self::XMinus | Self::XPlus => Axis::X,
            Self::YMinus | Self::YPlus => Axis::Y,
            Self::ZMinus | Self::ZPlus => Axis::Z,
        }
    }

    /// `true` for the high ("+") face of its axis.
    pub fn is_plus(self) -> bool {
        matches!(self, Self::XPlus | Self::YPlus | Self::ZPlus)
    }

    /// `+1` for "+" faces, `-1` for "-" faces.
    pub fn sign(self) -> i32 {
        if self.is_plus() {
            1
        } else {
            -1
        }
    }

    /// Outward unit normal of this face, e.g. `(-1, 0, 0)` for x-.
    pub fn outward_normal(self) -> IntVector {
        IntVector::unit(self.axis()) * self.sign()
    }

    /// The face on the other side of the patch along the same axis.
    pub fn opposite(self) -> Self {
        if self.is_plus() {
            Self::minus(self.axis())
        } else {
            Self::plus(self.axis())
        }
    }

    /// Position of this face in [`Face::ALL`].
    pub fn index(self) -> usize {
        self.axis().index() * 2 + usize::from(self.is_plus())
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_plus() { '+' } else { '-' };
        write!(f, "{}{sign}", self.axis().name().to_ascii_lowercase())
    }
}
