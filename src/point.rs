use num::{Float, NumCast};
use rand::distributions::uniform::SampleUniform;
use std::fmt::{Debug, Display};
use std::iter::Sum;
use std::ops::{AddAssign, SubAssign};

/// Scalar type the engine can calculate with.
pub trait Primitive:
    Float + NumCast + Sum + AddAssign + SubAssign + SampleUniform + Default + Display + Debug + 'static
{
}
impl Primitive for f32 {}
impl Primitive for f64 {}

/// A fixed-dimension vector the engine can cluster.
///
/// The engine only ever needs three things from a vector type: a zero-valued
/// identity of matching shape, elementwise accumulation, and division by a
/// scalar. Distances are injected separately through
/// [`DistanceFunction`](crate::DistanceFunction), so any vector representation
/// works as long as these three operations are available.
pub trait Point: Clone {
    type Scalar: Primitive;

    /// Zero-valued vector of the same dimension as `self`.
    fn zeros_like(&self) -> Self;

    /// Elementwise `self += rhs`.
    fn add_in_place(&mut self, rhs: &Self);

    /// Elementwise `self /= divisor`.
    fn div_in_place(&mut self, divisor: Self::Scalar);
}

impl<T: Primitive> Point for Vec<T> {
    type Scalar = T;

    fn zeros_like(&self) -> Self {
        vec![T::zero(); self.len()]
    }

    fn add_in_place(&mut self, rhs: &Self) {
        debug_assert_eq!(self.len(), rhs.len());
        self.iter_mut().zip(rhs.iter()).for_each(|(lv, rv)| *lv += *rv);
    }

    fn div_in_place(&mut self, divisor: T) {
        self.iter_mut().for_each(|v| *v = *v / divisor);
    }
}

impl<T: Primitive, const N: usize> Point for [T; N] {
    type Scalar = T;

    fn zeros_like(&self) -> Self {
        [T::zero(); N]
    }

    fn add_in_place(&mut self, rhs: &Self) {
        self.iter_mut().zip(rhs.iter()).for_each(|(lv, rv)| *lv += *rv);
    }

    fn div_in_place(&mut self, divisor: T) {
        self.iter_mut().for_each(|v| *v = *v / divisor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_point_ops() {
        let p: Vec<f64> = vec![1.0, 2.0, 3.0];
        assert_eq!(p.zeros_like(), vec![0.0, 0.0, 0.0]);

        let mut acc = p.zeros_like();
        acc.add_in_place(&p);
        acc.add_in_place(&vec![3.0, 2.0, 1.0]);
        assert_eq!(acc, vec![4.0, 4.0, 4.0]);

        acc.div_in_place(2.0);
        assert_eq!(acc, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn array_point_ops() {
        let p: [f32; 2] = [4.0, 8.0];
        assert_eq!(p.zeros_like(), [0.0, 0.0]);

        let mut acc = [1.0f32, 1.0];
        acc.add_in_place(&p);
        assert_eq!(acc, [5.0, 9.0]);

        acc.div_in_place(0.5);
        assert_eq!(acc, [10.0, 18.0]);
    }
}
