use crate::api::DistanceFunction;
use crate::point::Point;

/// Squared euclidean distance, for any slice-backed point type.
///
/// The square root is deliberately skipped; nearest-centroid decisions are
/// unaffected by it and the convergence epsilon is pre-squared to match.
pub struct EuclideanDistance;

impl<P> DistanceFunction<P> for EuclideanDistance
where
    P: Point + AsRef<[<P as Point>::Scalar]>,
{
    #[inline(always)]
    fn distance(&self, a: &P, b: &P) -> P::Scalar {
        a.as_ref().iter()
            .zip(b.as_ref().iter())
            .map(|(&av, &bv)| av - bv)
            .map(|v| v * v)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_distance() {
        let a = vec![0.0f64, 0.0];
        let b = vec![3.0f64, 4.0];
        assert_eq!(EuclideanDistance.distance(&a, &b), 25.0);
        assert_eq!(EuclideanDistance.distance(&b, &a), 25.0);
        assert_eq!(EuclideanDistance.distance(&a, &a), 0.0);
    }

    #[test]
    fn works_on_arrays() {
        let a = [1.0f32, 2.0];
        let b = [2.0f32, 4.0];
        assert_eq!(EuclideanDistance.distance(&a, &b), 5.0);
    }
}
