use crate::api::DistanceFunction;
use crate::point::Point;
use num::{Float, Zero};

/// Earth-mover style distance between two histograms of equal mass,
/// accumulated over their CDF difference.
pub struct HistogramDistance;

impl<P> DistanceFunction<P> for HistogramDistance
where
    P: Point + AsRef<[<P as Point>::Scalar]>,
{
    #[inline(always)]
    fn distance(&self, a: &P, b: &P) -> P::Scalar {
        let mut total = P::Scalar::zero();
        let mut cdf_a = P::Scalar::zero();
        let mut cdf_b = P::Scalar::zero();
        for (x, y) in a.as_ref().iter().zip(b.as_ref().iter()) {
            cdf_a += *x;
            cdf_b += *y;
            total += (cdf_a - cdf_b).abs();
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_difference() {
        let a = vec![1.0f64, 0.0, 0.0];
        let b = vec![0.0f64, 0.0, 1.0];
        // mass has to travel the full histogram: |1-0| + |1-0| + |1-1|
        assert_eq!(HistogramDistance.distance(&a, &b), 2.0);
        assert_eq!(HistogramDistance.distance(&a, &a), 0.0);
    }
}
