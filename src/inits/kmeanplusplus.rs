use crate::api::{DistanceFunction, KMeans, KMeansConfig, KMeansState};
use crate::error::KMeansError;
use crate::point::Point;
use num::Zero;
use rand::prelude::*;
use std::ops::DerefMut;

/// Probability-weighted (k-means++ style) seed selection.
///
/// The first seed is drawn uniformly from the samples. Every further seed is
/// drawn with probability proportional to each sample's distance to the
/// nearest seed chosen so far, which biases the selection towards regions the
/// seeds do not cover yet.
///
/// The returned vector can be shorter than `k`: selection stops as soon as the
/// summed min-distances reach zero, i.e. when every remaining sample coincides
/// with an already chosen seed. Callers must check the length.
pub fn seed<P, D, R>(samples: &[P], k: usize, distance: &D, rnd: &mut R) -> Result<Vec<P>, KMeansError>
where
    P: Point,
    D: DistanceFunction<P>,
    R: Rng + ?Sized,
{
    if samples.len() < 2 {
        return Err(KMeansError::TooFewSamples(samples.len()));
    }
    if k == 0 || k > samples.len() {
        return Err(KMeansError::InvalidClusterCount { requested: k, n_samples: samples.len() });
    }
    Ok(pick(samples, k, distance, rnd))
}

/// Selection core; preconditions (`n >= 2`, `1 <= k <= n`) are the caller's.
pub(crate) fn pick<P, D, R>(samples: &[P], k: usize, distance: &D, rnd: &mut R) -> Vec<P>
where
    P: Point,
    D: DistanceFunction<P>,
    R: Rng + ?Sized,
{
    let n = samples.len();
    let mut selected = Vec::with_capacity(k);

    let first = rnd.gen_range(0..n);
    selected.push(samples[first].clone());

    // Each sample's distance to the nearest seed chosen so far
    let mut min_distances: Vec<P::Scalar> = samples.iter()
        .map(|s| distance.distance(s, &samples[first]))
        .collect();
    let mut distance_sum: P::Scalar = min_distances.iter().copied().sum();

    while selected.len() < k {
        if distance_sum <= P::Scalar::zero() {
            log::debug!("seeding stopped at {} of {} seeds, remaining samples duplicate the chosen ones",
                selected.len(), k);
            break;
        }

        // Distance-proportional draw without a cumulative array: walk the
        // min-distance entries, consuming the drawn value until it no longer
        // exceeds the current entry
        let mut draw = rnd.gen_range(P::Scalar::zero()..distance_sum);
        let mut index = 0;
        while index < n - 1 && draw > min_distances[index] {
            draw -= min_distances[index];
            index += 1;
        }
        selected.push(samples[index].clone());

        let newest = &samples[index];
        min_distances.iter_mut()
            .zip(samples.iter())
            .for_each(|(min_dist, sample)| {
                let d = distance.distance(sample, newest);
                if d < *min_dist {
                    *min_dist = d;
                }
            });
        distance_sum = min_distances.iter().copied().sum();
    }
    selected
}

#[inline(always)]
pub(crate) fn calculate<P, D, M>(kmean: &KMeans<'_, P, D>, state: &mut KMeansState<P>, config: &KMeansConfig<'_, P>, distance: &M)
where
    P: Point,
    D: DistanceFunction<P>,
    M: DistanceFunction<P>,
{
    let seeds = pick(kmean.samples, state.k, distance, config.rnd.borrow_mut().deref_mut());
    state.set_centroids(seeds);
}
