use crate::api::{DistanceFunction, KMeans, KMeansConfig, KMeansState};
use crate::error::KMeansError;
use crate::point::Point;

/// Pick the first `k` samples, in input order, as seeds.
///
/// No randomness, O(k). Always produces exactly `k` seeds.
pub fn seed<P: Point>(samples: &[P], k: usize) -> Result<Vec<P>, KMeansError> {
    if k == 0 || k > samples.len() {
        return Err(KMeansError::InvalidClusterCount { requested: k, n_samples: samples.len() });
    }
    Ok(samples[..k].to_vec())
}

#[inline(always)]
pub(crate) fn calculate<P, D>(kmean: &KMeans<'_, P, D>, state: &mut KMeansState<P>, _config: &KMeansConfig<'_, P>)
where
    P: Point,
    D: DistanceFunction<P>,
{
    state.set_centroids(kmean.samples[..state.k].to_vec());
}
