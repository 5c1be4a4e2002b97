use crate::api::{DistanceFunction, KMeans, KMeansConfig, KMeansState};
use crate::convergence::ConvergenceCheck;
use crate::error::KMeansError;
use crate::point::Point;
use num::{NumCast, Zero};

pub(crate) struct Lloyd<P: Point> {
    _p: std::marker::PhantomData<P>,
}
impl<P: Point> Lloyd<P> {
    /// A cluster that lost all its samples would divide by zero in the mean
    /// update. Instead, it is reseeded from the sample farthest from its
    /// current centroid, among samples whose cluster keeps at least one
    /// member after the move. Runs before accumulation, so the sums below
    /// never see an empty cluster.
    fn reseed_empty_clusters(state: &mut KMeansState<P>) {
        let KMeansState { k, assignments, centroid_frequency, centroid_distances, .. } = state;

        let mut distance_sorted: Vec<usize> = (0..assignments.len()).collect();
        distance_sorted.sort_unstable_by(
            |&i1, &i2| centroid_distances[i1].partial_cmp(&centroid_distances[i2]).unwrap());

        for i in 0..*k {
            if centroid_frequency[i] != 0 {
                continue;
            }
            // n >= k guarantees a donor cluster with more than one sample
            let sample_id = distance_sorted.iter().rev().copied()
                .find(|&s| centroid_frequency[assignments[s]] > 1)
                .expect("empty cluster without a donor sample");
            let prev_centroid_id = assignments[sample_id];
            centroid_frequency[prev_centroid_id] -= 1;
            centroid_frequency[i] = 1;
            assignments[sample_id] = i;
            // The reseeded centroid lands on the chosen sample
            centroid_distances[sample_id] = P::Scalar::zero();
            log::debug!("cluster {} lost all samples, reseeded from sample {}", i, sample_id);
        }
    }

    /// Recompute every centroid as the mean of its assigned samples and
    /// return the mean per-cluster displacement between old and new centroids.
    fn update_centroids<D: DistanceFunction<P>>(data: &KMeans<'_, P, D>, state: &mut KMeansState<P>) -> P::Scalar {
        let k = state.k;
        let used_centroids_cnt = {
            let KMeansState { assignments, centroid_frequency, .. } = &mut *state;
            data.update_cluster_frequencies(assignments, centroid_frequency)
        };
        if used_centroids_cnt != k {
            Self::reseed_empty_clusters(state);
        }

        let KMeansState { centroids, centroid_frequency, assignments, .. } = state;

        // Full accumulation over the current assignment, no partial updates
        let mut new_centroids: Vec<P> = centroids.iter().map(Point::zeros_like).collect();
        data.samples.iter()
            .zip(assignments.iter().copied())
            .for_each(|(sample, centroid_id)| new_centroids[centroid_id].add_in_place(sample));

        let mut shift_sum = P::Scalar::zero();
        for ((centroid, mut new_centroid), freq) in centroids.iter_mut()
            .zip(new_centroids)
            .zip(centroid_frequency.iter().copied())
        {
            new_centroid.div_in_place(<P::Scalar as NumCast>::from(freq).unwrap());
            shift_sum += data.distance.distance(centroid, &new_centroid);
            *centroid = new_centroid;
        }
        shift_sum / <P::Scalar as NumCast>::from(k).unwrap()
    }

    pub(crate) fn calculate<'a, D, F>(
        data: &KMeans<'a, P, D>, k: usize, max_iter: usize, init: F, config: &KMeansConfig<'_, P>,
    ) -> Result<KMeansState<P>, KMeansError>
    where
        D: DistanceFunction<P>,
        for<'c> F: FnOnce(&KMeans<'a, P, D>, &mut KMeansState<P>, &KMeansConfig<'c, P>),
    {
        let n = data.samples.len();
        if k == 0 || k > n {
            return Err(KMeansError::InvalidClusterCount { requested: k, n_samples: n });
        }
        if n < 2 {
            return Err(KMeansError::TooFewSamples(n));
        }

        let mut state = KMeansState::new(&data.samples[0], n, k);

        // Seed the centroids and notify the subscriber. Seeding may shrink
        // state.k, every later step works on the shrunk count.
        init(data, &mut state, config);
        (config.init_done)(&state);

        data.update_cluster_assignments(&mut state);

        let check = ConvergenceCheck::new(config.epsilon, max_iter);
        for i in 1..=max_iter {
            let shift = Self::update_centroids(data, &mut state);
            data.update_cluster_assignments(&mut state);

            state.convergence = shift;
            state.iterations = i;
            (config.iteration_done)(&state, i, shift);
            log::debug!("iteration {}: mean centroid shift {}", i, shift);

            if let Some(termination) = check.evaluate(i, shift) {
                state.termination = termination;
                break;
            }
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::testing::canonicalize_assignments;
    use crate::{EuclideanDistance, Termination};
    use rand::prelude::*;
    use std::cell::RefCell;

    fn collinear_samples() -> Vec<Vec<f64>> {
        [0.0, 1.0, 2.0, 8.0, 9.0, 10.0].iter().map(|&x| vec![x]).collect()
    }

    #[test]
    fn duplicate_pairs_collapse_to_their_two_positions() {
        let samples: Vec<Vec<f64>> = vec![
            vec![0.0, 0.0], vec![0.0, 0.0], vec![10.0, 10.0], vec![10.0, 10.0],
        ];
        let kmean = KMeans::new(&samples, EuclideanDistance);
        let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(1)).build();
        let res = kmean.kmeans_lloyd(2, 100, KMeans::init_kmeanplusplus, &conf).unwrap();

        assert_eq!(res.k, 2);
        assert_eq!(res.termination, Termination::Converged);
        assert!(res.iterations <= 2);
        assert_eq!(res.convergence, 0.0);
        assert_eq!(canonicalize_assignments(&res.assignments), vec![0, 0, 1, 1]);
        assert_eq!(res.centroids[res.assignments[0]], vec![0.0, 0.0]);
        assert_eq!(res.centroids[res.assignments[2]], vec![10.0, 10.0]);
        assert_eq!(res.centroid_frequency, vec![2, 2]);
    }

    #[test]
    fn collinear_samples_split_at_the_gap() {
        let samples = collinear_samples();
        let kmean = KMeans::new(&samples, EuclideanDistance);
        let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(3)).build();
        let res = kmean.kmeans_lloyd(2, 100, KMeans::init_kmeanplusplus, &conf).unwrap();

        assert_eq!(res.termination, Termination::Converged);
        assert_eq!(canonicalize_assignments(&res.assignments), vec![0, 0, 0, 1, 1, 1]);
        let low = res.assignments[0];
        let high = res.assignments[3];
        assert_approx_eq!(res.centroids[low][0], 1.0, 1e-9);
        assert_approx_eq!(res.centroids[high][0], 9.0, 1e-9);
        assert_eq!(res.centroid_frequency[low], 3);
        assert_eq!(res.centroid_frequency[high], 3);
    }

    #[test]
    fn deterministic_run_with_greedy_seeds() {
        let samples = collinear_samples();
        let kmean = KMeans::new(&samples, EuclideanDistance);
        let res = kmean.kmeans_lloyd(2, 100, KMeans::init_greedy, &KMeansConfig::default()).unwrap();

        assert_eq!(res.termination, Termination::Converged);
        assert_eq!(res.iterations, 3);
        assert_eq!(res.convergence, 0.0);
        assert_eq!(res.assignments, vec![0, 0, 0, 1, 1, 1]);
        assert_eq!(res.centroids, vec![vec![1.0], vec![9.0]]);
        assert_eq!(res.centroid_frequency, vec![3, 3]);
    }

    #[test]
    fn k_equal_to_n_converges_on_the_samples_themselves() {
        let samples: Vec<Vec<f64>> = vec![
            vec![0.0, 0.0], vec![5.0, 0.0], vec![0.0, 5.0], vec![5.0, 5.0],
        ];
        let kmean = KMeans::new(&samples, EuclideanDistance);
        let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(9)).build();
        let res = kmean.kmeans_lloyd(4, 100, KMeans::init_kmeanplusplus, &conf).unwrap();

        assert_eq!(res.k, 4);
        assert_eq!(res.termination, Termination::Converged);
        assert_eq!(res.iterations, 1);
        assert_eq!(res.convergence, 0.0);
        assert_eq!(res.centroid_frequency, vec![1, 1, 1, 1]);
        let mut seen = res.assignments.clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn two_samples_one_cluster_yields_their_mean() {
        let samples: Vec<Vec<f64>> = vec![vec![0.0, 0.0], vec![2.0, 0.0]];
        let kmean = KMeans::new(&samples, EuclideanDistance);
        let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(5)).build();
        let res = kmean.kmeans_lloyd(1, 100, KMeans::init_kmeanplusplus, &conf).unwrap();

        assert_eq!(res.termination, Termination::Converged);
        assert_eq!(res.iterations, 2);
        assert_eq!(res.convergence, 0.0);
        assert_eq!(res.centroids, vec![vec![1.0, 0.0]]);
        assert_eq!(res.assignments, vec![0, 0]);
        assert_eq!(res.centroid_frequency, vec![2]);
    }

    #[test]
    fn empty_cluster_reseeded_from_the_farthest_sample() {
        let samples: Vec<Vec<f64>> = vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![4.0, 0.0]];
        let kmean = KMeans::new(&samples, EuclideanDistance);

        // The second centroid starts so far out that no sample picks it
        let res = kmean.kmeans_lloyd(2, 1, |_, state, _| {
            state.set_centroids(vec![vec![2.0, 0.0], vec![1337.0, 0.0]]);
        }, &KMeansConfig::default()).unwrap();

        assert_eq!(res.assignments, vec![0, 0, 1]);
        assert_eq!(res.centroids, vec![vec![1.5, 0.0], vec![4.0, 0.0]]);
        assert_eq!(res.centroid_frequency, vec![2, 1]);
        assert_eq!(res.centroid_distances, vec![0.25, 0.25, 0.0]);
        assert_eq!(res.termination, Termination::IterationLimit);
    }

    #[test]
    fn centroid_shift_is_non_increasing() {
        let samples = collinear_samples();
        let kmean = KMeans::new(&samples, EuclideanDistance);
        let shifts: RefCell<Vec<f64>> = RefCell::new(Vec::new());
        let record = |_: &crate::KMeansState<Vec<f64>>, _: usize, shift: f64| shifts.borrow_mut().push(shift);
        let conf = KMeansConfig::build().iteration_done(&record).build();
        let res = kmean.kmeans_lloyd(2, 100, KMeans::init_greedy, &conf).unwrap();
        assert_eq!(res.termination, Termination::Converged);

        let shifts = shifts.borrow().clone();
        assert_eq!(shifts, vec![12.5, 5.0, 0.0]);
        assert!(shifts.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn early_terminated_seeding_shrinks_the_cluster_count() {
        let samples: Vec<Vec<f64>> = vec![
            vec![0.0, 0.0], vec![0.0, 0.0], vec![10.0, 10.0], vec![10.0, 10.0],
        ];
        let kmean = KMeans::new(&samples, EuclideanDistance);
        let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(11)).build();
        // three clusters requested, only two distinct positions exist
        let res = kmean.kmeans_lloyd(3, 100, KMeans::init_kmeanplusplus, &conf).unwrap();

        assert_eq!(res.k, 2);
        assert_eq!(res.centroids.len(), 2);
        assert_eq!(res.centroid_frequency.len(), 2);
        assert_eq!(res.termination, Termination::Converged);
        assert!(res.assignments.iter().all(|&a| a < 2));
        assert_eq!(canonicalize_assignments(&res.assignments), vec![0, 0, 1, 1]);
    }

    #[test]
    fn seeding_metric_can_differ_from_refinement_metric() {
        let samples = collinear_samples();
        let kmean = KMeans::new(&samples, EuclideanDistance);
        let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(17)).build();
        let init = KMeans::init_kmeanplusplus_with(crate::HistogramDistance);
        let res = kmean.kmeans_lloyd(2, 100, init, &conf).unwrap();

        assert_eq!(res.termination, Termination::Converged);
        assert_eq!(canonicalize_assignments(&res.assignments), vec![0, 0, 0, 1, 1, 1]);
    }
}
