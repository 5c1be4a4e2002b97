use crate::convergence::Termination;
use crate::error::KMeansError;
use crate::point::Point;
use num::{Float, NumCast};
use rand::prelude::*;
use std::cell::RefCell;

pub type InitDoneCallbackFn<'a, P> = &'a dyn Fn(&KMeansState<P>);
pub type IterationDoneCallbackFn<'a, P> = &'a dyn Fn(&KMeansState<P>, usize, <P as Point>::Scalar);

/// Distance between two points, injected into seeding and refinement.
///
/// Implementations are expected to return *squared* distances where that is
/// cheaper (the shipped [`EuclideanDistance`](crate::EuclideanDistance) does);
/// the engine never takes square roots and its default convergence epsilon is
/// pre-squared to match.
pub trait DistanceFunction<P: Point> {
    fn distance(&self, a: &P, b: &P) -> P::Scalar;
}

/// This is a structure holding various configuration options for a k-means
/// calculation, such as the random number generator to use, the convergence
/// epsilon, or a couple of callbacks that can be set to get status information
/// from a running calculation.
///
/// For more detailed information about all possible options, have a look at
/// [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a, P: Point> {
    /// Callback that is called when the initialization phase finished
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the initialization
    pub(crate) init_done: InitDoneCallbackFn<'a, P>,
    /// Callback that is called after each iteration
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the iteration
    /// - **iteration_id**: Number of the current iteration
    /// - **shift**: Mean centroid displacement produced by the iteration
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, P>,
    /// Random number generator to use
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
    /// Mean centroid shift below which a run counts as converged
    pub(crate) epsilon: P::Scalar,
}
impl<'a, P: Point> Default for KMeansConfig<'a, P> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_, _, _| {},
            rnd: Box::new(RefCell::new(rand::thread_rng())),
            epsilon: <P::Scalar as NumCast>::from(1e-2).unwrap().powi(2),
        }
    }
}
impl<'a, P: Point> KMeansConfig<'a, P> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, P> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }
}
impl<'a, P: Point> std::fmt::Debug for KMeansConfig<'a, P> {
    fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { Ok(()) }
}

pub struct KMeansConfigBuilder<'a, P: Point> {
    config: KMeansConfig<'a, P>,
}
impl<'a, P: Point> KMeansConfigBuilder<'a, P> {
    /// Set the callback that should be called after the centroid initialization, before the iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, P>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each iteration during a running k-means calculation.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, P>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the random number generator that should be used in the k-means calculation.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd)); self
    }
    /// Set the mean-centroid-shift threshold below which the refinement loop
    /// terminates. Distances are squared throughout the engine, so this value
    /// has to be squared as well.
    /// ## Default
    /// `1e-2` squared, i.e. `1e-4`
    pub fn epsilon(mut self, epsilon: P::Scalar) -> Self {
        self.config.epsilon = epsilon; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, P> { self.config }
}

/// This is the internally used data-structure, storing the current state during
/// calculation, as well as the final result, as returned by the API.
/// All mutations are done in this structure, making [`KMeans`] immutable, so
/// one instance can back multiple runs without duplicating the input-data.
///
/// ## Generics
/// - **P**: Vector type that was clustered
///
/// ## Fields
/// - **k**: Amount of clusters. May be lower than requested when
///   probability-weighted seeding terminated early (duplicate inputs).
/// - **centroids**: Calculated cluster centers, one per cluster
/// - **centroid_frequency**: Amount of samples in each cluster
/// - **assignments**: Vector mapping each sample to its nearest cluster, in input order
/// - **centroid_distances**: Each sample's distance to its centroid
/// - **convergence**: Mean centroid displacement of the last iteration
/// - **iterations**: Amount of refinement iterations that ran
/// - **termination**: Whether the run converged or hit the iteration cap
#[derive(Clone, Debug)]
pub struct KMeansState<P: Point> {
    pub k: usize,
    pub centroids: Vec<P>,
    pub centroid_frequency: Vec<usize>,
    pub assignments: Vec<usize>,
    pub centroid_distances: Vec<P::Scalar>,
    pub convergence: P::Scalar,
    pub iterations: usize,
    pub termination: Termination,
}
impl<P: Point> KMeansState<P> {
    pub(crate) fn new(proto: &P, sample_cnt: usize, k: usize) -> Self {
        Self {
            k,
            centroids: vec![proto.zeros_like(); k],
            centroid_frequency: vec![0usize; k],
            assignments: vec![0usize; sample_cnt],
            centroid_distances: vec![P::Scalar::infinity(); sample_cnt],
            convergence: P::Scalar::infinity(),
            iterations: 0,
            termination: Termination::IterationLimit,
        }
    }

    /// Install seeds as the current centroids. Fewer seeds than requested
    /// shrink the run's cluster count for good.
    pub(crate) fn set_centroids(&mut self, seeds: Vec<P>) {
        debug_assert!(!seeds.is_empty() && seeds.len() <= self.k);
        self.k = seeds.len();
        self.centroid_frequency.truncate(self.k);
        self.centroids = seeds;
    }
}

/// Index and distance of the nearest centroid, scanning left to right and
/// keeping the first strict minimum. Equidistant centroids therefore resolve
/// to the lowest index, reproducibly.
pub(crate) fn nearest_centroid<P, D>(sample: &P, centroids: &[P], distance: &D) -> (usize, P::Scalar)
where
    P: Point,
    D: DistanceFunction<P>,
{
    debug_assert!(!centroids.is_empty());
    let mut best_idx = 0;
    let mut best_dist = distance.distance(sample, &centroids[0]);
    for (idx, centroid) in centroids.iter().enumerate().skip(1) {
        let d = distance.distance(sample, centroid);
        if d < best_dist {
            best_dist = d;
            best_idx = idx;
        }
    }
    (best_idx, best_dist)
}

/// Assign every sample to its nearest centroid.
///
/// Pure function of its inputs: returns exactly one index per sample, each in
/// `[0, centroids.len())`, in input order. Ties break to the lowest centroid
/// index. `centroids` must not be empty.
pub fn assign<P, D>(samples: &[P], centroids: &[P], distance: &D) -> Vec<usize>
where
    P: Point,
    D: DistanceFunction<P>,
{
    samples.iter().map(|s| nearest_centroid(s, centroids, distance).0).collect()
}

/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct, giving the samples you want to operate
/// on and the distance function to refine with. Samples are borrowed for the
/// duration of the runs; results are handed back by value in [`KMeansState`].
///
/// ## Supported variants
/// - k-Means clustering (Lloyd) [`KMeans::kmeans_lloyd`]
///
/// ## Supported initialization methods
/// - K-Means++ [`KMeans::init_kmeanplusplus`] / [`KMeans::init_kmeanplusplus_with`]
/// - First-k [`KMeans::init_greedy`]
pub struct KMeans<'a, P, D>
where
    P: Point,
    D: DistanceFunction<P>,
{
    pub(crate) samples: &'a [P],
    pub(crate) distance: D,
}
impl<'a, P, D> KMeans<'a, P, D>
where
    P: Point,
    D: DistanceFunction<P>,
{
    /// Create a new instance of the [`KMeans`] structure.
    ///
    /// ## Arguments
    /// - **samples**: Slice of samples to cluster
    /// - **distance**: Distance function used for assignment and refinement
    pub fn new(samples: &'a [P], distance: D) -> Self {
        Self { samples, distance }
    }

    /// Recompute every sample's nearest centroid and its distance to it.
    pub(crate) fn update_cluster_assignments(&self, state: &mut KMeansState<P>) {
        let KMeansState { centroids, assignments, centroid_distances, .. } = state;
        let centroids = &centroids[..];
        self.samples.iter()
            .zip(assignments.iter_mut())
            .zip(centroid_distances.iter_mut())
            .for_each(|((sample, assignment), centroid_dist)| {
                let (best_idx, best_dist) = nearest_centroid(sample, centroids, &self.distance);
                *assignment = best_idx;
                *centroid_dist = best_dist;
            });
    }

    pub(crate) fn update_cluster_frequencies(&self, assignments: &[usize], centroid_frequency: &mut [usize]) -> usize {
        centroid_frequency.iter_mut().for_each(|v| *v = 0);
        let mut used_centroids_cnt = 0;
        assignments.iter().cloned()
            .for_each(|centroid_id| {
                if centroid_frequency[centroid_id] == 0 {
                    used_centroids_cnt += 1; // Count the amount of centroids with more than 0 samples
                }
                centroid_frequency[centroid_id] += 1;
            });
        used_centroids_cnt
    }

    /// Normal K-Means algorithm implementation (Lloyd's iteration).
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for
    /// - **max_iter**: Limit on the amount of refinement iterations
    /// - **init**: Initialization-Method to use for the initialization of the **k** centroids
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation
    ///
    /// ## Returns
    /// Instance of [`KMeansState`], containing the final state (result), or a
    /// [`KMeansError`] when `k == 0`, `k > n`, or `n < 2`.
    ///
    /// ## Example
    /// ```rust
    /// use kcluster::*;
    ///
    /// let samples: Vec<[f64; 2]> = (0..100).map(|i| [(i % 10) as f64, (i / 10) as f64]).collect();
    ///
    /// let kmean = KMeans::new(&samples, EuclideanDistance);
    /// let result = kmean.kmeans_lloyd(4, 100, KMeans::init_kmeanplusplus, &KMeansConfig::default()).unwrap();
    ///
    /// assert_eq!(result.assignments.len(), samples.len());
    /// assert!(result.assignments.iter().all(|&a| a < result.k));
    /// ```
    pub fn kmeans_lloyd<F>(&self, k: usize, max_iter: usize, init: F, config: &KMeansConfig<'_, P>) -> Result<KMeansState<P>, KMeansError>
            where for<'c> F: FnOnce(&KMeans<'a, P, D>, &mut KMeansState<P>, &KMeansConfig<'c, P>) {
        crate::variants::Lloyd::calculate(self, k, max_iter, init, config)
    }

    /// K-Means++ initialization method.
    ///
    /// ## Description
    /// Selects one sample uniformly at random as the first centroid, then
    /// iteratively draws further centroids with probability proportional to
    /// each sample's distance to the nearest centroid chosen so far. This
    /// leads to a tendency of selecting centroids that are far away from the
    /// already covered regions of the input. Selection stops early (with a
    /// lower `state.k`) when every remaining sample coincides with a chosen
    /// centroid.
    ///
    /// Uses the same distance function as the refinement; see
    /// [`KMeans::init_kmeanplusplus_with`] to seed with a different one.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it
    /// to an instance-method of [`KMeans`].
    pub fn init_kmeanplusplus(kmean: &KMeans<'a, P, D>, state: &mut KMeansState<P>, config: &KMeansConfig<'_, P>) {
        crate::inits::kmeanplusplus::calculate(kmean, state, config, &kmean.distance);
    }

    /// K-Means++ initialization method with its own distance function, for
    /// when seeding should weigh samples differently than refinement assigns
    /// them. Returns the init closure to pass to an instance-method.
    pub fn init_kmeanplusplus_with<M>(distance: M) -> impl for<'c> Fn(&KMeans<'a, P, D>, &mut KMeansState<P>, &KMeansConfig<'c, P>)
    where
        M: DistanceFunction<P>,
    {
        move |kmean, state, config| {
            crate::inits::kmeanplusplus::calculate(kmean, state, config, &distance);
        }
    }

    /// First-k initialization method.
    ///
    /// ## Description
    /// Deterministically takes the first `k` samples, in input order, as
    /// initial centroids. Baseline/fallback selection; the default pipeline
    /// seeds probabilistically instead.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it
    /// to an instance-method of [`KMeans`].
    pub fn init_greedy(kmean: &KMeans<'a, P, D>, state: &mut KMeansState<P>, config: &KMeansConfig<'_, P>) {
        crate::inits::greedy::calculate(kmean, state, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EuclideanDistance;

    #[test]
    fn assignment_covers_all_samples_in_range() {
        let samples: Vec<Vec<f64>> = vec![
            vec![0.0, 0.0], vec![1.0, 1.0], vec![9.0, 9.0], vec![10.0, 10.0], vec![5.0, 4.0],
        ];
        let centroids = vec![vec![0.5, 0.5], vec![9.5, 9.5]];
        let indices = assign(&samples, &centroids, &EuclideanDistance);

        assert_eq!(indices.len(), samples.len());
        assert!(indices.iter().all(|&i| i < centroids.len()));
        assert_eq!(indices, vec![0, 0, 1, 1, 0]);
    }

    #[test]
    fn ties_break_to_the_lowest_centroid_index() {
        // (3) is exactly between (1) and (5); (0) between (-2) and (2)
        let samples: Vec<Vec<f64>> = vec![vec![3.0], vec![0.0]];
        let centroids = vec![vec![1.0], vec![5.0]];
        for _ in 0..10 {
            assert_eq!(assign(&samples, &centroids, &EuclideanDistance), vec![0, 0]);
        }

        // identical centroids are the degenerate tie
        let twins = vec![vec![7.0], vec![7.0]];
        assert_eq!(assign(&samples, &twins, &EuclideanDistance), vec![0, 0]);
    }

    #[test]
    fn assignment_is_idempotent() {
        let samples: Vec<Vec<f64>> = vec![vec![0.0], vec![2.9], vec![3.1], vec![10.0]];
        let centroids = vec![vec![1.0], vec![5.0]];
        let first = assign(&samples, &centroids, &EuclideanDistance);
        let second = assign(&samples, &centroids, &EuclideanDistance);
        assert_eq!(first, second);
    }

    #[test]
    fn cluster_frequencies_count_used_centroids() {
        let samples: Vec<Vec<f64>> = vec![vec![0.0]];
        let kmean = KMeans::new(&samples, EuclideanDistance);
        let assignments = vec![0usize, 2, 2, 0, 0];
        let mut freq = vec![0usize; 3];
        let used = kmean.update_cluster_frequencies(&assignments, &mut freq);
        assert_eq!(used, 2);
        assert_eq!(freq, vec![3, 0, 2]);
    }

    #[test]
    fn rejects_degenerate_cluster_counts() {
        let samples: Vec<Vec<f64>> = vec![vec![0.0], vec![1.0], vec![2.0]];
        let kmean = KMeans::new(&samples, EuclideanDistance);
        let conf = KMeansConfig::default();

        let err = kmean.kmeans_lloyd(4, 100, KMeans::init_greedy, &conf).unwrap_err();
        assert_eq!(err, crate::KMeansError::InvalidClusterCount { requested: 4, n_samples: 3 });

        let err = kmean.kmeans_lloyd(0, 100, KMeans::init_greedy, &conf).unwrap_err();
        assert_eq!(err, crate::KMeansError::InvalidClusterCount { requested: 0, n_samples: 3 });

        let single: Vec<Vec<f64>> = vec![vec![0.0]];
        let kmean = KMeans::new(&single, EuclideanDistance);
        let err = kmean.kmeans_lloyd(1, 100, KMeans::init_greedy, &conf).unwrap_err();
        assert_eq!(err, crate::KMeansError::TooFewSamples(1));
    }
}
