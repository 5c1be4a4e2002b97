use thiserror::Error;

/// Errors reported when clustering preconditions do not hold.
///
/// Early seeding termination and hitting the iteration cap are *not* errors;
/// both are regular results (see [`KMeansState`](crate::KMeansState) and
/// [`Termination`](crate::Termination)).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KMeansError {
    /// The requested cluster count cannot be satisfied by the input set.
    #[error("cannot form {requested} clusters from {n_samples} samples")]
    InvalidClusterCount { requested: usize, n_samples: usize },

    /// The random first-seed draw is undefined for fewer than two samples.
    #[error("clustering needs at least 2 samples, got {0}")]
    TooFewSamples(usize),
}
