//! # kcluster - API documentation
//!
//! kcluster is a small rust library for k-means clustering calculations over
//! caller-supplied vector types.
//!
//! ## Design target
//! The engine is generic over the clustered vector type: anything that can
//! hand out a zero-valued twin of itself, accumulate elementwise and divide by
//! a scalar works as a sample (see [`Point`], implemented for `Vec<f32/f64>`
//! and `[f32/f64; N]` out of the box). Distances are injected the same way
//! through [`DistanceFunction`], so exotic metrics plug in without touching
//! the engine. Everything runs single-threaded and synchronously; a run is a
//! pure function of its inputs plus the injected random generator.
//!
//! ## Supported centroid initializations
//! The outcome of each run depends on the initialization of its clusters.
//! Supported are probability-weighted k-means++ selection (the usual choice,
//! [`KMeans::init_kmeanplusplus`]) and deterministic first-k selection as a
//! baseline ([`KMeans::init_greedy`]).
//!
//! ## Convergence
//! Refinement alternates mean recomputation and reassignment until the mean
//! centroid shift of an iteration falls below a configurable epsilon, or an
//! iteration cap is hit. Hitting the cap is not an error; the returned state
//! says how the run ended ([`Termination`]) and what the last shift was, so
//! callers can judge the quality themselves.
//!
//! ## Example
//! ```rust
//! use kcluster::*;
//!
//! // Two separated blobs on a diagonal
//! let samples: Vec<Vec<f64>> = (0..40)
//!     .map(|i| {
//!         let offset = if i % 2 == 0 { 0.0 } else { 25.0 };
//!         vec![offset + (i / 2) as f64 * 0.1, offset - (i / 2) as f64 * 0.1]
//!     })
//!     .collect();
//!
//! // Calculate kmeans, using kmean++ as initialization-method
//! let kmean = KMeans::new(&samples, EuclideanDistance);
//! let result = kmean
//!     .kmeans_lloyd(2, 100, KMeans::init_kmeanplusplus, &KMeansConfig::default())
//!     .expect("more samples than clusters");
//!
//! println!("Centroids: {:?}", result.centroids);
//! println!("Cluster-Assignments: {:?}", result.assignments);
//! println!("Mean centroid shift at termination: {}", result.convergence);
//! ```
//!
//! ## Example (deterministic run, status callbacks)
//! ```rust
//! use kcluster::*;
//! use rand::prelude::*;
//!
//! let samples: Vec<[f64; 1]> = [0.0, 1.0, 2.0, 8.0, 9.0, 10.0].map(|x| [x]).to_vec();
//!
//! let conf = KMeansConfig::build()
//!     .random_generator(StdRng::seed_from_u64(1337))
//!     .init_done(&|_| println!("Initialization completed."))
//!     .iteration_done(&|_, nr, shift| println!("Iteration {} - shift {}", nr, shift))
//!     .build();
//!
//! let kmean = KMeans::new(&samples, EuclideanDistance);
//! let result = kmean.kmeans_lloyd(2, 100, KMeans::init_kmeanplusplus, &conf).unwrap();
//! assert!(result.termination.is_converged());
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`KMeans`] struct, which borrows the
//! samples and owns the distance function used during refinement. Its
//! instance-method [`KMeans::kmeans_lloyd`] runs one full calculation and
//! returns a [`KMeansState`] carrying centroids, per-sample assignments,
//! cluster sizes and convergence information. The centroid initialization
//! methods are static methods of [`KMeans`], simply passed in as reference.
//!
//! The seeding strategies are additionally usable on their own through
//! [`inits::greedy::seed`] and [`inits::kmeanplusplus::seed`], and one-shot
//! nearest-centroid assignment through [`assign`].

#[macro_use] mod helpers;
mod api;
mod convergence;
mod distances;
mod error;
mod point;
mod variants;
pub mod inits;

pub use api::{assign, DistanceFunction, KMeans, KMeansConfig, KMeansConfigBuilder, KMeansState};
pub use api::{InitDoneCallbackFn, IterationDoneCallbackFn};
pub use convergence::Termination;
pub use distances::{EuclideanDistance, HistogramDistance};
pub use error::KMeansError;
pub use point::{Point, Primitive};
