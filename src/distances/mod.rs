mod euclideandistance;
mod histogramdistance;

pub use euclideandistance::EuclideanDistance;
pub use histogramdistance::HistogramDistance;
