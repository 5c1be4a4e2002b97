use kcluster::*;

fn main() {
    let (sample_cnt, sample_dims, k, max_iter) = (2000, 8, 4, 100);

    // Generate some random data
    let samples: Vec<Vec<f64>> = (0..sample_cnt)
        .map(|_| (0..sample_dims).map(|_| rand::random()).collect())
        .collect();

    let conf = KMeansConfig::build()
        .init_done(&|_| println!("Initialization completed."))
        .iteration_done(&|_, nr, shift|
            println!("Iteration {} - mean centroid shift: {:.6}", nr, shift))
        .build();

    // Calculate kmeans, using kmean++ as initialization-method
    let kmean = KMeans::new(&samples, EuclideanDistance);
    let result = kmean
        .kmeans_lloyd(k, max_iter, KMeans::init_kmeanplusplus, &conf)
        .expect("more samples than clusters");

    println!("Centroids: {:?}", result.centroids);
    println!("Terminated after {} iterations: {:?}", result.iterations, result.termination);
}
