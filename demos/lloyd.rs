use kcluster::*;

fn main() {
    let (sample_cnt, sample_dims, k, max_iter) = (2000, 8, 4, 100);

    // Generate some random data
    let samples: Vec<Vec<f64>> = (0..sample_cnt)
        .map(|_| (0..sample_dims).map(|_| rand::random()).collect())
        .collect();

    // Calculate kmeans, using kmean++ as initialization-method
    let kmean = KMeans::new(&samples, EuclideanDistance);
    let result = kmean
        .kmeans_lloyd(k, max_iter, KMeans::init_kmeanplusplus, &KMeansConfig::default())
        .expect("more samples than clusters");

    println!("Centroids: {:?}", result.centroids);
    println!("Cluster-Assignments: {:?}", result.assignments);
    println!("Cluster sizes: {:?}", result.centroid_frequency);
    println!("Terminated after {} iterations: {:?}", result.iterations, result.termination);
}
