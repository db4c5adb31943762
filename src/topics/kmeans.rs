// Seeded k-means clustering over embedding vectors.
//
// k-means++ seeding followed by Lloyd iterations. The RNG is seeded from a
// fixed value, so identical input always yields identical labels.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::embeddings::euclidean_distance;

/// Seed used when callers don't pick one.
pub const DEFAULT_SEED: u64 = 42;

/// Upper bound on Lloyd iterations.
pub const MAX_ITERATIONS: usize = 300;

/// Labels and centroids from one k-means run.
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Cluster label per input point, in input order
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
}

/// Cluster `points` into exactly `k` groups.
///
/// Returns `None` when `k` is zero or there are fewer points than `k`.
/// Empty clusters are re-seeded with the point farthest from its own
/// centroid, so every label in `0..k` is used whenever there are at least
/// `k` distinct points.
pub fn kmeans(points: &[Vec<f64>], k: usize, seed: u64) -> Option<KMeansResult> {
    if k == 0 || points.len() < k {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids = kmeans_pp_init(points, k, &mut rng);
    let mut labels = vec![usize::MAX; points.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (i, point) in points.iter().enumerate() {
            let nearest = nearest_centroid(point, &centroids);
            if labels[i] != nearest {
                labels[i] = nearest;
                changed = true;
            }
        }

        reseed_empty_clusters(points, &mut labels, &mut centroids);
        centroids = update_centroids(points, &labels, &centroids);

        if !changed {
            break;
        }
    }

    Some(KMeansResult { labels, centroids })
}

fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, euclidean_distance(point, c)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Move each empty cluster onto the point that sits farthest from its
/// assigned centroid, taking that point out of its old cluster.
fn reseed_empty_clusters(points: &[Vec<f64>], labels: &mut [usize], centroids: &mut [Vec<f64>]) {
    let k = centroids.len();
    for cluster in 0..k {
        let mut sizes = vec![0usize; k];
        for &label in labels.iter() {
            sizes[label] += 1;
        }
        if sizes[cluster] > 0 {
            continue;
        }

        // Only steal from clusters that would stay non-empty.
        let farthest = points
            .iter()
            .enumerate()
            .filter(|(i, _)| sizes[labels[*i]] > 1)
            .map(|(i, p)| (i, euclidean_distance(p, &centroids[labels[i]])))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);

        if let Some(idx) = farthest {
            labels[idx] = cluster;
            centroids[cluster] = points[idx].clone();
        }
    }
}

fn update_centroids(points: &[Vec<f64>], labels: &[usize], previous: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let k = previous.len();
    let dim = points.first().map(|p| p.len()).unwrap_or(0);

    let mut sums = vec![vec![0.0; dim]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in points.iter().zip(labels.iter()) {
        for (i, &val) in point.iter().enumerate() {
            sums[label][i] += val;
        }
        counts[label] += 1;
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(c, (mut sum, count))| {
            if count == 0 {
                // keep the old position rather than collapsing to the origin
                return previous[c].clone();
            }
            for val in sum.iter_mut() {
                *val /= count as f64;
            }
            sum
        })
        .collect()
}

/// k-means++ seeding: first centroid uniformly at random, each next one with
/// probability proportional to its squared distance to the nearest chosen
/// centroid.
fn kmeans_pp_init(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    let first = rng.random_range(0..points.len());
    centroids.push(points[first].clone());

    while centroids.len() < k {
        let distances: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| euclidean_distance(p, c))
                    .fold(f64::INFINITY, f64::min)
                    .powi(2)
            })
            .collect();
        let total: f64 = distances.iter().sum();

        let next = if total > 0.0 {
            let mut threshold = rng.random::<f64>() * total;
            let mut chosen = points.len() - 1;
            for (idx, &dist) in distances.iter().enumerate() {
                threshold -= dist;
                if threshold <= 0.0 && dist > 0.0 {
                    chosen = idx;
                    break;
                }
            }
            chosen
        } else {
            // every point coincides with a centroid already
            rng.random_range(0..points.len())
        };

        centroids.push(points[next].clone());
    }

    centroids
}
