//! K-means clustering of feature vectors
//!
//! Lloyd iterations seeded with k-means++, repeated `n_init` times from one
//! seeded generator; the run with the lowest inertia is kept. Identical
//! input and seed always give identical labels.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use uhi_core::{Error, Result};

use crate::maybe_rayon::*;

/// Parameters for K-means clustering
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansParams {
    /// Number of clusters (default: 3)
    pub k: usize,
    /// Maximum Lloyd iterations per initialization (default: 300)
    pub max_iterations: usize,
    /// Number of k-means++ initializations (default: 10)
    pub n_init: usize,
    /// Relative convergence tolerance, scaled by the mean feature variance
    /// (default: 1e-4)
    pub tolerance: f64,
    /// Random seed for centroid initialization
    pub seed: u64,
}

impl Default for KmeansParams {
    fn default() -> Self {
        Self {
            k: 3,
            max_iterations: 300,
            n_init: 10,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

impl KmeansParams {
    pub fn validate(&self) -> Result<()> {
        if self.k < 2 {
            return Err(Error::invalid_parameter("k", self.k, "K-means requires k >= 2"));
        }
        if self.n_init == 0 {
            return Err(Error::invalid_parameter("n_init", self.n_init, "must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(Error::invalid_parameter(
                "max_iterations",
                self.max_iterations,
                "must be at least 1",
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(Error::invalid_parameter(
                "tolerance",
                self.tolerance,
                "must be a finite non-negative number",
            ));
        }
        Ok(())
    }
}

/// Outcome of the best initialization
#[derive(Debug, Clone)]
pub struct KmeansResult {
    /// Cluster label of each row, in `0..k`
    pub labels: Vec<usize>,
    /// Cluster centers (k × features), in the units of the input
    pub centroids: Array2<f64>,
    /// Sum of squared distances of rows to their centers
    pub inertia: f64,
    /// Lloyd iterations used by the winning initialization
    pub iterations: usize,
}

/// Cluster the rows of `data` into `params.k` groups.
///
/// # Errors
/// * `InvalidParameter` for invalid `params`
/// * `InsufficientData` if there are fewer rows than clusters
/// * `Computation` for non-finite features, fewer than `k` distinct rows,
///   or a cluster left empty after convergence
pub fn kmeans(data: ArrayView2<'_, f64>, params: &KmeansParams) -> Result<KmeansResult> {
    params.validate()?;

    let n = data.nrows();
    if n < params.k {
        return Err(Error::InsufficientData {
            available: n,
            required: params.k,
        });
    }
    if data.ncols() == 0 {
        return Err(Error::Computation("feature matrix has no columns".into()));
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(Error::Computation(
            "feature matrix contains non-finite values".into(),
        ));
    }

    let mean_variance = data.var_axis(Axis(0), 0.0).mean().unwrap_or(0.0);
    let tol = params.tolerance * mean_variance;

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut best: Option<KmeansResult> = None;

    for init in 0..params.n_init {
        let centroids = kmeans_plus_plus(data, params.k, &mut rng)?;
        let run = lloyd(data, centroids, params.max_iterations, tol)?;
        debug!(init, inertia = run.inertia, iterations = run.iterations, "k-means run");

        // First run wins ties
        if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }

    best.ok_or_else(|| Error::Computation("k-means produced no result".into()))
}

/// k-means++ seeding: first center uniform, each next one drawn with
/// probability proportional to its squared distance from the nearest
/// chosen center.
fn kmeans_plus_plus(data: ArrayView2<'_, f64>, k: usize, rng: &mut StdRng) -> Result<Array2<f64>> {
    let n = data.nrows();
    let mut centroids = Array2::zeros((k, data.ncols()));

    let first = rng.gen_range(0..n);
    centroids.row_mut(0).assign(&data.row(first));

    let mut closest: Vec<f64> = data
        .outer_iter()
        .map(|row| squared_distance(row, centroids.row(0)))
        .collect();

    for c in 1..k {
        let total: f64 = closest.iter().sum();
        if total <= 0.0 {
            return Err(Error::Computation(format!(
                "data has fewer than {} distinct points",
                k
            )));
        }

        let target = rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        let mut chosen = None;
        for (i, &d) in closest.iter().enumerate() {
            if d <= 0.0 {
                continue;
            }
            cumulative += d;
            chosen = Some(i);
            if cumulative > target {
                break;
            }
        }
        let chosen = chosen.ok_or_else(|| {
            Error::Computation("k-means++ could not pick a center".into())
        })?;

        centroids.row_mut(c).assign(&data.row(chosen));
        for (i, row) in data.outer_iter().enumerate() {
            let d = squared_distance(row, centroids.row(c));
            if d < closest[i] {
                closest[i] = d;
            }
        }
    }

    Ok(centroids)
}

fn lloyd(
    data: ArrayView2<'_, f64>,
    mut centroids: Array2<f64>,
    max_iterations: usize,
    tol: f64,
) -> Result<KmeansResult> {
    let n = data.nrows();
    let k = centroids.nrows();
    let mut labels = vec![0usize; n];
    let mut iterations = 0;

    for _ in 0..max_iterations {
        iterations += 1;
        assign(data, centroids.view(), &mut labels);

        let mut updated = member_means(data, &labels, k);
        relocate_empty(data, &mut updated, &mut labels);

        let shift: f64 = (&updated.centroids - &centroids).mapv(|d| d * d).sum();
        centroids = updated.centroids;
        if shift <= tol {
            break;
        }
    }

    // Final pass: labels consistent with the centers, centers as member means
    assign(data, centroids.view(), &mut labels);
    let finals = member_means(data, &labels, k);
    if let Some(empty) = finals.counts.iter().position(|&c| c == 0) {
        return Err(Error::Computation(format!(
            "cluster {} is empty after convergence",
            empty
        )));
    }

    let inertia = data
        .outer_iter()
        .zip(&labels)
        .map(|(row, &l)| squared_distance(row, finals.centroids.row(l)))
        .sum();

    Ok(KmeansResult {
        labels,
        centroids: finals.centroids,
        inertia,
        iterations,
    })
}

struct MemberMeans {
    centroids: Array2<f64>,
    counts: Vec<usize>,
}

fn member_means(data: ArrayView2<'_, f64>, labels: &[usize], k: usize) -> MemberMeans {
    let mut sums = Array2::<f64>::zeros((k, data.ncols()));
    let mut counts = vec![0usize; k];
    for (row, &l) in data.outer_iter().zip(labels) {
        let mut s = sums.row_mut(l);
        s += &row;
        counts[l] += 1;
    }
    for (mut s, &c) in sums.outer_iter_mut().zip(&counts) {
        if c > 0 {
            s /= c as f64;
        }
    }
    MemberMeans {
        centroids: sums,
        counts,
    }
}

/// Move each empty cluster's center onto the point farthest from its own
/// center, taking that point out of its old cluster.
fn relocate_empty(data: ArrayView2<'_, f64>, means: &mut MemberMeans, labels: &mut [usize]) {
    let k = means.counts.len();
    for c in 0..k {
        if means.counts[c] > 0 {
            continue;
        }

        let far = data
            .outer_iter()
            .enumerate()
            .filter(|(i, _)| means.counts[labels[*i]] > 1)
            .map(|(i, row)| (i, squared_distance(row, means.centroids.row(labels[i]))))
            .fold(None, |acc: Option<(usize, f64)>, (i, d)| match acc {
                Some((_, best)) if best >= d => acc,
                _ => Some((i, d)),
            });

        if let Some((i, _)) = far {
            let old = labels[i];
            means.counts[old] -= 1;
            means.counts[c] = 1;
            labels[i] = c;
            means.centroids.row_mut(c).assign(&data.row(i));
            let refreshed = cluster_mean(data, labels, old);
            if let Some(m) = refreshed {
                means.centroids.row_mut(old).assign(&m);
            }
        }
    }
}

fn cluster_mean(data: ArrayView2<'_, f64>, labels: &[usize], cluster: usize) -> Option<Array1<f64>> {
    let mut sum = Array1::<f64>::zeros(data.ncols());
    let mut count = 0usize;
    for (row, &l) in data.outer_iter().zip(labels) {
        if l == cluster {
            sum += &row;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f64)
}

/// Nearest-center assignment; ties go to the lowest cluster index.
fn assign(data: ArrayView2<'_, f64>, centroids: ArrayView2<'_, f64>, labels: &mut [usize]) {
    labels.par_iter_mut().enumerate().for_each(|(i, label)| {
        let row = data.row(i);
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (c, center) in centroids.outer_iter().enumerate() {
            let d = squared_distance(row, center);
            if d < best_dist {
                best_dist = d;
                best = c;
            }
        }
        *label = best;
    });
}

#[inline]
fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
