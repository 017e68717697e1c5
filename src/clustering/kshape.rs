//! k-Shape clustering.
//!
//! k-Shape alternates between two steps until no series changes cluster:
//!
//! 1. **Update**: every centroid is re-extracted from its members with
//!    [`extract_shape`], aligned against the previous centroid.
//! 2. **Assign**: every series moves to the centroid with the smallest
//!    shape-based distance. Ties go to the lowest label.
//!
//! A cluster that ends up without members is reseeded before the next
//! update by moving one series into it.

use super::shape::extract_shape;
use crate::compute::try_map_indices;
use crate::core::{Batch, ComputeContext};
use crate::distance::sbd_matrix;
use crate::error::{Result, TsError};
use crate::transform::ZNorm;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// k-Shape configuration.
#[derive(Debug, Clone)]
pub struct KShapeConfig {
    /// Number of clusters
    pub k: usize,
    /// Maximum iterations
    pub max_iter: usize,
    /// Random seed for label initialization and reseeding
    pub seed: Option<u64>,
    /// Draw initial labels uniformly at random instead of using `initial_labels`
    pub randomize_labels: bool,
    /// Initial label of every series, each in `0..k`
    pub initial_labels: Option<Vec<usize>>,
    /// Initial centroids (`k` series), used as alignment references for the
    /// first update
    pub initial_centroids: Option<Batch>,
}

impl Default for KShapeConfig {
    fn default() -> Self {
        Self {
            k: 3,
            max_iter: 100,
            seed: None,
            randomize_labels: true,
            initial_labels: None,
            initial_centroids: None,
        }
    }
}

impl KShapeConfig {
    /// Set number of clusters.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set maximum iterations.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set random seed. Without a seed, clustering is not reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Draw random initial labels instead of using the supplied ones.
    pub fn randomize_labels(mut self, randomize: bool) -> Self {
        self.randomize_labels = randomize;
        self
    }

    /// Start from the given labels. Turns label randomization off.
    pub fn initial_labels(mut self, labels: Vec<usize>) -> Self {
        self.initial_labels = Some(labels);
        self.randomize_labels = false;
        self
    }

    /// Start from the given centroids. Together with initial labels that
    /// cover every cluster, the first assignment is made against these
    /// centroids directly; otherwise they are the alignment references of the
    /// first update.
    pub fn initial_centroids(mut self, centroids: Batch) -> Self {
        self.initial_centroids = Some(centroids);
        self
    }

    fn validate(&self, data: &Batch) -> Result<()> {
        let m = data.count();
        if m == 0 || data.series_len() == 0 {
            return Err(TsError::EmptyData);
        }
        if self.k == 0 || self.k > m {
            return Err(TsError::InvalidClusterCount { k: self.k, n: m });
        }
        if self.max_iter == 0 {
            return Err(TsError::InvalidParameter(
                "max_iter must be at least 1".into(),
            ));
        }

        match &self.initial_labels {
            Some(labels) => {
                if labels.len() != m {
                    return Err(TsError::DimensionMismatch {
                        expected: m,
                        got: labels.len(),
                    });
                }
                if let Some(&bad) = labels.iter().find(|&&l| l >= self.k) {
                    return Err(TsError::InvalidParameter(format!(
                        "initial label {} is out of range for k = {}",
                        bad, self.k
                    )));
                }
            }
            None if !self.randomize_labels => {
                return Err(TsError::InvalidParameter(
                    "initial labels are required when label randomization is off".into(),
                ));
            }
            None => {}
        }

        if let Some(centroids) = &self.initial_centroids {
            if centroids.count() != self.k {
                return Err(TsError::DimensionMismatch {
                    expected: self.k,
                    got: centroids.count(),
                });
            }
            if centroids.series_len() != data.series_len() {
                return Err(TsError::DimensionMismatch {
                    expected: data.series_len(),
                    got: centroids.series_len(),
                });
            }
        }
        Ok(())
    }
}

/// How the clustering loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KShapeStatus {
    /// An assignment step left every label unchanged.
    Converged,
    /// The iteration limit was hit while labels were still changing.
    MaxIterationsReached,
}

/// k-Shape clustering result.
#[derive(Debug, Clone)]
pub struct KShapeResult {
    /// Cluster label of every series, each in `0..k`
    pub labels: Vec<usize>,
    /// One z-normalized centroid per cluster; `labels` is the assignment
    /// against exactly these centroids
    pub centroids: Batch,
    /// Number of iterations performed
    pub n_iter: usize,
    /// How the loop ended
    pub status: KShapeStatus,
    /// Number of empty clusters that had to be reseeded
    pub reseeds: usize,
}

impl KShapeResult {
    /// Whether the final assignment left every label unchanged.
    pub fn converged(&self) -> bool {
        self.status == KShapeStatus::Converged
    }

    /// Get indices of series in a specific cluster.
    pub fn cluster_members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == cluster)
            .map(|(i, _)| i)
            .collect()
    }

    /// Get the size of each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        cluster_sizes(&self.labels, self.centroids.count())
    }
}

/// Cluster a batch of series with k-Shape.
///
/// All configuration is validated before any computation. An empty cluster
/// is reseeded with the series farthest from its own centroid (or a random
/// series on the first iteration), taken from a cluster that keeps at least
/// one member.
///
/// # Example
///
/// ```
/// use tsbatch::clustering::{calibrate, classify, KShapeConfig};
/// use tsbatch::core::{Batch, ComputeContext};
///
/// let ctx = ComputeContext::new();
/// let data = Batch::from_series(&[
///     vec![0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0],
///     vec![0.0, 0.0, 0.0, 5.0, 5.0, 5.0, 5.0, 5.0],
///     vec![1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0],
///     vec![0.0, 0.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0],
/// ])
/// .unwrap();
///
/// let config = KShapeConfig::default().k(2).initial_labels(vec![0, 1, 0, 1]);
/// let result = calibrate(&ctx, &data, &config).unwrap();
/// assert_eq!(result.centroids.count(), 2);
/// assert_eq!(classify(&ctx, &data, &result.centroids).unwrap(), result.labels);
/// ```
pub fn calibrate(ctx: &ComputeContext, data: &Batch, config: &KShapeConfig) -> Result<KShapeResult> {
    config.validate(data)?;

    let m = data.count();
    let k = config.k;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut labels = match (&config.initial_labels, config.randomize_labels) {
        (Some(labels), false) => labels.clone(),
        _ => (0..m).map(|_| rng.gen_range(0..k)).collect(),
    };

    let initial = match &config.initial_centroids {
        Some(centroids) => Some(ZNorm::default().apply(centroids)?.with_precision(data.precision())),
        None => None,
    };
    let mut previous: Vec<Option<Vec<f64>>> = match &initial {
        Some(centroids) => centroids.iter().map(|c| Some(c.to_vec())).collect(),
        None => vec![None; k],
    };

    // Labels and centroids from an earlier run are assigned as-is first, so
    // a fixed point is recognized without re-extracting its centroids.
    let mut supplied = match (&initial, config.randomize_labels) {
        (Some(centroids), false) if cluster_sizes(&labels, k).iter().all(|&s| s > 0) => {
            Some(centroids.clone())
        }
        _ => None,
    };

    debug!(
        series = m,
        k,
        max_iter = config.max_iter,
        warm_start = supplied.is_some(),
        "starting k-shape"
    );

    let mut distances: Option<Vec<f64>> = None;
    let mut reseeds = 0;

    for iteration in 1..=config.max_iter {
        let (centroids, centroid_batch) = match supplied.take() {
            Some(batch) => (batch.iter().map(<[f64]>::to_vec).collect::<Vec<_>>(), batch),
            None => {
                reseeds += reseed_empty_clusters(&mut labels, k, distances.as_deref(), &mut rng)?;

                let members: Vec<Vec<usize>> = (0..k)
                    .map(|c| (0..m).filter(|&i| labels[i] == c).collect())
                    .collect();
                let centroids = try_map_indices(ctx, k, |c| {
                    extract_shape(ctx, &data.select(&members[c]), previous[c].as_deref())
                })?;
                let batch = Batch::from_series(&centroids)?.with_precision(data.precision());
                (centroids, batch)
            }
        };

        let (assigned, dist) = assign(ctx, data, &centroid_batch)?;
        let changed = assigned
            .iter()
            .zip(labels.iter())
            .filter(|(a, b)| a != b)
            .count();
        debug!(iteration, changed, "k-shape iteration");

        if changed == 0 {
            debug!(iteration, reseeds, "k-shape converged");
            return Ok(KShapeResult {
                labels: assigned,
                centroids: centroid_batch,
                n_iter: iteration,
                status: KShapeStatus::Converged,
                reseeds,
            });
        }

        if iteration == config.max_iter {
            debug!(iteration, changed, "k-shape reached max iterations");
            return Ok(KShapeResult {
                labels: assigned,
                centroids: centroid_batch,
                n_iter: iteration,
                status: KShapeStatus::MaxIterationsReached,
                reseeds,
            });
        }

        labels = assigned;
        distances = Some(dist);
        previous = centroids.into_iter().map(Some).collect();
    }

    // max_iter >= 1 is validated, so the loop always returns
    Err(TsError::ComputationError(
        "k-shape loop ended without a result".into(),
    ))
}

/// Assign every series of `data` to its nearest centroid by shape-based
/// distance. Ties go to the lowest label.
pub fn classify(ctx: &ComputeContext, data: &Batch, centroids: &Batch) -> Result<Vec<usize>> {
    if data.count() == 0 || data.series_len() == 0 || centroids.count() == 0 {
        return Err(TsError::EmptyData);
    }
    if data.series_len() != centroids.series_len() {
        return Err(TsError::DimensionMismatch {
            expected: data.series_len(),
            got: centroids.series_len(),
        });
    }
    assign(ctx, data, centroids).map(|(labels, _)| labels)
}

/// Nearest-centroid labels with the distance of each series to its centroid.
fn assign(ctx: &ComputeContext, data: &Batch, centroids: &Batch) -> Result<(Vec<usize>, Vec<f64>)> {
    let matrix = sbd_matrix(ctx, centroids, Some(data))?;
    let k = centroids.count();

    let mut labels = Vec::with_capacity(data.count());
    let mut distances = Vec::with_capacity(data.count());
    for i in 0..data.count() {
        let mut best = 0;
        for c in 1..k {
            if matrix[(c, i)] < matrix[(best, i)] {
                best = c;
            }
        }
        labels.push(best);
        distances.push(matrix[(best, i)]);
    }
    Ok((labels, distances))
}

/// Move one series into every empty cluster. Donors come from clusters with
/// more than one member; the farthest from its centroid is preferred when
/// `distances` is known, otherwise a random donor is drawn.
fn reseed_empty_clusters(
    labels: &mut [usize],
    k: usize,
    distances: Option<&[f64]>,
    rng: &mut StdRng,
) -> Result<usize> {
    let mut sizes = cluster_sizes(labels, k);
    let mut reseeded = 0;

    for cluster in 0..k {
        if sizes[cluster] > 0 {
            continue;
        }

        let donors: Vec<usize> = (0..labels.len())
            .filter(|&i| sizes[labels[i]] > 1)
            .collect();
        if donors.is_empty() {
            return Err(TsError::ComputationError(format!(
                "cannot reseed empty cluster {}: no cluster has a spare member",
                cluster
            )));
        }

        let pick = match distances {
            Some(d) => {
                let mut far = donors[0];
                for &i in &donors[1..] {
                    if d[i] > d[far] {
                        far = i;
                    }
                }
                far
            }
            None => donors[rng.gen_range(0..donors.len())],
        };

        warn!(cluster, series = pick, from = labels[pick], "reseeding empty cluster");
        sizes[labels[pick]] -= 1;
        labels[pick] = cluster;
        sizes[cluster] = 1;
        reseeded += 1;
    }

    Ok(reseeded)
}

fn cluster_sizes(labels: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0; k];
    for &label in labels {
        if label < k {
            sizes[label] += 1;
        }
    }
    sizes
}
