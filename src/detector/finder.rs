/// Finder pattern detection using 1:1:3:1:1 ratio scanning with vertical confirmation
use log::{debug, trace};
use rayon::prelude::*;

use crate::config::ScanConfig;
use crate::error::{PatternKind, Result, ScanError};
use crate::models::{BinaryImage, DARK, Point};

/// A confirmed finder pattern hit, or the mean of a cluster of hits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderPattern {
    /// Centre in pixel-index coordinates
    pub centroid: Point,
    /// Horizontal extent of the five runs
    pub estimated_width: f64,
    /// Vertical extent of the five runs
    pub estimated_height: f64,
}

impl FinderPattern {
    /// Pattern centred at `centroid` with the given row and column extents
    pub fn new(centroid: Point, estimated_width: f64, estimated_height: f64) -> Self {
        Self {
            centroid,
            estimated_width,
            estimated_height,
        }
    }
}

/// The three finder patterns with their roles assigned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderPatternTrio {
    /// Corner pattern at the right angle
    pub top_left: FinderPattern,
    /// Pattern clockwise from the top-left one in image coordinates
    pub top_right: FinderPattern,
    /// Remaining pattern
    pub bottom_left: FinderPattern,
}

/// Hits merged around a running mean
#[derive(Debug, Clone, PartialEq)]
pub struct FinderCluster {
    population: usize,
    sum_x: f64,
    sum_y: f64,
    sum_width: f64,
    sum_height: f64,
}

impl FinderCluster {
    fn new(hit: &FinderPattern) -> Self {
        Self {
            population: 1,
            sum_x: hit.centroid.x,
            sum_y: hit.centroid.y,
            sum_width: hit.estimated_width,
            sum_height: hit.estimated_height,
        }
    }

    fn push(&mut self, hit: &FinderPattern) {
        self.population += 1;
        self.sum_x += hit.centroid.x;
        self.sum_y += hit.centroid.y;
        self.sum_width += hit.estimated_width;
        self.sum_height += hit.estimated_height;
    }

    /// Number of hits in the cluster
    pub fn population(&self) -> usize {
        self.population
    }

    /// Mean centroid of the hits
    pub fn centroid(&self) -> Point {
        let n = self.population as f64;
        Point::new(self.sum_x / n, self.sum_y / n)
    }

    /// Mean of all hits
    pub fn pattern(&self) -> FinderPattern {
        let n = self.population as f64;
        FinderPattern::new(self.centroid(), self.sum_width / n, self.sum_height / n)
    }
}

/// Position of a run inside the five-run window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunSlot {
    FirstBlack,
    FirstWhite,
    MiddleBlack,
    LastWhite,
    LastBlack,
}

const SLOTS: [RunSlot; 5] = [
    RunSlot::FirstBlack,
    RunSlot::FirstWhite,
    RunSlot::MiddleBlack,
    RunSlot::LastWhite,
    RunSlot::LastBlack,
];

/// Expected width of each slot in modules
const RATIOS: [f64; 5] = [1.0, 1.0, 3.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, Default)]
struct Run {
    start: usize,
    len: usize,
    dark: bool,
}

/// Last five runs of a row, oldest first
#[derive(Debug, Default)]
struct RunWindow {
    runs: [Run; 5],
    filled: usize,
}

impl RunWindow {
    fn push(&mut self, run: Run) {
        self.runs.rotate_left(1);
        self.runs[4] = run;
        self.filled = (self.filled + 1).min(5);
    }

    /// Five runs, dark-light-dark-light-dark
    fn is_candidate(&self) -> bool {
        self.filled == 5 && self.get(RunSlot::FirstBlack).dark
    }

    fn get(&self, slot: RunSlot) -> &Run {
        &self.runs[slot as usize]
    }

    fn lengths(&self) -> [usize; 5] {
        SLOTS.map(|slot| self.get(slot).len)
    }

    fn total(&self) -> usize {
        self.lengths().iter().sum()
    }
}

/// Whether five run lengths approximate 1:1:3:1:1 within `tolerance` of each expected width
pub fn ratio_matches(lengths: &[usize; 5], tolerance: f64) -> bool {
    let total: usize = lengths.iter().sum();
    if total < 7 {
        return false;
    }
    let unit = total as f64 / 7.0;
    lengths.iter().zip(RATIOS).all(|(&len, expected)| {
        (len as f64 - expected * unit).abs() <= tolerance * expected * unit
    })
}

/// Greedy clustering: each hit joins the first cluster whose running mean is within
/// `max_distance`. Clusters are returned most populated first; ties keep discovery order.
pub fn cluster_candidates(candidates: &[FinderPattern], max_distance: f64) -> Vec<FinderCluster> {
    let mut clusters: Vec<FinderCluster> = Vec::new();
    for hit in candidates {
        match clusters
            .iter_mut()
            .find(|cluster| cluster.centroid().distance(&hit.centroid) <= max_distance)
        {
            Some(cluster) => cluster.push(hit),
            None => clusters.push(FinderCluster::new(hit)),
        }
    }
    clusters.sort_by(|a, b| b.population.cmp(&a.population));
    clusters
}

/// Top-left is the pattern with the widest angle to the other two; the sign of the
/// cross product (image y grows downward) separates top-right from bottom-left.
pub fn assign_roles(patterns: [FinderPattern; 3]) -> FinderPatternTrio {
    let cosine_at = |i: usize| {
        let apex = patterns[i].centroid;
        let u = patterns[(i + 1) % 3].centroid - apex;
        let v = patterns[(i + 2) % 3].centroid - apex;
        let norms = u.norm() * v.norm();
        if norms > 0.0 { u.dot(&v) / norms } else { 1.0 }
    };
    let apex = (0..3)
        .min_by(|&a, &b| cosine_at(a).total_cmp(&cosine_at(b)))
        .unwrap_or(0);

    let top_left = patterns[apex];
    let first = patterns[(apex + 1) % 3];
    let second = patterns[(apex + 2) % 3];
    let cross = (first.centroid - top_left.centroid).cross(&(second.centroid - top_left.centroid));
    let (top_right, bottom_left) = if cross > 0.0 {
        (first, second)
    } else {
        (second, first)
    };

    FinderPatternTrio {
        top_left,
        top_right,
        bottom_left,
    }
}

/// Length of the run of `dark`-coloured pixels in column `x`, starting at row `y`
/// and walking by `step`. Rows outside the image end the run.
fn column_run(image: &BinaryImage, x: usize, y: isize, step: isize, dark: bool) -> usize {
    let mut len = 0;
    let mut row = y;
    while row >= 0 && (row as usize) < image.height() && image.is_dark(x, row as usize) == dark {
        len += 1;
        row += step;
    }
    len
}

/// Length of the run of `dark`-coloured pixels in row `y`, starting at column `x`
/// and walking by `step`. Columns outside the image end the run.
fn row_run(image: &BinaryImage, x: isize, y: usize, step: isize, dark: bool) -> usize {
    let mut len = 0;
    let mut col = x;
    while col >= 0 && (col as usize) < image.width() && image.is_dark(col as usize, y) == dark {
        len += 1;
        col += step;
    }
    len
}

/// The five runs crossing row `y` through the dark pixel at column `cx`, with the
/// column of the first one
fn runs_through_row(image: &BinaryImage, cx: usize, y: usize) -> Option<([usize; 5], usize)> {
    if !image.is_dark(cx, y) {
        return None;
    }
    let x = cx as isize;
    let left = row_run(image, x, y, -1, true);
    let right = row_run(image, x, y, 1, true);
    let first = x - left as isize + 1;
    let last = x + right as isize - 1;

    let left_white = row_run(image, first - 1, y, -1, false);
    let left_black = row_run(image, first - 1 - left_white as isize, y, -1, true);
    let right_white = row_run(image, last + 1, y, 1, false);
    let right_black = row_run(image, last + 1 + right_white as isize, y, 1, true);

    let start = first - left_white as isize - left_black as isize;
    Some((
        [left_black, left_white, left + right - 1, right_white, right_black],
        start as usize,
    ))
}

/// Scans rows for finder patterns and reduces the hits to a role-assigned trio
pub struct FinderPatternLocator {
    tolerance: f64,
    cluster_distance: f64,
    parallel: bool,
}

impl FinderPatternLocator {
    /// Locator using the finder tolerances of `config`
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            tolerance: config.finder_tolerance,
            cluster_distance: config.cluster_distance,
            parallel: config.parallel_rows,
        }
    }

    /// Locate the three finder patterns
    pub fn locate(&self, image: &BinaryImage) -> Result<FinderPatternTrio> {
        let candidates = self.candidates(image);
        let clusters = cluster_candidates(&candidates, self.cluster_distance);
        trace!(
            "{} finder hits in {} clusters, populations {:?}",
            candidates.len(),
            clusters.len(),
            clusters.iter().map(FinderCluster::population).collect::<Vec<_>>()
        );

        if clusters.len() < 3 {
            debug!("only {} finder clusters found", clusters.len());
            return Err(ScanError::PatternNotFound {
                pattern: PatternKind::Finder,
                found: clusters.len(),
            });
        }

        let finalists = [clusters[0].pattern(), clusters[1].pattern(), clusters[2].pattern()];
        Ok(assign_roles(finalists))
    }

    /// Every confirmed hit, in row order
    pub fn candidates(&self, image: &BinaryImage) -> Vec<FinderPattern> {
        // Rows are independent; collecting per row keeps the hit order deterministic.
        let rows: Vec<Vec<FinderPattern>> = if self.parallel {
            (0..image.height())
                .into_par_iter()
                .map(|y| self.scan_row(image, y))
                .collect()
        } else {
            (0..image.height()).map(|y| self.scan_row(image, y)).collect()
        };
        rows.into_iter().flatten().collect()
    }

    fn scan_row(&self, image: &BinaryImage, y: usize) -> Vec<FinderPattern> {
        let row = image.row(y);
        let mut hits = Vec::new();
        let mut window = RunWindow::default();
        let mut x = 0;

        while x < row.len() {
            let start = x;
            let dark = row[x] == DARK;
            while x < row.len() && (row[x] == DARK) == dark {
                x += 1;
            }
            window.push(Run {
                start,
                len: x - start,
                dark,
            });

            if window.is_candidate() && ratio_matches(&window.lengths(), self.tolerance) {
                if let Some(hit) = self.confirm_vertical(image, &window, y) {
                    hits.push(hit);
                }
            }
        }

        hits
    }

    /// Re-run the ratio test down the column through the middle run's centre
    fn confirm_vertical(&self, image: &BinaryImage, window: &RunWindow, y: usize) -> Option<FinderPattern> {
        let middle = window.get(RunSlot::MiddleBlack);
        let cx = middle.start + middle.len / 2;
        if !image.is_dark(cx, y) {
            return None;
        }

        let y = y as isize;
        let above = column_run(image, cx, y, -1, true);
        let below = column_run(image, cx, y, 1, true);
        let top = y - above as isize + 1;
        let bottom = y + below as isize - 1;

        let upper_white = column_run(image, cx, top - 1, -1, false);
        let upper_black = column_run(image, cx, top - 1 - upper_white as isize, -1, true);
        let lower_white = column_run(image, cx, bottom + 1, 1, false);
        let lower_black = column_run(image, cx, bottom + 1 + lower_white as isize, 1, true);

        let vertical = [upper_black, upper_white, above + below - 1, lower_white, lower_black];
        if !ratio_matches(&vertical, self.tolerance) {
            return None;
        }

        let height = vertical.iter().sum::<usize>() as f64;
        let y0 = (top - upper_white as isize - upper_black as isize) as f64;
        let cy = y0 + (height - 1.0) / 2.0;

        // The hit row may cross a rotated pattern off centre, which shortens it.
        // Measure the width again through the centre row when that row still matches.
        let (width, x0) = match runs_through_row(image, cx, cy.round() as usize) {
            Some((horizontal, start)) if ratio_matches(&horizontal, self.tolerance) => {
                (horizontal.iter().sum::<usize>() as f64, start as f64)
            }
            _ => (
                window.total() as f64,
                window.get(RunSlot::FirstBlack).start as f64,
            ),
        };

        Some(FinderPattern::new(
            Point::new(x0 + (width - 1.0) / 2.0, cy),
            width,
            height,
        ))
    }
}
