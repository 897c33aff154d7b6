//! Pairwise-complete statistics over aligned columns.
//!
//! Absent cells are skipped pair by pair, so a missing or sparse series never
//! poisons the rest of the table.

use serde::Serialize;

use crate::series::SeriesId;
use crate::table::AlignedTable;

fn complete_pairs(x: &[Option<f64>], y: &[Option<f64>]) -> Vec<(f64, f64)> {
    x.iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .collect()
}

struct Moments {
    n: usize,
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

#[allow(clippy::cast_precision_loss)]
fn moments(pairs: &[(f64, f64)]) -> Option<Moments> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    Some(Moments {
        n: pairs.len(),
        mean_x,
        mean_y,
        sxx,
        syy,
        sxy,
    })
}

/// Pearson correlation over the rows where both cells are present.
///
/// Returns `None` with fewer than two complete pairs or when either side has
/// zero variance.
#[must_use]
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let m = moments(&complete_pairs(x, y))?;
    if m.sxx <= 0.0 || m.syy <= 0.0 {
        return None;
    }
    Some((m.sxy / (m.sxx * m.syy).sqrt()).clamp(-1.0, 1.0))
}

/// Ordinary least-squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    /// Change in `y` per unit of `x`.
    pub slope: f64,
    /// Value of `y` at `x = 0`.
    pub intercept: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Number of complete pairs used.
    pub n: usize,
}

impl LinearFit {
    /// Fitted value at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Fit `y` on `x` over the rows where both cells are present.
///
/// Returns `None` with fewer than two complete pairs or when `x` is constant.
#[must_use]
pub fn ols(x: &[Option<f64>], y: &[Option<f64>]) -> Option<LinearFit> {
    let m = moments(&complete_pairs(x, y))?;
    if m.sxx <= 0.0 {
        return None;
    }
    let slope = m.sxy / m.sxx;
    let intercept = slope.mul_add(-m.mean_x, m.mean_y);
    let r_squared = if m.syy > 0.0 {
        (m.sxy * m.sxy) / (m.sxx * m.syy)
    } else {
        1.0
    };
    Some(LinearFit {
        slope,
        intercept,
        r_squared,
        n: m.n,
    })
}

/// Symmetric matrix of pairwise correlations between table columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    ids: Vec<SeriesId>,
    values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Column labels, in the same order as rows and columns of the matrix.
    #[must_use]
    pub fn ids(&self) -> &[SeriesId] {
        &self.ids
    }

    /// Correlation between `a` and `b`; `None` when undefined or unknown.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.ids.iter().position(|id| id.as_str() == a)?;
        let j = self.ids.iter().position(|id| id.as_str() == b)?;
        self.values[i][j]
    }

    /// Matrix rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }
}

impl AlignedTable {
    /// Pairwise-complete Pearson correlation between every pair of columns.
    ///
    /// The diagonal is `1.0` wherever a column has a defined correlation with
    /// itself.
    #[must_use]
    pub fn correlation_matrix(&self) -> CorrelationMatrix {
        let cols = self.columns();
        let n = cols.len();
        let mut values = vec![vec![None; n]; n];
        for i in 0..n {
            values[i][i] = pearson(cols[i].values(), cols[i].values()).map(|_| 1.0);
            for j in (i + 1)..n {
                let r = pearson(cols[i].values(), cols[j].values());
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        CorrelationMatrix {
            ids: cols.iter().map(|c| c.id().clone()).collect(),
            values,
        }
    }

    /// OLS trendline of column `y_id` on column `x_id`.
    #[must_use]
    pub fn trendline(&self, x_id: &str, y_id: &str) -> Option<LinearFit> {
        let x = self.column(x_id)?;
        let y = self.column(y_id)?;
        ols(x.values(), y.values())
    }
}
