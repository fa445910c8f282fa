//! Online training helpers for driving a [`TileCoder`] from a sample stream.
//!
//! The coder itself only knows single-sample `update`/`predict`. This module
//! adds the batch loop used by drivers (update, then re-predict, accumulate
//! squared error) and the usual regression metrics.

use serde::Serialize;

use crate::coder::TileCoder;
use crate::error::{Result, TileCoderError};

/// One observation of the target function.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub point: Vec<f64>,
    pub target: f64,
}

impl Sample {
    pub fn new(point: Vec<f64>, target: f64) -> Self {
        Self { point, target }
    }
}

/// Train on every sample in order and return the batch MSE.
///
/// Each sample is applied with `update`, then re-predicted; the reported error
/// is the post-update residual `(predict(x) - y)²` averaged over the batch.
/// Stops at the first failing sample.
pub fn train_batch(coder: &mut TileCoder, samples: &[Sample]) -> Result<f64> {
    if samples.is_empty() {
        return Ok(0.0);
    }
    let mut sq_err = 0.0;
    for sample in samples {
        coder.update(&sample.point, sample.target)?;
        let residual = coder.predict(&sample.point)? - sample.target;
        sq_err += residual * residual;
    }
    Ok(sq_err / samples.len() as f64)
}

/// Progress record for one training batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchReport {
    /// Total samples consumed after this batch
    pub samples_seen: u64,
    pub batch_mse: f64,
}

/// Running history of batch reports.
#[derive(Debug, Clone, Default)]
pub struct TrainingLog {
    reports: Vec<BatchReport>,
    samples_seen: u64,
}

impl TrainingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of `batch_len` samples with the given MSE.
    pub fn record(&mut self, batch_len: usize, batch_mse: f64) -> BatchReport {
        self.samples_seen += batch_len as u64;
        let report = BatchReport {
            samples_seen: self.samples_seen,
            batch_mse,
        };
        self.reports.push(report);
        report
    }

    pub fn reports(&self) -> &[BatchReport] {
        &self.reports
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    pub fn last(&self) -> Option<&BatchReport> {
        self.reports.last()
    }

    /// Mean batch MSE over the last `window` batches.
    pub fn trailing_mse(&self, window: usize) -> Option<f64> {
        if window == 0 || self.reports.is_empty() {
            return None;
        }
        let start = self.reports.len().saturating_sub(window);
        let tail = &self.reports[start..];
        Some(tail.iter().map(|r| r.batch_mse).sum::<f64>() / tail.len() as f64)
    }
}

// ─── Evaluation utilities ────────────────────────────

fn check_lengths(predicted: &[f64], actual: &[f64]) -> Result<()> {
    if predicted.len() != actual.len() {
        return Err(TileCoderError::DimensionMismatch {
            what: "predictions",
            expected: actual.len(),
            actual: predicted.len(),
        });
    }
    Ok(())
}

/// Mean squared error. Zero for empty input.
pub fn mse(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predicted, actual)?;
    if actual.is_empty() {
        return Ok(0.0);
    }
    Ok(predicted
        .iter()
        .zip(actual.iter())
        .map(|(&p, &a)| (p - a) * (p - a))
        .sum::<f64>()
        / actual.len() as f64)
}

/// Normalized Mean Squared Error: `MSE / variance(actual)`.
///
/// NMSE < 1 means the model beats predicting the mean. Returns 0 when the
/// targets have no variance.
pub fn nmse(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predicted, actual)?;
    if actual.is_empty() {
        return Ok(0.0);
    }
    let n = actual.len() as f64;
    let mean = actual.iter().sum::<f64>() / n;
    let variance = actual.iter().map(|&y| (y - mean) * (y - mean)).sum::<f64>() / n;
    if variance < 1e-12 {
        return Ok(0.0);
    }
    Ok(mse(predicted, actual)? / variance)
}
