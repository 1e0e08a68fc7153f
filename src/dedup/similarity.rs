use crate::error::{FlowAiError, Result};

/// Cosine similarity of two equal-length vectors.
///
/// Accumulates in `f64` and clamps into `[-1, 1]`. Returns `0.0` when either
/// vector has zero magnitude; inputs are never assumed to be unit length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(FlowAiError::InvalidInput(format!(
            "vector length mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}
