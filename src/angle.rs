//! Angle utilities for comparing feature vectors.

/// Cosine similarity of two equally sized vectors, clamped into `[-1, 1]`.
///
/// Returns `None` when either vector has zero norm. Extra trailing elements
/// of the longer vector are ignored; callers check dimensions first.
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Option<f64> {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = norm(a);
    let nb = norm(b);
    if na == 0.0 || nb == 0.0 {
        return None;
    }
    Some((dot / (na * nb)).clamp(-1.0, 1.0))
}

/// Unsigned angle between two vectors in degrees, in `[0, 180]`.
/// Zero if they point in the same direction, 180 if opposite.
#[inline]
pub fn angle_between_deg(a: &[f64], b: &[f64]) -> Option<f64> {
    cosine_similarity(a, b).map(|cos| cos.acos().to_degrees())
}

#[inline]
fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
