//! Vector math for embedding similarity.

/// Dot product. For unit vectors this is the cosine similarity.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// L2 norm.
#[inline]
pub fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity of two vectors of equal dimension.
///
/// Total over its inputs: mismatched dimensions or a zero-magnitude side
/// scores 0.0 rather than poisoning a scan with NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot(a, b) / (norm_a * norm_b)
}

/// Scale a vector to unit length.
///
/// A zero-magnitude vector has no direction to preserve; it becomes the
/// uniform unit vector (every component `1/sqrt(d)`) so it can still be
/// stored and compared.
pub fn unit_normalize(mut v: Vec<f32>) -> Vec<f32> {
    if v.is_empty() {
        return v;
    }
    let n = norm(&v);
    if n > f32::EPSILON {
        let inv = 1.0 / n;
        for x in &mut v {
            *x *= inv;
        }
    } else {
        let uniform = 1.0 / (v.len() as f32).sqrt();
        for x in &mut v {
            *x = uniform;
        }
    }
    v
}
