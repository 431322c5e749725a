//! Shared vector math.

/// L2-normalize a vector in place so its magnitude is 1.
pub fn l2_normalize_in_place(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// L2-normalize a slice, returning a new vector with unit magnitude.
pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let mut result = v.to_vec();
    l2_normalize_in_place(&mut result);
    result
}

/// Dot product of two equal-length vectors.
///
/// With L2-normalized inputs this is the cosine similarity.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Element-wise mean of a set of equal-length vectors.
///
/// Returns `None` for an empty set or when the lengths disagree.
pub fn mean(vectors: &[Vec<f32>]) -> Option<Vec<f32>> {
    let first = vectors.first()?;
    let dim = first.len();
    if vectors.iter().any(|v| v.len() != dim) {
        return None;
    }

    let mut acc = vec![0.0f32; dim];
    for v in vectors {
        for (a, x) in acc.iter_mut().zip(v) {
            *a += x;
        }
    }
    let n = vectors.len() as f32;
    acc.iter_mut().for_each(|a| *a /= n);
    Some(acc)
}
