#![forbid(unsafe_code)]

use cube_nested::{CubeStats, NestedCube};
use cube_random::DeterministicRng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    Overflow,
    LengthMismatch { expected: usize, actual: usize },
    ShapeMismatch { lhs: Vec<usize>, rhs: Vec<usize> },
    DotRankUnsupported { lhs_ndim: usize, rhs_ndim: usize },
    DotAlignment { lhs_inner: usize, rhs_inner: usize },
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overflow => write!(f, "size arithmetic overflow"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "buffer length {actual} does not match shape ({expected} elements)")
            }
            Self::ShapeMismatch { lhs, rhs } => {
                write!(f, "shapes {lhs:?} and {rhs:?} are not aligned")
            }
            Self::DotRankUnsupported { lhs_ndim, rhs_ndim } => {
                write!(f, "dot supports rank 1 or 2 operands, got {lhs_ndim}-d and {rhs_ndim}-d")
            }
            Self::DotAlignment { lhs_inner, rhs_inner } => {
                write!(f, "dot inner dimensions {lhs_inner} and {rhs_inner} are not aligned")
            }
        }
    }
}

impl std::error::Error for ShapeError {}

pub fn element_count(shape: &[usize]) -> Result<usize, ShapeError> {
    shape.iter().try_fold(1usize, |acc, &dim| {
        acc.checked_mul(dim).ok_or(ShapeError::Overflow)
    })
}

/// Dense n-dimensional array: one contiguous C-order `f64` buffer plus a
/// logical shape. The benchmark only ever builds rank-3 cubes, but the ops
/// are written against the general layout.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseCube {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl DenseCube {
    pub fn new(shape: Vec<usize>, values: Vec<f64>) -> Result<Self, ShapeError> {
        let expected = element_count(&shape)?;
        if values.len() != expected {
            return Err(ShapeError::LengthMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    /// Allocate an x-by-y-by-z cube of uniform draws in [0, 1).
    pub fn random(
        x: usize,
        y: usize,
        z: usize,
        rng: &mut DeterministicRng,
    ) -> Result<Self, ShapeError> {
        let shape = vec![x, y, z];
        let count = element_count(&shape)?;
        Ok(Self {
            shape,
            values: rng.fill_f64(count),
        })
    }

    /// Flatten a nested cube into the dense layout, preserving value order.
    /// The counterpart of handing a list-of-lists to the array library.
    #[must_use]
    pub fn from_nested(nested: &NestedCube) -> Self {
        let (x, y, z) = nested.dims();
        Self {
            shape: vec![x, y, z],
            values: nested.iter_values().collect(),
        }
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_mut(&mut self, flat: usize) -> Option<&mut f64> {
        self.values.get_mut(flat)
    }

    /// Fresh buffer with the same shape and values.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            values: self.values.clone(),
        }
    }

    /// Mean, max, min, and population standard deviation over the flat
    /// buffer. Empty arrays yield NaN statistics.
    #[must_use]
    pub fn stats(&self) -> CubeStats {
        if self.values.is_empty() {
            return CubeStats {
                mean: f64::NAN,
                max: f64::NAN,
                min: f64::NAN,
                std_dev: f64::NAN,
            };
        }

        let count = self.values.len() as f64;
        let mut sum = 0.0f64;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for &value in &self.values {
            sum += value;
            max = max.max(value);
            min = min.min(value);
        }
        let mean = sum / count;

        let sq_sum: f64 = self.values.iter().map(|&v| (v - mean) * (v - mean)).sum();
        let std_dev = (sq_sum / count).sqrt();

        CubeStats {
            mean,
            max,
            min,
            std_dev,
        }
    }

    pub fn elementwise_mul(&self, rhs: &Self) -> Result<Self, ShapeError> {
        if self.shape != rhs.shape {
            return Err(ShapeError::ShapeMismatch {
                lhs: self.shape.clone(),
                rhs: rhs.shape.clone(),
            });
        }
        let values = self
            .values
            .iter()
            .zip(&rhs.values)
            .map(|(&a, &b)| a * b)
            .collect();
        Ok(Self {
            shape: self.shape.clone(),
            values,
        })
    }

    /// The library's dot contract: inner product for two vectors, matrix
    /// product for two matrices with aligned inner dimensions. Higher-rank
    /// operands are rejected outright, so calling this on two rank-3 cubes
    /// fails with a shape error at any size.
    pub fn matrix_dot(&self, rhs: &Self) -> Result<Self, ShapeError> {
        match (self.ndim(), rhs.ndim()) {
            (1, 1) => {
                if self.shape[0] != rhs.shape[0] {
                    return Err(ShapeError::DotAlignment {
                        lhs_inner: self.shape[0],
                        rhs_inner: rhs.shape[0],
                    });
                }
                let inner: f64 = self
                    .values
                    .iter()
                    .zip(&rhs.values)
                    .map(|(&a, &b)| a * b)
                    .sum();
                Ok(Self {
                    shape: Vec::new(),
                    values: vec![inner],
                })
            }
            (2, 2) => {
                let (m, k) = (self.shape[0], self.shape[1]);
                let (k2, n) = (rhs.shape[0], rhs.shape[1]);
                if k != k2 {
                    return Err(ShapeError::DotAlignment {
                        lhs_inner: k,
                        rhs_inner: k2,
                    });
                }
                let mut values = vec![0.0f64; m.checked_mul(n).ok_or(ShapeError::Overflow)?];
                for i in 0..m {
                    for p in 0..k {
                        let lhs_val = self.values[i * k + p];
                        for j in 0..n {
                            values[i * n + j] += lhs_val * rhs.values[p * n + j];
                        }
                    }
                }
                Ok(Self {
                    shape: vec![m, n],
                    values,
                })
            }
            (lhs_ndim, rhs_ndim) => Err(ShapeError::DotRankUnsupported { lhs_ndim, rhs_ndim }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DenseCube, ShapeError, element_count};
    use cube_nested::NestedCube;
    use cube_random::DeterministicRng;

    #[test]
    fn element_count_overflow_is_caught() {
        let err = element_count(&[usize::MAX, 2]).expect_err("should overflow");
        assert_eq!(err, ShapeError::Overflow);
    }

    #[test]
    fn new_rejects_wrong_buffer_length() {
        let err = DenseCube::new(vec![2, 2], vec![1.0; 3]).expect_err("length mismatch");
        assert!(matches!(err, ShapeError::LengthMismatch { expected: 4, actual: 3 }));
    }

    #[test]
    fn random_cube_has_requested_shape_and_unit_values() {
        let mut rng = DeterministicRng::new(5);
        let cube = DenseCube::random(2, 3, 4, &mut rng).expect("dims fit");
        assert_eq!(cube.shape(), &[2, 3, 4]);
        assert_eq!(cube.len(), 24);
        assert!(cube.values().iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn random_rejects_overflowing_dims() {
        let mut rng = DeterministicRng::new(5);
        let err = DenseCube::random(usize::MAX, 2, 2, &mut rng).expect_err("dims overflow");
        assert_eq!(err, ShapeError::Overflow);
    }

    #[test]
    fn from_nested_preserves_value_order() {
        let nested =
            NestedCube::from_layers(vec![vec![vec![1.0, 2.0]], vec![vec![3.0, 4.0]]])
                .expect("rectangular");
        let dense = DenseCube::from_nested(&nested);
        assert_eq!(dense.shape(), &[2, 1, 2]);
        assert_eq!(dense.values(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn deep_copy_is_independent() {
        let mut rng = DeterministicRng::new(9);
        let cube = DenseCube::random(2, 2, 2, &mut rng).expect("dims fit");
        let mut copy = cube.deep_copy();
        *copy.get_mut(0).expect("index 0 exists") = 42.0;
        assert_ne!(copy.values()[0], cube.values()[0]);
    }

    #[test]
    fn stats_match_hand_computed_values() {
        let cube = DenseCube::new(vec![2, 1, 2], vec![1.0, 2.0, 3.0, 4.0]).expect("cube");
        let stats = cube.stats();
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert!((stats.max - 4.0).abs() < 1e-12);
        assert!((stats.min - 1.0).abs() < 1e-12);
        assert!((stats.std_dev - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn elementwise_mul_requires_same_shape() {
        let lhs = DenseCube::new(vec![2], vec![1.0, 2.0]).expect("lhs");
        let rhs = DenseCube::new(vec![3], vec![1.0, 2.0, 3.0]).expect("rhs");
        let err = lhs.elementwise_mul(&rhs).expect_err("shapes differ");
        assert!(matches!(err, ShapeError::ShapeMismatch { .. }));
    }

    #[test]
    fn elementwise_mul_multiplies_positionwise() {
        let lhs = DenseCube::new(vec![1, 2, 2], vec![1.0, 2.0, 3.0, 4.0]).expect("lhs");
        let rhs = DenseCube::new(vec![1, 2, 2], vec![5.0, 6.0, 7.0, 8.0]).expect("rhs");
        let out = lhs.elementwise_mul(&rhs).expect("same shape");
        assert_eq!(out.values(), &[5.0, 12.0, 21.0, 32.0]);
    }

    #[test]
    fn vector_dot_is_inner_product() {
        let lhs = DenseCube::new(vec![3], vec![1.0, 2.0, 3.0]).expect("lhs");
        let rhs = DenseCube::new(vec![3], vec![4.0, 5.0, 6.0]).expect("rhs");
        let out = lhs.matrix_dot(&rhs).expect("aligned vectors");
        assert_eq!(out.shape(), &[] as &[usize]);
        assert_eq!(out.values(), &[32.0]);
    }

    #[test]
    fn matrix_dot_matches_hand_computed_product() {
        let lhs = DenseCube::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).expect("lhs");
        let rhs = DenseCube::new(vec![2, 2], vec![5.0, 6.0, 7.0, 8.0]).expect("rhs");
        let out = lhs.matrix_dot(&rhs).expect("aligned matrices");
        assert_eq!(out.shape(), &[2, 2]);
        assert_eq!(out.values(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn matrix_dot_rejects_misaligned_inner_dims() {
        let lhs = DenseCube::new(vec![2, 3], vec![0.0; 6]).expect("lhs");
        let rhs = DenseCube::new(vec![2, 2], vec![0.0; 4]).expect("rhs");
        let err = lhs.matrix_dot(&rhs).expect_err("inner dims differ");
        assert!(matches!(err, ShapeError::DotAlignment { lhs_inner: 3, rhs_inner: 2 }));
    }

    #[test]
    fn matrix_dot_rejects_rank_3_cubes() {
        let mut rng = DeterministicRng::new(13);
        let lhs = DenseCube::random(2, 2, 2, &mut rng).expect("dims fit");
        let rhs = DenseCube::random(2, 2, 2, &mut rng).expect("dims fit");
        let err = lhs.matrix_dot(&rhs).expect_err("rank 3 unsupported");
        assert_eq!(err, ShapeError::DotRankUnsupported { lhs_ndim: 3, rhs_ndim: 3 });
    }
}
