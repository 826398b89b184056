#![forbid(unsafe_code)]

use cube_random::DeterministicRng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestedError {
    Ragged { layer: usize, row: usize },
    DimMismatch {
        lhs: (usize, usize, usize),
        rhs: (usize, usize, usize),
    },
}

impl std::fmt::Display for NestedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ragged { layer, row } => {
                write!(f, "ragged nested cube at layer {layer}, row {row}")
            }
            Self::DimMismatch { lhs, rhs } => {
                write!(f, "dimension mismatch {lhs:?} vs {rhs:?}")
            }
        }
    }
}

impl std::error::Error for NestedError {}

/// Aggregate statistics over every element of a cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub std_dev: f64,
}

/// 3-D array stored as one container level per axis: layers of rows of
/// values. Always rectangular; constructors enforce it.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedCube {
    layers: Vec<Vec<Vec<f64>>>,
}

impl NestedCube {
    /// Allocate an x-by-y-by-z cube of uniform draws in [0, 1).
    #[must_use]
    pub fn random(x: usize, y: usize, z: usize, rng: &mut DeterministicRng) -> Self {
        let layers = (0..x)
            .map(|_| {
                (0..y)
                    .map(|_| (0..z).map(|_| rng.next_f64()).collect())
                    .collect()
            })
            .collect();
        Self { layers }
    }

    pub fn from_layers(layers: Vec<Vec<Vec<f64>>>) -> Result<Self, NestedError> {
        let rows = layers.first().map_or(0, Vec::len);
        let cols = layers
            .first()
            .and_then(|layer| layer.first())
            .map_or(0, Vec::len);
        for (li, layer) in layers.iter().enumerate() {
            if layer.len() != rows {
                return Err(NestedError::Ragged { layer: li, row: 0 });
            }
            for (ri, row) in layer.iter().enumerate() {
                if row.len() != cols {
                    return Err(NestedError::Ragged { layer: li, row: ri });
                }
            }
        }
        Ok(Self { layers })
    }

    #[must_use]
    pub fn dims(&self) -> (usize, usize, usize) {
        let x = self.layers.len();
        let y = self.layers.first().map_or(0, Vec::len);
        let z = self
            .layers
            .first()
            .and_then(|layer| layer.first())
            .map_or(0, Vec::len);
        (x, y, z)
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        let (x, y, z) = self.dims();
        x * y * z
    }

    #[must_use]
    pub fn layers(&self) -> &[Vec<Vec<f64>>] {
        &self.layers
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<f64> {
        self.layers.get(x)?.get(y)?.get(z).copied()
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f64) -> bool {
        match self
            .layers
            .get_mut(x)
            .and_then(|layer| layer.get_mut(y))
            .and_then(|row| row.get_mut(z))
        {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Element-by-element rebuild of every container level. `Clone` on the
    /// nested `Vec`s is already deep; the explicit walk is the workload the
    /// harness is asked to time.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        let layers = self
            .layers
            .iter()
            .map(|layer| {
                layer
                    .iter()
                    .map(|row| row.iter().copied().collect())
                    .collect()
            })
            .collect();
        Self { layers }
    }

    /// Mean, max, min, and population standard deviation over a full
    /// flatten pass. Empty cubes yield NaN statistics.
    #[must_use]
    pub fn stats(&self) -> CubeStats {
        let count = self.element_count();
        if count == 0 {
            return CubeStats {
                mean: f64::NAN,
                max: f64::NAN,
                min: f64::NAN,
                std_dev: f64::NAN,
            };
        }

        let mut sum = 0.0f64;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for value in self.iter_values() {
            sum += value;
            max = max.max(value);
            min = min.min(value);
        }
        let mean = sum / count as f64;

        let sq_sum: f64 = self.iter_values().map(|v| (v - mean) * (v - mean)).sum();
        let std_dev = (sq_sum / count as f64).sqrt();

        CubeStats {
            mean,
            max,
            min,
            std_dev,
        }
    }

    pub fn elementwise_mul(&self, rhs: &Self) -> Result<Self, NestedError> {
        self.check_dims(rhs)?;
        let layers = self
            .layers
            .iter()
            .zip(&rhs.layers)
            .map(|(lhs_layer, rhs_layer)| {
                lhs_layer
                    .iter()
                    .zip(rhs_layer)
                    .map(|(lhs_row, rhs_row)| {
                        lhs_row
                            .iter()
                            .zip(rhs_row)
                            .map(|(&a, &b)| a * b)
                            .collect()
                    })
                    .collect()
            })
            .collect();
        Ok(Self { layers })
    }

    /// Per (layer, row) sum of element-wise products along the last axis,
    /// collapsing an x-by-y-by-z pair into an x-by-y grid of scalars.
    pub fn row_dot(&self, rhs: &Self) -> Result<Vec<Vec<f64>>, NestedError> {
        self.check_dims(rhs)?;
        let grid = self
            .layers
            .iter()
            .zip(&rhs.layers)
            .map(|(lhs_layer, rhs_layer)| {
                lhs_layer
                    .iter()
                    .zip(rhs_layer)
                    .map(|(lhs_row, rhs_row)| {
                        lhs_row.iter().zip(rhs_row).map(|(&a, &b)| a * b).sum()
                    })
                    .collect()
            })
            .collect();
        Ok(grid)
    }

    pub fn iter_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.layers
            .iter()
            .flat_map(|layer| layer.iter())
            .flat_map(|row| row.iter().copied())
    }

    fn check_dims(&self, rhs: &Self) -> Result<(), NestedError> {
        if self.dims() != rhs.dims() {
            return Err(NestedError::DimMismatch {
                lhs: self.dims(),
                rhs: rhs.dims(),
            });
        }
        Ok(())
    }
}
