use crate::interface::FeatureMap;
use ndarray::{Array2, Axis};

/// Column-consistent numeric view of many feature maps.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub names: Vec<String>,
    pub values: Array2<f64>,
}

pub struct MatrixHelper;

impl MatrixHelper {
    /// Builds a rows-by-features matrix from the scalar features of each map.
    ///
    /// Columns are fixed by the first map; a feature missing from a later map
    /// is filled with 0.0 and features absent from the first map are dropped.
    pub fn feature_matrix(maps: &[FeatureMap]) -> FeatureMatrix {
        let names: Vec<String> = maps
            .first()
            .map(|first| first.scalars().map(|(name, _)| name.to_string()).collect())
            .unwrap_or_default();

        let mut values = Array2::<f64>::zeros((maps.len(), names.len()));
        for (mut row, map) in values.axis_iter_mut(Axis(0)).zip(maps) {
            for (cell, name) in row.iter_mut().zip(&names) {
                *cell = map.scalar(name).unwrap_or(0.0);
            }
        }
        FeatureMatrix { names, values }
    }

    /// Rescales every column to zero mean and unit variance in place.
    /// Constant columns end up all zero.
    pub fn standardize(matrix: &mut Array2<f64>) {
        if matrix.nrows() == 0 {
            return;
        }
        for mut column in matrix.axis_iter_mut(Axis(1)) {
            let mean = column.mean().unwrap_or(0.0);
            let std = column.std(0.0);
            column.mapv_inplace(|v| if std > f64::EPSILON { (v - mean) / std } else { 0.0 });
        }
    }
}

impl FeatureMatrix {
    pub fn from_maps(maps: &[FeatureMap]) -> Self {
        MatrixHelper::feature_matrix(maps)
    }

    pub fn standardized(mut self) -> Self {
        MatrixHelper::standardize(&mut self.values);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn columns_follow_first_map() {
        let mut first = FeatureMap::new().with("b", 2.0).with("a", 1.0);
        first.insert_array("speed", vec![1.0, 2.0]);
        let second = FeatureMap::new().with("a", 3.0).with("c", 9.0);

        let matrix = FeatureMatrix::from_maps(&[first, second]);
        assert_eq!(matrix.names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(matrix.values.shape(), &[2, 2]);
        assert_eq!(matrix.values[[1, 0]], 3.0);
        assert_eq!(matrix.values[[1, 1]], 0.0);
    }

    #[test]
    fn standardize_centers_columns() {
        let maps = [
            FeatureMap::new().with("x", 1.0).with("k", 5.0),
            FeatureMap::new().with("x", 3.0).with("k", 5.0),
        ];
        let matrix = FeatureMatrix::from_maps(&maps).standardized();
        // columns: k, x
        assert_eq!(matrix.values[[0, 0]], 0.0);
        assert_relative_eq!(matrix.values[[0, 1]], -1.0);
        assert_relative_eq!(matrix.values[[1, 1]], 1.0);
    }

    #[test]
    fn empty_input_gives_empty_matrix() {
        let matrix = FeatureMatrix::from_maps(&[]);
        assert!(matrix.names.is_empty());
        assert_eq!(matrix.values.nrows(), 0);
    }
}
