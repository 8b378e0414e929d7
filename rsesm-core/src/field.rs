//! Labeled arrays for gridded model output
//!
//! A [`Field`] is an n-dimensional array whose axes are identified by name
//! (e.g. `["time", "lat", "lon"]`) rather than by position. Optional coordinate
//! vectors can be attached to any dimension, and a units string is carried
//! along as metadata only.
//!
//! Arithmetic between fields aligns axes by name. The right-hand field may omit
//! dimensions of the left-hand field, in which case its values are broadcast
//! along the missing axes:
//!
//! ```rust
//! use ndarray::{array, Array2};
//! use rsesm_core::field::Field;
//!
//! let sst = Field::new(["time", "x"], Array2::from_elem((3, 2), 10.0).into_dyn()).unwrap();
//! let offset = Field::new(["x"], array![1.0, 2.0].into_dyn()).unwrap();
//!
//! let shifted = sst.broadcast_sub(&offset).unwrap();
//! assert_eq!(shifted.dims(), &["time".to_string(), "x".to_string()]);
//! assert_eq!(shifted.values()[[2, 1]], 8.0);
//! ```

use crate::errors::{RSESMError, RSESMResult};
use crate::time_axis::{FloatValue, TimeAxis};
use ndarray::{Array1, ArrayD, ArrayViewD, ArrayViewMut1, ArrayView1, Axis, Slice, Zip};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

/// Tolerance used when comparing coordinate values between fields
const COORDINATE_TOLERANCE: FloatValue = 1e-6;

/// An n-dimensional array with named dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    dims: Vec<String>,
    values: ArrayD<FloatValue>,
    coords: BTreeMap<String, Array1<FloatValue>>,
    units: Option<String>,
}

impl Field {
    /// Create a field from dimension names and values
    ///
    /// Fails if the number of names does not match the dimensionality of the
    /// array, or if a name is repeated.
    pub fn new<I, S>(dims: I, values: ArrayD<FloatValue>) -> RSESMResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != values.ndim() {
            return Err(RSESMError::ShapeMismatch {
                expected: dims.len(),
                actual: values.ndim(),
            });
        }
        for (i, dim) in dims.iter().enumerate() {
            if dims[..i].contains(dim) {
                return Err(RSESMError::DuplicateDimension(dim.clone()));
            }
        }
        Ok(Self {
            dims,
            values,
            coords: BTreeMap::new(),
            units: None,
        })
    }

    /// Zero-dimensional field holding a single value
    pub fn scalar(value: FloatValue) -> Self {
        Self {
            dims: vec![],
            values: ndarray::arr0(value).into_dyn(),
            coords: BTreeMap::new(),
            units: None,
        }
    }

    /// Attach coordinate values to a dimension
    pub fn with_coord(mut self, dim: &str, values: Array1<FloatValue>) -> RSESMResult<Self> {
        let length = self.len_of(dim)?;
        if values.len() != length {
            return Err(RSESMError::CoordinateMismatch(format!(
                "coordinate '{}' has {} values but the dimension has length {}",
                dim,
                values.len(),
                length
            )));
        }
        self.coords.insert(dim.to_string(), values);
        Ok(self)
    }

    /// Attach a time coordinate
    pub fn with_time(self, dim: &str, time: &TimeAxis) -> RSESMResult<Self> {
        self.with_coord(dim, time.values().clone())
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn without_units(mut self) -> Self {
        self.units = None;
        self
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn values(&self) -> &ArrayD<FloatValue> {
        &self.values
    }

    pub fn into_values(self) -> ArrayD<FloatValue> {
        self.values
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn has_dim(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    pub fn coord(&self, dim: &str) -> Option<&Array1<FloatValue>> {
        self.coords.get(dim)
    }

    pub fn coords(&self) -> &BTreeMap<String, Array1<FloatValue>> {
        &self.coords
    }

    /// Position of a named dimension
    pub fn axis(&self, dim: &str) -> RSESMResult<Axis> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .map(Axis)
            .ok_or_else(|| RSESMError::MissingDimension(dim.to_string()))
    }

    pub fn len_of(&self, dim: &str) -> RSESMResult<usize> {
        Ok(self.values.len_of(self.axis(dim)?))
    }

    /// Calendar view of the coordinate attached to `dim`
    pub fn time_axis(&self, dim: &str) -> RSESMResult<TimeAxis> {
        self.axis(dim)?;
        let values = self.coord(dim).ok_or_else(|| {
            RSESMError::CoordinateMismatch(format!("dimension '{}' has no coordinate values", dim))
        })?;
        TimeAxis::from_values(values.clone())
    }

    /// Apply `f` to every element, keeping dimensions and coordinates
    pub fn map<F>(&self, f: F) -> Field
    where
        F: Fn(FloatValue) -> FloatValue,
    {
        Field {
            dims: self.dims.clone(),
            values: self.values.mapv(f),
            coords: self.coords.clone(),
            units: self.units.clone(),
        }
    }

    pub fn scale(&self, factor: FloatValue) -> Field {
        self.map(|v| v * factor)
    }

    /// Combine two fields element-wise, broadcasting `other` along any of
    /// `self`'s dimensions it does not have.
    ///
    /// `other`'s dimensions must appear in `self` in the same relative order and
    /// shared dimensions must have equal lengths (and equal coordinates when both
    /// fields carry them). The result takes `self`'s dimensions, coordinates and units.
    pub fn zip_with<F>(&self, other: &Field, f: F) -> RSESMResult<Field>
    where
        F: Fn(FloatValue, FloatValue) -> FloatValue,
    {
        self.check_shared_coords(other)?;
        let expanded = other.expand_to(&self.dims)?;
        let broadcast = expanded
            .broadcast(self.values.raw_dim())
            .ok_or_else(|| self.incompatible(other))?;
        let values = Zip::from(&self.values)
            .and(&broadcast)
            .map_collect(|&a, &b| f(a, b));

        Ok(Field {
            dims: self.dims.clone(),
            values,
            coords: self.coords.clone(),
            units: self.units.clone(),
        })
    }

    pub fn broadcast_add(&self, other: &Field) -> RSESMResult<Field> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn broadcast_sub(&self, other: &Field) -> RSESMResult<Field> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn broadcast_mul(&self, other: &Field) -> RSESMResult<Field> {
        self.zip_with(other, |a, b| a * b)
    }

    pub fn broadcast_div(&self, other: &Field) -> RSESMResult<Field> {
        self.zip_with(other, |a, b| a / b)
    }

    /// Reduce along `dim`, removing it from the result
    pub fn reduce<F>(&self, dim: &str, f: F) -> RSESMResult<Field>
    where
        F: FnMut(ArrayView1<FloatValue>) -> FloatValue,
    {
        let axis = self.axis(dim)?;
        let values = self.values.map_axis(axis, f);
        Ok(self.without_dim(axis, values))
    }

    /// A field over the dimensions left after reducing `dim`, holding `values`
    ///
    /// Used when one pass over the lanes yields several reduced outputs.
    pub(crate) fn reduced(&self, dim: &str, values: ArrayD<FloatValue>) -> RSESMResult<Field> {
        let axis = self.axis(dim)?;
        let mut expected = self.values.shape().to_vec();
        expected.remove(axis.index());
        if values.shape() != expected.as_slice() {
            return Err(RSESMError::Error(format!(
                "reduced values have shape {:?} but {:?} was expected",
                values.shape(),
                expected
            )));
        }
        Ok(self.without_dim(axis, values))
    }

    /// Modify each 1-D lane along `dim` in place, returning the new field
    pub fn transform_lanes<F>(&self, dim: &str, mut f: F) -> RSESMResult<Field>
    where
        F: FnMut(ArrayViewMut1<FloatValue>),
    {
        let axis = self.axis(dim)?;
        let mut out = self.clone();
        out.values.lanes_mut(axis).into_iter().for_each(&mut f);
        Ok(out)
    }

    /// Select a single position along `dim`, dropping the dimension
    pub fn isel(&self, dim: &str, index: usize) -> RSESMResult<Field> {
        let axis = self.axis(dim)?;
        let length = self.values.len_of(axis);
        if index >= length {
            return Err(RSESMError::Error(format!(
                "index {} is out of bounds for dimension '{}' of length {}",
                index, dim, length
            )));
        }
        let values = self.values.index_axis(axis, index).to_owned();
        Ok(self.without_dim(axis, values))
    }

    /// Select a contiguous range of positions along `dim`
    pub fn slice_dim(&self, dim: &str, range: Range<usize>) -> RSESMResult<Field> {
        let axis = self.axis(dim)?;
        let length = self.values.len_of(axis);
        if range.start > range.end || range.end > length {
            return Err(RSESMError::Error(format!(
                "range {:?} is out of bounds for dimension '{}' of length {}",
                range, dim, length
            )));
        }
        let values = self
            .values
            .slice_axis(axis, Slice::from(range.clone()))
            .to_owned();
        let mut coords = self.coords.clone();
        if let Some(coord) = coords.get_mut(dim) {
            *coord = coord.slice(ndarray::s![range]).to_owned();
        }
        Ok(Field {
            dims: self.dims.clone(),
            values,
            coords,
            units: self.units.clone(),
        })
    }

    /// Check that two fields could share a coordinate system
    pub(crate) fn check_compatible(&self, other: &Field) -> RSESMResult<()> {
        for (i, dim) in self.dims.iter().enumerate() {
            if let Ok(axis) = other.axis(dim) {
                let (a, b) = (self.values.len_of(Axis(i)), other.values.len_of(axis));
                if a != b {
                    return Err(RSESMError::CoordinateMismatch(format!(
                        "dimension '{}' has length {} and {}",
                        dim, a, b
                    )));
                }
            }
        }
        self.check_shared_coords(other)
    }

    fn check_shared_coords(&self, other: &Field) -> RSESMResult<()> {
        for (dim, coord) in &self.coords {
            if let Some(other_coord) = other.coords.get(dim) {
                let matches = coord.len() == other_coord.len()
                    && coord
                        .iter()
                        .zip(other_coord.iter())
                        .all(|(a, b)| (a - b).abs() <= COORDINATE_TOLERANCE);
                if !matches {
                    return Err(RSESMError::CoordinateMismatch(format!(
                        "coordinate '{}' differs between fields",
                        dim
                    )));
                }
            }
        }
        Ok(())
    }

    /// View of the values with length-one axes inserted for every dimension in
    /// `target` that this field lacks
    fn expand_to(&self, target: &[String]) -> RSESMResult<ArrayViewD<'_, FloatValue>> {
        let mut position = 0;
        for dim in &self.dims {
            match target[position..].iter().position(|d| d == dim) {
                Some(offset) => position += offset + 1,
                None => {
                    return Err(RSESMError::IncompatibleDimensions {
                        lhs: target.to_vec(),
                        rhs: self.dims.clone(),
                    })
                }
            }
        }

        let mut view = self.values.view();
        for (i, dim) in target.iter().enumerate() {
            if !self.has_dim(dim) {
                view = view.insert_axis(Axis(i));
            }
        }
        Ok(view)
    }

    fn without_dim(&self, axis: Axis, values: ArrayD<FloatValue>) -> Field {
        let mut dims = self.dims.clone();
        let removed = dims.remove(axis.index());
        let mut coords = self.coords.clone();
        coords.remove(&removed);
        Field {
            dims,
            values,
            coords,
            units: self.units.clone(),
        }
    }

    fn incompatible(&self, other: &Field) -> RSESMError {
        RSESMError::IncompatibleDimensions {
            lhs: self.dims.clone(),
            rhs: other.dims.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    fn cube() -> Field {
        let values = Array3::from_shape_fn((4, 2, 3), |(t, y, x)| (t * 100 + y * 10 + x) as f64);
        Field::new(["time", "lat", "lon"], values.into_dyn())
            .unwrap()
            .with_coord("lat", array![-10.0, 10.0])
            .unwrap()
    }

    #[test]
    fn new_validates_dims() {
        let err = Field::new(["time"], array![[1.0, 2.0]].into_dyn()).unwrap_err();
        assert_eq!(
            err,
            RSESMError::ShapeMismatch {
                expected: 1,
                actual: 2
            }
        );

        let err = Field::new(["x", "x"], array![[1.0, 2.0]].into_dyn()).unwrap_err();
        assert_eq!(err, RSESMError::DuplicateDimension("x".to_string()));
    }

    #[test]
    fn coord_length_must_match() {
        let field = Field::new(["time"], array![1.0, 2.0].into_dyn()).unwrap();
        assert!(matches!(
            field.with_coord("time", array![2000.0]),
            Err(RSESMError::CoordinateMismatch(_))
        ));
    }

    #[test]
    fn broadcasting_over_missing_leading_dim() {
        let field = cube();
        let offset = Field::new(["lat", "lon"], Array3::<f64>::ones((1, 2, 3)).index_axis_move(Axis(0), 0).into_dyn())
            .unwrap();
        let result = field.broadcast_sub(&offset).unwrap();
        assert_eq!(result.values()[[3, 1, 2]], 311.0);
        assert_eq!(result.coord("lat"), field.coord("lat"));
    }

    #[test]
    fn broadcasting_over_missing_middle_dim() {
        let field = cube();
        let per_time_lon = Field::new(
            ["time", "lon"],
            Array3::<f64>::from_elem((4, 1, 3), 2.0)
                .index_axis_move(Axis(1), 0)
                .into_dyn(),
        )
        .unwrap();
        let result = field.broadcast_mul(&per_time_lon).unwrap();
        assert_eq!(result.values()[[1, 1, 1]], 222.0);
    }

    #[test]
    fn broadcasting_rejects_reordered_dims() {
        let field = cube();
        let swapped = Field::new(["lon", "lat"], ndarray::Array2::<f64>::ones((3, 2)).into_dyn()).unwrap();
        assert!(matches!(
            field.broadcast_add(&swapped),
            Err(RSESMError::IncompatibleDimensions { .. })
        ));
    }

    #[test]
    fn broadcasting_rejects_different_coords() {
        let field = cube();
        let other = Field::new(["lat"], array![1.0, 1.0].into_dyn())
            .unwrap()
            .with_coord("lat", array![-20.0, 20.0])
            .unwrap();
        assert!(matches!(
            field.broadcast_add(&other),
            Err(RSESMError::CoordinateMismatch(_))
        ));
    }

    #[test]
    fn reduce_and_select() {
        let field = cube();
        let summed = field.reduce("time", |lane| lane.sum()).unwrap();
        assert_eq!(summed.dims(), &["lat".to_string(), "lon".to_string()]);
        assert_eq!(summed.values()[[0, 0]], 600.0);

        let first = field.isel("lat", 0).unwrap();
        assert_eq!(first.shape(), &[4, 3]);
        assert!(first.coord("lat").is_none());
        assert!(field.isel("lat", 2).is_err());

        let sliced = field.slice_dim("lat", 1..2).unwrap();
        assert_eq!(sliced.coord("lat").unwrap(), &array![10.0]);
        assert_eq!(sliced.values()[[0, 0, 0]], 10.0);
    }

    #[test]
    fn transform_lanes_leaves_input_untouched() {
        let field = cube();
        let zeroed = field.transform_lanes("time", |mut lane| lane.fill(0.0)).unwrap();
        assert!(zeroed.values().iter().all(|&v| v == 0.0));
        assert_eq!(field.values()[[3, 0, 0]], 300.0);
    }

    #[test]
    fn serialization_roundtrip() {
        let field = cube().with_units("degC");
        let json = serde_json::to_string(&field).unwrap();
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }
}
