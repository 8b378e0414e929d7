//! Statistics helpers for anomaly analysis
//!
//! These are the building blocks used by the diagnostics:
//!
//! - NaN-aware means ([`nanmean`], [`nanmean_all`])
//! - removal of polynomial trends along time ([`rm_poly`])
//! - monthly climatologies and their removal ([`monthly_climatology`], [`deseasonalize`])
//! - ordinary least-squares regression onto a 1-D series ([`linear_regression`])
//!
//! All functions return new fields and never modify their inputs.

use crate::dataset::Dataset;
use crate::errors::{RSESMError, RSESMResult};
use crate::field::Field;
use crate::time_axis::FloatValue;
use log::warn;
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayD, ArrayView1};
use num::{Float, NumCast};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Singular values below this are treated as zero when fitting polynomials
const SINGULAR_VALUE_EPS: FloatValue = 1e-12;

/// Name given to the dimension produced by [`monthly_climatology`]
pub const MONTH_DIM: &str = "month";

/// Mean of the non-NaN values, or NaN if there are none
pub fn nanmean_iter<'a, T, I>(values: I) -> T
where
    T: Float + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((T::zero(), 0usize), |(sum, count), &v| (sum + v, count + 1));
    if count == 0 {
        T::nan()
    } else {
        <T as NumCast>::from(count).map_or_else(T::nan, |n| sum / n)
    }
}

/// Mean along `dim`, ignoring NaN values
pub fn nanmean(field: &Field, dim: &str) -> RSESMResult<Field> {
    field.reduce(dim, |lane| nanmean_iter(lane.iter()))
}

/// Mean of every element of a field, ignoring NaN values
pub fn nanmean_all(field: &Field) -> FloatValue {
    nanmean_iter(field.values().iter())
}

/// [`nanmean`] applied to every variable of a dataset
pub fn nanmean_dataset(dataset: &Dataset, dim: &str) -> RSESMResult<Dataset> {
    dataset.try_map(|_, field| nanmean(field, dim))
}

/// Element-wise mean over a stack of fields, ignoring NaN values
///
/// Every field is broadcast against the first, whose dimensions the result takes.
pub fn nanmean_stack<'a, I>(fields: I) -> RSESMResult<Field>
where
    I: IntoIterator<Item = &'a Field>,
{
    let mut fields = fields.into_iter();
    let first = fields
        .next()
        .ok_or_else(|| RSESMError::Error("cannot average an empty stack of fields".to_string()))?;

    let valid = |v: FloatValue| if v.is_nan() { 0.0 } else { 1.0 };
    let mut sum = first.map(|v| if v.is_nan() { 0.0 } else { v });
    let mut count = first.map(valid);
    for field in fields {
        sum = sum.zip_with(field, |s, v| if v.is_nan() { s } else { s + v })?;
        count = count.zip_with(field, |c, v| c + valid(v))?;
    }
    sum.zip_with(&count, |s, c| if c == 0.0 { FloatValue::NAN } else { s / c })
}

/// Time steps whose calendar year lies in `[first_year, last_year]`
pub fn select_years(field: &Field, dim: &str, first_year: i32, last_year: i32) -> RSESMResult<Field> {
    let range = field.time_axis(dim)?.year_range(first_year, last_year);
    field.slice_dim(dim, range)
}

/// Remove a least-squares polynomial of degree `order` along `dim`
///
/// Time is centred and scaled to `[-1, 1]` before fitting, so high orders stay
/// well conditioned. Lanes containing NaN are fitted on their finite points
/// and keep NaN where the input was NaN. Lanes with fewer than `order + 1`
/// finite points become entirely NaN. An `order` of zero removes the mean.
pub fn rm_poly(field: &Field, order: usize, dim: &str) -> RSESMResult<Field> {
    let time = field.time_axis(dim)?;
    let x = normalised_time(time.values());
    let n = x.len();
    let n_coeffs = order + 1;

    let full_pinv = if n >= n_coeffs {
        Some(
            vandermonde(&x, n_coeffs)
                .pseudo_inverse(SINGULAR_VALUE_EPS)
                .map_err(|e| RSESMError::Error(e.to_string()))?,
        )
    } else {
        None
    };

    field.transform_lanes(dim, |mut lane| {
        let finite: Vec<usize> = (0..n).filter(|&i| lane[i].is_finite()).collect();
        if finite.len() < n_coeffs {
            lane.fill(FloatValue::NAN);
            return;
        }

        let coefficients = match &full_pinv {
            Some(pinv) if finite.len() == n => pinv * DVector::from_iterator(n, lane.iter().copied()),
            _ => {
                let xs: Vec<FloatValue> = finite.iter().map(|&i| x[i]).collect();
                match vandermonde(&xs, n_coeffs).pseudo_inverse(SINGULAR_VALUE_EPS) {
                    Ok(pinv) => {
                        pinv * DVector::from_iterator(finite.len(), finite.iter().map(|&i| lane[i]))
                    }
                    Err(e) => {
                        warn!("Polynomial fit along '{}' failed ({}); lane set to NaN", dim, e);
                        lane.fill(FloatValue::NAN);
                        return;
                    }
                }
            }
        };

        for &i in &finite {
            let trend: FloatValue = coefficients
                .iter()
                .enumerate()
                .map(|(power, c)| c * x[i].powi(power as i32))
                .sum();
            lane[i] -= trend;
        }
    })
}

/// [`rm_poly`] applied to every variable of a dataset
pub fn rm_poly_dataset(dataset: &Dataset, order: usize, dim: &str) -> RSESMResult<Dataset> {
    dataset.try_map(|_, field| rm_poly(field, order, dim))
}

/// Mean seasonal cycle: the NaN-mean of each calendar month along `dim`
///
/// `dim` is replaced by a [`MONTH_DIM`] dimension of length 12 (January first)
/// with coordinate values 1 to 12. Months with no data are NaN.
pub fn monthly_climatology(field: &Field, dim: &str) -> RSESMResult<Field> {
    let axis = field.axis(dim)?;
    let groups = field.time_axis(dim)?.month_groups();

    let means: Vec<ArrayD<FloatValue>> = groups
        .iter()
        .map(|group| {
            field
                .values()
                .select(axis, group)
                .map_axis(axis, |lane| nanmean_iter(lane.iter()))
        })
        .collect();
    let views: Vec<_> = means.iter().map(|m| m.view()).collect();
    let values = ndarray::stack(axis, &views).map_err(|e| RSESMError::Error(e.to_string()))?;

    let dims: Vec<String> = field
        .dims()
        .iter()
        .map(|d| if d == dim { MONTH_DIM.to_string() } else { d.clone() })
        .collect();
    let mut climatology = Field::new(dims, values)?;
    for (name, coord) in field.coords() {
        if name != dim {
            climatology = climatology.with_coord(name, coord.clone())?;
        }
    }
    climatology = climatology.with_coord(MONTH_DIM, Array1::range(1.0, 13.0, 1.0))?;
    Ok(match field.units() {
        Some(units) => climatology.with_units(units),
        None => climatology,
    })
}

/// Subtract the mean seasonal cycle along `dim`
pub fn deseasonalize(field: &Field, dim: &str) -> RSESMResult<Field> {
    let groups = field.time_axis(dim)?.month_groups();
    field.transform_lanes(dim, |mut lane| {
        for group in groups.iter() {
            let mean = nanmean_iter(group.iter().map(|&i| &lane[i]));
            for &i in group {
                lane[i] -= mean;
            }
        }
    })
}

/// [`deseasonalize`] applied to every variable of a dataset
pub fn deseasonalize_dataset(dataset: &Dataset, dim: &str) -> RSESMResult<Dataset> {
    dataset.try_map(|_, field| deseasonalize(field, dim))
}

/// Result of regressing a field onto a 1-D series
///
/// Each member is defined over the regressed field's dimensions minus the
/// regression dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub slope: Field,
    pub intercept: Field,
    pub rvalue: Field,
    /// Two-sided p-value for a null hypothesis of zero slope
    pub pvalue: Field,
    /// Standard error of the slope
    pub stderr: Field,
}

/// Ordinary least-squares regression of every lane of `y` along `dim` onto `x`
///
/// `x` must be one-dimensional along `dim` and the same length as `y` along
/// that dimension. Time steps where either series is NaN are ignored; lanes
/// with fewer than three valid pairs give NaN. When `psig` is set, slopes whose
/// p-value exceeds it are replaced by NaN.
pub fn linear_regression(
    x: &Field,
    y: &Field,
    dim: &str,
    psig: Option<FloatValue>,
) -> RSESMResult<Regression> {
    if x.dims() != [dim.to_string()] {
        return Err(RSESMError::IncompatibleDimensions {
            lhs: vec![dim.to_string()],
            rhs: x.dims().to_vec(),
        });
    }
    let (nx, ny) = (x.len_of(dim)?, y.len_of(dim)?);
    if nx != ny {
        return Err(RSESMError::TimeAxisMismatch(format!(
            "regressor has {} time steps but the field has {}",
            nx, ny
        )));
    }
    if x.coord(dim).is_some() && y.coord(dim).is_some() {
        x.time_axis(dim)?.ensure_matches(&y.time_axis(dim)?)?;
    }

    let xs: Vec<FloatValue> = x.values().iter().copied().collect();
    let fits = y
        .values()
        .map_axis(y.axis(dim)?, |lane| LineFit::fit(&xs, lane));
    let component = |select: fn(&LineFit) -> FloatValue| {
        y.reduced(dim, fits.map(select)).map(Field::without_units)
    };

    let mut slope = component(|f| f.slope)?;
    let pvalue = component(|f| f.pvalue)?;
    if let Some(psig) = psig {
        slope = slope.zip_with(&pvalue, |s, p| if p > psig { FloatValue::NAN } else { s })?;
    }

    Ok(Regression {
        slope,
        intercept: component(|f| f.intercept)?,
        rvalue: component(|f| f.rvalue)?,
        pvalue,
        stderr: component(|f| f.stderr)?,
    })
}

#[derive(Debug, Clone, Copy)]
struct LineFit {
    slope: FloatValue,
    intercept: FloatValue,
    rvalue: FloatValue,
    pvalue: FloatValue,
    stderr: FloatValue,
}

impl LineFit {
    const MISSING: LineFit = LineFit {
        slope: FloatValue::NAN,
        intercept: FloatValue::NAN,
        rvalue: FloatValue::NAN,
        pvalue: FloatValue::NAN,
        stderr: FloatValue::NAN,
    };

    fn fit(x: &[FloatValue], y: ArrayView1<FloatValue>) -> LineFit {
        let pairs: Vec<(FloatValue, FloatValue)> = x
            .iter()
            .zip(y.iter())
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .map(|(&a, &b)| (a, b))
            .collect();
        let n = pairs.len();
        if n < 3 {
            return Self::MISSING;
        }

        let n_f = n as FloatValue;
        let x_mean = pairs.iter().map(|p| p.0).sum::<FloatValue>() / n_f;
        let y_mean = pairs.iter().map(|p| p.1).sum::<FloatValue>() / n_f;
        let (ssx, ssy, ssxy) = pairs.iter().fold((0.0, 0.0, 0.0), |(sx, sy, sxy), (a, b)| {
            let (dx, dy) = (a - x_mean, b - y_mean);
            (sx + dx * dx, sy + dy * dy, sxy + dx * dy)
        });
        if ssx == 0.0 {
            return Self::MISSING;
        }

        let slope = ssxy / ssx;
        let intercept = y_mean - slope * x_mean;
        let rvalue = if ssy == 0.0 {
            0.0
        } else {
            (ssxy / (ssx * ssy).sqrt()).clamp(-1.0, 1.0)
        };

        let df = n_f - 2.0;
        let stderr = ((1.0 - rvalue * rvalue) * ssy / ssx / df).max(0.0).sqrt();
        let pvalue = if rvalue.abs() >= 1.0 {
            0.0
        } else {
            let t = rvalue * (df / ((1.0 - rvalue) * (1.0 + rvalue))).sqrt();
            StudentsT::new(0.0, 1.0, df)
                .map(|dist| 2.0 * dist.sf(t.abs()))
                .unwrap_or(FloatValue::NAN)
        };

        LineFit {
            slope,
            intercept,
            rvalue,
            pvalue,
            stderr,
        }
    }
}

fn normalised_time(time: &Array1<FloatValue>) -> Vec<FloatValue> {
    let centre = nanmean_iter(time.iter());
    let half_span = time
        .iter()
        .map(|t| (t - centre).abs())
        .fold(0.0, FloatValue::max);
    let scale = if half_span > 0.0 { half_span } else { 1.0 };
    time.iter().map(|t| (t - centre) / scale).collect()
}

fn vandermonde(x: &[FloatValue], n_coeffs: usize) -> DMatrix<FloatValue> {
    DMatrix::from_fn(x.len(), n_coeffs, |i, j| x[i].powi(j as i32))
}
