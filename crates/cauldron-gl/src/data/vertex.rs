use crate::error::{Error, Result};

use super::Scalar;

/// Caller-supplied per-vertex attribute data, tagged by shape.
///
/// The tag is resolved once when the value is built (usually through a
/// `From` impl); [`flatten`] then performs the single conversion to the
/// upload-ready form.
///
/// [`flatten`]: VertexData::flatten
#[derive(Debug, Clone, PartialEq)]
pub enum VertexData<S: Scalar = f32> {
    /// One scalar per vertex; element width 1.
    Flat(Vec<S>),
    /// One fixed-width row per vertex. Every row must match the width of
    /// the first; ragged input is rejected, not guessed at.
    Nested(Vec<Vec<S>>),
    /// Already-flat values with an explicit per-vertex width.
    Grid { values: Vec<S>, width: usize },
}

/// Upload-ready vertex data: tightly packed device floats plus the inferred
/// element shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatVertexData {
    floats: Vec<f32>,
    width: usize,
    count: usize,
}

impl FlatVertexData {
    /// The packed float values, `count * width` of them.
    #[inline]
    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    /// Floats per vertex (1..=4).
    #[inline]
    pub fn element_width(&self) -> usize {
        self.width
    }

    /// Number of vertices.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.count
    }
}

fn check_width(width: usize) -> Result<()> {
    if (1..=4).contains(&width) {
        Ok(())
    } else {
        Err(Error::InvalidElementWidth { width })
    }
}

impl<S: Scalar> VertexData<S> {
    /// Converts to tightly packed device floats, inferring element width and
    /// count from the shape.
    ///
    /// Width inference: flat input is width 1; nested input takes the first
    /// row's length (all rows must match); grid input uses its declared
    /// width, which must evenly divide the value count.
    pub fn flatten(self) -> Result<FlatVertexData> {
        match self {
            VertexData::Flat(values) => Ok(FlatVertexData {
                count: values.len(),
                width: 1,
                floats: values.iter().map(|v| v.to_device_float()).collect(),
            }),
            VertexData::Nested(rows) => {
                let width = match rows.first() {
                    Some(row) if !row.is_empty() => row.len(),
                    _ => {
                        return Err(Error::EmptyData {
                            what: "nested vertex data",
                        });
                    }
                };
                check_width(width)?;
                let mut floats = Vec::with_capacity(rows.len() * width);
                for (row, values) in rows.iter().enumerate() {
                    if values.len() != width {
                        return Err(Error::RaggedData {
                            what: "vertex data",
                            row,
                            expected: width,
                            actual: values.len(),
                        });
                    }
                    floats.extend(values.iter().map(|v| v.to_device_float()));
                }
                Ok(FlatVertexData {
                    count: rows.len(),
                    width,
                    floats,
                })
            }
            VertexData::Grid { values, width } => {
                check_width(width)?;
                if values.len() % width != 0 {
                    return Err(Error::GridShape {
                        len: values.len(),
                        width,
                    });
                }
                Ok(FlatVertexData {
                    count: values.len() / width,
                    width,
                    floats: values.iter().map(|v| v.to_device_float()).collect(),
                })
            }
        }
    }
}

impl<S: Scalar> From<Vec<S>> for VertexData<S> {
    fn from(values: Vec<S>) -> Self {
        VertexData::Flat(values)
    }
}

impl<S: Scalar> From<&[S]> for VertexData<S> {
    fn from(values: &[S]) -> Self {
        VertexData::Flat(values.to_vec())
    }
}

impl<S: Scalar> From<Vec<Vec<S>>> for VertexData<S> {
    fn from(rows: Vec<Vec<S>>) -> Self {
        VertexData::Nested(rows)
    }
}

/// Fixed-width rows carry their width in the type, so they convert straight
/// to the grid form with no runtime shape check left to fail.
impl<S: Scalar, const W: usize> From<Vec<[S; W]>> for VertexData<S> {
    fn from(rows: Vec<[S; W]>) -> Self {
        VertexData::Grid {
            values: rows.iter().flatten().copied().collect(),
            width: W,
        }
    }
}

impl<S: Scalar, const W: usize> From<&[[S; W]]> for VertexData<S> {
    fn from(rows: &[[S; W]]) -> Self {
        VertexData::Grid {
            values: rows.iter().flatten().copied().collect(),
            width: W,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── width and count inference ─────────────────────────────────────────

    #[test]
    fn flat_is_width_one() {
        let flat = VertexData::Flat(vec![1.0f32, 2.0, 3.0]).flatten().unwrap();
        assert_eq!(flat.element_width(), 1);
        assert_eq!(flat.element_count(), 3);
    }

    #[test]
    fn flat_empty_is_legal() {
        let flat = VertexData::Flat(Vec::<f32>::new()).flatten().unwrap();
        assert_eq!(flat.element_width(), 1);
        assert_eq!(flat.element_count(), 0);
    }

    #[test]
    fn nested_takes_first_row_width() {
        let flat = VertexData::Nested(vec![vec![1.0f32, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
            .flatten()
            .unwrap();
        assert_eq!(flat.element_width(), 3);
        assert_eq!(flat.element_count(), 2);
    }

    #[test]
    fn grid_divides_by_width() {
        let flat = VertexData::Grid {
            values: vec![0.0f32; 8],
            width: 2,
        }
        .flatten()
        .unwrap();
        assert_eq!(flat.element_width(), 2);
        assert_eq!(flat.element_count(), 4);
    }

    #[test]
    fn fixed_width_rows_infer_from_type() {
        let flat = VertexData::from(vec![[0.0f32, 1.0], [2.0, 3.0], [4.0, 5.0]])
            .flatten()
            .unwrap();
        assert_eq!(flat.element_width(), 2);
        assert_eq!(flat.element_count(), 3);
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn ragged_rows_name_the_offending_row() {
        let err = VertexData::Nested(vec![vec![1.0f32, 2.0], vec![1.0, 2.0, 3.0]])
            .flatten()
            .unwrap_err();
        assert_eq!(
            err,
            Error::RaggedData {
                what: "vertex data",
                row: 1,
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn empty_nested_cannot_infer_width() {
        let err = VertexData::Nested(Vec::<Vec<f32>>::new()).flatten().unwrap_err();
        assert!(matches!(err, Error::EmptyData { .. }));
    }

    #[test]
    fn empty_first_row_cannot_infer_width() {
        let err = VertexData::Nested(vec![Vec::<f32>::new()]).flatten().unwrap_err();
        assert!(matches!(err, Error::EmptyData { .. }));
    }

    #[test]
    fn width_above_four_is_rejected() {
        let err = VertexData::Nested(vec![vec![0.0f32; 5]]).flatten().unwrap_err();
        assert_eq!(err, Error::InvalidElementWidth { width: 5 });
    }

    #[test]
    fn grid_length_must_be_a_multiple_of_width() {
        let err = VertexData::Grid {
            values: vec![0.0f32; 7],
            width: 3,
        }
        .flatten()
        .unwrap_err();
        assert_eq!(err, Error::GridShape { len: 7, width: 3 });
    }

    // ── equivalence across input forms ────────────────────────────────────

    #[test]
    fn nested_and_grid_forms_flatten_identically() {
        let nested = VertexData::Nested(vec![vec![1.0f32, 2.0], vec![3.0, 4.0]])
            .flatten()
            .unwrap();
        let grid = VertexData::Grid {
            values: vec![1.0f32, 2.0, 3.0, 4.0],
            width: 2,
        }
        .flatten()
        .unwrap();
        assert_eq!(nested, grid);
    }

    #[test]
    fn flatten_is_deterministic() {
        let a = VertexData::Nested(vec![vec![1.0f32, 2.0], vec![3.0, 4.0]]);
        assert_eq!(a.clone().flatten().unwrap(), a.flatten().unwrap());
    }

    // ── scalar coercion ───────────────────────────────────────────────────

    #[test]
    fn integers_coerce_to_device_floats() {
        let flat = VertexData::Nested(vec![vec![1i32, 2], vec![3, 4]]).flatten().unwrap();
        assert_eq!(flat.floats(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn doubles_coerce_to_device_floats() {
        let flat = VertexData::Flat(vec![0.5f64, 1.5]).flatten().unwrap();
        assert_eq!(flat.floats(), &[0.5, 1.5]);
    }
}
