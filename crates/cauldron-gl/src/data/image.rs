use crate::error::{Error, Result};

use super::Scalar;

/// Caller-supplied texel data: a rectangular grid of RGB triples.
///
/// The 3-channel requirement is carried in the type for the nested form;
/// the grid form declares its dimensions and is checked arithmetically.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData<S: Scalar = f32> {
    /// Rows of texels, top row first. Every row must have the same length.
    Rows(Vec<Vec<[S; 3]>>),
    /// Flat channel values in row-major order; `channels.len()` must equal
    /// `width * height * 3`.
    Grid {
        channels: Vec<S>,
        width: usize,
        height: usize,
    },
}

/// Upload-ready image data: packed RGB device floats plus dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePixels {
    floats: Vec<f32>,
    width: usize,
    height: usize,
}

impl ImagePixels {
    /// Packed channel values, `width * height * 3` of them.
    #[inline]
    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    /// Texels per row.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }
}

impl<S: Scalar> ImageData<S> {
    /// Converts to packed RGB device floats, validating that the grid is
    /// rectangular.
    pub fn flatten(self) -> Result<ImagePixels> {
        match self {
            ImageData::Rows(rows) => {
                let width = match rows.first() {
                    Some(row) if !row.is_empty() => row.len(),
                    _ => {
                        return Err(Error::EmptyData {
                            what: "image data",
                        });
                    }
                };
                let mut floats = Vec::with_capacity(rows.len() * width * 3);
                for (row, texels) in rows.iter().enumerate() {
                    if texels.len() != width {
                        return Err(Error::RaggedData {
                            what: "image data",
                            row,
                            expected: width,
                            actual: texels.len(),
                        });
                    }
                    for texel in texels {
                        floats.extend(texel.iter().map(|c| c.to_device_float()));
                    }
                }
                Ok(ImagePixels {
                    width,
                    height: rows.len(),
                    floats,
                })
            }
            ImageData::Grid {
                channels,
                width,
                height,
            } => {
                if channels.len() != width * height * 3 {
                    return Err(Error::ImageShape {
                        len: channels.len(),
                        width,
                        height,
                    });
                }
                if channels.is_empty() {
                    return Err(Error::EmptyData {
                        what: "image data",
                    });
                }
                Ok(ImagePixels {
                    width,
                    height,
                    floats: channels.iter().map(|c| c.to_device_float()).collect(),
                })
            }
        }
    }
}

impl<S: Scalar> From<Vec<Vec<[S; 3]>>> for ImageData<S> {
    fn from(rows: Vec<Vec<[S; 3]>>) -> Self {
        ImageData::Rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texel(v: f32) -> [f32; 3] {
        [v, v, v]
    }

    // ── shape inference ───────────────────────────────────────────────────

    #[test]
    fn rows_report_width_and_height() {
        let pixels = ImageData::Rows(vec![
            vec![texel(0.0), texel(1.0)],
            vec![texel(2.0), texel(3.0)],
        ])
        .flatten()
        .unwrap();
        assert_eq!(pixels.width(), 2);
        assert_eq!(pixels.height(), 2);
        assert_eq!(pixels.floats().len(), 12);
    }

    #[test]
    fn grid_matches_declared_dimensions() {
        let pixels = ImageData::Grid {
            channels: vec![0.5f32; 20 * 20 * 3],
            width: 20,
            height: 20,
        }
        .flatten()
        .unwrap();
        assert_eq!(pixels.width(), 20);
        assert_eq!(pixels.height(), 20);
    }

    #[test]
    fn rows_pack_in_row_major_order() {
        let pixels = ImageData::Rows(vec![vec![[1.0f32, 2.0, 3.0]], vec![[4.0, 5.0, 6.0]]])
            .flatten()
            .unwrap();
        assert_eq!(pixels.floats(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn ragged_rows_name_the_offending_row() {
        let err = ImageData::Rows(vec![
            vec![texel(0.0), texel(0.0)],
            vec![texel(0.0)],
        ])
        .flatten()
        .unwrap_err();
        assert_eq!(
            err,
            Error::RaggedData {
                what: "image data",
                row: 1,
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn grid_with_wrong_channel_count_is_rejected() {
        let err = ImageData::Grid {
            channels: vec![0.0f32; 11],
            width: 2,
            height: 2,
        }
        .flatten()
        .unwrap_err();
        assert_eq!(
            err,
            Error::ImageShape {
                len: 11,
                width: 2,
                height: 2,
            }
        );
    }

    #[test]
    fn empty_rows_are_rejected() {
        assert!(matches!(
            ImageData::Rows(Vec::<Vec<[f32; 3]>>::new()).flatten(),
            Err(Error::EmptyData { .. })
        ));
    }

    // ── scalar coercion ───────────────────────────────────────────────────

    #[test]
    fn integer_channels_coerce_to_floats() {
        let pixels = ImageData::Rows(vec![vec![[1u8, 0, 0], [0, 1, 0]]]).flatten().unwrap();
        assert_eq!(pixels.floats(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }
}
