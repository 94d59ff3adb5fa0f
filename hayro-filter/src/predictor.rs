//! TIFF and PNG predictors.
//!
//! LZW and Flate streams can store image data as differences to neighboring
//! bytes, which usually compresses much better. The functions in this module
//! undo (and, for encoding, apply) these differences. They operate on whole
//! bytes only: for components with fewer than 8 bits, every pixel still
//! occupies at least one byte slot.

use crate::error::{PredictorError, Result, bail};
use crate::params::{PngFilter, Predictor, RowGeometry};

/// The Paeth predictor of PNG.
///
/// Returns whichever of `a` (left), `b` (above) and `c` (upper left) is
/// closest to `a + b - c`, preferring `a`, then `b`.
#[inline]
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let (ai, bi, ci) = (a as i16, b as i16, c as i16);
    let p = ai + bi - ci;
    let pa = (p - ai).abs();
    let pb = (p - bi).abs();
    let pc = (p - ci).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Undo TIFF horizontal differencing of a single row, in place.
///
/// Every byte from position `colors` on is added to the already restored
/// byte `colors` positions before it. A `colors` of zero leaves the row
/// untouched.
pub fn apply_hor_diff(row: &mut [u8], colors: usize) {
    if colors == 0 {
        return;
    }

    for i in colors..row.len() {
        row[i] = row[i].wrapping_add(row[i - colors]);
    }
}

/// Reconstruct a single row of predicted data into `out`.
///
/// For PNG predictors, `cur` starts with the row's filter type tag, which takes
/// precedence over the concrete PNG predictor value, and `out` must be one
/// byte shorter than `cur`. For the TIFF predictor, `cur` has no tag and
/// `out` has the same length. `prev` is the previously reconstructed row, if
/// there is one, and must be at least as long as `out`.
pub fn process_row(
    prev: Option<&[u8]>,
    cur: &[u8],
    out: &mut [u8],
    predictor: Predictor,
    colors: usize,
    bytes_per_pixel: usize,
) -> Result<()> {
    match predictor {
        Predictor::No => {
            check_row(None, cur, out)?;
            out.copy_from_slice(cur);
        }
        Predictor::Tiff => {
            check_row(None, cur, out)?;
            out.copy_from_slice(cur);
            apply_hor_diff(out, colors);
        }
        _ => {
            let Some((&tag, raw)) = cur.split_first() else {
                bail!(PredictorError::IncompleteRow);
            };
            let filter = PngFilter::from_tag(tag).ok_or(PredictorError::InvalidRowFilter(tag))?;
            unfilter_row(filter, prev, raw, out, bytes_per_pixel)?;
        }
    }

    Ok(())
}

/// Undo the PNG filter `filter` of `raw`, writing the result into `out`.
///
/// `out` must have the same length as `raw`, and `prev` must be at least as
/// long.
pub fn unfilter_row(
    filter: PngFilter,
    prev: Option<&[u8]>,
    raw: &[u8],
    out: &mut [u8],
    bytes_per_pixel: usize,
) -> Result<()> {
    check_row(prev, raw, out)?;

    match filter {
        PngFilter::None => out.copy_from_slice(raw),
        PngFilter::Sub => unfilter_sub(raw, out, bytes_per_pixel),
        PngFilter::Up => unfilter_up(prev, raw, out),
        PngFilter::Average => unfilter_average(prev, raw, out, bytes_per_pixel),
        PngFilter::Paeth => unfilter_paeth_unchecked(prev, raw, out, bytes_per_pixel),
    }

    Ok(())
}

fn check_row(prev: Option<&[u8]>, raw: &[u8], out: &[u8]) -> Result<()> {
    if out.len() != raw.len() || prev.is_some_and(|p| p.len() < raw.len()) {
        bail!(PredictorError::RowLengthMismatch);
    }

    Ok(())
}

fn unfilter_sub(raw: &[u8], out: &mut [u8], bpp: usize) {
    for i in 0..raw.len() {
        let left = if i >= bpp { out[i - bpp] } else { 0 };
        out[i] = raw[i].wrapping_add(left);
    }
}

fn unfilter_up(prev: Option<&[u8]>, raw: &[u8], out: &mut [u8]) {
    match prev {
        Some(prev) => {
            for i in 0..raw.len() {
                out[i] = raw[i].wrapping_add(prev[i]);
            }
        }
        None => out.copy_from_slice(raw),
    }
}

fn unfilter_average(prev: Option<&[u8]>, raw: &[u8], out: &mut [u8], bpp: usize) {
    for i in 0..raw.len() {
        let left = if i >= bpp { out[i - bpp] as u16 } else { 0 };
        let above = prev.map_or(0, |p| p[i] as u16);
        out[i] = raw[i].wrapping_add(((left + above) / 2) as u8);
    }
}

/// Undo the PNG Paeth filter of `raw`, writing the result into `out`.
///
/// Fails with [`PredictorError::RowLengthMismatch`] if `out` and `raw` differ
/// in length or `prev` is shorter than `raw`.
pub fn unfilter_paeth(
    prev: Option<&[u8]>,
    raw: &[u8],
    out: &mut [u8],
    bpp: usize,
) -> Result<()> {
    check_row(prev, raw, out)?;
    unfilter_paeth_unchecked(prev, raw, out, bpp);

    Ok(())
}

fn unfilter_paeth_unchecked(prev: Option<&[u8]>, raw: &[u8], out: &mut [u8], bpp: usize) {
    for i in 0..raw.len() {
        let left = if i >= bpp { out[i - bpp] } else { 0 };
        let (above, upper_left) = match prev {
            Some(p) => (p[i], if i >= bpp { p[i - bpp] } else { 0 }),
            None => (0, 0),
        };
        out[i] = raw[i].wrapping_add(paeth(left, above, upper_left));
    }
}

/// Undo the predictor of a whole decompressed buffer.
pub(crate) fn decode(data: Vec<u8>, predictor: Predictor, geometry: &RowGeometry) -> Result<Vec<u8>> {
    match predictor {
        Predictor::No => Ok(data),
        Predictor::Tiff => Ok(decode_tiff(data, geometry)),
        _ => decode_png(&data, geometry),
    }
}

fn decode_tiff(mut data: Vec<u8>, geometry: &RowGeometry) -> Vec<u8> {
    for row in data.chunks_mut(geometry.row_length()) {
        apply_hor_diff(row, geometry.colors);
    }

    data
}

fn decode_png(data: &[u8], geometry: &RowGeometry) -> Result<Vec<u8>> {
    let row_len = geometry.row_length();
    let bpp = geometry.bytes_per_pixel();
    // +1 because each row starts with its filter type.
    let chunk_len = row_len + 1;

    if !data.len().is_multiple_of(chunk_len) {
        bail!(PredictorError::IncompleteRow);
    }

    let num_rows = data.len() / chunk_len;
    let mut out = vec![0; num_rows * row_len];

    for (i, cur) in data.chunks_exact(chunk_len).enumerate() {
        let (done, rest) = out.split_at_mut(i * row_len);
        let prev = (i > 0).then(|| &done[(i - 1) * row_len..]);
        let Some((&tag, raw)) = cur.split_first() else {
            bail!(PredictorError::IncompleteRow);
        };
        let filter = PngFilter::from_tag(tag).ok_or(PredictorError::InvalidRowFilter(tag))?;

        unfilter_row(filter, prev, raw, &mut rest[..row_len], bpp)?;
    }

    Ok(out)
}

/// Apply the predictor to a buffer before compressing it.
pub(crate) fn encode(data: &[u8], predictor: Predictor, geometry: &RowGeometry) -> Result<Vec<u8>> {
    match predictor {
        Predictor::No => Ok(data.to_vec()),
        Predictor::Tiff => Ok(encode_tiff(data, geometry)),
        _ => encode_png(data, predictor, geometry),
    }
}

fn encode_tiff(data: &[u8], geometry: &RowGeometry) -> Vec<u8> {
    let mut encoded = data.to_vec();
    let colors = geometry.colors;

    for row in encoded.chunks_mut(geometry.row_length()) {
        for i in (colors..row.len()).rev() {
            row[i] = row[i].wrapping_sub(row[i - colors]);
        }
    }

    encoded
}

fn encode_png(data: &[u8], predictor: Predictor, geometry: &RowGeometry) -> Result<Vec<u8>> {
    let row_len = geometry.row_length();
    let bpp = geometry.bytes_per_pixel();

    if !data.len().is_multiple_of(row_len) {
        bail!(PredictorError::IncompleteRow);
    }

    let mut encoded = Vec::with_capacity(data.len() + data.len() / row_len);
    let mut scratch = vec![0; row_len];
    let mut best = vec![0; row_len];

    for (i, row) in data.chunks_exact(row_len).enumerate() {
        let prev = (i > 0).then(|| &data[(i - 1) * row_len..i * row_len]);

        let filter = match predictor.png_filter() {
            Some(filter) => {
                filter_row(filter, prev, row, &mut best, bpp);
                filter
            }
            None => {
                // Pick the row type with the smallest sum of absolute residuals.
                let mut best_filter = PngFilter::None;
                let mut best_score = u64::MAX;

                for filter in PngFilter::ALL {
                    filter_row(filter, prev, row, &mut scratch, bpp);
                    let score = residual_score(&scratch);

                    if score < best_score {
                        best_score = score;
                        best_filter = filter;
                        core::mem::swap(&mut best, &mut scratch);
                    }
                }

                best_filter
            }
        };

        encoded.push(filter.tag());
        encoded.extend_from_slice(&best);
    }

    Ok(encoded)
}

fn filter_row(filter: PngFilter, prev: Option<&[u8]>, row: &[u8], out: &mut [u8], bpp: usize) {
    for i in 0..row.len() {
        let left = if i >= bpp { row[i - bpp] } else { 0 };
        let (above, upper_left) = match prev {
            Some(p) => (p[i], if i >= bpp { p[i - bpp] } else { 0 }),
            None => (0, 0),
        };

        let predicted = match filter {
            PngFilter::None => 0,
            PngFilter::Sub => left,
            PngFilter::Up => above,
            PngFilter::Average => ((left as u16 + above as u16) / 2) as u8,
            PngFilter::Paeth => paeth(left, above, upper_left),
        };

        out[i] = row[i].wrapping_sub(predicted);
    }
}

fn residual_score(residuals: &[u8]) -> u64 {
    residuals
        .iter()
        .map(|&b| (b as i8).unsigned_abs() as u64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;

    #[test]
    fn paeth_tie_breaks() {
        assert_eq!(paeth(100, 100, 100), 100);
        assert_eq!(paeth(10, 200, 200), 10);
        assert_eq!(paeth(200, 10, 200), 10);
        assert_eq!(paeth(200, 200, 10), 200);
        assert_eq!(paeth(1, 2, 0), 2);
        assert_eq!(paeth(0, 0, 0), 0);
        assert_eq!(paeth(255, 255, 255), 255);
        // p = 20 + 30 - 25 = 25, so c is the closest.
        assert_eq!(paeth(20, 30, 25), 25);
    }

    #[test]
    fn paeth_rows() {
        let zeroes = [0_u8; 4];
        let fives = [5_u8; 4];
        let mut out = [0; 4];

        unfilter_paeth(Some(&zeroes[..]), &[1, 2, 3, 4], &mut out, 1).unwrap();
        assert_eq!(out, [1, 3, 6, 10]);

        unfilter_paeth(Some(&zeroes[..]), &[1, 2, 1, 2], &mut out, 2).unwrap();
        assert_eq!(out, [1, 2, 2, 4]);

        unfilter_paeth(Some(&fives[..]), &[1, 1, 1, 1], &mut out, 1).unwrap();
        assert_eq!(out, [6, 7, 8, 9]);

        let mut empty: [u8; 0] = [];
        unfilter_paeth(Some(&[][..]), &[], &mut empty, 1).unwrap();
    }

    #[test]
    fn hor_diff() {
        let cases: [(&[u8], usize, &[u8]); 8] = [
            (&[10, 5, 3, 2], 1, &[10, 15, 18, 20]),
            (&[0, 0, 0, 0], 1, &[0, 0, 0, 0]),
            (&[10, 20, 5, 5], 2, &[10, 20, 15, 25]),
            (&[100, 150, 200, 10, 20, 30], 3, &[100, 150, 200, 110, 170, 230]),
            (
                &[50, 100, 150, 200, 5, 10, 15, 20],
                4,
                &[50, 100, 150, 200, 55, 110, 165, 220],
            ),
            (&[200, 100], 1, &[200, 44]),
            (&[], 1, &[]),
            (&[42], 1, &[42]),
        ];

        for (row, colors, expected) in cases {
            let mut row = row.to_vec();
            apply_hor_diff(&mut row, colors);
            assert_eq!(row, expected);
        }
    }

    #[test]
    fn process_rows() {
        let mut out = [0; 4];

        process_row(None, &[10, 5, 3, 2], &mut out, Predictor::Tiff, 1, 1).unwrap();
        assert_eq!(out, [10, 15, 18, 20]);

        process_row(None, &[0, 1, 2, 3, 4], &mut out, Predictor::PngNone, 1, 1).unwrap();
        assert_eq!(out, [1, 2, 3, 4]);

        process_row(None, &[1, 10, 5, 3, 2], &mut out, Predictor::PngSub, 1, 1).unwrap();
        assert_eq!(out, [10, 15, 18, 20]);

        let prev = [10_u8, 20, 30, 40];
        process_row(Some(&prev[..]), &[2, 1, 2, 3, 4], &mut out, Predictor::PngUp, 1, 1).unwrap();
        assert_eq!(out, [11, 22, 33, 44]);

        process_row(None, &[3, 10, 5, 3, 2], &mut out, Predictor::PngAverage, 1, 1).unwrap();
        assert_eq!(out, [10, 10, 8, 6]);

        process_row(None, &[4, 1, 2, 3, 4], &mut out, Predictor::PngPaeth, 1, 1).unwrap();
        assert_eq!(out, [1, 3, 6, 10]);
    }

    #[test]
    fn row_tag_overrides_predictor() {
        let mut out = [0; 4];
        // The stream says Paeth, but the row is tagged Sub.
        process_row(None, &[1, 10, 5, 3, 2], &mut out, Predictor::PngPaeth, 1, 1).unwrap();
        assert_eq!(out, [10, 15, 18, 20]);
    }

    #[test]
    fn invalid_row_tag() {
        let mut out = [0; 2];
        assert_eq!(
            process_row(None, &[7, 1, 2], &mut out, Predictor::PngUp, 1, 1),
            Err(FilterError::Predictor(PredictorError::InvalidRowFilter(7)))
        );
    }

    #[test]
    fn mismatched_row_lengths() {
        let mismatch = Err(FilterError::Predictor(PredictorError::RowLengthMismatch));

        // The previous row is shorter than the current one.
        let mut out = [0; 4];
        let short = [1_u8, 2];
        assert_eq!(
            process_row(Some(&short[..]), &[2, 1, 2, 3, 4], &mut out, Predictor::PngUp, 1, 1),
            mismatch
        );

        // The output has room for the tag byte too.
        let mut out = [0; 5];
        assert_eq!(
            process_row(None, &[0, 1, 2, 3, 4], &mut out, Predictor::PngNone, 1, 1),
            mismatch
        );

        let mut out = [0; 3];
        assert_eq!(
            process_row(None, &[10, 5, 3, 2], &mut out, Predictor::Tiff, 1, 1),
            mismatch
        );
        assert_eq!(
            process_row(None, &[10, 5, 3, 2], &mut out, Predictor::No, 1, 1),
            mismatch
        );
    }

    #[test]
    fn mismatched_paeth_rows() {
        let mismatch = Err(FilterError::Predictor(PredictorError::RowLengthMismatch));

        let mut out = [0; 1];
        assert_eq!(unfilter_paeth(Some(&[][..]), &[1], &mut out, 1), mismatch);

        let mut out = [0; 2];
        assert_eq!(unfilter_paeth(None, &[1], &mut out, 1), mismatch);
        assert_eq!(
            unfilter_row(PngFilter::Average, Some(&[][..]), &[1, 2], &mut out, 1),
            mismatch
        );

        // A longer previous row is fine.
        let mut out = [0; 1];
        unfilter_paeth(Some(&[3, 4][..]), &[1], &mut out, 1).unwrap();
        assert_eq!(out, [4]);
    }

    #[test]
    fn hor_diff_without_colors() {
        let mut row = [10_u8, 5, 3, 2];
        apply_hor_diff(&mut row, 0);
        assert_eq!(row, [10, 5, 3, 2]);
    }

    #[test]
    fn png_buffer() {
        let geometry = RowGeometry {
            colors: 1,
            bits_per_component: 8,
            columns: 3,
        };
        let data = [
            2, 1, 2, 3, // Up, no previous row
            2, 1, 1, 1, // Up
            1, 5, 1, 1, // Sub
        ];

        let decoded = decode(data.to_vec(), Predictor::PngUp, &geometry).unwrap();
        assert_eq!(decoded, [1, 2, 3, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn png_buffer_with_partial_row() {
        let geometry = RowGeometry {
            colors: 1,
            bits_per_component: 8,
            columns: 3,
        };

        assert_eq!(
            decode(vec![0, 1, 2, 3, 0, 1], Predictor::PngNone, &geometry),
            Err(FilterError::Predictor(PredictorError::IncompleteRow))
        );
    }

    #[test]
    fn tiff_buffer_restarts_every_row() {
        let geometry = RowGeometry {
            colors: 1,
            bits_per_component: 8,
            columns: 2,
        };

        let decoded = decode(vec![1, 1, 5, 1, 7], Predictor::Tiff, &geometry).unwrap();
        assert_eq!(decoded, [1, 2, 5, 6, 7]);
    }

    #[test]
    fn encode_then_decode_every_predictor() {
        let geometry = RowGeometry {
            colors: 3,
            bits_per_component: 8,
            columns: 4,
        };
        let data: Vec<u8> = (0..48u32).map(|i| (i * 37 % 251) as u8).collect();

        for value in [1, 2, 10, 11, 12, 13, 14, 15] {
            let predictor = Predictor::from_value(value).unwrap();
            let encoded = encode(&data, predictor, &geometry).unwrap();
            let decoded = decode(encoded, predictor, &geometry).unwrap();
            assert_eq!(decoded, data, "predictor {value}");
        }
    }

    #[test]
    fn optimum_prefers_cheap_rows() {
        let geometry = RowGeometry {
            colors: 1,
            bits_per_component: 8,
            columns: 4,
        };
        // A ramp is all zeroes after Sub, except for the first byte.
        let encoded = encode(&[10, 20, 30, 40], Predictor::PngOptimum, &geometry).unwrap();
        assert_eq!(encoded, [PngFilter::Sub.tag(), 10, 10, 10, 10]);
    }

    #[test]
    fn png_encode_needs_whole_rows() {
        let geometry = RowGeometry {
            colors: 1,
            bits_per_component: 8,
            columns: 4,
        };

        assert!(encode(&[1, 2, 3], Predictor::PngUp, &geometry).is_err());
    }
}
