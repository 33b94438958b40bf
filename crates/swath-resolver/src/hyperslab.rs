//! Strided hyperslab extraction from shaped buffers.
//!
//! Serves the caller's requested sub-region of a row-major buffer. This is
//! independent of interpolation: the buffer may be a raw field read or an
//! expanded geolocation field; a sample is addressed the same way either
//! way.

use swath_core::{SwathError, SwathResult};

/// Extract a strided sub-region from a row-major buffer.
///
/// `offset`, `count`, and `stride` give the per-axis start index, number
/// of samples, and step between samples. The output is row-major over the
/// requested indices only, axis 0 varying slowest, with length
/// `count.iter().product()`. All validation happens before the output is
/// allocated.
pub fn extract<T: Copy>(
    buf: &[T],
    shape: &[usize],
    offset: &[usize],
    count: &[usize],
    stride: &[usize],
) -> SwathResult<Vec<T>> {
    let rank = shape.len();
    if offset.len() != rank || count.len() != rank || stride.len() != rank {
        return Err(SwathError::range(
            format!(
                "offset/count/stride of ranks {}/{}/{}",
                offset.len(),
                count.len(),
                stride.len()
            ),
            format!("field of rank {}", rank),
        ));
    }

    let expected: usize = shape.iter().product();
    if buf.len() != expected {
        return Err(SwathError::config(format!(
            "buffer holds {} elements but shape {:?} requires {}",
            buf.len(),
            shape,
            expected
        )));
    }

    for a in 0..rank {
        if stride[a] == 0 {
            return Err(SwathError::range(
                format!("stride 0 on axis {}", a),
                format!("{:?}", shape),
            ));
        }
        if count[a] > 0 && offset[a] + (count[a] - 1) * stride[a] >= shape[a] {
            return Err(SwathError::range(
                format!(
                    "axis {}: offset {} count {} stride {}",
                    a, offset[a], count[a], stride[a]
                ),
                format!("{:?}", shape),
            ));
        }
    }

    let total: usize = count.iter().product();
    let mut out = Vec::with_capacity(total);
    if total == 0 {
        return Ok(out);
    }
    if rank == 0 {
        out.push(buf[0]);
        return Ok(out);
    }

    // Row-major source strides: product of the sizes of the axes to the
    // right of each axis.
    let mut src_strides = vec![1usize; rank];
    for a in (0..rank - 1).rev() {
        src_strides[a] = src_strides[a + 1] * shape[a + 1];
    }

    let mut pos = vec![0usize; rank];
    'walk: loop {
        let mut linear = 0;
        for a in 0..rank {
            linear += (offset[a] + pos[a] * stride[a]) * src_strides[a];
        }
        out.push(buf[linear]);

        for a in (0..rank).rev() {
            pos[a] += 1;
            if pos[a] < count[a] {
                continue 'walk;
            }
            pos[a] = 0;
        }
        break;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_full_1d() {
        let buf = vec![0.0, 1.0, 2.0, 3.0];
        let out = extract(&buf, &[4], &[0], &[4], &[1]).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn test_extract_strided_1d() {
        let buf: Vec<f64> = (0..7).map(|v| v as f64 * 5.0).collect();
        let out = extract(&buf, &[7], &[1], &[3], &[2]).unwrap();
        assert_eq!(out, vec![5.0, 15.0, 25.0]);
    }

    #[test]
    fn test_extract_2d_block() {
        // 3x4 buffer, values row*10 + col
        let buf: Vec<i32> = (0..3)
            .flat_map(|r| (0..4).map(move |c| r * 10 + c))
            .collect();
        let out = extract(&buf, &[3, 4], &[1, 1], &[2, 2], &[1, 2]).unwrap();
        assert_eq!(out, vec![11, 13, 21, 23]);
    }

    #[test]
    fn test_extract_row_major_order() {
        let buf: Vec<i32> = (0..24).collect();
        let out = extract(&buf, &[2, 3, 4], &[0, 0, 0], &[2, 2, 2], &[1, 2, 3]).unwrap();
        // Axis 0 varies slowest, axis 2 fastest
        assert_eq!(out, vec![0, 3, 8, 11, 12, 15, 20, 23]);
    }

    #[test]
    fn test_extract_out_of_bounds() {
        let buf = vec![0.0; 8];
        let result = extract(&buf, &[8], &[4], &[3], &[2]);
        assert!(matches!(result, Err(SwathError::Range { .. })));
    }

    #[test]
    fn test_extract_zero_stride_rejected() {
        let buf = vec![0.0; 8];
        let result = extract(&buf, &[8], &[0], &[3], &[0]);
        assert!(matches!(result, Err(SwathError::Range { .. })));
    }

    #[test]
    fn test_extract_rank_mismatch_rejected() {
        let buf = vec![0.0; 8];
        let result = extract(&buf, &[8], &[0, 0], &[3], &[1]);
        assert!(matches!(result, Err(SwathError::Range { .. })));
    }

    #[test]
    fn test_extract_empty_count() {
        let buf = vec![1.0, 2.0];
        let out = extract(&buf, &[2], &[0], &[0], &[1]).unwrap();
        assert!(out.is_empty());
    }
}
