//! Separable interpolation/subsampling kernel for dimension-mapped axes.
//!
//! A geolocation field stored at a coarser rate than its consuming data
//! field is expanded by piecewise-linear interpolation along each mapped
//! axis; a finer one is decimated by direct sampling. Axes are processed
//! one at a time: after axis `k` is resampled its size becomes the target
//! for the remaining steps, and each per-axis pass broadcasts independently
//! across all other axes, so the processing order does not affect the
//! numeric result.

use swath_core::{SwathError, SwathResult};

/// Maximum number of simultaneously mapped axes the kernel composes.
///
/// Higher ranks are rejected with [`SwathError::UnsupportedRank`] rather
/// than risking silently wrong output.
pub const MAX_MAPPED_RANK: usize = 3;

/// Resampling instruction for one axis of the base buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisMap {
    /// Axis index in the base shape.
    pub axis: usize,
    /// Target size of the axis after resampling.
    pub target_len: usize,
    /// Data-field index matching the first geolocation sample.
    pub offset: i64,
    /// Sampling-rate ratio; positive interpolates, negative subsamples.
    pub increment: i64,
}

impl AxisMap {
    /// Create an axis map.
    pub fn new(axis: usize, target_len: usize, offset: i64, increment: i64) -> Self {
        Self {
            axis,
            target_len,
            offset,
            increment,
        }
    }
}

/// One precomputed output sample of a per-axis pass.
///
/// Exact anchors copy the source value without floating arithmetic; all
/// other samples blend the two bracketing source values.
#[derive(Debug, Clone, PartialEq)]
enum Tap {
    Exact(usize),
    Blend {
        i1: usize,
        i2: usize,
        w1: f64,
        w2: f64,
    },
}

/// Expand a buffer along every mapped axis.
///
/// Axes not named in `axis_maps` pass through unchanged. Returns the
/// resampled buffer and its shape. All validation happens before the
/// output buffer is allocated.
pub fn expand(
    base: &[f64],
    base_shape: &[usize],
    axis_maps: &[AxisMap],
) -> SwathResult<(Vec<f64>, Vec<usize>)> {
    if axis_maps.len() > MAX_MAPPED_RANK {
        return Err(SwathError::UnsupportedRank {
            rank: axis_maps.len(),
            max: MAX_MAPPED_RANK,
        });
    }

    let expected: usize = base_shape.iter().product();
    if base.len() != expected {
        return Err(SwathError::config(format!(
            "buffer holds {} elements but shape {:?} requires {}",
            base.len(),
            base_shape,
            expected
        )));
    }

    for map in axis_maps {
        if map.axis >= base_shape.len() {
            return Err(SwathError::config(format!(
                "axis map names axis {} of a rank-{} buffer",
                map.axis,
                base_shape.len()
            )));
        }
        if map.increment == 0 {
            return Err(SwathError::config(
                "dimension map increment must be non-zero",
            ));
        }
        if base_shape[map.axis] < 2 {
            return Err(SwathError::config(format!(
                "source axis of length {} is too short to resample",
                base_shape[map.axis]
            )));
        }
    }

    let mut data = base.to_vec();
    let mut shape = base_shape.to_vec();
    for map in axis_maps {
        let (next, next_shape) = expand_axis(&data, &shape, map)?;
        data = next;
        shape = next_shape;
    }
    Ok((data, shape))
}

/// Resample one axis, broadcasting over all others.
fn expand_axis(
    data: &[f64],
    shape: &[usize],
    map: &AxisMap,
) -> SwathResult<(Vec<f64>, Vec<usize>)> {
    let n = shape[map.axis];
    let m = map.target_len;
    let plan = axis_plan(n, m, map.offset, map.increment)?;

    let outer: usize = shape[..map.axis].iter().product();
    let inner: usize = shape[map.axis + 1..].iter().product();

    let mut out = vec![0.0; outer * m * inner];
    for block in 0..outer {
        let src = &data[block * n * inner..(block + 1) * n * inner];
        let dst = &mut out[block * m * inner..(block + 1) * m * inner];
        for (j, tap) in plan.iter().enumerate() {
            match *tap {
                Tap::Exact(i) => {
                    dst[j * inner..(j + 1) * inner]
                        .copy_from_slice(&src[i * inner..(i + 1) * inner]);
                }
                Tap::Blend { i1, i2, w1, w2 } => {
                    for q in 0..inner {
                        dst[j * inner + q] = w1 * src[i1 * inner + q] + w2 * src[i2 * inner + q];
                    }
                }
            }
        }
    }

    let mut new_shape = shape.to_vec();
    new_shape[map.axis] = m;
    Ok((out, new_shape))
}

/// Precompute the source taps for every target index along one axis.
fn axis_plan(n: usize, m: usize, offset: i64, inc: i64) -> SwathResult<Vec<Tap>> {
    if inc == 0 {
        return Err(SwathError::config(
            "dimension map increment must be non-zero",
        ));
    }
    if n < 2 {
        return Err(SwathError::config(format!(
            "source axis of length {} is too short to resample",
            n
        )));
    }

    let n = n as i64;
    let mut plan = Vec::with_capacity(m);

    if inc > 0 {
        // Coarser source: interpolate between the bracketing anchors.
        for j in 0..m as i64 {
            let i = (j - offset).div_euclid(inc);
            if i * inc + offset == j {
                plan.push(Tap::Exact(i.clamp(0, n - 1) as usize));
                continue;
            }
            let (i1, i2) = if i < 0 {
                (0, 1)
            } else if i + 1 >= n {
                (n - 2, n - 1)
            } else {
                (i, i + 1)
            };
            if i1 < 0 || i2 >= n {
                return Err(SwathError::config(format!(
                    "computed source bracket [{}, {}] outside axis of length {}",
                    i1, i2, n
                )));
            }
            let j1 = i1 * inc + offset;
            let j2 = i2 * inc + offset;
            let denom = (j2 - j1) as f64;
            plan.push(Tap::Blend {
                i1: i1 as usize,
                i2: i2 as usize,
                w1: (j2 - j) as f64 / denom,
                w2: (j - j1) as f64 / denom,
            });
        }
    } else {
        // Finer source: decimate by direct sampling. Target indices land
        // exactly on source positions by construction, so no blending.
        let magnitude = -inc;
        for j in 0..m as i64 {
            let i = if offset >= 0 {
                (j - offset) * magnitude
            } else {
                j * magnitude - offset
            };
            plan.push(Tap::Exact(i.clamp(0, n - 1) as usize));
        }
    }

    Ok(plan)
}

/// Evaluate a single point of the expanded field without materializing it.
///
/// The value is an iterative weighted sum over the `2^k` corners of the
/// interpolation cell, where `k` is the number of blended axes at this
/// point. Equivalent to indexing the output of [`expand`] at `index`.
pub fn expanded_value_at(
    base: &[f64],
    base_shape: &[usize],
    axis_maps: &[AxisMap],
    index: &[usize],
) -> SwathResult<f64> {
    if axis_maps.len() > MAX_MAPPED_RANK {
        return Err(SwathError::UnsupportedRank {
            rank: axis_maps.len(),
            max: MAX_MAPPED_RANK,
        });
    }
    let rank = base_shape.len();
    if index.len() != rank {
        return Err(SwathError::config(format!(
            "index of rank {} against buffer of rank {}",
            index.len(),
            rank
        )));
    }

    // One tap per axis; unmapped axes pass the index through.
    let mut taps: Vec<Tap> = index.iter().map(|&i| Tap::Exact(i)).collect();
    for map in axis_maps {
        let plan = axis_plan(base_shape[map.axis], map.target_len, map.offset, map.increment)?;
        let j = index[map.axis];
        let tap = plan.get(j).ok_or_else(|| {
            SwathError::config(format!(
                "index {} outside target axis of length {}",
                j, map.target_len
            ))
        })?;
        taps[map.axis] = tap.clone();
    }

    let blend_axes: Vec<usize> = (0..rank)
        .filter(|&a| matches!(taps[a], Tap::Blend { .. }))
        .collect();

    let mut pos: Vec<usize> = taps
        .iter()
        .map(|tap| match *tap {
            Tap::Exact(i) => i,
            Tap::Blend { i1, .. } => i1,
        })
        .collect();

    let mut acc = 0.0;
    for corner in 0u32..(1 << blend_axes.len()) {
        let mut weight = 1.0;
        for (bit, &axis) in blend_axes.iter().enumerate() {
            if let Tap::Blend { i1, i2, w1, w2 } = taps[axis] {
                if corner & (1 << bit) == 0 {
                    pos[axis] = i1;
                    weight *= w1;
                } else {
                    pos[axis] = i2;
                    weight *= w2;
                }
            }
        }
        let mut linear = 0;
        for (a, &p) in pos.iter().enumerate() {
            if p >= base_shape[a] {
                return Err(SwathError::config(format!(
                    "corner index {} outside axis {} of length {}",
                    p, a, base_shape[a]
                )));
            }
            linear = linear * base_shape[a] + p;
        }
        // Exact corners carry weight 1.0; copy without arithmetic.
        if blend_axes.is_empty() {
            return Ok(base[linear]);
        }
        acc += weight * base[linear];
    }
    Ok(acc)
}
