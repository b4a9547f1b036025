//! One-dimensional constrained space distribution.
//!
//! A [`Sizer`] tracks one element along one axis. [`calc`] distributes a
//! length across a run of sizers honouring their min/max bounds and stretch
//! factors, and [`adjust`] applies an interactive handle drag by rewriting
//! size hints for the next solve.

use astrelis_core::profiling::profile_function;

/// Residual below which distribution stops.
pub const NEAR_ZERO: f32 = 0.01;

/// Sizing record for one element along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Sizer {
    /// Preferred size, clamped into `[min_size, max_size]` as the starting point.
    pub size_hint: f32,
    pub min_size: f32,
    /// `f32::INFINITY` when unbounded.
    pub max_size: f32,
    /// Relative share of surplus/deficit. Zero opts out of the stretch pass.
    pub stretch: f32,
    /// Output of the last [`calc`].
    pub size: f32,
    /// Set during [`calc`] once the sizer is pinned at a bound.
    pub settled: bool,
}

impl Default for Sizer {
    fn default() -> Self {
        Self {
            size_hint: 0.0,
            min_size: 0.0,
            max_size: f32::INFINITY,
            stretch: 1.0,
            size: 0.0,
            settled: false,
        }
    }
}

impl Sizer {
    /// A sizer whose hint and current size are both `hint`.
    pub fn new(hint: f32) -> Self {
        Self {
            size_hint: hint,
            size: hint,
            ..Self::default()
        }
    }

    /// Set the size bounds.
    pub fn with_limits(mut self, min_size: f32, max_size: f32) -> Self {
        self.min_size = min_size;
        self.max_size = max_size.max(min_size);
        self
    }

    /// Set the stretch factor.
    pub fn with_stretch(mut self, stretch: f32) -> Self {
        self.stretch = stretch.max(0.0);
        self
    }

    /// Pin the hint to the current size so the next solve starts from here.
    pub fn hold(&mut self) {
        self.size_hint = self.size;
    }
}

/// Distribute `space` across `sizers`.
///
/// Every output size lies in `[min_size, max_size]` and the outputs sum to
/// `space` clamped into `[total_min, total_max]`. Returns the leftover:
/// negative when the run could not shrink far enough, positive when it could
/// not grow far enough, zero otherwise.
pub fn calc(sizers: &mut [Sizer], space: f32) -> f32 {
    profile_function!();

    if sizers.is_empty() {
        return space;
    }

    let mut total_min = 0.0;
    let mut total_max = 0.0;
    let mut total_size = 0.0;
    let mut total_stretch = 0.0;
    let mut stretch_count = 0usize;

    for sizer in sizers.iter_mut() {
        sizer.settled = false;
        sizer.size = sizer.size_hint.min(sizer.max_size).max(sizer.min_size);
        total_size += sizer.size;
        total_min += sizer.min_size;
        total_max += sizer.max_size;
        if sizer.stretch > 0.0 {
            total_stretch += sizer.stretch;
            stretch_count += 1;
        }
    }

    if space == total_size {
        return 0.0;
    }

    if space <= total_min {
        for sizer in sizers.iter_mut() {
            sizer.size = sizer.min_size;
        }
        return space - total_min;
    }

    if space >= total_max {
        for sizer in sizers.iter_mut() {
            sizer.size = sizer.max_size;
        }
        return space - total_max;
    }

    let mut unsettled = sizers.len();

    if space < total_size {
        let mut free = total_size - space;

        while stretch_count > 0 && free > NEAR_ZERO {
            let dist_space = free;
            let dist_stretch = total_stretch;
            for sizer in sizers.iter_mut() {
                if sizer.settled || sizer.stretch == 0.0 {
                    continue;
                }
                let amount = sizer.stretch * dist_space / dist_stretch;
                if sizer.size - amount <= sizer.min_size {
                    free -= sizer.size - sizer.min_size;
                    total_stretch -= sizer.stretch;
                    sizer.size = sizer.min_size;
                    sizer.settled = true;
                    unsettled -= 1;
                    stretch_count -= 1;
                } else {
                    free -= amount;
                    sizer.size -= amount;
                }
            }
        }

        while unsettled > 0 && free > NEAR_ZERO {
            let amount = free / unsettled as f32;
            for sizer in sizers.iter_mut() {
                if sizer.settled {
                    continue;
                }
                if sizer.size - amount <= sizer.min_size {
                    free -= sizer.size - sizer.min_size;
                    sizer.size = sizer.min_size;
                    sizer.settled = true;
                    unsettled -= 1;
                } else {
                    free -= amount;
                    sizer.size -= amount;
                }
            }
        }
    } else {
        let mut free = space - total_size;

        while stretch_count > 0 && free > NEAR_ZERO {
            let dist_space = free;
            let dist_stretch = total_stretch;
            for sizer in sizers.iter_mut() {
                if sizer.settled || sizer.stretch == 0.0 {
                    continue;
                }
                let amount = sizer.stretch * dist_space / dist_stretch;
                if sizer.size + amount >= sizer.max_size {
                    free -= sizer.max_size - sizer.size;
                    total_stretch -= sizer.stretch;
                    sizer.size = sizer.max_size;
                    sizer.settled = true;
                    unsettled -= 1;
                    stretch_count -= 1;
                } else {
                    free -= amount;
                    sizer.size += amount;
                }
            }
        }

        while unsettled > 0 && free > NEAR_ZERO {
            let amount = free / unsettled as f32;
            for sizer in sizers.iter_mut() {
                if sizer.settled {
                    continue;
                }
                if sizer.size + amount >= sizer.max_size {
                    free -= sizer.max_size - sizer.size;
                    sizer.size = sizer.max_size;
                    sizer.settled = true;
                    unsettled -= 1;
                } else {
                    free -= amount;
                    sizer.size += amount;
                }
            }
        }
    }

    0.0
}

/// Apply a handle drag of `delta` to the handle after sizer `index`.
///
/// Positive deltas grow sizers `0..=index` (nearest first) and shrink
/// `index + 1..` by the same amount; negative deltas do the reverse. The
/// applied delta is limited by how far each side can move before hitting its
/// bounds. Only `size_hint` is rewritten, so the change takes effect on the
/// next [`calc`]; the hints of all sizers are first pinned to their current
/// sizes, which keeps the hinted total equal to the laid-out total.
///
/// Returns the signed delta actually applied.
pub fn adjust(sizers: &mut [Sizer], index: usize, delta: f32) -> f32 {
    if sizers.is_empty() || index >= sizers.len() || delta == 0.0 {
        return 0.0;
    }
    for sizer in sizers.iter_mut() {
        if sizer.size > 0.0 {
            sizer.hold();
        }
    }
    if delta > 0.0 {
        grow(sizers, index, delta)
    } else {
        -shrink(sizers, index, -delta)
    }
}

fn grow(sizers: &mut [Sizer], index: usize, delta: f32) -> f32 {
    let (leading, trailing) = sizers.split_at_mut(index + 1);
    let grow_limit: f32 = leading.iter().map(|s| s.max_size - s.size).sum();
    let shrink_limit: f32 = trailing.iter().map(|s| s.size - s.min_size).sum();
    let delta = delta.min(grow_limit).min(shrink_limit);

    let mut remaining = delta;
    for sizer in leading.iter_mut().rev() {
        if remaining <= 0.0 {
            break;
        }
        let step = (sizer.max_size - sizer.size).min(remaining);
        sizer.size_hint = sizer.size + step;
        remaining -= step;
    }

    let mut remaining = delta;
    for sizer in trailing.iter_mut() {
        if remaining <= 0.0 {
            break;
        }
        let step = (sizer.size - sizer.min_size).min(remaining);
        sizer.size_hint = sizer.size - step;
        remaining -= step;
    }

    delta
}

fn shrink(sizers: &mut [Sizer], index: usize, delta: f32) -> f32 {
    let (leading, trailing) = sizers.split_at_mut(index + 1);
    let shrink_limit: f32 = leading.iter().map(|s| s.size - s.min_size).sum();
    let grow_limit: f32 = trailing.iter().map(|s| s.max_size - s.size).sum();
    let delta = delta.min(grow_limit).min(shrink_limit);

    let mut remaining = delta;
    for sizer in leading.iter_mut().rev() {
        if remaining <= 0.0 {
            break;
        }
        let step = (sizer.size - sizer.min_size).min(remaining);
        sizer.size_hint = sizer.size - step;
        remaining -= step;
    }

    let mut remaining = delta;
    for sizer in trailing.iter_mut() {
        if remaining <= 0.0 {
            break;
        }
        let step = (sizer.max_size - sizer.size).min(remaining);
        sizer.size_hint = sizer.size + step;
        remaining -= step;
    }

    delta
}

/// Scale `values` to fractions summing to 1.
///
/// Magnitudes are used, so negative inputs count by their absolute value. A
/// zero total yields equal shares.
pub fn normalize(values: &[f32]) -> Vec<f32> {
    if values.is_empty() {
        return Vec::new();
    }
    let sum: f32 = values.iter().map(|v| v.abs()).sum();
    if sum == 0.0 {
        let share = 1.0 / values.len() as f32;
        return vec![share; values.len()];
    }
    values.iter().map(|v| v.abs() / sum).collect()
}
