/// Linear gap filling over one station's series.
///
/// Positions are evenly spaced: a gap between known values `a` at `i` and
/// `b` at `j` is filled with `a + (b - a) * (k - i) / (j - i)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Fill interior gaps and carry the last known value over trailing gaps
    Forward,
    /// Fill interior gaps and carry the first known value over leading gaps
    Backward,
}

/// Interpolate in place. Returns the number of values filled.
pub fn interpolate(series: &mut [Option<f64>], direction: Direction) -> usize {
    let known: Vec<usize> = series
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|_| i))
        .collect();

    let (Some(&first), Some(&last)) = (known.first(), known.last()) else {
        return 0;
    };

    let mut filled = 0;

    for pair in known.windows(2) {
        let (i, j) = (pair[0], pair[1]);
        if j - i < 2 {
            continue;
        }
        let (a, b) = match (series[i], series[j]) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        let span = (j - i) as f64;
        for k in (i + 1)..j {
            series[k] = Some(a + (b - a) * (k - i) as f64 / span);
            filled += 1;
        }
    }

    match direction {
        Direction::Forward => {
            let value = series[last];
            for slot in series.iter_mut().skip(last + 1) {
                *slot = value;
                filled += 1;
            }
        }
        Direction::Backward => {
            let value = series[first];
            for slot in series.iter_mut().take(first) {
                *slot = value;
                filled += 1;
            }
        }
    }

    filled
}

/// Forward pass, then backward pass for any leading gap
pub fn interpolate_both_ways(series: &mut [Option<f64>]) -> usize {
    interpolate(series, Direction::Forward) + interpolate(series, Direction::Backward)
}
