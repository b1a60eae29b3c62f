use std::collections::BTreeMap;

/// Most frequent present value. Ties go to the lexicographically smallest value.
pub fn mode<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_default() += 1;
    }

    // BTreeMap iterates in key order; keep the first key reaching the max
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value.to_string())
}

/// Replace every missing entry with `fill`. Returns the number of entries filled.
pub fn fill_missing<'a, I>(slots: I, fill: &str) -> usize
where
    I: IntoIterator<Item = &'a mut Option<String>>,
{
    let mut filled = 0;
    for slot in slots {
        if slot.is_none() {
            *slot = Some(fill.to_string());
            filled += 1;
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode() {
        let values = vec![Some("N"), Some("NE"), None, Some("NE"), Some("SW")];
        assert_eq!(mode(values), Some("NE".to_string()));
    }

    #[test]
    fn test_mode_tie_prefers_smallest() {
        let values = vec![Some("SW"), Some("ENE"), Some("SW"), Some("ENE"), Some("N")];
        assert_eq!(mode(values), Some("ENE".to_string()));
    }

    #[test]
    fn test_mode_is_order_independent() {
        let forward = vec![Some("W"), Some("E"), Some("W"), Some("E")];
        let backward: Vec<_> = forward.iter().rev().copied().collect();
        assert_eq!(mode(forward), mode(backward));
    }

    #[test]
    fn test_mode_of_nothing() {
        assert_eq!(mode(vec![None, None]), None);
        assert_eq!(mode(Vec::<Option<&str>>::new()), None);
    }

    #[test]
    fn test_fill_missing() {
        let mut a = None;
        let mut b = Some("N".to_string());
        let mut c = None;
        let filled = fill_missing(vec![&mut a, &mut b, &mut c], "NE");

        assert_eq!(filled, 2);
        assert_eq!(a.as_deref(), Some("NE"));
        assert_eq!(b.as_deref(), Some("N"));
        assert_eq!(c.as_deref(), Some("NE"));
    }
}
