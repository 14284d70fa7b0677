//! Housing-unit ("WE") counts.
//!
//! The cell holds one count per object, comma separated. A `.` is read as a
//! separator too, so `"1.234"` counts as the list `1, 234`.

fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn normalized(value: &str) -> String {
    value.trim().replace('.', ",")
}

/// Per-object unit counts in order. Non-numeric tokens are dropped.
pub fn parse_unit_list(value: &str) -> Vec<u64> {
    normalized(value)
        .split(',')
        .map(str::trim)
        .filter(|token| is_digits(token))
        .filter_map(|token| token.parse().ok())
        .collect()
}

/// Total for the contract form.
///
/// A list sums its numeric tokens and yields `None` unless the sum is
/// positive; a single value must be all digits.
pub fn parse_unit_total(value: &str) -> Option<u64> {
    let value = normalized(value);

    if value.contains(',') {
        let total = parse_unit_list(&value)
            .into_iter()
            .fold(0u64, u64::saturating_add);
        return (total > 0).then_some(total);
    }

    if is_digits(&value) {
        return value.parse().ok();
    }

    None
}
