//! Parsing of German "street number" address lists.
//!
//! Object columns often hold several addresses in one cell, e.g.
//! `"Lindenallee 4, 6, Birkenweg 2a"`. None of these helpers fail: a fragment
//! that does not look like an address is dropped or kept verbatim.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `<street> <number>` with a house number like `12`, `12a`, `12/1`, `12a/3`.
    static ref STREET_NUMBER_PATTERN: Regex =
        Regex::new(r"^(.+?)\s+(\d+[a-zA-Z]?(?:/\d+)?)$").unwrap();

    /// Loose form used by normalisation: anything starting with a digit is a number.
    static ref STREET_TAIL_PATTERN: Regex = Regex::new(r"^(.+?)\s+(\d.*)$").unwrap();
}

/// One street/house-number pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressEntry {
    pub street: String,
    pub number: String,
}

impl AddressEntry {
    /// Parse a single fragment such as `"Hauptstraße 12a"`.
    pub fn parse(fragment: &str) -> Option<Self> {
        let caps = STREET_NUMBER_PATTERN.captures(fragment.trim())?;
        Some(Self {
            street: caps[1].to_string(),
            number: caps[2].to_string(),
        })
    }
}

/// Comma-separated list of object addresses, trimmed, empties dropped.
pub fn split_multiple_objects(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Street of the first parsable fragment plus the numbers of every fragment
/// on that same street, joined by `,`.
///
/// Fragments on a different street are ignored.
pub fn split_street_and_number(raw: &str) -> Option<(String, String)> {
    let mut entries = split_multiple_objects(raw)
        .into_iter()
        .filter_map(|part| AddressEntry::parse(&part));

    let first = entries.next()?;
    let mut numbers = vec![first.number];
    numbers.extend(
        entries
            .filter(|entry| entry.street == first.street)
            .map(|entry| entry.number),
    );

    Some((first.street, numbers.join(",")))
}

/// The pair with the smallest house-number string; ties go to the smallest
/// street name.
pub fn split_street_and_number_lexicographic(raw: &str) -> Option<(String, String)> {
    split_multiple_objects(raw)
        .iter()
        .filter_map(|part| AddressEntry::parse(part))
        .min_by(|a, b| a.number.cmp(&b.number).then_with(|| a.street.cmp(&b.street)))
        .map(|entry| (entry.street, entry.number))
}

/// Spell out the street for number-only fragments:
/// `"Maple St 5, 7"` becomes `"Maple St 5, Maple St 7"`.
///
/// A fragment with no street to borrow is kept as it is.
pub fn normalize_street_list(raw: &str) -> String {
    let mut current_street: Option<String> = None;
    let mut result = Vec::new();

    for part in split_multiple_objects(raw) {
        if let Some(caps) = STREET_TAIL_PATTERN.captures(&part) {
            let street = caps[1].to_string();
            result.push(format!("{} {}", street, &caps[2]));
            current_street = Some(street);
        } else if let Some(street) = &current_street {
            result.push(format!("{} {}", street, part));
        } else {
            result.push(part);
        }
    }

    result.join(", ")
}

/// Group fragments by street: `"Elm St 4, Elm St 6"` becomes `"Elm St 4,6"`.
///
/// Streets keep first-seen order and repeated numbers are listed once.
pub fn shorten_streets(raw: &str) -> String {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();

    for part in split_multiple_objects(raw) {
        let (name, number) = match STREET_TAIL_PATTERN.captures(&part) {
            Some(caps) => (caps[1].to_string(), Some(caps[2].to_string())),
            None => (part, None),
        };

        let idx = match groups.iter().position(|(street, _)| *street == name) {
            Some(idx) => idx,
            None => {
                groups.push((name, Vec::new()));
                groups.len() - 1
            }
        };

        if let Some(number) = number {
            let numbers = &mut groups[idx].1;
            if !numbers.contains(&number) {
                numbers.push(number);
            }
        }
    }

    groups
        .into_iter()
        .map(|(street, numbers)| {
            if numbers.is_empty() {
                street
            } else {
                format!("{} {}", street, numbers.join(","))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pair(street: &str, number: &str) -> Option<(String, String)> {
        Some((street.to_string(), number.to_string()))
    }

    #[test]
    fn test_split_multiple_objects_trims_and_drops_empties() {
        assert_eq!(
            split_multiple_objects(" Elm St 4 ,, Oak Rd 2, "),
            vec!["Elm St 4".to_string(), "Oak Rd 2".to_string()]
        );
        assert!(split_multiple_objects("").is_empty());
    }

    #[test]
    fn test_canonical_street_drops_other_streets() {
        assert_eq!(
            split_street_and_number("Elm St 4, Elm St 6, Oak Rd 2"),
            pair("Elm St", "4,6")
        );
    }

    #[test]
    fn test_house_number_suffixes() {
        assert_eq!(split_street_and_number("Hauptstraße 12a"), pair("Hauptstraße", "12a"));
        assert_eq!(split_street_and_number("Am Ring 7/1"), pair("Am Ring", "7/1"));
        assert_eq!(split_street_and_number("Am Ring 7b/2"), pair("Am Ring", "7b/2"));
    }

    #[test]
    fn test_unparsable_fragments_are_skipped() {
        assert_eq!(split_street_and_number("Postfach, Elm St 4"), pair("Elm St", "4"));
        assert_eq!(split_street_and_number("Postfach"), None);
        assert_eq!(split_street_and_number(""), None);
    }

    #[test]
    fn test_lexicographic_prefers_smallest_number() {
        assert_eq!(
            split_street_and_number_lexicographic("Elm St 4, Oak Rd 2"),
            pair("Oak Rd", "2")
        );
    }

    #[test]
    fn test_lexicographic_tie_goes_to_smallest_street() {
        assert_eq!(
            split_street_and_number_lexicographic("Zeppelinweg 1, Ahornweg 1, Birkenweg 3"),
            pair("Ahornweg", "1")
        );
    }

    #[test]
    fn test_lexicographic_compares_number_strings() {
        assert_eq!(
            split_street_and_number_lexicographic("Elm St 2, Elm St 10"),
            pair("Elm St", "10")
        );
        assert_eq!(split_street_and_number_lexicographic("nothing here"), None);
    }

    #[test]
    fn test_normalize_fills_in_shared_street() {
        assert_eq!(normalize_street_list("Maple St 5, 7"), "Maple St 5, Maple St 7");
        assert_eq!(
            normalize_street_list("Maple St 5, 7, Oak Rd 1, 3a"),
            "Maple St 5, Maple St 7, Oak Rd 1, Oak Rd 3a"
        );
    }

    #[test]
    fn test_normalize_keeps_fragment_without_street() {
        assert_eq!(normalize_street_list("7, Maple St 5"), "7, Maple St 5");
        assert_eq!(normalize_street_list(""), "");
    }

    #[test]
    fn test_shorten_groups_by_street() {
        assert_eq!(shorten_streets("Elm St 4, Elm St 6"), "Elm St 4,6");
        assert_eq!(
            shorten_streets("Elm St 4, Oak Rd 2, Elm St 6"),
            "Elm St 4,6, Oak Rd 2"
        );
    }

    #[test]
    fn test_shorten_deduplicates_numbers() {
        assert_eq!(shorten_streets("Elm St 4, Elm St 4, Elm St 6"), "Elm St 4,6");
    }

    #[test]
    fn test_shorten_keeps_unmatched_fragments() {
        assert_eq!(shorten_streets("Marktplatz, Elm St 4"), "Marktplatz, Elm St 4");
    }
}
