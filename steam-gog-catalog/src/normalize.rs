//! Title normalization shared by the catalog indexer and the matcher.
//!
//! Steam and GOG curate their catalogs independently, so the same game shows
//! up with different trademarks, punctuation and edition tags:
//! ```text
//! The Witcher 3: Wild Hunt™            (Steam)
//! The Witcher 3: Wild Hunt - Game of the Year Edition   (GOG)
//! ```
//! [`normalize`] maps both to the comparison key `the witcher 3 wild hunt`.
//!
//! Rules, applied in one pass over the characters:
//! - `™`, `®` and `©` are dropped.
//! - Apostrophes are dropped without leaving a gap (`Baldur's` → `baldurs`).
//! - `&` becomes the word `and`.
//! - Characters are lowercased with the Unicode default mapping; alphanumeric
//!   characters are kept and everything else becomes a space.
//!
//! Whitespace runs then collapse to one space, the edges are trimmed, and
//! trailing [`EDITION_SUFFIXES`] are removed for as long as one matches on a
//! word boundary.

/// Edition tags stripped from the end of a normalized title.
///
/// Checked in order, so a longer tag must come before any tag it ends with.
pub const EDITION_SUFFIXES: &[&str] = &[
    "game of the year edition",
    "game of the year",
    "digital deluxe edition",
    "deluxe edition",
    "goty edition",
    "goty",
    "definitive edition",
    "complete edition",
    "enhanced edition",
    "special edition",
    "standard edition",
    "gold edition",
    "ultimate edition",
    "anniversary edition",
];

const DROPPED: &[char] = &['™', '®', '©', '\'', '\u{2019}', '\u{2018}', '`'];

/// Normalize a title into its canonical comparison key.
///
/// Pure and locale-independent; `normalize(normalize(t)) == normalize(t)`.
///
/// # Examples
///
/// ```
/// use steam_gog_catalog::normalize;
///
/// assert_eq!(normalize("The Witcher 3: Wild Hunt™"), "the witcher 3 wild hunt");
/// assert_eq!(normalize("HALF-LIFE 2"), "half life 2");
/// assert_eq!(normalize("Baldur's Gate: Enhanced Edition"), "baldurs gate");
/// assert_eq!(normalize("Tom & Jerry"), "tom and jerry");
/// ```
pub fn normalize(title: &str) -> String {
    let mut mapped = String::with_capacity(title.len());
    for ch in title.chars() {
        if DROPPED.contains(&ch) {
            continue;
        }
        if ch == '&' {
            mapped.push_str(" and ");
            continue;
        }
        for lower in ch.to_lowercase() {
            if lower.is_alphanumeric() {
                mapped.push(lower);
            } else {
                mapped.push(' ');
            }
        }
    }

    let mut key = mapped.split_whitespace().collect::<Vec<_>>().join(" ");
    while let Some(stripped) = strip_edition_suffix(&key) {
        key = stripped;
    }
    key
}

/// Remove one trailing edition tag, if the title has more than just the tag.
fn strip_edition_suffix(key: &str) -> Option<String> {
    EDITION_SUFFIXES.iter().find_map(|suffix| {
        let head = key.strip_suffix(suffix)?.strip_suffix(' ')?;
        Some(head.trim_end().to_string())
    })
}
