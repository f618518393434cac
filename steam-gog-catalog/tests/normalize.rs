use proptest::prelude::*;
use steam_gog_catalog::normalize;

#[test]
fn lowercases_and_collapses_whitespace() {
    assert_eq!(normalize("  Half-Life   2  "), "half life 2");
    assert_eq!(normalize("HALF-LIFE 2"), normalize("Half-Life 2"));
}

#[test]
fn trademark_variants_share_a_key() {
    assert_eq!(
        normalize("The Witcher 3: Wild Hunt™"),
        normalize("The Witcher 3: Wild Hunt")
    );
    assert_eq!(normalize("Tom Clancy’s Splinter Cell®"), "tom clancys splinter cell");
}

#[test]
fn ampersand_is_spelled_out() {
    assert_eq!(normalize("Sam & Max Hit the Road"), "sam and max hit the road");
    assert_eq!(normalize("Sam&Max"), "sam and max");
    assert_eq!(normalize("Sam and Max"), normalize("Sam & Max"));
}

#[test]
fn edition_tags_are_dropped() {
    assert_eq!(
        normalize("The Witcher 3: Wild Hunt - Game of the Year Edition"),
        "the witcher 3 wild hunt"
    );
    assert_eq!(normalize("Fallout: New Vegas Ultimate Edition"), "fallout new vegas");
}

#[test]
fn non_ascii_letters_survive() {
    assert_eq!(normalize("Ōkami HD"), "ōkami hd");
    assert_eq!(normalize("Wiedźmin"), "wiedźmin");
}

#[test]
fn empty_and_symbol_only_titles() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("™ - :"), "");
}

proptest! {
    #[test]
    fn normalize_is_idempotent(title in "\\PC{0,48}") {
        let once = normalize(&title);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_for_title_like_input(
        title in "[A-Za-z0-9 :&'’™®.-]{0,40}( (GOTY|Deluxe Edition|Game of the Year Edition))*"
    ) {
        let once = normalize(&title);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn output_has_no_edge_or_double_spaces(title in "\\PC{0,48}") {
        let key = normalize(&title);
        prop_assert_eq!(key.trim(), key.as_str());
        prop_assert!(!key.contains("  "));
    }
}
