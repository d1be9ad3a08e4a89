use super::*;

// -----------------------------------------------------------------------
// normalize_text
// -----------------------------------------------------------------------

#[test]
fn replaces_unicode_spaces() {
    assert_eq!(
        normalize_text("Acme\u{00A0}Fence\u{2009}Ltd\u{3000}Larry"),
        "Acme Fence Ltd Larry"
    );
}

#[test]
fn drops_zero_width_characters() {
    assert_eq!(normalize_text("Ac\u{200B}me\u{FEFF} Ltd"), "Acme Ltd");
}

#[test]
fn collapses_and_trims_whitespace() {
    assert_eq!(normalize_text("  a \n\t b   c  "), "a b c");
}

#[test]
fn strips_map_links() {
    assert_eq!(
        normalize_text("4915 50 Street View Map Get Directions"),
        "4915 50 Street"
    );
}

#[test]
fn strips_new_window_captions() {
    assert_eq!(
        normalize_text("Register here (opens in new window) today"),
        "Register here today"
    );
    assert_eq!(
        normalize_text("Website opens in a new tab"),
        "Website"
    );
}

#[test]
fn strips_script_fragments() {
    assert_eq!(
        normalize_text("Acme Ltd var addy12 = 'info' + '@'; Larry"),
        "Acme Ltd Larry"
    );
    assert_eq!(
        normalize_text("Acme document.write(addy12); Ltd"),
        "Acme Ltd"
    );
}

#[test]
fn strips_contact_link_remnants() {
    assert_eq!(
        normalize_text("Acme Ltd Email: info@acme.ca mailto:info@acme.ca"),
        "Acme Ltd"
    );
    assert_eq!(normalize_text("Call tel:7803521234 now"), "Call now");
}

#[test]
fn keeps_phone_clause() {
    assert_eq!(
        normalize_text("Acme Ltd Phone: 780.352.1234"),
        "Acme Ltd Phone: 780.352.1234"
    );
}

#[test]
fn empty_input_stays_empty() {
    assert_eq!(normalize_text(" \u{00A0} "), "");
}

// -----------------------------------------------------------------------
// reinsert_spaces
// -----------------------------------------------------------------------

#[test]
fn splits_lowercase_then_capitalized_word() {
    assert_eq!(reinsert_spaces("Amen Thrift ShopTammy Becsko"), "Amen Thrift Shop Tammy Becsko");
}

#[test]
fn splits_after_closing_punctuation() {
    assert_eq!(reinsert_spaces("Welding Ltd.Larry"), "Welding Ltd. Larry");
    assert_eq!(reinsert_spaces("Acme (Wetaskiwin)Bob"), "Acme (Wetaskiwin) Bob");
}

#[test]
fn splits_before_capital_run() {
    assert_eq!(reinsert_spaces("Best BakeryABC Foods"), "Best Bakery ABC Foods");
}

#[test]
fn splits_glued_uppercase_suffix() {
    assert_eq!(reinsert_spaces("ACME WELDING LTDLarry"), "ACME WELDING LTD Larry");
    assert_eq!(reinsert_spaces("WIDGETS INC.John"), "WIDGETS INC. John");
}

#[test]
fn keeps_mc_and_mac_surnames() {
    assert_eq!(reinsert_spaces("Joe McDonald"), "Joe McDonald");
    assert_eq!(reinsert_spaces("Ann MacKenzie"), "Ann MacKenzie");
    assert_eq!(reinsert_spaces("ShopTammyMcDonald"), "Shop Tammy McDonald");
}

#[test]
fn leaves_ordinary_text_alone() {
    assert_eq!(reinsert_spaces("AEM Fabrication Ltd"), "AEM Fabrication Ltd");
    assert_eq!(
        reinsert_spaces("Acme Fence & Welding Ltd. Larry"),
        "Acme Fence & Welding Ltd. Larry"
    );
}
