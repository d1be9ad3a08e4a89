use super::*;

const SOURCE: &str = "https://www.example.ca/business-directory";

fn parser() -> BusinessParser {
    BusinessParser::new(&Locale {
        city: "Wetaskiwin".to_owned(),
        province: "AB".to_owned(),
        fallback_location: None,
    })
    .expect("valid locale")
}

// -----------------------------------------------------------------------
// Phone
// -----------------------------------------------------------------------

#[test]
fn phone_separators_normalize_to_dashes() {
    for raw in ["780.352.1234", "780 352 1234", "780-352-1234", "7803521234"] {
        let (phone, _) = extract_phone(&format!("Acme Ltd Phone: {raw}"));
        assert_eq!(phone.as_deref(), Some("780-352-1234"), "input {raw}");
    }
}

#[test]
fn phone_clause_is_removed() {
    let (_, rest) = extract_phone("Acme Ltd Phone: 780-352-1234 4915 50 Street");
    assert_eq!(collapse_whitespace(&rest), "Acme Ltd 4915 50 Street");
}

#[test]
fn missing_phone_leaves_text_untouched() {
    let (phone, rest) = extract_phone("Acme Ltd 4915 50 Street");
    assert!(phone.is_none());
    assert_eq!(rest, "Acme Ltd 4915 50 Street");
}

// -----------------------------------------------------------------------
// Name / contact split
// -----------------------------------------------------------------------

#[test]
fn suffix_then_single_contact() {
    assert_eq!(
        split_name_contact("Acme Fence & Welding Ltd. Larry"),
        ("Acme Fence & Welding Ltd.".to_owned(), "Larry".to_owned())
    );
}

#[test]
fn suffix_without_contact() {
    assert_eq!(
        split_name_contact("AEM Fabrication Ltd"),
        ("AEM Fabrication Ltd".to_owned(), String::new())
    );
}

#[test]
fn glued_suffix_and_contact_after_space_reinsertion() {
    let text = reinsert_spaces("Amen Thrift ShopTammy Becsko");
    assert_eq!(
        split_name_contact(&text),
        ("Amen Thrift Shop".to_owned(), "Tammy Becsko".to_owned())
    );
}

#[test]
fn suffix_with_mc_surname_or_conjunction() {
    assert_eq!(
        split_name_contact("Prairie Plumbing Inc. Sue McLean"),
        ("Prairie Plumbing Inc.".to_owned(), "Sue McLean".to_owned())
    );
    assert_eq!(
        split_name_contact("Prairie Plumbing Inc. Bob and Sue"),
        ("Prairie Plumbing Inc.".to_owned(), "Bob and Sue".to_owned())
    );
}

#[test]
fn suffix_list_is_case_insensitive() {
    assert_eq!(
        split_name_contact("ACME WELDING LTD Larry"),
        ("ACME WELDING LTD".to_owned(), "Larry".to_owned())
    );
}

#[test]
fn trailing_tokens_without_suffix() {
    assert_eq!(
        split_name_contact("Wetaskiwin Reynolds Museum Jane Doe"),
        ("Wetaskiwin Reynolds Museum".to_owned(), "Jane Doe".to_owned())
    );
}

#[test]
fn trailing_tokens_joined_by_conjunction() {
    assert_eq!(
        split_name_contact("Peace Hills Trust Bob & Sue"),
        ("Peace Hills Trust".to_owned(), "Bob & Sue".to_owned())
    );
}

#[test]
fn no_split_when_trailing_tokens_are_not_names() {
    assert_eq!(
        split_name_contact("The 4 seasons"),
        ("The 4 seasons".to_owned(), String::new())
    );
}

#[test]
fn single_token_is_all_name() {
    assert_eq!(
        split_name_contact("Zellers"),
        ("Zellers".to_owned(), String::new())
    );
}

// -----------------------------------------------------------------------
// Full row parsing
// -----------------------------------------------------------------------

#[test]
fn parses_spaced_row() {
    let record = parser()
        .parse(
            "Acme Fence & Welding Ltd. Larry 4915 50 Street Wetaskiwin AB T9A 1J6 Phone: 780.352.1234",
            SOURCE,
        )
        .expect("row should parse");
    assert_eq!(record.name, "Acme Fence & Welding Ltd.");
    assert_eq!(record.contact, "Larry");
    assert_eq!(record.phone.as_deref(), Some("780-352-1234"));
    assert_eq!(record.address, "4915 50 Street, Wetaskiwin, AB T9A 1J6");
    assert_eq!(record.source_url, SOURCE);
}

#[test]
fn parses_concatenated_row() {
    let record = parser()
        .parse(
            "Amen Thrift ShopTammy Becsko5002 51 AvenueWetaskiwin, ABT9A 0P3Phone: 780-352-5555",
            SOURCE,
        )
        .expect("row should parse");
    assert_eq!(record.name, "Amen Thrift Shop");
    assert_eq!(record.contact, "Tammy Becsko");
    assert_eq!(record.phone.as_deref(), Some("780-352-5555"));
    assert_eq!(record.address, "5002 51 Avenue, Wetaskiwin, AB T9A 0P3");
}

#[test]
fn parses_labelled_address_with_unit_and_quadrant() {
    let record = parser()
        .parse(
            "AEM Fabrication Ltd Address: #4, 3802 56 Street NW City: Wetaskiwin Province: AB Postal Code: t9a2b1",
            SOURCE,
        )
        .expect("row should parse");
    assert_eq!(record.name, "AEM Fabrication Ltd");
    assert_eq!(record.contact, "");
    assert!(record.phone.is_none());
    assert_eq!(record.address, "#4, 3802 56 Street NW, Wetaskiwin, AB T9A 2B1");
}

#[test]
fn named_street_with_abbreviation() {
    let record = parser()
        .parse("Prairie Cafe 201 Main St. Wetaskiwin AB T9A 1A1", SOURCE)
        .expect("row should parse");
    assert_eq!(record.name, "Prairie Cafe");
    assert_eq!(record.address, "201 Main St., Wetaskiwin, AB T9A 1A1");
}

#[test]
fn rejects_row_without_street_type() {
    assert!(parser()
        .parse("Acme Ltd 4915 Wetaskiwin AB T9A 1J6", SOURCE)
        .is_none());
}

#[test]
fn rejects_row_without_postal_code() {
    assert!(parser()
        .parse("Acme Ltd 4915 50 Street Wetaskiwin AB", SOURCE)
        .is_none());
}

#[test]
fn rejects_row_in_another_town() {
    assert!(parser()
        .parse("Acme Ltd 4915 50 Street Camrose AB T4V 1J6", SOURCE)
        .is_none());
}

#[test]
fn rejects_one_character_name() {
    assert!(parser()
        .parse("X 4915 50 Street Wetaskiwin AB T9A 1J6", SOURCE)
        .is_none());
}

// -----------------------------------------------------------------------
// Page extraction
// -----------------------------------------------------------------------

#[test]
fn extracts_rows_from_directory_table() {
    let html = r##"
        <table>
          <tr><th>Business</th><th>Contact</th><th>Address</th></tr>
          <tr><td>Amen Thrift Shop</td><td>Tammy Becsko</td><td>5002 51 Avenue</td><td>Wetaskiwin, AB</td><td>T9A 0P3</td><td>Phone: 780-352-5555</td></tr>
          <tr><td>AEM Fabrication Ltd</td><td></td><td>3802 56 Street</td><td>Wetaskiwin, AB</td><td>T9A 2B1</td><td><a href="#">View Map</a></td></tr>
          <tr><td>Unknown Listing</td><td>No address here</td></tr>
        </table>
    "##;
    let extraction = extract_businesses(html, SOURCE, &parser());
    assert_eq!(extraction.blocks, 3);
    assert_eq!(extraction.skipped, 1);
    assert!(extraction.errors.is_empty());
    assert_eq!(extraction.records.len(), 2);
    assert_eq!(extraction.records[0].name, "Amen Thrift Shop");
    assert_eq!(extraction.records[0].contact, "Tammy Becsko");
    assert_eq!(extraction.records[1].name, "AEM Fabrication Ltd");
}
