//! Static vocabulary tables used by the parsers and the normalizer.
//!
//! Kept as plain data so each table can be checked on its own and extended
//! without touching parser code.

/// Words that end a business name. Matching is case-insensitive and the
/// parser tries longer entries first, so `Services` wins over `Service`.
pub const BUSINESS_SUFFIXES: &[&str] = &[
    // legal forms
    "Ltd",
    "Limited",
    "Inc",
    "Incorporated",
    "Corp",
    "Corporation",
    "Co",
    "Company",
    "LLP",
    "LLC",
    "Enterprises",
    "Holdings",
    "Group",
    "Association",
    "Society",
    "Foundation",
    "Partners",
    "Partnership",
    "Cooperative",
    "Co-op",
    // food and hospitality
    "Restaurant",
    "Cafe",
    "Café",
    "Bakery",
    "Bistro",
    "Grill",
    "Diner",
    "Pizza",
    "Pub",
    "Bar",
    "Brewery",
    "Catering",
    "Kitchen",
    "Eatery",
    "Deli",
    "Inn",
    "Hotel",
    "Motel",
    "Lodge",
    "Suites",
    // retail
    "Shop",
    "Store",
    "Boutique",
    "Market",
    "Mart",
    "Outlet",
    "Emporium",
    "Pharmacy",
    "Drugs",
    "Florist",
    "Flowers",
    "Gallery",
    "Books",
    "Jewellers",
    "Jewelry",
    "Furniture",
    "Hardware",
    "Supply",
    "Supplies",
    "Sales",
    "Rentals",
    "Motors",
    "Automotive",
    "Auto",
    // trades and services
    "Services",
    "Service",
    "Solutions",
    "Consulting",
    "Contracting",
    "Construction",
    "Builders",
    "Plumbing",
    "Heating",
    "Electric",
    "Electrical",
    "Welding",
    "Fabrication",
    "Manufacturing",
    "Trucking",
    "Transport",
    "Repair",
    "Repairs",
    "Cleaning",
    "Landscaping",
    "Printing",
    "Realty",
    "Insurance",
    "Agency",
    "Financial",
    "Accounting",
    "Law",
    "Studio",
    "Salon",
    "Spa",
    "Barbershop",
    "Clinic",
    "Dental",
    "Optometry",
    "Chiropractic",
    "Veterinary",
    "Centre",
    "Center",
    "Church",
    "Club",
    "Gym",
    "Fitness",
    "Daycare",
    "Academy",
    "School",
    "Farms",
    "Farm",
    "Ranch",
    "Greenhouses",
    "Greenhouse",
];

/// Street-type tokens accepted by the address pattern, full forms and their
/// abbreviations.
pub const STREET_TYPES: &[&str] = &[
    "Street",
    "St",
    "Avenue",
    "Ave",
    "Av",
    "Road",
    "Rd",
    "Drive",
    "Dr",
    "Boulevard",
    "Blvd",
    "Crescent",
    "Cres",
    "Close",
    "Court",
    "Crt",
    "Ct",
    "Lane",
    "Ln",
    "Place",
    "Pl",
    "Way",
    "Trail",
    "Tr",
    "Highway",
    "Hwy",
    "Circle",
    "Cir",
    "Terrace",
    "Gate",
    "Parkway",
    "Pkwy",
];

/// Compass quadrants that may follow the street type.
pub const STREET_DIRECTIONS: &[&str] = &["NW", "NE", "SW", "SE", "N", "S", "E", "W"];

/// Field labels that directories interleave with address components.
pub const ADDRESS_FIELD_LABELS: &[&str] = &[
    "Address",
    "Mailing Address",
    "City",
    "Town",
    "Province",
    "Prov",
    "Postal Code",
    "Postal",
];

/// Words allowed between contact names.
pub const CONJUNCTIONS: &[&str] = &["and", "&"];

/// Recurring non-content text stripped by the normalizer.
pub const BOILERPLATE_PATTERNS: &[&str] = &[
    // map links
    r"(?i)(?:view|show|open)\s+(?:on\s+)?(?:a\s+)?(?:google\s+)?map\b",
    r"(?i)get\s+directions\b",
    r"(?i)\bmap\s+it\b",
    r"(?i)\[\s*map\s*\]",
    // link captions
    r"(?i)\(?\s*(?:this\s+link\s+)?opens?\s+in\s+(?:a\s+)?new\s+(?:window|tab)\s*\)?",
    // inline script remnants
    r"(?i)<script\b.*?</script>",
    r"(?i)\bdocument\.write\s*\([^)]*\)\s*;?",
    r"(?i)\b(?:var|let|const)\s+[A-Za-z_$][\w$]*\s*=\s*[^;]*;",
    r"\{\{[^}]*\}\}",
    r"\$\{[^}]*\}",
    // extracted contact link remnants
    r"(?i)\b(?:mailto|tel):\S*",
    r"(?i)\be-?mail\s*:\s*\S+@\S+",
    r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
    r"(?i)\bsend\s+(?:an?\s+)?e-?mail\b",
];

/// Returns `true` if `word` is a business suffix, ignoring case and a
/// trailing period.
#[must_use]
pub fn is_business_suffix(word: &str) -> bool {
    let word = word.trim_end_matches('.');
    BUSINESS_SUFFIXES
        .iter()
        .any(|suffix| suffix.eq_ignore_ascii_case(word))
}

#[must_use]
pub fn is_conjunction(word: &str) -> bool {
    CONJUNCTIONS.iter().any(|c| c.eq_ignore_ascii_case(word))
}

/// Builds a regex alternation from `words`, longest entries first so that
/// leftmost-first matching prefers e.g. `Street` over `St`.
#[must_use]
pub fn alternation(words: &[&str]) -> String {
    let mut sorted: Vec<&str> = words.to_vec();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    sorted.dedup();
    sorted
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}
