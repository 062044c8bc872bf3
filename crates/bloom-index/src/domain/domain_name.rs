//! Hierarchical domain name recognition and suffix expansion
//!
//! `www.google.co.uk` expands to `www.google.co.uk`, `google.co.uk`,
//! `co.uk`, `uk` so that a lookup for any parent domain hits the index.

use std::sync::LazyLock;

use regex::Regex;

/// Recognised top-level labels: generic, country-code and IDN (punycode)
#[rustfmt::skip]
const TOP_LEVEL_LABELS: &[&str] = &[
    "XN--CLCHC0EA0B2G2A9GCD", "XN--HGBK6AJ7F53BBA", "XN--HLCJ6AYA9ESC7A",
    "XN--11B5BS3A9AJ6G", "XN--MGBERP4A5D4AR", "XN--XKC2DL3A5EE0H",
    "XN--80AKHBYKNJ4F", "XN--XKC2AL3HYE2A", "XN--LGBBAT1AD8J", "XN--MGBC0A9AZCG",
    "XN--9T4B11YI5A", "XN--MGBAAM7A8H", "XN--MGBAYH7GPA", "XN--MGBBH1A71E",
    "XN--FPCRJ9C3D", "XN--FZC2C9E2C", "XN--YFRO4I67O", "XN--YGBI2AMMX",
    "XN--3E0B707E", "XN--JXALPDLP", "XN--KGBECHTV", "XN--OGBPF8FL", "XN--0ZWM56D",
    "XN--45BRJ9C", "XN--80AO21A", "XN--DEBA0AD", "XN--G6W251D", "XN--GECRJ9C",
    "XN--H2BRJ9C", "XN--J6W193G", "XN--KPRW13D", "XN--KPRY57D", "XN--PGBS0DH",
    "XN--S9BRJ9C", "XN--90A3AC", "XN--FIQS8S", "XN--FIQZ9S", "XN--O3CW4H",
    "XN--WGBH1C", "XN--WGBL6A", "XN--ZCKZAH", "XN--P1AI",
    "MUSEUM", "TRAVEL", "AERO", "ARPA", "ASIA", "COOP", "INFO", "JOBS", "MOBI",
    "NAME", "BIZ", "CAT", "COM", "EDU", "GOV", "INT", "MIL", "NET", "ORG", "PRO",
    "TEL", "XXX",
    "AC", "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AN", "AO", "AQ", "AR", "AS",
    "AT", "AU", "AW", "AX", "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI",
    "BJ", "BM", "BN", "BO", "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC",
    "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN", "CO", "CR", "CU", "CV",
    "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE", "EG",
    "ER", "ES", "ET", "EU", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD",
    "GE", "GF", "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT",
    "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM",
    "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH",
    "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK",
    "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX",
    "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU",
    "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM", "PN", "PR", "PS",
    "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW", "SA", "SB", "SC", "SD",
    "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "ST", "SU",
    "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM",
    "TN", "TO", "TP", "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UK", "US", "UY",
    "UZ", "VA", "VC", "VE", "VG", "VI", "VN", "VU", "WF", "WS", "YE", "YT", "ZA",
    "ZM", "ZW",
];

/// One or more label characters, a dot, then a recognised top-level label
///
/// Case folding is ASCII only; `-u` keeps `K` from matching KELVIN SIGN.
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?i-u)^[A-Z0-9\-.]+\.(?:{})$",
        TOP_LEVEL_LABELS.join("|")
    );
    Regex::new(&pattern).expect("static domain pattern compiles")
});

/// Returns true if `text` is a domain name ending in a recognised top-level label
///
/// A bare top-level label (`com`) is not a domain; surrounding whitespace or
/// a scheme prefix (`http://`) causes rejection.
pub fn is_domain(text: &str) -> bool {
    DOMAIN_RE.is_match(text)
}

/// Expand a dotted name into its suffixes, longest first
///
/// Pure string splitting; no validation is performed, so call
/// [`is_domain`] first when only real domains should be expanded.
pub fn expand(domain: &str) -> DomainSuffixes<'_> {
    DomainSuffixes {
        remaining: Some(domain),
    }
}

/// Iterator over the progressively shorter suffixes of a dotted name
#[derive(Clone, Debug)]
pub struct DomainSuffixes<'a> {
    remaining: Option<&'a str>,
}

impl<'a> Iterator for DomainSuffixes<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.remaining?;
        self.remaining = current.find('.').map(|dot| &current[dot + 1..]);
        Some(current)
    }
}
