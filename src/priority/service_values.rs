use std::collections::BTreeMap;

/// Value used for services missing from both the catalogue and the overrides.
pub const DEFAULT_SERVICE_VALUE: f64 = 10_000.0;

/// Built-in price list for the firm's service catalogue.
pub const SERVICE_CATALOGUE: &[(&str, f64)] = &[
    ("Company Registration", 15_000.0),
    ("GST Registration", 5_000.0),
    ("Trademark Registration", 25_000.0),
    ("Legal Documentation", 10_000.0),
    ("Tax Compliance", 8_000.0),
    ("Business License", 12_000.0),
    ("Patent Filing", 50_000.0),
    ("Corporate Restructuring", 75_000.0),
];

/// Monetary value of a service by name.
///
/// Overrides win over the catalogue. Names must match exactly; a case or
/// whitespace variant is an unknown service.
pub fn service_value(name: &str, overrides: Option<&BTreeMap<String, f64>>) -> f64 {
    if let Some(v) = overrides.and_then(|o| o.get(name)) {
        return *v;
    }

    SERVICE_CATALOGUE
        .iter()
        .find(|(k, _)| *k == name)
        .map(|(_, v)| *v)
        .unwrap_or(DEFAULT_SERVICE_VALUE)
}
