//! Source registry. Loads the endpoint definitions from embedded TOML.
//!
//! Both `.toml` files in `packages/source/sources/` are baked into the
//! binary at compile time via [`include_str!`].

use crate::source_def::{BomSource, SpcSource, parse_bom_toml, parse_spc_toml};

const SPC_TOML: &str = include_str!("../sources/spc.toml");
const BOM_TOML: &str = include_str!("../sources/bom.toml");

/// Returns the SPC fire weather outlook definition.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed. It is a compile-time
/// constant, so a parse failure is a development error caught by the
/// tests below.
#[must_use]
pub fn spc_source() -> SpcSource {
    parse_spc_toml(SPC_TOML).unwrap_or_else(|e| panic!("Failed to parse spc.toml: {e}"))
}

/// Returns the BOM fire danger rating definition.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed.
#[must_use]
pub fn bom_source() -> BomSource {
    parse_bom_toml(BOM_TOML).unwrap_or_else(|e| panic!("Failed to parse bom.toml: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fire_outlook_models::MAX_WINDOW_DAYS;
    use std::collections::BTreeSet;

    #[test]
    fn spc_days_are_contiguous() {
        let source = spc_source();
        let days: Vec<u8> = source.days.iter().map(|d| d.day).collect();
        let expected: Vec<u8> = (1..=MAX_WINDOW_DAYS).collect();
        assert_eq!(days, expected);
    }

    #[test]
    fn spc_layer_urls_are_unique() {
        let source = spc_source();
        let mut seen = BTreeSet::new();
        for day in &source.days {
            for url in [&day.fire_weather_url, &day.dry_lightning_url] {
                assert!(!url.is_empty(), "Day {} has an empty URL", day.day);
                assert!(
                    !url.ends_with("/query"),
                    "Day {} URL should stop at the layer id: {url}",
                    day.day
                );
                assert!(seen.insert(url.clone()), "Duplicate layer URL: {url}");
            }
        }
    }

    #[test]
    fn bom_source_has_required_fields() {
        let source = bom_source();
        assert!(!source.id.is_empty());
        assert!(source.url.starts_with("http"));
        assert!(!source.fields.period.is_empty());
        assert!(!source.fields.start_time.is_empty());
        assert!(!source.fields.rating.is_empty());
        assert!(!source.fields.index.is_empty());
    }
}
