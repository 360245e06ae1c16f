//! Canonical upload fields and the alias-based normalizer.
//!
//! Front-end versions of the upload form disagree on key names (`workType`
//! vs `work_type` vs `category`, ...). Each canonical field declares its
//! accepted aliases in priority order; the first present, non-empty value
//! wins. Absence is not an error here - the HTTP surface validates.

use std::collections::HashMap;

/// Normalized record derived from a raw request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalFields {
    pub date: String,
    pub work_type: String,
    pub address: String,
    pub uploader: String,
    pub memo: String,
}

/// Alias tables, evaluated in declared priority order.
const DATE_ALIASES: &[&str] = &["date", "workDate", "work_date", "selectedDate"];
const WORK_TYPE_ALIASES: &[&str] = &["workType", "work_type", "category", "work", "type"];
const ADDRESS_ALIASES: &[&str] = &["address", "addr", "location"];
const UPLOADER_ALIASES: &[&str] = &["uploader", "uploaderName", "name"];
const MEMO_ALIASES: &[&str] = &["memo", "note"];

fn pick(raw: &HashMap<String, String>, aliases: &[&str]) -> String {
    for alias in aliases {
        if let Some(value) = raw.get(*alias) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    String::new()
}

/// Map a raw key/value body to canonical fields. Pure; missing fields come
/// back as empty strings.
pub fn normalize(raw: &HashMap<String, String>) -> CanonicalFields {
    CanonicalFields {
        date: pick(raw, DATE_ALIASES),
        work_type: pick(raw, WORK_TYPE_ALIASES),
        address: pick(raw, ADDRESS_ALIASES),
        uploader: pick(raw, UPLOADER_ALIASES),
        memo: pick(raw, MEMO_ALIASES),
    }
}

impl CanonicalFields {
    /// Names of required fields that are empty, in canonical order.
    /// memo is optional; everything else is required for data quality.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.date.is_empty() {
            missing.push("date");
        }
        if self.work_type.is_empty() {
            missing.push("workType");
        }
        if self.address.is_empty() {
            missing.push("address");
        }
        if self.uploader.is_empty() {
            missing.push("uploader");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn normalize_picks_first_alias_in_priority_order() {
        let body = raw(&[("workDate", "2024-05-02"), ("date", "2024-05-01")]);
        let fields = normalize(&body);
        assert_eq!(fields.date, "2024-05-01");

        let body = raw(&[("work_date", "2024-05-03"), ("workDate", "2024-05-02")]);
        let fields = normalize(&body);
        assert_eq!(fields.date, "2024-05-02");
    }

    #[test]
    fn normalize_skips_empty_aliases() {
        let body = raw(&[("date", "   "), ("selectedDate", "2024-05-01")]);
        let fields = normalize(&body);
        assert_eq!(fields.date, "2024-05-01");
    }

    #[test]
    fn normalize_returns_empty_string_when_no_alias_present() {
        let body = raw(&[("somethingElse", "x")]);
        let fields = normalize(&body);
        assert_eq!(fields, CanonicalFields::default());
    }

    #[test]
    fn normalize_work_type_aliases() {
        for key in ["workType", "work_type", "category", "work", "type"] {
            let body = raw(&[(key, "전기")]);
            assert_eq!(normalize(&body).work_type, "전기", "alias {}", key);
        }
    }

    #[test]
    fn normalize_trims_values() {
        let body = raw(&[("uploader", "  홍길동  ")]);
        assert_eq!(normalize(&body).uploader, "홍길동");
    }

    #[test]
    fn missing_required_names_every_absent_field() {
        let fields = normalize(&raw(&[("workType", "타일")]));
        assert_eq!(fields.missing_required(), vec!["date", "address", "uploader"]);
    }

    #[test]
    fn memo_is_optional() {
        let fields = normalize(&raw(&[
            ("date", "2024-05-01"),
            ("workType", "타일"),
            ("address", "서울시 강남구"),
            ("uploader", "홍길동"),
        ]));
        assert!(fields.missing_required().is_empty());
        assert_eq!(fields.memo, "");
    }
}
