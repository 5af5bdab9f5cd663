//! Hero name recovery
//!
//! The auxiliary payload carries explicit `name`/`nickname` fields. Older
//! saves without one fall back to a positional heuristic over the primary
//! payload: the first three distinct Cyrillic-led UTF-16 runs are taken as
//! `[noise, first_name, second_name]`.

use encoding_rs::UTF_16LE;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ScanConfig;
use crate::scan::markers::{NAME_FIELD, NICKNAME_FIELD};
use crate::scan::utils::{find_in, read_u32_le};

/// Max UTF-16 units of a name field or heuristic run
pub const MAX_NAME_UNITS: usize = 100;

/// Substrings that disqualify a heuristic name candidate
pub const NAME_DENYLIST: [&str; 14] = [
    "crap", "flags", "clouds", "hero", "nickname", "arena", "enemy", "player", "shop", "item",
    "spell", "unit", "quest", "map",
];

/// Accepted length of a heuristic candidate, in characters
const CANDIDATE_LEN: std::ops::RangeInclusive<usize> = 4..=20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroIdentity {
    pub first_name: String,
    pub second_name: String,
    pub full_name: String,
    pub fingerprint_hash: String,
}

impl HeroIdentity {
    pub fn new(first_name: impl Into<String>, second_name: impl Into<String>) -> Self {
        let first_name = first_name.into();
        let second_name = second_name.into();
        let full_name = format!("{first_name} {second_name}").trim().to_string();
        let fingerprint_hash = fingerprint_hash(&full_name);
        Self {
            first_name,
            second_name,
            full_name,
            fingerprint_hash,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full_name.is_empty()
    }
}

/// Lowercase hex MD5 of the name with all whitespace removed
pub fn fingerprint_hash(full_name: &str) -> String {
    let cleared: String = full_name.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{:x}", md5::compute(cleared.as_bytes()))
}

#[derive(Debug, Clone, Copy)]
pub struct HeroIdentityExtractor {
    scan_limit: usize,
}

impl Default for HeroIdentityExtractor {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl HeroIdentityExtractor {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            scan_limit: config.hero_scan_limit,
        }
    }

    /// Prefer the auxiliary payload; scan the primary payload only without one
    pub fn extract(&self, primary: &[u8], auxiliary: Option<&[u8]>) -> HeroIdentity {
        match auxiliary {
            Some(info) => {
                let identity = from_info_fields(info);
                if identity.is_empty() {
                    warn!("Auxiliary payload has no readable hero name");
                }
                identity
            }
            None => {
                debug!("No auxiliary payload, using legacy hero name scan");
                self.from_legacy_scan(primary)
            }
        }
    }

    /// Positional heuristic over the start of the primary payload
    pub fn from_legacy_scan(&self, data: &[u8]) -> HeroIdentity {
        let candidates = legacy_candidates(data, self.scan_limit);
        debug!("Legacy hero name candidates: {:?}", candidates);

        let mut names = candidates.into_iter().skip(1);
        let first = names.next().unwrap_or_default();
        let second = names.next().unwrap_or_default();
        HeroIdentity::new(first, second)
    }
}

/// Read `name` and the following `nickname` field of a decoded info payload
pub fn from_info_fields(info: &[u8]) -> HeroIdentity {
    let Some((first_name, name_end)) = read_name_field(info) else {
        return HeroIdentity::new("", "");
    };

    let second_name = find_in(info, NICKNAME_FIELD, name_end, info.len())
        .and_then(|pos| read_utf16_field(info, pos + NICKNAME_FIELD.len()))
        .map(|(name, _)| name)
        .unwrap_or_default();

    HeroIdentity::new(first_name, second_name)
}

fn read_name_field(info: &[u8]) -> Option<(String, usize)> {
    let pos = find_in(info, NAME_FIELD, 0, info.len())?;
    read_utf16_field(info, pos + NAME_FIELD.len())
}

/// `<u32 char count> <UTF-16LE chars>` at `pos`
fn read_utf16_field(data: &[u8], pos: usize) -> Option<(String, usize)> {
    let units = read_u32_le(data, pos)? as usize;
    if units == 0 || units > MAX_NAME_UNITS {
        return None;
    }
    let start = pos + 4;
    let end = start + units * 2;
    let text = decode_utf16(data.get(start..end)?)?;
    Some((text, end))
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    UTF_16LE
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

fn starts_candidate(low: u8, high: u8) -> bool {
    high == 0x04 && (0x10..=0x4F).contains(&low)
}

fn continues_run(low: u8, high: u8) -> bool {
    high == 0x04 || (high == 0x00 && (0x20..=0x7E).contains(&low))
}

/// UTF-16LE run of Cyrillic or printable ASCII units starting at `pos`
fn utf16_run_at(data: &[u8], pos: usize) -> Option<(String, usize)> {
    let limit = (pos + MAX_NAME_UNITS * 2).min(data.len().saturating_sub(1));
    let mut end = pos;
    while end < limit {
        let (low, high) = (data[end], data[end + 1]);
        if (low == 0 && high == 0) || !continues_run(low, high) {
            break;
        }
        end += 2;
    }
    if end == pos {
        return None;
    }
    decode_utf16(&data[pos..end]).map(|text| (text, end - pos))
}

/// First three distinct plausible names in `data[..limit]`
pub fn legacy_candidates(data: &[u8], limit: usize) -> Vec<String> {
    let limit = limit.min(data.len());
    let mut candidates: Vec<String> = Vec::new();

    let mut i = 0;
    while i + 4 < limit && candidates.len() < 3 {
        if !starts_candidate(data[i], data[i + 1]) {
            i += 1;
            continue;
        }

        match utf16_run_at(data, i) {
            Some((text, byte_len)) => {
                if is_plausible_name(&text) && !candidates.contains(&text) {
                    candidates.push(text);
                }
                i += byte_len;
            }
            None => i += 2,
        }
    }

    candidates
}

fn is_plausible_name(text: &str) -> bool {
    if !CANDIDATE_LEN.contains(&text.chars().count()) {
        return false;
    }
    let lower = text.to_lowercase();
    !NAME_DENYLIST.iter().any(|word| lower.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn field(key: &[u8], value: &str) -> Vec<u8> {
        let mut out = key.to_vec();
        out.extend_from_slice(&(value.encode_utf16().count() as u32).to_le_bytes());
        out.extend(utf16(value));
        out
    }

    #[test]
    fn test_fingerprint_ignores_whitespace() {
        assert_eq!(
            fingerprint_hash("Даэрт де Мортон"),
            fingerprint_hash("Даэрт  де   Мортон")
        );
        assert_eq!(fingerprint_hash("Даэрт де Мортон"), fingerprint_hash("Даэртде\tМортон"));
        assert_ne!(fingerprint_hash("Даэрт"), fingerprint_hash("Мортон"));
    }

    #[test]
    fn test_fingerprint_format() {
        // md5("")
        assert_eq!(fingerprint_hash("  "), "d41d8cd98f00b204e9800998ecf8427e");
        let hash = fingerprint_hash("Неолина Очаровательная");
        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_full_name_trimmed() {
        let identity = HeroIdentity::new("Зачарованная", "");
        assert_eq!(identity.full_name, "Зачарованная");
        assert_eq!(identity.fingerprint_hash, fingerprint_hash("Зачарованная"));
    }

    #[test]
    fn test_info_fields() {
        let mut info = vec![0u8; 7];
        info.extend(field(b"name", "Даэрт"));
        info.extend([1, 2, 3]);
        info.extend(field(b"nickname", "де Мортон"));

        let identity = from_info_fields(&info);
        assert_eq!(identity.first_name, "Даэрт");
        assert_eq!(identity.second_name, "де Мортон");
        assert_eq!(identity.full_name, "Даэрт де Мортон");
    }

    #[test]
    fn test_info_without_nickname() {
        let info = field(b"name", "Отважная");
        let identity = from_info_fields(&info);
        assert_eq!(identity.first_name, "Отважная");
        assert_eq!(identity.second_name, "");
    }

    #[test]
    fn test_info_invalid_length() {
        let mut info = b"name".to_vec();
        info.extend_from_slice(&500u32.to_le_bytes());
        assert!(from_info_fields(&info).is_empty());
    }

    fn legacy_blob(strings: &[&str]) -> Vec<u8> {
        let mut data = vec![0xAAu8; 9];
        for s in strings {
            data.extend(utf16(s));
            data.extend([0u8; 2]);
            data.extend([0x11u8; 5]);
        }
        data.extend([0u8; 16]);
        data
    }

    #[test]
    fn test_legacy_noise_first_second() {
        let data = legacy_blob(&["Шум", "Пустошь", "Даэрт", "Даэрт", "Мортон", "Лишнее"]);
        let candidates = legacy_candidates(&data, 100_000);
        assert_eq!(candidates, ["Пустошь", "Даэрт", "Мортон"]);

        let identity = HeroIdentityExtractor::default().from_legacy_scan(&data);
        assert_eq!(identity.first_name, "Даэрт");
        assert_eq!(identity.second_name, "Мортон");
    }

    #[test]
    fn test_legacy_denylist_case_insensitive() {
        let data = legacy_blob(&["Шумиха", "Жhero", "Вождь", "Мир map", "Рыцарь"]);
        let candidates = legacy_candidates(&data, 100_000);
        assert_eq!(candidates, ["Шумиха", "Вождь", "Рыцарь"]);
        let data = legacy_blob(&["ЖHERO"]);
        assert!(legacy_candidates(&data, 100_000).is_empty());
    }

    #[test]
    fn test_legacy_run_mixes_ascii() {
        let data = legacy_blob(&["Шумиха", "Ян 2nd", "Король"]);
        assert_eq!(legacy_candidates(&data, 100_000)[1], "Ян 2nd");
    }

    #[test]
    fn test_legacy_scan_limit() {
        let data = legacy_blob(&["Шумиха", "Вождь", "Рыцарь"]);
        assert!(legacy_candidates(&data, 8).is_empty());
    }

    #[test]
    fn test_extract_prefers_auxiliary() {
        let primary = legacy_blob(&["Шумиха", "Вождь", "Рыцарь"]);
        let info = field(b"name", "Неолина");

        let extractor = HeroIdentityExtractor::default();
        assert_eq!(extractor.extract(&primary, Some(&info)).first_name, "Неолина");
        assert_eq!(extractor.extract(&primary, None).first_name, "Вождь");
    }
}
