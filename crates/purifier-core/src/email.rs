//! Email normalization: trimming, domain correction, and structural checks.
//!
//! The grammar is a pragmatic approximation of RFC 5322, not a full parser.

use std::sync::OnceLock;

use regex::Regex;

use purifier_model::{NormalizedEmail, RejectReason};

use crate::corrections::DomainCorrections;

const MAX_LOCAL_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 255;

fn local_part_regex() -> &'static Regex {
    static LOCAL: OnceLock<Regex> = OnceLock::new();
    LOCAL.get_or_init(|| {
        Regex::new(r#"^(?:[^<>()\[\]\\.,;:\s@"]+(?:\.[^<>()\[\]\\.,;:\s@"]+)*|".+")$"#)
            .unwrap_or_else(|error| panic!("local part pattern: {error}"))
    })
}

fn domain_regex() -> &'static Regex {
    static DOMAIN: OnceLock<Regex> = OnceLock::new();
    DOMAIN.get_or_init(|| {
        Regex::new(r"^(?:\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\]|(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,})$")
            .unwrap_or_else(|error| panic!("domain pattern: {error}"))
    })
}

/// Splits on `@`, requiring exactly one separator.
fn split_address(address: &str) -> Option<(&str, &str)> {
    let mut parts = address.split('@');
    let local = parts.next()?;
    let domain = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((local, domain))
}

fn has_dot_edges(part: &str) -> bool {
    part.starts_with('.') || part.ends_with('.') || part.contains("..")
}

fn is_valid_address_literal(domain: &str) -> bool {
    let Some(inner) = domain
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return false;
    };
    let octets: Vec<&str> = inner.split('.').collect();
    octets.len() == 4 && octets.iter().all(|octet| octet.parse::<u8>().is_ok())
}

/// Structural validation of an already-corrected address.
pub fn is_structurally_valid(local: &str, domain: &str) -> bool {
    if local.is_empty() || local.len() > MAX_LOCAL_LEN || has_dot_edges(local) {
        return false;
    }
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN || has_dot_edges(domain) {
        return false;
    }
    let printable = |part: &str| part.chars().all(|ch| ch.is_ascii_graphic());
    if !printable(local) || !printable(domain) {
        return false;
    }
    if !local_part_regex().is_match(local) || !domain_regex().is_match(domain) {
        return false;
    }
    if domain.starts_with('[') {
        return is_valid_address_literal(domain);
    }
    true
}

/// Produces display forms and dedup keys for raw email values.
#[derive(Debug, Clone, Default)]
pub struct EmailNormalizer {
    corrections: DomainCorrections,
}

impl EmailNormalizer {
    pub fn new(corrections: DomainCorrections) -> Self {
        Self { corrections }
    }

    pub fn corrections(&self) -> &DomainCorrections {
        &self.corrections
    }

    /// Normalizes a raw cell value.
    ///
    /// The domain is lowercased and corrected; the local part keeps its
    /// casing in the display form. The dedup key is the lowercased display
    /// form.
    pub fn normalize(&self, raw: &str) -> Result<NormalizedEmail, RejectReason> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RejectReason::Missing);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(RejectReason::InvalidFormat);
        }
        let (local, domain) = split_address(trimmed).ok_or(RejectReason::InvalidFormat)?;

        let mut domain = domain.to_lowercase();
        let mut corrected = false;
        if let Some(canonical) = self.corrections.correct(&domain) {
            domain = canonical.to_string();
            corrected = true;
        }

        if !is_structurally_valid(local, &domain) {
            return Err(RejectReason::InvalidFormat);
        }

        let display = format!("{local}@{domain}");
        let dedup_key = display.to_lowercase();
        Ok(NormalizedEmail {
            display,
            dedup_key,
            corrected,
        })
    }
}
