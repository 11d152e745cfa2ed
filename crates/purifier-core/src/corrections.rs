//! Exact-match domain typo corrections.

use std::collections::{BTreeMap, BTreeSet};

use purifier_model::{PurifierError, Result};

/// Built-in misspellings, keyed by the canonical domain they correct to.
const DEFAULT_CORRECTIONS: &[(&str, &[&str])] = &[
    (
        "gmail.com",
        &[
            "gamil.com",
            "gmali.com",
            "gmaill.com",
            "gmai.com",
            "gmil.com",
            "gmal.com",
            "gamail.com",
            "gmail.co",
            "gmail.cm",
            "gmail.om",
            "gma.com",
            "gm.com",
            "gml.com",
            "ymail.com",
        ],
    ),
    (
        "yahoo.com",
        &[
            "yaho.com",
            "yahooo.com",
            "yhooo.com",
            "yaho.co",
            "yahoo.co",
            "yhoo.com",
            "yahho.com",
        ],
    ),
    (
        "hotmail.com",
        &[
            "hotmal.com",
            "hotmai.com",
            "hotmil.com",
            "hotail.com",
            "homtail.com",
            "hotmaill.com",
            "hotmaik.com",
        ],
    ),
    (
        "outlook.com",
        &[
            "outlok.com",
            "otlook.com",
            "outlook.co",
            "outook.com",
            "outllook.com",
        ],
    ),
    (
        "icloud.com",
        &["icoud.com", "iclud.com", "iclou.com", "icloud.co"],
    ),
];

/// Lookup table from a misspelled domain to its canonical form.
///
/// No canonical domain is ever a key, so correcting a corrected domain is a
/// no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCorrections {
    typo_to_canonical: BTreeMap<String, String>,
    canonicals: BTreeSet<String>,
}

impl Default for DomainCorrections {
    fn default() -> Self {
        let mut builder = DomainCorrectionsBuilder::new();
        for (canonical, typos) in DEFAULT_CORRECTIONS {
            builder.add(canonical, typos.iter().copied());
        }
        // The built-in table is conflict free.
        builder.build().unwrap_or_else(|_| Self::empty())
    }
}

impl DomainCorrections {
    pub fn empty() -> Self {
        Self {
            typo_to_canonical: BTreeMap::new(),
            canonicals: BTreeSet::new(),
        }
    }

    /// Built-in table extended with `extra` (canonical domain to typos).
    pub fn with_extra(extra: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut builder = DomainCorrectionsBuilder::new();
        for (canonical, typos) in DEFAULT_CORRECTIONS {
            builder.add(canonical, typos.iter().copied());
        }
        for (canonical, typos) in extra {
            builder.add(canonical, typos.iter().map(String::as_str));
        }
        builder.build()
    }

    /// Canonical domain for a lowercased `domain`, if it is a known typo.
    pub fn correct(&self, domain: &str) -> Option<&str> {
        self.typo_to_canonical.get(domain).map(String::as_str)
    }

    pub fn is_canonical(&self, domain: &str) -> bool {
        self.canonicals.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.typo_to_canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.typo_to_canonical.is_empty()
    }
}

/// Collects entries and checks them for conflicts on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct DomainCorrectionsBuilder {
    entries: Vec<(String, String)>,
}

impl DomainCorrectionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<'a>(&mut self, canonical: &str, typos: impl IntoIterator<Item = &'a str>) -> &mut Self {
        let canonical = canonical.trim().to_lowercase();
        for typo in typos {
            let typo = typo.trim().to_lowercase();
            if typo.is_empty() || typo == canonical {
                continue;
            }
            self.entries.push((typo, canonical.clone()));
        }
        self
    }

    pub fn build(self) -> Result<DomainCorrections> {
        let mut typo_to_canonical: BTreeMap<String, String> = BTreeMap::new();
        let mut canonicals = BTreeSet::new();
        for (typo, canonical) in self.entries {
            if let Some(existing) = typo_to_canonical.get(&typo) {
                if *existing != canonical {
                    return Err(PurifierError::ConflictingCorrection {
                        typo,
                        first: existing.clone(),
                        second: canonical,
                    });
                }
                continue;
            }
            canonicals.insert(canonical.clone());
            typo_to_canonical.insert(typo, canonical);
        }
        if let Some(domain) = canonicals
            .iter()
            .find(|canonical| typo_to_canonical.contains_key(canonical.as_str()))
        {
            return Err(PurifierError::CanonicalListedAsTypo {
                domain: domain.clone(),
            });
        }
        Ok(DomainCorrections {
            typo_to_canonical,
            canonicals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_corrects_known_typos() {
        let table = DomainCorrections::default();
        assert_eq!(table.correct("gamil.com"), Some("gmail.com"));
        assert_eq!(table.correct("ymail.com"), Some("gmail.com"));
        assert_eq!(table.correct("yahoo.co"), Some("yahoo.com"));
        assert_eq!(table.correct("hotmaik.com"), Some("hotmail.com"));
        assert_eq!(table.correct("outook.com"), Some("outlook.com"));
        assert_eq!(table.correct("icloud.co"), Some("icloud.com"));
        assert_eq!(table.len(), 37);
    }

    #[test]
    fn canonical_domains_are_left_alone() {
        let table = DomainCorrections::default();
        for canonical in ["gmail.com", "yahoo.com", "hotmail.com", "outlook.com", "icloud.com"] {
            assert!(table.is_canonical(canonical));
            assert_eq!(table.correct(canonical), None);
        }
    }

    #[test]
    fn lookup_is_exact_not_fuzzy() {
        let table = DomainCorrections::default();
        assert_eq!(table.correct("gmaiil.com"), None);
        assert_eq!(table.correct("mail.gamil.com"), None);
    }

    #[test]
    fn extra_entries_merge_with_defaults() {
        let mut extra = BTreeMap::new();
        extra.insert("proton.me".to_string(), vec!["Protonn.me".to_string()]);
        let table = DomainCorrections::with_extra(&extra).expect("build table");
        assert_eq!(table.correct("protonn.me"), Some("proton.me"));
        assert_eq!(table.correct("gamil.com"), Some("gmail.com"));
    }

    #[test]
    fn conflicting_typo_is_rejected() {
        let mut extra = BTreeMap::new();
        extra.insert("gmx.com".to_string(), vec!["gmai.com".to_string()]);
        let error = DomainCorrections::with_extra(&extra).unwrap_err();
        assert!(matches!(error, PurifierError::ConflictingCorrection { .. }));
    }

    #[test]
    fn canonical_listed_as_typo_is_rejected() {
        let mut extra = BTreeMap::new();
        extra.insert("googlemail.com".to_string(), vec!["gmail.com".to_string()]);
        let error = DomainCorrections::with_extra(&extra).unwrap_err();
        assert!(matches!(
            error,
            PurifierError::CanonicalListedAsTypo { ref domain } if domain == "gmail.com"
        ));
    }
}
