use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::advice::CONCERN_SEPARATOR;
use crate::concern::Concern;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("advice catalog has no entry for concern '{0}'")]
    MissingConcern(&'static str),
    #[error("advice for '{concern}' has mismatched variant counts (analysis {analysis}, treatment {treatment}, depacos {depacos}, drugstore {drugstore})")]
    MismatchedVariants {
        concern: &'static str,
        analysis: usize,
        treatment: usize,
        depacos: usize,
        drugstore: usize,
    },
    #[error("advice for '{0}' has no variants")]
    NoVariants(&'static str),
    #[error("lifestyle pool is empty")]
    EmptyLifestyle,
    #[error("catalog text is blank or contains the concern separator: {0}")]
    InvalidText(String),
}

/// Canned advice variants for one concern, as parallel arrays.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConcernAdvice {
    pub analysis: Vec<String>,
    pub treatment: Vec<String>,
    pub depacos: Vec<String>,
    pub drugstore: Vec<String>,
}

/// One row of a [`ConcernAdvice`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdviceVariant<'a> {
    pub analysis: &'a str,
    pub treatment: &'a str,
    pub depacos: &'a str,
    pub drugstore: &'a str,
}

impl ConcernAdvice {
    pub fn len(&self) -> usize {
        self.analysis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analysis.is_empty()
    }

    /// Row `idx` of the parallel arrays. Panics when out of range; a validated catalog
    /// guarantees every index below [`ConcernAdvice::len`] exists in all four arrays.
    pub fn variant(&self, idx: usize) -> AdviceVariant<'_> {
        AdviceVariant {
            analysis: &self.analysis[idx],
            treatment: &self.treatment[idx],
            depacos: &self.depacos[idx],
            drugstore: &self.drugstore[idx],
        }
    }

    fn validate(&self, concern: Concern) -> Result<(), CatalogError> {
        let counts = (
            self.analysis.len(),
            self.treatment.len(),
            self.depacos.len(),
            self.drugstore.len(),
        );
        if counts.0 != counts.1 || counts.0 != counts.2 || counts.0 != counts.3 {
            return Err(CatalogError::MismatchedVariants {
                concern: concern.tag(),
                analysis: counts.0,
                treatment: counts.1,
                depacos: counts.2,
                drugstore: counts.3,
            });
        }
        if self.is_empty() {
            return Err(CatalogError::NoVariants(concern.tag()));
        }
        self.analysis
            .iter()
            .chain(&self.treatment)
            .chain(&self.depacos)
            .chain(&self.drugstore)
            .try_for_each(|text| check_text(text))
    }
}

fn check_text(text: &str) -> Result<(), CatalogError> {
    if text.trim().is_empty() || text.contains(CONCERN_SEPARATOR) {
        return Err(CatalogError::InvalidText(text.to_string()));
    }
    Ok(())
}

#[derive(Deserialize)]
struct RawCatalog {
    concerns: BTreeMap<Concern, ConcernAdvice>,
    lifestyle: Vec<String>,
}

/// Static advice tables, validated once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct AdviceCatalog {
    concerns: BTreeMap<Concern, ConcernAdvice>,
    lifestyle: Vec<String>,
}

impl TryFrom<RawCatalog> for AdviceCatalog {
    type Error = CatalogError;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        Self::new(raw.concerns, raw.lifestyle)
    }
}

impl AdviceCatalog {
    pub fn new(
        concerns: BTreeMap<Concern, ConcernAdvice>,
        lifestyle: Vec<String>,
    ) -> Result<Self, CatalogError> {
        for concern in Concern::ALL {
            concerns
                .get(&concern)
                .ok_or(CatalogError::MissingConcern(concern.tag()))?
                .validate(concern)?;
        }
        if lifestyle.is_empty() {
            return Err(CatalogError::EmptyLifestyle);
        }
        lifestyle.iter().try_for_each(|text| check_text(text))?;
        Ok(Self {
            concerns,
            lifestyle,
        })
    }

    pub fn advice_for(&self, concern: Concern) -> &ConcernAdvice {
        // Every concern is present after `new`.
        &self.concerns[&concern]
    }

    pub fn lifestyle(&self) -> &[String] {
        &self.lifestyle
    }
}
