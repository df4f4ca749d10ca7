//! PatchType catalog and the global rotation order
//!
//! The catalog is immutable configuration shared by the evaluator (static risk
//! attributes) and the rotation scheduler (cyclic order). It is validated once
//! at construction so both consumers can index it without further checks.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// A named patch strategy with a-priori risk attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchType {
    pub name: String,
    /// Likelihood the patch breaks functionality (0.0 - 1.0)
    pub functionality_risk: f64,
    /// Likelihood the patched binary stays exploitable (0.0 - 1.0)
    pub exploitability: f64,
}

impl PatchType {
    pub fn new(name: impl Into<String>, functionality_risk: f64, exploitability: f64) -> Self {
        Self {
            name: name.into(),
            functionality_risk,
            exploitability,
        }
    }

    fn validate(&self) -> std::result::Result<(), CatalogError> {
        for (attribute, value) in [
            ("functionality_risk", self.functionality_risk),
            ("exploitability", self.exploitability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CatalogError::AttributeOutOfRange {
                    name: self.name.clone(),
                    attribute,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// On-disk catalog layout; an empty `order` means catalog order
#[derive(Debug, Deserialize)]
struct RawCatalog {
    patch_types: Vec<PatchType>,
    #[serde(default)]
    order: Vec<String>,
}

/// Validated patch-type catalog with its cyclic rotation order
#[derive(Debug, Clone, Serialize)]
pub struct PatchCatalog {
    patch_types: Vec<PatchType>,
    order: Vec<String>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl PatchCatalog {
    /// Build a catalog; `order` must be a permutation of the patch type names
    pub fn new(patch_types: Vec<PatchType>, order: Vec<String>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(patch_types.len());
        for (idx, pt) in patch_types.iter().enumerate() {
            pt.validate()?;
            if by_name.insert(pt.name.clone(), idx).is_some() {
                return Err(CatalogError::Duplicate(pt.name.clone()).into());
            }
        }

        if order.is_empty() {
            return Err(CatalogError::EmptyOrder.into());
        }

        let mut seen = HashSet::with_capacity(order.len());
        for name in &order {
            if !by_name.contains_key(name) {
                return Err(CatalogError::UnknownInOrder(name.clone()).into());
            }
            if !seen.insert(name.as_str()) {
                return Err(CatalogError::Duplicate(name.clone()).into());
            }
        }
        if let Some(missing) = patch_types.iter().find(|pt| !seen.contains(pt.name.as_str())) {
            return Err(CatalogError::MissingFromOrder(missing.name.clone()).into());
        }

        Ok(Self {
            patch_types,
            order,
            by_name,
        })
    }

    /// Build a catalog whose rotation order is the listing order
    pub fn in_listed_order(patch_types: Vec<PatchType>) -> Result<Self> {
        let order = patch_types.iter().map(|pt| pt.name.clone()).collect();
        Self::new(patch_types, order)
    }

    /// Parse and validate a JSON catalog
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        if raw.order.is_empty() {
            Self::in_listed_order(raw.patch_types)
        } else {
            Self::new(raw.patch_types, raw.order)
        }
    }

    /// Look up a patch type by name
    pub fn get(&self, name: &str) -> Option<&PatchType> {
        self.by_name.get(name).map(|&idx| &self.patch_types[idx])
    }

    pub fn patch_types(&self) -> &[PatchType] {
        &self.patch_types
    }

    /// The global cyclic rotation order
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Cycle length `P`
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Patch type name at an unbounded cycle position
    pub fn order_at(&self, position: u64) -> &str {
        let idx = (position % self.order.len() as u64) as usize;
        &self.order[idx]
    }
}

impl Default for PatchCatalog {
    /// Built-in catalog, ordered from least to most intrusive
    fn default() -> Self {
        let patch_types = vec![
            PatchType::new("stack_canary", 0.05, 0.6),
            PatchType::new("return_guard", 0.1, 0.5),
            PatchType::new("bounds_check", 0.2, 0.3),
            PatchType::new("null_guard", 0.15, 0.45),
            PatchType::new("reassembled", 0.35, 0.2),
            PatchType::new("reassembled_optimized", 0.4, 0.2),
            PatchType::new("shadow_stack", 0.3, 0.1),
        ];
        let order = patch_types.iter().map(|pt| pt.name.clone()).collect();
        Self {
            by_name: patch_types
                .iter()
                .enumerate()
                .map(|(idx, pt)| (pt.name.clone(), idx))
                .collect(),
            patch_types,
            order,
        }
    }
}
