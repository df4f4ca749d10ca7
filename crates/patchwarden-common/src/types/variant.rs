//! Variant - the baseline binary or one patched form of a challenge set

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::challenge_set::ChallengeSetId;

/// Store-assigned variant identifier; ascending ids follow creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub u64);

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "variant#{}", self.0)
    }
}

/// A binary node belonging to exactly one challenge set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub cs: ChallengeSetId,
    pub name: String,
    /// `None` for the baseline, otherwise the patch type that produced it
    pub patch_type: Option<String>,
    /// Opaque binary content
    pub blob: Bytes,
}

impl Variant {
    /// Whether this is the unpatched baseline
    #[inline]
    pub fn is_baseline(&self) -> bool {
        self.patch_type.is_none()
    }

    /// Whether this variant was produced by the named patch type
    pub fn has_patch_type(&self, name: &str) -> bool {
        self.patch_type.as_deref() == Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_has_no_patch_type() {
        let v = Variant {
            id: VariantId(1),
            cs: ChallengeSetId(1),
            name: "unpatched".to_string(),
            patch_type: None,
            blob: Bytes::from_static(b"XXXX"),
        };
        assert!(v.is_baseline());
        assert!(!v.has_patch_type("a_patch"));
    }

    #[test]
    fn test_patch_type_match() {
        let v = Variant {
            id: VariantId(2),
            cs: ChallengeSetId(1),
            name: "patch1".to_string(),
            patch_type: Some("a_patch".to_string()),
            blob: Bytes::from_static(b"XXXYZ"),
        };
        assert!(!v.is_baseline());
        assert!(v.has_patch_type("a_patch"));
        assert!(!v.has_patch_type("b_patch"));
    }
}
