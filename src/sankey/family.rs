use std::fmt;

use palette::Srgb;

// ---------------------------------------------------------------------------
// MethodFamily – the middle tier of the taxonomy
// ---------------------------------------------------------------------------

/// The three recognised method families.
///
/// Declaration order is the canonical order: it indexes [`FamilyTally`] and
/// decides ties when two families carry the same weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MethodFamily {
    ModelBased,
    FeatureBased,
    DistanceBased,
}

impl MethodFamily {
    /// Canonical order, also the tie-break order of the dominant-family rule.
    pub const CANONICAL: [MethodFamily; 3] = [
        MethodFamily::ModelBased,
        MethodFamily::FeatureBased,
        MethodFamily::DistanceBased,
    ];

    /// Parse an exact spreadsheet label. Anything else is not a family.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Model-based" => Some(MethodFamily::ModelBased),
            "Feature-based" => Some(MethodFamily::FeatureBased),
            "Distance-based" => Some(MethodFamily::DistanceBased),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MethodFamily::ModelBased => "Model-based",
            MethodFamily::FeatureBased => "Feature-based",
            MethodFamily::DistanceBased => "Distance-based",
        }
    }

    /// Whether `label` names one of the recognised families.
    pub fn is_family_label(label: &str) -> bool {
        Self::from_label(label).is_some()
    }

    /// Fixed node colour of the family.
    pub fn color(self) -> Srgb<u8> {
        match self {
            MethodFamily::FeatureBased => Srgb::new(227, 109, 109),
            MethodFamily::ModelBased => Srgb::new(80, 185, 112),
            MethodFamily::DistanceBased => Srgb::new(92, 147, 205),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MethodFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// FamilyTally – per-family weight buckets
// ---------------------------------------------------------------------------

/// Accumulated edge weight toward (or from) each family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FamilyTally([u32; 3]);

impl FamilyTally {
    pub fn add(&mut self, family: MethodFamily, weight: u32) {
        self.0[family.index()] += weight;
    }

    pub fn get(&self, family: MethodFamily) -> u32 {
        self.0[family.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// The family with the largest weight, first in canonical order on ties.
    /// `None` when every bucket is zero.
    pub fn dominant(&self) -> Option<MethodFamily> {
        let mut best: Option<(MethodFamily, u32)> = None;
        for family in MethodFamily::CANONICAL {
            let w = self.get(family);
            if w == 0 {
                continue;
            }
            match best {
                Some((_, bw)) if bw >= w => {}
                _ => best = Some((family, w)),
            }
        }
        best.map(|(f, _)| f)
    }
}
