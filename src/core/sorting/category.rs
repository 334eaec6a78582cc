use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SortError;

/// Labels of the garbage classifier, in model output order
pub const CLASS_LABELS: [&str; 12] = [
    "一次性杯子",
    "卫生纸",
    "口罩",
    "指甲油",
    "易拉罐",
    "杀虫剂",
    "果皮",
    "水果",
    "瓶子",
    "纸袋",
    "过期药物",
    "食物",
];

const KITCHEN_LABELS: [&str; 3] = ["果皮", "水果", "食物"];
const RECYCLABLE_LABELS: [&str; 3] = ["瓶子", "纸袋", "易拉罐"];
const HAZARDOUS_LABELS: [&str; 3] = ["杀虫剂", "过期药物", "指甲油"];

/// Disposal bins an item can be sorted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarbageCategory {
    Recyclable,
    Hazardous,
    Kitchen,
    Other,
}

impl GarbageCategory {
    /// Folder name of the bin under the output directory
    pub fn key(&self) -> &'static str {
        match self {
            GarbageCategory::Recyclable => "recyclable",
            GarbageCategory::Hazardous => "hazardous",
            GarbageCategory::Kitchen => "kitchen",
            GarbageCategory::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GarbageCategory::Recyclable => "可回收物",
            GarbageCategory::Hazardous => "有害垃圾",
            GarbageCategory::Kitchen => "厨余垃圾",
            GarbageCategory::Other => "其他垃圾",
        }
    }

    /// Accent color of the bin as `#RRGGBB`
    pub fn color_hex(&self) -> &'static str {
        match self {
            GarbageCategory::Recyclable => "#1E40AF",
            GarbageCategory::Hazardous => "#991B1B",
            GarbageCategory::Kitchen => "#065F46",
            GarbageCategory::Other => "#92400E",
        }
    }

    pub fn from_key(key: &str) -> Option<GarbageCategory> {
        Self::all().into_iter().find(|c| c.key() == key)
    }

    /// All bins in display order
    pub fn all() -> [GarbageCategory; 4] {
        [
            GarbageCategory::Recyclable,
            GarbageCategory::Hazardous,
            GarbageCategory::Kitchen,
            GarbageCategory::Other,
        ]
    }
}

impl fmt::Display for GarbageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for GarbageCategory {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GarbageCategory::from_key(&s.to_lowercase())
            .ok_or_else(|| SortError::UnknownCategory(s.to_string()))
    }
}

/// Map a classifier label to its bin. Unknown labels go to `Other`.
pub fn categorize(label: &str) -> GarbageCategory {
    if KITCHEN_LABELS.contains(&label) {
        GarbageCategory::Kitchen
    } else if RECYCLABLE_LABELS.contains(&label) {
        GarbageCategory::Recyclable
    } else if HAZARDOUS_LABELS.contains(&label) {
        GarbageCategory::Hazardous
    } else {
        GarbageCategory::Other
    }
}

/// Pick the label with the highest classifier score.
///
/// `scores` must hold one finite value per entry of [`CLASS_LABELS`]. On a
/// tie the earlier label wins.
pub fn label_for_scores(scores: &[f32]) -> Result<&'static str, SortError> {
    if scores.len() != CLASS_LABELS.len() {
        return Err(SortError::ScoreCount {
            expected: CLASS_LABELS.len(),
            actual: scores.len(),
        });
    }
    if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
        return Err(SortError::NonFiniteScore(index));
    }

    let mut best = 0;
    for (index, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = index;
        }
    }
    Ok(CLASS_LABELS[best])
}

/// Arg-max over `scores` followed by the bin lookup
pub fn classify_scores(scores: &[f32]) -> Result<(&'static str, GarbageCategory), SortError> {
    let label = label_for_scores(scores)?;
    Ok((label, categorize(label)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_every_label() {
        let expected = [
            ("一次性杯子", GarbageCategory::Other),
            ("卫生纸", GarbageCategory::Other),
            ("口罩", GarbageCategory::Other),
            ("指甲油", GarbageCategory::Hazardous),
            ("易拉罐", GarbageCategory::Recyclable),
            ("杀虫剂", GarbageCategory::Hazardous),
            ("果皮", GarbageCategory::Kitchen),
            ("水果", GarbageCategory::Kitchen),
            ("瓶子", GarbageCategory::Recyclable),
            ("纸袋", GarbageCategory::Recyclable),
            ("过期药物", GarbageCategory::Hazardous),
            ("食物", GarbageCategory::Kitchen),
        ];
        assert_eq!(expected.len(), CLASS_LABELS.len());
        for (label, category) in expected {
            assert_eq!(categorize(label), category, "label {}", label);
        }
    }

    #[test]
    fn test_unknown_label_is_other() {
        assert_eq!(categorize("battery"), GarbageCategory::Other);
        assert_eq!(categorize(""), GarbageCategory::Other);
    }

    #[test]
    fn test_label_for_scores_argmax() {
        let mut scores = [0.01f32; 12];
        scores[8] = 0.9;
        assert_eq!(label_for_scores(&scores).unwrap(), "瓶子");
        assert_eq!(
            classify_scores(&scores).unwrap(),
            ("瓶子", GarbageCategory::Recyclable)
        );
    }

    #[test]
    fn test_label_for_scores_tie_takes_first() {
        let mut scores = [0.0f32; 12];
        scores[3] = 0.5;
        scores[10] = 0.5;
        assert_eq!(label_for_scores(&scores).unwrap(), "指甲油");
    }

    #[test]
    fn test_label_for_scores_rejects_bad_input() {
        assert!(matches!(
            label_for_scores(&[0.5, 0.5]),
            Err(SortError::ScoreCount { expected: 12, actual: 2 })
        ));
        let mut scores = [0.0f32; 12];
        scores[4] = f32::NAN;
        assert!(matches!(
            label_for_scores(&scores),
            Err(SortError::NonFiniteScore(4))
        ));
    }

    #[test]
    fn test_category_keys_roundtrip() {
        for category in GarbageCategory::all() {
            assert_eq!(GarbageCategory::from_key(category.key()), Some(category));
        }
        assert_eq!(GarbageCategory::from_key("metal"), None);
        assert_eq!("Hazardous".parse::<GarbageCategory>().unwrap(), GarbageCategory::Hazardous);
        assert!("metal".parse::<GarbageCategory>().is_err());
        assert_eq!(GarbageCategory::Kitchen.to_string(), "厨余垃圾");
    }
}
