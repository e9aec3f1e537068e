use serde::Serialize;

use crate::config::TierCaps;
use crate::constants::benchmarks::{EXCELLENT, FAIR, GOOD, NEEDS_PRACTICE};
use crate::data::{Level, PracticeSentence, Purpose, TierBuckets};
use crate::errors::SeedError;

/// Sentences of one tier keyed by purpose.
///
/// `business` is always empty; it is reserved for hand-curated sentences
/// added in the front end.
#[derive(Debug, Serialize)]
pub struct PurposeSelection<'a> {
    /// Selected dataset sentences.
    pub conversation: &'a [PracticeSentence],
    /// Always empty.
    pub business: &'a [PracticeSentence],
}

/// Capped selection for all tiers, serialized as tier -> purpose -> sentences.
#[derive(Debug, Serialize)]
pub struct LevelSelection<'a> {
    /// Beginner selection.
    pub beginner: PurposeSelection<'a>,
    /// Intermediate selection.
    pub intermediate: PurposeSelection<'a>,
    /// Advanced selection.
    pub advanced: PurposeSelection<'a>,
}

impl LevelSelection<'_> {
    /// Number of sentences across tiers and purposes.
    pub fn len(&self) -> usize {
        [&self.beginner, &self.intermediate, &self.advanced]
            .iter()
            .map(|tier| tier.conversation.len() + tier.business.len())
            .sum()
    }

    /// True when no tier selected anything.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Take the leading `caps` sentences of each tier.
pub fn select<'a>(buckets: &'a TierBuckets, caps: &TierCaps) -> LevelSelection<'a> {
    let tier = move |level: Level| PurposeSelection {
        conversation: buckets.head(level, caps.for_level(level)),
        business: &[],
    };
    LevelSelection {
        beginner: tier(Level::Beginner),
        intermediate: tier(Level::Intermediate),
        advanced: tier(Level::Advanced),
    }
}

/// Render the TypeScript data module.
///
/// The header reports the number of classified sentences, not the capped
/// selection size.
pub fn render(
    buckets: &TierBuckets,
    caps: &TierCaps,
    source_label: &str,
) -> Result<String, SeedError> {
    let selection = select(buckets, caps);
    let data = serde_json::to_string_pretty(&selection)?;

    let levels = Level::ALL
        .iter()
        .map(|level| format!("'{level}'"))
        .collect::<Vec<_>>()
        .join(" | ");
    let purposes = [Purpose::Conversation, Purpose::Business]
        .iter()
        .map(|purpose| format!("'{purpose}'"))
        .collect::<Vec<_>>()
        .join(" | ");

    let mut out = String::new();
    out.push_str(&format!("// Generated from {source_label} dataset\n"));
    out.push_str(&format!("// Total sentences: {}\n\n", buckets.total()));
    out.push_str("export interface PracticeSentence {\n");
    out.push_str("  id: number;\n");
    out.push_str("  text: string;\n");
    out.push_str(&format!("  level: {levels};\n"));
    out.push_str(&format!("  purpose: {purposes};\n"));
    out.push_str("  target_accuracy: number;\n");
    out.push_str("  target_fluency: number;\n");
    out.push_str("  word_count: number;\n");
    out.push_str("  source: string;\n");
    out.push_str("}\n\n");
    out.push_str(
        "export const speechOceanSentences: Record<string, Record<string, PracticeSentence[]>> = ",
    );
    out.push_str(&data);
    out.push_str(";\n\n");
    out.push_str(&format!(
        "// Pronunciation grading thresholds ({source_label} based)\n"
    ));
    out.push_str("export const pronunciationBenchmarks = {\n");
    out.push_str(&format!("  excellent: {EXCELLENT}, // 90% and above\n"));
    out.push_str(&format!("  good: {GOOD}, // 80-89%\n"));
    out.push_str(&format!("  fair: {FAIR}, // 70-79%\n"));
    out.push_str(&format!("  needsPractice: {NEEDS_PRACTICE} // 60-69%\n"));
    out.push_str("};\n");
    Ok(out)
}
