//! Offset pass generation from medial axis samples.

use super::medial_axis::{MedialAxisSample, MedialAxisSegment};
use millpath_core::{Pass, PassMetadata, PassStrategy};
use tracing::debug;

/// Emit a pass at every medial sample where the tool fits.
///
/// A sample qualifies when `radius > tool_radius`; its engagement is
/// `min(radius - tool_radius, max_engagement)`. Samples where the tool does
/// not fit are skipped, which is expected near boundary edges.
pub fn generate_offset_passes(
    medial_axis: &[MedialAxisSegment],
    tool_radius: f64,
    max_engagement: f64,
) -> Vec<Pass> {
    let mut passes = Vec::new();
    let mut skipped = 0usize;

    for segment in medial_axis {
        for (sample_index, sample) in segment.samples.iter().enumerate() {
            match offset_pass(
                sample,
                tool_radius,
                max_engagement,
                PassStrategy::MedialOffset,
                segment.edge_index,
                sample_index,
            ) {
                Some(pass) => passes.push(pass),
                None => skipped += 1,
            }
        }
    }

    debug!(
        "Generated {} offset passes, skipped {} samples narrower than tool radius {}",
        passes.len(),
        skipped,
        tool_radius
    );
    passes
}

/// Same rule as [`generate_offset_passes`] for a list of skeleton samples.
pub fn generate_skeleton_passes(
    skeleton: &[MedialAxisSample],
    tool_radius: f64,
    max_engagement: f64,
) -> Vec<Pass> {
    skeleton
        .iter()
        .enumerate()
        .filter_map(|(i, sample)| {
            offset_pass(
                sample,
                tool_radius,
                max_engagement,
                PassStrategy::InteriorSkeleton,
                i,
                0,
            )
        })
        .collect()
}

fn offset_pass(
    sample: &MedialAxisSample,
    tool_radius: f64,
    max_engagement: f64,
    strategy: PassStrategy,
    segment: usize,
    sample_index: usize,
) -> Option<Pass> {
    if sample.radius <= tool_radius {
        return None;
    }
    let engagement = (sample.radius - tool_radius).min(max_engagement).max(0.0);
    let metadata = PassMetadata {
        strategy,
        segment,
        sample: sample_index,
        clearance: sample.radius,
    };
    Some(Pass::new(sample.position(), metadata).with_engagement(engagement))
}
