//! Visual reordering of the inline areas of a line.
//!
//! [UAX #9 § 3.4 Reordering Resolved Levels](https://www.unicode.org/reports/tr9/#Reordering_Resolved_Levels)
//!
//! > From the highest level found in the text to the lowest odd level on
//! > each line, reverse any contiguous sequence of characters that are at
//! > that level or higher.
//!
//! Levels were resolved per character when the phrase was collected; each
//! inline area carries the level of its text. Reordering works on areas,
//! with annotations travelling alongside the base that follows them. Lines
//! progressing right to left are reversed once more as a whole, so that
//! children always run along the inline progression direction.

use kumihan_area::{AreaError, AreaId, AreaKind, AreaTree};
use kumihan_common::{Dimension, Direction};

/// Visual order of items at `levels`: the item indices in display order,
/// and how often each item (by original index) was reversed.
#[must_use]
pub fn visual_order(levels: &[u8]) -> (Vec<usize>, Vec<u32>) {
    let mut order: Vec<usize> = (0..levels.len()).collect();
    let mut reversals = vec![0; levels.len()];
    let (Some(&min), Some(&max)) = (levels.iter().min(), levels.iter().max()) else {
        return (order, reversals);
    };
    let lowest_odd = min | 1;
    let mut level = max;
    while level >= lowest_odd {
        let mut i = 0;
        while i < order.len() {
            if levels[order[i]] < level {
                i += 1;
                continue;
            }
            let start = i;
            while i < order.len() && levels[order[i]] >= level {
                reversals[order[i]] += 1;
                i += 1;
            }
            order[start..i].reverse();
        }
        level -= 1;
    }
    (order, reversals)
}

/// Reorder the children of `line` for display and reverse their glyphs as
/// needed.
///
/// # Errors
///
/// [`AreaError::UnknownArea`] for a line not in `tree`.
pub fn reorder(tree: &mut AreaTree, line: AreaId) -> Result<(), AreaError> {
    let rl = tree.get(line)?.geometry.writing_mode.direction(Dimension::Ipd) == Direction::Rl;

    let mut groups: Vec<Vec<AreaId>> = Vec::new();
    let mut levels = Vec::new();
    let mut pending = Vec::new();
    for &child in tree.children(line) {
        let area = tree.get(child)?;
        pending.push(child);
        if !matches!(area.kind, AreaKind::Annotation(_)) {
            levels.push(area.geometry.bidi_level);
            groups.push(std::mem::take(&mut pending));
        }
    }
    if !pending.is_empty() {
        levels.push(tree.get(line)?.geometry.bidi_level);
        groups.push(pending);
    }
    if !rl && levels.iter().all(|&l| l == 0) {
        return Ok(());
    }

    let (mut order, mut reversals) = visual_order(&levels);
    if rl {
        order.reverse();
        for r in &mut reversals {
            *r += 1;
        }
    }

    let mut children = Vec::with_capacity(tree.children(line).len());
    for &g in &order {
        for &id in &groups[g] {
            for _ in 0..reversals[g] {
                tree.reverse(id)?;
            }
            tree.maybe_reverse_glyphs(id, true)?;
            children.push(id);
        }
    }
    tree.reorder_children(line, &children)
}
