//! Placement of content within its measure using filler areas.
//!
//! [§ 10.2.51 tts:textAlign](https://www.w3.org/TR/ttml2/#style-attribute-textAlign)
//! [§ 10.2.20 tts:displayAlign](https://www.w3.org/TR/ttml2/#style-attribute-displayAlign)
//!
//! Leftover space in a line becomes inline fillers, leftover space in a
//! block becomes block fillers. Negative leftover space is recorded as
//! overflow and nothing is inserted.

use kumihan_area::geometry::EPSILON;
use kumihan_area::{Area, AreaError, AreaId, AreaKind, AreaTree, Expansion, Geometry};
use kumihan_common::{Dimension, Direction, WritingMode};
use kumihan_text::style::{BlockAlignment, InlineAlignment};

/// Resolve LEFT and RIGHT to START and END for a paragraph at `level`.
#[must_use]
pub fn relativize(alignment: InlineAlignment, writing_mode: WritingMode, level: u8) -> InlineAlignment {
    let reversed = writing_mode.direction(Dimension::Ipd) == Direction::Rl || level % 2 == 1;
    match alignment {
        InlineAlignment::Left if reversed => InlineAlignment::End,
        InlineAlignment::Left => InlineAlignment::Start,
        InlineAlignment::Right if reversed => InlineAlignment::Start,
        InlineAlignment::Right => InlineAlignment::End,
        other => other,
    }
}

/// Advance of an inline area along its line.
fn advance(area: &Area) -> f64 {
    match &area.kind {
        AreaKind::Glyph(g) if g.mapping.combination.is_combining() && area.geometry.writing_mode.is_vertical() => {
            area.allocation_bpd()
        }
        _ => area.allocation_ipd(),
    }
}

/// The children of `line` that take up room, each with the first area of
/// its group (annotations sit just before their base) and its advance.
fn groups(tree: &AreaTree, line: AreaId) -> Result<Vec<(AreaId, f64)>, AreaError> {
    let mut groups = Vec::new();
    let mut first = None;
    for &child in tree.children(line) {
        let area = tree.get(child)?;
        if matches!(area.kind, AreaKind::Annotation(_)) {
            if first.is_none() {
                first = Some(child);
            }
            continue;
        }
        groups.push((first.take().unwrap_or(child), advance(area)));
    }
    Ok(groups)
}

fn filler(tree: &mut AreaTree, parent: AreaId, kind: AreaKind, ipd: f64, bpd: f64) -> Result<AreaId, AreaError> {
    let geometry = &tree.get(parent)?.geometry;
    let geometry = Geometry::new(geometry.writing_mode, ipd, bpd, geometry.bidi_level);
    Ok(tree.add(Area::new(kind, geometry, None)))
}

/// Insert an inline filler of `amount` before `before`, or at the end.
fn place_inline(tree: &mut AreaTree, line: AreaId, before: Option<AreaId>, amount: f64) -> Result<(), AreaError> {
    let f = filler(tree, line, AreaKind::InlineFiller, amount, 0.0)?;
    tree.insert_child(line, f, before, Expansion::EXPAND_IPD)
}

/// Insert a block filler of `amount` before `before`, or at the end.
fn place_block(
    tree: &mut AreaTree,
    block: AreaId,
    before: Option<AreaId>,
    amount: f64,
    expansion: Expansion,
) -> Result<(), AreaError> {
    let f = filler(tree, block, AreaKind::BlockFiller, 0.0, amount)?;
    tree.insert_child(block, f, before, expansion)
}

fn record_overflow(tree: &mut AreaTree, id: AreaId, overflow: f64) -> Result<(), AreaError> {
    tree.get_mut(id)?.geometry.overflow = overflow;
    Ok(())
}

/// Distribute the room left in `line` within `measure` per `alignment`.
///
/// # Errors
///
/// [`AreaError::UnknownArea`] for a line not in `tree`.
pub fn align_inline(
    tree: &mut AreaTree,
    line: AreaId,
    measure: f64,
    alignment: InlineAlignment,
) -> Result<(), AreaError> {
    let groups = groups(tree, line)?;
    let consumed: f64 = groups.iter().map(|g| g.1).sum();
    let available = measure - consumed;
    if available < -EPSILON {
        return record_overflow(tree, line, -available);
    }
    let Some(&(first, _)) = groups.first() else {
        return Ok(());
    };
    if available < EPSILON {
        return Ok(());
    }
    let n = groups.len();
    match alignment {
        InlineAlignment::End | InlineAlignment::Right => place_inline(tree, line, Some(first), available),
        InlineAlignment::Center => {
            place_inline(tree, line, Some(first), available / 2.0)?;
            place_inline(tree, line, None, available / 2.0)
        }
        InlineAlignment::Justify | InlineAlignment::SpaceBetween if n > 1 => {
            #[allow(clippy::cast_precision_loss)]
            let gap = available / (n - 1) as f64;
            for &(start, _) in &groups[1..] {
                place_inline(tree, line, Some(start), gap)?;
            }
            Ok(())
        }
        InlineAlignment::SpaceAround => {
            #[allow(clippy::cast_precision_loss)]
            let gap = available / (n + 1) as f64;
            for &(start, _) in &groups {
                place_inline(tree, line, Some(start), gap)?;
            }
            place_inline(tree, line, None, gap)
        }
        InlineAlignment::Start
        | InlineAlignment::Left
        | InlineAlignment::Auto
        | InlineAlignment::WithBase
        | InlineAlignment::Justify
        | InlineAlignment::SpaceBetween => place_inline(tree, line, None, available),
    }
}

/// Align each line to the widest of them, whose IPD they all take.
///
/// # Errors
///
/// [`AreaError::UnknownArea`] for a line not in `tree`.
pub fn align_lines(tree: &mut AreaTree, lines: &[AreaId], alignment: InlineAlignment) -> Result<(), AreaError> {
    let mut measure = 0.0_f64;
    for &line in lines {
        measure = measure.max(tree.get(line)?.ipd());
    }
    for &line in lines {
        align_inline(tree, line, measure, alignment)?;
        tree.get_mut(line)?.geometry.ipd = measure;
    }
    Ok(())
}

/// Align an annotation line to its base of `base_advance`, whose
/// characters advance by `base_advances`.
///
/// `Auto` becomes `WithBase` when annotation and base have as many parts,
/// `SpaceBetween` when the annotation has fewer (`SpaceAround` for a single
/// part) and `Center` when it has more. `WithBase` centers each part over its
/// base character.
///
/// # Errors
///
/// [`AreaError::UnknownArea`] for an annotation not in `tree`.
pub fn align_annotation(
    tree: &mut AreaTree,
    annotation: AreaId,
    base_advance: f64,
    base_advances: &[f64],
) -> Result<(), AreaError> {
    let groups = groups(tree, annotation)?;
    let (na, nb) = (groups.len(), base_advances.len());
    let specified = tree
        .get(annotation)?
        .kind
        .line()
        .map_or(InlineAlignment::Auto, |l| l.alignment);
    let alignment = match specified {
        InlineAlignment::Auto if na == nb => InlineAlignment::WithBase,
        InlineAlignment::Auto if na < nb && na > 1 => InlineAlignment::SpaceBetween,
        InlineAlignment::Auto if na < nb => InlineAlignment::SpaceAround,
        InlineAlignment::Auto => InlineAlignment::Center,
        InlineAlignment::WithBase if na != nb => InlineAlignment::Center,
        other => other,
    };
    if let Some(line) = tree.get_mut(annotation)?.kind.line_mut() {
        line.alignment = alignment;
    }
    if alignment != InlineAlignment::WithBase {
        return align_inline(tree, annotation, base_advance, alignment);
    }

    let mut overflow = 0.0;
    for (k, (&(first, advance), &base)) in groups.iter().zip(base_advances).enumerate() {
        let gap = base - advance;
        if gap < -EPSILON {
            overflow -= gap;
            continue;
        }
        if gap < EPSILON {
            continue;
        }
        let next = groups.get(k + 1).map(|g| g.0);
        place_inline(tree, annotation, Some(first), gap / 2.0)?;
        place_inline(tree, annotation, next, gap / 2.0)?;
    }
    if overflow > 0.0 {
        record_overflow(tree, annotation, overflow)?;
    }
    Ok(())
}

/// Spread the lines of a paragraph block over `measure` for the justifying
/// display alignments. The others are applied to the region as a whole.
///
/// # Errors
///
/// [`AreaError::UnknownArea`] for a block not in `tree`.
pub fn justify_lines(
    tree: &mut AreaTree,
    block: AreaId,
    measure: f64,
    alignment: BlockAlignment,
) -> Result<(), AreaError> {
    let lines = tree.children(block).to_vec();
    let n = lines.len();
    let available = measure - tree.get(block)?.bpd();
    if available < EPSILON || n == 0 {
        return Ok(());
    }
    match alignment {
        BlockAlignment::Justify | BlockAlignment::SpaceBetween if n > 1 => {
            #[allow(clippy::cast_precision_loss)]
            let gap = available / (n - 1) as f64;
            for &line in &lines[1..] {
                place_block(tree, block, Some(line), gap, Expansion::EXPAND_LINE)?;
            }
        }
        BlockAlignment::SpaceAround => {
            #[allow(clippy::cast_precision_loss)]
            let gap = available / (n + 1) as f64;
            for &line in &lines {
                place_block(tree, block, Some(line), gap, Expansion::EXPAND_LINE)?;
            }
            place_block(tree, block, None, gap, Expansion::EXPAND_LINE)?;
        }
        BlockAlignment::Before
        | BlockAlignment::Center
        | BlockAlignment::After
        | BlockAlignment::Justify
        | BlockAlignment::SpaceBetween => {}
    }
    Ok(())
}

/// Place the blocks of `region` along its block progression.
///
/// # Errors
///
/// [`AreaError::UnknownArea`] for a region not in `tree`.
pub fn align_blocks(tree: &mut AreaTree, region: AreaId, alignment: BlockAlignment) -> Result<(), AreaError> {
    let children = tree.children(region).to_vec();
    let consumed = children
        .iter()
        .map(|&c| tree.get(c).map(Area::allocation_bpd))
        .sum::<Result<f64, AreaError>>()?;
    let available = tree.get(region)?.bpd() - consumed;
    if available < -EPSILON {
        return record_overflow(tree, region, -available);
    }
    if available < EPSILON {
        return Ok(());
    }
    let first = children.first().copied();
    match alignment {
        BlockAlignment::After => place_block(tree, region, first, available, Expansion::NONE),
        BlockAlignment::Center => {
            place_block(tree, region, first, available / 2.0, Expansion::NONE)?;
            place_block(tree, region, None, available / 2.0, Expansion::NONE)
        }
        BlockAlignment::Before
        | BlockAlignment::Justify
        | BlockAlignment::SpaceAround
        | BlockAlignment::SpaceBetween => place_block(tree, region, None, available, Expansion::NONE),
    }
}
