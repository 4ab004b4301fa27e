//! Integration tests for writing-mode geometry.

use std::str::FromStr;

use kumihan_common::{Axis, Dimension, Direction, Extent, WritingMode};
use quickcheck_macros::quickcheck;

// ---------------------------------------------------------------------------
// Writing modes
// ---------------------------------------------------------------------------

#[test]
fn test_horizontal_modes_map_ipd_to_width() {
    for wm in [WritingMode::Lrtb, WritingMode::Rltb] {
        assert_eq!(wm.axis(Dimension::Ipd), Axis::Horizontal);
        assert_eq!(wm.axis(Dimension::Bpd), Axis::Vertical);
    }
}

#[test]
fn test_vertical_modes_map_ipd_to_height() {
    for wm in [WritingMode::Tbrl, WritingMode::Tblr] {
        assert_eq!(wm.axis(Dimension::Ipd), Axis::Vertical);
        assert_eq!(wm.axis(Dimension::Bpd), Axis::Horizontal);
    }
}

#[test]
fn test_directions() {
    assert_eq!(WritingMode::Lrtb.direction(Dimension::Ipd), Direction::Lr);
    assert_eq!(WritingMode::Rltb.direction(Dimension::Ipd), Direction::Rl);
    assert_eq!(WritingMode::Tbrl.direction(Dimension::Ipd), Direction::Tb);
    assert_eq!(WritingMode::Tbrl.direction(Dimension::Bpd), Direction::Rl);
    assert_eq!(WritingMode::Tblr.direction(Dimension::Bpd), Direction::Lr);
    assert_eq!(WritingMode::Lrtb.direction(Dimension::Bpd), Direction::Tb);
}

#[test]
fn test_parse_writing_mode_keywords() {
    assert_eq!(WritingMode::from_str("lrtb").ok(), Some(WritingMode::Lrtb));
    assert_eq!(WritingMode::from_str("RL").ok(), Some(WritingMode::Rltb));
    assert_eq!(WritingMode::from_str("tb").ok(), Some(WritingMode::Tbrl));
    assert_eq!(WritingMode::from_str("tblr").ok(), Some(WritingMode::Tblr));
    assert!(WritingMode::from_str("sideways").is_err());
}

#[test]
fn test_default_bidi_level() {
    assert_eq!(WritingMode::Lrtb.default_bidi_level(), 0);
    assert_eq!(WritingMode::Rltb.default_bidi_level(), 1);
    assert_eq!(WritingMode::Tbrl.default_bidi_level(), 0);
}

// ---------------------------------------------------------------------------
// Extents
// ---------------------------------------------------------------------------

#[test]
fn test_extent_dimension_and_scale() {
    let e = Extent::new(24.0, 30.0);
    assert_eq!(e.dimension(Axis::Horizontal), 24.0);
    assert_eq!(e.dimension(Axis::Vertical), 30.0);
    assert!(e.is_anamorphic());
    assert_eq!(e.scaled(0.5), Extent::new(12.0, 15.0));
}

#[quickcheck]
fn prop_cross_twice_is_identity(vertical: bool, cross: bool) -> bool {
    let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };
    axis.cross(cross).cross(cross) == axis
}
