use super::*;

#[test]
fn matching_aspect_needs_no_crop() {
    assert_eq!(crop_box_for_aspect(Size::new(300, 200), Size::new(150, 100)), None);
    assert_eq!(crop_box_for_aspect(Size::new(64, 64), Size::new(10, 10)), None);
}

#[test]
fn wider_source_is_trimmed_left_and_right() {
    let b = crop_box_for_aspect(Size::new(400, 100), Size::new(100, 100)).unwrap();
    assert_eq!(
        b,
        CropBox {
            x: 150,
            y: 0,
            width: 100,
            height: 100
        }
    );
}

#[test]
fn taller_source_is_trimmed_top_and_bottom() {
    let b = crop_box_for_aspect(Size::new(100, 300), Size::new(200, 100)).unwrap();
    assert_eq!(
        b,
        CropBox {
            x: 0,
            y: 125,
            width: 100,
            height: 50
        }
    );
}

#[test]
fn rotated_bounds_quarter_turn_swaps() {
    assert_eq!(rotated_bounds(Size::new(40, 10), 90.0), Size::new(10, 40));
    assert_eq!(rotated_bounds(Size::new(40, 10), 180.0), Size::new(40, 10));
}

#[test]
fn rotated_bounds_diagonal_grows() {
    let s = rotated_bounds(Size::new(10, 10), 45.0);
    assert_eq!(s, Size::new(15, 15));
}

#[test]
fn arc_normalization() {
    assert_eq!(normalize_arc(-90.0, 270.0), (270.0, 360.0));
    assert_eq!(normalize_arc(0.0, 90.0), (0.0, 90.0));
    assert_eq!(normalize_arc(300.0, 30.0), (300.0, 90.0));
    assert_eq!(normalize_arc(-90.0, -90.0), (270.0, 0.0));
}

#[test]
fn progress_arc_full_is_full_turn() {
    let (s, e) = progress_arc(100.0);
    assert_eq!(normalize_arc(s, e).1, 360.0);
    let (s, e) = progress_arc(25.0);
    assert_eq!(normalize_arc(s, e), (270.0, 90.0));
}

#[test]
fn bar_width_scales_by_percentage() {
    assert_eq!(bar_width(650.0, 50.0), 325.0);
    assert_eq!(bar_width(600.0, 0.0), 0.0);
}
