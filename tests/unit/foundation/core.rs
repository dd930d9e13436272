use super::*;

#[test]
fn width_and_height_win_over_size() {
    let s = resolve_size(Some(Size::new(1, 1)), Some(200), Some(100)).unwrap();
    assert_eq!(s, Size::new(200, 100));
}

#[test]
fn size_used_when_pair_incomplete() {
    let s = resolve_size(Some(Size::new(30, 40)), Some(200), None).unwrap();
    assert_eq!(s, Size::new(30, 40));
}

#[test]
fn nothing_resolvable_is_configuration_error() {
    assert!(matches!(
        resolve_size(None, None, None),
        Err(EditError::Configuration(_))
    ));
    assert!(matches!(
        resolve_size(None, Some(10), None),
        Err(EditError::Configuration(_))
    ));
}

#[test]
fn zero_dimension_is_configuration_error() {
    assert!(matches!(
        resolve_size(Some(Size::new(0, 5)), None, None),
        Err(EditError::Configuration(_))
    ));
}

#[test]
fn aspect_of_landscape() {
    assert!((Size::new(300, 200).aspect() - 1.5).abs() < 1e-12);
}
