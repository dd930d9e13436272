use super::*;

#[test]
fn builder_requires_a_size() {
    assert!(matches!(Mask::builder().build(), Err(EditError::Configuration(_))));
    assert!(matches!(
        Mask::builder().width(10).build(),
        Err(EditError::Configuration(_))
    ));
    let m = Mask::builder().width(10).height(6).build().unwrap();
    assert_eq!(m.size(), Size::new(10, 6));
    assert_eq!(m.antialias(), DEFAULT_ANTIALIAS);
    assert!(m.surface().pixels().all(|p| p.0[3] == 0));
}

#[test]
fn zero_antialias_is_rejected() {
    let err = Mask::builder().size((4, 4)).antialias(0).build().unwrap_err();
    assert!(matches!(err, EditError::Validation(_)));
}

#[tokio::test]
async fn ellipse_paints_the_center_opaque() {
    let mut m = Mask::new((40, 40)).unwrap();
    m.ellipse((0.0, 0.0), 40.0, 40.0, None, 1.0).await.unwrap();
    assert_eq!(m.surface().dimensions(), (40, 40));
    assert_eq!(m.surface().get_pixel(20, 20).0[3], 255);
    assert_eq!(m.surface().get_pixel(0, 0).0[3], 0);
    assert_eq!(m.surface().get_pixel(39, 39).0[3], 0);
}

#[tokio::test]
async fn antialias_one_matches_direct_size() {
    let mut m = Mask::builder().size((20, 10)).antialias(1).build().unwrap();
    m.ellipse((0.0, 0.0), 20.0, 10.0, None, 1.0).await.unwrap();
    assert_eq!(m.surface().dimensions(), (20, 10));
    assert_eq!(m.surface().get_pixel(10, 5).0[3], 255);
}

#[tokio::test]
async fn use_on_image_rejects_size_mismatch() {
    let m = Mask::new((8, 8)).unwrap();
    let err = m
        .use_on_image(RgbaImage::new(4, 4))
        .await
        .unwrap_err();
    assert!(matches!(err, EditError::Validation(_)));
}
