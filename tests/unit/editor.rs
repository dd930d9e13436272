use super::*;

fn stripes(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, _| {
        let third = w / 3;
        if x < third {
            image::Rgba([255, 0, 0, 255])
        } else if x < 2 * third {
            image::Rgba([0, 128, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    })
}

fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba(px))
}

#[test]
fn shape_style_color_overrides_fill() {
    let s = ShapeStyle::default().fill(Color::RED);
    assert_eq!(s.fill_color(), Some(Color::RED));
    let s = s.color(Color::BLUE);
    assert_eq!(s.fill_color(), Some(Color::BLUE));
    assert_eq!(ShapeStyle::default().stroke_width, 1.0);
    assert_eq!(ShapeStyle::default().radius, 0.0);
}

#[test]
fn plain_resize_hits_exact_size() {
    let out = resize_surface(&stripes(300, 100), Size::new(50, 70), false).unwrap();
    assert_eq!(out.dimensions(), (50, 70));
}

#[test]
fn crop_resize_keeps_the_middle() {
    let out = resize_surface(&stripes(300, 100), Size::new(40, 40), true).unwrap();
    assert_eq!(out.dimensions(), (40, 40));
    for px in out.pixels() {
        assert!(px.0[0] <= 1 && px.0[2] <= 1, "{:?}", px.0);
        assert!(px.0[1].abs_diff(128) <= 1, "{:?}", px.0);
    }
}

#[test]
fn crop_resize_matches_plain_resize_at_same_aspect() {
    let src = stripes(90, 30);
    let a = resize_surface(&src, Size::new(45, 15), true).unwrap();
    let b = resize_surface(&src, Size::new(45, 15), false).unwrap();
    assert_eq!(a, b);
}

#[test]
fn resize_to_zero_is_rejected() {
    let err = resize_surface(&stripes(9, 9), Size::new(0, 3), false).unwrap_err();
    assert!(matches!(err, EditError::Validation(_)));
}

#[test]
fn full_turns_do_not_rotate() {
    let src = stripes(30, 10);
    assert_eq!(rotate_surface(&src, 360.0, true).unwrap(), src);
    assert_eq!(rotate_surface(&src, -720.0, false).unwrap(), src);
}

#[test]
fn quarter_turn_is_counter_clockwise() {
    let src = stripes(30, 10);
    let out = rotate_surface(&src, 90.0, true).unwrap();
    assert_eq!(out.dimensions(), (10, 30));
    // The right edge (blue) moves to the top.
    assert_eq!(out.get_pixel(5, 0).0, [0, 0, 255, 255]);
    assert_eq!(out.get_pixel(5, 29).0, [255, 0, 0, 255]);
}

#[test]
fn arbitrary_rotation_expands_or_clips() {
    let src = solid(20, 20, [10, 20, 30, 255]);
    let grown = rotate_surface(&src, 45.0, true).unwrap();
    assert_eq!(grown.dimensions(), (29, 29));
    assert_eq!(grown.get_pixel(0, 0).0[3], 0);

    let clipped = rotate_surface(&src, 45.0, false).unwrap();
    assert_eq!(clipped.dimensions(), (20, 20));
    assert_eq!(clipped.get_pixel(0, 0).0[3], 0);
    assert_eq!(clipped.get_pixel(10, 10).0[3], 255);
}

#[test]
fn paste_preserves_uncovered_alpha() {
    let base = solid(10, 10, [0, 0, 0, 0]);
    let patch = solid(4, 4, [255, 255, 255, 255]);
    let out = paste_surface(&base, ImageSource::from(patch), (8, 8), None).unwrap();
    assert_eq!(out.get_pixel(9, 9).0, [255, 255, 255, 255]);
    assert_eq!(out.get_pixel(7, 7).0, [0, 0, 0, 0]);
}

#[test]
fn paste_keeps_semi_transparent_base_outside_the_patch() {
    let base = solid(10, 10, [200, 100, 50, 40]);
    let patch = solid(2, 2, [10, 20, 30, 255]);
    let out = paste_surface(&base, ImageSource::from(patch), (8, 8), None).unwrap();
    assert_eq!(out.get_pixel(9, 9).0, [10, 20, 30, 255]);
    assert_eq!(out.get_pixel(1, 1).0, [200, 100, 50, 40]);
    assert_eq!(out.get_pixel(7, 9).0, [200, 100, 50, 40]);
}

#[test]
fn paste_mask_scales_alpha() {
    let base = solid(4, 4, [0, 0, 0, 255]);
    let patch = solid(4, 4, [255, 255, 255, 255]);
    let mut mask = solid(4, 4, [0, 0, 0, 0]);
    mask.put_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
    let out = paste_surface(
        &base,
        ImageSource::from(patch),
        (0, 0),
        Some(ImageSource::from(mask)),
    )
    .unwrap();
    assert_eq!(out.get_pixel(1, 1).0, [255, 255, 255, 255]);
    assert_eq!(out.get_pixel(2, 2).0, [0, 0, 0, 255]);
}

#[test]
fn export_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let err = export(
        &solid(2, 2, [1, 2, 3, 255]),
        &dir.path().join("x.nope"),
        ExportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, EditError::Export(_)), "{err}");
}

#[test]
fn export_rejects_unwritable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("x.png");
    let err = export(&solid(2, 2, [1, 2, 3, 255]), &path, ExportOptions::default()).unwrap_err();
    assert!(matches!(err, EditError::Export(_)), "{err}");
}

#[test]
fn export_jpeg_drops_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.jpg");
    export(
        &solid(8, 8, [200, 10, 10, 128]),
        &path,
        ExportOptions::default().quality(90),
    )
    .unwrap();
    let back = image::open(&path).unwrap();
    assert_eq!(back.color(), image::ColorType::Rgb8);
    assert_eq!((back.width(), back.height()), (8, 8));
}

#[tokio::test]
async fn image_bytes_are_a_rewound_png() {
    let editor = Editor::new(solid(3, 3, [5, 6, 7, 255])).unwrap();
    let bytes = editor.image_bytes().unwrap();
    assert_eq!(bytes.position(), 0);
    assert_eq!(&bytes.get_ref()[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn rounded_corners_clear_only_corners() {
    let mut e = Editor::new(solid(40, 40, [10, 200, 10, 255])).unwrap();
    e.rounded_corners(10.0, 2.0).await.unwrap();
    assert_eq!(e.surface().get_pixel(0, 0).0[3], 0);
    assert_eq!(e.surface().get_pixel(3, 3).0[3], 0);
    assert_eq!(e.surface().get_pixel(20, 20).0, [10, 200, 10, 255]);
    assert_eq!(e.surface().get_pixel(20, 0).0[3], 0);
    assert_eq!(e.surface().get_pixel(20, 3).0, [10, 200, 10, 255]);
}

#[tokio::test]
async fn bar_width_follows_percentage() {
    let mut e = Editor::new(solid(100, 10, [0, 0, 0, 0])).unwrap();
    e.bar(
        (0.0, 0.0),
        80.0,
        10.0,
        50.0,
        ShapeStyle::default().fill(Color::WHITE),
    )
    .await
    .unwrap();
    assert_eq!(e.surface().get_pixel(39, 5).0, [255, 255, 255, 255]);
    assert_eq!(e.surface().get_pixel(41, 5).0[3], 0);
}

#[tokio::test]
async fn outline_stays_inside_the_box() {
    let mut e = Editor::new(solid(30, 30, [0, 0, 0, 0])).unwrap();
    e.rectangle(
        (5.0, 5.0),
        20.0,
        20.0,
        ShapeStyle::default().outline(Color::RED).stroke_width(2.0),
    )
    .await
    .unwrap();
    let s = e.surface();
    assert_eq!(s.get_pixel(5, 15).0, [255, 0, 0, 255]);
    assert_eq!(s.get_pixel(6, 15).0, [255, 0, 0, 255]);
    assert_eq!(s.get_pixel(4, 15).0[3], 0);
    assert_eq!(s.get_pixel(15, 15).0[3], 0);
    assert_eq!(s.get_pixel(24, 15).0, [255, 0, 0, 255]);
    assert_eq!(s.get_pixel(25, 15).0[3], 0);
}

#[tokio::test]
async fn invalid_stroke_is_rejected_before_work() {
    let mut e = Editor::new(solid(4, 4, [0, 0, 0, 0])).unwrap();
    let err = e
        .ellipse((0.0, 0.0), 4.0, 4.0, ShapeStyle::default().stroke_width(f64::NAN))
        .await
        .unwrap_err();
    assert!(matches!(err, EditError::Validation(_)));
}

#[tokio::test]
async fn operations_replace_but_never_write_the_shared_source() {
    let canvas = crate::canvas::Canvas::new((6, 6), Some(Color::WHITE)).unwrap();
    let mut e = Editor::new(&canvas).unwrap();
    e.blur(BlurMode::Box, 1.0)
        .await
        .unwrap()
        .rectangle((0.0, 0.0), 3.0, 3.0, ShapeStyle::default().color(Color::BLACK))
        .await
        .unwrap();
    assert!(canvas.surface().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    assert_eq!(e.surface().get_pixel(1, 1).0, [0, 0, 0, 255]);
}
