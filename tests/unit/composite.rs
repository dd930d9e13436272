use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn premultiply_roundtrip_is_exact_for_opaque_and_clear() {
    let mut px = vec![12u8, 34, 56, 255, 99, 99, 99, 0];
    premultiply_in_place(&mut px);
    unpremultiply_in_place(&mut px);
    assert_eq!(px, vec![12, 34, 56, 255, 0, 0, 0, 0]);
}

#[test]
fn alpha_composite_keeps_base_where_top_is_clear() {
    let mut base = RgbaImage::from_pixel(2, 1, image::Rgba([255, 0, 0, 255]));
    let mut top = RgbaImage::new(2, 1);
    top.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));
    alpha_composite(&mut base, &top).unwrap();
    assert_eq!(base.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(base.get_pixel(1, 0).0, [0, 0, 255, 255]);
}

#[test]
fn premul_layer_skips_clear_layer_pixels() {
    let mut base = RgbaImage::from_pixel(2, 1, image::Rgba([200, 100, 50, 7]));
    let layer = vec![0, 0, 0, 0, 0, 0, 255, 255];
    composite_premul_layer(&mut base, &layer).unwrap();
    assert_eq!(base.get_pixel(0, 0).0, [200, 100, 50, 7]);
    assert_eq!(base.get_pixel(1, 0).0, [0, 0, 255, 255]);
}

#[test]
fn premul_layer_rejects_short_buffer() {
    let mut base = RgbaImage::new(2, 1);
    assert!(matches!(
        composite_premul_layer(&mut base, &[0, 0, 0, 0]),
        Err(EditError::Render(_))
    ));
}

#[test]
fn lerp_endpoints_and_midpoint() {
    let a = RgbaImage::from_pixel(2, 2, image::Rgba([0, 100, 200, 255]));
    let b = RgbaImage::from_pixel(2, 2, image::Rgba([200, 50, 0, 255]));
    assert_eq!(lerp(&a, &b, 0.0).unwrap(), a);
    assert_eq!(lerp(&a, &b, 1.0).unwrap(), b);
    let mid = lerp(&a, &b, 0.5).unwrap();
    assert_eq!(mid.get_pixel(1, 1).0, [100, 75, 100, 255]);
}

#[test]
fn lerp_rejects_mismatched_sizes() {
    let a = RgbaImage::new(2, 2);
    let b = RgbaImage::new(3, 2);
    assert!(matches!(lerp(&a, &b, 0.5), Err(EditError::Validation(_))));
}

#[test]
fn mask_through_clears_uncovered_pixels() {
    let src = RgbaImage::from_pixel(2, 1, image::Rgba([9, 8, 7, 255]));
    let out = mask_through(&src, &[255, 0]).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [9, 8, 7, 255]);
    assert_eq!(out.get_pixel(1, 0).0, [0, 0, 0, 0]);
}

#[test]
fn paste_clips_negative_offsets() {
    let mut layer = RgbaImage::new(3, 3);
    let img = RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]));
    paste_into(&mut layer, &img, -1, 2, None).unwrap();
    assert_eq!(layer.get_pixel(0, 2).0, [1, 2, 3, 255]);
    assert_eq!(layer.get_pixel(1, 2).0, [0, 0, 0, 0]);
    assert_eq!(layer.get_pixel(0, 1).0, [0, 0, 0, 0]);
}

#[test]
fn paste_mask_scales_alpha() {
    let mut layer = RgbaImage::new(1, 1);
    let img = RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 255]));
    let mask = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 0]));
    paste_into(&mut layer, &img, 0, 0, Some(&mask)).unwrap();
    assert_eq!(layer.get_pixel(0, 0).0[3], 0);
}
