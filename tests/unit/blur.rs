use super::*;

#[test]
fn zero_amount_is_identity() {
    let src = RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8 * 40, y as u8 * 90, 7, 255]));
    assert_eq!(blur_image(&src, BlurMode::Gaussian, 0.0).unwrap(), src);
    assert_eq!(blur_image(&src, BlurMode::Box, 0.0).unwrap(), src);
}

#[test]
fn constant_image_is_unchanged() {
    let src = RgbaImage::from_pixel(6, 5, image::Rgba([10, 20, 30, 255]));
    assert_eq!(blur_image(&src, BlurMode::Gaussian, 2.0).unwrap(), src);
    assert_eq!(blur_image(&src, BlurMode::Box, 1.5).unwrap(), src);
}

#[test]
fn gaussian_spreads_energy_from_single_pixel() {
    let (w, h) = (7u32, 7u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((3 * w + 3) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let kernel = gaussian_kernel_q16(2, 1.0).unwrap();
    let out = blur_rgba8_premul_q16(&src, w, h, &kernel).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);

    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 6);
}

#[test]
fn box_kernel_is_uniform_for_integer_radius() {
    let k = box_kernel_q16(1.0).unwrap();
    assert_eq!(k.len(), 3);
    assert_eq!(k.iter().sum::<u32>(), 65536);
    assert!(k[0].abs_diff(k[2]) == 0);
    assert!(k[0].abs_diff(k[1]) <= 1);
}

#[test]
fn box_kernel_fractional_radius_weights_edges() {
    let k = box_kernel_q16(1.5).unwrap();
    assert_eq!(k.len(), 5);
    assert!(k[0] < k[1]);
    assert_eq!(k.iter().sum::<u32>(), 65536);
}

#[test]
fn rejects_negative_amount() {
    let src = RgbaImage::new(1, 1);
    assert!(matches!(
        blur_image(&src, BlurMode::Box, -1.0),
        Err(EditError::Validation(_))
    ));
}

#[test]
fn mode_parses_from_str() {
    assert_eq!("box".parse::<BlurMode>().unwrap(), BlurMode::Box);
    assert_eq!("Gaussian".parse::<BlurMode>().unwrap(), BlurMode::Gaussian);
    assert!("median".parse::<BlurMode>().is_err());
}
