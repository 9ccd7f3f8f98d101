use super::*;

fn png_bytes(rgba: Vec<u8>, w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(vec![100u8, 50u8, 200u8, 128u8], 1, 1);
    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width(), 1);
    assert_eq!(prepared.height(), 1);
    assert_eq!(
        prepared.data(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_garbage_is_an_error() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn format_selection_by_extension() {
    assert_eq!(OutputFormat::from_extension("GIF"), Some(OutputFormat::Gif));
    assert_eq!(OutputFormat::from_extension(".jpeg"), Some(OutputFormat::Jpeg));
    assert_eq!(OutputFormat::from_extension("jpg"), Some(OutputFormat::Jpeg));
    assert_eq!(OutputFormat::from_extension("png"), Some(OutputFormat::Png));
    assert_eq!(OutputFormat::from_extension("bmp"), None);
    assert_eq!(OutputFormat::default(), OutputFormat::Png);
}

#[test]
fn encode_then_decode_keeps_dimensions_for_every_format() {
    let bmp = Bitmap::filled(7, 3, Rgba8Premul::opaque(200, 10, 10)).unwrap();
    for format in [OutputFormat::Png, OutputFormat::Gif, OutputFormat::Jpeg] {
        let bytes = encode_image(&bmp, format, 90, Rgba8Premul::opaque(255, 255, 255)).unwrap();
        let back = decode_image(&bytes).unwrap();
        assert_eq!((back.width(), back.height()), (7, 3), "{format:?}");
    }
}

#[test]
fn png_roundtrip_is_lossless() {
    let mut bmp = Bitmap::filled(2, 2, Rgba8Premul::opaque(1, 2, 3)).unwrap();
    bmp.set_pixel(1, 1, [0, 0, 0, 0]);
    let bytes = encode_image(&bmp, OutputFormat::Png, 90, Rgba8Premul::transparent()).unwrap();
    assert_eq!(decode_image(&bytes).unwrap(), bmp);
}

#[test]
fn jpeg_flattens_transparency_onto_matte() {
    let bmp = Bitmap::new(8, 8).unwrap();
    let bytes = encode_image(&bmp, OutputFormat::Jpeg, 100, Rgba8Premul::opaque(255, 255, 255))
        .unwrap();
    let back = decode_image(&bytes).unwrap();
    let px = back.pixel(4, 4);
    assert!(px[0] > 240 && px[3] == 255);
}

#[test]
fn resize_reports_oversized_targets_as_allocation_errors() {
    let src = Bitmap::filled(2, 2, Rgba8Premul::opaque(10, 20, 30)).unwrap();
    let err = resize_premul(&src, u32::MAX, u32::MAX).unwrap_err();
    assert!(err.is_fatal());

    let up = resize_premul(&src, 4, 0).unwrap();
    assert_eq!((up.width(), up.height()), (4, 1));
    assert_eq!(up.pixel(3, 0), [10, 20, 30, 255]);
}
