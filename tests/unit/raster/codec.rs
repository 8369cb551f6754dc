use super::*;

#[test]
fn png_keeps_color_under_zero_alpha() {
    let mut buf = RasterBuffer::transparent(3, 2).unwrap();
    buf.set_pixel(0, 0, [200, 10, 30, 0]);
    buf.set_pixel(2, 1, [1, 2, 3, 128]);

    let png = encode_png(&buf).unwrap();
    let back = decode_image(&png).unwrap();
    assert_eq!(back, buf);
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_image(b"not an image").is_err());
}
