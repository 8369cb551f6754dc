use super::*;

#[test]
fn clear_premultiplies_the_colour() {
    let mut f = FrameRGBA::new(2, 2).unwrap();
    f.clear([255, 0, 100, 128]);
    assert_eq!(f.pixel(1, 1), Some([128, 0, 50, 128]));
    assert_eq!(f.pixel(2, 0), None);
}

#[test]
fn to_raster_unpremultiplies() {
    let mut f = FrameRGBA::new(3, 1).unwrap();
    f.data = vec![128, 0, 50, 128, 9, 9, 9, 255, 0, 0, 0, 0];
    let r = f.to_raster().unwrap();
    assert_eq!(r.pixel(0, 0), Some([255, 0, 100, 128]));
    assert_eq!(r.pixel(1, 0), Some([9, 9, 9, 255]));
    assert_eq!(r.pixel(2, 0), Some([0, 0, 0, 0]));

    f.premultiplied = false;
    assert_eq!(f.to_raster().unwrap().pixel(0, 0), Some([128, 0, 50, 128]));
}

#[test]
fn oversized_frame_is_rejected() {
    assert!(FrameRGBA::new(u32::MAX, u32::MAX).is_err());
}
