use super::*;
use crate::segment::mask::MaskBuilder;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const INK: [u8; 4] = [180, 40, 60, 255];

fn subject() -> (RasterBuffer, CharacterMask) {
    let mut img = RasterBuffer::filled(60, 60, WHITE).unwrap();
    for y in 10..50 {
        for x in 10..50 {
            img.set_pixel(x, y, INK);
        }
    }
    let mask = MaskBuilder::default().build(&img);
    (img, mask)
}

fn alpha(layer: &Layer, x: u32, y: u32) -> u8 {
    layer.buffer.pixel(x, y).unwrap()[3]
}

#[test]
fn region_mode_is_zero_outside_mask_and_region() {
    let (img, mask) = subject();
    let ex = LayerExtractor::default();
    for t in LayerType::ALL {
        if t == LayerType::Background {
            continue;
        }
        let layer = ex.extract(&img, &mask, t, None).unwrap();
        let Region::Inside(rect) = RegionTable::region_for(t, mask.bounds) else {
            unreachable!();
        };
        let mut any = false;
        for y in 0..60 {
            for x in 0..60 {
                let a = alpha(&layer, x, y);
                let inside = f64::from(x) >= rect.x0
                    && f64::from(x) <= rect.x1
                    && f64::from(y) >= rect.y0
                    && f64::from(y) <= rect.y1;
                if !mask.is_foreground(x, y) || !inside {
                    assert_eq!(a, 0, "{t} at ({x},{y})");
                }
                any |= a > 0;
            }
        }
        assert_eq!(layer.has_content, any, "{t}");
        assert_eq!(layer.buffer.width(), 60);
        assert_eq!(layer.buffer.height(), 60);
    }
}

#[test]
fn edge_fade_ramps_up_to_ten_pixels() {
    let (img, mask) = subject();
    let layer = LayerExtractor::default()
        .extract(&img, &mask, LayerType::Body, None)
        .unwrap();
    // Body spans x 18..=42, y 24..=50 for these bounds; row 37 is far from the top/bottom.
    let row: Vec<u8> = (18..=30).map(|x| alpha(&layer, x, 37)).collect();
    assert!(row.windows(2).all(|w| w[0] <= w[1]), "{row:?}");
    assert_eq!(row[0], 0);
    assert!((126..=127).contains(&row[5]), "{row:?}");
    assert_eq!(row[10], 255);
    assert_eq!(row[12], 255);
    assert_eq!(layer.buffer.pixel(30, 37).unwrap(), INK);
}

#[test]
fn zero_fade_keeps_full_alpha() {
    let (img, mask) = subject();
    let ex = LayerExtractor::new(ExtractOpts {
        fade_px: 0.0,
        ..ExtractOpts::default()
    });
    let layer = ex.extract(&img, &mask, LayerType::Body, None).unwrap();
    assert_eq!(alpha(&layer, 19, 37), 255);
}

#[test]
fn background_is_the_mask_complement() {
    let (img, mask) = subject();
    let layer = LayerExtractor::default()
        .extract(&img, &mask, LayerType::Background, None)
        .unwrap();
    assert_eq!(layer.source, SourceRegion::OutsideMask);
    assert_eq!(layer.buffer.pixel(0, 0).unwrap(), WHITE);
    assert_eq!(alpha(&layer, 30, 30), 0);
    // Demoted mask corners count as background.
    assert_eq!(layer.buffer.pixel(10, 10).unwrap(), INK);
}

#[test]
fn degenerate_mask_empties_non_background_layers() {
    let img = RasterBuffer::filled(20, 20, WHITE).unwrap();
    let mask = MaskBuilder::default().build(&img);
    let ex = LayerExtractor::default();

    let head = ex.extract(&img, &mask, LayerType::Head, None).unwrap();
    assert!(!head.has_content);
    assert_eq!(head.source, SourceRegion::Empty);

    let bg = ex.extract(&img, &mask, LayerType::Background, None).unwrap();
    assert!(bg.has_content);
}

#[test]
fn mismatched_mask_is_a_validation_error() {
    let (img, _) = subject();
    let other = MaskBuilder::default().build(&RasterBuffer::filled(10, 10, WHITE).unwrap());
    let err = LayerExtractor::default()
        .extract(&img, &other, LayerType::Head, None)
        .unwrap_err();
    assert!(matches!(err, AutorigError::Validation(_)));
}

#[test]
fn keypoint_mode_copies_inside_path_without_mask_test() {
    let (img, mask) = subject();
    let path = KeypointPath::new(vec![
        Point::new(2.0, 2.0),
        Point::new(30.0, 2.0),
        Point::new(30.0, 30.0),
        Point::new(2.0, 30.0),
    ]);
    let layer = LayerExtractor::default()
        .extract(&img, &mask, LayerType::Torso, Some(&path))
        .unwrap();

    assert_eq!(layer.buffer.pixel(5, 5).unwrap(), WHITE);
    assert_eq!(layer.buffer.pixel(20, 20).unwrap(), INK);
    assert_eq!(alpha(&layer, 31, 20), 0);
    assert_eq!(alpha(&layer, 1, 1), 0);
    let SourceRegion::Keypoints { points, bounds } = &layer.source else {
        panic!("expected keypoint source");
    };
    assert_eq!(points.len(), 4);
    assert_eq!(*bounds, PixelRect::new(0, 0, 50, 50));
}

#[test]
fn two_point_path_selects_its_padded_box() {
    let (img, mask) = subject();
    let eyes = KeypointPath::new(vec![Point::new(20.0, 20.0), Point::new(26.0, 20.0)]);
    let extractor = LayerExtractor::new(ExtractOpts {
        keypoint_padding: 4.0,
        ..ExtractOpts::default()
    });
    let layer = extractor
        .extract(&img, &mask, LayerType::Eyes, Some(&eyes))
        .unwrap();

    assert!(layer.has_content);
    assert_eq!(layer.buffer.pixel(16, 16).unwrap(), INK);
    assert_eq!(layer.buffer.pixel(29, 23).unwrap(), INK);
    assert_eq!(alpha(&layer, 30, 20), 0);
    assert_eq!(alpha(&layer, 20, 24), 0);
    let SourceRegion::Keypoints { bounds, .. } = &layer.source else {
        panic!("expected keypoint source");
    };
    assert_eq!(*bounds, PixelRect::new(16, 16, 14, 8));
}

#[test]
fn empty_keypoint_path_yields_empty_layer() {
    let (img, mask) = subject();
    let layer = LayerExtractor::default()
        .extract(&img, &mask, LayerType::Torso, Some(&KeypointPath::default()))
        .unwrap();
    assert!(!layer.has_content);
    assert!(!layer.buffer.has_visible_pixels());
}

#[test]
fn part_classes_select_the_group() {
    let (img, mask) = subject();
    let mut classes = vec![-1; 60 * 60];
    for y in 10..30 {
        for x in 10..50 {
            classes[y * 60 + x] = 0;
        }
    }
    for y in 30..50 {
        for x in 10..50 {
            classes[y * 60 + x] = 12;
        }
    }
    let parts = PartSegmentation::new(60, 60, classes).unwrap();
    let ex = LayerExtractor::default();

    let head = ex.extract_parts(&img, &mask, &parts, LayerType::Head).unwrap();
    assert_eq!(alpha(&head, 20, 20), 255);
    assert_eq!(alpha(&head, 20, 40), 0);

    let torso = ex.extract_parts(&img, &mask, &parts, LayerType::Torso).unwrap();
    assert_eq!(alpha(&torso, 20, 40), 255);
    assert_eq!(
        torso.source,
        SourceRegion::PartClasses {
            classes: vec![12, 13]
        }
    );

    let mouth = ex.extract_parts(&img, &mask, &parts, LayerType::Mouth).unwrap();
    assert!(!mouth.has_content);
}
