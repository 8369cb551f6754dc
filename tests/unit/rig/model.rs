use super::*;
use crate::{
    animation::clip::{AnimationClip, Keyframe},
    rig::layer::SourceRegion,
    segment::keypoints::{FaceLandmarks, Keypoint},
};

fn portrait() -> RasterBuffer {
    let mut img = RasterBuffer::filled(80, 120, [250, 250, 250, 255]).unwrap();
    for y in 10..110 {
        for x in 20..60 {
            img.set_pixel(x, y, [90, 60, 40, 255]);
        }
    }
    img
}

fn kp(name: &str, x: f64, y: f64) -> Keypoint {
    Keypoint {
        name: name.to_string(),
        x,
        y,
        confidence: 0.9,
    }
}

#[test]
fn default_plan_builds_sorted_layers() {
    let model =
        CharacterModel::build(&portrait(), &DetectorInputs::default(), &AutorigConfig::default())
            .unwrap();
    assert_eq!(model.layers().len(), LayerType::DEFAULT_SET.len());
    assert!(
        model
            .layers()
            .windows(2)
            .all(|w| w[0].z_index <= w[1].z_index)
    );
    assert_eq!(model.layers()[0].layer_type, LayerType::Background);
    assert!(model.layer("head_layer").unwrap().has_content);
    assert_eq!(model.clips().len(), 5);
    assert!(model.joints().is_empty());
}

#[test]
fn summary_narrows_the_plan() {
    let inputs = DetectorInputs {
        summary: Some(DetectionSummary::from_pairs([("face", 0.9)])),
        ..DetectorInputs::default()
    };
    let model = CharacterModel::build(&portrait(), &inputs, &AutorigConfig::default()).unwrap();
    assert!(model.layer_of(LayerType::Mouth).is_some());
    assert!(model.layer_of(LayerType::LeftArm).is_none());
}

#[test]
fn explicit_path_beats_pose_and_region() {
    let square = KeypointPath::new(vec![
        Point::new(25.0, 60.0),
        Point::new(55.0, 60.0),
        Point::new(55.0, 100.0),
        Point::new(25.0, 100.0),
    ]);
    let inputs = DetectorInputs {
        summary: Some(DetectionSummary::from_pairs([("person", 0.9)])),
        pose: Some(KeypointSet::new(vec![
            kp("left_shoulder", 50.0, 40.0),
            kp("right_shoulder", 30.0, 40.0),
            kp("left_hip", 50.0, 80.0),
            kp("right_hip", 30.0, 80.0),
            kp("right_elbow", 22.0, 60.0),
            kp("right_wrist", 21.0, 80.0),
        ])),
        part_paths: BTreeMap::from([(LayerType::Torso, square)]),
        ..DetectorInputs::default()
    };
    let model = CharacterModel::build(&portrait(), &inputs, &AutorigConfig::default()).unwrap();

    let torso = model.layer_of(LayerType::Torso).unwrap();
    assert!(matches!(&torso.source, SourceRegion::Keypoints { points, .. } if points.len() == 4 && points[0] == Point::new(25.0, 60.0)));

    let body = model.layer_of(LayerType::Body).unwrap();
    assert!(matches!(&body.source, SourceRegion::Keypoints { points, .. } if points[0] == Point::new(50.0, 40.0)));

    let arm = model.layer_of(LayerType::RightArm).unwrap();
    assert!(matches!(arm.source, SourceRegion::Keypoints { .. }));

    let leg = model.layer_of(LayerType::LeftLeg).unwrap();
    assert!(matches!(leg.source, SourceRegion::Region { .. }));

    assert_eq!(model.joints()["right_shoulder"], Point::new(30.0, 40.0));
}

#[test]
fn mismatched_parts_fall_back_to_regions() {
    let inputs = DetectorInputs {
        parts: Some(PartSegmentation {
            width: 2,
            height: 2,
            classes: vec![0; 4],
        }),
        ..DetectorInputs::default()
    };
    let model = CharacterModel::build(&portrait(), &inputs, &AutorigConfig::default()).unwrap();
    let head = model.layer_of(LayerType::Head).unwrap();
    assert!(matches!(head.source, SourceRegion::Region { .. }));
}

#[test]
fn blank_image_still_yields_a_renderable_model() {
    let img = RasterBuffer::filled(30, 30, [0, 0, 0, 255]).unwrap();
    let model =
        CharacterModel::build(&img, &DetectorInputs::default(), &AutorigConfig::default()).unwrap();
    let with_content: Vec<_> = model.layers().iter().filter(|l| l.has_content).collect();
    assert_eq!(with_content.len(), 1);
    assert_eq!(with_content[0].layer_type, LayerType::Background);
}

#[test]
fn malformed_config_clip_fails_the_build() {
    let mut cfg = AutorigConfig::default();
    cfg.clips
        .push(AnimationClip::new("bad", ["mouth"], 100, vec![Keyframe::at(0.0)]));
    let err = CharacterModel::build(&portrait(), &DetectorInputs::default(), &cfg).unwrap_err();
    assert!(matches!(err, AutorigError::MalformedClip { .. }));
}

#[test]
fn from_parts_rejects_mismatched_layers() {
    let layer = Layer::new(
        LayerType::Head,
        RasterBuffer::transparent(4, 4).unwrap(),
        SourceRegion::Empty,
    );
    let err = CharacterModel::from_parts(
        8,
        8,
        vec![layer],
        AnimationClipStore::default(),
        BTreeMap::new(),
    )
    .unwrap_err();
    assert!(matches!(err, AutorigError::Validation(_)));
}

#[test]
fn detector_inputs_parse_from_json() {
    let inputs: DetectorInputs = serde_json::from_str(
        r#"{"summary":{"person":0.97},
            "pose":{"keypoints":[{"name":"nose","x":40,"y":20,"score":0.8}]},
            "partPaths":{"mouth":{"points":[{"x":1,"y":1},{"x":5,"y":1},{"x":3,"y":4}]}},
            "faceLandmarks":[{"x":1,"y":2,"z":0.5}],
            "minConfidence":0.3}"#,
    )
    .unwrap();
    assert_eq!(inputs.min_confidence(), 0.3);
    assert_eq!(inputs.part_paths[&LayerType::Mouth].points.len(), 3);
    assert_eq!(inputs.pose.unwrap().points[0].confidence, 0.8);
    assert_eq!(
        inputs.face_landmarks.unwrap().points,
        vec![Point::new(1.0, 2.0)]
    );
}

fn outline_corners(mesh: &mut [Point], range: std::ops::RangeInclusive<usize>, r: [f64; 4]) {
    let corners = [
        Point::new(r[0], r[1]),
        Point::new(r[2], r[1]),
        Point::new(r[2], r[3]),
        Point::new(r[0], r[3]),
    ];
    for (n, i) in range.enumerate() {
        mesh[i] = corners.get(n).copied().unwrap_or(corners[0]);
    }
}

#[test]
fn face_landmarks_outline_eyes_and_mouth() {
    let mut mesh = vec![Point::new(40.0, 50.0); 300];
    outline_corners(&mut mesh, 33..=42, [24.0, 30.0, 36.0, 38.0]);
    outline_corners(&mut mesh, 263..=272, [44.0, 30.0, 56.0, 38.0]);
    outline_corners(&mut mesh, 61..=91, [30.0, 70.0, 50.0, 80.0]);
    let inputs = DetectorInputs {
        face_landmarks: Some(FaceLandmarks::new(mesh)),
        ..DetectorInputs::default()
    };
    let model = CharacterModel::build(&portrait(), &inputs, &AutorigConfig::default()).unwrap();

    let right = model.layer_of(LayerType::RightEye).unwrap();
    assert!(matches!(&right.source, SourceRegion::Keypoints { points, .. } if points.len() == 10));
    assert_eq!(right.buffer.pixel(30, 34).unwrap()[3], 255);
    assert_eq!(right.buffer.pixel(50, 34).unwrap()[3], 0);

    let left = model.layer_of(LayerType::LeftEye).unwrap();
    assert_eq!(left.buffer.pixel(50, 34).unwrap()[3], 255);

    let mouth = model.layer_of(LayerType::Mouth).unwrap();
    assert!(matches!(&mouth.source, SourceRegion::Keypoints { points, .. } if points.len() == 31));
    assert_eq!(mouth.buffer.pixel(40, 75).unwrap()[3], 255);
    assert_eq!(mouth.buffer.pixel(40, 60).unwrap()[3], 0);
    // Landmark types join the default plan.
    assert!(model.layer_of(LayerType::Nose).is_some());
    assert!(model.layer_of(LayerType::Head).is_some());
}

#[test]
fn explicit_path_beats_face_landmarks() {
    let mut mesh = vec![Point::new(40.0, 50.0); 100];
    outline_corners(&mut mesh, 61..=91, [30.0, 70.0, 50.0, 80.0]);
    let triangle = KeypointPath::new(vec![
        Point::new(30.0, 90.0),
        Point::new(50.0, 90.0),
        Point::new(40.0, 100.0),
    ]);
    let inputs = DetectorInputs {
        face_landmarks: Some(FaceLandmarks::new(mesh)),
        part_paths: BTreeMap::from([(LayerType::Mouth, triangle)]),
        ..DetectorInputs::default()
    };
    let model = CharacterModel::build(&portrait(), &inputs, &AutorigConfig::default()).unwrap();
    let mouth = model.layer_of(LayerType::Mouth).unwrap();
    assert!(matches!(&mouth.source, SourceRegion::Keypoints { points, .. } if points.len() == 3));
    assert_eq!(mouth.buffer.pixel(40, 75).unwrap()[3], 0);
    assert_eq!(mouth.buffer.pixel(40, 93).unwrap()[3], 255);
}
