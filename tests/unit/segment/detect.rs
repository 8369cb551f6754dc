use super::*;

#[test]
fn empty_summary_plans_only_background() {
    assert_eq!(
        DetectionSummary::default().plan_layers(0.5),
        vec![LayerType::Background]
    );
}

#[test]
fn person_and_face_plan_is_z_sorted() {
    let s = DetectionSummary::from_pairs([("person", 0.98), ("face", 0.9)]);
    let plan = s.plan_layers(0.5);
    assert_eq!(plan.first(), Some(&LayerType::Background));
    assert!(plan.contains(&LayerType::Head));
    assert!(plan.contains(&LayerType::LeftLeg));
    assert!(!plan.contains(&LayerType::AnimeEyes));
    let z: Vec<i32> = plan.iter().map(|t| t.default_z_index()).collect();
    assert!(z.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn low_head_confidence_suppresses_head_and_hair() {
    let s = DetectionSummary::from_pairs([("face", 0.9), ("head", 0.1)]);
    let plan = s.plan_layers(0.5);
    assert!(plan.contains(&LayerType::Mouth));
    assert!(!plan.contains(&LayerType::Head));
    assert!(!plan.contains(&LayerType::HairFront));
}

#[test]
fn below_threshold_categories_are_ignored() {
    let s = DetectionSummary::from_pairs([("anime", 0.4), ("accessory", 0.6)]);
    assert_eq!(
        s.plan_layers(0.5),
        vec![LayerType::Background, LayerType::Accessories]
    );
}
