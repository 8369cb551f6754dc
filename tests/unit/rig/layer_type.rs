use super::*;

#[test]
fn names_round_trip_through_from_str() {
    for t in LayerType::ALL {
        assert_eq!(t.as_str().parse::<LayerType>().unwrap(), t);
    }
}

#[test]
fn serde_uses_snake_case_names() {
    let json = serde_json::to_string(&LayerType::HairFront).unwrap();
    assert_eq!(json, "\"hair_front\"");
    let t: LayerType = serde_json::from_str("\"anime_eyes\"").unwrap();
    assert_eq!(t, LayerType::AnimeEyes);
}

#[test]
fn unknown_name_is_unknown_layer_type() {
    let err = "tail".parse::<LayerType>().unwrap_err();
    assert!(matches!(err, AutorigError::UnknownLayerType(ref s) if s == "tail"));
}

#[test]
fn eyes_alias_selects_exactly_the_eye_layers() {
    let table = AliasTable::new();
    let got = table.expand("eyes").unwrap();
    let want = BTreeSet::from([
        LayerType::Eyes,
        LayerType::LeftEye,
        LayerType::RightEye,
        LayerType::AnimeEyes,
    ]);
    assert_eq!(got, &want);

    for t in LayerType::ALL {
        assert_eq!(got.contains(&t), want.contains(&t), "{t}");
    }
}

#[test]
fn plain_type_names_expand_to_themselves() {
    let table = AliasTable::new();
    assert_eq!(
        table.expand("left_eye").unwrap(),
        &BTreeSet::from([LayerType::LeftEye])
    );
}

#[test]
fn expand_all_unions_and_rejects_unknown() {
    let table = AliasTable::new();
    let set = table.expand_all(&["mouth", "legs"]).unwrap();
    assert_eq!(
        set,
        BTreeSet::from([LayerType::Mouth, LayerType::LeftLeg, LayerType::RightLeg])
    );
    assert!(table.expand_all(&["mouth", "wings"]).is_err());
}

#[test]
fn layer_ids_and_z_order() {
    assert_eq!(LayerType::Mouth.layer_id(), "mouth_layer");
    assert!(LayerType::Background.default_z_index() < LayerType::Body.default_z_index());
    assert!(LayerType::Face.default_z_index() < LayerType::Mouth.default_z_index());
    assert!(LayerType::HairBack.default_z_index() < LayerType::Head.default_z_index());
}
