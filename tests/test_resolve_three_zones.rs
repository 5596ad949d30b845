use fvbc::prelude::*;

// Three boundary zones on a channel with six boundary faces
//
// TEST GOAL
//
// This test verifies the classification of boundary faces into zones, the detection of
// overlapping zones, the zone number range check, and the warnings for unmatched fragments
//
// BOUNDARY FACES
//
//        wall (B)      wall (B)
//      +----3---------4-------+
//      |                      |
//  (A) 0                      5 (C)
//  in  1                      |  out
//  (A) 2                      |
//      +----------------------+
//
// Face 2 also belongs to the group "corner"
//
// ZONES
//
// in1   inlet  1  selects A
// wall1 wall   2  selects B
// out1  outlet 3  selects C

fn selector() -> GroupSelector {
    GroupSelector::new(vec![
        FaceTags::new(&["A"]),
        FaceTags::new(&["A"]),
        FaceTags::new(&["A", "corner"]),
        FaceTags::new(&["B"]),
        FaceTags::new(&["B"]),
        FaceTags::new(&["C"]),
    ])
}

fn declarations(wall_selection: &str) -> Result<Vec<ZoneDecl>, ZoneError> {
    Ok(vec![
        ZoneDecl::new("in1", "inlet", 1, "A", 4)?,
        ZoneDecl::new("wall1", "wall", 2, wall_selection, 4)?,
        ZoneDecl::new("out1", "outlet", 3, "C", 4)?,
    ])
}

#[test]
fn test_resolve_three_zones() -> Result<(), ZoneError> {
    let selector = selector();
    let decls = declarations("B")?;
    let map = resolve_zones(&decls, 6, 100, &selector)?;
    assert_eq!(map.zone_of_face, &[1, 1, 1, 2, 2, 3]);
    assert_eq!(map.faces_of_zone, vec![vec![0, 1, 2], vec![3, 4], vec![5]]);
    assert_eq!(map.n_unassigned(), 0);
    assert_eq!(map.warnings.len(), 0);
    assert_eq!(
        format!("{}", map),
        "Zone map\n\
         ========\n\
         total faces = 6\n\
         unassigned faces = 0\n\
         declaration 0: 3 faces\n\
         declaration 1: 2 faces\n\
         declaration 2: 1 faces\n\
         warnings = 0\n"
    );
    Ok(())
}

#[test]
fn test_resolve_overlapping_zones() -> Result<(), ZoneError> {
    let selector = selector();
    let decls = declarations("B or corner")?;
    let err = resolve_zones(&decls, 6, 100, &selector).err();
    assert_eq!(
        err,
        Some(ZoneError::ZoneOverlap {
            label: "wall1".to_string(),
            zone_number: 2,
            face: 2,
            previous_zone_number: 1,
            previous_label: "in1".to_string(),
        })
    );
    let message = err.map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("'wall1' (number 2)"));
    assert!(message.contains("'in1' (number 1)"));
    Ok(())
}

#[test]
fn test_resolve_zone_number_out_of_range() -> Result<(), ZoneError> {
    let selector = selector();
    let mut decls = declarations("B")?;
    decls[2].zone_number = 0;
    assert_eq!(
        resolve_zones(&decls, 6, 100, &selector).err(),
        Some(ZoneError::ConfigurationRange {
            label: "out1".to_string(),
            zone_number: 0,
            max_zones: 100,
        })
    );
    Ok(())
}

#[test]
fn test_resolve_unmatched_fragment() -> Result<(), ZoneError> {
    let selector = selector();
    let decls = declarations("B or roof")?;
    let map = resolve_zones(&decls, 6, 100, &selector)?;
    assert_eq!(map.zone_of_face, &[1, 1, 1, 2, 2, 3]);
    assert_eq!(map.warnings.len(), 1);
    assert_eq!(map.warnings[0].label, "wall1");
    assert_eq!(map.warnings[0].fragment, "roof");
    assert_eq!(map.warnings[0].expression, "B or roof");
    Ok(())
}
