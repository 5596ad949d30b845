use super::{SelectionWarning, ZoneError};
use crate::base::ZoneDecl;
use crate::selector::FaceSelector;
use std::fmt;

/// Holds the classification of boundary faces into zones
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneMap {
    /// Zone number of each boundary face (0 means unassigned)
    pub zone_of_face: Vec<i32>,

    /// Resolved faces (ascending) of each declaration, in declaration order
    pub faces_of_zone: Vec<Vec<usize>>,

    /// Non-fatal notices about selection fragments matching no face
    pub warnings: Vec<SelectionWarning>,
}

impl ZoneMap {
    /// Returns the number of boundary faces
    pub fn total_faces(&self) -> usize {
        self.zone_of_face.len()
    }

    /// Returns the number of faces not claimed by any zone
    pub fn n_unassigned(&self) -> usize {
        self.zone_of_face.iter().filter(|z| **z == 0).count()
    }
}

impl fmt::Display for ZoneMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zone map\n")?;
        write!(f, "========\n")?;
        write!(f, "total faces = {}\n", self.total_faces())?;
        write!(f, "unassigned faces = {}\n", self.n_unassigned())?;
        for (i, faces) in self.faces_of_zone.iter().enumerate() {
            write!(f, "declaration {}: {} faces\n", i, faces.len())?;
        }
        write!(f, "warnings = {}\n", self.warnings.len())?;
        Ok(())
    }
}

/// Classifies the boundary faces into the declared zones
///
/// All declarations are validated before any face is classified. Then, in declaration order,
/// each selection is resolved and its faces are marked with the zone number. A face claimed by
/// two declarations is an error, even if both carry the same zone number.
///
/// # Input
///
/// * `decls` -- the zone declarations, in document order
/// * `total_faces` -- the number of boundary faces
/// * `max_zones` -- the largest allowed zone number
/// * `selector` -- resolves selection expressions into face ids
///
/// # Output
///
/// Returns the zone map. Selection fragments matching no face are logged at warn level
/// and collected in [ZoneMap::warnings].
pub fn resolve_zones<S>(
    decls: &[ZoneDecl],
    total_faces: usize,
    max_zones: i32,
    selector: &S,
) -> Result<ZoneMap, ZoneError>
where
    S: FaceSelector + ?Sized,
{
    for (i, decl) in decls.iter().enumerate() {
        if decl.zone_number < 1 || decl.zone_number > max_zones {
            return Err(ZoneError::ConfigurationRange {
                label: decl.label.clone(),
                zone_number: decl.zone_number,
                max_zones,
            });
        }
        if decls[..i].iter().any(|d| d.label == decl.label) {
            return Err(ZoneError::DuplicateLabel(decl.label.clone()));
        }
    }

    // index of the declaration owning each face
    let mut owner: Vec<Option<usize>> = vec![None; total_faces];
    let mut zone_of_face = vec![0; total_faces];
    let mut faces_of_zone = Vec::with_capacity(decls.len());
    let mut warnings = Vec::new();

    for (i, decl) in decls.iter().enumerate() {
        let selection = selector
            .select(&decl.selection)
            .map_err(|message| ZoneError::InvalidSelection {
                label: decl.label.clone(),
                expression: decl.selection.clone(),
                message,
            })?;
        for fragment in selection.missing {
            let warning = SelectionWarning {
                label: decl.label.clone(),
                fragment,
                expression: decl.selection.clone(),
            };
            log::warn!("{}", warning);
            warnings.push(warning);
        }
        let mut faces = selection.faces;
        faces.sort_unstable();
        faces.dedup();
        for &f in &faces {
            if f >= total_faces {
                return Err(ZoneError::FaceOutOfRange {
                    label: decl.label.clone(),
                    face: f,
                    total_faces,
                });
            }
            if let Some(previous) = owner[f] {
                return Err(ZoneError::ZoneOverlap {
                    label: decl.label.clone(),
                    zone_number: decl.zone_number,
                    face: f,
                    previous_zone_number: decls[previous].zone_number,
                    previous_label: decls[previous].label.clone(),
                });
            }
            owner[f] = Some(i);
            zone_of_face[f] = decl.zone_number;
        }
        log::debug!("{}: {} faces", decl, faces.len());
        faces_of_zone.push(faces);
    }

    Ok(ZoneMap {
        zone_of_face,
        faces_of_zone,
        warnings,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::resolve_zones;
    use crate::base::ZoneDecl;
    use crate::selector::{FaceSelector, FaceTags, GroupSelector, Selection};
    use crate::zones::ZoneError;
    use crate::StrError;

    fn decl(label: &str, nature: &str, zone_number: i32, selection: &str) -> ZoneDecl {
        ZoneDecl::new(label, nature, zone_number, selection, 4).unwrap()
    }

    // returns a fixed list of faces for any expression
    struct FixedSelector(Vec<usize>);

    impl FaceSelector for FixedSelector {
        fn select(&self, _: &str) -> Result<Selection, StrError> {
            Ok(Selection {
                faces: self.0.clone(),
                missing: Vec::new(),
            })
        }
    }

    #[test]
    fn resolve_works() -> Result<(), ZoneError> {
        //  face:   0  1  2  3  4  5
        //  group:  A  A  A  B  B  C
        let selector = GroupSelector::from_groups(&["A", "A", "A", "B", "B", "C"]);
        let decls = vec![
            decl("in1", "inlet", 1, "A"),
            decl("wall1", "wall", 2, "B"),
            decl("out1", "outlet", 3, "C"),
        ];
        let map = resolve_zones(&decls, 6, 2000, &selector)?;
        assert_eq!(map.zone_of_face, &[1, 1, 1, 2, 2, 3]);
        assert_eq!(map.faces_of_zone, &[vec![0, 1, 2], vec![3, 4], vec![5]]);
        assert_eq!(map.warnings.len(), 0);
        assert_eq!(map.n_unassigned(), 0);
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
    fn overlap_is_captured() {
        //  face:   0  1  2    3
        //  group:  A  A  A,B  B
        let selector = GroupSelector::new(vec![
            FaceTags::new(&["A"]),
            FaceTags::new(&["A"]),
            FaceTags::new(&["A", "B"]),
            FaceTags::new(&["B"]),
        ]);
        let decls = vec![decl("in1", "inlet", 1, "A"), decl("wall1", "wall", 2, "B")];
        assert_eq!(
            resolve_zones(&decls, 4, 2000, &selector).err(),
            Some(ZoneError::ZoneOverlap {
                label: "wall1".to_string(),
                zone_number: 2,
                face: 2,
                previous_zone_number: 1,
                previous_label: "in1".to_string(),
            })
        );
    }

    #[test]
    fn overlap_with_same_number_is_captured() {
        let selector = GroupSelector::from_groups(&["A", "B"]);
        let decls = vec![decl("w1", "wall", 4, "A or B"), decl("w2", "wall", 4, "B")];
        let err = resolve_zones(&decls, 2, 10, &selector).err();
        assert_eq!(
            err.map(|e| e.to_string()),
            Some(
                "zone 'w2' (number 4) claims face 1 already marked by zone 'w1' (number 4); \
                 zone definitions are overlapping"
                    .to_string()
            )
        );
    }

    #[test]
    fn overlap_reports_the_lowest_face() {
        // both declarations claim faces 4 and 2, listed out of order
        let selector = FixedSelector(vec![4, 2]);
        let decls = vec![decl("w1", "wall", 1, "A"), decl("w2", "wall", 2, "B")];
        assert_eq!(
            resolve_zones(&decls, 5, 10, &selector).err(),
            Some(ZoneError::ZoneOverlap {
                label: "w2".to_string(),
                zone_number: 2,
                face: 2,
                previous_zone_number: 1,
                previous_label: "w1".to_string(),
            })
        );
    }

    #[test]
    fn resolve_is_idempotent() -> Result<(), ZoneError> {
        let selector = GroupSelector::from_groups(&["A", "B", "A", "C", "B"]);
        let decls = vec![
            decl("in1", "inlet", 3, "A or missing"),
            decl("wall1", "wall", 1, "B"),
            decl("out1", "outlet", 2, "not (A or B)"),
        ];
        let first = resolve_zones(&decls, 5, 10, &selector)?;
        let second = resolve_zones(&decls, 5, 10, &selector)?;
        assert_eq!(first, second);
        assert_eq!(first.zone_of_face, &[3, 1, 3, 2, 1]);
        assert_eq!(first.warnings.len(), 1);
        Ok(())
    }

    #[test]
    fn repeated_fragments_are_idempotent() -> Result<(), ZoneError> {
        let selector = GroupSelector::from_groups(&["A", "B", "C"]);
        let decls = vec![decl("w1", "wall", 1, "A or B or A or (B and B)")];
        let map = resolve_zones(&decls, 3, 10, &selector)?;
        assert_eq!(map.zone_of_face, &[1, 1, 0]);
        assert_eq!(map.n_unassigned(), 1);
        // the selector's duplicates are dropped as well
        let map = resolve_zones(&decls, 3, 10, &FixedSelector(vec![2, 0, 2]))?;
        assert_eq!(map.zone_of_face, &[1, 0, 1]);
        assert_eq!(map.faces_of_zone, &[vec![0, 2]]);
        Ok(())
    }

    #[test]
    fn unmatched_fragments_give_warnings() -> Result<(), ZoneError> {
        let selector = GroupSelector::from_groups(&["A", "A", "B"]);
        let decls = vec![decl("in1", "inlet", 1, "A or missing_group")];
        let map = resolve_zones(&decls, 3, 10, &selector)?;
        assert_eq!(map.zone_of_face, &[1, 1, 0]);
        assert_eq!(map.warnings.len(), 1);
        assert_eq!(map.warnings[0].label, "in1");
        assert_eq!(map.warnings[0].fragment, "missing_group");
        assert_eq!(map.warnings[0].expression, "A or missing_group");
        Ok(())
    }

    #[test]
    fn validation_precedes_classification() {
        // the overlap would be found first if validation were done lazily
        let selector = GroupSelector::from_groups(&["A"]);
        let decls = vec![
            decl("a", "wall", 1, "A"),
            decl("b", "wall", 2, "A"),
            decl("c", "wall", 0, "A"),
        ];
        assert_eq!(
            resolve_zones(&decls, 1, 100, &selector).err(),
            Some(ZoneError::ConfigurationRange {
                label: "c".to_string(),
                zone_number: 0,
                max_zones: 100,
            })
        );
        let decls = vec![decl("a", "wall", 1, "A"), decl("b", "wall", 2, "A"), decl("a", "wall", 3, "")];
        assert_eq!(
            resolve_zones(&decls, 1, 100, &selector).err(),
            Some(ZoneError::DuplicateLabel("a".to_string()))
        );
    }

    #[test]
    fn catch_some_errors() {
        let selector = GroupSelector::from_groups(&["A"]);
        let decls = vec![decl("a", "wall", 101, "A")];
        assert_eq!(
            resolve_zones(&decls, 1, 100, &selector).err().map(|e| e.to_string()),
            Some("zone 'a' has number 101, outside the allowed range [1, 100]".to_string())
        );
        let decls = vec![decl("a", "wall", 1, "(A")];
        assert_eq!(
            resolve_zones(&decls, 1, 100, &selector).err(),
            Some(ZoneError::InvalidSelection {
                label: "a".to_string(),
                expression: "(A".to_string(),
                message: "missing closing parenthesis",
            })
        );
        let decls = vec![decl("a", "wall", 1, "A")];
        assert_eq!(
            resolve_zones(&decls, 3, 100, &FixedSelector(vec![0, 3])).err(),
            Some(ZoneError::FaceOutOfRange {
                label: "a".to_string(),
                face: 3,
                total_faces: 3,
            })
        );
    }
}
