use super::{ZoneError, ZoneMap};
use crate::base::{FaceKindCodes, ZoneDecl};

/// Checks that the solver's per-face arrays agree with the declared zones
///
/// For every face of every declaration, the solver's zone number must equal the declared number
/// and the solver's face kind must correspond to the declared nature. Rough and smooth walls are
/// considered equivalent.
///
/// # Input
///
/// * `decls` -- the zone declarations used to build `map`
/// * `map` -- the zone map returned by [crate::zones::resolve_zones]
/// * `solver_zone_of_face` -- the solver's zone number of each face (IZFPPP)
/// * `solver_itypfb` -- the solver's face kind code of each face (ITYPFB)
/// * `codes` -- the solver's face kind codes
pub fn verify_zones(
    decls: &[ZoneDecl],
    map: &ZoneMap,
    solver_zone_of_face: &[i32],
    solver_itypfb: &[i32],
    codes: &FaceKindCodes,
) -> Result<(), ZoneError> {
    let nfabor = map.total_faces();
    if map.faces_of_zone.len() != decls.len() {
        return Err(ZoneError::SizeMismatch {
            what: "faces_of_zone",
            expected: decls.len(),
            found: map.faces_of_zone.len(),
        });
    }
    if solver_zone_of_face.len() != nfabor {
        return Err(ZoneError::SizeMismatch {
            what: "solver_zone_of_face",
            expected: nfabor,
            found: solver_zone_of_face.len(),
        });
    }
    if solver_itypfb.len() != nfabor {
        return Err(ZoneError::SizeMismatch {
            what: "solver_itypfb",
            expected: nfabor,
            found: solver_itypfb.len(),
        });
    }
    for (decl, faces) in decls.iter().zip(&map.faces_of_zone) {
        let expected = decl.nature.face_kind(decl.is_rough()).folded();
        for &f in faces {
            if solver_zone_of_face[f] != decl.zone_number {
                return Err(ZoneError::PostHocZoneNumber {
                    label: decl.label.clone(),
                    face: f,
                    gui_zone_number: decl.zone_number,
                    solver_zone_number: solver_zone_of_face[f],
                });
            }
            let found = codes.kind(solver_itypfb[f]).map(|k| k.folded());
            if found != Some(expected) {
                return Err(ZoneError::PostHocNature {
                    label: decl.label.clone(),
                    face: f,
                    nature: decl.nature.tag().to_string(),
                    solver_kind: solver_itypfb[f],
                });
            }
        }
    }
    log::debug!("solver arrays agree with {} boundary zones", decls.len());
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
