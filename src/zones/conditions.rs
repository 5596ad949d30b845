use super::{ZoneError, ZoneMap};
use crate::base::{BcCode, Config, InletVelocity, Nature, VariableTable, ZoneDecl, UNSET_VALUE};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::fs::{self, File};
use std::path::Path;

/// Holds the solver's boundary condition arrays
///
/// The per-face arrays use the solver's layout:
///
/// * `icodcl[ivar * nfabor + f]`
/// * `rcodcl[k * nfabor * nvar + ivar * nfabor + f]` with k = 0, 1, 2
///
/// The per-zone arrays are indexed by `zone_number - 1`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BoundaryArrays {
    /// Number of boundary faces
    pub nfabor: usize,

    /// Number of variables
    pub nvar: usize,

    /// Face kind code of each face
    pub itypfb: Vec<i32>,

    /// Zone number of each face
    pub izfppp: Vec<i32>,

    /// Condition code of each (variable, face)
    pub icodcl: Vec<i32>,

    /// Condition values of each (k, variable, face)
    pub rcodcl: Vec<f64>,

    /// Flow rate indicator of each inlet zone
    pub iqimp: Vec<i32>,

    /// Imposed flow rate of each inlet zone
    pub qimp: Vec<f64>,

    /// Automatic turbulence indicator of each inlet zone
    pub icalke: Vec<i32>,

    /// Hydraulic diameter of each inlet zone
    pub dh: Vec<f64>,

    /// Turbulent intensity of each inlet zone
    pub xintur: Vec<f64>,
}

impl BoundaryArrays {
    /// Allocates new arrays with the solver's initial values
    pub fn new(nfabor: usize, nvar: usize, max_zones: usize) -> Self {
        let mut rcodcl = vec![UNSET_VALUE; 3 * nvar * nfabor];
        for value in &mut rcodcl[2 * nvar * nfabor..] {
            *value = 0.0;
        }
        BoundaryArrays {
            nfabor,
            nvar,
            itypfb: vec![0; nfabor],
            izfppp: vec![0; nfabor],
            icodcl: vec![0; nvar * nfabor],
            rcodcl,
            iqimp: vec![0; max_zones],
            qimp: vec![0.0; max_zones],
            icalke: vec![0; max_zones],
            dh: vec![0.0; max_zones],
            xintur: vec![0.0; max_zones],
        }
    }

    /// Returns the condition code of a variable at a face
    pub fn icodcl(&self, ivar: usize, f: usize) -> i32 {
        self.icodcl[ivar * self.nfabor + f]
    }

    /// Returns the k-th condition value (k = 0, 1, 2) of a variable at a face
    pub fn rcodcl(&self, k: usize, ivar: usize, f: usize) -> f64 {
        self.rcodcl[k * self.nfabor * self.nvar + ivar * self.nfabor + f]
    }

    /// Writes a JSON file with the arrays
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }

    fn set_icodcl(&mut self, ivar: usize, f: usize, code: i32) {
        self.icodcl[ivar * self.nfabor + f] = code;
    }

    fn set_rcodcl(&mut self, k: usize, ivar: usize, f: usize, value: f64) {
        self.rcodcl[k * self.nfabor * self.nvar + ivar * self.nfabor + f] = value;
    }
}

impl fmt::Display for BoundaryArrays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Boundary arrays\n")?;
        write!(f, "===============\n")?;
        write!(f, "nfabor = {}\n", self.nfabor)?;
        write!(f, "nvar = {}\n", self.nvar)?;
        write!(f, "itypfb = {:?}\n", self.itypfb)?;
        write!(f, "izfppp = {:?}\n", self.izfppp)?;
        Ok(())
    }
}

/// Returns the unit vector along `v`
fn unit(v: &[f64; 3], label: &str, what: &'static str) -> Result<[f64; 3], ZoneError> {
    let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if norm == 0.0 {
        return Err(ZoneError::InvalidVector {
            label: label.to_string(),
            what,
        });
    }
    Ok([v[0] / norm, v[1] / norm, v[2] / norm])
}

/// Writes the zone conditions into the solver's boundary condition arrays
///
/// # Input
///
/// * `decls` -- the zone declarations used to build `map`
/// * `map` -- the zone map returned by [crate::zones::resolve_zones]
/// * `variables` -- the variable table indexing the per-variable conditions
/// * `config` -- gives the number of zones and the face kind codes
/// * `face_normals` -- the outward normal of each boundary face
///
/// # Notes
///
/// 1. Inlet velocities given by a norm or a flow rate without direction point along the
///    inward normal. For flow rates, the velocity is a unit vector and the solver scales it.
/// 2. The roughness of a rough wall is stored in the third value of `velocity_U`.
pub fn apply_conditions(
    decls: &[ZoneDecl],
    map: &ZoneMap,
    variables: &VariableTable,
    config: &Config,
    face_normals: &[[f64; 3]],
) -> Result<BoundaryArrays, ZoneError> {
    let nfabor = map.total_faces();
    let nvar = variables.len();
    if face_normals.len() != nfabor {
        return Err(ZoneError::SizeMismatch {
            what: "face_normals",
            expected: nfabor,
            found: face_normals.len(),
        });
    }
    if map.faces_of_zone.len() != decls.len() {
        return Err(ZoneError::SizeMismatch {
            what: "faces_of_zone",
            expected: decls.len(),
            found: map.faces_of_zone.len(),
        });
    }

    let codes = &config.face_kinds;
    let velocity = variables.velocity();
    let mut arrays = BoundaryArrays::new(nfabor, nvar, config.max_zones as usize);
    arrays.izfppp.copy_from_slice(&map.zone_of_face);

    for (decl, faces) in decls.iter().zip(&map.faces_of_zone) {
        if decl.zone_number < 1 || decl.zone_number > config.max_zones {
            return Err(ZoneError::ConfigurationRange {
                label: decl.label.clone(),
                zone_number: decl.zone_number,
                max_zones: config.max_zones,
            });
        }
        let conds = &decl.conditions;
        if conds.variables.len() != nvar {
            return Err(ZoneError::SizeMismatch {
                what: "conditions.variables",
                expected: nvar,
                found: conds.variables.len(),
            });
        }
        let z = (decl.zone_number - 1) as usize;
        let kind = codes.code(decl.nature.face_kind(decl.is_rough()));
        for &f in faces {
            arrays.itypfb[f] = kind;
        }

        match decl.nature {
            Nature::Inlet => {
                if let Some(v) = &conds.velocity {
                    arrays.iqimp[z] = v.iqimp();
                    arrays.qimp[z] = v.qimp();
                }
                if let Some(t) = &conds.turbulence {
                    arrays.icalke[z] = t.icalke();
                    arrays.dh[z] = t.dh();
                    arrays.xintur[z] = t.xintur();
                }
                let direction = match conds.velocity.as_ref().and_then(|v| v.direction()) {
                    Some(d) => Some(unit(&d, &decl.label, "velocity direction")?),
                    None => None,
                };
                for &f in faces {
                    for (ivar, cond) in conds.variables.iter().enumerate() {
                        arrays.set_rcodcl(0, ivar, f, cond.val1);
                    }
                    let speed = match conds.velocity {
                        Some(InletVelocity::Norm { norm, .. }) => norm,
                        Some(_) => 1.0,
                        None => continue,
                    };
                    let u = match direction {
                        Some(d) => d,
                        None => {
                            let n = unit(&face_normals[f], &decl.label, "face normal")?;
                            [-n[0], -n[1], -n[2]]
                        }
                    };
                    for i in 0..3 {
                        arrays.set_rcodcl(0, velocity[i], f, u[i] * speed);
                    }
                }
            }
            Nature::Wall => {
                if let Some(roughness) = conds.roughness {
                    for &f in faces {
                        arrays.set_rcodcl(2, velocity[0], f, roughness);
                    }
                }
                for (ivar, cond) in conds.variables.iter().enumerate() {
                    for &f in faces {
                        match cond.code {
                            Some(BcCode::Neumann) => {
                                arrays.set_icodcl(ivar, f, 3);
                                arrays.set_rcodcl(2, ivar, f, cond.val3);
                            }
                            Some(BcCode::Dirichlet) | Some(BcCode::WallFunction) => {
                                arrays.set_icodcl(ivar, f, 5);
                                arrays.set_rcodcl(0, ivar, f, cond.val1);
                            }
                            Some(BcCode::ExchangeCoefficient) => {
                                arrays.set_icodcl(ivar, f, 5);
                                arrays.set_rcodcl(0, ivar, f, cond.val1);
                                arrays.set_rcodcl(1, ivar, f, cond.val2);
                            }
                            None => (),
                        }
                    }
                }
            }
            Nature::Outlet => {
                for (ivar, cond) in conds.variables.iter().enumerate() {
                    if cond.code == Some(BcCode::Dirichlet) {
                        for &f in faces {
                            arrays.set_icodcl(ivar, f, 1);
                            arrays.set_rcodcl(0, ivar, f, cond.val1);
                        }
                    }
                }
            }
            Nature::Symmetry | Nature::Undefined => (),
        }

        if log::log_enabled!(log::Level::Debug) {
            log::debug!("{}: {} faces", decl, faces.len());
            if decl.nature == Nature::Inlet {
                log::debug!(
                    "iqimp = {}, qimp = {:e}, icalke = {}, dh = {:e}, xintur = {:e}",
                    arrays.iqimp[z],
                    arrays.qimp[z],
                    arrays.icalke[z],
                    arrays.dh[z],
                    arrays.xintur[z]
                );
            }
            if let Some(&f) = faces.first() {
                for (ivar, var) in variables.all.iter().enumerate() {
                    log::debug!(
                        "{}: icodcl = {}, rcodcl = ({:e}, {:e}, {:e})",
                        var.name,
                        arrays.icodcl(ivar, f),
                        arrays.rcodcl(0, ivar, f),
                        arrays.rcodcl(1, ivar, f),
                        arrays.rcodcl(2, ivar, f)
                    );
                }
            }
        }
    }

    Ok(arrays)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{apply_conditions, BoundaryArrays};
    use crate::base::{
        BcCode, Config, InletTurbulence, InletVelocity, TurbulenceModel, VariableTable, ZoneDecl, DEFAULT_TEST_DIR,
        UNSET_VALUE,
    };
    use crate::selector::GroupSelector;
    use crate::zones::{resolve_zones, ZoneError, ZoneMap};
    use crate::StrError;
    use std::fs;

    const NORMALS: [[f64; 3]; 5] = [
        [0.0, 0.0, -2.0],
        [0.0, 0.0, -2.0],
        [0.0, 3.0, 0.0],
        [0.0, 0.0, 4.0],
        [1.0, 0.0, 0.0],
    ];

    //  face:    0      1      2      3       4
    //  group:   in    in2    wall   out    sym
    //  zone:    1      4      2      3       5
    fn setup(decls: &[ZoneDecl]) -> ZoneMap {
        let selector = GroupSelector::from_groups(&["in", "in2", "wall", "out", "sym"]);
        resolve_zones(decls, 5, 10, &selector).unwrap()
    }

    fn variables() -> VariableTable {
        VariableTable::new(TurbulenceModel::KEpsilon, false, &["T".to_string()]).unwrap()
    }

    fn config() -> Config {
        let mut config = Config::new();
        config.set_max_zones(10).unwrap();
        config
    }

    #[test]
    fn new_works() {
        let arrays = BoundaryArrays::new(2, 3, 4);
        assert_eq!(arrays.rcodcl.len(), 18);
        assert_eq!(arrays.rcodcl(0, 2, 1), UNSET_VALUE);
        assert_eq!(arrays.rcodcl(1, 0, 0), UNSET_VALUE);
        assert_eq!(arrays.rcodcl(2, 1, 1), 0.0);
        assert_eq!(arrays.icodcl, &[0; 6]);
        assert_eq!(arrays.iqimp.len(), 4);
        assert_eq!(
            format!("{}", arrays),
            "Boundary arrays\n\
             ===============\n\
             nfabor = 2\n\
             nvar = 3\n\
             itypfb = [0, 0]\n\
             izfppp = [0, 0]\n"
        );
    }

    #[test]
    fn write_json_works() -> Result<(), StrError> {
        let arrays = BoundaryArrays::new(2, 3, 4);
        let path = format!("{}/boundary_arrays.json", DEFAULT_TEST_DIR);
        arrays.write_json(&path)?;
        let contents = fs::read_to_string(&path).map_err(|_| "cannot read file")?;
        let read: BoundaryArrays = serde_json::from_str(&contents).map_err(|_| "cannot parse JSON file")?;
        assert_eq!((read.nfabor, read.nvar), (2, 3));
        assert_eq!(read.icodcl, arrays.icodcl);
        assert_eq!(read.rcodcl.len(), 18);
        assert_eq!(read.rcodcl(2, 1, 1), 0.0);
        Ok(())
    }

    #[test]
    fn apply_works() -> Result<(), ZoneError> {
        let vars = variables();
        let nvar = vars.len();
        let it = vars.index_of("T").unwrap();

        let mut inlet = ZoneDecl::new("in1", "inlet", 1, "in", nvar)?;
        inlet.conditions.velocity = Some(InletVelocity::Norm {
            norm: 3.0,
            direction: None,
        });
        inlet.conditions.turbulence = Some(InletTurbulence::TurbulentIntensity { dh: 0.1, intensity: 0.02 });
        inlet.conditions.variables[it].code = Some(BcCode::Dirichlet);
        inlet.conditions.variables[it].val1 = 20.0;

        let mut inlet2 = ZoneDecl::new("in2", "inlet", 4, "in2", nvar)?;
        inlet2.conditions.velocity = Some(InletVelocity::MassFlow {
            rate: 1.5,
            direction: Some([0.0, 2.0, 0.0]),
        });
        inlet2.conditions.turbulence = Some(InletTurbulence::HydraulicDiameter { dh: 0.3 });

        let mut wall = ZoneDecl::new("wall1", "wall", 2, "wall", nvar)?;
        wall.conditions.roughness = Some(0.01);
        wall.conditions.variables[1].code = Some(BcCode::Dirichlet);
        wall.conditions.variables[1].val1 = 0.5;
        wall.conditions.variables[it].code = Some(BcCode::ExchangeCoefficient);
        wall.conditions.variables[it].val1 = 30.0;
        wall.conditions.variables[it].val2 = 100.0;

        let mut outlet = ZoneDecl::new("out1", "outlet", 3, "out", nvar)?;
        outlet.conditions.variables[0].code = Some(BcCode::Dirichlet);
        outlet.conditions.variables[0].val1 = 0.0;
        outlet.conditions.variables[it].code = Some(BcCode::Neumann);

        let sym = ZoneDecl::new("sym", "symmetry", 5, "sym", nvar)?;

        let decls = vec![inlet, inlet2, wall, outlet, sym];
        let map = setup(&decls);
        let arrays = apply_conditions(&decls, &map, &vars, &config(), &NORMALS)?;

        assert_eq!(arrays.itypfb, &[2, 2, 6, 3, 4]);
        assert_eq!(arrays.izfppp, &[1, 4, 2, 3, 5]);

        // inlet by norm: inward normal times norm
        assert_eq!(arrays.rcodcl(0, 1, 0), 0.0);
        assert_eq!(arrays.rcodcl(0, 3, 0), 3.0);
        assert_eq!(arrays.rcodcl(0, it, 0), 20.0);
        assert_eq!(arrays.icodcl(it, 0), 0);
        assert_eq!((arrays.iqimp[0], arrays.icalke[0], arrays.dh[0], arrays.xintur[0]), (0, 2, 0.1, 0.02));

        // inlet by mass flow with direction: unit direction
        assert_eq!(arrays.rcodcl(0, 2, 1), 1.0);
        assert_eq!(arrays.rcodcl(0, 1, 1), 0.0);
        assert_eq!((arrays.iqimp[3], arrays.qimp[3], arrays.icalke[3], arrays.dh[3]), (1, 1.5, 1, 0.3));

        // rough wall
        assert_eq!(arrays.rcodcl(2, 1, 2), 0.01);
        assert_eq!(arrays.icodcl(1, 2), 5);
        assert_eq!(arrays.rcodcl(0, 1, 2), 0.5);
        assert_eq!(arrays.icodcl(it, 2), 5);
        assert_eq!((arrays.rcodcl(0, it, 2), arrays.rcodcl(1, it, 2)), (30.0, 100.0));
        assert_eq!(arrays.icodcl(0, 2), 0);

        // outlet: only Dirichlet conditions are written
        assert_eq!(arrays.icodcl(0, 3), 1);
        assert_eq!(arrays.rcodcl(0, 0, 3), 0.0);
        assert_eq!(arrays.icodcl(it, 3), 0);

        // symmetry: kind only
        for ivar in 0..nvar {
            assert_eq!(arrays.icodcl(ivar, 4), 0);
            assert_eq!(arrays.rcodcl(0, ivar, 4), UNSET_VALUE);
        }
        assert_eq!(arrays.iqimp[1], 0);
        Ok(())
    }

    #[test]
    fn inlet_variants_work() -> Result<(), ZoneError> {
        let vars = variables();
        let nvar = vars.len();
        let cases = [
            (
                InletVelocity::Norm {
                    norm: 2.0,
                    direction: Some([3.0, 0.0, 4.0]),
                },
                [1.2, 0.0, 1.6],
            ),
            (
                InletVelocity::VolumeFlow {
                    rate: 7.0,
                    direction: None,
                },
                [0.0, 0.0, 1.0],
            ),
        ];
        for (velocity, correct) in cases {
            let mut inlet = ZoneDecl::new("in1", "inlet", 1, "in", nvar)?;
            inlet.conditions.velocity = Some(velocity);
            let decls = vec![inlet];
            let map = setup(&decls);
            let arrays = apply_conditions(&decls, &map, &vars, &config(), &NORMALS)?;
            let u = [arrays.rcodcl(0, 1, 0), arrays.rcodcl(0, 2, 0), arrays.rcodcl(0, 3, 0)];
            for i in 0..3 {
                assert!((u[i] - correct[i]).abs() < 1e-15);
            }
        }
        Ok(())
    }

    #[test]
    fn smooth_wall_works() -> Result<(), ZoneError> {
        let vars = variables();
        let mut wall = ZoneDecl::new("wall1", "wall", 2, "wall", vars.len())?;
        wall.conditions.variables[0].code = Some(BcCode::Neumann);
        wall.conditions.variables[0].val3 = -4.0;
        wall.conditions.variables[4].code = Some(BcCode::WallFunction);
        wall.conditions.variables[4].val1 = 1e-3;
        let decls = vec![wall];
        let map = setup(&decls);
        let arrays = apply_conditions(&decls, &map, &vars, &config(), &NORMALS)?;
        assert_eq!(arrays.itypfb, &[0, 0, 5, 0, 0]);
        assert_eq!((arrays.icodcl(0, 2), arrays.rcodcl(2, 0, 2)), (3, -4.0));
        assert_eq!((arrays.icodcl(4, 2), arrays.rcodcl(0, 4, 2)), (5, 1e-3));
        assert_eq!(arrays.rcodcl(2, 1, 2), 0.0);
        Ok(())
    }

    #[test]
    fn catch_some_errors() -> Result<(), ZoneError> {
        let vars = variables();
        let nvar = vars.len();
        let mut inlet = ZoneDecl::new("in1", "inlet", 1, "in", nvar)?;
        inlet.conditions.velocity = Some(InletVelocity::Norm {
            norm: 1.0,
            direction: Some([0.0, 0.0, 0.0]),
        });
        let decls = vec![inlet];
        let map = setup(&decls);
        assert_eq!(
            apply_conditions(&decls, &map, &vars, &config(), &NORMALS).err(),
            Some(ZoneError::InvalidVector {
                label: "in1".to_string(),
                what: "velocity direction",
            })
        );
        let mut normals = NORMALS;
        normals[0] = [0.0, 0.0, 0.0];
        let mut inlet = ZoneDecl::new("in1", "inlet", 1, "in", nvar)?;
        inlet.conditions.velocity = Some(InletVelocity::MassFlow {
            rate: 1.0,
            direction: None,
        });
        let decls = vec![inlet];
        assert_eq!(
            apply_conditions(&decls, &map, &vars, &config(), &normals).err(),
            Some(ZoneError::InvalidVector {
                label: "in1".to_string(),
                what: "face normal",
            })
        );
        assert_eq!(
            apply_conditions(&decls, &map, &vars, &config(), &NORMALS[..4]).err(),
            Some(ZoneError::SizeMismatch {
                what: "face_normals",
                expected: 5,
                found: 4,
            })
        );
        let decls = vec![ZoneDecl::new("in1", "inlet", 1, "in", nvar - 1)?];
        assert_eq!(
            apply_conditions(&decls, &map, &vars, &config(), &NORMALS).err(),
            Some(ZoneError::SizeMismatch {
                what: "conditions.variables",
                expected: nvar,
                found: nvar - 1,
            })
        );
        Ok(())
    }
}
