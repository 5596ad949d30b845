use crate::base::{BcCode, InletTurbulence, InletVelocity, Nature, VariableTable, ZoneDecl};
use crate::xml::{Document, Query};
use crate::zones::ZoneError;

/// Reads the boundary zone declarations and their conditions
///
/// The variable table must be built first because the per-variable conditions are indexed by it.
///
/// # Document layout
///
/// ```text
/// boundary_conditions
/// ├── boundary[@label, @name, @nature]   (text: selection expression)
/// ├── inlet[@label]
/// │   ├── velocity_pressure[@choice]     norm, flow1, flow2, direction_x|y|z
/// │   ├── turbulence[@choice]            hydraulic_diameter, turbulent_intensity
/// │   └── scalar[@label, @choice]        dirichlet, neumann, exchange_coefficient
/// ├── wall[@label]
/// │   ├── velocity_pressure[@choice]     dirichlet[@name], rough_wall
/// │   └── scalar[@label, @choice]
/// └── outlet[@label]
///     └── scalar[@label, @choice]
/// ```
pub fn read_zone_declarations(doc: &Document, variables: &VariableTable) -> Result<Vec<ZoneDecl>, ZoneError> {
    let nvar = variables.len();
    let n = doc.count(&Query::root().elements(&["boundary_conditions", "boundary"]));
    let mut decls = Vec::with_capacity(n);
    for i in 1..=n {
        let boundary = Query::root().element("boundary_conditions").element_num("boundary", i);
        let label = doc
            .get_attribute(&boundary.clone().attribute("label"))
            .ok_or("boundary zone must have a label")?;
        let nature = doc
            .get_attribute(&boundary.clone().attribute("nature"))
            .unwrap_or_default();
        let text = doc.get_attribute(&boundary.attribute("name")).unwrap_or_default();
        // integers beyond i32 saturate and are then rejected by the zone number range check
        let zone_number: i64 = text.trim().parse().map_err(|_| ZoneError::InvalidZoneNumber {
            label: label.clone(),
            text: text.clone(),
        })?;
        let zone_number = zone_number.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        let q = Query::root()
            .elements(&["boundary_conditions", "boundary"])
            .test_attribute("label", &label)
            .text();
        let selection = doc.get_text(&q).unwrap_or_default();
        let mut decl = ZoneDecl::new(&label, &nature, zone_number, &selection, nvar)?;
        match decl.nature {
            Nature::Inlet => {
                read_inlet(doc, variables, &mut decl)?;
                read_scalars(doc, variables, &mut decl)?;
            }
            Nature::Wall => {
                read_wall(doc, variables, &mut decl)?;
                read_scalars(doc, variables, &mut decl)?;
            }
            Nature::Outlet => read_scalars(doc, variables, &mut decl)?,
            Nature::Symmetry | Nature::Undefined => (),
        }
        log::debug!("{}", decl);
        decls.push(decl);
    }
    log::info!("{} boundary zones declared", decls.len());
    Ok(decls)
}

/// Returns the query of the condition block of a zone
fn block(decl: &ZoneDecl) -> Query {
    Query::root()
        .elements(&["boundary_conditions", decl.nature.tag()])
        .test_attribute("label", &decl.label)
}

/// Reads the inlet velocity and turbulence
fn read_inlet(doc: &Document, variables: &VariableTable, decl: &mut ZoneDecl) -> Result<(), ZoneError> {
    let vp = block(decl).element("velocity_pressure");
    if let Some(choice) = doc.get_attribute(&vp.clone().attribute("choice")) {
        let (kind, with_direction) = match choice.strip_suffix("+direction") {
            Some(kind) => (kind.to_string(), true),
            None => (choice.clone(), false),
        };
        let direction = if with_direction {
            let mut d = [0.0; 3];
            for (i, name) in ["direction_x", "direction_y", "direction_z"].iter().enumerate() {
                d[i] = doc.get_double(&vp.clone().element(name).text())?.unwrap_or(0.0);
            }
            Some(d)
        } else {
            None
        };
        let value = match kind.as_str() {
            "norm" | "flow1" | "flow2" => doc.get_double(&vp.element(&kind).text())?.unwrap_or(0.0),
            _ => return Err("inlet velocity choice must be norm, flow1, or flow2, optionally with +direction".into()),
        };
        decl.conditions.velocity = Some(match kind.as_str() {
            "norm" => InletVelocity::Norm { norm: value, direction },
            "flow1" => InletVelocity::MassFlow { rate: value, direction },
            _ => InletVelocity::VolumeFlow { rate: value, direction },
        });
        if kind == "norm" {
            for ivar in variables.velocity() {
                decl.conditions.variables[ivar].code = Some(BcCode::Dirichlet);
            }
        }
    }

    let turb = block(decl).element("turbulence");
    let choice = doc.get_attribute(&turb.clone().attribute("choice"));
    let dh = || doc.get_double(&turb.clone().element("hydraulic_diameter").text());
    decl.conditions.turbulence = match choice.as_deref() {
        Some("hydraulic_diameter") => Some(InletTurbulence::HydraulicDiameter {
            dh: dh()?.unwrap_or(0.0),
        }),
        Some("turbulent_intensity") => {
            let q = turb.clone().element("turbulent_intensity").text();
            // percent in the document
            let intensity = doc.get_double(&q)?.unwrap_or(0.0) * 0.01;
            Some(InletTurbulence::TurbulentIntensity {
                dh: dh()?.unwrap_or(0.0),
                intensity,
            })
        }
        _ => None,
    };
    Ok(())
}

/// Reads the wall velocity and roughness
fn read_wall(doc: &Document, variables: &VariableTable, decl: &mut ZoneDecl) -> Result<(), ZoneError> {
    let vp = block(decl).element("velocity_pressure");
    if doc.get_attribute(&vp.clone().attribute("choice")).as_deref() == Some("on") {
        for ivar in variables.velocity() {
            let q = vp
                .clone()
                .test_attribute("choice", "on")
                .element("dirichlet")
                .test_attribute("name", &variables.all[ivar].name)
                .text();
            if let Some(value) = doc.get_double(&q)? {
                let cond = &mut decl.conditions.variables[ivar];
                cond.code = Some(BcCode::Dirichlet);
                cond.val1 = value;
            }
        }
    }
    let q = vp.element("rough_wall").text();
    decl.conditions.roughness = doc.get_double(&q)?.filter(|r| *r >= 0.0);
    Ok(())
}

/// Reads the conditions of the user scalars
fn read_scalars(doc: &Document, variables: &VariableTable, decl: &mut ZoneDecl) -> Result<(), ZoneError> {
    for (ivar, label) in variables.user_scalars() {
        let base = block(decl).element("scalar").test_attribute("label", label);
        let choice = match doc.get_attribute(&base.clone().attribute("choice")) {
            Some(choice) => choice,
            None => continue,
        };
        let value = |name: &str| doc.get_double(&base.clone().element(name).text());
        let cond = &mut decl.conditions.variables[ivar];
        match BcCode::from_choice(&choice) {
            Some(BcCode::Neumann) => {
                if let Some(flux) = value("neumann")? {
                    cond.code = Some(BcCode::Neumann);
                    cond.val3 = flux;
                }
            }
            Some(code) => {
                if let Some(v) = value("dirichlet")? {
                    cond.code = Some(if code == BcCode::WallFunction {
                        BcCode::WallFunction
                    } else {
                        BcCode::Dirichlet
                    });
                    cond.val1 = v;
                }
                if code == BcCode::ExchangeCoefficient {
                    if let Some(h) = value("exchange_coefficient")? {
                        cond.code = Some(BcCode::ExchangeCoefficient);
                        cond.val2 = h;
                    }
                }
            }
            None => (),
        }
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::read_zone_declarations;
    use crate::base::{BcCode, InletTurbulence, InletVelocity, Nature, TurbulenceModel, VariableTable, UNSET_VALUE};
    use crate::selector::GroupSelector;
    use crate::xml::Document;
    use crate::zones::{resolve_zones, ZoneError};

    const BOUNDARIES: &str = r#"
<case>
  <boundary_conditions>
    <boundary label="in1" name="1" nature="inlet">inlet</boundary>
    <boundary label="wall1" name="2" nature="wall">walls or 7</boundary>
    <boundary label="out1" name="3" nature="outlet">outlet</boundary>
    <boundary label="sym" name="4" nature="symmetry">sym</boundary>
    <inlet label="in1">
      <velocity_pressure choice="flow2+direction">
        <flow2>0.5</flow2>
        <direction_x>1</direction_x>
        <direction_z>-1</direction_z>
      </velocity_pressure>
      <turbulence choice="turbulent_intensity">
        <hydraulic_diameter>0.2</hydraulic_diameter>
        <turbulent_intensity>5</turbulent_intensity>
      </turbulence>
      <scalar label="T" choice="dirichlet"><dirichlet>300</dirichlet></scalar>
    </inlet>
    <wall label="wall1">
      <velocity_pressure choice="on">
        <dirichlet name="velocity_U">1.5</dirichlet>
        <rough_wall>0.001</rough_wall>
      </velocity_pressure>
      <scalar label="T" choice="exchange_coefficient">
        <dirichlet>280</dirichlet>
        <exchange_coefficient>12</exchange_coefficient>
      </scalar>
      <scalar label="C" choice="wall_function"><dirichlet>0.1</dirichlet></scalar>
    </wall>
    <outlet label="out1">
      <scalar label="T" choice="neumann"><neumann>-3</neumann></scalar>
      <scalar label="C" choice="dirichlet"/>
    </outlet>
  </boundary_conditions>
</case>
"#;

    fn variables() -> VariableTable {
        VariableTable::new(TurbulenceModel::KEpsilon, false, &["T".to_string(), "C".to_string()]).unwrap()
    }

    #[test]
    fn read_works() -> Result<(), ZoneError> {
        let doc = Document::parse(BOUNDARIES)?;
        let vars = variables();
        let (it, ic) = (6, 7);
        let decls = read_zone_declarations(&doc, &vars)?;
        assert_eq!(decls.len(), 4);
        let labels: Vec<_> = decls.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, &["in1", "wall1", "out1", "sym"]);
        let numbers: Vec<_> = decls.iter().map(|d| d.zone_number).collect();
        assert_eq!(numbers, &[1, 2, 3, 4]);
        assert_eq!(decls[1].selection, "walls or 7");
        assert_eq!(decls[3].nature, Nature::Symmetry);

        let inlet = &decls[0].conditions;
        assert_eq!(
            inlet.velocity,
            Some(InletVelocity::VolumeFlow {
                rate: 0.5,
                direction: Some([1.0, 0.0, -1.0])
            })
        );
        assert_eq!(
            inlet.turbulence,
            Some(InletTurbulence::TurbulentIntensity {
                dh: 0.2,
                intensity: 0.05
            })
        );
        assert_eq!(inlet.variables[it].code, Some(BcCode::Dirichlet));
        assert_eq!(inlet.variables[it].val1, 300.0);
        assert_eq!(inlet.variables[1].code, None);

        let wall = &decls[1].conditions;
        assert_eq!(wall.roughness, Some(0.001));
        assert!(decls[1].is_rough());
        assert_eq!((wall.variables[1].code, wall.variables[1].val1), (Some(BcCode::Dirichlet), 1.5));
        assert_eq!(wall.variables[2].code, None);
        assert_eq!(wall.variables[it].code, Some(BcCode::ExchangeCoefficient));
        assert_eq!((wall.variables[it].val1, wall.variables[it].val2), (280.0, 12.0));
        assert_eq!(wall.variables[ic].code, Some(BcCode::WallFunction));
        assert_eq!(wall.variables[ic].val1, 0.1);

        let outlet = &decls[2].conditions;
        assert_eq!((outlet.variables[it].code, outlet.variables[it].val3), (Some(BcCode::Neumann), -3.0));
        assert_eq!((outlet.variables[ic].code, outlet.variables[ic].val1), (None, UNSET_VALUE));
        Ok(())
    }

    #[test]
    fn inlet_norm_works() -> Result<(), ZoneError> {
        let doc = Document::parse(
            r#"<case><boundary_conditions>
                 <boundary label="in" name="5" nature="inlet">all[]</boundary>
                 <inlet label="in">
                   <velocity_pressure choice="norm"><norm>2</norm></velocity_pressure>
                   <turbulence choice="hydraulic_diameter"><hydraulic_diameter>0.3</hydraulic_diameter></turbulence>
                 </inlet>
               </boundary_conditions></case>"#,
        )?;
        let vars = variables();
        let decls = read_zone_declarations(&doc, &vars)?;
        let c = &decls[0].conditions;
        assert_eq!(
            c.velocity,
            Some(InletVelocity::Norm {
                norm: 2.0,
                direction: None
            })
        );
        assert_eq!(c.turbulence, Some(InletTurbulence::HydraulicDiameter { dh: 0.3 }));
        for ivar in 1..4 {
            assert_eq!(c.variables[ivar].code, Some(BcCode::Dirichlet));
            assert_eq!(c.variables[ivar].val1, UNSET_VALUE);
        }
        Ok(())
    }

    #[test]
    fn catch_some_errors() -> Result<(), ZoneError> {
        let vars = variables();
        let doc = Document::parse(
            r#"<case><boundary_conditions><boundary label="a" name="x1" nature="wall">A</boundary></boundary_conditions></case>"#,
        )?;
        assert_eq!(
            read_zone_declarations(&doc, &vars).err(),
            Some(ZoneError::InvalidZoneNumber {
                label: "a".to_string(),
                text: "x1".to_string()
            })
        );
        let doc = Document::parse(
            r#"<case><boundary_conditions><boundary label="a" name="1" nature="free_surface">A</boundary></boundary_conditions></case>"#,
        )?;
        assert_eq!(
            read_zone_declarations(&doc, &vars).err(),
            Some(ZoneError::UnknownNature {
                label: "a".to_string(),
                nature: "free_surface".to_string()
            })
        );
        let doc = Document::parse(
            r#"<case><boundary_conditions><boundary name="1" nature="wall">A</boundary></boundary_conditions></case>"#,
        )?;
        assert_eq!(
            read_zone_declarations(&doc, &vars).err(),
            Some(ZoneError::Document("boundary zone must have a label"))
        );
        let doc = Document::parse(
            r#"<case><boundary_conditions>
                 <boundary label="a" name="1" nature="inlet">A</boundary>
                 <inlet label="a"><velocity_pressure choice="speed"/></inlet>
               </boundary_conditions></case>"#,
        )?;
        assert_eq!(
            read_zone_declarations(&doc, &vars).err(),
            Some(ZoneError::Document(
                "inlet velocity choice must be norm, flow1, or flow2, optionally with +direction"
            ))
        );
        let doc = Document::parse(
            r#"<case><boundary_conditions>
                 <boundary label="w" name="1" nature="wall">A</boundary>
                 <wall label="w"><velocity_pressure choice="off"><rough_wall>abc</rough_wall></velocity_pressure></wall>
               </boundary_conditions></case>"#,
        )?;
        assert_eq!(
            read_zone_declarations(&doc, &vars).err(),
            Some(ZoneError::Document("cannot parse real number"))
        );
        Ok(())
    }

    #[test]
    fn huge_zone_numbers_are_out_of_range() -> Result<(), ZoneError> {
        let vars = variables();
        let selector = GroupSelector::from_groups(&["A"]);
        for (text, saturated) in [("99999999999", i32::MAX), ("-99999999999", i32::MIN)] {
            let xml = format!(
                r#"<case><boundary_conditions><boundary label="a" name="{}" nature="wall">A</boundary></boundary_conditions></case>"#,
                text
            );
            let doc = Document::parse(&xml)?;
            let decls = read_zone_declarations(&doc, &vars)?;
            assert_eq!(decls[0].zone_number, saturated);
            assert_eq!(
                resolve_zones(&decls, 1, 100, &selector).err(),
                Some(ZoneError::ConfigurationRange {
                    label: "a".to_string(),
                    zone_number: saturated,
                    max_zones: 100,
                })
            );
        }
        Ok(())
    }
}
