use fvbc::prelude::*;
use std::path::Path;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "fvbc_zones",
    about = "Resolves the boundary zones of a case file and writes the solver's boundary arrays"
)]
struct Options {
    /// Case file (XML parameter document)
    case: String,

    /// Boundary faces (JSON file with the groups, colors, centers, and normals of each face)
    faces: String,

    /// Configuration (JSON file)
    #[structopt(long)]
    config: Option<String>,

    /// Upper bound on zone numbers (overrides the configuration)
    #[structopt(long)]
    max_zones: Option<i32>,

    /// Logging level (overrides the configuration)
    #[structopt(long)]
    log_level: Option<String>,

    /// Output directory for the boundary arrays (default /tmp/fvbc/results)
    #[structopt(long)]
    out_dir: Option<String>,
}

fn main() {
    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ZoneError> {
    // parse options
    let options = Options::from_args();

    // configuration
    let mut config = match &options.config {
        Some(path) => Config::read_json(path)?,
        None => Config::new(),
    };
    if let Some(value) = options.max_zones {
        config.set_max_zones(value)?;
    }
    if let Some(level) = &options.log_level {
        config.set_log_level(level)?;
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();
    log::debug!("\n{}", config);

    // load data
    let doc = Document::read_file(&options.case)?;
    let selector = GroupSelector::read_json(&options.faces)?;
    log::info!("{} boundary faces loaded from {}", selector.len(), options.faces);

    // resolve zones
    let variables = read_variables(&doc)?;
    let decls = read_zone_declarations(&doc, &variables)?;
    let map = resolve_zones(&decls, selector.len(), config.max_zones, &selector)?;
    println!("{}", map);

    // write boundary arrays
    match selector.normals() {
        Some(normals) => {
            let arrays = apply_conditions(&decls, &map, &variables, &config, &normals)?;
            let stem = Path::new(&options.case)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("case");
            let out_dir = options.out_dir.as_deref().unwrap_or(DEFAULT_OUT_DIR);
            let path = format!("{}/{}-boundary.json", out_dir, stem);
            arrays.write_json(&path)?;
            print!("{}", arrays);

            // message
            let thin_line = format!("{:─^1$}", "", path.len());
            println!("\n{}", thin_line);
            println!("boundary arrays written to:");
            println!("{}", path);
            println!("{}\n", thin_line);
        }
        None => log::warn!("boundary faces without normals; the boundary arrays are not written"),
    }

    // other sections of the case file
    let time = read_time_parameters(&doc)?;
    log::info!("{} algorithm, iterations = {:?}", if time.steady { "steady" } else { "unsteady" }, time.iterations);
    let restart = read_restart_parameters(&doc)?;
    log::info!("restart = {:?}", restart.restart);
    let properties = read_physical_properties(&doc)?;
    log::debug!("\n{}", properties);
    let output = read_output_control(&doc, &variables)?;
    log::debug!("\n{}", output);
    for profile in read_profiles(&doc)? {
        log::info!("{}", profile);
    }
    Ok(())
}
