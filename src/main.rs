//! Ribbon Fractal entry point
//!
//! Loads a driver table, evaluates the fractal, and writes the segments
//! as an SVG image (or a JSON dump when the output path ends in .json).

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::process;

use ribbon_fractal::render::write_svg;
use ribbon_fractal::{DriverTable, Settings, collect_segments};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "usage: {} <driver.txt> [output.svg|output.json] [settings.json]",
            args[0]
        );
        process::exit(2);
    }

    if let Err(err) = run(&args) {
        log::error!("{err}");
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let driver_path = &args[1];
    let output_path = args.get(2).map(String::as_str).unwrap_or("fractal.svg");
    let settings = Settings::load(args.get(3).map(String::as_str).unwrap_or("settings.json"));

    log::info!("Loading driver table from {driver_path}");
    let table = DriverTable::from_path(driver_path)?;
    log::info!("Loaded {} driver steps", table.len());

    let segments = collect_segments(&table, &settings.eval_config())?;
    log::info!("Generated {} segments", segments.len());

    let mut out = BufWriter::new(File::create(output_path)?);
    if output_path.ends_with(".json") {
        serde_json::to_writer_pretty(&mut out, &segments)?;
    } else {
        write_svg(&mut out, &segments, &settings.render)?;
    }
    log::info!("Wrote {output_path}");
    Ok(())
}
