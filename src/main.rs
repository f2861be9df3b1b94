use std::path::Path;
use std::process;

use clap::{App, Arg};

use osm_area_assembler::{assemble_areas, output, AssemblerConfig};

fn main() {
    env_logger::init();

    let params = create_cli_interface().get_matches();

    let input = params
        .value_of("input")
        .expect("Could not find parameter value for input");
    let config = AssemblerConfig {
        debug: params.is_present("debug"),
    };

    let run = match assemble_areas(Path::new(input), &config) {
        Ok(run) => run,
        Err(err) => {
            eprintln!("Could not assemble areas from {}: {}", input, err);
            process::exit(1);
        }
    };

    let valid = run.areas.iter().filter(|a| a.is_valid()).count();
    println!(
        "Assembled {} areas ({} valid, {} shells), {} problems reported, {} incomplete relations skipped",
        run.areas.len(),
        valid,
        run.areas.len() - valid,
        run.problems.len(),
        run.skipped_relations
    );

    if let Some(path) = params.value_of("output") {
        if let Err(err) = output::to_file(Path::new(path), &run.areas) {
            eprintln!("Could not write output file {}: {}", path, err);
            process::exit(1);
        }
    }
}

fn create_cli_interface<'a>() -> App<'a, 'a> {
    App::new("OpenStreetMap Area Assembler")
        .version("0.1")
        .about("Assemble polygonal areas from the multipolygon relations of a pbf file")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .value_name("PBF FILE")
                .help("Input pbf file")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Write the assembled areas to this file as text")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Enable the assembler's debug tracing"),
        )
}
