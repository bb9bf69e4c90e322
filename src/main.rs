use std::env;
use std::process;

use lumiere::{export, midi, Timeline};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<&String> = None;
    let mut csv_path: Option<&String> = None;
    let mut json_path: Option<&String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => {
                i += 1;
                match args.get(i) {
                    Some(path) => json_path = Some(path),
                    None => {
                        eprintln!("--json requires a path");
                        process::exit(1);
                    }
                }
            }
            arg => {
                if input_path.is_none() {
                    input_path = Some(&args[i]);
                } else if csv_path.is_none() {
                    csv_path = Some(&args[i]);
                } else {
                    eprintln!("Unexpected argument '{}'", arg);
                    process::exit(1);
                }
            }
        }
        i += 1;
    }

    let input_path = match input_path {
        Some(path) => path,
        None => {
            eprintln!("Usage: lumiere <input.mid> [output.csv] [--json <path>]");
            process::exit(1);
        }
    };

    let score = match midi::load_file(input_path) {
        Ok(score) => score,
        Err(e) => {
            eprintln!("Error reading '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    let timeline = match Timeline::extract(&score) {
        Ok(timeline) => timeline,
        Err(e) => {
            eprintln!("Extraction error: {}", e);
            process::exit(1);
        }
    };

    println!("Instruments: {}", timeline.instrument_count());
    println!("Frames: {}", timeline.frames().len());
    println!("Max concurrent notes: {}", timeline.max_concurrent_notes());
    println!("Duration: {:.3}s", timeline.duration());

    if let Some(path) = csv_path {
        if let Err(e) = export::write_csv_file(&timeline, path) {
            eprintln!("Error writing '{}': {}", path, e);
            process::exit(1);
        }
        println!("Wrote timeline CSV to {}", path);
    }

    if let Some(path) = json_path {
        if let Err(e) = export::write_json_file(&timeline, path) {
            eprintln!("Error writing '{}': {}", path, e);
            process::exit(1);
        }
        println!("Wrote timeline JSON to {}", path);
    }
}
