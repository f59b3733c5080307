use std::{env, path::PathBuf, process};

fn help() {
    println!("Usage: activity-heatmap [options] <file.csv>");
    println!("Options:");
    println!("-h               Display this help message");
    println!();
    println!("Config:  ~/.config/activity-heatmap/config.toml, theme.toml");
    println!("Logs:    <data dir>/activity-heatmap/activity-heatmap.log (RUST_LOG to tune)");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut path: Option<PathBuf> = None;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                help();
                return;
            }
            flag if flag.starts_with('-') => {
                eprintln!("Invalid argument: {}", flag);
                help();
                process::exit(2);
            }
            file => path = Some(PathBuf::from(file)),
        }
    }

    let Some(path) = path else {
        help();
        process::exit(2);
    };

    // logging is best-effort; the viewer works without it
    if let Err(err) = activity_heatmap::init_logging() {
        eprintln!("Logging disabled: {}", err);
    }

    if let Err(err) = activity_heatmap::run(&path) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
