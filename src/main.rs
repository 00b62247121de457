extern crate lumi;

use docopt::Docopt;
use serde::Deserialize;

use lumi::{compile, compile_unoptimized, passes, Directives};

const USAGE: &str = "
Lumi template compiler.

Usage:
  lumi [options] [-D <directive>]... <template>
  lumi (-h | --help)

Options:
  -D <directive>, --define <directive>
                   Seed a directive, as name=value (a bare name means true).
  --no-optimize    Skip the optimizer passes.
  --dump           Print the final node stream instead of compiled output.
  -v, --verbose    Debug logging.
  -h, --help       Show this screen.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_template: String,
    flag_define: Vec<String>,
    flag_no_optimize: bool,
    flag_dump: bool,
    flag_verbose: bool,
}

fn main() {
    let args: Args = Docopt::new(USAGE).and_then(|d| d.deserialize()).unwrap_or_else(|e| e.exit());

    let mut logger = env_logger::Builder::from_default_env();
    if args.flag_verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let mut seed = Directives::empty();
    for pair in &args.flag_define {
        match Directives::parse_pair(pair) {
            Some((name, value)) => seed.set(&name, value),
            None => {
                eprintln!("[ERROR] bad directive {:?}, expected name=value", pair);
                std::process::exit(1);
            }
        }
    }

    let source = match std::fs::read_to_string(&args.arg_template) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("[ERROR] could not load {}: {}", args.arg_template, e);
            std::process::exit(1);
        }
    };

    let result = if args.flag_dump {
        passes::parse(&source).map(|stream| {
            let stream = if args.flag_no_optimize { stream } else { passes::optimize(stream, &seed) };
            stream.to_string()
        })
    } else if args.flag_no_optimize {
        compile_unoptimized(&source, &seed)
    } else {
        compile(&source, &seed)
    };

    match result {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
