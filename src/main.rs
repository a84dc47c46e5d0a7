use std::path::{Path, PathBuf};
use std::process;

use clap::{App, Arg};
use log::error;

use xsd_to_go::gen::writer::GoWriter;
use xsd_to_go::gen::GenOptions;
use xsd_to_go::generate;

fn run() -> Result<(), xsd_to_go::schema::error::GenError> {
    let matches = App::new("xsd-to-go")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generates Go request/response types and validators from an XSD or WSDL schema")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .value_name("FILE")
                .help("Input .xsd or .wsdl file")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("exported")
                .short("e")
                .long("exported")
                .value_name("CALLS")
                .help("Calls to export, comma separated (default: every *Request root)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Output Go file (default: <input>_<version>.go)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("apiver")
                .long("apiver")
                .value_name("VERSION")
                .help("API version override when the schema declares none")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("JSON file with run options; command-line flags win")
                .takes_value(true),
        )
        .get_matches();

    let opts = match matches.value_of("config") {
        Some(path) => GenOptions::from_file(path)?,
        None => GenOptions::default(),
    };
    let opts = opts.override_with(
        matches.value_of("exported"),
        matches.value_of("apiver"),
        matches.value_of("output"),
    );

    let input = Path::new(matches.value_of("input").unwrap_or_default());
    let generated = generate(input, opts.exported.as_deref(), opts.api_version.as_deref())?;

    let output = match &opts.output {
        Some(p) => PathBuf::from(p),
        None => GoWriter::default_path(input, &generated.version),
    };
    GoWriter::new(&output).write(&generated.source)?;

    if generated.warnings > 0 {
        log::warn!(
            "{} constraint(s) skipped, generated validation is incomplete",
            generated.warnings
        );
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        error!("{}", err);
        process::exit(1);
    }
}
