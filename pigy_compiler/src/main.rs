use pigy_compiler::config::runtime::RuntimeConfig;
use pigy_compiler::sink::{OutputFormat, TokenPrinter};
use pigy_compiler::{logging, pipeline};
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};

const APP_NAME: &str = "pigyacc";
const DEFAULT_GRAMMAR: &str = "grammar.pigy";

#[derive(Debug)]
struct CliOptions {
    grammar: String,
    output: Option<String>,
    debug: bool,
    format: OutputFormat,
}

enum Command {
    Run(CliOptions),
    Help,
    Version,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or(APP_NAME);

    let options = match parse_args(&args[1.min(args.len())..]) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            print_help(program_name);
            return;
        }
        Ok(Command::Version) => {
            println!("{}, version {}", APP_NAME, env!("CARGO_PKG_VERSION"));
            return;
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("       {} --help", program_name);
            std::process::exit(1);
        }
    };

    println!("Welcome to {}.", APP_NAME);

    if let Err(error) = run(&options) {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }
}

fn run(options: &CliOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = if options.debug {
        RuntimeConfig::debug()
    } else {
        RuntimeConfig::default()
    };

    // Initialize global logging system
    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;

    // Validate pipeline configuration
    pipeline::validate_pipeline()?;

    let writer: Box<dyn Write + Send> = match &options.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    let printer = TokenPrinter::new(writer, options.format);

    let result = pipeline::process_file_with_config(&options.grammar, printer, &config)?;
    let summary = result.output?;

    eprintln!(
        "{}: {} tokens, {} declared tokens, {} states",
        options.grammar,
        summary.tokens_written,
        result.registries.tokens().len(),
        result.registries.states().len()
    );
    if let Some(path) = &options.output {
        eprintln!("Token dump written to {}", path);
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = CliOptions {
        grammar: DEFAULT_GRAMMAR.to_string(),
        output: None,
        debug: false,
        format: OutputFormat::Plain,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "-v" => return Ok(Command::Version),
            "-d" => options.debug = true,
            "--json" => options.format = OutputFormat::Json,
            "-y" => {
                options.grammar = iter
                    .next()
                    .ok_or("-y requires a grammar file")?
                    .to_string();
            }
            "-o" => {
                options.output = Some(iter.next().ok_or("-o requires an output file")?.to_string());
            }
            other => return Err(format!("Unknown option '{}'", other)),
        }
    }

    if options.grammar.is_empty() {
        return Err("No PigYacc file.".to_string());
    }

    Ok(Command::Run(options))
}

fn print_help(program_name: &str) {
    println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
    println!("Tokenizer for PigYacc grammar files");
    println!();
    println!("USAGE:");
    println!("    {} [-y FILE] [-o FILE] [-d] [--json]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    -y FILE     Grammar file to read (default: {})", DEFAULT_GRAMMAR);
    println!("    -o FILE     Write the token dump to FILE instead of stdout");
    println!("    -d          Debug mode: log state changes and every token");
    println!("    -v          Show version");
    println!("    --json      One JSON object per token instead of [id: payload]");
    println!("    --help      Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    PIGY_LOGGING_MIN_LEVEL          error | warning | info | debug");
    println!("    PIGY_LOGGING_USE_STRUCTURED     JSON log lines on stderr");
    println!("    PIGY_REQUIRE_PIGY_EXTENSION     Reject files without .pigy");
    println!();
    println!("BUILD:");
    println!("    {}", pigy_compiler::config::build_info::source_info());
}
