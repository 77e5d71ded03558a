use log::{debug, info};
use ls8::config::Config;
use ls8::disassembler::Disassembler;
use ls8::loader;
use ls8::{Interpreter, LoadError, Vm};
use std::env;
use std::process;

const EXIT_USAGE: i32 = 1;
const EXIT_FILE_NOT_FOUND: i32 = 2;
const EXIT_BAD_PROGRAM: i32 = 3;
const EXIT_RUNTIME: i32 = 4;
const EXIT_CONFIG: i32 = 5;

struct Options {
    program_path: String,
    config_path: Option<String>,
    trace: bool,
    disassemble: bool,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} [--trace] [--disassemble] [--config FILE] filename.ls8", program);
    process::exit(EXIT_USAGE);
}

fn parse_args(args: &[String]) -> Option<Options> {
    let mut program_path = None;
    let mut config_path = None;
    let mut trace = false;
    let mut disassemble = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--trace" => trace = true,
            "--disassemble" => disassemble = true,
            "--config" => config_path = Some(iter.next()?.clone()),
            flag if flag.starts_with("--") => return None,
            path => {
                if program_path.is_some() {
                    return None;
                }
                program_path = Some(path.to_string());
            }
        }
    }

    Some(Options {
        program_path: program_path?,
        config_path,
        trace,
        disassemble,
    })
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("ls8");
    let options = parse_args(&args).unwrap_or_else(|| usage(program_name));

    let mut config = match &options.config_path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::default()),
    }
    .and_then(|mut config| config.apply_env().map(|_| config))
    .unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(EXIT_CONFIG);
    });
    config.trace |= options.trace;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter.as_str()))
        .init();
    debug!("Configuration: {:?}", config);

    let program = match loader::load_file(&options.program_path) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", e);
            let code = match e {
                LoadError::FileNotFound(_) => EXIT_FILE_NOT_FOUND,
                _ => EXIT_BAD_PROGRAM,
            };
            process::exit(code);
        }
    };

    let vm = Vm::with_program(&program).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(EXIT_BAD_PROGRAM);
    });

    if options.disassemble {
        match Disassembler::new(&vm).disassemble_program() {
            Ok(listing) => print!("{}", listing),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(EXIT_RUNTIME);
            }
        }
        return;
    }

    info!("Running {} ({} bytes)", options.program_path, program.len());
    let mut interpreter = Interpreter::new(vm);
    interpreter.set_trace(config.trace);

    if let Err(e) = interpreter.run_with_limit(config.max_instructions) {
        eprintln!("{}", e);
        process::exit(EXIT_RUNTIME);
    }
}
