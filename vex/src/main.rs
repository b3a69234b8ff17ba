#[macro_use]
extern crate clap;

use std::fs;
use std::process;

use clap::Arg;

use vasm::Config;
use vex::StopReason;

fn parse_hex_u32(text: &str) -> Result<u32, std::num::ParseIntError> {
    let digits = text.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16)
}

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .arg(Arg::with_name("INPUT").help("MIPS32 assembly source file to assemble and run").required(true).index(1))
        .arg(
            Arg::with_name("steps")
                .short("s")
                .long("steps")
                .takes_value(true)
                .value_name("N")
                .default_value("1000000")
                .help("Maximum number of instructions to execute before giving up"),
        )
        .arg(
            Arg::with_name("text_start")
                .long("text-start")
                .takes_value(true)
                .value_name("ADDR")
                .help("Overrides the text segment base address (hex)"),
        )
        .arg(
            Arg::with_name("data_start")
                .long("data-start")
                .takes_value(true)
                .value_name("ADDR")
                .help("Overrides the data segment base address (hex)"),
        )
        .get_matches();

    let input_path = matches.value_of("INPUT").unwrap();
    let max_steps = value_t_or_exit!(matches.value_of("steps"), u64);

    let mut config = Config::default();
    if let Some(text) = matches.value_of("text_start") {
        match parse_hex_u32(text) {
            Ok(addr) => config.text_start_addr = addr,
            Err(err) => {
                eprintln!("invalid --text-start value '{}': {}", text, err);
                process::exit(2);
            }
        }
    }
    if let Some(text) = matches.value_of("data_start") {
        match parse_hex_u32(text) {
            Ok(addr) => config.data_start_addr = addr,
            Err(err) => {
                eprintln!("invalid --data-start value '{}': {}", text, err);
                process::exit(2);
            }
        }
    }

    let source = match fs::read_to_string(input_path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("reading '{}': {}", input_path, err);
            process::exit(1);
        }
    };

    match vex::run(&source, config, max_steps) {
        Ok(outcome) => {
            let failed = matches!(outcome.reason, StopReason::Exception(_));
            vex::print_outcome(&outcome);
            if failed {
                process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
