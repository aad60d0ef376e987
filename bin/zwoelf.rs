#![forbid(unsafe_code)]
use std::io::{Read, Write};
use std::path::PathBuf;
use std::{env, ffi, fs, io, process};

use zwoelf::{compress, container, decompress};

fn main() -> CodingResult {
    CodingResult::catch_panic(|| {
        let flags = Flags::from_args(env::args_os()).unwrap_or_else(|ParamError| explain());
        run_coding(flags)
    })
}

fn run_coding(flags: Flags) -> Result<(), io::Error> {
    let operation = flags.operation.unwrap_or_else(explain);

    match operation {
        Operation::Encode => {
            let data = read_input(&flags.input)?;
            let compressed = compress(&data).map_err(invalid_data)?;
            write_stdout(&compressed)
        }
        Operation::Decode => {
            let data = read_input(&flags.input)?;
            let restored = decompress(&data).map_err(invalid_data)?;
            write_stdout(&restored)
        }
        Operation::Pack(dir) => {
            let blob = container::pack_dir(&dir)?;
            let compressed = compress(&blob).map_err(invalid_data)?;
            write_stdout(&compressed)
        }
        Operation::Unpack(dir) => {
            let data = read_input(&flags.input)?;
            let blob = decompress(&data).map_err(invalid_data)?;
            container::unpack(&blob, &dir)
        }
    }
}

fn read_input(input: &Input) -> Result<Vec<u8>, io::Error> {
    match input {
        Input::File(path) => fs::read(path),
        Input::Stdin => {
            let stdin = io::stdin();
            let mut stdin = stdin.lock();
            let mut data = Vec::new();
            stdin.read_to_end(&mut data)?;
            Ok(data)
        }
    }
}

fn write_stdout(data: &[u8]) -> Result<(), io::Error> {
    let out = io::stdout();
    let mut out = out.lock();
    out.write_all(data)?;
    out.flush()
}

fn invalid_data(err: zwoelf::LzwError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

struct Flags {
    input: Input,
    operation: Option<Operation>,
}

struct ParamError;

#[derive(Debug)]
enum Input {
    File(PathBuf),
    Stdin,
}

#[derive(Debug)]
enum Operation {
    Encode,
    Decode,
    Pack(PathBuf),
    Unpack(PathBuf),
}

fn explain<T>() -> T {
    println!(
        "Usage: zwoelf [-e|-d|-p <dir>|-u <dir>] [<file>]\n\
        Arguments:\n\
        -e\t compress <file> to stdout\n\
        -d\t decompress <file> to stdout\n\
        -p\t pack directory <dir> and compress it to stdout\n\
        -u\t decompress <file> and unpack it into <dir>\n\
        <file>\tfilepath or '-' for stdin (default)"
    );
    process::exit(1);
}

impl Default for Flags {
    fn default() -> Flags {
        Flags {
            input: Input::Stdin,
            operation: None,
        }
    }
}

fn command() -> clap::Command<'static> {
    clap::Command::new("zwoelf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compress byte streams and directory trees with 12-bit LZW")
        .arg(
            clap::Arg::new("encode")
                .short('e')
                .long("encode")
                .takes_value(false),
        )
        .arg(
            clap::Arg::new("decode")
                .short('d')
                .long("decode")
                .takes_value(false),
        )
        .arg(
            clap::Arg::new("pack")
                .short('p')
                .long("pack")
                .takes_value(true)
                .value_parser(clap::builder::ValueParser::path_buf()),
        )
        .arg(
            clap::Arg::new("unpack")
                .short('u')
                .long("unpack")
                .takes_value(true)
                .value_parser(clap::builder::ValueParser::path_buf()),
        )
        .group(
            clap::ArgGroup::new("operation")
                .args(&["decode", "encode", "pack", "unpack"])
                .multiple(false)
                .required(true),
        )
        .arg(
            clap::Arg::new("file")
                .default_value("-")
                .value_parser(clap::builder::ValueParser::path_buf()),
        )
}

impl Flags {
    fn from_args(mut args: impl Iterator<Item = ffi::OsString>) -> Result<Self, ParamError> {
        let mut flags = Flags::default();
        let matches = command().get_matches_from(args.by_ref());

        if matches.contains_id("decode") {
            flags.operation = Some(Operation::Decode);
        } else if matches.contains_id("encode") {
            flags.operation = Some(Operation::Encode);
        } else if let Some(dir) = matches.get_one::<PathBuf>("pack") {
            flags.operation = Some(Operation::Pack(dir.clone()));
        } else if let Some(dir) = matches.get_one::<PathBuf>("unpack") {
            flags.operation = Some(Operation::Unpack(dir.clone()));
        }

        match matches.get_one::<PathBuf>("file") {
            None => flags.input = Input::Stdin,
            Some(p) if *p == PathBuf::from("-") => flags.input = Input::Stdin,
            Some(p) => flags.input = Input::File(p.clone()),
        }

        Ok(flags)
    }
}

enum CodingResult {
    Ok,
    Err(io::Error),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> Result<(), io::Error>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            CodingResult::Err(err) => {
                eprintln!("{}", err);
                std::process::ExitCode::FAILURE
            }
            CodingResult::Panic => {
                eprintln!(
                    "The process failed irrecoverably! This should never happen and is a bug."
                );
                std::process::ExitCode::from(128)
            }
        }
    }
}
