//! Simple command that prints one or '-n count' identifiers of a chosen kind

use std::{env, io, io::Write, process::ExitCode};

fn main() -> io::Result<ExitCode> {
    let (kind, count) = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok((kind, count)) => (kind, count.unwrap_or(1)),
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [uuid1|uuid4|uuid6|uuid7|ulid] [-n count]",
                    program.as_deref().unwrap_or("idgen")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let mut buf = io::BufWriter::new(io::stdout());
    for _ in 0..count {
        match kind.as_str() {
            "uuid1" => writeln!(buf, "{}", idkit::uuid1())?,
            "uuid4" => writeln!(buf, "{}", idkit::uuid4())?,
            "uuid6" => writeln!(buf, "{}", idkit::uuid6())?,
            "uuid7" => writeln!(buf, "{}", idkit::uuid7())?,
            _ => writeln!(buf, "{}", idkit::ulid())?,
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(String, Option<usize>), String> {
    let mut kind = "ulid".to_owned();
    let mut count = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "uuid1" | "uuid4" | "uuid6" | "uuid7" | "ulid" => kind = arg,
            "-n" => {
                if count.is_some() {
                    return Err("option 'n' given more than once".to_owned());
                }
                let Some(n_arg) = args.next() else {
                    return Err("argument to option 'n' missing".to_owned());
                };
                let Ok(c) = n_arg.parse() else {
                    return Err(format!("invalid argument to option 'n': '{}'", n_arg));
                };
                count.replace(c);
            }
            _ => return Err(format!("unrecognized argument '{}'", arg)),
        }
    }
    Ok((kind, count))
}
