#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use log::LevelFilter;
use recognisers::brackets::{self, Alphabet};
use recognisers::{email, Recognisable};
use std::error::Error;
use std::io::{self, stdin, BufRead, BufReader, Write};
use std::process;

/// Lines of a reader, one at a time. Bytes that are not UTF-8 are replaced,
/// so a broken line still gets its verdict.
struct RawLines<R> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> RawLines<R> {
    fn new(reader: R) -> Self {
        RawLines {
            reader,
            buffer: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for RawLines<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                if self.buffer.last() == Some(&b'\n') {
                    self.buffer.pop();
                    if self.buffer.last() == Some(&b'\r') {
                        self.buffer.pop();
                    }
                }
                Some(String::from_utf8_lossy(&self.buffer).into_owned())
            }
            Err(e) => {
                error!("stopped reading input: {}", e);
                None
            }
        }
    }
}

/// Checks every line with `recogniser` and writes `accept` or `reject` for
/// it, optionally prefixed with the line number.
fn report<R, I, W>(
    recogniser: &R,
    lines: I,
    out: &mut W,
    with_lines: bool,
    debug: bool,
) -> io::Result<()>
where
    R: Recognisable,
    I: IntoIterator<Item = String>,
    W: Write,
{
    for (i, line) in lines.into_iter().enumerate() {
        let verdict = recogniser.try_accepts(&line);
        let status = match verdict {
            Ok(true) => "accept",
            _ => "reject",
        };

        if debug {
            match verdict {
                Ok(true) => (),
                Ok(false) => eprintln!("{} {:?}: ended outside the language", i + 1, line),
                Err(ref e) => eprintln!("{} {:?}: {}", i + 1, line, e),
            }
        }

        if with_lines {
            writeln!(out, "{} {}", i + 1, status)?;
        } else {
            writeln!(out, "{}", status)?;
        }
        out.flush()?;
    }
    Ok(())
}

/// The positional arguments if there are any, the lines of stdin otherwise.
fn input<'a>(values: Option<clap::Values<'a>>) -> Box<dyn Iterator<Item = String> + 'a> {
    match values {
        Some(values) => Box::new(values.map(String::from)),
        None => Box::new(RawLines::new(BufReader::new(stdin()))),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let matches = clap_app!(recognisers =>
        (version: "0.1")
        (about: "Checks words with deterministic and push-down automata")
        (@arg debug: -d --debug "print rejection reasons and debug messages to stderr")
        (@arg lines: --withlines "prefix every verdict with its line number")
        (@subcommand email =>
            (about: "Checks e-mail addresses given as arguments or via stdin")
            (@arg ADDRESS: ... "addresses to check")
        )
        (@subcommand brackets =>
            (about: "Checks that the brackets of each line given via stdin are balanced")
            (@arg alphabet: -a --alphabet +takes_value "the characters besides brackets (ascii|cyrillic)")
        )
    )
    .get_matches();

    let debug = matches.is_present("debug");
    let with_lines = matches.is_present("lines");

    let env = env_logger::Env::default();
    let mut logger = env_logger::Builder::from_env(env);
    if debug {
        logger.filter(None, LevelFilter::Debug);
    }
    logger.init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match matches.subcommand() {
        ("email", Some(options)) => {
            let dfa = email::automaton()?;
            info!("checking addresses");
            report(&dfa, input(options.values_of("ADDRESS")), &mut out, with_lines, debug)?;
        }
        ("brackets", Some(options)) => {
            let alphabet: Alphabet = match options.value_of("alphabet").unwrap_or("cyrillic").parse() {
                Ok(alphabet) => alphabet,
                Err(()) => {
                    eprintln!("unknown alphabet, expected `ascii` or `cyrillic`");
                    process::exit(2);
                }
            };
            let pda = brackets::automaton(alphabet)?;
            info!("checking brackets over the {:?} alphabet", alphabet);
            report(&pda, input(None), &mut out, with_lines, debug)?;
        }
        _ => {
            eprintln!("{}", matches.usage());
            process::exit(2);
        }
    }

    Ok(())
}
