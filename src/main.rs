use std::{path::PathBuf, process};

use clap::{Parser, Subcommand};

use huffpack::{
    io::{self, WriteMode},
    Error, Tree,
};

/// represent all acceptable arguments
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// print more about what is going on, repeat for more detail
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbose: usize,

    #[clap(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// compresses a file
    Encode {
        #[clap(flatten)]
        files: Files,
    },

    /// restores a compressed file
    Decode {
        #[clap(flatten)]
        files: Files,
    },

    /// prints each byte value with its code
    Codebook {
        /// file to analyse, `-` for stdin
        input: PathBuf,
    },
}

#[derive(clap::Args)]
struct Files {
    /// file to read, `-` for stdin
    input: PathBuf,

    /// file to write, `-` for stdout; appended to if it exists
    output: PathBuf,

    /// replace the output file instead of appending to it
    #[clap(long)]
    truncate: bool,
}

impl Files {
    fn mode(&self) -> WriteMode {
        if self.truncate {
            WriteMode::Truncate
        } else {
            WriteMode::Append
        }
    }
}

fn init_logger(verbose: usize) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(mode: Mode) -> Result<(), Error> {
    match mode {
        Mode::Encode { files } => {
            let input = io::load(&files.input)?;
            let output = huffpack::encode(&input)?;
            io::store(&files.output, files.mode(), &output)?;
            log::info!("encoded {} bytes → {} bytes", input.len(), output.len());
        }
        Mode::Decode { files } => {
            let input = io::load(&files.input)?;
            let output = huffpack::decode(&input)?;
            io::store(&files.output, files.mode(), &output)?;
            log::info!("decoded {} bytes → {} bytes", input.len(), output.len());
        }
        Mode::Codebook { input } => {
            let tree = Tree::from_bytes(&io::load(&input)?)?;
            println!("{}", tree.format_codebook());
        }
    }
    Ok(())
}

fn main() {
    // get arguments, clap exits with usage on malformed ones
    let args = Args::parse();
    init_logger(args.verbose);

    if let Err(err) = run(args.mode) {
        eprintln!("huffpack: {}", err);
        process::exit(1);
    }
}
