//! Byte sources and sinks for the command line.
//! A path of `-` stands for stdin or stdout.

use std::{
    fs::{self, OpenOptions},
    io::{self, Read, Write},
    path::Path,
};

use crate::error::{Error, Result};

pub const STDIO: &str = "-";

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO
}

fn file_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |source| Error::File {
        path: path.to_path_buf(),
        source,
    }
}

/// read a whole file, or all of stdin
pub fn load(path: &Path) -> Result<Vec<u8>> {
    if is_stdio(path) {
        // abort when there is no input from stdin
        if atty::is(atty::Stream::Stdin) {
            return Err(Error::NoStdin);
        }
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        return Ok(data);
    }
    let data = fs::read(path).map_err(file_error(path))?;
    log::debug!("loaded {}, {} bytes", path.display(), data.len());
    Ok(data)
}

/// how an existing output file is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Append,
    Truncate,
}

/// open `path` for writing, creating it if needed
pub fn open_sink(path: &Path, mode: WriteMode) -> Result<Box<dyn Write>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdout()));
    }
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Append => options.append(true),
        WriteMode::Truncate => options.write(true).truncate(true),
    };
    let file = options.open(path).map_err(file_error(path))?;
    Ok(Box::new(io::BufWriter::new(file)))
}

pub fn append_or_create(path: &Path) -> Result<Box<dyn Write>> {
    open_sink(path, WriteMode::Append)
}

/// write all of `data` to `path` and flush
pub fn store(path: &Path, mode: WriteMode, data: &[u8]) -> Result<()> {
    let mut sink = open_sink(path, mode)?;
    sink.write_all(data).map_err(file_error(path))?;
    sink.flush().map_err(file_error(path))?;
    log::debug!("wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}
