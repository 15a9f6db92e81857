//! Transparent compression for input and output files.
//!
//! The codec is chosen from the file extension: `.zst` is zstd, `.gz` is
//! gzip, anything else is read and written as plain text.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::error::{Result, TrecError};

/// zstd level for exported streams (0 selects the library default).
const ZSTD_LEVEL: i32 = 0;

/// Compression codec of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Zstd,
}

impl Compression {
    /// Detect the codec from a path's final extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("zst") => Compression::Zstd,
            Some(ext) if ext.eq_ignore_ascii_case("gz") => Compression::Gzip,
            _ => Compression::None,
        }
    }

    /// The path with its compression extension removed, used to look at the
    /// underlying content extension (`examples.csv.zst` -> `examples.csv`).
    pub fn content_path<P: AsRef<Path>>(path: P) -> PathBuf {
        let path = path.as_ref();
        match Compression::from_path(path) {
            Compression::None => path.to_path_buf(),
            _ => path.with_extension(""),
        }
    }
}

/// Open a file for buffered reading, decompressing it if needed.
///
/// Failing to open the file is reported as [`TrecError::MissingInput`].
pub fn open_reader<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TrecError::missing_path(path, &e))?;

    let reader: Box<dyn BufRead> = match Compression::from_path(path) {
        Compression::None => Box::new(BufReader::new(file)),
        Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        Compression::Zstd => {
            let decoder = zstd::stream::read::Decoder::new(file)
                .map_err(|e| TrecError::data_load(format!("{}: {e}", path.display())))?;
            Box::new(BufReader::new(decoder))
        }
    };

    Ok(reader)
}

enum Sink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
    Zstd(zstd::stream::write::Encoder<'static, BufWriter<File>>),
}

/// A line-oriented output file, compressed according to its extension.
///
/// Call [`CompressedWriter::finish`] to flush the codec trailer. A writer
/// dropped without finishing still closes its file, but a compressed stream
/// left that way is truncated.
pub struct CompressedWriter {
    path: PathBuf,
    sink: Sink,
}

impl std::fmt::Debug for CompressedWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let codec = match self.sink {
            Sink::Plain(_) => Compression::None,
            Sink::Gzip(_) => Compression::Gzip,
            Sink::Zstd(_) => Compression::Zstd,
        };
        f.debug_struct("CompressedWriter")
            .field("path", &self.path)
            .field("codec", &codec)
            .finish()
    }
}

impl CompressedWriter {
    /// Create (or truncate) the output file, creating parent directories.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| TrecError::write_failed(parent, &e))?;
            }
        }

        let file = File::create(&path).map_err(|e| TrecError::write_failed(&path, &e))?;
        let out = BufWriter::new(file);

        let sink = match Compression::from_path(&path) {
            Compression::None => Sink::Plain(out),
            // GzEncoder writes a zero mtime, so output is reproducible.
            Compression::Gzip => Sink::Gzip(GzEncoder::new(out, flate2::Compression::default())),
            Compression::Zstd => Sink::Zstd(
                zstd::stream::write::Encoder::new(out, ZSTD_LEVEL)
                    .map_err(|e| TrecError::write_failed(&path, &e))?,
            ),
        };

        Ok(CompressedWriter { path, sink })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one line; a trailing newline is appended.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let result = self
            .write_all(line.as_bytes())
            .and_then(|_| self.write_all(b"\n"));
        result.map_err(|e| TrecError::write_failed(&self.path, &e))
    }

    /// Finish the compressed stream and flush everything to disk.
    pub fn finish(self) -> Result<()> {
        let path = self.path;
        let result = match self.sink {
            Sink::Plain(mut out) => out.flush(),
            Sink::Gzip(encoder) => encoder.finish().and_then(|mut out| out.flush()),
            Sink::Zstd(encoder) => encoder.finish().and_then(|mut out| out.flush()),
        };
        result.map_err(|e| TrecError::write_failed(&path, &e))
    }
}

impl Write for CompressedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Plain(out) => out.write(buf),
            Sink::Gzip(out) => out.write(buf),
            Sink::Zstd(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Plain(out) => out.flush(),
            Sink::Gzip(out) => out.flush(),
            Sink::Zstd(out) => out.flush(),
        }
    }
}
