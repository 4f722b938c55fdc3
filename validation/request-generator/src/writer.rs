//! Request file output.
//!
//! One line per request: `width;height;minx,miny,maxx,maxy`, numbers in
//! `%.8g` form. The first line of each file also carries the invocation
//! that produced it as a fourth field.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use wms_common::BoundingBox;

use crate::config::{GeneratorConfig, PixelSize};
use crate::error::{GeneratorError, GeneratorResult};
use crate::format::g8;
use crate::generator::Sample;

/// Format one request line, without annotation or line terminator.
pub fn format_line(size: PixelSize, bbox: &BoundingBox) -> String {
    format!(
        "{};{};{},{},{},{}",
        size.width,
        size.height,
        g8(bbox.min_x),
        g8(bbox.min_y),
        g8(bbox.max_x),
        g8(bbox.max_y)
    )
}

/// Writes request lines to a single sink.
pub struct RequestWriter<W: Write> {
    out: W,
    annotation: Option<String>,
    lines: u64,
}

impl<W: Write> RequestWriter<W> {
    /// `annotation` is appended to the first line only.
    pub fn new(out: W, annotation: Option<String>) -> Self {
        Self {
            out,
            annotation,
            lines: 0,
        }
    }

    pub fn write_request(&mut self, size: PixelSize, bbox: &BoundingBox) -> io::Result<()> {
        let line = format_line(size, bbox);
        match self.annotation.take() {
            Some(annotation) => writeln!(self.out, "{line};{annotation}")?,
            None => writeln!(self.out, "{line}")?,
        }
        self.lines += 1;
        Ok(())
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush and hand back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

struct OutputFile {
    path: PathBuf,
    writer: RequestWriter<BufWriter<File>>,
}

impl OutputFile {
    fn create(path: &Path, annotation: String) -> GeneratorResult<Self> {
        let file = File::create(path).map_err(|e| GeneratorError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: RequestWriter::new(BufWriter::new(file), Some(annotation)),
        })
    }

    fn write(&mut self, size: PixelSize, bbox: &BoundingBox) -> GeneratorResult<()> {
        self.writer
            .write_request(size, bbox)
            .map_err(|e| GeneratorError::io(&self.path, e))
    }

    fn finish(self) -> GeneratorResult<()> {
        let Self { path, writer } = self;
        writer.finish().map_err(|e| GeneratorError::io(&path, e))?;
        Ok(())
    }
}

/// The primary output file and, when reprojecting, the secondary one.
pub struct SampleWriter {
    primary: OutputFile,
    secondary: Option<OutputFile>,
}

impl SampleWriter {
    /// Create (truncating) the output files named by the configuration.
    pub fn create(config: &GeneratorConfig) -> GeneratorResult<Self> {
        let invocation = config.invocation();
        let primary = OutputFile::create(&config.output, invocation.clone())?;
        let secondary = match &config.output2 {
            Some(path) => Some(OutputFile::create(path, invocation)?),
            None => None,
        };
        Ok(Self { primary, secondary })
    }

    /// Paths of the files being written, primary first.
    pub fn paths(&self) -> Vec<PathBuf> {
        std::iter::once(&self.primary)
            .chain(self.secondary.as_ref())
            .map(|file| file.path.clone())
            .collect()
    }

    pub fn write_sample(&mut self, sample: &Sample) -> GeneratorResult<()> {
        self.primary.write(sample.size, &sample.bbox)?;
        if let (Some(secondary), Some(reprojected)) = (&mut self.secondary, &sample.reprojected) {
            secondary.write(reprojected.size, &reprojected.bbox)?;
        }
        Ok(())
    }

    /// Flush every file.
    pub fn finish(self) -> GeneratorResult<()> {
        self.primary.finish()?;
        if let Some(secondary) = self.secondary {
            secondary.finish()?;
        }
        Ok(())
    }
}
