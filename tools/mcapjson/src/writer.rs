use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Result;
use bzip2::{Compression, write::BzEncoder};

/// File extension that switches the output to bzip2 compression.
const BZIP2_EXTENSION: &str = "bz2";

enum Dest {
    Plain(Box<dyn Write>),
    Bzip2(BzEncoder<BufWriter<fs::File>>),
}

/// Writes one JSON object per line (or per indented block with `pretty`).
pub struct JsonLineWriter {
    dest: Dest,
    pretty: bool,
    flush_each_record: bool,
}

impl JsonLineWriter {
    /// Write to `output`, or stdout when `None`. A `.bz2` path is compressed.
    pub fn new(output: Option<&Path>, pretty: bool) -> Result<Self> {
        let flush_each_record = output.is_none();
        let dest = match output {
            Some(path) if is_bzip2_path(path) => Dest::Bzip2(BzEncoder::new(
                BufWriter::new(fs::File::create(path)?),
                Compression::default(),
            )),
            Some(path) => Dest::Plain(Box::new(BufWriter::new(fs::File::create(path)?))),
            None => Dest::Plain(Box::new(BufWriter::new(io::stdout().lock()))),
        };
        Ok(Self {
            dest,
            pretty,
            flush_each_record,
        })
    }

    fn sink(&mut self) -> &mut dyn Write {
        match &mut self.dest {
            Dest::Plain(w) => w,
            Dest::Bzip2(w) => w,
        }
    }

    pub fn write_record(&mut self, record: &serde_json::Value) -> Result<()> {
        let pretty = self.pretty;
        let flush = self.flush_each_record;
        let sink = self.sink();
        if pretty {
            serde_json::to_writer_pretty(&mut *sink, record)?;
        } else {
            serde_json::to_writer(&mut *sink, record)?;
        }
        sink.write_all(b"\n")?;
        if flush {
            sink.flush()?;
        }
        Ok(())
    }

    /// Flush buffered output and finalize the bzip2 stream, if any.
    pub fn finish(self) -> Result<()> {
        match self.dest {
            Dest::Plain(mut w) => w.flush()?,
            Dest::Bzip2(w) => w.finish()?.flush()?,
        }
        Ok(())
    }
}

fn is_bzip2_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == BZIP2_EXTENSION)
}
