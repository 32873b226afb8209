use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use mcap2json::{ConversionStats, McapReader};

use crate::writer::JsonLineWriter;

/// Suffix of the per-file output written in directory mode.
const DIRECTORY_OUTPUT_SUFFIX: &str = ".json.bz2";

#[derive(Args)]
pub struct ConvertArgs {
    /// Path to an mcap file, or a directory searched recursively for *.mcap
    input: PathBuf,

    /// Output file path (stdout if not specified); a .bz2 suffix compresses the
    /// output. Ignored for directory input, which writes <stem>.json.bz2 per file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Stop after writing N JSON objects (at least 1)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    limit: Option<u64>,

    /// Topics to include (all topics if none given)
    topics: Vec<String>,
}

impl ConvertArgs {
    pub fn run(self) -> Result<()> {
        if self.input.is_dir() {
            return self.convert_directory();
        }
        self.convert_file(&self.input, self.output.as_deref())
    }

    fn reader(&self) -> McapReader {
        let builder = McapReader::builder().with_topics(self.topics.iter().cloned());
        match self.limit {
            Some(limit) => builder.with_limit(limit).build(),
            None => builder.build(),
        }
    }

    fn convert_directory(&self) -> Result<()> {
        let files = find_mcap_files(&self.input);
        if files.is_empty() {
            bail!(
                "no mcap files found in directory '{}' (searched recursively)",
                self.input.display()
            );
        }
        if self.output.is_some() {
            eprintln!("# Ignoring --output for directory input");
        }

        let total = files.len();
        eprintln!("# Found {total} mcap files in directory (recursive search)");
        for (i, file) in files.iter().enumerate() {
            let output = directory_output_name(file);
            eprintln!(
                "\n# [{}/{total}] Processing: {} -> {}",
                i + 1,
                file_name(file),
                output.display()
            );
            self.convert_file(file, Some(&output))?;
        }
        eprintln!("\n# Completed processing {total} files");
        Ok(())
    }

    fn convert_file(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        let reader = self.reader();

        let total = reader.message_count(input)?;
        if let Some(total) = total {
            if self.topics.is_empty() {
                eprintln!("# MCAP file contains {total} messages");
            } else {
                eprintln!("# Selected topics contain {total} messages");
            }
        }
        let pb = self.progress_bar(total)?;

        let mut writer = JsonLineWriter::new(output, self.pretty)?;
        let stats = reader.for_each_record(input, |record| {
            writer.write_record(&record)?;
            pb.inc(1);
            Ok(())
        })?;
        writer.finish()?;
        pb.finish_and_clear();

        eprintln!("{}", summary_line(&stats, self.limit));
        Ok(())
    }

    fn progress_bar(&self, total: Option<u64>) -> Result<ProgressBar> {
        if self.quiet {
            return Ok(ProgressBar::hidden());
        }
        let Some(total) = total else {
            return Ok(ProgressBar::new_spinner());
        };
        let len = self.limit.map_or(total, |limit| total.min(limit));
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}, ETA: {eta})",
            )?
            .progress_chars("=>-"),
        );
        Ok(pb)
    }
}

fn summary_line(stats: &ConversionStats, limit: Option<u64>) -> String {
    let mut line = format!(
        "# Processed {} messages: {} decoded, {} raw",
        stats.messages, stats.decoded, stats.raw
    );
    if limit.is_some_and(|limit| stats.written >= limit) {
        line.push_str(&format!(" (output limited to {} messages)", stats.written));
    }
    line
}

/// Every `*.mcap` file under `dir`, sorted by file name.
fn find_mcap_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(%err, "failed to read directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == "mcap"))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files
}

/// `<stem>.json.bz2`, relative to the working directory.
fn directory_output_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    PathBuf::from(format!("{stem}{DIRECTORY_OUTPUT_SUFFIX}"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        convert: ConvertArgs,
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert!(Cli::try_parse_from(["mcapjson", "in.mcap", "-l", "0"]).is_err());

        let cli = Cli::try_parse_from(["mcapjson", "in.mcap", "-l", "1"]).unwrap();
        assert_eq!(cli.convert.limit, Some(1));
        let cli = Cli::try_parse_from(["mcapjson", "in.mcap", "/a", "/b"]).unwrap();
        assert_eq!(cli.convert.limit, None);
        assert_eq!(cli.convert.topics, ["/a", "/b"]);
    }

    #[test]
    fn mcap_files_are_found_recursively_and_sorted_by_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("zeta.mcap"), b"").unwrap();
        fs::write(nested.join("alpha.mcap"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let names: Vec<_> = find_mcap_files(dir.path())
            .iter()
            .map(|p| file_name(p))
            .collect();
        assert_eq!(names, ["alpha.mcap", "zeta.mcap"]);
    }

    #[test]
    fn directory_output_uses_file_stem() {
        assert_eq!(
            directory_output_name(Path::new("/data/run_01.mcap")),
            PathBuf::from("run_01.json.bz2")
        );
    }

    #[test]
    fn summary_line_mentions_limit_only_when_reached() {
        let stats = ConversionStats {
            messages: 3,
            decoded: 2,
            raw: 1,
            written: 3,
        };
        assert_eq!(
            summary_line(&stats, None),
            "# Processed 3 messages: 2 decoded, 1 raw"
        );
        assert_eq!(
            summary_line(&stats, Some(3)),
            "# Processed 3 messages: 2 decoded, 1 raw (output limited to 3 messages)"
        );
        assert_eq!(
            summary_line(&stats, Some(10)),
            "# Processed 3 messages: 2 decoded, 1 raw"
        );
    }
}
