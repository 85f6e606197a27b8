//! `lattice-export`: build every lattice in a presence-map file and write
//! one STL per instance. `lattice-export convert` turns a delimited text
//! table (header row of edge keys, one row per lattice) into that file.
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for per-instance
//! detail.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use lattice_backend::{
    MeshBackend, MeshBackendOptions, StlFormat, DEFAULT_STRUT_SEGMENTS, MIN_STRUT_SEGMENTS,
};
use lattice_batch::run_batch;
use lattice_core::LatticeConfig;
use lattice_io::{load_config_file, load_lattices_file, load_table_file, save_lattices_file};
use tracing::info;

/// Export 3x3x3 strut lattices with top and bottom plates as STL files
#[derive(Parser, Debug)]
#[command(name = "lattice-export", version, about)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    export: ExportArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a delimited edge table into a presence-map JSON file
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// JSON list of edge presence maps
    #[arg(long, value_name = "FILE", default_value = "lattices.json")]
    input: PathBuf,

    /// Directory receiving one <name>.stl per lattice
    #[arg(long, value_name = "DIR", default_value = "exports")]
    output: PathBuf,

    /// Geometry config JSON; omitted fields keep their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    ascii: bool,

    /// Sides per strut cross-section
    #[arg(long, default_value_t = DEFAULT_STRUT_SEGMENTS, value_parser = parse_segments)]
    segments: usize,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Text table: header row of edge keys, then one row of 0/1 cells per lattice
    #[arg(value_name = "TABLE")]
    table: PathBuf,

    /// Presence-map JSON to write
    #[arg(long, value_name = "FILE", default_value = "lattices.json")]
    output: PathBuf,

    /// Field separator
    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

fn parse_segments(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{e}"))?;
    if n < MIN_STRUT_SEGMENTS {
        return Err(format!("need at least {MIN_STRUT_SEGMENTS} segments, got {n}"));
    }
    Ok(n)
}

impl ExportArgs {
    fn backend_options(&self) -> MeshBackendOptions {
        MeshBackendOptions {
            segments: self.segments,
            format: if self.ascii {
                StlFormat::Ascii
            } else {
                StlFormat::Binary
            },
            output_dir: Some(self.output.clone()),
        }
    }

    fn load_config(&self) -> Result<LatticeConfig> {
        match &self.config {
            Some(path) => load_config_file(path)
                .with_context(|| format!("reading config {}", path.display())),
            None => Ok(LatticeConfig::default()),
        }
    }

    fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let maps = load_lattices_file(&self.input)
            .with_context(|| format!("reading lattices from {}", self.input.display()))?;
        info!(lattices = maps.len(), output = %self.output.display(), "starting export");

        let mut backend = MeshBackend::new(self.backend_options());
        let report = run_batch(&maps, &config, &mut backend).context("batch aborted")?;
        print!("{}", report.to_text());

        if !report.all_exported() {
            bail!(
                "{} of {} lattices failed",
                report.failed_count(),
                report.outcomes.len()
            );
        }
        Ok(())
    }
}

impl ConvertArgs {
    /// Returns the number of lattices written.
    fn run(&self) -> Result<usize> {
        let maps = load_table_file(&self.table, self.delimiter)
            .with_context(|| format!("reading table {}", self.table.display()))?;
        save_lattices_file(&maps, &self.output)
            .with_context(|| format!("writing {}", self.output.display()))?;
        info!(lattices = maps.len(), output = %self.output.display(), "table converted");
        Ok(maps.len())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Some(Command::Convert(args)) => {
            let count = args.run()?;
            println!(
                "Converted {} lattices to {}",
                count,
                args.output.display()
            );
            Ok(())
        }
        None => cli.export.run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export_args(argv: &[&str]) -> ExportArgs {
        let cli = Cli::try_parse_from(argv.iter().copied()).unwrap();
        assert!(cli.command.is_none());
        cli.export
    }

    #[test]
    fn test_defaults() {
        let args = export_args(&["lattice-export"]);
        assert_eq!(args.input, PathBuf::from("lattices.json"));
        assert_eq!(args.output, PathBuf::from("exports"));
        assert!(args.config.is_none());

        let options = args.backend_options();
        assert_eq!(options.segments, DEFAULT_STRUT_SEGMENTS);
        assert_eq!(options.format, StlFormat::Binary);
        assert_eq!(options.output_dir, Some(PathBuf::from("exports")));
        assert_eq!(args.load_config().unwrap(), LatticeConfig::default());
    }

    #[test]
    fn test_flags() {
        let args = export_args(&[
            "lattice-export",
            "--input",
            "in.json",
            "--output",
            "out",
            "--ascii",
            "--segments",
            "6",
        ]);
        let options = args.backend_options();
        assert_eq!(options.format, StlFormat::Ascii);
        assert_eq!(options.segments, 6);
        assert_eq!(options.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_rejects_too_few_segments() {
        assert!(Cli::try_parse_from(["lattice-export", "--segments", "2"]).is_err());
        assert!(Cli::try_parse_from(["lattice-export", "--segments", "many"]).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let args = export_args(&["lattice-export", "--config", "/nonexistent/cfg.json"]);
        let err = args.load_config().unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }

    #[test]
    fn test_convert_args() {
        let cli = Cli::try_parse_from(["lattice-export", "convert", "edges.txt", "--delimiter", ";"])
            .unwrap();
        match cli.command {
            Some(Command::Convert(args)) => {
                assert_eq!(args.table, PathBuf::from("edges.txt"));
                assert_eq!(args.output, PathBuf::from("lattices.json"));
                assert_eq!(args.delimiter, ';');
            }
            other => panic!("expected convert, got {other:?}"),
        }
        assert!(Cli::try_parse_from(["lattice-export", "--ascii", "convert", "edges.txt"]).is_err());
    }

    #[test]
    fn test_convert_writes_loadable_json() {
        let dir = std::env::temp_dir().join(format!("lattice-cli-convert-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let table = dir.join("edges.csv");
        std::fs::write(&table, "1-2,2-5.1,5-14\n1,1,0\n0,0,1\n").unwrap();

        let args = ConvertArgs {
            table,
            output: dir.join("lattices.json"),
            delimiter: ',',
        };
        assert_eq!(args.run().unwrap(), 2);

        let maps = load_lattices_file(&args.output).unwrap();
        assert_eq!(maps[0].present_keys().collect::<Vec<_>>(), vec!["1-2", "2-5"]);
        assert_eq!(maps[1].present_keys().collect::<Vec<_>>(), vec!["5-14"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
