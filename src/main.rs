use clap::{Parser, Subcommand};
use picasa_export::config::{self, ExportConfig};
use picasa_export::{export, output, scan};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "picasa-export")]
#[command(about = "Decode Picasa .picasa.ini settings files into JSON")]
#[command(long_about = "\
Decode Picasa .picasa.ini settings files into JSON

Picasa kept every edit outside the photo itself, in one settings file per
folder. This tool reads those files and exports stars, rotations, crops and
the filter stack as JSON.

Library layout:

  Pictures/
  ├── picasa-export.toml           # Exporter config (optional)
  ├── 2020-vacation/
  │   ├── .picasa.ini              # Picasa 3 settings file
  │   └── IMG_0001.JPG
  └── 2019/party/
      ├── Picasa.ini               # Older Picasa spelling
      └── DSC_1001.JPG

Settings file layout:

  [Picasa]                         # Album: name + date (optional)
  name=Summer Vacation
  date=1596240000.000000
  [IMG_0001.JPG]                   # One section per photo
  star=yes
  rotate=rotate(1)
  crop=rect64(1b502e26c807e353)
  filters=tilt=1,0.183642,0.000000;fill=1,0.350000;

Run 'picasa-export gen-config' to generate a documented picasa-export.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: picasa-export.toml in the scanned or current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode settings files and print their JSON
    Export {
        /// Settings files to decode
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Write the JSON here instead of stdout (single input only)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Decode settings files and report their contents without exporting
    Check {
        /// Settings files to decode
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Find and decode every settings file under a directory
    Scan {
        /// Library root
        dir: PathBuf,
        /// Write each folder's JSON next to its settings file
        #[arg(long)]
        write: bool,
    },
    /// Print a stock picasa-export.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let failed = match cli.command {
        Command::Export {
            files,
            output: target,
        } => {
            if target.is_some() && files.len() != 1 {
                return Err("--output takes exactly one input file".into());
            }
            let config = resolve_config(cli.config.as_deref(), Path::new("."))?;
            init_thread_pool(&config.processing);

            let entries = scan::decode_all(&files);
            let mut failed = 0;
            for entry in &entries {
                match &entry.result {
                    Ok(report) => {
                        output::print_problems(&entry.path, report);
                        let json = export::render(&report.settings, &config.output.indent)?;
                        match &target {
                            Some(path) => std::fs::write(path, json)?,
                            None => println!("{}", json),
                        }
                    }
                    Err(e) => {
                        output::print_load_error(&entry.path, e);
                        failed += 1;
                    }
                }
            }
            failed
        }
        Command::Check { files } => {
            let config = resolve_config(cli.config.as_deref(), Path::new("."))?;
            init_thread_pool(&config.processing);

            let entries = scan::decode_all(&files);
            let mut failed = 0;
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                match &entry.result {
                    Ok(report) => output::print_folder_report(report, None),
                    Err(e) => {
                        output::print_load_error(&entry.path, e);
                        failed += 1;
                    }
                }
            }
            println!();
            output::print_check_summary(&entries);
            failed
        }
        Command::Scan { dir, write } => {
            let config = resolve_config(cli.config.as_deref(), &dir)?;
            init_thread_pool(&config.processing);

            println!("==> Scanning {}", dir.display());
            let result = scan::scan_with_config(&dir, config)?;
            output::print_scan_output(&result);

            if write {
                let written = scan::write_exports(&result)?;
                for line in output::format_written(&written, &dir) {
                    println!("{}", line);
                }
            }
            result.failed_count()
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            0
        }
    };

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Load the config named by `--config`, or `picasa-export.toml` from `dir`
/// when there is one.
fn resolve_config(
    explicit: Option<&Path>,
    dir: &Path,
) -> Result<ExportConfig, config::ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(dir),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
