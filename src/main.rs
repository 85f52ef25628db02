use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "gongwen",
    version,
    about = "Diagnose and normalize the formatting of Chinese DOCX documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetName {
    Official,
    Academic,
    Legal,
}

impl PresetName {
    fn resolve(self) -> &'static gongwen::Preset {
        let name = match self {
            PresetName::Official => "official",
            PresetName::Academic => "academic",
            PresetName::Legal => "legal",
        };
        gongwen::Preset::by_name(name).expect("built-in preset")
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print a format diagnostics report (read-only)
    Analyze {
        input: PathBuf,
        /// Emit the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Normalize punctuation script and write a fixed copy
    Punctuation {
        input: PathBuf,
        output: PathBuf,
    },
    /// Apply a style preset and write a formatted copy
    Format {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, value_enum, default_value = "official")]
        preset: PresetName,
    },
    /// Unify body line spacing and write an adjusted copy
    Spacing {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, value_enum, default_value = "official")]
        preset: PresetName,
    },
}

fn run(cli: Cli) -> Result<(), gongwen::Error> {
    match cli.command {
        Command::Analyze { input, json } => {
            let report = gongwen::analyze(&input)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).expect("report serializes")
                );
            } else {
                println!("Analyzing: {}", input.display());
                println!();
                print!("{}", report.render());
            }
        }
        Command::Punctuation { input, output } => {
            println!("Reading: {}", input.display());
            let summary = gongwen::fix_punctuation(&input, &output)?;
            println!(
                "Total: {} paragraphs + {} table cells fixed",
                summary.paragraphs, summary.table_cells
            );
            println!("Saved: {}", output.display());
        }
        Command::Format {
            input,
            output,
            preset,
        } => {
            let preset = preset.resolve();
            println!("Preset: {}", preset.display_name);
            println!("Input: {}", input.display());
            let stats = gongwen::apply_preset(&input, &output, preset)?;
            println!();
            println!("Statistics:");
            for (label, count) in [
                ("title", stats.title),
                ("heading1", stats.heading1),
                ("heading2", stats.heading2),
                ("heading3", stats.heading3),
                ("heading4", stats.heading4),
                ("body", stats.body),
                ("table cells", stats.table_cells),
            ] {
                if count > 0 {
                    println!("  {label}: {count}");
                }
            }
            println!("Output: {}", output.display());
        }
        Command::Spacing {
            input,
            output,
            preset,
        } => {
            println!("Reading: {}", input.display());
            let changed = gongwen::unify_spacing(&input, &output, preset.resolve())?;
            println!("Fixed line spacing for {changed} paragraphs");
            println!("Saved: {}", output.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
