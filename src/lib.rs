mod analyze;
mod detect;
mod docx;
mod error;
mod format;
mod model;
mod presets;
mod punct;

pub use analyze::{Finding, IssueKind, Report};
pub use detect::{NumberingClass, ParaRole, numbering_class, para_role};
pub use error::Error;
pub use format::FormatStats;
pub use model::{Alignment, LineSpacing};
pub use presets::{LineRule, PRESETS, ParaSpec, Preset};
pub use punct::{FixSummary, fix_text};

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use docx::Package;

/// Legacy binary formats are refused up front, before any package I/O.
fn check_extension(path: &Path) -> Result<(), Error> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("doc") || ext.eq_ignore_ascii_case("wps") => {
            Err(Error::LegacyFormat)
        }
        _ => Ok(()),
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })
}

fn load(bytes: &[u8]) -> Result<(Package, String, docx::styles::StylesInfo, model::DocModel), Error>
{
    let pkg = Package::from_bytes(bytes)?;
    let document = pkg.document_text()?;
    let styles = docx::parse_styles(&pkg);
    let model = docx::parse_document(&document, &styles)?;
    Ok((pkg, document, styles, model))
}

/// Diagnose formatting problems. Read-only: no output artifact.
pub fn analyze(input: &Path) -> Result<Report, Error> {
    check_extension(input)?;
    let t0 = Instant::now();

    let bytes = read_input(input)?;
    let report = analyze_bytes(&bytes)?;

    log::info!(
        "Analyzed {} in {:.1}ms: {} findings",
        input.display(),
        t0.elapsed().as_secs_f64() * 1000.0,
        report.total(),
    );
    Ok(report)
}

pub fn analyze_bytes(input: &[u8]) -> Result<Report, Error> {
    let (_, _, _, model) = load(input)?;
    Ok(analyze::analyze_model(&model))
}

/// Normalize punctuation script; writes a new package, the input is never
/// touched.
pub fn fix_punctuation(input: &Path, output: &Path) -> Result<FixSummary, Error> {
    check_extension(input)?;
    let t0 = Instant::now();

    let bytes = read_input(input)?;
    let t_read = t0.elapsed();

    let (out_bytes, summary) = fix_punctuation_bytes(&bytes)?;
    let t_fix = t0.elapsed();

    std::fs::write(output, &out_bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: read={:.1}ms, fix={:.1}ms, write={:.1}ms (output {} bytes, {} paragraphs + {} cells changed)",
        t_read.as_secs_f64() * 1000.0,
        (t_fix - t_read).as_secs_f64() * 1000.0,
        (t_total - t_fix).as_secs_f64() * 1000.0,
        out_bytes.len(),
        summary.paragraphs,
        summary.table_cells,
    );
    Ok(summary)
}

pub fn fix_punctuation_bytes(input: &[u8]) -> Result<(Vec<u8>, FixSummary), Error> {
    let (pkg, document, _, model) = load(input)?;

    let (rewritten, summary) = punct::fix_document_xml(&document, &model);
    let mut replaced = HashMap::new();
    if let Some(xml) = rewritten {
        replaced.insert("word/document.xml".to_string(), xml);
    }

    let out = pkg.write_with(&replaced)?;
    Ok((out, summary))
}

/// Rewrite page geometry and paragraph/run styling to the preset's table of
/// values. Writes a new package.
pub fn apply_preset(input: &Path, output: &Path, preset: &Preset) -> Result<FormatStats, Error> {
    check_extension(input)?;
    let t0 = Instant::now();

    let bytes = read_input(input)?;
    let t_read = t0.elapsed();

    let (out_bytes, stats) = apply_preset_bytes(&bytes, preset)?;
    let t_format = t0.elapsed();

    std::fs::write(output, &out_bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: read={:.1}ms, format={:.1}ms, write={:.1}ms (output {} bytes, {} paragraphs styled)",
        t_read.as_secs_f64() * 1000.0,
        (t_format - t_read).as_secs_f64() * 1000.0,
        (t_total - t_format).as_secs_f64() * 1000.0,
        out_bytes.len(),
        stats.total(),
    );
    Ok(stats)
}

pub fn apply_preset_bytes(input: &[u8], preset: &Preset) -> Result<(Vec<u8>, FormatStats), Error> {
    let (pkg, document, styles, model) = load(input)?;

    let (rewritten, stats) = format::format_document_xml(&document, &model, &styles, preset)?;
    let mut replaced = HashMap::new();
    replaced.insert("word/document.xml".to_string(), rewritten);

    // Footer parts that already exist get a centered page-number field;
    // packages without one are left as they are.
    for name in pkg.footer_names() {
        if let Some(src) = pkg.part_text(&name)
            && let Some(xml) = format::page_number_footer_xml(&src)
        {
            replaced.insert(name, xml);
        }
    }

    let out = pkg.write_with(&replaced)?;
    Ok((out, stats))
}

/// Unify body line spacing to the preset's body rule, leaving everything
/// else alone.
pub fn unify_spacing(input: &Path, output: &Path, preset: &Preset) -> Result<usize, Error> {
    check_extension(input)?;
    let t0 = Instant::now();

    let bytes = read_input(input)?;
    let (out_bytes, changed) = unify_spacing_bytes(&bytes, preset)?;
    std::fs::write(output, &out_bytes).map_err(Error::Io)?;

    log::info!(
        "Unified line spacing for {changed} paragraphs in {:.1}ms",
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(changed)
}

pub fn unify_spacing_bytes(input: &[u8], preset: &Preset) -> Result<(Vec<u8>, usize), Error> {
    let (pkg, document, _, model) = load(input)?;

    let (rewritten, changed) = format::unify_spacing_xml(&document, &model, preset);
    let mut replaced = HashMap::new();
    if let Some(xml) = rewritten {
        replaced.insert("word/document.xml".to_string(), xml);
    }

    let out = pkg.write_with(&replaced)?;
    Ok((out, changed))
}
