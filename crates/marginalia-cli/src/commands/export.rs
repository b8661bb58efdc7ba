//! Export command implementation.

use crate::cli::ExportArgs;
use crate::config::{Config, ExportFormat};
use crate::error::{CliError, Result};
use crate::export::exporter_for;
use crate::input::read_clippings;
use crate::output::Formatter;
use crate::select::{prompt_for_book, Selection};
use marginalia_extractor::{BookFilter, Pipeline, PipelineResult};
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Execute the export command.
///
/// The document goes to stdout unless a destination file applies; status
/// lines always go to stderr.
pub fn execute_export(
    args: ExportArgs,
    config: &Config,
    formatter: &Formatter,
    verbose: bool,
) -> Result<()> {
    let text = read_clippings(&args.input)?;
    let pipeline = Pipeline::new(config.extractor_config())?;

    let Some(filter) = resolve_filter(&args, &pipeline, &text, formatter)? else {
        eprintln!("{}", formatter.info("Nothing exported"));
        return Ok(());
    };

    let format = args.format.map(Into::into).unwrap_or(config.settings.format);
    let (result, rendered) = run_export(&pipeline, &text, &filter, format)?;

    match destination(&args, config, format)? {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &rendered)?;
            eprintln!("{}", formatter.info(&format!("Wrote {}", path.display())));
        }
        None => print!("{}", rendered),
    }

    if verbose {
        for line in formatter.diagnostics_report(&result.diagnostics) {
            eprintln!("{}", line);
        }
    }
    eprintln!("{}", formatter.export_summary(&result));

    Ok(())
}

/// Run the pipeline and render the selected books.
pub fn run_export(
    pipeline: &Pipeline,
    text: &str,
    filter: &BookFilter,
    format: ExportFormat,
) -> Result<(PipelineResult, String)> {
    let result = pipeline.run_filtered(text, filter)?;

    if let BookFilter::Title(title) = filter {
        if result.books.is_empty() {
            return Err(CliError::InvalidInput(format!("No book titled '{}'", title)));
        }
    }

    debug!(
        "Rendering {} book(s) as {:?} in {} ms",
        result.books.len(),
        format,
        result.metadata.processing_time_ms
    );
    let rendered = exporter_for(format).render(&result);
    Ok((result, rendered))
}

fn resolve_filter(
    args: &ExportArgs,
    pipeline: &Pipeline,
    text: &str,
    formatter: &Formatter,
) -> Result<Option<BookFilter>> {
    if let Some(title) = &args.book {
        return Ok(Some(BookFilter::Title(title.clone())));
    }
    if args.all || !std::io::stdin().is_terminal() {
        return Ok(Some(BookFilter::All));
    }

    let books = pipeline.list_books(text)?;
    let selection = prompt_for_book(&books, formatter)?;
    if selection == Selection::Quit {
        return Ok(None);
    }
    Ok(selection.into_filter(&books))
}

/// Where the export is written: `--output`, else `output_dir` from the
/// configuration, else stdout (`None`). Never the input file itself.
fn destination(
    args: &ExportArgs,
    config: &Config,
    format: ExportFormat,
) -> Result<Option<PathBuf>> {
    if let Some(output) = &args.output {
        if same_file(output, &args.input) {
            return Err(CliError::InvalidInput(format!(
                "Refusing to overwrite the input file {}",
                output.display()
            )));
        }
        return Ok(Some(output.clone()));
    }

    let Some(dir) = &config.settings.output_dir else {
        return Ok(None);
    };

    let path = dir.join(default_file_name(&args.input, format, false));
    if !same_file(&path, &args.input) {
        return Ok(Some(path));
    }

    // Input lives in output_dir with the same extension
    let path = dir.join(default_file_name(&args.input, format, true));
    debug!("Export name collides with input, writing {}", path.display());
    Ok(Some(path))
}

/// `<stem>.<ext>`, or `<stem>.<format>.<ext>` when `qualified`
fn default_file_name(input: &Path, format: ExportFormat, qualified: bool) -> String {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("clippings");
    if qualified {
        format!("{}.{}.{}", stem, format.name(), format.extension())
    } else {
        format!("{}.{}", stem, format.extension())
    }
}

/// Compare resolved paths when both exist, literal paths otherwise
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
