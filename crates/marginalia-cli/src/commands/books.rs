//! Books command implementation.

use crate::cli::BooksArgs;
use crate::config::Config;
use crate::error::Result;
use crate::input::read_clippings;
use crate::output::Formatter;
use marginalia_extractor::Pipeline;

/// Execute the books command.
pub fn execute_books(args: BooksArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = read_clippings(&args.input)?;
    let pipeline = Pipeline::new(config.extractor_config())?;

    let books = pipeline.list_books(&text)?;
    println!("{}", formatter.format_books(&books, args.json)?);

    Ok(())
}
