use kdam::{Bar, BarBuilder, BarExt};
use serde::de::DeserializeOwned;
use std::path::Path;

/// reads a delimited text file into a collection of rows of type `T`.
///
/// rows are deserialized positionally, so `T` is typically a tuple or a
/// tuple struct. blank lines are ignored and surrounding whitespace is
/// trimmed from every field.
///
/// # Arguments
///
/// * `filepath`    - file to read
/// * `delimiter`   - single-byte field separator
/// * `has_headers` - if true, the first line is skipped
/// * `progress`    - optional progress bar description
///
/// # Returns
///
/// the deserialized rows in file order, or the first csv error encountered
pub fn from_delimited<T: DeserializeOwned>(
    filepath: &Path,
    delimiter: u8,
    has_headers: bool,
    progress: Option<BarBuilder>,
) -> Result<Box<[T]>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(filepath)?;

    let mut bar: Option<Bar> = progress.and_then(|b| b.build().ok());
    let mut rows = Vec::new();
    for row in reader.deserialize::<T>() {
        rows.push(row?);
        if let Some(ref mut b) = bar {
            let _ = b.update(1);
        }
    }
    if bar.is_some() {
        eprintln!();
    }
    Ok(rows.into_boxed_slice())
}
