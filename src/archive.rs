use chrono::{Datelike, NaiveDateTime, Timelike};
use futures::stream::{Stream, TryStreamExt};
use std::convert::TryFrom;
use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::network::lists::ExportedList;

pub const MANIFEST_FNAME: &str = "lists.txt";

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Write all downloaded lists into a zip archive at `path`.
///
/// The archive is assembled next to `path` and only moved into place once
/// every list has been written, so a failed run leaves no archive behind.
pub async fn write_archive<S>(path: &Path, lists: S, modified: NaiveDateTime) -> Result<()>
where
    S: Stream<Item = Result<ExportedList>>,
{
    let temp_path = format!("{}.temp", path.display());
    let _ = fs::remove_file(&temp_path);

    let result = write_and_rename(&temp_path, path, lists, modified).await;
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

async fn write_and_rename<S>(
    temp_path: &str,
    path: &Path,
    lists: S,
    modified: NaiveDateTime,
) -> Result<()>
where
    S: Stream<Item = Result<ExportedList>>,
{
    let file = File::create(temp_path)?;
    write_zip(file, lists, modified).await?;
    fs::rename(temp_path, path)?;
    Ok(())
}

/// Stream every list into `sink`, then append `lists.txt` mapping each file
/// back to its title (quoted if multi-line).
pub async fn write_zip<W, S>(sink: W, lists: S, modified: NaiveDateTime) -> Result<W>
where
    W: Write + Seek,
    S: Stream<Item = Result<ExportedList>>,
{
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip_time(modified));
    let mut zip = ZipWriter::new(sink);
    let mut manifest = Vec::new();

    futures::pin_mut!(lists);
    while let Some(exported) = lists.try_next().await? {
        let list = exported.list();
        println!("  -> {}", list.fname());
        zip.start_file(list.fname(), options)?;
        zip.write_all(exported.content())?;
        manifest.push(format!("{}: {}", list.fname(), manifest_title(list.title())));
    }

    zip.start_file(MANIFEST_FNAME, options)?;
    zip.write_all(manifest.join(LINE_ENDING).as_bytes())?;
    Ok(zip.finish()?)
}

/// Titles can be multi-line on the site; those are quoted and get the host's
/// line endings.
fn manifest_title(title: &str) -> String {
    if title.contains('\n') {
        let normalized = title.replace("\r\n", "\n").replace('\n', LINE_ENDING);
        format!("\"{}\"", normalized)
    } else {
        title.to_owned()
    }
}

fn zip_time(t: NaiveDateTime) -> zip::DateTime {
    let year = u16::try_from(t.year()).unwrap_or(1980);
    zip::DateTime::from_date_and_time(
        year,
        t.month() as u8,
        t.day() as u8,
        t.hour() as u8,
        t.minute() as u8,
        t.second() as u8,
    )
    .unwrap_or_default()
}
