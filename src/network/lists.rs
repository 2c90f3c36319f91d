use crate::error::Result;
use crate::slug::export_filename;

/// One exportable list, before its export has been fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDescriptor {
    source_path: String,
    title: String,
    fname: String,
}

impl ListDescriptor {
    /// `id_source` is where the list/user id is read from when naming the
    /// export. Custom lists use their own path; ratings and watchlist use the
    /// user id.
    pub fn new(source_path: String, title: &str, id_source: &str) -> Result<ListDescriptor> {
        let fname = export_filename(id_source, title)?;
        Ok(ListDescriptor {
            source_path,
            title: title.to_owned(),
            fname,
        })
    }

    /// Site-relative path, e.g. `/list/ls012345678/`
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// Title as rendered on the site; may span several lines
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fname(&self) -> &str {
        &self.fname
    }

    /// Title with line breaks collapsed, for console output.
    pub fn display_title(&self) -> String {
        self.title.replace("\r\n", " ").replace('\n', " ")
    }

    pub fn with_content(self, content: Vec<u8>) -> ExportedList {
        ExportedList {
            list: self,
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedList {
    list: ListDescriptor,
    content: Vec<u8>,
}

impl ExportedList {
    pub fn list(&self) -> &ListDescriptor {
        &self.list
    }

    /// Raw CSV as served
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// An anchor pointing at a custom list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLink {
    pub href: String,
    pub title: String,
}
