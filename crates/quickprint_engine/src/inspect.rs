use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use quickprint_core::SelectedFile;
use thiserror::Error;

/// Leading bytes of every PDF document.
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("{path} does not exist")]
    NotFound { path: String },
    #[error("{path} is not a regular file")]
    NotAFile { path: String },
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Collects what the print flow needs to know about a picked file.
pub fn inspect_file(path: &Path) -> Result<SelectedFile, InspectError> {
    let display = path.display().to_string();
    let meta = match path.metadata() {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(InspectError::NotFound { path: display })
        }
        Err(source) => {
            return Err(InspectError::Io {
                path: display,
                source,
            })
        }
    };
    if !meta.is_file() {
        return Err(InspectError::NotAFile { path: display });
    }

    let mut header = Vec::with_capacity(PDF_SIGNATURE.len());
    File::open(path)
        .and_then(|file| file.take(PDF_SIGNATURE.len() as u64).read_to_end(&mut header))
        .map_err(|source| InspectError::Io {
            path: display.clone(),
            source,
        })?;

    let has_pdf_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    let is_pdf = header.starts_with(PDF_SIGNATURE) || (header.is_empty() && has_pdf_extension);

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or(display);

    Ok(SelectedFile {
        path: path.to_path_buf(),
        filename,
        size: meta.len(),
        is_pdf,
    })
}
