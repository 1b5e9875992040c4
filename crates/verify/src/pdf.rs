// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Thin wrapper over `pdf-extract`'s text extraction. Kept as its own
//! module so the defect-scanning logic in [`crate::scan`] can be tested
//! against plain string fixtures without needing a real PDF on disk.

use std::path::Path;

use crate::error::VerifyError;

pub fn extract_text(path: &Path) -> Result<String, VerifyError> {
    pdf_extract::extract_text(path).map_err(|e| VerifyError::PdfUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
