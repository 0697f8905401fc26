//! Project file attachments
//!
//! A [`ProjectFile`] is metadata only: the `url` points at bytes held
//! locally (a `file://` URL), never at a durable upload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::identity::EntityId;

/// Extensions accepted for attachment intake
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "webp", "doc", "docx", "xls", "xlsx", "zip", "rar",
];

/// Coarse file classification, derived from the extension only
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectFileType {
    Pdf,
    Image,
    Document,
    Spreadsheet,
    Archive,
    Other,
}

impl ProjectFileType {
    /// Classify a file name by its extension (case-insensitive)
    pub fn from_name(name: &str) -> Self {
        let ext = extension_of(name);
        match ext.as_deref() {
            Some("pdf") => ProjectFileType::Pdf,
            Some("jpg" | "jpeg" | "png" | "webp") => ProjectFileType::Image,
            Some("doc" | "docx") => ProjectFileType::Document,
            Some("xls" | "xlsx") => ProjectFileType::Spreadsheet,
            Some("zip" | "rar") => ProjectFileType::Archive,
            _ => ProjectFileType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectFileType::Pdf => "pdf",
            ProjectFileType::Image => "image",
            ProjectFileType::Document => "document",
            ProjectFileType::Spreadsheet => "spreadsheet",
            ProjectFileType::Archive => "archive",
            ProjectFileType::Other => "other",
        }
    }

    /// Whether a viewer can render this type inline
    pub fn can_preview(&self) -> bool {
        matches!(self, ProjectFileType::Image | ProjectFileType::Pdf)
    }
}

impl std::fmt::Display for ProjectFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased extension after the last dot, if any
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Whether the name carries an extension from [`ALLOWED_EXTENSIONS`]
pub fn is_allowed(name: &str) -> bool {
    extension_of(name).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Format a byte count as KB/MB with one decimal
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 KB".to_string();
    }
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        return format!("{:.1} KB", kb);
    }
    format!("{:.1} MB", kb / 1024.0)
}

/// A file attached to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub id: EntityId,

    /// Display name (renamable)
    pub name: String,

    /// Locally resolvable reference to the bytes
    pub url: String,

    /// Declared size in bytes
    pub size: u64,

    pub mime_type: String,

    #[serde(rename = "type")]
    pub file_type: ProjectFileType,

    pub uploaded_at: DateTime<Utc>,

    pub uploaded_by: String,
}

impl ProjectFile {
    /// Kind name used for short-ID aliases
    pub const KIND: &'static str = "file";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_by_extension() {
        assert_eq!(ProjectFileType::from_name("planta.PDF"), ProjectFileType::Pdf);
        assert_eq!(ProjectFileType::from_name("obra.jpeg"), ProjectFileType::Image);
        assert_eq!(ProjectFileType::from_name("foto.webp"), ProjectFileType::Image);
        assert_eq!(ProjectFileType::from_name("contrato.docx"), ProjectFileType::Document);
        assert_eq!(ProjectFileType::from_name("orcamento.xls"), ProjectFileType::Spreadsheet);
        assert_eq!(ProjectFileType::from_name("fotos.rar"), ProjectFileType::Archive);
        assert_eq!(ProjectFileType::from_name("notas.txt"), ProjectFileType::Other);
        assert_eq!(ProjectFileType::from_name("README"), ProjectFileType::Other);
    }

    #[test]
    fn test_allow_list() {
        assert!(is_allowed("a.PNG"));
        assert!(is_allowed("a.tar.zip"));
        assert!(!is_allowed("a.txt"));
        assert!(!is_allowed("pdf"));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 KB");
        assert_eq!(format_file_size(512), "0.5 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
    }

    #[test]
    fn test_preview_types() {
        assert!(ProjectFileType::Image.can_preview());
        assert!(ProjectFileType::Pdf.can_preview());
        assert!(!ProjectFileType::Archive.can_preview());
    }

    #[test]
    fn test_serializes_type_key() {
        let file = ProjectFile {
            id: EntityId::from("f1"),
            name: "planta.pdf".to_string(),
            url: "file:///tmp/planta.pdf".to_string(),
            size: 10,
            mime_type: "application/pdf".to_string(),
            file_type: ProjectFileType::Pdf,
            uploaded_at: Utc::now(),
            uploaded_by: "Ana".to_string(),
        };
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["type"], "pdf");
        assert_eq!(json["mimeType"], "application/pdf");
    }
}
