//! File type detection

#[derive(Debug, Clone, PartialEq)]
pub enum FileType {
    Pdf,
    Docx,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_file_name(name: &str) -> Self {
        std::path::Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }

    /// MIME type sent with the multipart `resume` part.
    pub fn mime_type(&self) -> &'static str {
        match self {
            FileType::Pdf => "application/pdf",
            FileType::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            FileType::Text | FileType::Markdown | FileType::Unknown => "application/octet-stream",
        }
    }

    /// Types listed in the upload picker's accept filter.
    pub fn is_accepted_resume(&self) -> bool {
        matches!(self, FileType::Pdf | FileType::Docx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_and_mime() {
        assert_eq!(FileType::from_file_name("cv.PDF"), FileType::Pdf);
        assert_eq!(FileType::from_file_name("cv.docx").mime_type(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document");
        assert_eq!(FileType::from_file_name("resume").mime_type(), "application/octet-stream");
        assert!(!FileType::Markdown.is_accepted_resume());
    }

    #[test]
    fn test_non_resume_types_upload_as_octet_stream() {
        for name in ["resume.txt", "resume.md", "resume.odt"] {
            assert_eq!(FileType::from_file_name(name).mime_type(), "application/octet-stream", "{}", name);
        }
    }
}
