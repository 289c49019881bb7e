//! Image file selection and data URI encoding.

use base64::{Engine, engine::general_purpose::STANDARD};

/// Metadata of a file chosen in the image picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    /// Media type reported by the host, e.g. `image/png`. May be empty.
    pub mime_type: String,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }
}

/// Whether a media type names an image.
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Pick the file to insert from a picker selection.
///
/// Only the first selected file is considered. Returns `None` when nothing
/// was selected or the first file is not an image.
pub fn first_image(files: &[ImageFile]) -> Option<&ImageFile> {
    let file = files.first()?;
    if file.is_image() {
        Some(file)
    } else {
        tracing::debug!(name = %file.name, mime = %file.mime_type, "ignoring non-image file");
        None
    }
}

/// Encode file bytes as a self-contained `data:` URI.
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("IMAGE/JPEG"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime("application/x-image"));
        assert!(!is_image_mime(""));
        assert!(!is_image_mime("image"));
    }

    #[test]
    fn test_first_image_only_considers_first_file() {
        let files = vec![
            ImageFile::new("notes.txt", "text/plain"),
            ImageFile::new("cat.png", "image/png"),
        ];
        assert_eq!(first_image(&files), None);

        let files = vec![
            ImageFile::new("cat.png", "image/png"),
            ImageFile::new("notes.txt", "text/plain"),
        ];
        assert_eq!(first_image(&files).map(|f| f.name.as_str()), Some("cat.png"));

        assert_eq!(first_image(&[]), None);
    }

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
        assert_eq!(data_url("image/gif", b""), "data:image/gif;base64,");
    }
}
