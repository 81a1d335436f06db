use serde::{Deserialize, Serialize};

/// Files every candidate must upload. The photo entry is matched leniently
/// by basename; the rest are exact lowercase names.
pub const REQUIRED_DOCUMENTS: [&str; 5] = [
    "aadhaar.pdf",
    "pan.pdf",
    "10thmarksheet.pdf",
    "12thmarksheet.pdf",
    "photo.jpg",
];

const PHOTO_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Identifier of a shared drive folder, extracted from a candidate link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRef(pub String);

/// Pulls the folder id out of links shaped like
/// `https://drive.example.com/drive/folders/<id>?usp=sharing`.
pub fn parse_folder_ref(link: &str) -> Option<FolderRef> {
    let start = link.find("folders/")? + "folders/".len();
    let rest = &link[start..];
    let end = rest
        .find(|c: char| c == '/' || c == '?' || c == '#')
        .unwrap_or(rest.len());
    let id = rest[..end].trim();
    if id.is_empty() {
        None
    } else {
        Some(FolderRef(id.to_string()))
    }
}

/// File listing entry returned by a document fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
}

/// Read-only view over the candidate's upload folder.
pub trait DocumentFetcher: Send + Sync {
    fn list_folder(&self, folder: &FolderRef) -> Result<Vec<StoredFile>, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("folder '{0}' not found or not shared")]
    NotFound(String),
    #[error("document source unavailable: {0}")]
    Transport(String),
}

fn is_photo_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    match lower.rsplit_once('.') {
        Some((base, ext)) => base == "photo" && PHOTO_EXTENSIONS.contains(&ext),
        None => false,
    }
}

/// Required uploads not present in the folder listing, in canonical order.
pub fn missing_documents(files: &[StoredFile]) -> Vec<String> {
    REQUIRED_DOCUMENTS
        .iter()
        .filter(|required| {
            let found = if **required == "photo.jpg" {
                files.iter().any(|file| is_photo_file(&file.name))
            } else {
                files
                    .iter()
                    .any(|file| file.name.to_ascii_lowercase() == **required)
            };
            !found
        })
        .map(|required| required.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> StoredFile {
        StoredFile {
            id: format!("id-{name}"),
            name: name.to_string(),
            mime_type: None,
        }
    }

    fn full_set() -> Vec<StoredFile> {
        vec![
            file("aadhaar.pdf"),
            file("pan.pdf"),
            file("10thmarksheet.pdf"),
            file("12thmarksheet.pdf"),
            file("photo.jpg"),
        ]
    }

    #[test]
    fn complete_folder_has_no_missing_documents() {
        assert!(missing_documents(&full_set()).is_empty());
    }

    #[test]
    fn reports_exactly_the_absent_file() {
        let mut files = full_set();
        files.retain(|f| f.name != "pan.pdf");
        assert_eq!(missing_documents(&files), vec!["pan.pdf".to_string()]);
    }

    #[test]
    fn photo_extension_is_tolerated() {
        let mut files = full_set();
        files.retain(|f| f.name != "photo.jpg");
        files.push(file("Photo.PNG"));
        assert!(missing_documents(&files).is_empty());
    }

    #[test]
    fn unrelated_image_does_not_satisfy_photo() {
        let mut files = full_set();
        files.retain(|f| f.name != "photo.jpg");
        files.push(file("selfie.jpg"));
        assert_eq!(missing_documents(&files), vec!["photo.jpg".to_string()]);
    }

    #[test]
    fn file_names_match_case_insensitively() {
        let files = vec![
            file("AADHAAR.pdf"),
            file("Pan.PDF"),
            file("10thMarksheet.pdf"),
            file("12thMarksheet.pdf"),
            file("photo.jpeg"),
        ];
        assert!(missing_documents(&files).is_empty());
    }

    #[test]
    fn folder_ref_parses_from_share_link() {
        let folder =
            parse_folder_ref("https://drive.example.com/drive/folders/1AbC_xyz?usp=sharing")
                .expect("folder id present");
        assert_eq!(folder, FolderRef("1AbC_xyz".to_string()));
    }

    #[test]
    fn folder_ref_rejects_links_without_folder_segment() {
        assert!(parse_folder_ref("https://drive.example.com/file/d/123/view").is_none());
        assert!(parse_folder_ref("https://drive.example.com/drive/folders/").is_none());
    }
}
