use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

static SEPOLIA_URL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^SEPOLIA_URL=.*$").expect("valid SEPOLIA_URL pattern"));

/// Points `SEPOLIA_URL` in a dotenv file at `url`, appending the entry when
/// the file has none. Returns whether the file changed.
pub fn write_sepolia_url(path: &Path, url: &str) -> Result<bool> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    let entry = format!("SEPOLIA_URL={}", url);

    let updated = if SEPOLIA_URL_LINE.is_match(&content) {
        SEPOLIA_URL_LINE
            .replace(&content, regex::NoExpand(&entry))
            .into_owned()
    } else if content.is_empty() || content.ends_with('\n') {
        format!("{}{}\n", content, entry)
    } else {
        format!("{}\n{}\n", content, entry)
    };

    if updated == content {
        return Ok(false);
    }
    fs::write(path, updated).with_context(|| format!("Could not write {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_replaces_existing_entry_only() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            "PRIVATE_KEY=abc\nSEPOLIA_URL=https://old.example\nETHERSCAN_API_KEY=x\n",
        )
        .unwrap();

        assert!(write_sepolia_url(file.path(), "https://rpc.sepolia.org").unwrap());
        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            content,
            "PRIVATE_KEY=abc\nSEPOLIA_URL=https://rpc.sepolia.org\nETHERSCAN_API_KEY=x\n"
        );

        assert!(!write_sepolia_url(file.path(), "https://rpc.sepolia.org").unwrap());
    }

    #[test]
    fn test_appends_missing_entry() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "PRIVATE_KEY=abc").unwrap();

        assert!(write_sepolia_url(file.path(), "https://x.example").unwrap());
        assert_eq!(
            fs::read_to_string(file.path()).unwrap(),
            "PRIVATE_KEY=abc\nSEPOLIA_URL=https://x.example\n"
        );
    }
}
