//! Encodes uploaded images into the opaque string stored on a contact.

use std::path::Path;

use anyhow::{Context as _, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Read a JPG or PNG file and return it as a `data:` URI.
pub fn encode_file(path: &Path) -> anyhow::Result<String> {
  let mime = media_type(path)?;
  let bytes =
    std::fs::read(path).with_context(|| format!("reading photo {}", path.display()))?;
  Ok(encode_bytes(mime, &bytes))
}

pub fn encode_bytes(mime: &str, bytes: &[u8]) -> String {
  format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

fn media_type(path: &Path) -> anyhow::Result<&'static str> {
  let ext = path
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_ascii_lowercase)
    .unwrap_or_default();
  match ext.as_str() {
    "jpg" | "jpeg" => Ok("image/jpeg"),
    "png" => Ok("image/png"),
    _ => bail!("unsupported photo type {:?}; expected jpg or png", path.display().to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn encodes_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("face.PNG");
    std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

    assert_eq!(encode_file(&path).unwrap(), "data:image/png;base64,iVBORw==");
  }

  #[test]
  fn rejects_other_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("face.gif");
    std::fs::write(&path, b"GIF89a").unwrap();
    assert!(encode_file(&path).is_err());
  }
}
