//! Multipart form encoding.
//!
//! Every mutating request goes out as `multipart/form-data`, whether or not it
//! carries a file, so payloads are flattened into an ordered list of parts:
//!
//! - `null` fields are skipped
//! - arrays become repeated `key[]` parts
//! - booleans become `1` / `0`
//! - nested objects are sent as JSON text

use serde::Serialize;
use serde_json::Value;

/// Form field the backend reads uploaded images from.
pub const IMAGE_FIELD: &str = "image";

/// Form field signalling that a persisted image should be dropped.
pub const REMOVE_IMAGE_FIELD: &str = "remove_image";

/// Field carrying the simulated HTTP verb on POST requests.
pub const METHOD_FIELD: &str = "_method";

/// A file picked on the client, held in memory until submit.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// What to do with an entity's image on create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageInput {
    /// Leave the image alone (nothing sent)
    #[default]
    None,
    /// Upload a new file
    Upload(FileUpload),
    /// Already-persisted URL. Never re-uploaded; nothing is sent.
    Existing(String),
    /// Drop the persisted image
    Clear,
}

impl ImageInput {
    pub fn is_upload(&self) -> bool {
        matches!(self, ImageInput::Upload(_))
    }
}

/// One multipart part value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FileUpload),
}

/// Ordered multipart form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    parts: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a serializable payload into form parts.
    ///
    /// The payload must serialize to a JSON object.
    pub fn from_payload<T: Serialize + ?Sized>(payload: &T) -> Result<Self, serde_json::Error> {
        use serde::ser::Error as _;

        let value = serde_json::to_value(payload)?;
        let Value::Object(fields) = value else {
            return Err(serde_json::Error::custom(
                "form payload must serialize to an object",
            ));
        };

        let mut form = Self::new();
        for (key, value) in fields {
            form.push_value(&key, value);
        }
        Ok(form)
    }

    /// Builder-style text part.
    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_text(key, value);
        self
    }

    pub fn push_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parts.push((key.into(), FormValue::Text(value.into())));
    }

    pub fn push_file(&mut self, key: impl Into<String>, file: FileUpload) {
        self.parts.push((key.into(), FormValue::File(file)));
    }

    /// Encode an image choice under the standard image field.
    pub fn attach_image(&mut self, image: &ImageInput) {
        match image {
            ImageInput::Upload(file) => self.push_file(IMAGE_FIELD, file.clone()),
            ImageInput::Clear => self.push_text(REMOVE_IMAGE_FIELD, "1"),
            ImageInput::Existing(_) | ImageInput::None => {}
        }
    }

    fn push_value(&mut self, key: &str, value: Value) {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                let array_key = format!("{key}[]");
                for item in items {
                    if let Some(text) = scalar_text(item) {
                        self.push_text(array_key.clone(), text);
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    self.push_text(key, text);
                }
            }
        }
    }

    pub fn parts(&self) -> &[(String, FormValue)] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<(String, FormValue)> {
        self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// First text value for a key.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.parts.iter().find_map(|(k, v)| match v {
            FormValue::Text(text) if k == key => Some(text.as_str()),
            _ => None,
        })
    }

    /// All text values for a key, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|(k, v)| match v {
                FormValue::Text(text) if k == key => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn file(&self, key: &str) -> Option<&FileUpload> {
        self.parts.iter().find_map(|(k, v)| match v {
            FormValue::File(file) if k == key => Some(file),
            _ => None,
        })
    }

    pub fn has_files(&self) -> bool {
        self.parts
            .iter()
            .any(|(_, v)| matches!(v, FormValue::File(_)))
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(flag) => Some(if flag { "1" } else { "0" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}
