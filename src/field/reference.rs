//! References to other documents

/// A reference to a foreign document, tagged with the kind of document it
/// points at (`"Image"`, `"Pdf"`, ...). The identifier is stored verbatim;
/// neither it nor the tag is validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentReference {
    document_type: String,
    document_id: Option<String>,
}

impl DocumentReference {
    pub const IMAGE: &'static str = "Image";

    pub fn new(document_type: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            document_id: None,
        }
    }

    pub fn image() -> Self {
        Self::new(Self::IMAGE)
    }

    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    /// A copy of this reference pointing at `id` (or at nothing)
    pub fn pointing_at(&self, id: Option<&str>) -> Self {
        Self {
            document_type: self.document_type.clone(),
            document_id: id.map(str::to_string),
        }
    }
}
