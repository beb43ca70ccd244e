//! Form port definition
//!
//! The UI (or CLI) collaborator supplies the current field values. They are
//! read exactly once, at submission time.

/// Snapshot of the feedback form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    /// One-line summary, also used as the card title
    pub summary: String,
    /// Reporter contact address
    pub email: String,
    /// Long-form description
    pub detail: String,
    /// Index into the configured category arrays
    pub category_index: usize,
    /// Index into the configured label array
    pub priority_index: usize,
}

/// Port supplying the current form state.
pub trait FormPort: Send + Sync {
    /// Returns the current field values.
    fn read_fields(&self) -> FormFields;
}

impl FormPort for FormFields {
    fn read_fields(&self) -> FormFields {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_act_as_their_own_port() {
        let fields = FormFields {
            summary: "crash".to_string(),
            category_index: 1,
            ..Default::default()
        };
        let read = FormPort::read_fields(&fields);
        assert_eq!(read, fields);
    }
}
