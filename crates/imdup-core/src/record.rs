//! Bibliographic record data structures

/// A single record field (name-value pair)
///
/// Field names keep the case and order they arrived in; comparison code goes
/// through [`Record::field`] instead of matching names directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// Origin of one record that contributed to a merged record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    pub source_path: Option<String>,
    pub key: String,
    pub entry_type: String,
}

/// One bibliographic entry: an entry type, a cite key, and field values.
///
/// Provenance (`source_path`, `contributors`) is carried outside the field
/// map so it never participates in comparison or in serialized BibTeX
/// output, but survives into generated reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub entry_type: String,
    pub key: String,
    pub fields: Vec<Field>,
    pub source_path: Option<String>,
    pub contributors: Vec<Contributor>,
}

impl Record {
    /// Create a new record with no fields
    pub fn new(key: impl Into<String>, entry_type: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            key: key.into(),
            fields: Vec::new(),
            source_path: None,
            contributors: Vec::new(),
        }
    }

    /// Add a field to the record
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Get a field value by name (case-insensitive)
    ///
    /// Origin formatting conventions vary (`doi` vs `DOI`, `title` vs
    /// `TITLE`); this is the single lookup used by identity derivation and
    /// merging.
    pub fn field(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.fields
            .iter()
            .find(|f| f.name.to_lowercase() == name_lower)
            .map(|f| f.value.as_str())
    }

    /// Get the title field
    pub fn title(&self) -> Option<&str> {
        self.field("title")
    }

    /// Get the author field
    pub fn author(&self) -> Option<&str> {
        self.field("author")
    }

    /// Get the DOI field
    pub fn doi(&self) -> Option<&str> {
        self.field("doi")
    }

    /// The (source_path, key, entry_type) triple this record contributes to
    /// a merged record's provenance.
    pub fn as_contributor(&self) -> Contributor {
        Contributor {
            source_path: self.source_path.clone(),
            key: self.key.clone(),
            entry_type: self.entry_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_access_is_case_insensitive() {
        let mut record = Record::new("Smith2024", "article");
        record.add_field("title", "A Great Paper");
        record.add_field("Author", "John Smith");
        record.add_field("DOI", "10.1000/xyz");

        assert_eq!(record.title(), Some("A Great Paper"));
        assert_eq!(record.author(), Some("John Smith"));
        assert_eq!(record.doi(), Some("10.1000/xyz"));
        assert_eq!(record.field("year"), None);
    }

    #[test]
    fn test_field_order_is_preserved() {
        let mut record = Record::new("K", "misc");
        record.add_field("year", "2020");
        record.add_field("title", "T");

        let names: Vec<&str> = record.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["year", "title"]);
    }

    #[test]
    fn test_first_match_wins_on_duplicate_names() {
        let mut record = Record::new("K", "misc");
        record.add_field("doi", "10.1/first");
        record.add_field("DOI", "10.1/second");

        assert_eq!(record.doi(), Some("10.1/first"));
    }
}
