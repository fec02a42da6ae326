//! Short-name to IRI vocabulary owned by each builder.

use std::collections::BTreeMap;

const DEFAULTS: [(&str, &str); 22] = [
    ("type", "rdf:type"),
    ("label", "rdfs:label"),
    ("Class", "owl:Class"),
    ("DatatypeProperty", "owl:DatatypeProperty"),
    ("ObjectProperty", "owl:ObjectProperty"),
    ("Document", "terminus:Document"),
    ("abstract", "terminus:Document"),
    ("comment", "rdfs:comment"),
    ("range", "rdfs:range"),
    ("domain", "rdfs:domain"),
    ("subClassOf", "rdfs:subClassOf"),
    ("boolean", "xsd:boolean"),
    ("string", "xsd:string"),
    ("integer", "xsd:integer"),
    ("decimal", "xsd:decimal"),
    ("email", "xdd:email"),
    ("json", "xdd:json"),
    ("dateTime", "xsd:dateTime"),
    ("date", "xsd:date"),
    ("coordinate", "xdd:coordinate"),
    ("line", "xdd:coordinatePolyline"),
    ("polygon", "xdd:coordinatePolygon"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    entries: BTreeMap<String, String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary {
            entries: DEFAULTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Vocabulary {
    /// A vocabulary with no entries at all.
    pub fn empty() -> Self {
        Vocabulary {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, short: impl Into<String>, iri: impl Into<String>) {
        self.entries.insert(short.into(), iri.into());
    }

    /// Adds every entry, replacing existing mappings for the same name.
    pub fn extend<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in entries {
            self.insert(k, v);
        }
    }

    pub fn get(&self, short: &str) -> Option<&str> {
        self.entries.get(short).map(String::as_str)
    }

    pub fn contains(&self, short: &str) -> bool {
        self.entries.contains_key(short)
    }

    /// The mapped IRI for `name`, or `name` itself when it is unknown.
    pub fn expand(&self, name: &str) -> String {
        self.get(name).unwrap_or(name).to_string()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entries() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.expand("type"), "rdf:type");
        assert_eq!(vocab.expand("label"), "rdfs:label");
        assert_eq!(vocab.expand("unknown"), "unknown");
    }

    #[test]
    fn test_extend_overrides() {
        let mut vocab = Vocabulary::default();
        vocab.extend([("type", "scm:kind"), ("Person", "@schema:Person")]);
        assert_eq!(vocab.expand("type"), "scm:kind");
        assert_eq!(vocab.get("Person"), Some("@schema:Person"));
    }

    #[test]
    fn test_empty() {
        assert!(Vocabulary::empty().is_empty());
        assert!(!Vocabulary::default().contains("Person"));
    }
}
