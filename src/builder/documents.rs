use super::WoqlQuery;
use crate::error::Result;
use crate::params::Operation;
use crate::value::Term;

impl WoqlQuery {
    fn write_document(
        mut self,
        op: Operation,
        document: Term,
        identifier: Term,
    ) -> Result<Self> {
        let c = self.coercer(op);
        let mut fields = vec![("document", c.value("document", document)?)];
        if !identifier.is_null() {
            fields.push(("identifier", c.node("identifier", identifier)?));
        }
        self.write(op, fields);
        Ok(self)
    }

    /// Inserts `document`, binding its id to `identifier` when not null.
    ///
    /// Pass a [`Doc`](crate::Doc) to encode plain JSON content.
    pub fn insert_document(self, document: impl Into<Term>, identifier: impl Into<Term>) -> Result<Self> {
        self.write_document(Operation::InsertDocument, document.into(), identifier.into())
    }

    pub fn update_document(self, document: impl Into<Term>, identifier: impl Into<Term>) -> Result<Self> {
        self.write_document(Operation::UpdateDocument, document.into(), identifier.into())
    }

    pub fn delete_document(mut self, identifier: impl Into<Term>) -> Result<Self> {
        let op = Operation::DeleteDocument;
        let identifier = self.coercer(op).node("identifier", identifier)?;
        self.write(op, vec![("identifier", identifier)]);
        Ok(self)
    }

    pub fn read_document(mut self, identifier: impl Into<Term>, document: impl Into<Term>) -> Result<Self> {
        let op = Operation::ReadDocument;
        let c = self.coercer(op);
        let fields = vec![
            ("identifier", c.node("identifier", identifier)?),
            ("document", c.value("document", document)?),
        ];
        self.write(op, fields);
        Ok(self)
    }
}
