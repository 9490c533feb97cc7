//! Hand-built [`MatrixDocument`] for exercising extraction without HTML.
//!
//! A fixture is a list of sections, each a heading optionally followed by a
//! matrix table. The first table present acts as the page's version header.

use super::{MatrixDocument, collapse_whitespace};

/// An in-memory matrix page.
#[derive(Debug, Clone, Default)]
pub struct FixtureDocument {
    sections: Vec<(String, Option<FixtureTable>)>,
}

/// A matrix table: optional head row and optional body.
#[derive(Debug, Clone, Default)]
pub struct FixtureTable {
    header: Option<Vec<String>>,
    body: Option<Vec<FixtureRow>>,
}

/// A body row: the row header (name + link) and one flag per data cell.
#[derive(Debug, Clone, Default)]
pub struct FixtureRow {
    name: Option<String>,
    href: Option<String>,
    cells: Vec<bool>,
}

/// Node handle into a [`FixtureDocument`].
#[derive(Debug, Clone, Copy)]
pub enum FixtureNode<'a> {
    Heading(usize),
    Table(&'a FixtureTable),
    HeaderRow(&'a [String]),
    HeaderCell(&'a str),
    Row(&'a FixtureRow),
    RowHeader(&'a FixtureRow),
    Cell(bool),
}

impl FixtureDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section heading followed by `table`.
    pub fn section(mut self, heading: &str, table: FixtureTable) -> Self {
        self.sections.push((heading.to_string(), Some(table)));
        self
    }

    /// Append a section heading with no table before the next heading.
    pub fn bare_section(mut self, heading: &str) -> Self {
        self.sections.push((heading.to_string(), None));
        self
    }
}

impl FixtureTable {
    /// A table with a header row and a (possibly empty) body.
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            header: Some(header.iter().map(|s| s.as_ref().to_string()).collect()),
            body: Some(Vec::new()),
        }
    }

    /// A table with a body but no head.
    pub fn headless() -> Self {
        Self {
            header: None,
            body: Some(Vec::new()),
        }
    }

    /// Drop the body entirely.
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }

    pub fn row(mut self, row: FixtureRow) -> Self {
        self.body.get_or_insert_with(Vec::new).push(row);
        self
    }
}

impl FixtureRow {
    /// A row named `name` with support flags in newest-first column order.
    pub fn new(name: &str, cells: &[bool]) -> Self {
        Self {
            name: Some(name.to_string()),
            href: None,
            cells: cells.to_vec(),
        }
    }

    /// A row without a row-scoped header cell.
    pub fn unnamed(cells: &[bool]) -> Self {
        Self {
            name: None,
            href: None,
            cells: cells.to_vec(),
        }
    }

    pub fn link(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }
}

impl MatrixDocument for FixtureDocument {
    type Node<'a> = FixtureNode<'a>;

    fn matrix_table(&self) -> Option<FixtureNode<'_>> {
        self.sections
            .iter()
            .find_map(|(_, table)| table.as_ref())
            .map(FixtureNode::Table)
    }

    fn header_row<'a>(&'a self, table: FixtureNode<'a>) -> Option<FixtureNode<'a>> {
        match table {
            FixtureNode::Table(t) => t.header.as_deref().map(FixtureNode::HeaderRow),
            _ => None,
        }
    }

    fn header_cells<'a>(&'a self, row: FixtureNode<'a>) -> Vec<FixtureNode<'a>> {
        match row {
            FixtureNode::HeaderRow(cells) => cells
                .iter()
                .map(|c| FixtureNode::HeaderCell(c.as_str()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn section_headings(&self) -> Vec<FixtureNode<'_>> {
        (0..self.sections.len()).map(FixtureNode::Heading).collect()
    }

    fn table_after<'a>(&'a self, heading: FixtureNode<'a>) -> Option<FixtureNode<'a>> {
        let FixtureNode::Heading(idx) = heading else {
            return None;
        };
        self.sections[idx..]
            .iter()
            .find_map(|(_, table)| table.as_ref())
            .map(FixtureNode::Table)
    }

    fn body_rows<'a>(&'a self, table: FixtureNode<'a>) -> Option<Vec<FixtureNode<'a>>> {
        match table {
            FixtureNode::Table(t) => t
                .body
                .as_ref()
                .map(|rows| rows.iter().map(FixtureNode::Row).collect()),
            _ => None,
        }
    }

    fn row_header<'a>(&'a self, row: FixtureNode<'a>) -> Option<FixtureNode<'a>> {
        match row {
            FixtureNode::Row(r) if r.name.is_some() => Some(FixtureNode::RowHeader(r)),
            _ => None,
        }
    }

    fn data_cells<'a>(&'a self, row: FixtureNode<'a>) -> Vec<FixtureNode<'a>> {
        match row {
            FixtureNode::Row(r) => r.cells.iter().copied().map(FixtureNode::Cell).collect(),
            _ => Vec::new(),
        }
    }

    fn text<'a>(&'a self, node: FixtureNode<'a>) -> String {
        match node {
            FixtureNode::Heading(idx) => collapse_whitespace(&self.sections[idx].0),
            FixtureNode::HeaderCell(text) => collapse_whitespace(text),
            FixtureNode::RowHeader(r) => collapse_whitespace(r.name.as_deref().unwrap_or("")),
            _ => String::new(),
        }
    }

    fn link_href<'a>(&'a self, node: FixtureNode<'a>) -> Option<String> {
        match node {
            FixtureNode::RowHeader(r) => r.href.clone().filter(|h| !h.is_empty()),
            _ => None,
        }
    }

    fn is_supported<'a>(&'a self, cell: FixtureNode<'a>) -> bool {
        matches!(cell, FixtureNode::Cell(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_table_is_matrix_table() {
        let doc = FixtureDocument::new()
            .bare_section("Quick Links")
            .section("Backend", FixtureTable::new(&["", "17"]));
        let table = doc.matrix_table().expect("table");
        let row = doc.header_row(table).expect("header");
        assert_eq!(doc.header_cells(row).len(), 2);
    }

    #[test]
    fn table_after_looks_past_bare_sections() {
        let doc = FixtureDocument::new()
            .bare_section("Quick Links")
            .section("Backend", FixtureTable::new(&["", "17"]));
        let headings = doc.section_headings();
        assert!(doc.table_after(headings[0]).is_some());
        assert!(doc.table_after(headings[1]).is_some());
    }

    #[test]
    fn unnamed_row_has_no_header() {
        let doc = FixtureDocument::new().section(
            "Backend",
            FixtureTable::new(&["", "17"]).row(FixtureRow::unnamed(&[true])),
        );
        let table = doc.matrix_table().unwrap();
        let rows = doc.body_rows(table).unwrap();
        assert!(doc.row_header(rows[0]).is_none());
    }
}
