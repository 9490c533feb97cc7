//! Query interface over a parsed matrix page.
//!
//! The extraction algorithm only ever asks these questions of a document, so
//! it can run against the real HTML ([`HtmlDocument`]) or a hand-built tree
//! ([`FixtureDocument`]).

pub mod fixture;
mod html;

pub use fixture::{FixtureDocument, FixtureRow, FixtureTable};
pub use html::HtmlDocument;

/// Navigation over a document holding one or more matrix tables.
///
/// Nodes are cheap handles borrowed from the document.
pub trait MatrixDocument {
    /// Handle to an element of the document.
    type Node<'a>: Copy
    where
        Self: 'a;

    /// First table carrying the matrix class.
    fn matrix_table(&self) -> Option<Self::Node<'_>>;

    /// First row of the table head.
    fn header_row<'a>(&'a self, table: Self::Node<'a>) -> Option<Self::Node<'a>>;

    /// Header cells of a header row, in column order.
    fn header_cells<'a>(&'a self, row: Self::Node<'a>) -> Vec<Self::Node<'a>>;

    /// Top-level section headings, in document order.
    fn section_headings(&self) -> Vec<Self::Node<'_>>;

    /// First matrix table after `heading` in document order.
    fn table_after<'a>(&'a self, heading: Self::Node<'a>) -> Option<Self::Node<'a>>;

    /// Rows of the table body, or `None` when the table has no body.
    fn body_rows<'a>(&'a self, table: Self::Node<'a>) -> Option<Vec<Self::Node<'a>>>;

    /// Row-scoped header cell holding the feature name.
    fn row_header<'a>(&'a self, row: Self::Node<'a>) -> Option<Self::Node<'a>>;

    /// Data cells of a body row, in column order.
    fn data_cells<'a>(&'a self, row: Self::Node<'a>) -> Vec<Self::Node<'a>>;

    /// Trimmed text content with whitespace runs collapsed to single spaces.
    fn text<'a>(&'a self, node: Self::Node<'a>) -> String;

    /// `href` of the first link inside the node, if non-empty.
    fn link_href<'a>(&'a self, node: Self::Node<'a>) -> Option<String>;

    /// Whether a data cell carries the support marker.
    fn is_supported<'a>(&'a self, cell: Self::Node<'a>) -> bool;
}

/// Collapse whitespace runs and trim, the way cell text is compared everywhere.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
