//! [`MatrixDocument`] backed by a `scraper` DOM.

use std::sync::LazyLock;

use featurematrix_shared::ExtractConfig;
use scraper::{ElementRef, Html, Selector};

use super::{MatrixDocument, collapse_whitespace};

static TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("table selector"));

static HEADER_ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("thead tr").expect("thead row selector"));

static TH_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").expect("th selector"));

static H2_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").expect("h2 selector"));

static TBODY_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody").expect("tbody selector"));

static TR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("tr selector"));

static ROW_HEADER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"th[scope="row"]"#).expect("row header selector"));

static TD_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("td selector"));

static LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("link selector"));

/// A parsed matrix page.
pub struct HtmlDocument {
    html: Html,
    matrix_class: String,
    supported_class: String,
}

impl HtmlDocument {
    /// Parse a full HTML page using the class names from `config`.
    pub fn parse(content: &str, config: &ExtractConfig) -> Self {
        Self {
            html: Html::parse_document(content),
            matrix_class: config.matrix_class.clone(),
            supported_class: config.supported_class.clone(),
        }
    }

    fn is_matrix(&self, el: ElementRef<'_>) -> bool {
        el.value().name() == "table" && el.value().classes().any(|c| c == self.matrix_class)
    }
}

impl MatrixDocument for HtmlDocument {
    type Node<'a> = ElementRef<'a>;

    fn matrix_table(&self) -> Option<ElementRef<'_>> {
        self.html.select(&TABLE_SEL).find(|t| self.is_matrix(*t))
    }

    fn header_row<'a>(&'a self, table: ElementRef<'a>) -> Option<ElementRef<'a>> {
        table.select(&HEADER_ROW_SEL).next()
    }

    fn header_cells<'a>(&'a self, row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        row.select(&TH_SEL).collect()
    }

    fn section_headings(&self) -> Vec<ElementRef<'_>> {
        self.html.select(&H2_SEL).collect()
    }

    fn table_after<'a>(&'a self, heading: ElementRef<'a>) -> Option<ElementRef<'a>> {
        // Pre-order traversal is document order.
        self.html
            .root_element()
            .descendants()
            .skip_while(|node| node.id() != heading.id())
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| self.is_matrix(*el))
    }

    fn body_rows<'a>(&'a self, table: ElementRef<'a>) -> Option<Vec<ElementRef<'a>>> {
        let tbody = table.select(&TBODY_SEL).next()?;
        Some(tbody.select(&TR_SEL).collect())
    }

    fn row_header<'a>(&'a self, row: ElementRef<'a>) -> Option<ElementRef<'a>> {
        row.select(&ROW_HEADER_SEL).next()
    }

    fn data_cells<'a>(&'a self, row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        row.select(&TD_SEL).collect()
    }

    fn text<'a>(&'a self, node: ElementRef<'a>) -> String {
        collapse_whitespace(&node.text().collect::<String>())
    }

    fn link_href<'a>(&'a self, node: ElementRef<'a>) -> Option<String> {
        node.select(&LINK_SEL)
            .next()
            .and_then(|a| a.value().attr("href"))
            .filter(|href| !href.is_empty())
            .map(str::to_string)
    }

    fn is_supported<'a>(&'a self, cell: ElementRef<'a>) -> bool {
        cell.value().classes().any(|c| c == self.supported_class)
    }
}
