//! Cursor paged `select` requests and their responses

use serde::Deserialize;
use serde_json::Value;

/// Cursor token meaning "start of the result set"
pub const CURSOR_START: &str = "*";

/// One page request against a core's select handler.
///
/// `sort_field` must be the core's unique key, otherwise cursor paging can
/// repeat or skip documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub core: String,
    pub sort_field: String,
    pub rows: usize,
    pub cursor: String,
    pub field_list: String,
}

impl PageRequest {
    /// Path and query string relative to the Solr base url
    pub fn path_and_query(&self) -> String {
        format!(
            "/solr/{}/select?q=*:*&sort={}+asc&rows={}&start=0&wt=json&fl={}&cursorMark={}",
            self.core,
            urlencoding::encode(&self.sort_field),
            self.rows,
            urlencoding::encode(&self.field_list),
            urlencoding::encode(&self.cursor),
        )
    }
}

/// Documents of one page plus what Solr reports about the rest
#[derive(Clone, Debug, PartialEq)]
pub struct PageResponse {
    pub docs: Vec<Value>,
    pub num_found: u64,
    pub next_cursor: Option<String>,
}

#[derive(Deserialize)]
struct SelectBody {
    response: SelectDocs,
    #[serde(rename = "nextCursorMark")]
    next_cursor_mark: Option<String>,
}

#[derive(Deserialize)]
struct SelectDocs {
    docs: Vec<Value>,
    #[serde(rename = "numFound")]
    num_found: u64,
}

impl PageResponse {
    pub fn from_json(body: &[u8]) -> serde_json::Result<PageResponse> {
        let body: SelectBody = serde_json::from_slice(body)?;
        Ok(PageResponse {
            docs: body.response.docs,
            num_found: body.response.num_found,
            next_cursor: body.next_cursor_mark.filter(|c| !c.is_empty()),
        })
    }
}
