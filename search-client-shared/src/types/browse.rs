//! Browse page wire type.

use serde::{Deserialize, Serialize};

use crate::types::record::Record;

/// One page of a browse enumeration.
///
/// The provider returns the page's records and, while more pages remain, a
/// continuation cursor. The cursor encoding is owned by the provider; the
/// client only carries it forward.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BrowsePage {
    /// Records on this page.
    #[serde(default)]
    pub hits: Vec<Record>,
    /// Continuation cursor for the next page; absent on the final page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}
