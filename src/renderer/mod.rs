//! Rendering engines and the fixed set of queries they evaluate in-page.
//!
//! Every query runs inside the rendered page and hands back plain JSON, so
//! the pipeline never holds live DOM objects. `chromium` executes the
//! JavaScript below; `html` answers the same queries with CSS selectors over
//! statically served markup.

pub mod chromium;
pub mod html;

pub use chromium::{ChromiumRenderer, ChromiumSession};
pub use html::{Fetch, HtmlRenderer, HtmlSession};

use crate::advisor::{ADDRESS, NAME, PHONE, SIDEBAR, WEBSITE};
use lazy_static::lazy_static;
use std::time::Duration;

pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageQuery {
    /// Resolved `href` of every `<a>` in document order, `""` when absent.
    AnchorHrefs,
    /// `{found, name, address, phone, website}` from the profile sidebar.
    AdvisorSidebar,
}

const ANCHOR_HREFS_JS: &str =
    r#"Array.from(document.getElementsByTagName("a")).map(a => a.href || "")"#;

lazy_static! {
    static ref ADVISOR_SIDEBAR_JS: String = format!(
        r#"(() => {{
    const sidebar = document.querySelector("{sidebar}");
    if (!sidebar) return {{ found: false }};
    const first = (selector) => sidebar.querySelector(selector);
    const name = first("{name}");
    const address = first("{address}");
    const phone = first("{phone}");
    const website = first("{website}");
    return {{
        found: true,
        name: name ? name.textContent : null,
        address: address ? address.innerText : null,
        phone: phone ? phone.textContent : null,
        website: website ? (website.href || "") : null,
    }};
}})()"#,
        sidebar = SIDEBAR,
        name = NAME,
        address = ADDRESS,
        phone = PHONE,
        website = WEBSITE,
    );
}

impl PageQuery {
    /// Page-context JavaScript expression answering this query.
    pub fn script(&self) -> &str {
        match self {
            PageQuery::AnchorHrefs => ANCHOR_HREFS_JS,
            PageQuery::AdvisorSidebar => ADVISOR_SIDEBAR_JS.as_str(),
        }
    }
}
