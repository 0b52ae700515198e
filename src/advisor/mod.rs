mod discovery;
mod extraction;

pub use discovery::{discover_profile_links, is_profile_link, normalize_href};
pub use extraction::{extract_advisor_details, SidebarPayload};

use serde::Serialize;
use std::fmt;

/// Directory segment present in every individual advisor profile URL.
pub const PROFILE_MARKER: &str = "financial/advisor/";

pub const SIDEBAR: &str = ".advisor-sidebar";
pub const NAME: &str = "h1, h2, h3, h4, h5, h6";
pub const ADDRESS: &str = "address";
pub const PHONE: &str = ".advisor-phone-link";
pub const WEBSITE: &str = ".advisor-website-link";

/// One advisor's contact card. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisorRecord {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
}

/// Page regions a profile page must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Sidebar,
    Name,
    Address,
    Phone,
    Website,
}

impl Field {
    pub fn selector(&self) -> &'static str {
        match self {
            Field::Sidebar => SIDEBAR,
            Field::Name => NAME,
            Field::Address => ADDRESS,
            Field::Phone => PHONE,
            Field::Website => WEBSITE,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Sidebar => "sidebar",
            Field::Name => "name",
            Field::Address => "address",
            Field::Phone => "phone",
            Field::Website => "website",
        };
        write!(f, "{} ({})", name, self.selector())
    }
}
