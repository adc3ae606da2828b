//! Resource definitions.
//!
//! Each resource is a static descriptor of one category of Com Laude data.
//! The set is fixed; the tools that serve a category point back to it from
//! the tool catalog.

/// Trait for resource definitions.
///
/// Each resource must implement this trait to provide its metadata.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    fn uri(&self) -> &'static str;

    /// The display name of the resource.
    fn name(&self) -> &'static str;

    /// A description of the resource.
    fn description(&self) -> &'static str;

    /// The MIME type of the resource content.
    fn mime_type(&self) -> &'static str {
        "application/json"
    }
}

/// Categories of remote data exposed as resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCategory {
    Accounts,
    Domains,
    SslCertificates,
    Contacts,
    Services,
}

impl ResourceCategory {
    /// All categories, in listing order.
    pub const ALL: [ResourceCategory; 5] = [
        Self::Accounts,
        Self::Domains,
        Self::SslCertificates,
        Self::Contacts,
        Self::Services,
    ];
}

impl ResourceDefinition for ResourceCategory {
    fn uri(&self) -> &'static str {
        match self {
            Self::Accounts => "comlaude://accounts",
            Self::Domains => "comlaude://domains",
            Self::SslCertificates => "comlaude://ssl-certificates",
            Self::Contacts => "comlaude://contacts",
            Self::Services => "comlaude://services",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Accounts => "Accounts",
            Self::Domains => "Domains",
            Self::SslCertificates => "SSL Certificates",
            Self::Contacts => "Contacts",
            Self::Services => "Services",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Accounts => "Com Laude account management",
            Self::Domains => "Domain management and DNS",
            Self::SslCertificates => "SSL certificate management",
            Self::Contacts => "Contact management",
            Self::Services => "Available services",
        }
    }
}
