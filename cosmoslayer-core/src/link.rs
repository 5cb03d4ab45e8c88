//! Resource addressing.
//!
//! A [`ResourceLink`] names one resource (or one resource feed) in the service's
//! hierarchy and renders to the exact path the REST API expects:
//!
//! ```text
//! dbs/{db}
//! dbs/{db}/colls/{col}
//! dbs/{db}/colls/{col}/docs            (document feed)
//! dbs/{db}/colls/{col}/docs/{id}
//! dbs/{db}/colls/{col}/sprocs          (stored procedure feed)
//! dbs/{db}/colls/{col}/sprocs/{name}
//! ```
//!
//! Printable ASCII names are written verbatim, except for the few characters that
//! would change the structure of the path. Those (and any non-ASCII bytes) are
//! percent-encoded, so two different name triples never render to the same link
//! and [`ResourceLink::from_str`] can always recover the names.

use std::fmt;
use std::str::FromStr;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::error::EncodingError;

const SEGMENT: &AsciiSet = &CONTROLS
    .add(b'/')
    .add(b'\\')
    .add(b'%')
    .add(b'?')
    .add(b'#');

/// The kind of resource a request targets, as the service names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Databases,
    Collections,
    Documents,
    StoredProcedures,
}

impl ResourceType {
    /// The path segment for this type, which is also the `type` signed into
    /// authorization tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Databases => "dbs",
            ResourceType::Collections => "colls",
            ResourceType::Documents => "docs",
            ResourceType::StoredProcedures => "sprocs",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated address of a resource or resource feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceLink {
    Database {
        database: String,
    },
    Collection {
        database: String,
        collection: String,
    },
    /// The feed of all documents in a collection.
    Documents {
        database: String,
        collection: String,
    },
    Document {
        database: String,
        collection: String,
        id: String,
    },
    /// The feed of all stored procedures in a collection.
    StoredProcedures {
        database: String,
        collection: String,
    },
    StoredProcedure {
        database: String,
        collection: String,
        name: String,
    },
}

// `.` and `..` stay dot segments even when percent-encoded, so they are refused
// rather than encoded.
fn required(value: &str, kind: &'static str) -> Result<String, EncodingError> {
    match value {
        "" => Err(EncodingError::EmptyResourceName(kind)),
        "." | ".." => Err(EncodingError::ReservedResourceName(kind, value.to_string())),
        _ => Ok(value.to_string()),
    }
}

impl ResourceLink {
    /// Links to a database.
    ///
    /// Every constructor rejects empty names with
    /// [`EmptyResourceName`](EncodingError::EmptyResourceName) and the names `.` and
    /// `..` with [`ReservedResourceName`](EncodingError::ReservedResourceName). Any
    /// other name is accepted and escaped when rendered.
    pub fn database(database: &str) -> Result<Self, EncodingError> {
        Ok(ResourceLink::Database {
            database: required(database, "database")?,
        })
    }

    /// Links to a collection inside `database`.
    pub fn collection(database: &str, collection: &str) -> Result<Self, EncodingError> {
        Ok(ResourceLink::Collection {
            database: required(database, "database")?,
            collection: required(collection, "collection")?,
        })
    }

    /// Links to the document feed of a collection, the target of create, list and
    /// query calls.
    pub fn documents(database: &str, collection: &str) -> Result<Self, EncodingError> {
        Ok(ResourceLink::Documents {
            database: required(database, "database")?,
            collection: required(collection, "collection")?,
        })
    }

    /// Links to a single document by `id`.
    pub fn document(database: &str, collection: &str, id: &str) -> Result<Self, EncodingError> {
        Ok(ResourceLink::Document {
            database: required(database, "database")?,
            collection: required(collection, "collection")?,
            id: required(id, "document")?,
        })
    }

    /// Links to the stored procedure feed of a collection.
    pub fn stored_procedures(database: &str, collection: &str) -> Result<Self, EncodingError> {
        Ok(ResourceLink::StoredProcedures {
            database: required(database, "database")?,
            collection: required(collection, "collection")?,
        })
    }

    /// Links to a stored procedure by `name`. Execution posts to this link too.
    pub fn stored_procedure(
        database: &str,
        collection: &str,
        name: &str,
    ) -> Result<Self, EncodingError> {
        Ok(ResourceLink::StoredProcedure {
            database: required(database, "database")?,
            collection: required(collection, "collection")?,
            name: required(name, "stored procedure")?,
        })
    }

    /// The resource type the service expects alongside this link.
    ///
    /// Feed links report the type of the items in the feed.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            ResourceLink::Database { .. } => ResourceType::Databases,
            ResourceLink::Collection { .. } => ResourceType::Collections,
            ResourceLink::Documents { .. } | ResourceLink::Document { .. } => {
                ResourceType::Documents
            }
            ResourceLink::StoredProcedures { .. } | ResourceLink::StoredProcedure { .. } => {
                ResourceType::StoredProcedures
            }
        }
    }

    /// Whether this link addresses a feed rather than a single resource.
    pub fn is_feed(&self) -> bool {
        matches!(
            self,
            ResourceLink::Documents { .. } | ResourceLink::StoredProcedures { .. }
        )
    }

    /// The link a request signature is computed over.
    ///
    /// For a feed this is the owning collection; for a single resource it is the
    /// resource itself.
    pub fn signing_link(&self) -> String {
        match self {
            ResourceLink::Documents { database, collection }
            | ResourceLink::StoredProcedures { database, collection } => ResourceLink::Collection {
                database: database.clone(),
                collection: collection.clone(),
            }
            .to_string(),
            _ => self.to_string(),
        }
    }
}

fn encode(name: &str) -> impl fmt::Display + '_ {
    utf8_percent_encode(name, SEGMENT)
}

impl fmt::Display for ResourceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLink::Database { database } => write!(f, "dbs/{}", encode(database)),
            ResourceLink::Collection { database, collection } => {
                write!(f, "dbs/{}/colls/{}", encode(database), encode(collection))
            }
            ResourceLink::Documents { database, collection } => {
                write!(f, "dbs/{}/colls/{}/docs", encode(database), encode(collection))
            }
            ResourceLink::Document { database, collection, id } => write!(
                f,
                "dbs/{}/colls/{}/docs/{}",
                encode(database),
                encode(collection),
                encode(id)
            ),
            ResourceLink::StoredProcedures { database, collection } => {
                write!(f, "dbs/{}/colls/{}/sprocs", encode(database), encode(collection))
            }
            ResourceLink::StoredProcedure { database, collection, name } => write!(
                f,
                "dbs/{}/colls/{}/sprocs/{}",
                encode(database),
                encode(collection),
                encode(name)
            ),
        }
    }
}

fn decode(segment: &str, link: &str) -> Result<String, EncodingError> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| EncodingError::MalformedLink(link.to_string()))
}

impl FromStr for ResourceLink {
    type Err = EncodingError;

    fn from_str(link: &str) -> Result<Self, Self::Err> {
        let segments = link
            .trim_matches('/')
            .split('/')
            .collect::<Vec<_>>();
        let malformed = || EncodingError::MalformedLink(link.to_string());

        match segments.as_slice() {
            ["dbs", db] => ResourceLink::database(&decode(db, link)?),
            ["dbs", db, "colls", col] => {
                ResourceLink::collection(&decode(db, link)?, &decode(col, link)?)
            }
            ["dbs", db, "colls", col, "docs"] => {
                ResourceLink::documents(&decode(db, link)?, &decode(col, link)?)
            }
            ["dbs", db, "colls", col, "docs", id] => ResourceLink::document(
                &decode(db, link)?,
                &decode(col, link)?,
                &decode(id, link)?,
            ),
            ["dbs", db, "colls", col, "sprocs"] => {
                ResourceLink::stored_procedures(&decode(db, link)?, &decode(col, link)?)
            }
            ["dbs", db, "colls", col, "sprocs", name] => ResourceLink::stored_procedure(
                &decode(db, link)?,
                &decode(col, link)?,
                &decode(name, link)?,
            ),
            _ => Err(malformed()),
        }
    }
}
