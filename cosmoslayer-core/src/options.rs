//! Per-operation option sets and their header rendering.
//!
//! Every option set implements [`AsHeaders`]. Fields left at their default are
//! not sent, with two exceptions the service expects on every call: the upsert
//! flag on document creation and the `If-None-Match` flag on document reads.
//!
//! # Example
//!
//! ```ignore
//! use cosmoslayer_core::options::{AsHeaders, ListDocumentOptions};
//!
//! let headers = ListDocumentOptions::default()
//!     .with_max_item_count(50)
//!     .with_continuation("abc")
//!     .as_headers()?;
//! assert_eq!(headers.len(), 2);
//! ```

use crate::{
    error::EncodingError,
    headers::{self, Headers},
    partition_key::PartitionKeyValue,
};

/// Renders an option set into request headers.
pub trait AsHeaders {
    /// Produces the headers for this option set.
    ///
    /// # Errors
    ///
    /// Fails only when the partition key cannot be encoded.
    fn as_headers(&self) -> Result<Headers, EncodingError>;
}

impl<T: AsHeaders> AsHeaders for Option<T> {
    fn as_headers(&self) -> Result<Headers, EncodingError> {
        match self {
            Some(options) => options.as_headers(),
            None => Ok(Headers::new()),
        }
    }
}

impl AsHeaders for Headers {
    fn as_headers(&self) -> Result<Headers, EncodingError> {
        Ok(self.clone())
    }
}

impl<T: AsHeaders> AsHeaders for &T {
    fn as_headers(&self) -> Result<Headers, EncodingError> {
        (*self).as_headers()
    }
}

/// Requested read staleness guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyLevel {
    Strong,
    Bounded,
    Session,
    Eventual,
}

impl ConsistencyLevel {
    /// The header value, as the service spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsistencyLevel::Strong => "Strong",
            ConsistencyLevel::Bounded => "Bounded",
            ConsistencyLevel::Session => "Session",
            ConsistencyLevel::Eventual => "Eventual",
        }
    }
}

/// Whether a written document participates in the collection's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexingDirective {
    Include,
    Exclude,
}

impl IndexingDirective {
    /// The header value, as the service spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexingDirective::Include => "include",
            IndexingDirective::Exclude => "exclude",
        }
    }
}

fn insert_partition_key(
    headers: &mut Headers,
    value: Option<&PartitionKeyValue>,
) -> Result<(), EncodingError> {
    if let Some(value) = value {
        headers.insert(headers::PARTITION_KEY, value.encode()?);
    }
    Ok(())
}

fn insert_consistency(headers: &mut Headers, level: Option<ConsistencyLevel>) {
    headers.insert_present(headers::CONSISTENCY_LEVEL, level.map(|l| l.as_str()));
}

fn insert_indexing(headers: &mut Headers, directive: Option<IndexingDirective>) {
    headers.insert_present(headers::INDEXING_DIRECTIVE, directive.map(|d| d.as_str()));
}

fn insert_triggers(headers: &mut Headers, pre: &[String], post: &[String]) {
    headers.insert_joined(headers::PRE_TRIGGER_INCLUDE, pre);
    headers.insert_joined(headers::POST_TRIGGER_INCLUDE, post);
}

/// Options for creating a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateDocumentOptions {
    pub partition_key: Option<PartitionKeyValue>,
    /// Replace the document if one with the same id exists. Always sent.
    pub is_upsert: bool,
    pub indexing_directive: Option<IndexingDirective>,
    pub pre_triggers: Vec<String>,
    pub post_triggers: Vec<String>,
}

impl CreateDocumentOptions {
    /// Targets the logical partition holding the resource.
    pub fn with_partition_key(mut self, value: impl Into<PartitionKeyValue>) -> Self {
        self.partition_key = Some(value.into());
        self
    }

    /// Sets the upsert flag.
    pub fn with_upsert(mut self, is_upsert: bool) -> Self {
        self.is_upsert = is_upsert;
        self
    }

    /// Includes the written document in, or excludes it from, the index.
    pub fn with_indexing_directive(mut self, directive: IndexingDirective) -> Self {
        self.indexing_directive = Some(directive);
        self
    }

    /// Adds a trigger to run before the write. Repeat to add more; they run in order.
    pub fn with_pre_trigger(mut self, name: impl Into<String>) -> Self {
        self.pre_triggers.push(name.into());
        self
    }

    /// Adds a trigger to run after the write.
    pub fn with_post_trigger(mut self, name: impl Into<String>) -> Self {
        self.post_triggers.push(name.into());
        self
    }
}

impl AsHeaders for CreateDocumentOptions {
    fn as_headers(&self) -> Result<Headers, EncodingError> {
        let mut headers = Headers::new();

        insert_partition_key(&mut headers, self.partition_key.as_ref())?;
        headers.insert_flag(headers::UPSERT, self.is_upsert);
        insert_indexing(&mut headers, self.indexing_directive);
        insert_triggers(&mut headers, &self.pre_triggers, &self.post_triggers);

        Ok(headers)
    }
}

/// Options for creating or replacing a document in a single call.
///
/// Renders like [`CreateDocumentOptions`] with the upsert flag set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpsertDocumentOptions {
    pub partition_key: Option<PartitionKeyValue>,
    pub indexing_directive: Option<IndexingDirective>,
    pub pre_triggers: Vec<String>,
    pub post_triggers: Vec<String>,
}

impl UpsertDocumentOptions {
    /// Targets the logical partition holding the resource.
    pub fn with_partition_key(mut self, value: impl Into<PartitionKeyValue>) -> Self {
        self.partition_key = Some(value.into());
        self
    }

    /// Includes the written document in, or excludes it from, the index.
    pub fn with_indexing_directive(mut self, directive: IndexingDirective) -> Self {
        self.indexing_directive = Some(directive);
        self
    }

    /// Adds a trigger to run before the write. Repeat to add more; they run in order.
    pub fn with_pre_trigger(mut self, name: impl Into<String>) -> Self {
        self.pre_triggers.push(name.into());
        self
    }

    /// Adds a trigger to run after the write.
    pub fn with_post_trigger(mut self, name: impl Into<String>) -> Self {
        self.post_triggers.push(name.into());
        self
    }
}

impl From<UpsertDocumentOptions> for CreateDocumentOptions {
    fn from(options: UpsertDocumentOptions) -> Self {
        CreateDocumentOptions {
            partition_key: options.partition_key,
            is_upsert: true,
            indexing_directive: options.indexing_directive,
            pre_triggers: options.pre_triggers,
            post_triggers: options.post_triggers,
        }
    }
}

impl AsHeaders for UpsertDocumentOptions {
    fn as_headers(&self) -> Result<Headers, EncodingError> {
        CreateDocumentOptions::from(self.clone()).as_headers()
    }
}

/// Options for reading a single document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetDocumentOptions {
    /// Sent as the literal `true`/`false` on every read.
    pub if_none_match: bool,
    pub partition_key: Option<PartitionKeyValue>,
    pub consistency_level: Option<ConsistencyLevel>,
    pub session_token: Option<String>,
}

impl GetDocumentOptions {
    /// Asks for a conditional read that may answer `304 Not Modified`.
    pub fn with_if_none_match(mut self, if_none_match: bool) -> Self {
        self.if_none_match = if_none_match;
        self
    }

    /// Targets the logical partition holding the resource.
    pub fn with_partition_key(mut self, value: impl Into<PartitionKeyValue>) -> Self {
        self.partition_key = Some(value.into());
        self
    }

    /// Relaxes the read consistency for this call.
    pub fn with_consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.consistency_level = Some(level);
        self
    }

    /// Session token from an earlier response, for session consistency.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl AsHeaders for GetDocumentOptions {
    fn as_headers(&self) -> Result<Headers, EncodingError> {
        let mut headers = Headers::new();

        headers.insert_flag(headers::IF_NONE_MATCH, self.if_none_match);
        insert_partition_key(&mut headers, self.partition_key.as_ref())?;
        insert_consistency(&mut headers, self.consistency_level);
        headers.insert_present(headers::SESSION_TOKEN, self.session_token.as_deref());

        Ok(headers)
    }
}

/// Options for listing the documents of a collection, or reading its change feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListDocumentOptions {
    /// Page size hint. Zero leaves the choice to the service.
    pub max_item_count: i64,
    /// Resume token returned by the previous page.
    pub continuation: Option<String>,
    pub consistency_level: Option<ConsistencyLevel>,
    pub session_token: Option<String>,
    /// Read the change feed instead of the full listing.
    pub incremental_feed: bool,
    pub if_none_match: Option<String>,
    pub partition_key_range_id: Option<String>,
}

impl ListDocumentOptions {
    /// Caps the page size. `-1` lets the service choose and `0` leaves the header out.
    pub fn with_max_item_count(mut self, count: i64) -> Self {
        self.max_item_count = count;
        self
    }

    /// Resumes a listing from the `x-ms-continuation` value of a previous page.
    pub fn with_continuation(mut self, token: impl Into<String>) -> Self {
        self.continuation = Some(token.into());
        self
    }

    /// Relaxes the read consistency for this call.
    pub fn with_consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.consistency_level = Some(level);
        self
    }

    /// Session token from an earlier response, for session consistency.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Switches the listing to change feed mode (`a-im: Incremental Feed`).
    pub fn with_incremental_feed(mut self, incremental: bool) -> Self {
        self.incremental_feed = incremental;
        self
    }

    /// Only return changes after `etag`. Used with the change feed.
    pub fn with_if_none_match(mut self, etag: impl Into<String>) -> Self {
        self.if_none_match = Some(etag.into());
        self
    }

    /// Restricts the listing to one physical partition range.
    pub fn with_partition_key_range_id(mut self, id: impl Into<String>) -> Self {
        self.partition_key_range_id = Some(id.into());
        self
    }
}

impl AsHeaders for ListDocumentOptions {
    fn as_headers(&self) -> Result<Headers, EncodingError> {
        let mut headers = Headers::new();

        headers.insert_nonzero(headers::MAX_ITEM_COUNT, self.max_item_count);
        headers.insert_present(headers::CONTINUATION, self.continuation.as_deref());
        insert_consistency(&mut headers, self.consistency_level);
        headers.insert_present(headers::SESSION_TOKEN, self.session_token.as_deref());
        if self.incremental_feed {
            headers.insert(headers::A_IM, headers::INCREMENTAL_FEED);
        }
        headers.insert_present(headers::IF_NONE_MATCH, self.if_none_match.as_deref());
        headers.insert_present(
            headers::PARTITION_KEY_RANGE_ID,
            self.partition_key_range_id.as_deref(),
        );

        Ok(headers)
    }
}

/// Options for replacing a whole document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaceDocumentOptions {
    pub partition_key: Option<PartitionKeyValue>,
    /// Only replace if the stored document still has this etag.
    pub if_match: Option<String>,
    pub indexing_directive: Option<IndexingDirective>,
    pub session_token: Option<String>,
    pub pre_triggers: Vec<String>,
    pub post_triggers: Vec<String>,
}

impl ReplaceDocumentOptions {
    /// Targets the logical partition holding the resource.
    pub fn with_partition_key(mut self, value: impl Into<PartitionKeyValue>) -> Self {
        self.partition_key = Some(value.into());
        self
    }

    /// Makes the write conditional on the current etag matching `etag`.
    pub fn with_if_match(mut self, etag: impl Into<String>) -> Self {
        self.if_match = Some(etag.into());
        self
    }

    /// Includes the written document in, or excludes it from, the index.
    pub fn with_indexing_directive(mut self, directive: IndexingDirective) -> Self {
        self.indexing_directive = Some(directive);
        self
    }

    /// Session token from an earlier response, for session consistency.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Adds a trigger to run before the write. Repeat to add more; they run in order.
    pub fn with_pre_trigger(mut self, name: impl Into<String>) -> Self {
        self.pre_triggers.push(name.into());
        self
    }

    /// Adds a trigger to run after the write.
    pub fn with_post_trigger(mut self, name: impl Into<String>) -> Self {
        self.post_triggers.push(name.into());
        self
    }
}

impl AsHeaders for ReplaceDocumentOptions {
    fn as_headers(&self) -> Result<Headers, EncodingError> {
        let mut headers = Headers::new();

        insert_partition_key(&mut headers, self.partition_key.as_ref())?;
        headers.insert_present(headers::IF_MATCH, self.if_match.as_deref());
        insert_indexing(&mut headers, self.indexing_directive);
        headers.insert_present(headers::SESSION_TOKEN, self.session_token.as_deref());
        insert_triggers(&mut headers, &self.pre_triggers, &self.post_triggers);

        Ok(headers)
    }
}

/// Options for deleting a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteDocumentOptions {
    pub partition_key: Option<PartitionKeyValue>,
    pub pre_triggers: Vec<String>,
    pub post_triggers: Vec<String>,
}

impl DeleteDocumentOptions {
    /// Targets the logical partition holding the resource.
    pub fn with_partition_key(mut self, value: impl Into<PartitionKeyValue>) -> Self {
        self.partition_key = Some(value.into());
        self
    }

    /// Adds a trigger to run before the write. Repeat to add more; they run in order.
    pub fn with_pre_trigger(mut self, name: impl Into<String>) -> Self {
        self.pre_triggers.push(name.into());
        self
    }

    /// Adds a trigger to run after the write.
    pub fn with_post_trigger(mut self, name: impl Into<String>) -> Self {
        self.post_triggers.push(name.into());
        self
    }
}

impl AsHeaders for DeleteDocumentOptions {
    fn as_headers(&self) -> Result<Headers, EncodingError> {
        let mut headers = Headers::new();

        insert_partition_key(&mut headers, self.partition_key.as_ref())?;
        insert_triggers(&mut headers, &self.pre_triggers, &self.post_triggers);

        Ok(headers)
    }
}

/// Options for a partial document update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchDocumentOptions {
    pub partition_key: Option<PartitionKeyValue>,
    pub consistency_level: Option<ConsistencyLevel>,
    pub session_token: Option<String>,
    /// A filter predicate (e.g. `from c where c.status = 'open'`) the stored
    /// document must satisfy. Sent in the request body, not as a header.
    pub condition: Option<String>,
}

impl PatchDocumentOptions {
    /// Targets the logical partition holding the resource.
    pub fn with_partition_key(mut self, value: impl Into<PartitionKeyValue>) -> Self {
        self.partition_key = Some(value.into());
        self
    }

    /// Relaxes the read consistency for this call.
    pub fn with_consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.consistency_level = Some(level);
        self
    }

    /// Session token from an earlier response, for session consistency.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// A filter predicate; the patch is applied only if the document matches it.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

impl AsHeaders for PatchDocumentOptions {
    fn as_headers(&self) -> Result<Headers, EncodingError> {
        let mut headers = Headers::new();

        insert_partition_key(&mut headers, self.partition_key.as_ref())?;
        insert_consistency(&mut headers, self.consistency_level);
        headers.insert_present(headers::SESSION_TOKEN, self.session_token.as_deref());

        Ok(headers)
    }
}

/// Options for executing a stored procedure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecuteStoredProcedureOptions {
    pub partition_key: Option<PartitionKeyValue>,
}

impl ExecuteStoredProcedureOptions {
    /// Targets the logical partition holding the resource.
    pub fn with_partition_key(mut self, value: impl Into<PartitionKeyValue>) -> Self {
        self.partition_key = Some(value.into());
        self
    }
}

impl AsHeaders for ExecuteStoredProcedureOptions {
    fn as_headers(&self) -> Result<Headers, EncodingError> {
        let mut headers = Headers::new();
        insert_partition_key(&mut headers, self.partition_key.as_ref())?;
        Ok(headers)
    }
}

/// Options for ad-hoc document queries.
///
/// Querying has no encoding in this client yet; see
/// [`DocumentClient::query_documents`](crate::client::DocumentClient::query_documents).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDocumentsOptions {}
