//! The document client.
//!
//! [`DocumentClient`] turns typed calls into rendered requests, dispatches them
//! through its [`Transport`] and parses the responses. It holds nothing but the
//! transport, so a single client can be shared freely between tasks.
//!
//! # Example
//!
//! ```ignore
//! use cosmoslayer_core::{client::DocumentClient, dispatch::Context, options::*};
//!
//! let client = DocumentClient::new(transport);
//! let created = client
//!     .create_document(
//!         &Context::new(),
//!         "shop",
//!         "orders",
//!         &order,
//!         Some(CreateDocumentOptions::default().with_partition_key("customer-1")),
//!     )
//!     .await?;
//! println!("charged {} RU", created.request_charge());
//! ```

use futures::Stream;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    dispatch::{Context, dispatch},
    error::{DocumentDbError, DocumentDbResult},
    headers::Headers,
    link::ResourceLink,
    models::{PatchOperation, PatchRequest, Resource, StoredProcedure, StoredProcedures},
    options::{
        AsHeaders, CreateDocumentOptions, DeleteDocumentOptions, ExecuteStoredProcedureOptions,
        GetDocumentOptions, ListDocumentOptions, PatchDocumentOptions, QueryDocumentsOptions,
        ReplaceDocumentOptions, UpsertDocumentOptions,
    },
    request::{JSON_PATCH, Method, Request},
    response::{DocumentResponse, FeedPage, RawResponse, ResponseMetadata},
    transport::Transport,
};

/// A client for the document and stored procedure endpoints of one account.
#[derive(Debug, Clone)]
pub struct DocumentClient<T: Transport> {
    transport: T,
}

impl<T: Transport> DocumentClient<T> {
    /// Wraps `transport`. The client holds no other state.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    async fn send(
        &self,
        context: &Context,
        method: Method,
        link: ResourceLink,
        options: impl AsHeaders,
    ) -> DocumentDbResult<RawResponse> {
        let request = Request::new(method, link).with_headers(options.as_headers()?);
        dispatch(&self.transport, request, context).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        context: &Context,
        method: Method,
        link: ResourceLink,
        options: impl AsHeaders,
        body: &B,
    ) -> DocumentDbResult<RawResponse> {
        let request = Request::new(method, link)
            .with_headers(options.as_headers()?)
            .with_json_body(body)?;
        dispatch(&self.transport, request, context).await
    }

    /// Creates a document in a collection.
    ///
    /// `None` options render like the defaults, so the upsert flag is always sent.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentDbError::Remote`] with status `409` if a document with the
    /// same id exists and `is_upsert` is not set.
    pub async fn create_document<D: Serialize + ?Sized>(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
        document: &D,
        options: Option<CreateDocumentOptions>,
    ) -> DocumentDbResult<DocumentResponse<Resource>> {
        let link = ResourceLink::documents(database, collection)?;
        let response = self
            .send_json(context, Method::Post, link, options.unwrap_or_default(), document)
            .await?;
        DocumentResponse::from_raw(response)
    }

    /// Creates a document, or replaces it if one with the same id exists.
    pub async fn upsert_document<D: Serialize + ?Sized>(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
        document: &D,
        options: Option<UpsertDocumentOptions>,
    ) -> DocumentDbResult<DocumentResponse<Resource>> {
        let options = CreateDocumentOptions::from(options.unwrap_or_default());
        self.create_document(context, database, collection, document, Some(options))
            .await
    }

    /// Reads a single document and decodes it into `D`.
    ///
    /// With [`GetDocumentOptions::if_none_match`] set, an unchanged document yields
    /// a `304` response whose `resource` is `None`. The flag itself is sent on
    /// every read, as `false` when `options` is `None`.
    pub async fn get_document<D: DeserializeOwned>(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
        id: &str,
        options: Option<GetDocumentOptions>,
    ) -> DocumentDbResult<DocumentResponse<D>> {
        let link = ResourceLink::document(database, collection, id)?;
        let response = self
            .send(context, Method::Get, link, options.unwrap_or_default())
            .await?;
        DocumentResponse::from_raw(response)
    }

    /// Replaces a whole document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentDbError::Remote`] with status `412` when
    /// [`ReplaceDocumentOptions::if_match`] no longer matches the stored etag.
    pub async fn replace_document<D: Serialize + ?Sized>(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
        id: &str,
        document: &D,
        options: Option<ReplaceDocumentOptions>,
    ) -> DocumentDbResult<DocumentResponse<Resource>> {
        let link = ResourceLink::document(database, collection, id)?;
        let response = self
            .send_json(context, Method::Put, link, options, document)
            .await?;
        DocumentResponse::from_raw(response)
    }

    /// Deletes a document. The service answers with an empty body.
    pub async fn delete_document(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
        id: &str,
        options: Option<DeleteDocumentOptions>,
    ) -> DocumentDbResult<ResponseMetadata> {
        let link = ResourceLink::document(database, collection, id)?;
        let response = self.send(context, Method::Delete, link, options).await?;
        Ok(ResponseMetadata::from_response(&response))
    }

    /// Reads one page of the documents in a collection, or of its change feed
    /// when [`ListDocumentOptions::incremental_feed`] is set.
    ///
    /// Pass [`FeedPage::continuation`] back through
    /// [`ListDocumentOptions::continuation`] to fetch the next page.
    pub async fn list_documents<D: DeserializeOwned>(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
        options: Option<ListDocumentOptions>,
    ) -> DocumentDbResult<FeedPage<D>> {
        let link = ResourceLink::documents(database, collection)?;
        let response = self.send(context, Method::Get, link, options).await?;
        FeedPage::from_raw(response)
    }

    /// Lazily walks every page of a listing, starting from `options`.
    ///
    /// Each page is a separate request carrying the previous page's resume token.
    /// For listings that token is the continuation; for the change feed it is the
    /// page's etag, and the stream ends at the first page without changes. The
    /// stream stops after the first error. Calling this again restarts the walk.
    pub fn list_documents_pages<'a, D>(
        &'a self,
        context: &'a Context,
        database: &'a str,
        collection: &'a str,
        options: ListDocumentOptions,
    ) -> impl Stream<Item = DocumentDbResult<FeedPage<D>>> + 'a
    where
        D: DeserializeOwned + 'a,
    {
        futures::stream::unfold(Some(options), move |state| async move {
            let options = state?;
            match self
                .list_documents::<D>(context, database, collection, Some(options.clone()))
                .await
            {
                Ok(page) => {
                    let next = next_page_options(options, &page);
                    Some((Ok(page), next))
                }
                Err(err) => Some((Err(err), None)),
            }
        })
    }

    /// Applies a list of partial updates to a document and returns the result.
    pub async fn patch_document<D: DeserializeOwned>(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
        id: &str,
        operations: &[PatchOperation],
        options: Option<PatchDocumentOptions>,
    ) -> DocumentDbResult<DocumentResponse<D>> {
        let options = options.unwrap_or_default();
        let link = ResourceLink::document(database, collection, id)?;
        let body = serde_json::to_vec(&PatchRequest {
            condition: options.condition.as_deref(),
            operations,
        })?;
        let request = Request::new(Method::Patch, link)
            .with_headers(options.as_headers()?)
            .with_body(JSON_PATCH, body);
        let response = dispatch(&self.transport, request, context).await?;
        DocumentResponse::from_raw(response)
    }

    /// Ad-hoc SQL queries have no encoding in this client.
    ///
    /// # Errors
    ///
    /// Always returns [`DocumentDbError::NotImplemented`], without contacting the service.
    pub async fn query_documents(
        &self,
        _context: &Context,
        _database: &str,
        _collection: &str,
        _query: &str,
        _options: Option<QueryDocumentsOptions>,
    ) -> DocumentDbResult<FeedPage<Value>> {
        Err(DocumentDbError::NotImplemented("query documents"))
    }

    /// Registers a stored procedure on a collection.
    pub async fn create_stored_procedure(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
        name: &str,
        body: &str,
    ) -> DocumentDbResult<DocumentResponse<StoredProcedure>> {
        let link = ResourceLink::stored_procedures(database, collection)?;
        let sproc = StoredProcedure::new(name, body);
        let response = self
            .send_json(context, Method::Post, link, Headers::new(), &sproc)
            .await?;
        DocumentResponse::from_raw(response)
    }

    /// Replaces the source of an existing stored procedure.
    pub async fn replace_stored_procedure(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
        name: &str,
        body: &str,
    ) -> DocumentDbResult<DocumentResponse<StoredProcedure>> {
        let link = ResourceLink::stored_procedure(database, collection, name)?;
        let sproc = StoredProcedure::new(name, body);
        let response = self
            .send_json(context, Method::Put, link, Headers::new(), &sproc)
            .await?;
        DocumentResponse::from_raw(response)
    }

    pub async fn get_stored_procedure(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
        name: &str,
    ) -> DocumentDbResult<DocumentResponse<StoredProcedure>> {
        let link = ResourceLink::stored_procedure(database, collection, name)?;
        let response = self
            .send(context, Method::Get, link, Headers::new())
            .await?;
        DocumentResponse::from_raw(response)
    }

    pub async fn list_stored_procedures(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
    ) -> DocumentDbResult<DocumentResponse<StoredProcedures>> {
        let link = ResourceLink::stored_procedures(database, collection)?;
        let response = self
            .send(context, Method::Get, link, Headers::new())
            .await?;
        DocumentResponse::from_raw(response)
    }

    pub async fn delete_stored_procedure(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
        name: &str,
    ) -> DocumentDbResult<ResponseMetadata> {
        let link = ResourceLink::stored_procedure(database, collection, name)?;
        let response = self
            .send(context, Method::Delete, link, Headers::new())
            .await?;
        Ok(ResponseMetadata::from_response(&response))
    }

    /// Runs a stored procedure and decodes its return value into `R`.
    ///
    /// `args` must serialize to a JSON array, one element per parameter; slices,
    /// vectors and tuples all do.
    pub async fn execute_stored_procedure<R, A>(
        &self,
        context: &Context,
        database: &str,
        collection: &str,
        name: &str,
        args: &A,
        options: Option<ExecuteStoredProcedureOptions>,
    ) -> DocumentDbResult<DocumentResponse<R>>
    where
        R: DeserializeOwned,
        A: Serialize + ?Sized,
    {
        let link = ResourceLink::stored_procedure(database, collection, name)?;
        let response = self
            .send_json(context, Method::Post, link, options, args)
            .await?;
        DocumentResponse::from_raw(response)
    }
}

fn next_page_options<D>(
    options: ListDocumentOptions,
    page: &FeedPage<D>,
) -> Option<ListDocumentOptions> {
    if options.incremental_feed {
        match &page.metadata.etag {
            Some(etag) if !page.items.is_empty() => Some(options.with_if_none_match(etag.clone())),
            _ => None,
        }
    } else {
        page.continuation()
            .map(|token| options.with_continuation(token))
    }
}
