//! Typed REST services, one per resource collection.

use std::{fmt, future::Future, marker::PhantomData};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::resource::Resource;

/// Page size the console asked for on every collection fetch.
pub const DEFAULT_LIMIT: u32 = 1000;

/// Query parameters for a collection `GET`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub limit: u32,
    /// `(field, value)` pairs sent as `filter.<field>=<value>`.
    pub filters: Vec<(String, String)>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            filters: Vec::new(),
        }
    }
}

impl ListParams {
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = vec![("limit".to_owned(), self.limit.to_string())];
        query.extend(
            self.filters
                .iter()
                .map(|(field, value)| (format!("filter.{field}"), value.clone())),
        );
        query
    }
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<R> {
    pub items: Vec<R>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Deserialize)]
struct RawPage<R> {
    items: Option<Vec<R>>,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    limit: u64,
    #[serde(default)]
    offset: u64,
}

impl<R> TryFrom<RawPage<R>> for ListPage<R> {
    type Error = Error;

    fn try_from(raw: RawPage<R>) -> Result<Self> {
        Ok(Self {
            items: raw.items.ok_or(Error::MissingField("items"))?,
            total: raw.total,
            limit: raw.limit,
            offset: raw.offset,
        })
    }
}

/// The two calls a [`ListController`](crate::ListController) needs from a
/// collection.
pub trait Collection<R: Resource>: Send + Sync + 'static {
    /// Fetches the current items of the collection.
    fn list(&self, params: &ListParams) -> impl Future<Output = Result<Vec<R>>> + Send;

    /// Deletes one item.
    fn delete(&self, id: &R::Id) -> impl Future<Output = Result<()>> + Send;
}

/// REST service for the collection at `R::PATH`.
pub struct Api<R> {
    client: Client,
    _ph: PhantomData<fn() -> R>,
}

impl<R> Clone for Api<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _ph: PhantomData,
        }
    }
}

impl<R> fmt::Debug for Api<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("type", &std::any::type_name::<R>())
            .field("client", &self.client)
            .finish()
    }
}

impl<R: Resource> Api<R> {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _ph: PhantomData,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn item_path(id: &R::Id) -> String {
        format!("{}/{id}", R::PATH)
    }

    /// `GET <path>?limit=1000`.
    pub async fn list(&self) -> Result<Vec<R>> {
        Ok(self.list_page(&ListParams::default()).await?.items)
    }

    /// `GET <path>` with explicit paging and filters.
    pub async fn list_page(&self, params: &ListParams) -> Result<ListPage<R>> {
        let raw: RawPage<R> = self.client.get(R::PATH, &params.query()).await?;
        raw.try_into()
    }

    pub async fn get(&self, id: &R::Id) -> Result<R> {
        self.client.get(&Self::item_path(id), &[]).await
    }

    pub async fn create<B: Serialize + ?Sized + Sync>(&self, body: &B) -> Result<R> {
        self.client.post(R::PATH, body).await
    }

    /// `PUT <path>/<id>`.
    pub async fn update<B: Serialize + ?Sized + Sync>(&self, id: &R::Id, body: &B) -> Result<R> {
        self.client.put(&Self::item_path(id), body).await
    }

    pub async fn delete(&self, id: &R::Id) -> Result<()> {
        self.client.delete(&Self::item_path(id)).await
    }

    /// `POST <path>/<id>/<verb>`, e.g. `provision` or `regenerate_api_token`.
    pub async fn action<T, B>(&self, id: &R::Id, verb: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let path = format!("{}/{verb}", Self::item_path(id));
        self.client.post(&path, body).await
    }
}

impl<R: Resource> Collection<R> for Api<R> {
    fn list(&self, params: &ListParams) -> impl Future<Output = Result<Vec<R>>> + Send {
        let params = params.clone();
        async move { Ok(self.list_page(&params).await?.items) }
    }

    fn delete(&self, id: &R::Id) -> impl Future<Output = Result<()>> + Send {
        Api::delete(self, id)
    }
}
