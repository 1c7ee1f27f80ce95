//! Consumer side of the listing contract: follows `nextPageToken` until the
//! final page and checks the paging guarantees along the way.

use std::collections::HashSet;
use anyhow::{bail, Context};
use futures::future::BoxFuture;
use futures::stream::{self, Stream, TryStreamExt};
use futures::FutureExt;
use tracing::debug;
use crate::models::restaurant::Restaurant;
use crate::models::restaurant_response::RestaurantResponse;
use crate::repositories::directory_repo::{ListingQuery, RestaurantDirectoryRepo};

pub trait PageSource {
    fn fetch_page<'a>(
        &'a self,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, anyhow::Result<RestaurantResponse>>;
}

/// Every page of a listing, requested one after another.
pub fn pages<'a, S>(source: &'a S) -> impl Stream<Item = anyhow::Result<RestaurantResponse>> + 'a
where
    S: PageSource + ?Sized + 'a,
{
    // `None` once the final page has been yielded.
    let start: Option<Option<String>> = Some(None);

    stream::try_unfold(start, move |state| async move {
        let token = match state {
            Some(token) => token,
            None => return Ok::<_, anyhow::Error>(None),
        };

        let page = source
            .fetch_page(token.as_deref())
            .await
            .with_context(|| format!("Failed to fetch restaurant page {:?}", token))?;
        page.validate().context("Restaurant page violates the listing contract")?;

        let next = page.next_page_token.clone().map(Some);
        Ok::<_, anyhow::Error>(Some((page, next)))
    })
}

/// Drains every page into one list, de-duplicating ids across pages.
pub async fn collect_restaurants<S>(source: &S) -> anyhow::Result<Vec<Restaurant>>
where
    S: PageSource + ?Sized,
{
    let mut restaurants = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut seen_tokens = HashSet::new();
    let mut received: u64 = 0;

    let mut page_stream = Box::pin(pages(source));
    while let Some(page) = page_stream.try_next().await? {
        received += page.data.len() as u64;
        if received > page.total_results {
            bail!(
                "Received {} restaurants but the backend reported only {} in total",
                received,
                page.total_results
            );
        }

        if let Some(token) = &page.next_page_token {
            if !seen_tokens.insert(token.clone()) {
                bail!("Page token `{}` was handed out twice", token);
            }
        }

        for restaurant in page.data {
            if seen_ids.insert(restaurant.id.clone()) {
                restaurants.push(restaurant);
            } else {
                debug!(id = %restaurant.id, "Skipping restaurant repeated across pages");
            }
        }
    }

    Ok(restaurants)
}

/// In-process `PageSource` over the directory with a fixed filter.
pub struct DirectoryListing<'a> {
    repo: &'a RestaurantDirectoryRepo,
    query: ListingQuery,
}

impl<'a> DirectoryListing<'a> {
    pub fn new(repo: &'a RestaurantDirectoryRepo, query: ListingQuery) -> Self {
        Self { repo, query }
    }
}

impl PageSource for DirectoryListing<'_> {
    fn fetch_page<'b>(
        &'b self,
        page_token: Option<&'b str>,
    ) -> BoxFuture<'b, anyhow::Result<RestaurantResponse>> {
        let query = ListingQuery {
            page_token: page_token.map(str::to_string),
            ..self.query.clone()
        };
        let page = self.repo.list_page(&query).map_err(anyhow::Error::from);
        async move { page }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use super::*;
    use crate::repositories::directory_repo::tests::{restaurant, sample_repo};

    /// Replays canned pages keyed by the token used to request them.
    struct ScriptedSource {
        pages: HashMap<Option<String>, RestaurantResponse>,
        requested: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<(Option<&str>, RestaurantResponse)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(token, page)| (token.map(str::to_string), page))
                    .collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl PageSource for ScriptedSource {
        fn fetch_page<'a>(
            &'a self,
            page_token: Option<&'a str>,
        ) -> BoxFuture<'a, anyhow::Result<RestaurantResponse>> {
            let key = page_token.map(str::to_string);
            self.requested.lock().unwrap().push(key.clone());
            let page = self
                .pages
                .get(&key)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no page for {:?}", key));
            async move { page }.boxed()
        }
    }

    fn page(ids: &[&str], total: u64, next: Option<&str>) -> RestaurantResponse {
        RestaurantResponse::ok(
            ids.iter().map(|id| restaurant(id, id, "Thai")).collect(),
            total,
            next.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn test_collects_every_directory_page() {
        let repo = sample_repo(7, 3);
        let listing = DirectoryListing::new(&repo, ListingQuery::default());

        let all: Vec<RestaurantResponse> = pages(&listing).try_collect().await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[..2].iter().all(|p| p.has_next_page()));
        assert!(!all[2].has_next_page());

        let restaurants = collect_restaurants(&listing).await.unwrap();
        let ids: Vec<&str> = restaurants.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r0", "r1", "r2", "r3", "r4", "r5", "r6"]);
    }

    #[tokio::test]
    async fn test_filtered_listing_respects_total() {
        let repo = sample_repo(9, 2);
        let listing = DirectoryListing::new(
            &repo,
            ListingQuery {
                cuisine: Some("Japanese".to_string()),
                ..Default::default()
            },
        );

        let restaurants = collect_restaurants(&listing).await.unwrap();
        assert_eq!(restaurants.len(), 4);
    }

    #[tokio::test]
    async fn test_stops_after_page_without_token() {
        let source = ScriptedSource::new(vec![
            (None, page(&["a", "b"], 3, Some("t1"))),
            (Some("t1"), page(&["c"], 3, None)),
        ]);

        let restaurants = collect_restaurants(&source).await.unwrap();
        assert_eq!(restaurants.len(), 3);
        assert_eq!(
            *source.requested.lock().unwrap(),
            vec![None, Some("t1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fails_when_items_exceed_total() {
        let source = ScriptedSource::new(vec![
            (None, page(&["a", "b"], 2, Some("t1"))),
            (Some("t1"), page(&["c"], 2, None)),
        ]);

        assert!(collect_restaurants(&source).await.is_err());
    }

    #[tokio::test]
    async fn test_fails_on_repeated_token() {
        let source = ScriptedSource::new(vec![
            (None, page(&["a"], 10, Some("loop"))),
            (Some("loop"), page(&["b"], 10, Some("loop"))),
        ]);

        assert!(collect_restaurants(&source).await.is_err());
    }

    #[tokio::test]
    async fn test_fails_on_page_with_duplicate_ids() {
        let source = ScriptedSource::new(vec![(None, page(&["a", "a"], 2, None))]);

        assert!(collect_restaurants(&source).await.is_err());
    }

    #[tokio::test]
    async fn test_deduplicates_ids_across_pages() {
        let source = ScriptedSource::new(vec![
            (None, page(&["a", "b"], 4, Some("t1"))),
            (Some("t1"), page(&["b", "c"], 4, None)),
        ]);

        let restaurants = collect_restaurants(&source).await.unwrap();
        let ids: Vec<&str> = restaurants.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
