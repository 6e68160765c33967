//! Recursive views assembled from several upstream calls
//!
//! Every operation starts from a fresh fetch of the group's collections, so
//! nothing is shared between requests. Per-collection requests run with at
//! most `concurrency` in flight and their results are reassembled in
//! traversal order; the first failure aborts the whole aggregation.

use crate::prelude::*;
use crate::zotero::ZoteroClient;
use futures::stream::{self, StreamExt, TryStreamExt};
use zotproxy_core::bib::join_bib;
use zotproxy_core::collection::{Collection, CollectionMap};
use zotproxy_core::tree::{build_tree, collect_descendants, descendant_keys};

/// Nested tree rooted at `key`
pub async fn collection_tree(client: &ZoteroClient, key: &str) -> ApiResult<CollectionMap> {
    let collections = client.fetch_all_collections().await?;
    Ok(build_tree(&collections, key)?)
}

/// `key` followed by every collection below it, in pre-order
pub async fn collection_descendants(
    client: &ZoteroClient,
    key: &str,
) -> ApiResult<Vec<Collection>> {
    let collections = client.fetch_all_collections().await?;
    Ok(collect_descendants(&collections, key)?)
}

/// Owned keys of the subtree rooted at `key`, so per-collection futures borrow nothing
async fn subtree_keys(client: &ZoteroClient, key: &str) -> ApiResult<Vec<String>> {
    let collections = client.fetch_all_collections().await?;
    Ok(descendant_keys(&collections, key)?)
}

/// Items of `key` and all of its sub-collections, concatenated in traversal order
pub async fn items_in_collection(
    client: &ZoteroClient,
    key: &str,
    concurrency: usize,
) -> ApiResult<Vec<serde_json::Value>> {
    let keys = subtree_keys(client, key).await?;
    log::info!("Fetching items for {} collection(s) under {}", keys.len(), key);

    let batches: Vec<Vec<serde_json::Value>> = stream::iter(keys)
        .map(move |collection_key| async move { client.fetch_items(&collection_key).await })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    Ok(batches.into_iter().flatten().collect())
}

/// Biblatex text of `key` and all of its sub-collections, one block per collection
pub async fn bib_in_collection(
    client: &ZoteroClient,
    key: &str,
    concurrency: usize,
) -> ApiResult<String> {
    let keys = subtree_keys(client, key).await?;
    log::info!(
        "Fetching bibliography for {} collection(s) under {}",
        keys.len(),
        key
    );

    let blocks: Vec<String> = stream::iter(keys)
        .map(move |collection_key| async move { client.fetch_bib(&collection_key).await })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    Ok(join_bib(&blocks))
}
