//! Auxiliary documents shown in read-only panels.
//!
//! Each panel starts as `Loading` and is filled when its fetch resolves. Fetches run
//! concurrently, unordered, without timeout or retry; a failed fetch leaves the panel as
//! it was.

use futures_util::future::join_all;
use std::collections::BTreeMap;

use crate::error::CacheResult;
use crate::offline_cache::CachedResponse;
use crate::policy;

/// Panel slot and asset path of every auxiliary document.
pub const AUX_DOCUMENTS: [(&str, &str); 3] = [
    ("doc_hc", "./data/HEART_CORE_v3_1.md"),
    ("doc_fl", "./data/HEART_CORE_FreeLayer_v1.md"),
    ("doc_ritual", "./data/SevenDay_Cahetel_Ritual.md"),
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocPanel {
    #[default]
    Loading,
    Ready(String),
}

/// All auxiliary panels by slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBoard {
    panels: BTreeMap<&'static str, DocPanel>,
}

impl Default for DocBoard {
    fn default() -> Self {
        Self {
            panels: AUX_DOCUMENTS
                .iter()
                .map(|(slot, _)| (*slot, DocPanel::Loading))
                .collect(),
        }
    }
}

impl DocBoard {
    pub fn panel(&self, slot: &str) -> Option<&DocPanel> {
        self.panels.get(slot)
    }

    /// Applies one fetch outcome. Failures and non-2xx answers leave the panel untouched.
    pub fn apply(&mut self, slot: &str, outcome: CacheResult<CachedResponse>) {
        let Some(panel) = self.panels.get_mut(slot) else {
            return;
        };
        match outcome {
            Ok(res) if res.is_ok() => {
                *panel = DocPanel::Ready(String::from_utf8_lossy(&res.body).into_owned());
            }
            Ok(res) => tracing::debug!(
                target: "mindcopy::docs",
                slot,
                status = res.status,
                policy = %policy::AUX_DOC_FETCH,
                "document not available"
            ),
            Err(e) => tracing::debug!(
                target: "mindcopy::docs",
                slot,
                error = %e,
                policy = %policy::AUX_DOC_FETCH,
                "document fetch failed"
            ),
        }
    }

    /// Fetches every document concurrently through `fetch` and applies the results.
    pub async fn load_all<F, Fut>(&mut self, fetch: F)
    where
        F: Fn(&'static str) -> Fut,
        Fut: std::future::Future<Output = CacheResult<CachedResponse>>,
    {
        let pending = AUX_DOCUMENTS.into_iter().map(|(slot, path)| {
            let fut = fetch(path);
            async move { (slot, fut.await) }
        });
        for (slot, outcome) in join_all(pending).await {
            self.apply(slot, outcome);
        }
    }
}
