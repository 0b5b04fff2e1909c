use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use metrics_util::debugging::DebuggingRecorder;
use partialcache::cache::{CacheStore, MemoryStore, TaggedMemoryStore, Tags};
use partialcache::{CacheConfig, CacheFacade, CacheRequest, ViewData, ViewRegistry};

#[test]
fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let mut registry = ViewRegistry::new();
    registry.register("home.index", |_: &ViewData| Ok("<main></main>".to_string()));
    let registry = Arc::new(registry);

    // Tagged lookups: miss, hit, forget, flush
    let tagged = CacheFacade::new(
        registry.clone(),
        Arc::new(TaggedMemoryStore::default()),
        CacheConfig::default(),
    );
    tagged
        .cache(CacheRequest::new("home.index").tags("homepage"))
        .expect("miss renders");
    tagged
        .cache(CacheRequest::new("home.index").tags("homepage"))
        .expect("hit");
    tagged
        .forget("home.index", None, "homepage")
        .expect("forget");
    tagged.flush(Some("homepage")).expect("flush");

    // Plain lookups with capacity pressure
    let plain_store = Arc::new(MemoryStore::new(
        NonZeroUsize::new(1).expect("non-zero capacity"),
    ));
    let plain = CacheFacade::new(
        registry.clone(),
        plain_store as Arc<dyn CacheStore>,
        CacheConfig::default(),
    );
    plain
        .cache(CacheRequest::new("home.index").key("a"))
        .expect("renders");
    plain
        .cache(CacheRequest::new("home.index").key("b"))
        .expect("renders and evicts");

    // Disabled facade bypasses the store
    let disabled = CacheFacade::new(
        registry,
        Arc::new(MemoryStore::default()),
        CacheConfig {
            enabled: false,
            ..Default::default()
        },
    );
    disabled
        .cache(CacheRequest::new("home.index"))
        .expect("renders directly");
    disabled
        .forget("home.index", None, Tags::none())
        .expect("forget");

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "partialcache_bypass_total",
        "partialcache_render_total",
        "partialcache_lookup_total",
        "partialcache_forget_total",
        "partialcache_flush_total",
        "partialcache_store_hit_total",
        "partialcache_store_miss_total",
        "partialcache_store_evict_total",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
