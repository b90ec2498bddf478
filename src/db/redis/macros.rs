/// Serves a value from the result cache, computing and storing it on a miss.
///
/// `$cache` is an `Option<&Cache>`; with `None` the block is simply awaited.
/// A failing cache read is logged and treated as a miss, so Redis outages
/// only cost latency. The computed value is written in the background.
///
/// The enclosing function must return `AppResult`.
///
/// # Example
/// ```rust,ignore
/// let ranked: Vec<ScoredContent> = cached!(state.cache.as_ref(), key, state.cache_ttl, async {
///     state.engine.trending(count).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache {
            Some(cache) => {
                let key = $key;
                match cache.get_from_cache(&key).await {
                    Ok(Some(hit)) => {
                        tracing::debug!(key = %key, "Cache hit");
                        Ok(hit)
                    }
                    lookup => {
                        if let Err(e) = lookup {
                            tracing::warn!(error = %e, key = %key, "Cache read failed, computing");
                        }
                        let value = $block.await?;
                        cache.set_in_background(&key, &value, $ttl);
                        Ok(value)
                    }
                }
            }
            None => $block.await,
        }
    }};
}
