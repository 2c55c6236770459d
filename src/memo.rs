use crate::cache::{CacheManager, SetOptions};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::future::Future;

/// Derives the default cache key for a memoized call: the function name
/// plus a crc32 of the JSON form of the arguments. Arguments that cannot
/// serialize share one degraded key per name, so such calls still work but
/// collide; pass an explicit key function to avoid that.
pub fn memo_key<A: Serialize>(name: &str, args: &A) -> String {
    match serde_json::to_vec(args) {
        Ok(bytes) => format!("{name}:{:08x}", crc32fast::hash(&bytes)),
        Err(e) => {
            log::warn!("memo key for {name} fell back to unhashed, serialization failed: {e}");
            format!("{name}:unhashed")
        }
    }
}

type KeyFn<A> = Box<dyn Fn(&A) -> String + Send + Sync>;

/// An async function wrapped with cache-backed results. Built by
/// [`CacheManager::memoize`] and friends; call it through [`Memoized::call`].
pub struct Memoized<T, A, F> {
    cache: CacheManager<T>,
    name: String,
    options: SetOptions,
    key_fn: Option<KeyFn<A>>,
    func: F,
}

impl<T, A, F> Memoized<T, A, F>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    A: Serialize,
{
    /// Runs the wrapped function through the cache. A cached value short-
    /// circuits the call; a computed success is stored under the derived
    /// key; an error is logged and returned unchanged, never cached, so the
    /// next call retries.
    pub async fn call<Fut, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let key = match &self.key_fn {
            Some(key_fn) => key_fn(&args),
            None => memo_key(&self.name, &args),
        };
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        match (self.func)(args).await {
            Ok(value) => {
                self.cache.set(&key, value.clone(), &self.options);
                Ok(value)
            }
            Err(e) => {
                log::warn!("memoized {} failed for {key}: {e}", self.name);
                Err(e)
            }
        }
    }
}

impl<T> CacheManager<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Wraps an async function so results are cached by argument. Keys are
    /// derived with [`memo_key`]; values are stored with default options.
    pub fn memoize<A, F>(&self, name: impl Into<String>, func: F) -> Memoized<T, A, F> {
        Memoized {
            cache: self.clone(),
            name: name.into(),
            options: SetOptions::default(),
            key_fn: None,
            func,
        }
    }

    /// [`CacheManager::memoize`] with an explicit key function and set
    /// options.
    pub fn memoize_with<A, F>(
        &self,
        name: impl Into<String>,
        key_fn: impl Fn(&A) -> String + Send + Sync + 'static,
        options: SetOptions,
        func: F,
    ) -> Memoized<T, A, F> {
        Memoized {
            cache: self.clone(),
            name: name.into(),
            options,
            key_fn: Some(Box::new(key_fn)),
            func,
        }
    }

    /// Wraps a remote call: keys get an `api:` prefix and successes are
    /// tagged `api` unless the options already carry tags, so a whole API
    /// surface can be dropped with one tag clear.
    pub fn wrap_api_call<A, F>(
        &self,
        name: impl Into<String>,
        key_fn: impl Fn(&A) -> String + Send + Sync + 'static,
        mut options: SetOptions,
        func: F,
    ) -> Memoized<T, A, F> {
        if options.tags.is_empty() {
            options.tags = vec!["api".to_string()];
        }
        Memoized {
            cache: self.clone(),
            name: name.into(),
            options,
            key_fn: Some(Box::new(move |args: &A| format!("api:{}", key_fn(args)))),
            func,
        }
    }
}
