use std::borrow::Cow;

/// A named cache key family. Implementations are generated by the
/// [`cache_key!`](crate::cache_key) macro; `Args` carries the identifiers
/// interpolated into the key string.
pub trait CacheKey {
    type Args<'r>;

    fn get_key_with_args(&self, args: Self::Args<'_>) -> Cow<'static, str>;

    #[allow(unused)]
    fn get_key(&self) -> Cow<'static, str>
    where
        for<'r> Self::Args<'r>: CacheKeyAutoConstruct,
    {
        CacheKey::get_key_with_args(self, CacheKeyAutoConstruct::construct())
    }
}

pub trait CacheKeyAutoConstruct {
    fn construct() -> Self;
}

impl CacheKeyAutoConstruct for () {
    fn construct() -> Self {}
}
