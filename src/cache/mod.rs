//! 对象缓存
//!
//! 缓存后端以插件形式注册到 [`register`] 中的全局表，启动时按 `cache.type` 选择。
//! 目前只用于认证层缓存 token 对应的用户。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端异常，调用方按未命中处理
    Error(String),
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 声明缓存插件，进程启动时自动注册
///
/// `$ty` 需要提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ident) => {
        ::paste::paste! {
            #[::ctor::ctor]
            unsafe fn [<__register_object_cache_ $ty:snake>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    ::std::sync::Arc::new(|| {
                        ::std::boxed::Box::pin(async {
                            let built: $crate::errors::Result<
                                ::std::boxed::Box<dyn $crate::cache::ObjectCache>,
                            > = $ty::new()
                                .map(|cache| {
                                    ::std::boxed::Box::new(cache)
                                        as ::std::boxed::Box<dyn $crate::cache::ObjectCache>
                                })
                                .map_err($crate::errors::AcademyError::cache_connection);
                            built
                        }) as $crate::cache::register::BoxedObjectCacheFuture
                    }),
                );
            }
        }
    };
}
