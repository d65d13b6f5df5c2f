//! LocalStorage 封装模块
//!
//! 直接封装 `web_sys::Storage`，提供简洁的本地存储接口。
//! Store 的写穿缓存通过 [`StateCache`] 抽象注入，
//! 测试里替换为内存 Mock。

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 获取存储的字符串值
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值，返回是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除存储的键值对，返回是否成功
    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

// =========================================================
// 抽象接口：StateCache
// =========================================================

/// Store 状态的写穿缓存
///
/// 失败（隐私模式、配额）不视为错误：缓存只用于加速首屏，
/// 权威数据始终来自后端。
pub trait StateCache {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// 生产实现：浏览器 LocalStorage
#[derive(Clone, Copy, Default)]
pub struct BrowserCache;

impl StateCache for BrowserCache {
    fn read(&self, key: &str) -> Option<String> {
        LocalStorage::get(key)
    }

    fn write(&self, key: &str, value: &str) -> bool {
        LocalStorage::set(key, value)
    }

    fn remove(&self, key: &str) -> bool {
        LocalStorage::delete(key)
    }
}

// =========================================================
// 测试工具: MockCache
// =========================================================

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// 内存版缓存，记录全部写入
    #[derive(Default)]
    pub struct MockCache {
        pub map: RefCell<HashMap<String, String>>,
    }

    impl MockCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, key: &str, value: &str) -> Self {
            self.map.borrow_mut().insert(key.into(), value.into());
            self
        }
    }

    impl StateCache for MockCache {
        fn read(&self, key: &str) -> Option<String> {
            self.map.borrow().get(key).cloned()
        }

        fn write(&self, key: &str, value: &str) -> bool {
            self.map.borrow_mut().insert(key.into(), value.into());
            true
        }

        fn remove(&self, key: &str) -> bool {
            self.map.borrow_mut().remove(key).is_some()
        }
    }

    #[test]
    fn test_mock_cache_roundtrip() {
        let cache = MockCache::new();
        assert!(cache.read("k").is_none());
        assert!(cache.write("k", "v"));
        assert_eq!(cache.read("k").as_deref(), Some("v"));
        assert!(cache.remove("k"));
        assert!(cache.read("k").is_none());
    }
}
