//! Cookie 封装模块
//!
//! 会话 token 存放在 `document.cookie`。解析与格式化是纯函数，
//! 浏览器读写集中在 [`CookieJar`]。

use wasm_bindgen::JsCast;

/// 从 cookie 头字符串中取出指定名称的值
///
/// `document.cookie` 的格式为 `a=1; b=2`；值本身不做解码，
/// token 是不需要编码的不透明字符串。
pub fn parse(header: &str, name: &str) -> Option<String> {
    for pair in header.split(';') {
        let pair = pair.trim();
        if let Some((key, value)) = pair.split_once('=') {
            if key == name {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// 生成写入 `document.cookie` 的赋值串
///
/// `max_age` 为 0 时表示立即过期（删除）。
pub fn format_set(name: &str, value: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Strict",
        name, value, max_age_secs
    )
}

/// 浏览器 Cookie 访问
pub struct CookieJar;

impl CookieJar {
    fn document() -> Option<web_sys::HtmlDocument> {
        web_sys::window()?
            .document()?
            .dyn_into::<web_sys::HtmlDocument>()
            .ok()
    }

    /// 读取指定名称的 cookie
    pub fn get(name: &str) -> Option<String> {
        let header = Self::document()?.cookie().ok()?;
        parse(&header, name)
    }

    /// 写入 cookie
    pub fn set(name: &str, value: &str, max_age_secs: i64) -> bool {
        Self::document()
            .and_then(|d| d.set_cookie(&format_set(name, value, max_age_secs)).ok())
            .is_some()
    }

    /// 删除 cookie（写入 Max-Age=0）
    pub fn clear(name: &str) -> bool {
        Self::set(name, "", 0)
    }
}
