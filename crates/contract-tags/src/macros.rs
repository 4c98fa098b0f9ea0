/// Builds a `serde_json::Map` from `key => value` pairs, converting every
/// value with `serde_json::json!`.
macro_rules! json_map {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = ::serde_json::Map::<String, ::serde_json::Value>::new();
        $(
            map.insert(($key).to_string(), ::serde_json::json!($value));
        )*
        map
    }};
}
