use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Query string parameters, looked up by snake_case name with a camelCase
/// fallback so `user_id` also matches `userId`.
#[derive(Debug, Default)]
pub struct QueryParams {
    map: HashMap<String, String>,
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(QueryParams { map })
    }
}

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(val) = self.map.get(key) {
            return Some(val);
        }
        if key.contains('_') {
            return self.map.get(&camel_case(key)).map(|x| x.as_str());
        }
        None
    }

    /// Parse a signed integer parameter. `Ok(None)` when absent, `Err` with
    /// the raw value when it is present but not a number.
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, String> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<i64>().map(Some).map_err(|_| raw.to_string()),
        }
    }
}

impl From<HashMap<String, String>> for QueryParams {
    fn from(map: HashMap<String, String>) -> Self {
        QueryParams { map }
    }
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
            .into()
    }

    #[test]
    fn test_camel_case_fallback() {
        let p = params(&[("userId", "user1")]);
        assert_eq!(p.get("user_id"), Some("user1"));
        assert_eq!(p.get("count"), None);

        let p = params(&[("user_id", "a"), ("userId", "b")]);
        assert_eq!(p.get("user_id"), Some("a"));
    }

    #[test]
    fn test_get_i64() {
        let p = params(&[("count", " 7 "), ("bad", "seven"), ("neg", "-2")]);
        assert_eq!(p.get_i64("count"), Ok(Some(7)));
        assert_eq!(p.get_i64("neg"), Ok(Some(-2)));
        assert_eq!(p.get_i64("missing"), Ok(None));
        assert_eq!(p.get_i64("bad"), Err("seven".to_string()));
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("user_id"), "userId");
        assert_eq!(camel_case("max_item_count"), "maxItemCount");
        assert_eq!(camel_case("count"), "count");
    }
}
