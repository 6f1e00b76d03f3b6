use serde::{Deserialize, Serialize};

/// Connection descriptor for one audio node, in the shape the discovery
/// endpoint returns with `format=shoukaku`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub name: String,
    pub url: String,
    pub auth: String,
    #[serde(default)]
    pub secure: bool,
}

/// Track metadata carried by audio-node player events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    pub encoded: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub uri: Option<String>,
    pub length: u64,
    #[serde(default)]
    pub is_stream: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_without_secure_defaults_to_false() {
        let raw = r#"{"name":"main","url":"lava.example.org:2333","auth":"youshallnotpass"}"#;
        let node: NodeDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(node.name, "main");
        assert!(!node.secure);
    }
}
