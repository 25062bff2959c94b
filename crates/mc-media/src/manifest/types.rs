//! Manifest tag model and its JSON wire form.

use mc_core::config::DEFAULT_MANIFEST_KIND;
use mc_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tag name for a segment content hash.
pub const SEGMENT_REF_TAG: &str = "segment-ref";
/// Tag name for a mirror base URL.
pub const MIRROR_TAG: &str = "mirror";
/// Tag name for the base64 content key.
pub const KEY_TAG: &str = "key";

// Names written by the first publisher generation; still accepted on decode.
const LEGACY_SEGMENT_REF_TAG: &str = "x";
const LEGACY_MIRROR_TAG: &str = "url";
const LEGACY_KEY_TAG: &str = "aes_key";

/// One typed entry of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// Hex content hash of one segment. Order among these is playback order.
    SegmentRef(String),
    /// Base URL of a mirror. Order among these is probe priority.
    Mirror(String),
    /// Base64 AES-128 key.
    Key(String),
    /// Any tag this system does not interpret, kept verbatim.
    Other(Vec<String>),
}

impl Tag {
    fn from_wire(raw: Vec<String>) -> Self {
        let (Some(name), Some(value)) = (raw.first(), raw.get(1)) else {
            return Tag::Other(raw);
        };
        match name.as_str() {
            SEGMENT_REF_TAG | LEGACY_SEGMENT_REF_TAG => Tag::SegmentRef(value.clone()),
            MIRROR_TAG | LEGACY_MIRROR_TAG => Tag::Mirror(value.clone()),
            KEY_TAG | LEGACY_KEY_TAG => Tag::Key(value.clone()),
            _ => Tag::Other(raw),
        }
    }

    fn to_wire(&self) -> Vec<String> {
        match self {
            Tag::SegmentRef(v) => vec![SEGMENT_REF_TAG.to_string(), v.clone()],
            Tag::Mirror(v) => vec![MIRROR_TAG.to_string(), v.clone()],
            Tag::Key(v) => vec![KEY_TAG.to_string(), v.clone()],
            Tag::Other(raw) => raw.clone(),
        }
    }
}

/// JSON shape shared with the publishing layer.
#[derive(Debug, Serialize, Deserialize)]
struct WireManifest {
    kind: u64,
    tags: Vec<Vec<String>>,
    #[serde(default)]
    content: String,
}

/// A portable, server-agnostic asset description: a discriminator plus a
/// flat, ordered list of tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub kind: u64,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            kind: DEFAULT_MANIFEST_KIND,
            tags: Vec::new(),
            content: String::new(),
        }
    }
}

impl Manifest {
    /// Parse the JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedManifest`] if `raw` is not a JSON object with
    /// an unsigned integer `kind` and a `tags` array of string arrays.
    pub fn from_json(raw: &str) -> Result<Self> {
        let wire: WireManifest =
            serde_json::from_str(raw).map_err(|e| Error::MalformedManifest(e.to_string()))?;
        Ok(Self {
            kind: wire.kind,
            tags: wire.tags.into_iter().map(Tag::from_wire).collect(),
            content: wire.content,
        })
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> String {
        // A struct of integers and strings always serializes.
        serde_json::to_string(&self.to_wire()).unwrap_or_default()
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.to_wire()).unwrap_or_default()
    }

    fn to_wire(&self) -> WireManifest {
        WireManifest {
            kind: self.kind,
            tags: self.tags.iter().map(Tag::to_wire).collect(),
            content: self.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_tag_names_are_recognized() {
        let raw = r#"{"kind":1663,"tags":[["x","h1"],["url","http://a"],["aes_key","k"]],"content":""}"#;
        let manifest = Manifest::from_json(raw).unwrap();
        assert_eq!(
            manifest.tags,
            vec![
                Tag::SegmentRef("h1".into()),
                Tag::Mirror("http://a".into()),
                Tag::Key("k".into()),
            ]
        );
    }

    #[test]
    fn unknown_and_short_tags_are_kept_verbatim() {
        let raw = r#"{"kind":1663,"tags":[["alt","a video"],["mirror"]]}"#;
        let manifest = Manifest::from_json(raw).unwrap();
        assert_eq!(
            manifest.tags,
            vec![
                Tag::Other(vec!["alt".into(), "a video".into()]),
                Tag::Other(vec!["mirror".into()]),
            ]
        );
        assert_eq!(manifest.content, "");
        assert!(manifest.to_json().contains(r#"["alt","a video"]"#));
    }

    #[test]
    fn extra_tag_elements_are_ignored() {
        let raw = r#"{"kind":1663,"tags":[["mirror","http://a","relay-hint"]]}"#;
        let manifest = Manifest::from_json(raw).unwrap();
        assert_eq!(manifest.tags, vec![Tag::Mirror("http://a".into())]);
    }

    #[test]
    fn non_object_input_is_malformed() {
        for raw in ["", "[]", "not json", r#"{"tags":[]}"#, r#"{"kind":"x","tags":[]}"#] {
            let err = Manifest::from_json(raw).unwrap_err();
            assert!(matches!(err, Error::MalformedManifest(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn writes_current_tag_names() {
        let manifest = Manifest {
            tags: vec![
                Tag::SegmentRef("h1".into()),
                Tag::Mirror("http://a".into()),
                Tag::Key("k".into()),
            ],
            ..Manifest::default()
        };
        assert_eq!(
            manifest.to_json(),
            r#"{"kind":1663,"tags":[["segment-ref","h1"],["mirror","http://a"],["key","k"]],"content":""}"#
        );
    }
}
