//! Asset manifest: the portable description of an asset's key, segment
//! order, and candidate mirrors.
//!
//! The wire form is a flat `{kind, tags, content}` record so the publishing
//! layer can sign and relay it unchanged. Tag order carries meaning:
//! `segment-ref` tags are in playback order and `mirror` tags in probe
//! priority order.

mod codec;
mod types;

pub use codec::{decode_manifest, DecodedManifest};
pub use types::{Manifest, Tag, KEY_TAG, MIRROR_TAG, SEGMENT_REF_TAG};
