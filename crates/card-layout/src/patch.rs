//! Partial document updates.
//!
//! Edits are modeled as an explicit reducer: the current snapshot plus a
//! typed patch (one optional value per top-level section) produce a new
//! snapshot. Merging is shallow — a present section replaces the stored one
//! wholesale, an absent section is untouched.

use crate::model::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DocumentPatch {
    pub page: Option<PageConfig>,
    pub bleed: Option<MarginConfig>,
    pub safe: Option<MarginConfig>,
    pub overlays: Option<OverlaysConfig>,
    pub base_image: Option<BackgroundConfig>,
    pub code: Option<CodeConfig>,
    pub label: Option<LabelConfig>,
}

impl DocumentModel {
    /// Apply a partial update, returning a new snapshot. The receiver is
    /// never mutated.
    pub fn with_patch(&self, patch: DocumentPatch) -> DocumentModel {
        DocumentModel {
            page: patch.page.unwrap_or_else(|| self.page.clone()),
            bleed: patch.bleed.unwrap_or(self.bleed),
            safe: patch.safe.unwrap_or(self.safe),
            overlays: patch.overlays.unwrap_or(self.overlays),
            base_image: patch.base_image.unwrap_or_else(|| self.base_image.clone()),
            code: patch.code.unwrap_or_else(|| self.code.clone()),
            label: patch.label.unwrap_or_else(|| self.label.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Anchor;

    #[test]
    fn test_empty_patch_is_identity() {
        let doc = DocumentModel::with_defaults();
        let next = doc.with_patch(DocumentPatch::default());
        assert_eq!(doc, next);
    }

    #[test]
    fn test_patch_replaces_one_section() {
        let doc = DocumentModel::with_defaults();
        let mut code = doc.code.clone();
        code.canvas_anchor = Anchor::Br;
        code.offset_x_pts = -10.0;

        let next = doc.with_patch(DocumentPatch {
            code: Some(code.clone()),
            ..Default::default()
        });

        assert_eq!(next.code, code);
        assert_eq!(next.page, doc.page);
        assert_eq!(next.label, doc.label);
        // original snapshot untouched
        assert_eq!(doc.code.canvas_anchor, Anchor::Center);
    }

    #[test]
    fn test_patch_merge_is_shallow() {
        let doc = DocumentModel::with_defaults();
        // A patched section carries all of its fields; absent fields do not
        // survive from the old section.
        let bleed = MarginConfig::uniform(2.0);
        let next = doc.with_patch(DocumentPatch {
            bleed: Some(bleed),
            ..Default::default()
        });
        assert_eq!(next.bleed, bleed);
        assert_eq!(next.safe, doc.safe);
    }
}
