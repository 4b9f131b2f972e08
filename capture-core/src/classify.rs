//! Object classification: design content, background art, or excluded.

use serde::{Deserialize, Serialize};

use crate::object::{CanvasObject, ObjectRole};

/// What a canvas object is, for capture purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// User design content; serialized.
    Design,
    /// Template or mockup art; skipped.
    Background,
    /// Hidden, non-exportable or internal; skipped.
    Excluded,
}

impl Classification {
    /// Whether objects of this class end up in the payload.
    #[must_use]
    pub const fn is_design(self) -> bool {
        matches!(self, Self::Design)
    }

    /// Lowercase name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Design => "design",
            Self::Background => "background",
            Self::Excluded => "excluded",
        }
    }
}

/// Classify a single object from its own flags.
///
/// Rules, first match wins:
///
/// 1. hidden (`visible == false`) → [`Classification::Excluded`]
/// 2. `excludeFromExport` or an explicit system role → [`Classification::Excluded`]
/// 3. `isViewImage`, `isTemplateBackground`, `isBackground` or an explicit
///    background role → [`Classification::Background`]
/// 4. anything else → [`Classification::Design`]
#[must_use]
pub fn classify(obj: &CanvasObject) -> Classification {
    if obj.visible == Some(false) {
        return Classification::Excluded;
    }
    if obj.exclude_from_export == Some(true) || obj.role == Some(ObjectRole::System) {
        return Classification::Excluded;
    }
    let flagged = [obj.is_view_image, obj.is_template_background, obj.is_background]
        .contains(&Some(true));
    if flagged || obj.role == Some(ObjectRole::Background) {
        return Classification::Background;
    }
    Classification::Design
}
