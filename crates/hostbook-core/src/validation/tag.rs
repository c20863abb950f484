//! Display tags
//!
//! A `DisplayTag` is the typed projection of a profile's validation setting
//! and cached status. It is rendered to the suffix grammar
//! (`_validate=true`, `_validate=false`, `_Active`, `_Inactive`,
//! `_Unverified`) only where a UI needs a string.

use serde::{Deserialize, Serialize};

use super::status::ValidationStatus;

const VALIDATE_TRUE: &str = "_validate=true";
const VALIDATE_FALSE: &str = "_validate=false";
const ACTIVE: &str = "_Active";
const INACTIVE: &str = "_Inactive";
const UNVERIFIED: &str = "_Unverified";

/// Whether live validation is allowed for a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidateToggle {
    #[default]
    Enabled,
    Disabled,
}

impl ValidateToggle {
    #[must_use]
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

/// Validation state attached to a UI-facing profile reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DisplayTag {
    pub toggle: ValidateToggle,
    pub status: Option<ValidationStatus>,
}

impl DisplayTag {
    /// Project a setting and an optional cached status
    #[must_use]
    pub fn project(enabled: bool, status: Option<ValidationStatus>) -> Self {
        Self {
            toggle: ValidateToggle::from_enabled(enabled),
            status,
        }
        .normalized()
    }

    /// Tag with validation enabled. Moving from disabled clears the
    /// `Unverified` marker; an enabled tag is returned as is.
    #[must_use]
    pub fn enable(self) -> Self {
        if self.is_enabled() {
            return self;
        }
        Self {
            toggle: ValidateToggle::Enabled,
            status: self
                .status
                .filter(|s| *s != ValidationStatus::Unverified),
        }
    }

    /// Tag with validation disabled; `Active`/`Inactive` markers are cleared
    #[must_use]
    pub fn disable(self) -> Self {
        Self {
            toggle: ValidateToggle::Disabled,
            status: self.status.filter(|s| *s == ValidationStatus::Unverified),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.toggle == ValidateToggle::Enabled
    }

    // A disabled profile can only ever display as unverified
    fn normalized(self) -> Self {
        match self.toggle {
            ValidateToggle::Enabled => self,
            ValidateToggle::Disabled => self.disable(),
        }
    }

    /// Render the suffix string
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from(match self.toggle {
            ValidateToggle::Enabled => VALIDATE_TRUE,
            ValidateToggle::Disabled => VALIDATE_FALSE,
        });
        match self.status {
            Some(ValidationStatus::Active) => out.push_str(ACTIVE),
            Some(ValidationStatus::Inactive) => out.push_str(INACTIVE),
            Some(ValidationStatus::Unverified) => out.push_str(UNVERIFIED),
            None => {}
        }
        out
    }

    /// Replace any tag markers in `context` with this tag
    #[must_use]
    pub fn apply_to(&self, context: &str) -> String {
        let (base, _) = Self::parse(context);
        format!("{base}{}", self.render())
    }

    /// Split a context string into its untagged base and the tag it carries.
    ///
    /// A string without a `_validate=` marker parses as enabled.
    #[must_use]
    pub fn parse(context: &str) -> (String, Self) {
        let toggle = if context.contains(VALIDATE_FALSE) {
            ValidateToggle::Disabled
        } else {
            ValidateToggle::Enabled
        };
        let status = if context.contains(ACTIVE) {
            Some(ValidationStatus::Active)
        } else if context.contains(INACTIVE) {
            Some(ValidationStatus::Inactive)
        } else if context.contains(UNVERIFIED) {
            Some(ValidationStatus::Unverified)
        } else {
            None
        };

        let mut base = context.to_string();
        for marker in [VALIDATE_TRUE, VALIDATE_FALSE, ACTIVE, INACTIVE, UNVERIFIED] {
            base = base.replace(marker, "");
        }
        (base, Self { toggle, status })
    }
}

/// A UI-facing reference to a profile carrying its display tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRef {
    pub name: String,
    pub tag: DisplayTag,
}

impl ProfileRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: DisplayTag::default(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: DisplayTag) -> Self {
        self.tag = tag;
        self
    }

    /// Context string for a UI, e.g. `session_validate=true_Active`
    #[must_use]
    pub fn context_value(&self, base: &str) -> String {
        self.tag.apply_to(base)
    }
}
