//! State document: the single persisted entity of the journal.
//!
//! Wire keys follow the stored format (`modes`, `mindprint`, `logs`) so existing exports
//! load unchanged. Defaults are applied per top-level key only; a nested object that is
//! present is taken as-is, with any missing field at its zero value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::MindcopyError;

/// Level assigned to `elinor` on first run.
pub const DEFAULT_LEVEL: i64 = 2;

pub const DEFAULT_NAME: &str = "HeartCore Copy";
pub const DEFAULT_MISSION: &str = "Protect life, seek truth, reduce harm.";
pub const DEFAULT_VOICE: &str = "Calm, direct, compassionate.";

/// Fixed directives carried by every profile. Not editable from the UI.
pub const DIRECTIVES: [&str; 5] = [
    "Protect life & dignity.",
    "Stay lawful & transparent.",
    "Respect consent & privacy.",
    "Seek truth: {Fact}/{Inference}/{Opinion}.",
    "Serve the mission, not the ego.",
];

/// Session-level behavioral settings: one level and four switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modes {
    pub elinor: i64,
    pub dinya: bool,
    pub kurva: bool,
    pub banitsa: bool,
    /// Composite switch. Turning it on forces `dinya`, `kurva` and `banitsa` on.
    pub godmode: bool,
}

impl Modes {
    pub fn initial() -> Self {
        Self {
            elinor: DEFAULT_LEVEL,
            ..Default::default()
        }
    }

    pub fn flag(&self, flag: ModeFlag) -> bool {
        match flag {
            ModeFlag::Dinya => self.dinya,
            ModeFlag::Kurva => self.kurva,
            ModeFlag::Banitsa => self.banitsa,
            ModeFlag::Godmode => self.godmode,
        }
    }

    fn flag_mut(&mut self, flag: ModeFlag) -> &mut bool {
        match flag {
            ModeFlag::Dinya => &mut self.dinya,
            ModeFlag::Kurva => &mut self.kurva,
            ModeFlag::Banitsa => &mut self.banitsa,
            ModeFlag::Godmode => &mut self.godmode,
        }
    }

    /// Flips `flag`. Enabling `godmode` forces its dependents on; disabling it leaves
    /// them as they are.
    pub fn toggle(&mut self, flag: ModeFlag) -> bool {
        let slot = self.flag_mut(flag);
        *slot = !*slot;
        let now = *slot;
        if flag == ModeFlag::Godmode && now {
            for dependent in ModeFlag::GODMODE_DEPENDENTS {
                *self.flag_mut(dependent) = true;
            }
        }
        now
    }
}

/// Boolean mode fields, addressed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeFlag {
    Dinya,
    Kurva,
    Banitsa,
    Godmode,
}

impl ModeFlag {
    pub const ALL: [ModeFlag; 4] = [
        ModeFlag::Dinya,
        ModeFlag::Kurva,
        ModeFlag::Banitsa,
        ModeFlag::Godmode,
    ];

    pub const GODMODE_DEPENDENTS: [ModeFlag; 3] =
        [ModeFlag::Dinya, ModeFlag::Kurva, ModeFlag::Banitsa];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeFlag::Dinya => "dinya",
            ModeFlag::Kurva => "kurva",
            ModeFlag::Banitsa => "banitsa",
            ModeFlag::Godmode => "godmode",
        }
    }

    /// Badge label shown in the modes panel.
    pub fn label(&self) -> &'static str {
        match self {
            ModeFlag::Dinya => "диня",
            ModeFlag::Kurva => "курва",
            ModeFlag::Banitsa => "баница",
            ModeFlag::Godmode => "godmode",
        }
    }
}

impl fmt::Display for ModeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeFlag {
    type Err = MindcopyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModeFlag::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| MindcopyError::UnknownMode(s.to_string()))
    }
}

/// Symbolic labels attached to the profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Symbols {
    pub center: String,
    pub cahetel: String,
}

/// The "mindprint": who the journal speaks for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub mission: String,
    pub voice: String,
    pub symbols: Symbols,
    pub directives: Vec<String>,
}

impl Profile {
    pub fn initial() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            mission: DEFAULT_MISSION.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            symbols: Symbols {
                center: "◯🔥".to_string(),
                cahetel: "white circle + green-gold flame".to_string(),
            },
            directives: DIRECTIVES.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// Editable part of the profile, as submitted from the profile form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ProfileFields {
    pub name: String,
    pub mission: String,
    pub voice: String,
}

/// Journal entry. Never modified after it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub ts: DateTime<Utc>,
    /// Copy of the modes at creation time.
    #[serde(default)]
    pub modes: Modes,
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub spark: String,
    #[serde(default)]
    pub fact: String,
    #[serde(default)]
    pub step: String,
    #[serde(default)]
    pub guard: String,
}

/// Text fields of the entry form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct EntryFields {
    pub intent: String,
    pub spark: String,
    pub fact: String,
    pub step: String,
    pub guard: String,
}

impl EntryFields {
    pub fn trimmed(&self) -> Self {
        Self {
            intent: self.intent.trim().to_string(),
            spark: self.spark.trim().to_string(),
            fact: self.fact.trim().to_string(),
            step: self.step.trim().to_string(),
            guard: self.guard.trim().to_string(),
        }
    }
}

impl LogEntry {
    pub fn new(ts: DateTime<Utc>, modes: Modes, fields: EntryFields) -> Self {
        let EntryFields {
            intent,
            spark,
            fact,
            step,
            guard,
        } = fields.trimmed();
        Self {
            ts,
            modes,
            intent,
            spark,
            fact,
            step,
            guard,
        }
    }
}

/// Fully populated document held by the controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateDocument {
    pub modes: Modes,
    #[serde(rename = "mindprint")]
    pub profile: Profile,
    #[serde(rename = "logs")]
    pub entries: Vec<LogEntry>,
    /// Top-level keys this version does not know about, kept for round-trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for StateDocument {
    fn default() -> Self {
        RawStateDocument::default().fill_defaults()
    }
}

/// Document as read from storage or an imported file: every top-level key optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawStateDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modes: Option<Modes>,
    #[serde(default, rename = "mindprint", skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(default, rename = "logs", skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<LogEntry>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawStateDocument {
    /// Fills each absent top-level key with its default. Present keys are kept untouched.
    pub fn fill_defaults(self) -> StateDocument {
        StateDocument {
            modes: self.modes.unwrap_or_else(Modes::initial),
            profile: self.profile.unwrap_or_else(Profile::initial),
            entries: self.entries.unwrap_or_default(),
            extra: self.extra,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_none()
            && self.profile.is_none()
            && self.entries.is_none()
            && self.extra.is_empty()
    }
}

impl From<StateDocument> for RawStateDocument {
    fn from(doc: StateDocument) -> Self {
        Self {
            modes: Some(doc.modes),
            profile: Some(doc.profile),
            entries: Some(doc.entries),
            extra: doc.extra,
        }
    }
}
