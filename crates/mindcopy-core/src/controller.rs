//! MindController: owns the state document and is the only place it is mutated.
//!
//! Every handler persists first, then re-renders the region it touched, and only then
//! returns. A failed write returns the error before any region is re-rendered.

use chrono::Utc;

use crate::error::{MindcopyError, MindcopyResult};
use crate::policy;
use crate::render::{render_entries, render_entry_form, render_modes, render_profile};
use crate::state::{EntryFields, LogEntry, ModeFlag, ProfileFields, StateDocument};
use crate::store::StateStore;
use crate::transfer::{export_document, parse_import, ExportFile, DEFAULT_EXPORT_FILE_NAME};

/// Rendered page regions, each replaced wholesale on re-render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRegions {
    pub modes: String,
    pub profile: String,
    pub entries: String,
    pub entry_form: String,
}

/// Region identifiers, used when a caller needs one region back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Modes,
    Profile,
    Entries,
    EntryForm,
}

pub struct MindController {
    store: StateStore,
    doc: StateDocument,
    view: ViewRegions,
    export_file_name: String,
}

impl MindController {
    /// Boot: load the slot, fill defaults, paint every region.
    pub fn boot(store: StateStore) -> Self {
        let mut controller = Self {
            doc: StateDocument::default(),
            store,
            view: ViewRegions::default(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        };
        controller.reload();
        tracing::info!(
            target: "mindcopy::controller",
            key = controller.store.key(),
            entries = controller.doc.entries.len(),
            "state loaded"
        );
        controller
    }

    pub fn with_export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }

    pub fn document(&self) -> &StateDocument {
        &self.doc
    }

    pub fn view(&self) -> &ViewRegions {
        &self.view
    }

    pub fn region(&self, region: Region) -> &str {
        match region {
            Region::Modes => &self.view.modes,
            Region::Profile => &self.view.profile,
            Region::Entries => &self.view.entries,
            Region::EntryForm => &self.view.entry_form,
        }
    }

    /// Equivalent to a restart: reload from the slot and repaint everything.
    pub fn reload(&mut self) {
        self.doc = self.store.load_filled();
        self.repaint(Region::Modes);
        self.repaint(Region::Profile);
        self.repaint(Region::Entries);
        self.repaint(Region::EntryForm);
    }

    fn repaint(&mut self, region: Region) {
        match region {
            Region::Modes => self.view.modes = render_modes(&self.doc),
            Region::Profile => self.view.profile = render_profile(&self.doc),
            Region::Entries => self.view.entries = render_entries(&self.doc),
            Region::EntryForm => self.view.entry_form = render_entry_form(&EntryFields::default()),
        }
    }

    fn persist(&self) -> MindcopyResult<()> {
        self.store.save(&self.doc).inspect_err(|e| {
            tracing::error!(
                target: "mindcopy::store",
                error = %e,
                policy = %policy::STATE_WRITE,
                "state write failed"
            );
        })
    }

    pub fn set_level(&mut self, value: i64) -> MindcopyResult<()> {
        self.doc.modes.elinor = value;
        self.persist()?;
        self.repaint(Region::Modes);
        Ok(())
    }

    /// Flips a switch. Returns the new value.
    pub fn toggle_flag(&mut self, flag: ModeFlag) -> MindcopyResult<bool> {
        let now = self.doc.modes.toggle(flag);
        self.persist()?;
        self.repaint(Region::Modes);
        tracing::info!(target: "mindcopy::controller", flag = %flag, on = now, "mode toggled");
        Ok(now)
    }

    pub fn update_profile(&mut self, fields: ProfileFields) -> MindcopyResult<()> {
        let profile = &mut self.doc.profile;
        profile.name = fields.name.trim().to_string();
        profile.mission = fields.mission.trim().to_string();
        profile.voice = fields.voice.trim().to_string();
        self.persist()?;
        self.repaint(Region::Profile);
        Ok(())
    }

    /// Prepends a new entry carrying a copy of the current modes, then clears the form.
    pub fn append_entry(&mut self, fields: EntryFields) -> MindcopyResult<&LogEntry> {
        let entry = LogEntry::new(Utc::now(), self.doc.modes, fields);
        self.doc.entries.insert(0, entry);
        self.persist()?;
        self.repaint(Region::Entries);
        self.repaint(Region::EntryForm);
        tracing::info!(
            target: "mindcopy::controller",
            total = self.doc.entries.len(),
            "entry appended"
        );
        Ok(&self.doc.entries[0])
    }

    pub fn export(&self) -> MindcopyResult<ExportFile> {
        export_document(&self.doc, &self.export_file_name)
    }

    /// Replaces the whole document with the file contents, or leaves state untouched
    /// and returns `ImportRejected`.
    pub fn import_document(&mut self, contents: &str) -> MindcopyResult<()> {
        let raw = parse_import(contents).inspect_err(|e| {
            tracing::warn!(
                target: "mindcopy::controller",
                error = %e,
                policy = %policy::IMPORT_PARSE,
                "import rejected"
            );
        })?;
        self.store.save_raw(&raw)?;
        self.reload();
        tracing::info!(
            target: "mindcopy::controller",
            entries = self.doc.entries.len(),
            "document imported"
        );
        Ok(())
    }

    /// Upload form of `import_document`: bytes that are not UTF-8 get the same rejection.
    pub fn import_bytes(&mut self, contents: &[u8]) -> MindcopyResult<()> {
        match std::str::from_utf8(contents) {
            Ok(text) => self.import_document(text),
            Err(e) => {
                let err = MindcopyError::import_rejected(e);
                tracing::warn!(
                    target: "mindcopy::controller",
                    error = %err,
                    policy = %policy::IMPORT_PARSE,
                    "import rejected"
                );
                Err(err)
            }
        }
    }
}
