// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Conversion from a PO catalog to a Wordfast TM document.

use crate::wordfast::{wf_timestamp, WordfastTm};
use anyhow::Context as _;
use polib::catalog::Catalog;
use polib::message::MessageView;
use std::fs;
use std::path::{Path, PathBuf};

/// What a PO message contributes to the TM, decided once per message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UnitClass {
    /// The catalog header pseudo-message (empty msgid, non-empty msgstr).
    Header,
    /// An entirely empty message.
    Blank,
    /// Untranslated or fuzzy. Fuzzy translations are guesses, so they do
    /// not qualify as translations here.
    Untranslated,
    /// A real translation pair, ready to become a TM unit.
    Translated { source: String, target: String },
}

/// Classifies a PO message. Plural messages contribute their msgid and
/// first plural form.
pub fn classify(message: &dyn MessageView) -> UnitClass {
    let msgid = message.msgid();
    if msgid.is_empty() {
        if message.msgstr().map_or(false, |msgstr| !msgstr.is_empty()) {
            return UnitClass::Header;
        }
        return UnitClass::Blank;
    }
    if !message.is_translated() || message.flags().is_fuzzy() {
        return UnitClass::Untranslated;
    }

    let target = if message.is_plural() {
        message
            .msgstr_plural()
            .ok()
            .and_then(|forms| forms.first())
            .map(String::as_str)
    } else {
        message.msgstr().ok()
    };
    match target {
        Some(target) if !target.is_empty() => UnitClass::Translated {
            source: String::from(msgid),
            target: String::from(target),
        },
        _ => UnitClass::Untranslated,
    }
}

/// Language configuration for a conversion run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConvertOptions {
    pub source_language: String,
    pub target_language: String,
}

impl ConvertOptions {
    /// Records both languages in the TM header.
    pub fn apply_to_header(&self, tm: &mut WordfastTm) {
        tm.header.source_language = self.source_language.clone();
        tm.header.target_language = self.target_language.clone();
    }
}

/// Appends one TM unit per translated message of `catalog`, in catalog
/// order. Header, blank, untranslated and fuzzy messages produce nothing.
///
/// Units are stamped with the catalog's `PO-Revision-Date` when it parses,
/// otherwise they keep the fixed default stamp. Repeated calls accumulate
/// into the same document, so several catalogs can share one TM.
pub fn convert_catalog(catalog: &Catalog, tm: &mut WordfastTm, options: &ConvertOptions) {
    let date = wf_timestamp(&catalog.metadata.po_revision_date);
    for message in catalog.messages() {
        if let UnitClass::Translated { source, target } = classify(message) {
            let unit = tm.add_source_unit(&source);
            if let Some(date) = &date {
                unit.date = date.clone();
            }
            unit.target = target;
            unit.target_language = options.target_language.clone();
        }
    }
}

/// How the output path will be used: `Read` when the path already exists,
/// `Write` otherwise.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TmMode {
    Read,
    Write,
}

impl TmMode {
    fn resolve(path: &Path) -> Self {
        if path.exists() {
            TmMode::Read
        } else {
            TmMode::Write
        }
    }
}

/// Owns the single TM document accumulated for one output file.
///
/// Nothing touches the filesystem until [`TmContainer::commit`], which
/// serializes the whole document in memory first and writes the file in
/// one step. A failed run therefore never leaves a truncated TM behind.
#[derive(Clone, Debug)]
pub struct TmContainer {
    pub path: PathBuf,
    pub mode: TmMode,
    pub tm: WordfastTm,
}

impl TmContainer {
    /// Sets up a container for `path`, resolving the mode from the
    /// filesystem unless one is given explicitly.
    pub fn open(path: impl Into<PathBuf>, mode: Option<TmMode>) -> Self {
        let path = path.into();
        let mode = mode.unwrap_or_else(|| TmMode::resolve(&path));
        Self {
            path,
            mode,
            tm: WordfastTm::new(),
        }
    }

    pub fn commit(&self) -> anyhow::Result<()> {
        fs::write(&self.path, self.tm.serialize())
            .with_context(|| format!("Could not write TM file to {}", self.path.display()))
    }
}
