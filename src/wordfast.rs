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

//! Wordfast translation memory files.
//!
//! A Wordfast TM is a tab-delimited text file: a single header line whose
//! metadata fields are prefixed with `%`, followed by one line per
//! translation unit. Both the header and the units use the same eleven
//! column positions, and unit text is escaped with Wordfast's `&'XX;`
//! character codes. Wordfast tooling is strict about this layout, so the
//! serializer here reproduces it exactly.

use chrono::DateTime;

/// Time stamp format used by Wordfast, e.g. `20230105~123400`.
const WF_TIME_FORMAT: &str = "%Y%m%d~%H%M%S";

/// Stamp used when no better date is known. Keeping this fixed (rather
/// than using the wall clock) makes conversion output reproducible.
const WF_DEFAULT_DATE: &str = "19000101~121212";

const WF_VERSION: &str = "Wordfast TM v.5.51w9/00";

/// Characters Wordfast stores as `&'XX;` codes: the ampersand itself plus
/// the CP1252 punctuation range.
const WF_ESCAPES: &[(char, &str)] = &[
    ('\u{0026}', "&'26;"), // &
    ('\u{201A}', "&'82;"), // single low-9 quotation mark
    ('\u{2026}', "&'85;"), // ellipsis
    ('\u{2018}', "&'91;"), // left single quotation mark
    ('\u{2019}', "&'92;"), // right single quotation mark
    ('\u{201C}', "&'93;"), // left double quotation mark
    ('\u{201D}', "&'94;"), // right double quotation mark
    ('\u{2013}', "&'96;"), // en dash
    ('\u{2014}', "&'97;"), // em dash
    ('\u{2122}', "&'99;"), // trade mark
    ('\u{00A0}', "&'A0;"), // non-breaking space
    ('\u{00A9}', "&'A9;"), // copyright
    ('\u{00AE}', "&'AE;"), // registered
    ('\u{00BC}', "&'BC;"),
    ('\u{00BD}', "&'BD;"),
    ('\u{00BE}', "&'BE;"),
];

/// Escapes unit text for a TM field: `&'XX;` codes for special characters,
/// `\n` and `\t` as literal backslash escapes since they would otherwise
/// break the line- and tab-delimited layout.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            _ => match WF_ESCAPES.iter().find(|(plain, _)| *plain == ch) {
                Some((_, code)) => escaped.push_str(code),
                None => escaped.push(ch),
            },
        }
    }
    escaped
}

/// Formats a PO revision date such as `2023-01-05 12:34+0000` as a
/// Wordfast time stamp. Returns `None` if the date is absent or not in the
/// standard PO format.
pub fn wf_timestamp(po_date: &str) -> Option<String> {
    let parsed = DateTime::parse_from_str(po_date, "%Y-%m-%d %H:%M%z").ok()?;
    Some(parsed.format(WF_TIME_FORMAT).to_string())
}

/// Metadata line at the top of a TM file.
///
/// The TU count is not stored here: it is recomputed from the translated
/// units every time the document is serialized.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WfHeader {
    pub date: String,
    pub user_list: String,
    pub source_language: String,
    pub version: String,
    pub target_language: String,
    pub license: String,
    pub attribute_lists: [String; 4],
}

impl Default for WfHeader {
    fn default() -> Self {
        Self {
            date: String::from(WF_DEFAULT_DATE),
            user_list: String::from("User ID,PO,PO po2wordfast"),
            source_language: String::from("EN-US"),
            version: String::from(WF_VERSION),
            target_language: String::new(),
            license: String::from("---00000001"),
            attribute_lists: Default::default(),
        }
    }
}

impl WfHeader {
    fn to_line(&self, translated_count: usize) -> String {
        let mut fields = vec![
            percent(&self.date),
            percent(&self.user_list),
            format!("%TU={translated_count:08}"),
            percent(&self.source_language),
            percent(&self.version),
            percent(&self.target_language),
            percent(&self.license),
        ];
        fields.extend(self.attribute_lists.iter().map(|list| percent(list)));
        fields.join("\t")
    }
}

/// Prefixes a header value with `%`; unset values stay empty.
fn percent(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("%{value}")
    }
}

/// One translation unit: a (source, target) segment pair plus the per-unit
/// metadata columns Wordfast records alongside it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WfUnit {
    pub date: String,
    pub user: String,
    pub reuse: String,
    pub source_language: String,
    pub source: String,
    pub target_language: String,
    pub target: String,
    pub attributes: [String; 4],
}

impl WfUnit {
    fn new(source: &str) -> Self {
        Self {
            date: String::from(WF_DEFAULT_DATE),
            user: String::new(),
            reuse: String::new(),
            source_language: String::new(),
            source: String::from(source),
            target_language: String::new(),
            target: String::new(),
            attributes: Default::default(),
        }
    }

    /// A unit counts as translated once its target has been set.
    pub fn is_translated(&self) -> bool {
        !self.target.is_empty()
    }

    fn to_line(&self) -> String {
        let source = escape(&self.source);
        let target = escape(&self.target);
        let fields = [
            self.date.as_str(),
            self.user.as_str(),
            self.reuse.as_str(),
            self.source_language.as_str(),
            source.as_str(),
            self.target_language.as_str(),
            target.as_str(),
            self.attributes[0].as_str(),
            self.attributes[1].as_str(),
            self.attributes[2].as_str(),
            self.attributes[3].as_str(),
        ];
        fields.join("\t")
    }
}

/// An in-memory Wordfast TM document: a header plus an ordered sequence of
/// units. Units keep their insertion order through serialization.
#[derive(Clone, Debug, Default)]
pub struct WordfastTm {
    pub header: WfHeader,
    units: Vec<WfUnit>,
}

impl WordfastTm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a unit for `source` and returns it for the caller to fill
    /// in the target and target language.
    pub fn add_source_unit(&mut self, source: &str) -> &mut WfUnit {
        self.units.push(WfUnit::new(source));
        self.units.last_mut().unwrap()
    }

    pub fn units(&self) -> &[WfUnit] {
        &self.units
    }

    /// Serializes the document to UTF-8 bytes.
    ///
    /// Only translated units are written, and a document without any
    /// serializes to nothing at all, matching what Wordfast itself
    /// produces for an empty TM. The header line ends with `\n` while unit
    /// lines end with `\r\n`.
    pub fn serialize(&self) -> Vec<u8> {
        let translated = self
            .units
            .iter()
            .filter(|unit| unit.is_translated())
            .collect::<Vec<_>>();
        if translated.is_empty() {
            return Vec::new();
        }

        let mut output = String::new();
        output.push_str(&self.header.to_line(translated.len()));
        output.push('\n');
        for unit in translated {
            output.push_str(&unit.to_line());
            output.push_str("\r\n");
        }
        output.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(
            escape("Fish & chips \u{2013} \u{201C}fresh\u{201D}\u{2026}"),
            "Fish &'26; chips &'96; &'93;fresh&'94;&'85;"
        );
    }

    #[test]
    fn test_escape_newline_and_tab() {
        assert_eq!(escape("line one\nline\ttwo"), "line one\\nline\\ttwo");
    }

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape("Héllo wörld"), "Héllo wörld");
    }

    #[test]
    fn test_wf_timestamp() {
        assert_eq!(
            wf_timestamp("2023-01-05 12:34+0000").as_deref(),
            Some("20230105~123400")
        );
    }

    #[test]
    fn test_wf_timestamp_rejects_garbage() {
        assert_eq!(wf_timestamp(""), None);
        assert_eq!(wf_timestamp("YEAR-MO-DA HO:MI+ZONE"), None);
    }

    #[test]
    fn test_serialize_empty_document() {
        let tm = WordfastTm::new();
        assert_eq!(tm.serialize(), b"");
    }

    #[test]
    fn test_serialize_skips_untranslated_units() {
        let mut tm = WordfastTm::new();
        tm.add_source_unit("no target yet");
        assert_eq!(tm.serialize(), b"");
    }

    #[test]
    fn test_serialize_single_unit() {
        let mut tm = WordfastTm::new();
        tm.header.target_language = String::from("FR-FR");
        let unit = tm.add_source_unit("Hello");
        unit.target = String::from("Bonjour");
        unit.target_language = String::from("FR-FR");

        let expected = "%19000101~121212\t\
                        %User ID,PO,PO po2wordfast\t\
                        %TU=00000001\t\
                        %EN-US\t\
                        %Wordfast TM v.5.51w9/00\t\
                        %FR-FR\t\
                        %---00000001\t\t\t\t\n\
                        19000101~121212\t\t\t\tHello\tFR-FR\tBonjour\t\t\t\t\r\n";
        assert_eq!(String::from_utf8(tm.serialize()).unwrap(), expected);
    }

    #[test]
    fn test_tu_count_covers_translated_units_only() {
        let mut tm = WordfastTm::new();
        tm.header.target_language = String::from("DE-DE");
        for (source, target) in [("one", "eins"), ("two", ""), ("three", "drei")] {
            let unit = tm.add_source_unit(source);
            unit.target = String::from(target);
            unit.target_language = String::from("DE-DE");
        }

        let output = String::from_utf8(tm.serialize()).unwrap();
        let header = output.lines().next().unwrap();
        assert!(header.contains("%TU=00000002"));
        assert_eq!(output.matches("\r\n").count(), 2);
    }

    #[test]
    fn test_attribute_columns_serialize_in_place() {
        let mut tm = WordfastTm::new();
        tm.header.attribute_lists[0] = String::from("MT");
        let unit = tm.add_source_unit("Hello");
        unit.target = String::from("Bonjour");
        unit.attributes[0] = String::from("TT");

        let output = String::from_utf8(tm.serialize()).unwrap();
        let header = output.lines().next().unwrap();
        let record = output.lines().nth(1).unwrap();
        assert_eq!(header.split('\t').count(), 11);
        assert_eq!(header.split('\t').nth(7), Some("%MT"));
        assert_eq!(record.split('\t').count(), 11);
        assert_eq!(record.split('\t').nth(7), Some("TT"));
    }

    #[test]
    fn test_serialize_preserves_unit_order() {
        let mut tm = WordfastTm::new();
        for (source, target) in [("b", "B"), ("a", "A"), ("c", "C")] {
            let unit = tm.add_source_unit(source);
            unit.target = String::from(target);
        }

        let output = String::from_utf8(tm.serialize()).unwrap();
        let sources = output
            .lines()
            .skip(1)
            .map(|line| line.split('\t').nth(4).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(sources, ["b", "a", "c"]);
    }
}
