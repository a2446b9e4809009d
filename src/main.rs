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

//! Convert Gettext PO localization files to a Wordfast translation memory
//! file.
//!
//! Each translated message in the input becomes one TM unit tagged with
//! the target language; header, blank, untranslated and fuzzy messages are
//! skipped. Several PO files can be converted into the same TM, in
//! command-line order:
//!
//! ```text
//! po2wordfast -l af-ZA -o memory.txt af.po extra/af.po
//! ```

mod convert;
mod wordfast;

use anyhow::{anyhow, Context as _};
use clap::Parser;
use convert::{convert_catalog, ConvertOptions, TmContainer, TmMode};
use log::{info, warn};
use polib::catalog::Catalog;
use polib::po_file;
use std::io::{self, Read as _, Write as _};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Parser)]
#[command(version, about)]
struct Args {
    /// PO files to convert, `-` for stdin.
    #[arg(id = "input.po", required = true)]
    input_files: Vec<PathBuf>,
    /// The Wordfast TM file to write.
    #[arg(short, long, value_name = "output.txt")]
    output: PathBuf,
    /// Target language code (e.g. af-ZA).
    #[arg(short = 'l', long = "language", value_name = "LANG")]
    language: String,
    /// Source language code.
    #[arg(long, value_name = "LANG", default_value = "en")]
    source_language: String,
}

/// Parses a PO file, or stdin when `path` is `-`.
fn read_catalog(path: &Path) -> anyhow::Result<Catalog> {
    if path == Path::new("-") {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        // polib only parses from a path, so funnel stdin through a
        // temporary file.
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        return po_file::parse(file.path()).map_err(|err| anyhow!("{err}"));
    }
    po_file::parse(path).map_err(|err| anyhow!("{err}"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let args = Args::parse();

    let options = ConvertOptions {
        source_language: args.source_language,
        target_language: args.language,
    };
    let mut container = TmContainer::open(&args.output, None);
    if container.mode == TmMode::Read {
        warn!("Overwriting existing TM file {}", container.path.display());
    }
    options.apply_to_header(&mut container.tm);

    for input in &args.input_files {
        info!("Processing {}", input.display());
        let catalog = read_catalog(input)
            .with_context(|| format!("Could not parse {} as PO file", input.display()))?;
        convert_catalog(&catalog, &mut container.tm, &options);
    }

    container.commit()
}
