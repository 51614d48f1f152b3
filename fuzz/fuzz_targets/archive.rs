// Copyright 2024 Google LLC
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

#![no_main]

use libfuzzer_sys::fuzz_target;

use std::io::Cursor;
use std::str;
use tarwalk::{Archive, EntryAction, ExtractOptions, NameFilter};
use tempfile::tempdir;

fuzz_target!(|data: &[u8]| {
    // Listing never touches the filesystem, so walk the raw input first.
    let mut archive = Archive::new(Cursor::new(data));
    let mut action = EntryAction::List { out: Vec::new() };
    if let Ok(summary) = archive.walk(&mut NameFilter::default(), &mut action) {
        assert_eq!(summary.selected, summary.entries);
        assert_eq!(summary.entries == 0, action.into_inner().is_empty());
    }

    // Use the first bytes as a requested name and extract with checksums on.
    let name = match str::from_utf8(&data[..data.len().min(10)]) {
        Ok(name) => name.trim_end_matches('\0').to_string(),
        Err(_) => return,
    };
    let temp_dir = match tempdir() {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let mut archive = Archive::new(Cursor::new(data));
    archive.set_verify_checksums(true);
    let mut action = EntryAction::Extract {
        out: Vec::new(),
        verbose: true,
        options: ExtractOptions {
            unpack_dir: temp_dir.path().to_path_buf(),
            ..ExtractOptions::default()
        },
    };
    let _ = archive.walk(&mut NameFilter::new([name]), &mut action);
});
