// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Context, Result};

use crate::loader;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let url = m.get_one::<String>("url").unwrap().trim();
    let out = m.get_one::<String>("out").unwrap().trim();

    let txs = loader::fetch(url, Path::new(out))
        .with_context(|| format!("Fetch export from {}", url))?;
    println!("Fetched {} transactions to {}", txs.len(), out);
    Ok(())
}
