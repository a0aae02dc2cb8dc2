// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Schemcanvas: replay an editing script headlessly

fn main() -> anyhow::Result<()> {
    schemcanvas::run()
}
