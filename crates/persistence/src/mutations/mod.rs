// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side persistence operations.
//!
//! Functions here take a `&mut SqliteConnection` and use Diesel DSL
//! exclusively. Multi-row writes that must be atomic run inside a
//! single Diesel transaction.

pub mod fleet;
pub mod lines;
pub mod periods;
