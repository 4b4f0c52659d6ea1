// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side persistence operations.
//!
//! Functions here take a `&mut SqliteConnection` and use Diesel DSL
//! exclusively. The `TenantStore` adapter in `lib.rs` is the public
//! surface; these modules are its implementation.

pub mod fleet;
pub mod lines;
pub mod periods;
