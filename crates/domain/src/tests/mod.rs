// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod rental_tests;
mod types_tests;

use crate::types::LineCharges;

pub fn create_test_charges() -> LineCharges {
    LineCharges {
        premium: 50.0,
        protection: 35.0,
        agreement_fee: 10.0,
        invoice_fee: 5.0,
        discount: 20.0,
    }
}
